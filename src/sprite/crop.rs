use image::RgbaImage;
use serde::Serialize;

/// Where the content box sits inside the original bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct ContentBox {
    /// Pixels cropped from the left edge
    pub offset_x: u32,
    /// Pixels cropped from the top edge
    pub offset_y: u32,
    /// Original width before cropping
    pub source_width: u32,
    /// Original height before cropping
    pub source_height: u32,
    /// Content width
    pub width: u32,
    /// Content height
    pub height: u32,
}

impl ContentBox {
    /// Content box covering the whole bitmap
    pub fn uncropped(width: u32, height: u32) -> Self {
        Self {
            offset_x: 0,
            offset_y: 0,
            source_width: width,
            source_height: height,
            width,
            height,
        }
    }

    /// Returns true if any border was removed
    pub fn was_cropped(&self) -> bool {
        self.width != self.source_width || self.height != self.source_height
    }
}

/// Crop an image to the smallest box holding every non-transparent pixel.
///
/// A fully transparent image is returned unchanged.
pub fn crop_to_content(image: RgbaImage) -> (RgbaImage, ContentBox) {
    let (width, height) = image.dimensions();

    let mut min_x = width;
    let mut min_y = height;
    let mut max_x = 0u32;
    let mut max_y = 0u32;

    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[3] > 0 {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }

    if max_x < min_x || max_y < min_y {
        return (image, ContentBox::uncropped(width, height));
    }

    let content_width = max_x - min_x + 1;
    let content_height = max_y - min_y + 1;
    if content_width == width && content_height == height {
        return (image, ContentBox::uncropped(width, height));
    }

    let cropped =
        image::imageops::crop_imm(&image, min_x, min_y, content_width, content_height).to_image();

    let content = ContentBox {
        offset_x: min_x,
        offset_y: min_y,
        source_width: width,
        source_height: height,
        width: content_width,
        height: content_height,
    };

    (cropped, content)
}
