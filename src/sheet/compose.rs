use std::collections::BTreeMap;

use image::RgbaImage;
use image::imageops::{self, FilterType};
use log::debug;

use super::Sheet;
use super::builder::scaled_size;
use crate::packing::Size;

/// Palette index reserved for fully transparent pixels in palette mode
pub const TRANSPARENT_INDEX: u8 = 255;

/// Pixels with alpha at or below this value become transparent in palette mode
pub const ALPHA_THRESHOLD: u8 = 128;

/// Maximum number of opaque palette entries
const MAX_COLORS: usize = 255;

/// A bitmap rendered for one ratio
#[derive(Debug, Clone)]
pub struct RenderedCanvas {
    pub ratio: f64,
    pub image: CanvasImage,
}

/// Pixel storage of a rendered canvas
#[derive(Debug, Clone)]
pub enum CanvasImage {
    Rgba(RgbaImage),
    Indexed(IndexedImage),
}

impl CanvasImage {
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            CanvasImage::Rgba(image) => image.dimensions(),
            CanvasImage::Indexed(image) => (image.width, image.height),
        }
    }
}

/// 8-bit palette image with binary transparency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    pub width: u32,
    pub height: u32,
    /// Always 256 entries; entry 255 is the transparent slot
    pub palette: Vec<[u8; 3]>,
    /// One palette index per pixel, row-major
    pub indices: Vec<u8>,
}

/// Renders a packed sheet into per-ratio bitmaps
pub struct CanvasComposer<'a> {
    sheet: &'a Sheet,
}

impl<'a> CanvasComposer<'a> {
    pub fn new(sheet: &'a Sheet) -> Self {
        Self { sheet }
    }

    /// Paste every asset onto a transparent canvas at the canonical ratio.
    pub fn compose(&self) -> RgbaImage {
        let size = self.sheet.canvas_size();
        let ratio = self.sheet.canonical_ratio();
        let margin = self.sheet.config.margin;
        let mut canvas = RgbaImage::new(size.width, size.height);

        for asset in self.sheet.assets() {
            let Some(origin) = asset.draw_origin(margin, ratio) else {
                continue;
            };
            imageops::replace(
                &mut canvas,
                &asset.image,
                i64::from(origin.x),
                i64::from(origin.y),
            );
        }

        canvas
    }

    /// Render the requested ratios.
    ///
    /// The canonical canvas is composed once and every other ratio is scaled
    /// from it directly. With `png8` each result is quantized to a palette.
    pub fn render(&self, ratios: &[f64]) -> Vec<RenderedCanvas> {
        let canonical = self.compose();
        let canonical_ratio = self.sheet.canonical_ratio();

        ratios
            .iter()
            .map(|&ratio| {
                let rgba = scale_canvas(&canonical, canonical_ratio, ratio);
                debug!(
                    "Rendered '{}' at {}x: {}x{}",
                    self.sheet.name,
                    ratio,
                    rgba.width(),
                    rgba.height()
                );
                let image = if self.sheet.config.png8 {
                    CanvasImage::Indexed(quantize(&rgba))
                } else {
                    CanvasImage::Rgba(rgba)
                };
                RenderedCanvas { ratio, image }
            })
            .collect()
    }
}

/// Scale the canonical canvas to `ratio` with an antialiasing filter.
pub fn scale_canvas(canonical: &RgbaImage, canonical_ratio: f64, ratio: f64) -> RgbaImage {
    if ratio == canonical_ratio {
        return canonical.clone();
    }

    let (width, height) = canonical.dimensions();
    let target = scaled_size(
        Size::new(width, height),
        canonical_ratio,
        ratio,
    );
    imageops::resize(
        canonical,
        target.width.max(1),
        target.height.max(1),
        FilterType::Lanczos3,
    )
}

/// Convert to a palette image. This is lossy: at most 255 colors are kept and
/// alpha is reduced to fully opaque or fully transparent.
///
/// Images with at most 255 distinct opaque colors keep them exactly; larger
/// sets go through NeuQuant.
pub fn quantize(image: &RgbaImage) -> IndexedImage {
    let (width, height) = image.dimensions();
    let opaque = |a: u8| a > ALPHA_THRESHOLD;

    let mut exact: BTreeMap<[u8; 3], u8> = BTreeMap::new();
    let mut overflow = false;
    for pixel in image.pixels() {
        let [r, g, b, a] = pixel.0;
        if !opaque(a) || exact.contains_key(&[r, g, b]) {
            continue;
        }
        if exact.len() == MAX_COLORS {
            overflow = true;
            break;
        }
        exact.insert([r, g, b], 0);
    }

    let mut palette = vec![[0u8; 3]; 256];
    let indices: Vec<u8> = if overflow {
        let samples: Vec<u8> = image
            .pixels()
            .filter(|p| opaque(p.0[3]))
            .flat_map(|p| [p.0[0], p.0[1], p.0[2], 255])
            .collect();
        let quantizer = color_quant::NeuQuant::new(10, MAX_COLORS, &samples);
        for (slot, rgb) in palette
            .iter_mut()
            .zip(quantizer.color_map_rgb().chunks_exact(3))
        {
            *slot = [rgb[0], rgb[1], rgb[2]];
        }
        image
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                if opaque(a) {
                    palette_index(quantizer.index_of(&[r, g, b, 255]))
                } else {
                    TRANSPARENT_INDEX
                }
            })
            .collect()
    } else {
        for (index, (rgb, slot)) in exact.iter_mut().enumerate() {
            *slot = palette_index(index);
            palette[index] = *rgb;
        }
        image
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                if opaque(a) {
                    exact.get(&[r, g, b]).copied().unwrap_or(TRANSPARENT_INDEX)
                } else {
                    TRANSPARENT_INDEX
                }
            })
            .collect()
    };

    IndexedImage {
        width,
        height,
        palette,
        indices,
    }
}

fn palette_index(index: usize) -> u8 {
    u8::try_from(index.min(MAX_COLORS - 1)).unwrap_or(TRANSPARENT_INDEX - 1)
}
