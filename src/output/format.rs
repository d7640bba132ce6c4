use std::path::Path;

use anyhow::Result;
use log::warn;

use super::write_atomic;
use crate::cache::{DIGEST_KEYWORD, SOFTWARE_KEYWORD, software_marker};
use crate::cli::CompressionLevel;
use crate::error::GlueError;
use crate::sheet::{CanvasImage, IndexedImage, TRANSPARENT_INDEX};

/// Save a rendered canvas as PNG, stamped with the software marker and
/// `digest`, optionally optimized with oxipng.
pub fn save_canvas_png(
    image: &CanvasImage,
    path: &Path,
    digest: &str,
    compress: Option<CompressionLevel>,
) -> Result<()> {
    let png_data = encode_png(image, digest).map_err(|e| GlueError::ImageSave {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let output_data = match compress {
        Some(level) => match optimize(&png_data, level) {
            Ok(optimized) => optimized,
            Err(e) => {
                warn!(
                    "{}, keeping the unoptimized file",
                    GlueError::PngCompress {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    }
                );
                png_data
            }
        },
        None => png_data,
    };

    write_atomic(path, &output_data)?;
    Ok(())
}

/// Encode to PNG in memory with tEXt stamps ahead of the image data.
fn encode_png(image: &CanvasImage, digest: &str) -> Result<Vec<u8>, png::EncodingError> {
    let (width, height) = image.dimensions();
    let mut buffer = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buffer, width, height);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.add_text_chunk(SOFTWARE_KEYWORD.to_string(), software_marker())?;
        encoder.add_text_chunk(DIGEST_KEYWORD.to_string(), digest.to_string())?;

        let data: &[u8] = match image {
            CanvasImage::Rgba(rgba) => {
                encoder.set_color(png::ColorType::Rgba);
                rgba.as_raw()
            }
            CanvasImage::Indexed(indexed) => {
                encoder.set_color(png::ColorType::Indexed);
                encoder.set_palette(palette_bytes(indexed));
                encoder.set_trns(transparency_bytes());
                &indexed.indices
            }
        };

        let mut writer = encoder.write_header()?;
        writer.write_image_data(data)?;
        writer.finish()?;
    }
    Ok(buffer)
}

fn palette_bytes(image: &IndexedImage) -> Vec<u8> {
    image.palette.iter().flatten().copied().collect()
}

/// Alpha per palette entry: opaque everywhere except the transparent slot
fn transparency_bytes() -> Vec<u8> {
    let mut alpha = vec![255u8; 256];
    alpha[usize::from(TRANSPARENT_INDEX)] = 0;
    alpha
}

fn optimize(data: &[u8], level: CompressionLevel) -> Result<Vec<u8>, oxipng::PngError> {
    let mut opts = match level {
        CompressionLevel::Level(n) => oxipng::Options::from_preset(n),
        CompressionLevel::Max => oxipng::Options::max_compression(),
    };
    // The stamps are needed for the next up-to-date check.
    opts.strip = oxipng::StripChunks::None;
    oxipng::optimize_from_memory(data, &opts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::read_stamp;
    use crate::sheet::quantize;
    use image::{Rgba, RgbaImage};

    fn sample() -> RgbaImage {
        let mut image = RgbaImage::new(4, 3);
        image.put_pixel(1, 1, Rgba([255, 0, 0, 255]));
        image.put_pixel(2, 1, Rgba([0, 255, 0, 60]));
        image
    }

    #[test]
    fn test_rgba_png_carries_stamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icons.png");

        save_canvas_png(&CanvasImage::Rgba(sample()), &path, "abcdef0123", None).unwrap();

        let stamp = read_stamp(&path).unwrap();
        assert!(stamp.matches("abcdef0123"));
        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn test_indexed_png_binarizes_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icons.png");
        let indexed = CanvasImage::Indexed(quantize(&sample()));

        save_canvas_png(&indexed, &path, "abc", None).unwrap();

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (4, 3));
        assert_eq!(decoded.get_pixel(1, 1).0, [255, 0, 0, 255]);
        assert_eq!(decoded.get_pixel(2, 1).0[3], 0);
        assert_eq!(decoded.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn test_compressed_png_keeps_stamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icons.png");

        save_canvas_png(
            &CanvasImage::Rgba(sample()),
            &path,
            "0011223344",
            Some(CompressionLevel::Level(1)),
        )
        .unwrap();

        assert!(read_stamp(&path).unwrap().matches("0011223344"));
        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(1, 1).0, [255, 0, 0, 255]);
    }
}
