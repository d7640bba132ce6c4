use std::path::PathBuf;

use anyhow::Result;
use image::RgbaImage;
use log::debug;

use super::{AssetName, ContentBox, Padding, crop_to_content};
use crate::config::SheetConfig;
use crate::error::GlueError;
use crate::packing::Point;

/// Raw bytes of a source image, read during the directory scan
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Original file path
    pub path: PathBuf,
    /// File name including extension
    pub file_name: String,
    /// Undecoded file contents
    pub data: Vec<u8>,
}

/// One source image plus its derived layout metadata
#[derive(Debug, Clone)]
pub struct Asset {
    /// Original file path
    pub path: PathBuf,
    /// Filename-derived identifier, padding and pseudo-class
    pub name: AssetName,
    /// Bitmap after optional content cropping
    pub image: RgbaImage,
    /// Content box inside the original bitmap
    pub content: ContentBox,
    /// Effective padding in source pixels
    pub padding: Padding,
    absolute_width: u32,
    absolute_height: u32,
    position: Option<Point>,
}

impl Asset {
    /// Build an asset from a decoded bitmap.
    ///
    /// `canonical_ratio` is the highest ratio of the sheet; padding and margin
    /// are scaled by it when computing the padded box.
    pub fn new(
        path: PathBuf,
        name: AssetName,
        image: RgbaImage,
        config: &SheetConfig,
        canonical_ratio: f64,
    ) -> Self {
        let (image, content) = if config.crop {
            crop_to_content(image)
        } else {
            let (w, h) = image.dimensions();
            (image, ContentBox::uncropped(w, h))
        };

        let padding = name.padding.unwrap_or(config.padding);
        let absolute_width = padded_extent(
            content.width,
            padding.horizontal(),
            config.margin,
            canonical_ratio,
        );
        let absolute_height = padded_extent(
            content.height,
            padding.vertical(),
            config.margin,
            canonical_ratio,
        );

        Self {
            path,
            name,
            image,
            content,
            padding,
            absolute_width,
            absolute_height,
            position: None,
        }
    }

    /// Decode a scanned source file
    pub fn decode(source: &SourceFile, sheet_name: &str, config: &SheetConfig) -> Result<Self> {
        let image = image::load_from_memory(&source.data)
            .map_err(|e| GlueError::ImageLoad {
                path: source.path.clone(),
                source: e,
            })?
            .into_rgba8();

        let name = AssetName::parse(&source.file_name, sheet_name, config);

        let asset = Self::new(
            source.path.clone(),
            name,
            image,
            config,
            config.canonical_ratio(),
        );
        if asset.content.was_cropped() {
            debug!(
                "Cropped {} from {}x{} to {}x{}",
                source.file_name,
                asset.content.source_width,
                asset.content.source_height,
                asset.content.width,
                asset.content.height
            );
        }
        Ok(asset)
    }

    pub fn identifier(&self) -> &str {
        &self.name.identifier
    }

    /// Width of the content box
    pub fn content_width(&self) -> u32 {
        self.content.width
    }

    /// Height of the content box
    pub fn content_height(&self) -> u32 {
        self.content.height
    }

    /// Width of the padded box at the canonical ratio
    pub fn absolute_width(&self) -> u32 {
        self.absolute_width
    }

    /// Height of the padded box at the canonical ratio
    pub fn absolute_height(&self) -> u32 {
        self.absolute_height
    }

    /// Top-left corner of the padded box, once packed
    pub fn position(&self) -> Option<Point> {
        self.position
    }

    /// Assign the packed position. Positions never change once set.
    pub(crate) fn place(&mut self, point: Point) -> bool {
        if self.position.is_some() {
            return false;
        }
        self.position = Some(point);
        true
    }

    /// Where the bitmap itself is drawn on the canonical canvas
    pub fn draw_origin(&self, margin: u32, canonical_ratio: f64) -> Option<Point> {
        self.position.map(|p| Point {
            x: round_up(
                f64::from(p.x) + f64::from(self.padding.left + margin) * canonical_ratio,
            ),
            y: round_up(f64::from(p.y) + f64::from(self.padding.top + margin) * canonical_ratio),
        })
    }
}

/// Padded extent along one axis, rounded up so boxes are never under-allocated
pub fn padded_extent(content: u32, padding: u32, margin: u32, ratio: f64) -> u32 {
    round_up(f64::from(content) + f64::from(padding + 2 * margin) * ratio)
}

/// Round a non-negative pixel measure up to the next integer
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "pixel measures are clamped to the u32 range first"
)]
pub fn round_up(value: f64) -> u32 {
    value.ceil().clamp(0.0, f64::from(u32::MAX)) as u32
}
