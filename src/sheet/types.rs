use std::path::PathBuf;

use serde::Serialize;

use crate::config::SheetConfig;
use crate::packing::Size;
use crate::sprite::{Asset, ContentBox, Padding};

/// One packing run over the images of a directory
#[derive(Debug)]
pub struct Sheet {
    /// Sheet name, taken from the directory name
    pub name: String,
    /// Source directory
    pub path: PathBuf,
    /// Resolved settings
    pub config: SheetConfig,
    /// Build digest over sources and settings
    pub digest: String,
    pub(super) assets: Vec<Asset>,
    pub(super) processed: bool,
}

impl Sheet {
    pub fn new(
        name: String,
        path: PathBuf,
        config: SheetConfig,
        digest: String,
        assets: Vec<Asset>,
    ) -> Self {
        Self {
            name,
            path,
            config,
            digest,
            assets,
            processed: false,
        }
    }

    /// Assets in scan order before processing, packing order after
    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn is_processed(&self) -> bool {
        self.processed
    }

    pub fn canonical_ratio(&self) -> f64 {
        self.config.canonical_ratio()
    }

    /// Smallest canvas holding every placed padded box, at the canonical ratio
    pub fn canvas_size(&self) -> Size {
        self.assets
            .iter()
            .filter_map(|a| a.position().map(|p| (p, a)))
            .fold(Size::default(), |acc, (p, a)| {
                Size::new(
                    acc.width.max(p.x + a.absolute_width()),
                    acc.height.max(p.y + a.absolute_height()),
                )
            })
    }
}

/// Everything an external stylesheet or metadata emitter needs to know about
/// a packed sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetDescriptor {
    pub name: String,
    pub digest: String,
    pub canonical_ratio: f64,
    pub margin: u32,
    /// Canvas size at the canonical ratio
    pub size: Size,
    /// One entry per written ratio, ascending
    pub images: Vec<RatioImage>,
    /// Assets in packing order
    pub assets: Vec<AssetPlacement>,
}

/// A per-ratio bitmap artifact
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatioImage {
    pub ratio: f64,
    pub file: String,
    pub size: Size,
}

/// Where one asset lives inside the sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetPlacement {
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pseudo: Option<String>,
    pub file: String,
    /// Padded box origin at the canonical ratio
    pub x: u32,
    pub y: u32,
    /// Content size at the canonical ratio
    pub width: u32,
    pub height: u32,
    pub padding: Padding,
    pub content: ContentBox,
}
