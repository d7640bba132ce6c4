use serde::{Deserialize, Serialize};

use crate::cli::CompressionLevel;
use crate::packing::Algorithm;
use crate::sheet::SpriteOrdering;
use crate::sprite::Padding;

/// A padding value in a settings file: `10` or `"10px 5px"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaddingValue {
    Pixels(u32),
    Declaration(String),
}

/// A ratio list in a settings file: `[1, 2]` or `"1,2"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RatiosValue {
    List(Vec<f64>),
    Text(String),
}

/// PNG compression level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompressConfig {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression ("max")
    Max(String),
}

/// One layer of sheet settings.
///
/// Every field is optional so layers can be stacked: command line over the
/// sheet directory's `sprite.json` over the project's `sprite.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetConfigFile {
    /// Default padding for images without a filename padding token
    pub padding: Option<PaddingValue>,
    /// Extra transparent space around every padded image
    pub margin: Option<u32>,
    /// Packing algorithm name
    pub algorithm: Option<String>,
    /// Ordering key, optionally prefixed with '-'
    pub ordering: Option<String>,
    /// Additional pixel-density ratios
    pub ratios: Option<RatiosValue>,
    /// Shortcut adding the 2.0 ratio
    pub retina: Option<bool>,
    /// Crop transparent borders
    pub crop: Option<bool>,
    /// Write palette images (lossy alpha)
    pub png8: Option<bool>,
    /// Ignore up-to-date artifacts and rebuild
    pub force: Option<bool>,
    /// Treat padding tokens in filenames as part of the name
    pub ignore_filename_paddings: Option<bool>,
    /// Include images in subdirectories
    pub recursive: Option<bool>,
    /// Follow symbolic links while scanning
    pub follow_links: Option<bool>,
    /// Global identifier namespace
    pub namespace: Option<String>,
    /// Per-sheet identifier namespace, `{sprite}` is the sheet name
    pub sprite_namespace: Option<String>,
    /// Identifier separator, or "camelcase"
    pub separator: Option<String>,
    /// URL prefix for images referenced from the stylesheet
    pub url: Option<String>,
    /// Append `?<hash>` to image URLs
    pub cachebuster: Option<bool>,
    /// Append `_<hash>` to output file names
    pub cachebuster_filename: Option<bool>,
    /// Skip writing images
    pub no_img: Option<bool>,
    /// Skip writing the stylesheet
    pub no_css: Option<bool>,
    /// Write a test HTML page
    pub html: Option<bool>,
    /// Write `.less` instead of `.css`
    pub less: Option<bool>,
    /// Optimize written PNGs in-process
    pub compress: Option<CompressConfig>,
}

/// Fully resolved settings for one sheet. Never mutated after resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetConfig {
    pub padding: Padding,
    pub margin: u32,
    pub algorithm: Algorithm,
    pub ordering: SpriteOrdering,
    /// Sorted ascending, deduplicated, always contains 1.0
    pub ratios: Vec<f64>,
    pub retina: bool,
    pub crop: bool,
    pub png8: bool,
    pub force: bool,
    pub ignore_filename_paddings: bool,
    pub recursive: bool,
    pub follow_links: bool,
    pub namespace: String,
    pub sprite_namespace: String,
    pub separator: String,
    pub url: String,
    pub cachebuster: bool,
    pub cachebuster_filename: bool,
    pub no_img: bool,
    pub no_css: bool,
    pub html: bool,
    pub less: bool,
    pub compress: Option<CompressionLevel>,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            padding: Padding::default(),
            margin: 0,
            algorithm: Algorithm::default(),
            ordering: SpriteOrdering::default(),
            ratios: vec![1.0],
            retina: false,
            crop: false,
            png8: false,
            force: false,
            ignore_filename_paddings: false,
            recursive: false,
            follow_links: false,
            namespace: "sprite".to_string(),
            sprite_namespace: "{sprite}".to_string(),
            separator: "-".to_string(),
            url: String::new(),
            cachebuster: false,
            cachebuster_filename: false,
            no_img: false,
            no_css: false,
            html: false,
            less: false,
            compress: None,
        }
    }
}
