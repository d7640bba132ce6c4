use clap::Parser;
use std::fmt;
use std::path::PathBuf;

use crate::config::{CompressConfig, PaddingValue, RatiosValue, SheetConfigFile};

#[derive(Parser, Debug, Clone)]
#[command(name = "glue")]
#[command(
    version,
    about = "Sprite sheet generator with CSS and multi-resolution output",
    long_about = None
)]
pub struct CliArgs {
    /// Directory containing the source images (or sprite folders with --project)
    pub source: PathBuf,

    /// Output directory for images and stylesheets; required unless both
    /// --img and --css are given
    pub output: Option<PathBuf>,

    /// Output directory for images [default: <output>]
    #[arg(long, value_name = "DIR")]
    pub img: Option<PathBuf>,

    /// Output directory for stylesheets [default: <output>]
    #[arg(long, value_name = "DIR")]
    pub css: Option<PathBuf>,

    /// Treat every subdirectory of <source> as one sheet
    #[arg(long)]
    pub project: bool,

    /// Include images in subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Follow symbolic links while scanning
    #[arg(long)]
    pub follow_links: bool,

    /// Packing algorithm: square, vertical, vertical-right, horizontal,
    /// horizontal-bottom, diagonal [default: square]
    #[arg(short, long)]
    pub algorithm: Option<String>,

    /// Ordering: maxside, width, height, area; prefix with '-' to reverse
    /// [default: maxside]
    #[arg(long)]
    pub ordering: Option<String>,

    /// Default padding, CSS style ("10", "10 5", "1 2 3 4") [default: 0]
    #[arg(short, long)]
    pub padding: Option<String>,

    /// Transparent margin around every image in pixels [default: 0]
    #[arg(long)]
    pub margin: Option<u32>,

    /// Comma separated pixel-density ratios, e.g. "2,1.5"
    #[arg(long)]
    pub ratios: Option<String>,

    /// Also generate 2x images
    #[arg(long)]
    pub retina: bool,

    /// Crop transparent borders of every image
    #[arg(long)]
    pub crop: bool,

    /// Write 8-bit palette PNGs (lossy; alpha becomes on/off)
    #[arg(long)]
    pub png8: bool,

    /// Rebuild even if the output is up to date
    #[arg(short, long)]
    pub force: bool,

    /// Keep padding tokens in file names as part of the identifier
    #[arg(long)]
    pub ignore_filename_paddings: bool,

    /// Identifier namespace [default: sprite]
    #[arg(long)]
    pub namespace: Option<String>,

    /// Per-sheet identifier namespace, {sprite} is the sheet name
    /// [default: {sprite}]
    #[arg(long)]
    pub sprite_namespace: Option<String>,

    /// Identifier separator; "camelcase" joins components in camelCase
    /// [default: -]
    #[arg(long)]
    pub separator: Option<String>,

    /// URL prefix for images referenced from the stylesheet
    #[arg(long)]
    pub url: Option<String>,

    /// Append the build hash to image URLs as a query string
    #[arg(long)]
    pub cachebuster: bool,

    /// Append the build hash to output file names
    #[arg(long)]
    pub cachebuster_filename: bool,

    /// Do not write images
    #[arg(long)]
    pub no_img: bool,

    /// Do not write stylesheets
    #[arg(long)]
    pub no_css: bool,

    /// Also write a test HTML page per sheet
    #[arg(long)]
    pub html: bool,

    /// Write .less instead of .css
    #[arg(long)]
    pub less: bool,

    /// Compress PNG output (0-6 or 'max'). Default level is 2 if flag is present without value.
    #[arg(long, value_name = "LEVEL", default_missing_value = "2", num_args = 0..=1)]
    pub compress: Option<CompressionLevel>,

    /// Only print warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    /// The command line as the highest-priority settings layer.
    ///
    /// Switches that were not given stay unset so lower layers can still
    /// turn them on.
    pub fn to_config_layer(&self) -> SheetConfigFile {
        let flag = |set: bool| set.then_some(true);
        SheetConfigFile {
            padding: self.padding.clone().map(PaddingValue::Declaration),
            margin: self.margin,
            algorithm: self.algorithm.clone(),
            ordering: self.ordering.clone(),
            ratios: self.ratios.clone().map(RatiosValue::Text),
            retina: flag(self.retina),
            crop: flag(self.crop),
            png8: flag(self.png8),
            force: flag(self.force),
            ignore_filename_paddings: flag(self.ignore_filename_paddings),
            recursive: flag(self.recursive),
            follow_links: flag(self.follow_links),
            namespace: self.namespace.clone(),
            sprite_namespace: self.sprite_namespace.clone(),
            separator: self.separator.clone(),
            url: self.url.clone(),
            cachebuster: flag(self.cachebuster),
            cachebuster_filename: flag(self.cachebuster_filename),
            no_img: flag(self.no_img),
            no_css: flag(self.no_css),
            html: flag(self.html),
            less: flag(self.less),
            compress: self.compress.map(|level| match level {
                CompressionLevel::Level(n) => CompressConfig::Level(n),
                CompressionLevel::Max => CompressConfig::Max("max".to_string()),
            }),
        }
    }

    pub fn log_level(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else if self.quiet {
            log::LevelFilter::Warn
        } else {
            log::LevelFilter::Info
        }
    }
}

/// PNG compression level (0-6 or max)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionLevel {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression
    Max,
}

impl std::str::FromStr for CompressionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("max") {
            Ok(CompressionLevel::Max)
        } else {
            s.parse::<u8>()
                .map_err(|_e| format!("invalid compression level: {}", s))
                .and_then(|n| {
                    if n <= 6 {
                        Ok(CompressionLevel::Level(n))
                    } else {
                        Err(format!("compression level must be 0-6 or 'max', got {}", n))
                    }
                })
        }
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionLevel::Level(n) => write!(f, "{}", n),
            CompressionLevel::Max => f.write_str("max"),
        }
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        CompressionLevel::Level(2)
    }
}
