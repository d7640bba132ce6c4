use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GlueError {
    #[error(
        "Unknown algorithm '{0}'. Valid values: square, vertical, vertical-right, horizontal, \
         horizontal-bottom, diagonal"
    )]
    UnknownAlgorithm(String),

    #[error(
        "Unknown ordering '{0}'. Valid values: maxside, width, height, area (optionally prefixed \
         with '-')"
    )]
    UnknownOrdering(String),

    #[error("Invalid ratio '{0}': ratios must be positive numbers")]
    InvalidRatio(String),

    #[error("Invalid value '{value}' for setting '{key}'")]
    InvalidConfigValue { key: &'static str, value: String },

    #[error("No valid images found in '{0}'")]
    NoImages(PathBuf),

    #[error("No sprite folders found in '{0}'")]
    NoSpriteFolders(PathBuf),

    #[error("Multiple images share the same identifier, rename them: {}", .names.join(", "))]
    DuplicateIdentifiers { names: Vec<String> },

    #[error("Failed to read source image '{path}': {source}")]
    SourceRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to load image '{path}': {source}")]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to encode image '{path}': {message}")]
    ImageSave { path: PathBuf, message: String },

    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to compress PNG '{path}': {message}")]
    PngCompress { path: PathBuf, message: String },

    #[error("Input path does not exist: {0}")]
    InputNotFound(PathBuf),
}
