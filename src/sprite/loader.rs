use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use rayon::prelude::*;
use walkdir::WalkDir;

use super::{Asset, SourceFile};
use crate::config::SheetConfig;
use crate::error::GlueError;

pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// Scan a sheet directory and read every matching image.
///
/// Hidden files are skipped. Files are returned in scan order, which is
/// sorted by file name within each directory. Only the top level is read
/// unless `recursive` is set.
pub fn scan_sources(dir: &Path, recursive: bool, follow_links: bool) -> Result<Vec<SourceFile>> {
    if !dir.exists() {
        return Err(GlueError::InputNotFound(dir.to_path_buf()).into());
    }

    let mut walker = WalkDir::new(dir)
        .follow_links(follow_links)
        .sort_by_file_name()
        .min_depth(1);
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut sources = Vec::new();
    for entry in walker {
        let entry =
            entry.with_context(|| format!("Failed to read directory {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Some(file_name) = entry.file_name().to_str() else {
            continue;
        };
        if file_name.starts_with('.') || !is_supported_image(entry.path()) {
            continue;
        }

        let path = entry.path().to_path_buf();
        let data = std::fs::read(&path).map_err(|e| GlueError::SourceRead {
            path: path.clone(),
            source: e,
        })?;
        debug!("Found {} ({} bytes)", path.display(), data.len());

        sources.push(SourceFile {
            path,
            file_name: file_name.to_string(),
            data,
        });
    }

    if sources.is_empty() {
        return Err(GlueError::NoImages(dir.to_path_buf()).into());
    }

    Ok(sources)
}

/// Decode all sources of one sheet, keeping scan order.
///
/// Any decode failure aborts the whole sheet.
pub fn decode_assets(
    sources: &[SourceFile],
    sheet_name: &str,
    config: &SheetConfig,
) -> Result<Vec<Asset>> {
    sources
        .par_iter()
        .map(|source| Asset::decode(source, sheet_name, config))
        .collect()
}

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
