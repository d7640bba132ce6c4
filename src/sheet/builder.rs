use std::collections::HashMap;
use std::path::Path;

use log::{debug, info, warn};

use super::{AssetPlacement, RatioImage, Sheet, SheetDescriptor};
use crate::error::GlueError;
use crate::packing::Size;
use crate::sprite::round_up;

impl Sheet {
    /// Order and pack the assets. Runs once; later calls do nothing.
    pub fn process(&mut self) {
        if self.processed {
            return;
        }

        self.config.ordering.sort(&mut self.assets);
        let placed = self.config.algorithm.packer().process(&mut self.assets);
        if placed != self.assets.len() {
            warn!(
                "Sheet '{}': {} of {} assets were already placed",
                self.name,
                self.assets.len() - placed,
                self.assets.len()
            );
        }
        self.processed = true;

        let size = self.canvas_size();
        info!(
            "Sheet '{}': {}x{} with {} images ({}, ordering {})",
            self.name,
            size.width,
            size.height,
            self.assets.len(),
            self.config.algorithm,
            self.config.ordering,
        );
    }

    /// Fail if two assets of this sheet share an identifier.
    pub fn validate(&self) -> Result<(), GlueError> {
        for asset in &self.assets {
            debug!("\t{} => .{}", asset.name.file_name, asset.identifier());
        }
        check_identifiers(
            self.assets
                .iter()
                .map(|a| (a.identifier(), a.path.as_path())),
        )
    }

    /// Base name of generated files, with the digest appended when
    /// `cachebuster_filename` is set.
    pub fn file_stem(&self) -> String {
        file_stem(&self.name, &self.digest, self.config.cachebuster_filename)
    }

    /// Bitmap file name for one ratio, e.g. `icons@2x.png`
    pub fn image_file_name(&self, ratio: f64) -> String {
        format!("{}{}.png", self.file_stem(), ratio_suffix(ratio))
    }

    /// Describe the packed sheet for external emitters.
    pub fn descriptor(&self) -> SheetDescriptor {
        let size = self.canvas_size();
        let canonical = self.canonical_ratio();

        let images = self
            .config
            .ratios
            .iter()
            .map(|&ratio| RatioImage {
                ratio,
                file: self.image_file_name(ratio),
                size: scaled_size(size, canonical, ratio),
            })
            .collect();

        let assets = self
            .assets
            .iter()
            .filter_map(|asset| {
                let position = asset.position()?;
                Some(AssetPlacement {
                    identifier: asset.identifier().to_string(),
                    pseudo: asset.name.pseudo.map(str::to_string),
                    file: asset.name.file_name.clone(),
                    x: position.x,
                    y: position.y,
                    width: asset.content_width(),
                    height: asset.content_height(),
                    padding: asset.padding,
                    content: asset.content,
                })
            })
            .collect();

        SheetDescriptor {
            name: self.name.clone(),
            digest: self.digest.clone(),
            canonical_ratio: canonical,
            margin: self.config.margin,
            size,
            images,
            assets,
        }
    }
}

/// Canvas size for `ratio`, scaled down from the canonical canvas
pub fn scaled_size(canonical_size: Size, canonical_ratio: f64, ratio: f64) -> Size {
    if ratio == canonical_ratio {
        return canonical_size;
    }
    Size::new(
        round_up(f64::from(canonical_size.width) / canonical_ratio * ratio),
        round_up(f64::from(canonical_size.height) / canonical_ratio * ratio),
    )
}

/// File name suffix for a ratio: none for 1, `@2x` for integers, `@1.5x`
/// otherwise.
pub fn ratio_suffix(ratio: f64) -> String {
    if ratio == 1.0 {
        String::new()
    } else if ratio.fract() == 0.0 {
        format!("@{}x", ratio)
    } else {
        format!("@{:.1}x", ratio)
    }
}

pub(crate) fn file_stem(name: &str, digest: &str, cachebuster_filename: bool) -> String {
    if cachebuster_filename {
        format!("{}_{}", name, &digest[..digest.len().min(6)])
    } else {
        name.to_string()
    }
}

/// Fail with every offending file when identifiers collide.
pub fn check_identifiers<'a>(
    entries: impl IntoIterator<Item = (&'a str, &'a Path)>,
) -> Result<(), GlueError> {
    let entries: Vec<(&str, &Path)> = entries.into_iter().collect();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for (identifier, _) in &entries {
        *counts.entry(*identifier).or_default() += 1;
    }

    let names: Vec<String> = entries
        .iter()
        .filter(|(identifier, _)| counts.get(identifier).copied().unwrap_or(0) > 1)
        .map(|(identifier, path)| format!("{} (.{})", path.display(), identifier))
        .collect();

    if names.is_empty() {
        Ok(())
    } else {
        Err(GlueError::DuplicateIdentifiers { names })
    }
}
