use super::types::{CompressConfig, PaddingValue, RatiosValue, SheetConfig, SheetConfigFile};
use crate::cli::CompressionLevel;
use crate::error::GlueError;
use crate::sprite::Padding;

impl SheetConfigFile {
    /// Stack this layer on top of `lower`; values set here win.
    pub fn over(&self, lower: &SheetConfigFile) -> SheetConfigFile {
        SheetConfigFile {
            padding: self.padding.clone().or_else(|| lower.padding.clone()),
            margin: self.margin.or(lower.margin),
            algorithm: self.algorithm.clone().or_else(|| lower.algorithm.clone()),
            ordering: self.ordering.clone().or_else(|| lower.ordering.clone()),
            ratios: self.ratios.clone().or_else(|| lower.ratios.clone()),
            retina: self.retina.or(lower.retina),
            crop: self.crop.or(lower.crop),
            png8: self.png8.or(lower.png8),
            force: self.force.or(lower.force),
            ignore_filename_paddings: self
                .ignore_filename_paddings
                .or(lower.ignore_filename_paddings),
            recursive: self.recursive.or(lower.recursive),
            follow_links: self.follow_links.or(lower.follow_links),
            namespace: self.namespace.clone().or_else(|| lower.namespace.clone()),
            sprite_namespace: self
                .sprite_namespace
                .clone()
                .or_else(|| lower.sprite_namespace.clone()),
            separator: self.separator.clone().or_else(|| lower.separator.clone()),
            url: self.url.clone().or_else(|| lower.url.clone()),
            cachebuster: self.cachebuster.or(lower.cachebuster),
            cachebuster_filename: self.cachebuster_filename.or(lower.cachebuster_filename),
            no_img: self.no_img.or(lower.no_img),
            no_css: self.no_css.or(lower.no_css),
            html: self.html.or(lower.html),
            less: self.less.or(lower.less),
            compress: self.compress.clone().or_else(|| lower.compress.clone()),
        }
    }
}

impl SheetConfig {
    /// Merge layers, highest priority first, over the defaults.
    ///
    /// Names and numbers are validated here so a bad value fails before any
    /// image is read.
    pub fn resolve(layers: &[&SheetConfigFile]) -> Result<Self, GlueError> {
        let merged = layers
            .iter()
            .rev()
            .fold(SheetConfigFile::default(), |acc, layer| layer.over(&acc));
        let defaults = SheetConfig::default();

        let padding = match merged.padding {
            None => defaults.padding,
            Some(PaddingValue::Pixels(n)) => Padding::uniform(n),
            Some(PaddingValue::Declaration(value)) => Padding::parse_declaration(&value)
                .ok_or(GlueError::InvalidConfigValue {
                    key: "padding",
                    value,
                })?,
        };

        let algorithm = match merged.algorithm.as_deref() {
            Some(name) => name.parse()?,
            None => defaults.algorithm,
        };
        let ordering = match merged.ordering.as_deref() {
            Some(name) => name.parse()?,
            None => defaults.ordering,
        };

        let retina = merged.retina.unwrap_or(defaults.retina);
        let ratios = parse_ratios(merged.ratios.as_ref(), retina)?;

        let compress = merged.compress.map(compression_level).transpose()?;

        Ok(SheetConfig {
            padding,
            margin: merged.margin.unwrap_or(defaults.margin),
            algorithm,
            ordering,
            ratios,
            retina,
            crop: merged.crop.unwrap_or(defaults.crop),
            png8: merged.png8.unwrap_or(defaults.png8),
            force: merged.force.unwrap_or(defaults.force),
            ignore_filename_paddings: merged
                .ignore_filename_paddings
                .unwrap_or(defaults.ignore_filename_paddings),
            recursive: merged.recursive.unwrap_or(defaults.recursive),
            follow_links: merged.follow_links.unwrap_or(defaults.follow_links),
            namespace: merged.namespace.unwrap_or(defaults.namespace),
            sprite_namespace: merged.sprite_namespace.unwrap_or(defaults.sprite_namespace),
            separator: merged.separator.unwrap_or(defaults.separator),
            url: merged.url.unwrap_or(defaults.url),
            cachebuster: merged.cachebuster.unwrap_or(defaults.cachebuster),
            cachebuster_filename: merged
                .cachebuster_filename
                .unwrap_or(defaults.cachebuster_filename),
            no_img: merged.no_img.unwrap_or(defaults.no_img),
            no_css: merged.no_css.unwrap_or(defaults.no_css),
            html: merged.html.unwrap_or(defaults.html),
            less: merged.less.unwrap_or(defaults.less),
            compress,
        })
    }

    /// Highest requested ratio; all positions live in this space.
    pub fn canonical_ratio(&self) -> f64 {
        self.ratios.iter().copied().fold(1.0, f64::max)
    }

    /// Settings that can change the generated files, as `(key, value)` pairs
    /// in key order. `force` and `html` are left out.
    pub fn digest_entries(&self) -> Vec<(&'static str, String)> {
        let padding = self.padding;
        vec![
            ("algorithm", self.algorithm.to_string()),
            ("cachebuster", self.cachebuster.to_string()),
            ("cachebuster_filename", self.cachebuster_filename.to_string()),
            (
                "compress",
                self.compress
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "none".to_string()),
            ),
            ("crop", self.crop.to_string()),
            ("follow_links", self.follow_links.to_string()),
            (
                "ignore_filename_paddings",
                self.ignore_filename_paddings.to_string(),
            ),
            ("less", self.less.to_string()),
            ("margin", self.margin.to_string()),
            ("namespace", self.namespace.clone()),
            ("no_css", self.no_css.to_string()),
            ("no_img", self.no_img.to_string()),
            ("ordering", self.ordering.to_string()),
            (
                "padding",
                format!(
                    "{} {} {} {}",
                    padding.top, padding.right, padding.bottom, padding.left
                ),
            ),
            ("png8", self.png8.to_string()),
            (
                "ratios",
                self.ratios
                    .iter()
                    .map(|r| r.to_string())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            ("recursive", self.recursive.to_string()),
            ("retina", self.retina.to_string()),
            ("separator", self.separator.clone()),
            ("sprite_namespace", self.sprite_namespace.clone()),
            ("url", self.url.clone()),
        ]
    }
}

/// Parse the ratio list, add 2.0 for `retina` and always add 1.0.
pub fn parse_ratios(value: Option<&RatiosValue>, retina: bool) -> Result<Vec<f64>, GlueError> {
    let mut ratios = match value {
        None => Vec::new(),
        Some(RatiosValue::List(list)) => list.clone(),
        Some(RatiosValue::Text(text)) => text
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<f64>()
                    .map_err(|_e| GlueError::InvalidRatio(part.to_string()))
            })
            .collect::<Result<_, _>>()?,
    };

    if let Some(bad) = ratios.iter().find(|r| !r.is_finite() || **r <= 0.0) {
        return Err(GlueError::InvalidRatio(bad.to_string()));
    }

    if retina {
        ratios.push(2.0);
    }
    ratios.push(1.0);
    ratios.sort_by(f64::total_cmp);
    ratios.dedup();

    Ok(ratios)
}

fn compression_level(value: CompressConfig) -> Result<CompressionLevel, GlueError> {
    match value {
        CompressConfig::Level(n) if n <= 6 => Ok(CompressionLevel::Level(n)),
        CompressConfig::Max(s) if s.eq_ignore_ascii_case("max") => Ok(CompressionLevel::Max),
        CompressConfig::Level(n) => Err(GlueError::InvalidConfigValue {
            key: "compress",
            value: n.to_string(),
        }),
        CompressConfig::Max(s) => Err(GlueError::InvalidConfigValue {
            key: "compress",
            value: s,
        }),
    }
}
