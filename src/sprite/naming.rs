use crate::config::SheetConfig;

use super::Padding;
use super::padding::parse_token_values;

/// CSS interaction states that may be encoded as a filename token.
pub const PSEUDO_CLASSES: &[&str] = &[
    "link",
    "visited",
    "active",
    "hover",
    "focus",
    "first-letter",
    "first-line",
    "first-child",
    "before",
    "after",
];

/// Separator value that switches identifiers to camelCase.
pub const CAMELCASE_SEPARATOR: &str = "camelcase";

/// Placeholder replaced by the sheet name in `sprite_namespace`.
pub const SPRITE_PLACEHOLDER: &str = "{sprite}";

/// Everything derived from an image's filename, available before decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetName {
    /// File name including extension
    pub file_name: String,
    /// Padding declared by a trailing `_N[-N...]` token
    pub padding: Option<Padding>,
    /// Pseudo-class token, if any
    pub pseudo: Option<&'static str>,
    /// Stable identifier (CSS class name without the leading dot)
    pub identifier: String,
}

impl AssetName {
    pub fn parse(file_name: &str, sheet_name: &str, config: &SheetConfig) -> Self {
        let stem = file_name
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(file_name);
        let tokens: Vec<&str> = stem.split('_').collect();

        // The first token is always part of the name.
        let padding_index = if config.ignore_filename_paddings {
            None
        } else {
            (1..tokens.len())
                .rev()
                .find(|&i| parse_token_values(tokens[i]).is_some())
        };
        let padding = padding_index.and_then(|i| Padding::parse_token(tokens[i]));

        let pseudo_index = (1..tokens.len())
            .rev()
            .find(|&i| Some(i) != padding_index && pseudo_class(tokens[i]).is_some());
        let pseudo = pseudo_index.and_then(|i| pseudo_class(tokens[i]));

        let base: Vec<&str> = tokens
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != padding_index && Some(*i) != pseudo_index)
            .map(|(_, token)| *token)
            .collect();
        let mut name = clean(&base.join("_"));
        if let Some(pseudo) = pseudo {
            name.push(':');
            name.push_str(pseudo);
        }

        Self {
            file_name: file_name.to_string(),
            padding,
            pseudo,
            identifier: build_identifier(name, sheet_name, config),
        }
    }
}

fn pseudo_class(token: &str) -> Option<&'static str> {
    PSEUDO_CLASSES.iter().copied().find(|p| *p == token)
}

/// Keep only characters valid in a CSS class name segment.
pub fn clean(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

fn build_identifier(name: String, sheet_name: &str, config: &SheetConfig) -> String {
    let mut parts = Vec::with_capacity(3);

    if !config.namespace.is_empty() {
        parts.push(config.namespace.clone());
    }
    if !config.sprite_namespace.is_empty() {
        parts.push(
            config
                .sprite_namespace
                .replace(SPRITE_PLACEHOLDER, &clean(sheet_name)),
        );
    }
    parts.push(name);

    if config.separator == CAMELCASE_SEPARATOR {
        return parts
            .iter()
            .enumerate()
            .map(|(i, part)| if i == 0 { part.clone() } else { capitalize(part) })
            .collect();
    }

    parts.join(&config.separator)
}

fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
