use std::path::Path;

use anyhow::{Context, Result};

use super::types::SheetConfigFile;

/// Per-directory settings file name.
pub const CONFIG_FILENAME: &str = "sprite.json";

impl SheetConfigFile {
    /// Load a settings file from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let config: SheetConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load `sprite.json` from a directory, if present.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(CONFIG_FILENAME);
        if !path.is_file() {
            return Ok(None);
        }
        Self::load(&path).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PaddingValue, RatiosValue};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempdir().unwrap();
        assert!(SheetConfigFile::load_from_dir(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            r#"{ "padding": "4 2", "algorithm": "vertical", "ratios": "1,2", "crop": true }"#,
        )
        .unwrap();

        let layer = SheetConfigFile::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(
            layer.padding,
            Some(PaddingValue::Declaration("4 2".to_string()))
        );
        assert_eq!(layer.algorithm.as_deref(), Some("vertical"));
        assert_eq!(layer.ratios, Some(RatiosValue::Text("1,2".to_string())));
        assert_eq!(layer.crop, Some(true));
        assert_eq!(layer.margin, None);
    }

    #[test]
    fn test_numeric_values() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            r#"{ "padding": 3, "ratios": [1, 1.5], "compress": "max" }"#,
        )
        .unwrap();

        let layer = SheetConfigFile::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(layer.padding, Some(PaddingValue::Pixels(3)));
        assert_eq!(layer.ratios, Some(RatiosValue::List(vec![1.0, 1.5])));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{ "colour": "red" }"#).unwrap();

        assert!(SheetConfigFile::load_from_dir(dir.path()).is_err());
    }
}
