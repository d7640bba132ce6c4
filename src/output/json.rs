use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::write_atomic;
use crate::sheet::SheetDescriptor;

#[derive(Serialize)]
struct JsonOutput<'a> {
    meta: Meta,
    #[serde(flatten)]
    sheet: &'a SheetDescriptor,
}

#[derive(Serialize)]
struct Meta {
    app: &'static str,
    version: &'static str,
}

/// `icons.json`
pub fn descriptor_file_name(stem: &str) -> String {
    format!("{}.json", stem)
}

/// Write the sheet descriptor as pretty-printed JSON.
pub fn write_descriptor(path: &Path, descriptor: &SheetDescriptor) -> Result<()> {
    let output = JsonOutput {
        meta: Meta {
            app: "glue",
            version: env!("CARGO_PKG_VERSION"),
        },
        sheet: descriptor,
    };

    let content = serde_json::to_string_pretty(&output)
        .with_context(|| format!("failed to serialize descriptor for '{}'", descriptor.name))?;
    write_atomic(path, content.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packing::Size;
    use crate::sheet::{AssetPlacement, RatioImage};
    use crate::sprite::{ContentBox, Padding};

    #[test]
    fn test_descriptor_json_layout() {
        let descriptor = SheetDescriptor {
            name: "icons".to_string(),
            digest: "abc".to_string(),
            canonical_ratio: 1.0,
            margin: 0,
            size: Size::new(60, 60),
            images: vec![RatioImage {
                ratio: 1.0,
                file: "icons.png".to_string(),
                size: Size::new(60, 60),
            }],
            assets: vec![AssetPlacement {
                identifier: "sprite-icons-cat".to_string(),
                pseudo: None,
                file: "cat_10.png".to_string(),
                x: 0,
                y: 0,
                width: 40,
                height: 40,
                padding: Padding::uniform(10),
                content: ContentBox::uncropped(40, 40),
            }],
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(descriptor_file_name("icons"));
        write_descriptor(&path, &descriptor).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["meta"]["app"], "glue");
        assert_eq!(value["name"], "icons");
        assert_eq!(value["size"]["width"], 60);
        assert_eq!(value["images"][0]["file"], "icons.png");
        assert_eq!(value["assets"][0]["identifier"], "sprite-icons-cat");
        assert_eq!(value["assets"][0]["padding"]["left"], 10);
        assert!(value["assets"][0].get("pseudo").is_none());
    }
}
