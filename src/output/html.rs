use std::fmt::Write as _;
use std::path::Path;

use anyhow::Result;

use super::write_atomic;
use crate::sheet::SheetDescriptor;

/// `icons.html`
pub fn html_file_name(stem: &str) -> String {
    format!("{}.html", stem)
}

/// A page showing every non-pseudo identifier next to its rendered sprite.
pub fn render_test_html(descriptor: &SheetDescriptor, stylesheet: &str) -> String {
    let mut rows = String::new();
    for asset in descriptor.assets.iter().filter(|a| a.pseudo.is_none()) {
        let _ = write!(
            rows,
            "\n<tr><td>.{id} </td><td><div class=\"{id}\"></div></td></tr>",
            id = asset.identifier
        );
    }

    format!(
        "<html><head><title>Glue Sprite Test Html</title>\n\
         <link rel=\"stylesheet\" type=\"text/css\" href=\"{stylesheet}\"></head><body>\n\
         <style type=\"text/css\">tr div:hover{{ border:1px solid #ccc;}}\n\
         tr div{{ border:1px solid white;}}</style><h1>CSS Classes</h1><table>\n\
         <tr><th>CSS Class</th><th>Result</th></tr>{rows}</table>\n\
         <p><em>Generated using Glue v{version}</em></p></body></html>\n",
        version = env!("CARGO_PKG_VERSION"),
    )
}

pub fn write_test_html(path: &Path, descriptor: &SheetDescriptor, stylesheet: &str) -> Result<()> {
    write_atomic(path, render_test_html(descriptor, stylesheet).as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packing::Size;
    use crate::sheet::AssetPlacement;
    use crate::sprite::{ContentBox, Padding};

    fn placement(identifier: &str, pseudo: Option<&str>) -> AssetPlacement {
        AssetPlacement {
            identifier: identifier.to_string(),
            pseudo: pseudo.map(str::to_string),
            file: String::new(),
            x: 0,
            y: 0,
            width: 1,
            height: 1,
            padding: Padding::default(),
            content: ContentBox::uncropped(1, 1),
        }
    }

    #[test]
    fn test_html_skips_pseudo_classes() {
        let descriptor = SheetDescriptor {
            name: "icons".to_string(),
            digest: String::new(),
            canonical_ratio: 1.0,
            margin: 0,
            size: Size::new(1, 1),
            images: Vec::new(),
            assets: vec![
                placement("sprite-icons-a", None),
                placement("sprite-icons-a:hover", Some("hover")),
            ],
        };

        let html = render_test_html(&descriptor, "icons.css");

        assert!(html.contains("href=\"icons.css\""));
        assert!(html.contains("<div class=\"sprite-icons-a\"></div>"));
        assert!(!html.contains("a:hover"));
    }
}
