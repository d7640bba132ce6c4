mod css;
mod format;
mod html;
mod json;

use std::fs;
use std::path::{Component, Path, PathBuf};

pub use css::{image_url, nearest_fraction, render_stylesheet, stylesheet_file_name, write_stylesheet};
pub use format::save_canvas_png;
pub use html::{html_file_name, render_test_html, write_test_html};
pub use json::{descriptor_file_name, write_descriptor};

use crate::error::GlueError;

/// Write `data` to a sibling temp file and rename it over `path`, so readers
/// never see a half-written artifact.
pub(crate) fn write_atomic(path: &Path, data: &[u8]) -> Result<(), GlueError> {
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    let result = fs::write(&tmp, data).and_then(|()| fs::rename(&tmp, path));
    result.map_err(|e| {
        let _ = fs::remove_file(&tmp);
        GlueError::OutputWrite {
            path: path.to_path_buf(),
            source: e,
        }
    })
}

/// Express `path` relative to the directory `base`, walking up with `..`
/// where needed.
///
/// Both paths must be in the same form (both absolute or both relative to the
/// same directory). If no relative form exists, e.g. different Windows drives,
/// the original path is returned.
pub fn make_relative(path: &Path, base: &Path) -> String {
    fn parts(path: &Path) -> Vec<Component<'_>> {
        path.components()
            .filter(|c| *c != Component::CurDir)
            .collect()
    }
    let path_parts = parts(path);
    let base_parts = parts(base);

    let common = path_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let has_root = |parts: &[Component]| {
        parts
            .first()
            .is_some_and(|c| matches!(c, Component::Prefix(_) | Component::RootDir))
    };
    if common == 0 && (has_root(&path_parts) || has_root(&base_parts)) {
        return path.to_string_lossy().into_owned();
    }

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push("..");
    }
    for part in &path_parts[common..] {
        relative.push(part.as_os_str());
    }
    relative.to_string_lossy().into_owned()
}

/// Path separators in URLs are always forward slashes.
pub(crate) fn to_url_path(path: &str) -> String {
    path.replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_relative_same_dir() {
        let path = PathBuf::from("/project/sprites/hero.png");
        let base = PathBuf::from("/project");
        assert_eq!(to_url_path(&make_relative(&path, &base)), "sprites/hero.png");
    }

    #[test]
    fn test_make_relative_sibling_dir() {
        let path = PathBuf::from("/site/static/img/icons.png");
        let base = PathBuf::from("/site/static/css");
        assert_eq!(to_url_path(&make_relative(&path, &base)), "../img/icons.png");
    }

    #[test]
    fn test_make_relative_relative_paths() {
        let path = PathBuf::from("./out/icons.png");
        let base = PathBuf::from("out");
        assert_eq!(make_relative(&path, &base), "icons.png");
    }

    #[test]
    fn test_write_atomic_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icons.css");
        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert!(!dir.path().join("icons.css.tmp").exists());
    }

    #[test]
    fn test_write_atomic_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("icons.css");
        let err = write_atomic(&path, b"x").unwrap_err();
        assert!(matches!(err, GlueError::OutputWrite { .. }));
    }
}
