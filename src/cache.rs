//! Content-addressed build cache.
//!
//! A sheet's digest covers every source file (path and bytes, in path order)
//! and every settings key that can change the generated files. Artifacts carry
//! the digest they were built from, so an unchanged sheet is detected without
//! decoding a single source image.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::debug;
use sha2::{Digest, Sha256};

use crate::config::SheetConfig;
use crate::sprite::SourceFile;

/// Number of hex characters kept from the hash
pub const DIGEST_LENGTH: usize = 10;

/// PNG text keyword holding the software marker
pub const SOFTWARE_KEYWORD: &str = "Software";

/// PNG text keyword holding the build digest
pub const DIGEST_KEYWORD: &str = "Comment";

/// Compute the build digest of one sheet.
pub fn compute_digest(sources: &[SourceFile], config: &SheetConfig) -> String {
    let mut ordered: Vec<&SourceFile> = sources.iter().collect();
    ordered.sort_by(|a, b| a.path.cmp(&b.path));

    let mut hasher = Sha256::new();
    for source in ordered {
        hasher.update(source.path.to_string_lossy().as_bytes());
        hasher.update([0u8]);
        hasher.update(&source.data);
        hasher.update([0u8]);
    }
    for (key, value) in config.digest_entries() {
        hasher.update(key.as_bytes());
        hasher.update(b"=");
        hasher.update(value.as_bytes());
        hasher.update([0u8]);
    }

    let hex: String = hasher
        .finalize()
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect();
    hex[..DIGEST_LENGTH].to_string()
}

/// Version marker embedded in every artifact
pub fn software_marker() -> String {
    format!("glue-{}", env!("CARGO_PKG_VERSION"))
}

/// First line of a generated stylesheet
pub fn stylesheet_header(digest: &str) -> String {
    format!("/* glue: {} hash: {} */", env!("CARGO_PKG_VERSION"), digest)
}

/// Metadata read back from a previously written bitmap
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactStamp {
    pub software: Option<String>,
    pub digest: Option<String>,
}

impl ArtifactStamp {
    /// Built by this version from the given digest
    pub fn matches(&self, digest: &str) -> bool {
        self.software.as_deref() == Some(software_marker().as_str())
            && self.digest.as_deref() == Some(digest)
    }
}

/// Read the text stamp of a PNG artifact. Any failure yields `None`.
pub fn read_stamp(path: &Path) -> Option<ArtifactStamp> {
    let file = File::open(path).ok()?;
    let decoder = png::Decoder::new(BufReader::new(file));
    let reader = decoder.read_info().ok()?;

    let mut stamp = ArtifactStamp::default();
    for chunk in &reader.info().uncompressed_latin1_text {
        match chunk.keyword.as_str() {
            SOFTWARE_KEYWORD => stamp.software = Some(chunk.text.clone()),
            DIGEST_KEYWORD => stamp.digest = Some(chunk.text.clone()),
            _ => {}
        }
    }
    Some(stamp)
}

fn read_first_line(path: &Path) -> Option<String> {
    let file = File::open(path).ok()?;
    let mut line = String::new();
    BufReader::new(file).read_line(&mut line).ok()?;
    Some(line.trim_end().to_string())
}

/// The `digest` field of a written descriptor
fn read_descriptor_digest(path: &Path) -> Option<String> {
    let file = File::open(path).ok()?;
    let value: serde_json::Value = serde_json::from_reader(BufReader::new(file)).ok()?;
    value.get("digest")?.as_str().map(str::to_string)
}

/// What an artifact was last known to contain
#[derive(Debug, Clone, PartialEq, Eq)]
enum Known {
    /// Stamped with this digest by this version
    Digest(String),
    /// Missing, unreadable or from another version
    Stale,
}

/// Per-invocation record of artifact freshness.
///
/// Created once at program start and passed through the pipeline; it never
/// outlives the process.
#[derive(Debug, Default)]
pub struct BuildCache {
    known: HashMap<PathBuf, Known>,
}

impl BuildCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the bitmap at `path` was built from `digest`.
    pub fn artifact_is_fresh(&mut self, path: &Path, digest: &str, force: bool) -> bool {
        if force {
            return false;
        }
        let known = self.known.entry(path.to_path_buf()).or_insert_with(|| {
            match read_stamp(path) {
                Some(stamp) if stamp.matches(digest) => Known::Digest(digest.to_string()),
                _ => Known::Stale,
            }
        });
        let fresh = *known == Known::Digest(digest.to_string());
        debug!(
            "{}: {}",
            path.display(),
            if fresh { "up to date" } else { "stale" }
        );
        fresh
    }

    /// Whether the stylesheet at `path` starts with the header for `digest`.
    pub fn stylesheet_is_fresh(&mut self, path: &Path, digest: &str, force: bool) -> bool {
        if force {
            return false;
        }
        let expected = stylesheet_header(digest);
        let known = self.known.entry(path.to_path_buf()).or_insert_with(|| {
            match read_first_line(path) {
                Some(line) if line == expected => Known::Digest(digest.to_string()),
                _ => Known::Stale,
            }
        });
        *known == Known::Digest(digest.to_string())
    }

    /// Whether the JSON descriptor at `path` records `digest`.
    pub fn descriptor_is_fresh(&mut self, path: &Path, digest: &str, force: bool) -> bool {
        if force {
            return false;
        }
        let known = self.known.entry(path.to_path_buf()).or_insert_with(|| {
            match read_descriptor_digest(path) {
                Some(recorded) if recorded == digest => Known::Digest(recorded),
                _ => Known::Stale,
            }
        });
        *known == Known::Digest(digest.to_string())
    }

    /// Remember that `path` now holds the output for `digest`.
    pub fn record(&mut self, path: &Path, digest: &str) {
        self.known
            .insert(path.to_path_buf(), Known::Digest(digest.to_string()));
    }

    /// Mark `path` as stale, e.g. after a failed write.
    pub fn invalidate(&mut self, path: &Path) {
        self.known.insert(path.to_path_buf(), Known::Stale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packing::Algorithm;
    use std::fs;

    fn source(path: &str, data: &[u8]) -> SourceFile {
        SourceFile {
            path: PathBuf::from(path),
            file_name: path.rsplit('/').next().unwrap_or(path).to_string(),
            data: data.to_vec(),
        }
    }

    #[test]
    fn test_digest_is_stable_and_order_independent() {
        let config = SheetConfig::default();
        let a = source("icons/a.png", b"aaaa");
        let b = source("icons/b.png", b"bbbb");

        let first = compute_digest(&[a.clone(), b.clone()], &config);
        let second = compute_digest(&[b, a], &config);

        assert_eq!(first, second);
        assert_eq!(first.len(), DIGEST_LENGTH);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_digest_tracks_bytes_and_settings() {
        let config = SheetConfig::default();
        let base = compute_digest(&[source("a.png", b"\x00\x01\x02")], &config);

        let flipped = compute_digest(&[source("a.png", b"\x00\x01\x03")], &config);
        assert_ne!(base, flipped);

        let renamed = compute_digest(&[source("b.png", b"\x00\x01\x02")], &config);
        assert_ne!(base, renamed);

        let vertical = SheetConfig {
            algorithm: Algorithm::Vertical,
            ..SheetConfig::default()
        };
        assert_ne!(
            base,
            compute_digest(&[source("a.png", b"\x00\x01\x02")], &vertical)
        );
    }

    #[test]
    fn test_digest_ignores_cosmetic_settings() {
        let sources = [source("a.png", b"x")];
        let plain = SheetConfig::default();
        let forced = SheetConfig {
            force: true,
            html: true,
            ..SheetConfig::default()
        };
        assert_eq!(
            compute_digest(&sources, &plain),
            compute_digest(&sources, &forced)
        );
    }

    #[test]
    fn test_missing_artifact_is_stale() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = BuildCache::new();
        let path = dir.path().join("icons.png");

        assert!(!cache.artifact_is_fresh(&path, "0123456789", false));
        assert!(read_stamp(&path).is_none());
    }

    #[test]
    fn test_garbage_artifact_is_stale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icons.png");
        fs::write(&path, b"not a png").unwrap();

        let mut cache = BuildCache::new();
        assert!(!cache.artifact_is_fresh(&path, "0123456789", false));
    }

    #[test]
    fn test_recorded_artifact_is_fresh_unless_forced() {
        let mut cache = BuildCache::new();
        let path = Path::new("out/icons.png");
        cache.record(path, "abc");

        assert!(cache.artifact_is_fresh(path, "abc", false));
        assert!(!cache.artifact_is_fresh(path, "abd", false));
        assert!(!cache.artifact_is_fresh(path, "abc", true));
    }

    #[test]
    fn test_stylesheet_header_stamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icons.css");
        fs::write(&path, format!("{}\n.a {{}}\n", stylesheet_header("abc"))).unwrap();

        assert!(BuildCache::new().stylesheet_is_fresh(&path, "abc", false));
        assert!(!BuildCache::new().stylesheet_is_fresh(&path, "abd", false));
    }

    #[test]
    fn test_descriptor_digest_check() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icons.json");
        fs::write(&path, r#"{"name": "icons", "digest": "abc"}"#).unwrap();

        assert!(BuildCache::new().descriptor_is_fresh(&path, "abc", false));
        assert!(!BuildCache::new().descriptor_is_fresh(&path, "abd", false));
        assert!(!BuildCache::new().descriptor_is_fresh(&path, "abc", true));

        fs::write(&path, "{ not json").unwrap();
        assert!(!BuildCache::new().descriptor_is_fresh(&path, "abc", false));
        assert!(!BuildCache::new().descriptor_is_fresh(&dir.path().join("missing.json"), "abc", false));
    }

    #[test]
    fn test_stamp_matches_current_version_only() {
        let stamp = ArtifactStamp {
            software: Some("glue-0.0.1-old".to_string()),
            digest: Some("abc".to_string()),
        };
        assert!(!stamp.matches("abc"));

        let current = ArtifactStamp {
            software: Some(software_marker()),
            digest: Some("abc".to_string()),
        };
        assert!(current.matches("abc"));
    }
}
