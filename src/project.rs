//! Sheet discovery and the per-sheet build pipeline.
//!
//! In simple mode the source directory is one sheet. In project mode every
//! visible subdirectory is a sheet of its own and identifiers must be unique
//! across all of them.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::cache::{BuildCache, compute_digest};
use crate::cli::CliArgs;
use crate::config::{SheetConfig, SheetConfigFile};
use crate::error::GlueError;
use crate::output::{
    descriptor_file_name, html_file_name, image_url, save_canvas_png, stylesheet_file_name,
    write_descriptor, write_stylesheet, write_test_html,
};
use crate::sheet::{
    CanvasComposer, Sheet, SheetDescriptor, check_identifiers, file_stem, ratio_suffix,
};
use crate::sprite::{AssetName, SourceFile, decode_assets, scan_sources};

/// Where generated files go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDirs {
    pub img: PathBuf,
    pub css: PathBuf,
}

impl OutputDirs {
    /// `img`/`css` override `output`; at least one of them must be known.
    pub fn new(output: Option<&Path>, img: Option<&Path>, css: Option<&Path>) -> Option<Self> {
        Some(Self {
            img: img.or(output)?.to_path_buf(),
            css: css.or(output)?.to_path_buf(),
        })
    }

    fn create(&self) -> Result<()> {
        for dir in [&self.img, &self.css] {
            fs::create_dir_all(dir).map_err(|e| GlueError::OutputWrite {
                path: dir.clone(),
                source: e,
            })?;
        }
        Ok(())
    }
}

/// Everything one invocation needs besides the cache
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub source: PathBuf,
    pub project: bool,
    /// Command-line settings, the highest-priority layer
    pub overrides: SheetConfigFile,
    pub dirs: OutputDirs,
}

impl BuildOptions {
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let dirs = OutputDirs::new(args.output.as_deref(), args.img.as_deref(), args.css.as_deref())
            .context("no output directory given; pass <OUTPUT> or both --img and --css")?;
        Ok(Self {
            source: args.source.clone(),
            project: args.project,
            overrides: args.to_config_layer(),
            dirs,
        })
    }
}

/// Result of building one sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStatus {
    /// At least one artifact was written
    Built,
    /// Every artifact already carried the current digest
    UpToDate,
}

#[derive(Debug, Clone)]
pub struct SheetReport {
    pub name: String,
    pub digest: String,
    pub status: BuildStatus,
    /// Present when the sheet was packed in this run
    pub descriptor: Option<SheetDescriptor>,
}

/// A sheet that has been scanned and hashed but not decoded
#[derive(Debug)]
struct SheetPlan {
    name: String,
    path: PathBuf,
    config: SheetConfig,
    sources: Vec<SourceFile>,
    names: Vec<AssetName>,
    digest: String,
}

/// Build every sheet under `options.source`.
///
/// All sheets are scanned and their identifiers validated before anything is
/// written. Sheets are then built one after another.
pub fn run(options: &BuildOptions, cache: &mut BuildCache) -> Result<Vec<SheetReport>> {
    // Fail on bad command-line values before touching the filesystem.
    SheetConfig::resolve(&[&options.overrides])?;

    if !options.source.is_dir() {
        return Err(GlueError::InputNotFound(options.source.clone()).into());
    }

    let plans = if options.project {
        let project_layer = SheetConfigFile::load_from_dir(&options.source)?.unwrap_or_default();
        let discovery = SheetConfig::resolve(&[&options.overrides, &project_layer])?;
        find_sheet_dirs(&options.source, discovery.follow_links)?
            .into_iter()
            .map(|dir| plan_sheet(&dir, &options.overrides, Some(&project_layer)))
            .collect::<Result<Vec<_>>>()?
    } else {
        vec![plan_sheet(&options.source, &options.overrides, None)?]
    };

    check_identifiers(plans.iter().flat_map(|plan| {
        plan.names
            .iter()
            .zip(&plan.sources)
            .map(|(name, source)| (name.identifier.as_str(), source.path.as_path()))
    }))?;

    options.dirs.create()?;

    plans
        .into_iter()
        .map(|plan| build_sheet(plan, &options.dirs, cache))
        .collect()
}

/// Visible subdirectories of a project, sorted by name. Symbolic links count
/// only with `follow_links`.
pub fn find_sheet_dirs(source: &Path, follow_links: bool) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(source)
        .with_context(|| format!("Failed to read directory {}", source.display()))?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read directory {}", source.display()))?;
        let file_name = entry.file_name();
        if file_name.to_string_lossy().starts_with('.') {
            continue;
        }

        let path = entry.path();
        let is_link = entry.file_type().is_ok_and(|t| t.is_symlink());
        if !path.is_dir() || (is_link && !follow_links) {
            continue;
        }
        dirs.push(path);
    }

    if dirs.is_empty() {
        return Err(GlueError::NoSpriteFolders(source.to_path_buf()).into());
    }
    dirs.sort();
    Ok(dirs)
}

/// Sheet name from its directory, resolving `.` and similar
fn sheet_name(dir: &Path) -> String {
    let resolved = fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
    resolved
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sprite".to_string())
}

fn plan_sheet(
    dir: &Path,
    overrides: &SheetConfigFile,
    project_layer: Option<&SheetConfigFile>,
) -> Result<SheetPlan> {
    let name = sheet_name(dir);
    info!("Processing '{}':", name);

    let dir_layer = SheetConfigFile::load_from_dir(dir)?.unwrap_or_default();
    let mut layers = vec![overrides, &dir_layer];
    layers.extend(project_layer);
    let config = SheetConfig::resolve(&layers)
        .with_context(|| format!("Invalid settings for sheet '{}'", name))?;

    let sources = scan_sources(dir, config.recursive, config.follow_links)?;
    let digest = compute_digest(&sources, &config);
    let names: Vec<AssetName> = sources
        .iter()
        .map(|source| AssetName::parse(&source.file_name, &name, &config))
        .collect();
    debug!("Sheet '{}': {} images, digest {}", name, sources.len(), digest);

    Ok(SheetPlan {
        name,
        path: dir.to_path_buf(),
        config,
        sources,
        names,
        digest,
    })
}

fn build_sheet(plan: SheetPlan, dirs: &OutputDirs, cache: &mut BuildCache) -> Result<SheetReport> {
    let config = &plan.config;
    let force = config.force;
    let stem = file_stem(&plan.name, &plan.digest, config.cachebuster_filename);

    let stale_ratios: Vec<f64> = if config.no_img {
        Vec::new()
    } else {
        config
            .ratios
            .iter()
            .copied()
            .filter(|&ratio| {
                let path = dirs
                    .img
                    .join(format!("{}{}.png", stem, ratio_suffix(ratio)));
                !cache.artifact_is_fresh(&path, &plan.digest, force)
            })
            .collect()
    };

    let css_path = dirs.css.join(stylesheet_file_name(&stem, config.less));
    let css_stale = !config.no_css && !cache.stylesheet_is_fresh(&css_path, &plan.digest, force);
    let json_path = dirs.css.join(descriptor_file_name(&stem));
    let json_stale = !cache.descriptor_is_fresh(&json_path, &plan.digest, force);
    let html_path = dirs.css.join(html_file_name(&stem));
    let html_stale = config.html && (force || !html_path.is_file());

    if stale_ratios.is_empty() && !css_stale && !json_stale && !html_stale {
        info!("Sheet '{}' is already up to date", plan.name);
        return Ok(SheetReport {
            name: plan.name,
            digest: plan.digest,
            status: BuildStatus::UpToDate,
            descriptor: None,
        });
    }

    let assets = decode_assets(&plan.sources, &plan.name, config)?;
    let mut sheet = Sheet::new(
        plan.name.clone(),
        plan.path.clone(),
        plan.config.clone(),
        plan.digest.clone(),
        assets,
    );
    sheet.validate()?;
    sheet.process();
    let descriptor = sheet.descriptor();

    // Ratio failures are isolated; the first one is reported at the end.
    let mut first_error: Option<anyhow::Error> = None;

    for rendered in CanvasComposer::new(&sheet).render(&stale_ratios) {
        let path = dirs.img.join(sheet.image_file_name(rendered.ratio));
        match save_canvas_png(&rendered.image, &path, &sheet.digest, config.compress) {
            Ok(()) => {
                cache.record(&path, &sheet.digest);
                info!("Created {}", path.display());
            }
            Err(e) => {
                cache.invalidate(&path);
                warn!("{:#}", e);
                first_error.get_or_insert(e);
            }
        }
    }

    let stylesheet = stylesheet_file_name(&stem, config.less);
    if css_stale {
        let urls: Vec<String> = descriptor
            .images
            .iter()
            .map(|image| image_url(&image.file, config, &sheet.digest, &dirs.img, &dirs.css))
            .collect();
        match write_stylesheet(&css_path, &descriptor, &urls) {
            Ok(()) => {
                cache.record(&css_path, &sheet.digest);
                info!("Created {}", css_path.display());
            }
            Err(e) => {
                cache.invalidate(&css_path);
                warn!("{:#}", e);
                first_error.get_or_insert(e);
            }
        }
    }

    if json_stale || !stale_ratios.is_empty() || css_stale {
        match write_descriptor(&json_path, &descriptor) {
            Ok(()) => cache.record(&json_path, &sheet.digest),
            Err(e) => {
                cache.invalidate(&json_path);
                warn!("{:#}", e);
                first_error.get_or_insert(e);
            }
        }
    }

    if config.html {
        if let Err(e) = write_test_html(&html_path, &descriptor, &stylesheet) {
            warn!("{:#}", e);
            first_error.get_or_insert(e);
        }
    }

    if let Some(e) = first_error {
        return Err(e.context(format!("Failed to write sheet '{}'", sheet.name)));
    }

    Ok(SheetReport {
        name: sheet.name.clone(),
        digest: sheet.digest.clone(),
        status: BuildStatus::Built,
        descriptor: Some(descriptor),
    })
}
