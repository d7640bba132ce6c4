use std::fmt::Write as _;
use std::path::Path;

use anyhow::Result;

use super::{make_relative, to_url_path, write_atomic};
use crate::cache::stylesheet_header;
use crate::config::SheetConfig;
use crate::sheet::{AssetPlacement, SheetDescriptor};

const MAX_DENOMINATOR: i64 = 1000;

/// `icons.css`, or `icons.less` in less mode
pub fn stylesheet_file_name(stem: &str, less: bool) -> String {
    format!("{}.{}", stem, if less { "less" } else { "css" })
}

/// URL of an image artifact as referenced from the stylesheet.
///
/// With a `url` prefix the file name is appended to it; otherwise the path is
/// relative from the stylesheet directory to the image directory.
pub fn image_url(
    file: &str,
    config: &SheetConfig,
    digest: &str,
    img_dir: &Path,
    css_dir: &Path,
) -> String {
    let mut url = if config.url.is_empty() {
        to_url_path(&make_relative(&img_dir.join(file), css_dir))
    } else if config.url.ends_with('/') {
        format!("{}{}", config.url, file)
    } else {
        format!("{}/{}", config.url, file)
    };

    if config.cachebuster {
        url.push('?');
        url.push_str(&digest[..digest.len().min(6)]);
    }
    url
}

/// Render the stylesheet text. `urls` holds one image URL per entry of
/// `descriptor.images`.
pub fn render_stylesheet(descriptor: &SheetDescriptor, urls: &[String]) -> String {
    let ratio = descriptor.canonical_ratio;
    let margin = f64::from(descriptor.margin) * ratio;
    let base_url = descriptor
        .images
        .iter()
        .zip(urls)
        .find(|(image, _)| image.ratio == 1.0)
        .map_or("", |(_, url)| url.as_str());

    let mut css = String::new();
    let _ = writeln!(css, "{}", stylesheet_header(&descriptor.digest));

    let selectors = grouped_selectors(&descriptor.assets);
    let _ = writeln!(
        css,
        "{}{{background-image:url('{}');background-repeat:no-repeat}}",
        selectors, base_url
    );

    for asset in &descriptor.assets {
        let x = css_pixels((-f64::from(asset.x) - margin) / ratio);
        let y = css_pixels((-f64::from(asset.y) - margin) / ratio);
        let width = css_pixels(f64::from(asset.width) / ratio + f64::from(asset.padding.horizontal()));
        let height =
            css_pixels(f64::from(asset.height) / ratio + f64::from(asset.padding.vertical()));
        let _ = writeln!(
            css,
            ".{}{{background-position:{}px {}px;width:{}px;height:{}px;}}",
            asset.identifier, x, y, width, height
        );
    }

    if descriptor.images.len() > 1 {
        let base_size = descriptor
            .images
            .iter()
            .find(|image| image.ratio == 1.0)
            .map_or(descriptor.size, |image| image.size);

        for (image, url) in descriptor.images.iter().zip(urls) {
            if image.ratio == 1.0 {
                continue;
            }
            let _ = writeln!(
                css,
                "@media only screen and (-webkit-min-device-pixel-ratio: {r}), \
                 only screen and (min--moz-device-pixel-ratio: {r}), \
                 only screen and (-o-min-device-pixel-ratio: {f}), \
                 only screen and (min-device-pixel-ratio: {r}) {{\
                 {s}{{background-image:url('{u}');\
                 -webkit-background-size: {w}px {h}px;\
                 -moz-background-size: {w}px {h}px;\
                 background-size: {w}px {h}px;}}}}",
                r = image.ratio,
                f = nearest_fraction(image.ratio),
                s = selectors,
                u = url,
                w = base_size.width,
                h = base_size.height,
            );
        }
    }

    css
}

/// Write the stylesheet for `descriptor` to `path`.
pub fn write_stylesheet(path: &Path, descriptor: &SheetDescriptor, urls: &[String]) -> Result<()> {
    write_atomic(path, render_stylesheet(descriptor, urls).as_bytes())?;
    Ok(())
}

/// Every selector of the sheet, one per line. Pseudo-class variants are left
/// out when their base identifier is already listed.
fn grouped_selectors(assets: &[AssetPlacement]) -> String {
    let is_listed = |base: &str| assets.iter().any(|a| a.identifier == base);
    assets
        .iter()
        .filter(|a| match a.identifier.split_once(':') {
            Some((base, _)) => !is_listed(base),
            None => true,
        })
        .map(|a| format!(".{}", a.identifier))
        .collect::<Vec<_>>()
        .join(",\n")
}

/// Round a CSS pixel offset up, keeping the sign
#[expect(
    clippy::cast_possible_truncation,
    reason = "css offsets are far inside the i64 range"
)]
fn css_pixels(value: f64) -> i64 {
    let rounded = value.ceil() as i64;
    if rounded == 0 { 0 } else { rounded }
}

/// Closest `n/d` for a ratio, as used by `-o-min-device-pixel-ratio`
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "ratios and denominators are small"
)]
pub fn nearest_fraction(value: f64) -> String {
    let mut best = (value.round() as i64, 1_i64);
    let mut best_error = (value - best.0 as f64).abs();
    for denominator in 2..=MAX_DENOMINATOR {
        if best_error == 0.0 {
            break;
        }
        let numerator = (value * denominator as f64).round() as i64;
        let error = (value - numerator as f64 / denominator as f64).abs();
        if error < best_error {
            best = (numerator, denominator);
            best_error = error;
        }
    }
    format!("{}/{}", best.0, best.1)
}
