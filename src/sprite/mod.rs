mod asset;
mod crop;
mod loader;
mod naming;
mod padding;

pub use asset::{Asset, SourceFile, padded_extent, round_up};
pub use crop::{ContentBox, crop_to_content};
pub use loader::{SUPPORTED_EXTENSIONS, decode_assets, is_supported_image, scan_sources};
pub use naming::{AssetName, CAMELCASE_SEPARATOR, PSEUDO_CLASSES, clean};
pub use padding::Padding;
