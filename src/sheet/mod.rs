mod builder;
mod compose;
mod ordering;
mod types;

pub use builder::{check_identifiers, ratio_suffix, scaled_size};
pub(crate) use builder::file_stem;
pub use compose::{
    ALPHA_THRESHOLD, CanvasComposer, CanvasImage, IndexedImage, RenderedCanvas, TRANSPARENT_INDEX,
    quantize, scale_canvas,
};
pub use ordering::{OrderingKey, SpriteOrdering};
pub use types::{AssetPlacement, RatioImage, Sheet, SheetDescriptor};
