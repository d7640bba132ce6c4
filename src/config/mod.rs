mod load;
mod resolve;
mod types;

pub use load::CONFIG_FILENAME;
pub use resolve::parse_ratios;
pub use types::{CompressConfig, PaddingValue, RatiosValue, SheetConfig, SheetConfigFile};
