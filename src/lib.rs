pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod packing;
pub mod project;
pub mod sheet;
pub mod sprite;

pub use cache::{BuildCache, compute_digest};
pub use cli::CliArgs;
pub use config::{SheetConfig, SheetConfigFile};
pub use error::GlueError;
pub use packing::{Algorithm, PackingAlgorithm};
pub use project::{BuildOptions, BuildStatus, OutputDirs, SheetReport};
pub use sheet::{CanvasComposer, Sheet, SheetDescriptor, SpriteOrdering};
pub use sprite::{Asset, Padding};
