//! Merge settings and their on-disk representation.

mod loader;
mod types;

pub use loader::load_settings;
pub use types::{
    ConfigError,
    IndexingConfig,
    MergeSettings,
    ValidationError,
};
