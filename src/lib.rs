pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{cli::LocalStorage, http::HttpSource, toml_config::TomlConfig};

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use core::{
    engine::BenchmarkEngine,
    goals::{AnchorCurve, TrainingFocusTable},
    snapshot::StandardsSnapshot,
    store::{spawn_refresh, ReferenceTables, StandardsStore},
};
pub use utils::error::{Result, SwimBenchError};
