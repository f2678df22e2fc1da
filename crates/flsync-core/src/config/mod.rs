//! Configuration for flsync
//!
//! Configuration is read from a TOML, YAML or JSON file and then patched by
//! `FLSYNC_*` environment variables.

mod env_loader;
mod file_loader;
mod logging_config;
mod model;

pub use env_loader::apply_env_overrides;
pub use file_loader::load_from_file;
pub use logging_config::{LogFormat, LoggingConfig};
pub use model::{FlsyncConfig, SyncChangesConfig};

use crate::error::FlResult;
use std::path::Path;

/// Load configuration from `path` (defaults when absent) and apply env overrides
pub fn load_config(path: &Path) -> FlResult<FlsyncConfig> {
    let mut config = load_from_file(path)?;
    apply_env_overrides(&mut config)?;
    Ok(config)
}
