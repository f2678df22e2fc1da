//! Environment variable overrides

use crate::error::{FlError, FlResult};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use super::model::FlsyncConfig;

/// Apply `FLSYNC_*` environment variables on top of a loaded configuration
pub fn apply_env_overrides(config: &mut FlsyncConfig) -> FlResult<()> {
    if let Ok(path) = env::var("FLSYNC_STORAGE_PATH") {
        config.storage_path = PathBuf::from(path);
    }

    if let Ok(enabled) = env::var("FLSYNC_SYNC_CHANGES") {
        config.sync_changes.enabled = parse_bool("FLSYNC_SYNC_CHANGES", &enabled)?;
    }

    if let Ok(delay) = env::var("FLSYNC_MERGE_DELAY_MS") {
        let millis: u64 = delay
            .parse()
            .map_err(|_| {
                FlError::config_with_context(
                    format!("Invalid merge delay `{}`", delay),
                    "FLSYNC_MERGE_DELAY_MS",
                )
            })?;
        config.sync_changes.merging_delay = Duration::from_millis(millis);
    }

    if let Ok(level) = env::var("FLSYNC_LOG_LEVEL") {
        config.logging.level = level;
    }

    Ok(())
}

fn parse_bool(name: &str, value: &str) -> FlResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(FlError::config_with_context(
            format!("Invalid boolean `{}`", value),
            name,
        )),
    }
}
