//! Configuration model

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::logging_config::LoggingConfig;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlsyncConfig {
    /// Record store location, relative paths resolve against the course root
    pub storage_path: PathBuf,
    /// Sync-changes tracker settings
    pub sync_changes: SyncChangesConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl Default for FlsyncConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from(".flsync/storage"),
            sync_changes: SyncChangesConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl FlsyncConfig {
    /// Set storage path
    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = path.into();
        self
    }

    /// Set the tracker's merging delay
    pub fn with_merging_delay(mut self, delay: Duration) -> Self {
        self.sync_changes.merging_delay = delay;
        self
    }

    /// Disable the sync-changes tracker
    pub fn without_sync_changes(mut self) -> Self {
        self.sync_changes.enabled = false;
        self
    }

    /// Directory holding the record log and the record table
    pub fn storage_dir(&self, course_root: &Path) -> PathBuf {
        if self.storage_path.is_absolute() {
            self.storage_path.clone()
        } else {
            course_root.join(&self.storage_path)
        }
    }
}

/// Sync-changes tracker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncChangesConfig {
    /// Whether annotations are computed at all
    pub enabled: bool,
    /// Triggers arriving within this window are merged into one pass
    #[serde(with = "humantime_serde")]
    pub merging_delay: Duration,
}

impl Default for SyncChangesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            merging_delay: Duration::from_millis(300),
        }
    }
}
