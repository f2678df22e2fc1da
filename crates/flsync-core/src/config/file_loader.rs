//! File-based configuration loading

use crate::error::{FlError, FlResult};
use std::fs;
use std::path::Path;

use super::model::FlsyncConfig;

/// Load configuration from a file
///
/// Supports JSON, TOML, and YAML formats based on file extension.
/// Returns default config if file doesn't exist.
pub fn load_from_file(path: &Path) -> FlResult<FlsyncConfig> {
    if !path.exists() {
        tracing::debug!("Config file {:?} not found, using defaults", path);
        return Ok(FlsyncConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        FlError::config_with_context(
            format!("Failed to read config file: {}", e),
            format!("Reading configuration from '{}'", path.display()),
        )
    })?;

    let config: FlsyncConfig = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|e| {
            FlError::config_with_context(
                format!("Failed to parse TOML config: {}", e),
                format!("Deserializing TOML configuration from '{}'", path.display()),
            )
        })?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(|e| {
            FlError::config_with_context(
                format!("Failed to parse YAML config: {}", e),
                format!("Deserializing YAML configuration from '{}'", path.display()),
            )
        })?,
        _ => serde_json::from_str(&content).map_err(|e| {
            FlError::config_with_context(
                format!("Failed to parse JSON config: {}", e),
                format!("Deserializing JSON configuration from '{}'", path.display()),
            )
        })?,
    };

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogFormat;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_from_file(&temp_dir.path().join("absent.toml")).unwrap();
        assert!(config.sync_changes.enabled);
    }

    #[test]
    fn test_load_from_toml_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("flsync.toml");
        fs::write(
            &config_path,
            r#"
storage_path = "history/storage"

[sync_changes]
enabled = false
merging_delay = "50ms"

[logging]
level = "debug"
format = "json"
"#,
        )
        .unwrap();

        let config = load_from_file(&config_path).unwrap();
        assert_eq!(config.storage_path, PathBuf::from("history/storage"));
        assert!(!config.sync_changes.enabled);
        assert_eq!(config.sync_changes.merging_delay, Duration::from_millis(50));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_load_from_yaml_file_with_partial_sections() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("flsync.yaml");
        fs::write(&config_path, "sync_changes:\n  merging_delay: 1s\n").unwrap();

        let config = load_from_file(&config_path).unwrap();
        assert!(config.sync_changes.enabled);
        assert_eq!(config.sync_changes.merging_delay, Duration::from_secs(1));
        assert_eq!(config.storage_path, PathBuf::from(".flsync/storage"));
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("flsync.json");
        fs::write(&config_path, "{ not json").unwrap();

        let err = load_from_file(&config_path).unwrap_err();
        assert_eq!(err.error_code(), "FL_CONFIG");
    }
}
