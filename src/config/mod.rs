//! Configuration management.
//!
//! This module resolves where the record store and the sync folder live and
//! loads the optional JSON config file.
//!
//! # Layout
//!
//! - **Config**: `~/.weightlog/config.json` (override with `WEIGHTLOG_CONFIG`)
//! - **Store**: `~/.weightlog/data/weights.txt` unless configured
//! - **Sync folder**: none unless configured; sync is skipped without one

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sync::StabilityPolicy;

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "WEIGHTLOG_CONFIG";

/// Contents of `config.json`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Local record store.
    pub store_path: Option<PathBuf>,

    /// Cloud-drive folder used for export/import.
    pub sync_dir: Option<PathBuf>,

    /// `chrono` format of record dates, used to order the trend chart.
    pub date_format: String,

    /// Import the newest snapshot before record commands.
    pub auto_import: bool,

    /// Stability wait budget for imports.
    pub stability: StabilityPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: None,
            sync_dir: None,
            date_format: "%Y-%m-%d".to_string(),
            auto_import: true,
            stability: StabilityPolicy::default(),
        }
    }
}

/// Get the global weightlog directory location (`~/.weightlog/`).
#[must_use]
pub fn global_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".weightlog"))
}

/// Get the config file path.
///
/// Priority:
/// 1. `WEIGHTLOG_CONFIG` environment variable
/// 2. `~/.weightlog/config.json`
///
/// # Errors
///
/// Returns an error if no home directory can be determined.
pub fn config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    global_dir()
        .map(|dir| dir.join("config.json"))
        .ok_or_else(|| Error::Config("Could not determine home directory".into()))
}

/// Load the configuration from the default location.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

/// Load the configuration from `path`; a missing file gives the defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path).map_err(|e| Error::ConfigFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    serde_json::from_str(&content).map_err(|e| Error::ConfigFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Save the configuration to `path`, creating its directory.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_config_to(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| Error::Config(format!("Failed to create config directory: {e}")))?;
    }

    let content = serde_json::to_string_pretty(config)?;
    fs::write(path, content)
        .map_err(|e| Error::Config(format!("Failed to write config file: {e}")))?;

    Ok(())
}

/// Resolve the record store path.
///
/// Priority:
/// 1. `explicit_path` (the `--store` flag or `WEIGHTLOG_STORE`)
/// 2. `store_path` from the config file
/// 3. `~/.weightlog/data/weights.txt`
#[must_use]
pub fn resolve_store_path(explicit_path: Option<&Path>, config: &Config) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if let Some(path) = &config.store_path {
        return Some(path.clone());
    }

    global_dir().map(|dir| dir.join("data").join("weights.txt"))
}

/// Resolve the sync folder.
///
/// Priority:
/// 1. `explicit_dir` (the `--sync-dir` flag or `WEIGHTLOG_SYNC_DIR`)
/// 2. `sync_dir` from the config file
///
/// Returns `None` when sync is not configured.
#[must_use]
pub fn resolve_sync_dir(explicit_dir: Option<&Path>, config: &Config) -> Option<PathBuf> {
    explicit_dir
        .map(Path::to_path_buf)
        .or_else(|| config.sync_dir.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.date_format, "%Y-%m-%d");
        assert!(config.auto_import);
        assert_eq!(config.sync_dir, None);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_config_from(&temp_dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"sync_dir": "/cloud/weights", "stability": {"max_attempts": 5}}"#,
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();

        assert_eq!(config.sync_dir, Some(PathBuf::from("/cloud/weights")));
        assert_eq!(config.stability.max_attempts, 5);
        assert_eq!(config.stability.sample_delay_ms, 500);
        assert!(config.auto_import);
    }

    #[test]
    fn test_load_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigFile { .. }));
        assert_eq!(err.exit_code(), 7);
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");
        let config = Config {
            sync_dir: Some(PathBuf::from("/cloud")),
            auto_import: false,
            ..Config::default()
        };

        save_config_to(&config, &path).unwrap();

        assert_eq!(load_config_from(&path).unwrap(), config);
    }

    #[test]
    fn test_resolve_store_path_priority() {
        let explicit = PathBuf::from("/custom/weights.txt");
        let config = Config {
            store_path: Some(PathBuf::from("/configured/weights.txt")),
            ..Config::default()
        };

        assert_eq!(resolve_store_path(Some(&explicit), &config), Some(explicit));
        assert_eq!(
            resolve_store_path(None, &config),
            Some(PathBuf::from("/configured/weights.txt"))
        );
    }

    #[test]
    fn test_resolve_store_path_default_is_global() {
        let path = resolve_store_path(None, &Config::default()).unwrap();
        assert!(path.ends_with(".weightlog/data/weights.txt"));
    }

    #[test]
    fn test_resolve_sync_dir() {
        let config = Config {
            sync_dir: Some(PathBuf::from("/configured")),
            ..Config::default()
        };
        assert_eq!(resolve_sync_dir(None, &Config::default()), None);
        assert_eq!(resolve_sync_dir(None, &config), Some(PathBuf::from("/configured")));
        assert_eq!(
            resolve_sync_dir(Some(Path::new("/flag")), &config),
            Some(PathBuf::from("/flag"))
        );
    }
}
