//! Configuration management.
//!
//! This module resolves where Aurorae Haven keeps its data and loads the
//! optional `config.json`.
//!
//! # Layout
//!
//! Everything lives under one data directory, `~/.aurorae-haven/` by default:
//! - `data/haven.db` - SQLite structured store
//! - `data/storage.json` - key-string store
//! - `data/session.json` - session-scoped key-string store
//! - `config.json` - optional settings

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::reload::DEFAULT_RELOAD_DELAY;

/// Default base path the app is served under.
pub const DEFAULT_BASE_PATH: &str = "/aurorae-haven/";

/// Get the global data directory location (`~/.aurorae-haven/`).
#[must_use]
pub fn global_haven_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".aurorae-haven"))
}

/// Resolve the data directory.
///
/// Priority:
/// 1. If `explicit_dir` is provided, use it directly
/// 2. `HAVEN_DIR` environment variable
/// 3. Global location: `~/.aurorae-haven/`
#[must_use]
pub fn resolve_haven_dir(explicit_dir: Option<&Path>) -> Option<PathBuf> {
    if let Some(dir) = explicit_dir {
        return Some(dir.to_path_buf());
    }

    if let Ok(dir) = std::env::var("HAVEN_DIR") {
        if !dir.trim().is_empty() {
            return Some(PathBuf::from(dir));
        }
    }

    global_haven_dir()
}

/// Resolve the structured store database path.
///
/// Priority:
/// 1. If `explicit_path` is provided, use it directly
/// 2. `HAVEN_DB` environment variable
/// 3. `<haven_dir>/data/haven.db`
#[must_use]
pub fn resolve_db_path(explicit_path: Option<&Path>, haven_dir: &Path) -> PathBuf {
    if let Some(path) = explicit_path {
        return path.to_path_buf();
    }

    if let Ok(db_path) = std::env::var("HAVEN_DB") {
        if !db_path.trim().is_empty() {
            return PathBuf::from(db_path);
        }
    }

    haven_dir.join("data").join("haven.db")
}

/// Path of the key-string store file.
#[must_use]
pub fn storage_path(haven_dir: &Path) -> PathBuf {
    haven_dir.join("data").join("storage.json")
}

/// Path of the session-scoped store file.
#[must_use]
pub fn session_path(haven_dir: &Path) -> PathBuf {
    haven_dir.join("data").join("session.json")
}

/// Path of the settings file.
#[must_use]
pub fn config_path(haven_dir: &Path) -> PathBuf {
    haven_dir.join("config.json")
}

/// Settings read from `config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HavenConfig {
    /// Prefix the app is served under; stripped from redirect paths
    pub base_path: String,

    /// Delay before state is re-read after an import
    pub reload_delay_ms: u64,

    /// Whether to use the SQLite structured store at all
    pub structured_store: bool,
}

impl Default for HavenConfig {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_BASE_PATH.to_string(),
            reload_delay_ms: u64::try_from(DEFAULT_RELOAD_DELAY.as_millis()).unwrap_or(1500),
            structured_store: true,
        }
    }
}

impl HavenConfig {
    #[must_use]
    pub fn reload_delay(&self) -> Duration {
        Duration::from_millis(self.reload_delay_ms)
    }
}

/// Load settings from `<haven_dir>/config.json`.
///
/// A missing file yields the defaults.
///
/// # Errors
///
/// Returns [`Error::Config`] if the file exists but cannot be read or parsed.
pub fn load_config(haven_dir: &Path) -> Result<HavenConfig> {
    let path = config_path(haven_dir);

    if !path.exists() {
        debug!(path = %path.display(), "No config file, using defaults");
        return Ok(HavenConfig::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Failed to read config file: {e}")))?;

    serde_json::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse config file: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_haven_dir_with_explicit() {
        let explicit = PathBuf::from("/custom/haven");
        assert_eq!(resolve_haven_dir(Some(&explicit)), Some(explicit));
    }

    #[test]
    fn test_resolve_db_path_with_explicit() {
        let explicit = PathBuf::from("/custom/path/haven.sqlite");
        let result = resolve_db_path(Some(&explicit), Path::new("/ignored"));
        assert_eq!(result, explicit);
    }

    #[test]
    fn test_global_haven_dir_returns_some() {
        let dir = global_haven_dir().unwrap();
        assert!(dir.ends_with(".aurorae-haven"));
    }

    #[test]
    fn test_store_paths_share_data_dir() {
        let dir = Path::new("/home/me/.aurorae-haven");
        assert_eq!(storage_path(dir), dir.join("data").join("storage.json"));
        assert_eq!(session_path(dir), dir.join("data").join("session.json"));
        assert_eq!(config_path(dir), dir.join("config.json"));
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_config(temp_dir.path()).unwrap();
        assert_eq!(config, HavenConfig::default());
        assert_eq!(config.base_path, "/aurorae-haven/");
        assert_eq!(config.reload_delay(), Duration::from_millis(1500));
        assert!(config.structured_store);
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            config_path(temp_dir.path()),
            r#"{"basePath": "/", "reloadDelayMs": 0}"#,
        )
        .unwrap();

        let config = load_config(temp_dir.path()).unwrap();
        assert_eq!(config.base_path, "/");
        assert_eq!(config.reload_delay_ms, 0);
        assert!(config.structured_store);
    }

    #[test]
    fn test_unparseable_config_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(config_path(temp_dir.path()), "{basePath").unwrap();

        let err = load_config(temp_dir.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
