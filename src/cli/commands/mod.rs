//! Command implementations.

pub mod completions;
pub mod export;
pub mod import;
pub mod redirect;
pub mod status;
pub mod version;

use std::path::PathBuf;

use tracing::warn;

use crate::config::{
    HavenConfig, load_config, resolve_db_path, resolve_haven_dir, session_path, storage_path,
};
use crate::error::{Error, Result};
use crate::storage::{FileStore, SqliteStore, StorageAdapter};

/// Resolved data directory, store locations and settings for one command.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub dir: PathBuf,
    pub db_path: PathBuf,
    pub config: HavenConfig,
}

impl Workspace {
    /// Resolve paths and load `config.json`.
    ///
    /// `--no-structured` overrides the config's `structuredStore`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no data directory can be determined or
    /// the config file is invalid.
    pub fn resolve(
        data_dir: Option<&PathBuf>,
        db_path: Option<&PathBuf>,
        no_structured: bool,
    ) -> Result<Self> {
        let dir = resolve_haven_dir(data_dir.map(PathBuf::as_path))
            .ok_or_else(|| Error::Config("Could not determine home directory".into()))?;
        let db_path = resolve_db_path(db_path.map(PathBuf::as_path), &dir);

        let mut config = load_config(&dir)?;
        if no_structured {
            config.structured_store = false;
        }

        Ok(Self {
            dir,
            db_path,
            config,
        })
    }

    /// Open the storage adapter.
    ///
    /// If the structured store cannot be opened the adapter runs on the
    /// key-string store alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the key-string store cannot be opened.
    pub fn open_storage(&self) -> Result<StorageAdapter> {
        let kv = FileStore::open(&storage_path(&self.dir))?;
        let adapter = StorageAdapter::new(Box::new(kv));

        if !self.config.structured_store {
            return Ok(adapter);
        }
        match SqliteStore::open(&self.db_path) {
            Ok(store) => Ok(adapter.with_structured(Box::new(store))),
            Err(e) => {
                warn!(path = %self.db_path.display(), error = %e, "Structured store unavailable");
                Ok(adapter)
            }
        }
    }

    /// Open the session-scoped store.
    ///
    /// # Errors
    ///
    /// Returns an error if the session file exists but is unreadable.
    pub fn open_session(&self) -> Result<FileStore> {
        FileStore::open(&session_path(&self.dir))
    }

    /// Open the structured store read-only for reporting, if it exists.
    #[must_use]
    pub fn existing_structured(&self) -> Option<SqliteStore> {
        if !self.config.structured_store || !self.db_path.exists() {
            return None;
        }
        SqliteStore::open(&self.db_path).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::KeyValueStore;
    use tempfile::TempDir;

    #[test]
    fn test_workspace_layout() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().to_path_buf();
        let ws = Workspace::resolve(Some(&dir), None, false).unwrap();

        assert_eq!(ws.db_path, dir.join("data").join("haven.db"));
        assert!(ws.config.structured_store);

        let storage = ws.open_storage().unwrap();
        assert!(storage.is_structured_store_available());
        assert!(ws.db_path.exists());
    }

    #[test]
    fn test_no_structured_flag() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().to_path_buf();
        let ws = Workspace::resolve(Some(&dir), None, true).unwrap();

        let storage = ws.open_storage().unwrap();
        assert!(!storage.is_structured_store_available());
        assert!(ws.existing_structured().is_none());
    }

    #[test]
    fn test_session_store() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().to_path_buf();
        let ws = Workspace::resolve(Some(&dir), None, false).unwrap();

        let mut session = ws.open_session().unwrap();
        session.set("redirectPath", "/tasks").unwrap();
        assert!(dir.join("data").join("session.json").exists());
    }
}
