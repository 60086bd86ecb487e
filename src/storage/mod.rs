//! Persistence layer for Aurorae Haven.
//!
//! Two storage ports are defined here:
//! - [`KeyValueStore`] - one JSON-encoded string per key, always available
//! - [`StructuredStore`] - per-record database, preferred when it responds
//!
//! [`StorageAdapter`] chains them: reads and writes go to the structured
//! store first and fall back to the key-string store.
//!
//! # Submodules
//!
//! - [`adapter`] - Fallback chain over both ports
//! - [`kv`] - In-memory and JSON-file key-string stores
//! - [`migrations`] - Legacy key/shape migration table
//! - [`schema`] - Structured store schema
//! - [`sqlite`] - SQLite structured store

pub mod adapter;
pub mod kv;
pub mod migrations;
pub mod schema;
pub mod sqlite;

pub use adapter::{StorageAdapter, WriteBackend};
pub use kv::{FileStore, MemoryStore};
pub use migrations::{KEY_MIGRATIONS, KeyMigration, LegacyEntries, LegacyShape};
pub use sqlite::{DomainSummary, SqliteStore};

use serde_json::Value;

use crate::error::Result;
use crate::model::{Domain, ImportDocument};

/// Key-string store port.
pub trait KeyValueStore {
    /// Read the string stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Structured (per-record) store port.
pub trait StructuredStore {
    /// Capability probe. Never errors; `false` means "do not use".
    fn is_available(&self) -> bool;

    /// Persist every domain present in `document`, plus its compatibility
    /// fields under their legacy keys. Absent domains are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if any part of the write fails.
    fn import_all(&mut self, document: &ImportDocument) -> Result<()>;

    /// Records of a domain, or `None` if the domain was never written.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn load_domain(&self, domain: Domain) -> Result<Option<Vec<Value>>>;

    /// Raw value stored under a legacy key.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn load_legacy(&self, key: &str) -> Result<Option<Value>>;
}
