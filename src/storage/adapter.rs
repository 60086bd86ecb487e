//! Storage adapter: structured store first, key-string store as fallback.
//!
//! When a write falls back to the key-string store, the keys it wrote are
//! listed under [`FALLBACK_KEYS`]. Reads of a listed key go to the
//! key-string store first, so a copy left behind in the structured store
//! by an earlier import never shadows newer data. A later successful
//! structured write takes the keys off the list.

use std::collections::BTreeSet;
use std::fmt;

use tracing::{debug, warn};

use super::migrations::compat_fields;
use super::{KeyValueStore, StructuredStore};
use crate::error::{Error, Result};
use crate::model::{Domain, ImportDocument};

/// Key-string key listing keys whose newest copy is in the key-string store.
pub const FALLBACK_KEYS: &str = "havenFallbackKeys";

/// Backend that accepted a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteBackend {
    Structured,
    KeyValue,
}

impl fmt::Display for WriteBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structured => write!(f, "structured"),
            Self::KeyValue => write!(f, "key-value"),
        }
    }
}

/// Chain over the two storage ports.
pub struct StorageAdapter {
    kv: Box<dyn KeyValueStore>,
    structured: Option<Box<dyn StructuredStore>>,
}

impl StorageAdapter {
    /// Adapter over a key-string store only.
    #[must_use]
    pub fn new(kv: Box<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            structured: None,
        }
    }

    /// Attach a structured store in front of the key-string store.
    #[must_use]
    pub fn with_structured(mut self, store: Box<dyn StructuredStore>) -> Self {
        self.structured = Some(store);
        self
    }

    /// Whether a structured store is attached and answering.
    #[must_use]
    pub fn is_structured_store_available(&self) -> bool {
        self.structured.as_ref().is_some_and(|s| s.is_available())
    }

    /// The key-string store.
    #[must_use]
    pub fn key_value(&self) -> &dyn KeyValueStore {
        self.kv.as_ref()
    }

    /// Persist the domains present in `document`.
    ///
    /// A structured-store failure is logged and the write is retried
    /// through the key-string store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the key-string write fails.
    pub fn write_all(&mut self, document: &ImportDocument) -> Result<WriteBackend> {
        let keys = written_keys(document);

        if self.is_structured_store_available() {
            if let Some(store) = self.structured.as_mut() {
                match store.import_all(document) {
                    Ok(()) => {
                        self.unmark_fallback(&keys);
                        return Ok(WriteBackend::Structured);
                    }
                    Err(e) => {
                        warn!(error = %e, "Structured store write failed, falling back to key-string store");
                    }
                }
            }
        } else if self.structured.is_some() {
            warn!("Structured store unavailable, writing to key-string store");
        }

        self.write_key_value(document, &keys)
            .map_err(|e| Error::Storage(format!("Key-string write failed: {e}")))?;
        Ok(WriteBackend::KeyValue)
    }

    fn write_key_value(&mut self, document: &ImportDocument, keys: &[&str]) -> Result<()> {
        for domain in document.domains() {
            if let Some(records) = document.records(domain) {
                self.kv
                    .set(domain.storage_key(), &serde_json::to_string(records)?)?;
                debug!(domain = %domain, records = records.len(), "Wrote domain");
            }
        }

        for (field, legacy_key) in compat_fields() {
            if let Some(raw) = document.compat_field(field) {
                self.kv.set(legacy_key, &serde_json::to_string(raw)?)?;
                debug!(key = legacy_key, "Restored legacy key");
            }
        }

        let mut marked = self.fallback_keys();
        let before = marked.len();
        marked.extend(keys.iter().map(|k| (*k).to_string()));
        if marked.len() != before {
            self.kv
                .set(FALLBACK_KEYS, &serde_json::to_string(&marked)?)?;
        }
        Ok(())
    }

    /// Raw JSON text stored for a domain.
    ///
    /// Read failures are logged and treated as absent.
    #[must_use]
    pub fn read_domain(&self, domain: Domain) -> Option<String> {
        self.read(domain.storage_key(), |store| {
            store
                .load_domain(domain)?
                .map(|records| serde_json::to_string(&records).map_err(Error::from))
                .transpose()
        })
    }

    /// Raw JSON text stored under a legacy key.
    ///
    /// Read failures are logged and treated as absent.
    #[must_use]
    pub fn read_legacy(&self, key: &str) -> Option<String> {
        self.read(key, |store| {
            Ok(store.load_legacy(key)?.map(|value| value.to_string()))
        })
    }

    fn read<F>(&self, key: &str, load: F) -> Option<String>
    where
        F: Fn(&dyn StructuredStore) -> Result<Option<String>>,
    {
        if self.fallback_keys().contains(key) {
            debug!(key, "Key-string copy is newest");
            return self
                .read_key_value(key)
                .or_else(|| self.read_structured(key, &load));
        }
        self.read_structured(key, &load)
            .or_else(|| self.read_key_value(key))
    }

    fn read_structured<F>(&self, key: &str, load: &F) -> Option<String>
    where
        F: Fn(&dyn StructuredStore) -> Result<Option<String>>,
    {
        let store = self.structured.as_deref().filter(|s| s.is_available())?;
        load(store).unwrap_or_else(|e| {
            warn!(key, error = %e, "Structured store read failed");
            None
        })
    }

    fn read_key_value(&self, key: &str) -> Option<String> {
        self.kv.get(key).unwrap_or_else(|e| {
            warn!(key, error = %e, "Key-string store read failed");
            None
        })
    }

    fn fallback_keys(&self) -> BTreeSet<String> {
        let Some(text) = self.read_key_value(FALLBACK_KEYS) else {
            return BTreeSet::new();
        };
        serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!(error = %e, "Ignoring unreadable fallback key list");
            BTreeSet::new()
        })
    }

    /// Take `keys` off the fallback list after the structured store accepted
    /// them.
    fn unmark_fallback(&mut self, keys: &[&str]) {
        let mut marked = self.fallback_keys();
        let before = marked.len();
        for key in keys {
            marked.remove(*key);
        }
        if marked.len() == before {
            return;
        }

        let result = if marked.is_empty() {
            self.kv.remove(FALLBACK_KEYS)
        } else {
            serde_json::to_string(&marked)
                .map_err(Error::from)
                .and_then(|text| self.kv.set(FALLBACK_KEYS, &text))
        };
        if let Err(e) = result {
            warn!(error = %e, "Failed to update fallback key list");
        }
    }
}

/// Storage keys a write of `document` touches.
fn written_keys(document: &ImportDocument) -> Vec<&'static str> {
    document
        .domains()
        .into_iter()
        .map(|d| d.storage_key())
        .chain(
            compat_fields()
                .filter(|(field, _)| document.compat_field(field).is_some())
                .map(|(_, key)| key),
        )
        .collect()
}

impl fmt::Debug for StorageAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageAdapter")
            .field("structured", &self.structured.is_some())
            .finish_non_exhaustive()
    }
}
