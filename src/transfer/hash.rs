//! Content hashing for change detection.
//!
//! By hashing the serialized JSON of a domain, the structured store can
//! skip rewriting domains that an import leaves unchanged.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Compute a SHA256 hash of a serializable value.
///
/// The value is first serialized to JSON, then hashed.
///
/// # Panics
///
/// Panics if the value cannot be serialized to JSON. This cannot happen
/// for the record types and `serde_json::Value`s hashed here.
#[must_use]
pub fn content_hash<T: Serialize + ?Sized>(value: &T) -> String {
    let json = serde_json::to_string(value).expect("serialization should not fail");
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Check if content has changed since it was last stored.
///
/// Returns `true` if there is no stored hash or it differs.
#[must_use]
pub fn has_changed(current_hash: &str, stored_hash: Option<&str>) -> bool {
    stored_hash.is_none_or(|h| h != current_hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_hash_deterministic() {
        let value = json!([{"id": "note_1", "title": "My Note"}]);

        let hash1 = content_hash(&value);
        let hash2 = content_hash(&value);

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_content_hash_changes_with_content() {
        assert_ne!(
            content_hash(&json!([{"id": 1}])),
            content_hash(&json!([{"id": 2}]))
        );
    }

    #[test]
    fn test_has_changed() {
        assert!(has_changed("abc123", None));
        assert!(has_changed("abc123", Some("xyz789")));
        assert!(!has_changed("abc123", Some("abc123")));
    }
}
