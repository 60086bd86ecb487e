//! JSON import.
//!
//! The pipeline is strictly ordered: read, parse, validate and only then
//! write. Nothing is written unless the whole payload validates. Records
//! are stored exactly as given; once a payload validates, nothing about
//! the individual fields of a record can reject it.

use std::path::Path;

use serde_json::Value;
use tracing::info;

use super::file::read_text;
use crate::error::{Error, Result};
use crate::model::ImportDocument;
use crate::storage::StorageAdapter;
use crate::validate::validate;

/// Import a backup file into `storage`.
///
/// # Errors
///
/// Returns [`Error::FileRead`] if the file cannot be read, or any error
/// from [`import_json_str`].
pub async fn import_json(storage: &mut StorageAdapter, path: &Path) -> Result<bool> {
    let text = read_text(path).await?;
    info!(path = %path.display(), bytes = text.len(), "Read import file");
    import_json_str(storage, &text)
}

/// Import a backup from its JSON text.
///
/// Domains absent from the payload are left untouched in storage.
///
/// # Errors
///
/// Returns [`Error::Import`] if the text is not JSON or does not validate,
/// and [`Error::Storage`] if no backend accepts the write.
pub fn import_json_str(storage: &mut StorageAdapter, text: &str) -> Result<bool> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| Error::Import(format!("Invalid JSON: {e}")))?;

    let report = validate(&value);
    if !report.valid {
        return Err(Error::Import(format!(
            "Invalid data format: {}",
            report.errors.join(", ")
        )));
    }

    // Cannot fail for a validated payload: domains are taken as raw values.
    let document: ImportDocument = serde_json::from_value(value)
        .map_err(|e| Error::Import(format!("Invalid data format: {e}")))?;

    let backend = storage.write_all(&document)?;
    info!(
        backend = %backend,
        domains = document.domains().len(),
        "Imported data"
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Domain;
    use crate::storage::adapter::tests::{FailingStore, flaky_adapter};
    use crate::storage::{KeyValueStore, MemoryStore, SqliteStore};
    use crate::transfer::builder::build_export_document;
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;
    use tempfile::TempDir;

    fn memory_adapter() -> StorageAdapter {
        StorageAdapter::new(Box::new(MemoryStore::new()))
    }

    fn read(adapter: &StorageAdapter, domain: Domain) -> Option<Value> {
        adapter
            .read_domain(domain)
            .map(|text| serde_json::from_str(&text).unwrap())
    }

    #[test]
    fn test_import_notes() {
        let mut adapter = memory_adapter();
        let payload = json!({
            "version": 1,
            "exportedAt": "2025-01-01T00:00:00.000Z",
            "dumps": [{"id": "note_1", "title": "My Note", "content": "# Hello"}]
        });

        assert!(import_json_str(&mut adapter, &payload.to_string()).unwrap());
        assert_eq!(read(&adapter, Domain::Dumps), Some(payload["dumps"].clone()));
    }

    #[test]
    fn test_invalid_json_is_import_error() {
        let mut adapter = memory_adapter();
        let err = import_json_str(&mut adapter, "invalid json{").unwrap_err();

        assert!(matches!(err, Error::Import(_)));
        assert!(err.to_string().contains("Import failed"));
        assert!(err.to_string().contains("Invalid JSON"));
    }

    #[test]
    fn test_invalid_shape_lists_every_error() {
        let mut adapter = memory_adapter();
        let err = import_json_str(&mut adapter, r#"{"tasks": {}, "habits": [1]}"#).unwrap_err();

        let message = err.to_string();
        assert!(message.contains("Invalid data format"));
        assert!(message.contains("Missing required field: version"));
        assert!(message.contains("Missing required field: exportedAt"));
        assert!(message.contains("Field 'tasks' must be an array"));
    }

    #[test]
    fn test_nothing_written_when_invalid() {
        let mut adapter = memory_adapter();
        let _ = import_json_str(
            &mut adapter,
            r#"{"version": 1, "habits": [{"id": "h1"}], "tasks": "oops"}"#,
        );
        assert!(adapter.read_domain(Domain::Habits).is_none());
    }

    #[test]
    fn test_missing_domains_are_untouched() {
        let mut kv = MemoryStore::new();
        kv.set("habits", r#"[{"id":"h1","name":"Keep me"}]"#).unwrap();
        let mut adapter = StorageAdapter::new(Box::new(kv));

        import_json_str(
            &mut adapter,
            r#"{"version":1,"exportedAt":"2025-01-01T00:00:00Z","tasks":[{"id":1}]}"#,
        )
        .unwrap();

        assert_eq!(
            read(&adapter, Domain::Habits),
            Some(json!([{"id": "h1", "name": "Keep me"}]))
        );
        assert_eq!(read(&adapter, Domain::Tasks), Some(json!([{"id": 1}])));
    }

    #[test]
    fn test_structured_failure_retries_through_key_value() {
        let attempts = Rc::new(Cell::new(0));
        let mut adapter = memory_adapter().with_structured(Box::new(FailingStore {
            available: true,
            attempts: Rc::clone(&attempts),
        }));

        let ok = import_json_str(
            &mut adapter,
            r#"{"version":1,"exportedAt":"2025-01-01T00:00:00Z","schedule":[{"day":"mon","blocks":[]}]}"#,
        )
        .unwrap();

        assert!(ok);
        assert_eq!(attempts.get(), 1);
        assert_eq!(
            adapter.key_value().get("schedule").unwrap().as_deref(),
            Some(r#"[{"day":"mon","blocks":[]}]"#)
        );
    }

    #[test]
    fn test_round_trip_reproduces_domains() {
        let source = json!({
            "version": 1,
            "exportedAt": "2025-06-01T08:30:00.000Z",
            "tasks": [{"id": 1_735_689_600_000_u64, "text": "File taxes", "quadrant": "urgent_important", "completed": false}],
            "sequences": [{"id": "r1", "name": "Morning", "steps": [{"id": "s1", "text": "Water", "duration": 60}]}],
            "habits": [{"id": "h1", "name": "Read", "streak": 12, "paused": false, "color": "teal"}],
            "dumps": [{"id": "note_1", "title": "Ideas", "content": "- one", "createdAt": 1_735_689_600_000_u64}],
            "schedule": [{"day": "2025-06-01", "blocks": [{"id": "b1", "type": "routine", "start": "07:00", "end": "07:30"}]}]
        });

        for structured in [false, true] {
            let mut adapter = memory_adapter();
            if structured {
                adapter = adapter.with_structured(Box::new(SqliteStore::open_memory().unwrap()));
            }
            import_json_str(&mut adapter, &source.to_string()).unwrap();

            for domain in Domain::ALL {
                assert_eq!(
                    read(&adapter, domain),
                    Some(source[domain.document_field()].clone()),
                    "{domain} (structured: {structured})"
                );
            }

            let exported = serde_json::to_value(build_export_document(&adapter)).unwrap();
            for domain in Domain::ALL {
                assert_eq!(exported[domain.document_field()], source[domain.document_field()]);
            }
        }
    }

    #[test]
    fn test_reimporting_legacy_export_does_not_duplicate() {
        let mut kv = MemoryStore::new();
        kv.set(
            "aurorae_tasks",
            r#"{"urgent_important":[{"id":1,"text":"A"}],"not_urgent_important":[{"id":2,"text":"B"}]}"#,
        )
        .unwrap();
        let source = StorageAdapter::new(Box::new(kv));
        let first = build_export_document(&source);
        assert_eq!(first.tasks.len(), 2);

        let mut target = memory_adapter();
        import_json_str(&mut target, &serde_json::to_string(&first).unwrap()).unwrap();
        let second = build_export_document(&target);

        assert_eq!(second.tasks, first.tasks);
        assert_eq!(second.aurorae_tasks_data, first.aurorae_tasks_data);
    }

    #[test]
    fn test_round_trip_keeps_nulls_and_unusual_values() {
        let source = json!({
            "version": 1,
            "exportedAt": "2025-06-01T08:30:00.000Z",
            "tasks": [
                {"id": 1, "completed": 0, "quadrant": "someday"},
                {"text": "no id", "createdAt": null}
            ],
            "habits": [{"id": "h1", "streak": 2.5}, {"id": "h2", "streak": -1, "paused": null}],
            "dumps": [{"id": "n1", "title": "T", "category": null, "updatedAt": null}],
            "schedule": [{"day": "mon", "blocks": [{"type": "break", "start": "12:00"}]}]
        });

        for structured in [false, true] {
            let mut adapter = memory_adapter();
            if structured {
                adapter = adapter.with_structured(Box::new(SqliteStore::open_memory().unwrap()));
            }
            assert!(import_json_str(&mut adapter, &source.to_string()).unwrap());

            let exported = serde_json::to_value(build_export_document(&adapter)).unwrap();
            for field in ["tasks", "habits", "dumps", "schedule"] {
                assert_eq!(exported[field], source[field], "{field} (structured: {structured})");
            }
            assert_eq!(
                serde_json::to_string(&exported["dumps"]).unwrap(),
                r#"[{"id":"n1","title":"T","category":null,"updatedAt":null}]"#
            );
        }
    }

    #[test]
    fn test_valid_payload_is_never_rejected_by_field_types() {
        let mut adapter = memory_adapter();
        let payload = r#"{"version":1,"exportedAt":"2025-01-01T00:00:00Z","habits":[{"id":"h1","streak":2.5}],"tasks":[{"id":1,"completed":0}]}"#;
        let value: Value = serde_json::from_str(payload).unwrap();
        assert!(validate(&value).valid);

        assert!(import_json_str(&mut adapter, payload).unwrap());
        assert_eq!(
            read(&adapter, Domain::Habits),
            Some(json!([{"id": "h1", "streak": 2.5}]))
        );
    }

    #[test]
    fn test_fallback_import_after_structured_import_is_visible() {
        let (mut adapter, failing) = flaky_adapter();
        import_json_str(
            &mut adapter,
            r#"{"version":1,"exportedAt":"2025-01-01T00:00:00Z","habits":[{"id":"old"}]}"#,
        )
        .unwrap();

        failing.set(true);
        assert!(
            import_json_str(
                &mut adapter,
                r#"{"version":1,"exportedAt":"2025-01-02T00:00:00Z","habits":[{"id":"new"}]}"#,
            )
            .unwrap()
        );

        let exported = build_export_document(&adapter);
        assert_eq!(exported.habits, vec![json!({"id": "new"})]);
    }

    #[tokio::test]
    async fn test_import_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("backup.json");
        std::fs::write(
            &path,
            r#"{"version":1,"exportedAt":"2025-01-01T00:00:00Z","habits":[{"id":"h1"}]}"#,
        )
        .unwrap();

        let mut adapter = memory_adapter();
        assert!(import_json(&mut adapter, &path).await.unwrap());
        assert!(adapter.read_domain(Domain::Habits).is_some());
    }

    #[tokio::test]
    async fn test_import_missing_file() {
        let mut adapter = memory_adapter();
        let err = import_json(&mut adapter, Path::new("/nonexistent/backup.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }
}
