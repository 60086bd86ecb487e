//! Export document builder.
//!
//! Reads every domain through the [`StorageAdapter`], folds in legacy keys
//! via the migration table and assembles an [`ExportDocument`]. Building
//! never fails: a domain whose stored value cannot be parsed is exported
//! empty and the problem is logged. Records inside a readable domain are
//! exported exactly as stored.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use crate::model::{Domain, ExportDocument};
use crate::storage::StorageAdapter;
use crate::storage::migrations::{KeyMigration, migrations_for};

/// Format an export timestamp: RFC 3339, UTC, milliseconds, `Z` suffix.
#[must_use]
pub fn format_exported_at(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Build an export document stamped with the current time.
#[must_use]
pub fn build_export_document(storage: &StorageAdapter) -> ExportDocument {
    build_export_document_at(storage, Utc::now())
}

/// Build an export document stamped with `at`.
#[must_use]
pub fn build_export_document_at(storage: &StorageAdapter, at: DateTime<Utc>) -> ExportDocument {
    let mut document = ExportDocument::empty(format_exported_at(at));

    for domain in Domain::ALL {
        let mut assembled = DomainEntries {
            entries: read_current(storage, domain),
            compat: Vec::new(),
        };
        for migration in migrations_for(domain) {
            apply_legacy(storage, migration, &mut assembled);
        }

        let DomainEntries { entries, compat } = assembled;
        *document.records_mut(domain) = entries;

        for (field, raw) in compat {
            match field {
                "auroraeTasksData" => document.aurorae_tasks_data = Some(raw),
                "brainDumpData" => document.brain_dump_data = Some(raw),
                other => debug!(field = other, "No document slot for compatibility field"),
            }
        }
    }

    debug!(records = document.total(), "Built export document");
    document
}

struct DomainEntries {
    entries: Vec<Value>,
    compat: Vec<(&'static str, Value)>,
}

fn read_current(storage: &StorageAdapter, domain: Domain) -> Vec<Value> {
    let Some(text) = storage.read_domain(domain) else {
        return Vec::new();
    };
    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            warn!(domain = %domain, "Stored value is not an array, exporting empty");
            Vec::new()
        }
        Err(e) => {
            warn!(domain = %domain, error = %e, "Stored value is not valid JSON, exporting empty");
            Vec::new()
        }
    }
}

fn apply_legacy(storage: &StorageAdapter, migration: &KeyMigration, into: &mut DomainEntries) {
    let Some(text) = storage.read_legacy(migration.legacy_key) else {
        return;
    };
    let raw: Value = match serde_json::from_str(&text) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(key = migration.legacy_key, error = %e, "Legacy value is not valid JSON, skipping");
            return;
        }
    };

    let legacy = match migration.apply(&raw) {
        Ok(legacy) => legacy,
        Err(reason) => {
            warn!(key = migration.legacy_key, %reason, "Legacy value has unexpected shape, skipping");
            return;
        }
    };
    for skipped in &legacy.skipped {
        warn!(key = migration.legacy_key, part = %skipped, "Dropped part of legacy value");
    }

    let before = into.entries.len();
    merge_legacy(&mut into.entries, legacy.entries);
    debug!(
        key = migration.legacy_key,
        added = into.entries.len() - before,
        "Merged legacy entries"
    );

    if let (Some(field), Some(raw)) = (migration.compat_field, legacy.compat) {
        into.compat.push((field, raw));
    }
}

/// Append legacy entries after the current ones.
///
/// A legacy entry is dropped when its `id` matches a current entry or when
/// it is identical to one.
fn merge_legacy(current: &mut Vec<Value>, legacy: Vec<Value>) {
    let current_len = current.len();
    for entry in legacy {
        let existing = &current[..current_len];
        let id_taken = entry
            .get("id")
            .filter(|id| !id.is_null())
            .is_some_and(|id| existing.iter().any(|c| c.get("id") == Some(id)));
        if id_taken || existing.contains(&entry) {
            continue;
        }
        current.push(entry);
    }
}
