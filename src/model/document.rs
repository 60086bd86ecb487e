//! Export and import documents.
//!
//! An [`ExportDocument`] is a complete, self-contained snapshot: every
//! domain is present even when empty. An [`ImportDocument`] is what a
//! restore accepts: domains are optional, and absent ones are left alone.
//!
//! Both carry domain records as raw JSON objects so that a backup
//! reproduces exactly what was stored, including `null` fields and values
//! the typed models do not understand. The typed models are a read-only
//! view on top, see [`ExportDocument::view`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::Domain;

/// Format version written into every export.
pub const EXPORT_VERSION: u32 = 1;

/// Versioned snapshot of all persisted data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub version: u32,

    /// RFC 3339 UTC timestamp, millisecond precision, `Z` suffix
    pub exported_at: String,

    pub tasks: Vec<Value>,
    pub sequences: Vec<Value>,
    pub habits: Vec<Value>,
    pub dumps: Vec<Value>,
    pub schedule: Vec<Value>,

    /// Raw legacy quadrant-grouped task store, kept for full-fidelity restores
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aurorae_tasks_data: Option<Value>,

    /// Raw legacy metadata-wrapped note store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brain_dump_data: Option<Value>,
}

impl ExportDocument {
    /// An empty document stamped with the given time.
    #[must_use]
    pub fn empty(exported_at: String) -> Self {
        Self {
            version: EXPORT_VERSION,
            exported_at,
            tasks: Vec::new(),
            sequences: Vec::new(),
            habits: Vec::new(),
            dumps: Vec::new(),
            schedule: Vec::new(),
            aurorae_tasks_data: None,
            brain_dump_data: None,
        }
    }

    /// Records of a domain.
    #[must_use]
    pub fn records(&self, domain: Domain) -> &[Value] {
        match domain {
            Domain::Tasks => &self.tasks,
            Domain::Sequences => &self.sequences,
            Domain::Habits => &self.habits,
            Domain::Dumps => &self.dumps,
            Domain::Schedule => &self.schedule,
        }
    }

    /// Mutable records of a domain.
    pub fn records_mut(&mut self, domain: Domain) -> &mut Vec<Value> {
        match domain {
            Domain::Tasks => &mut self.tasks,
            Domain::Sequences => &mut self.sequences,
            Domain::Habits => &mut self.habits,
            Domain::Dumps => &mut self.dumps,
            Domain::Schedule => &mut self.schedule,
        }
    }

    /// Number of records in a domain.
    #[must_use]
    pub fn count(&self, domain: Domain) -> usize {
        self.records(domain).len()
    }

    /// Total records across all domains.
    #[must_use]
    pub fn total(&self) -> usize {
        Domain::ALL.iter().map(|d| self.count(*d)).sum()
    }

    /// Typed view of a domain's records.
    ///
    /// Records that do not fit `T` are left out of the view only; the
    /// document itself keeps them.
    #[must_use]
    pub fn view<T: DeserializeOwned>(&self, domain: Domain) -> Vec<T> {
        self.records(domain)
            .iter()
            .enumerate()
            .filter_map(|(index, record)| match T::deserialize(record) {
                Ok(typed) => Some(typed),
                Err(e) => {
                    debug!(domain = %domain, index, error = %e, "Record left out of typed view");
                    None
                }
            })
            .collect()
    }
}

/// A restore payload. Only the domains present are written.
///
/// Decoding assumes the payload already passed
/// [`validate`](crate::validate::validate); domain values are taken as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportDocument {
    pub version: u64,
    pub exported_at: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<Value>>,

    #[serde(default, alias = "routines", skip_serializing_if = "Option::is_none")]
    pub sequences: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub habits: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dumps: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aurorae_tasks_data: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brain_dump_data: Option<Value>,
}

impl ImportDocument {
    /// Domains carried by this payload.
    #[must_use]
    pub fn domains(&self) -> Vec<Domain> {
        Domain::ALL
            .into_iter()
            .filter(|d| self.records(*d).is_some())
            .collect()
    }

    /// Records of a domain exactly as given, or `None` if the domain is absent.
    #[must_use]
    pub fn records(&self, domain: Domain) -> Option<&[Value]> {
        match domain {
            Domain::Tasks => self.tasks.as_deref(),
            Domain::Sequences => self.sequences.as_deref(),
            Domain::Habits => self.habits.as_deref(),
            Domain::Dumps => self.dumps.as_deref(),
            Domain::Schedule => self.schedule.as_deref(),
        }
    }

    /// Value of a compatibility field by its document name.
    #[must_use]
    pub fn compat_field(&self, field: &str) -> Option<&Value> {
        match field {
            "auroraeTasksData" => self.aurorae_tasks_data.as_ref(),
            "brainDumpData" => self.brain_dump_data.as_ref(),
            _ => None,
        }
    }
}

impl From<ExportDocument> for ImportDocument {
    fn from(doc: ExportDocument) -> Self {
        Self {
            version: u64::from(doc.version),
            exported_at: doc.exported_at,
            tasks: Some(doc.tasks),
            sequences: Some(doc.sequences),
            habits: Some(doc.habits),
            dumps: Some(doc.dumps),
            schedule: Some(doc.schedule),
            aurorae_tasks_data: doc.aurorae_tasks_data,
            brain_dump_data: doc.brain_dump_data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Habit, Task};
    use serde_json::json;

    #[test]
    fn test_empty_export_has_every_domain() {
        let doc = ExportDocument::empty("2025-01-01T00:00:00.000Z".to_string());
        let json = serde_json::to_value(&doc).unwrap();
        for domain in Domain::ALL {
            assert_eq!(json[domain.document_field()], json!([]));
        }
        assert_eq!(json["version"], 1);
        assert!(json.get("auroraeTasksData").is_none());
    }

    #[test]
    fn test_import_accepts_routines_alias() {
        let doc: ImportDocument = serde_json::from_str(
            r#"{"version":1,"exportedAt":"2025-01-01T00:00:00Z","routines":[{"id":"r1"}]}"#,
        )
        .unwrap();
        assert_eq!(doc.domains(), vec![Domain::Sequences]);
        assert_eq!(doc.records(Domain::Sequences).unwrap().len(), 1);
        assert!(doc.records(Domain::Tasks).is_none());
    }

    #[test]
    fn test_import_keeps_records_verbatim() {
        let doc: ImportDocument = serde_json::from_value(json!({
            "version": 1,
            "exportedAt": "2025-01-01T00:00:00Z",
            "dumps": [{"id": "n1", "title": "T", "category": null, "updatedAt": null}],
            "habits": [{"id": "h1", "streak": 2.5}]
        }))
        .unwrap();

        assert_eq!(
            doc.records(Domain::Dumps).unwrap(),
            &[json!({"id": "n1", "title": "T", "category": null, "updatedAt": null})]
        );
        assert_eq!(doc.records(Domain::Habits).unwrap()[0]["streak"], 2.5);
    }

    #[test]
    fn test_from_export_marks_all_domains_present() {
        let doc = ExportDocument::empty("2025-01-01T00:00:00.000Z".to_string());
        let import = ImportDocument::from(doc);
        assert_eq!(import.domains().len(), 5);
    }

    #[test]
    fn test_view_skips_records_without_dropping_them() {
        let mut doc = ExportDocument::empty("2025-01-01T00:00:00.000Z".to_string());
        doc.habits = vec![json!({"id": "h1", "streak": 3}), json!({"id": "h2", "name": 7})];
        doc.tasks = vec![json!({"id": 1, "quadrant": "someday"})];

        let habits: Vec<Habit> = doc.view(Domain::Habits);
        assert_eq!(habits.len(), 1);
        assert_eq!(doc.count(Domain::Habits), 2);

        let tasks: Vec<Task> = doc.view(Domain::Tasks);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].quadrant(), None);
    }
}
