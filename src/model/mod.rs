//! Data models for Aurorae Haven.
//!
//! This module contains the five data domains and the export document:
//! - Task (Eisenhower quadrant tasks)
//! - Routine (ordered step sequences)
//! - Habit
//! - Note (brain dump entries)
//! - ScheduleDay (time blocks)
//! - ExportDocument / ImportDocument
//!
//! Documents carry records as raw JSON. The entity types here are read
//! views over them: every field is optional, and values the app never
//! wrote (an unknown quadrant, a fractional streak) still read.

pub mod document;
pub mod habit;
pub mod note;
pub mod routine;
pub mod schedule;
pub mod task;

pub use document::{EXPORT_VERSION, ExportDocument, ImportDocument};
pub use habit::Habit;
pub use note::Note;
pub use routine::{Routine, RoutineStep};
pub use schedule::{BlockType, ScheduleDay, TimeBlock};
pub use task::{Quadrant, Task};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Record identifier.
///
/// The app has written both string ids (`"note_1"`) and numeric ids
/// (`Date.now()` values) over time; both are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// A point in time as stored by the app: ISO-8601 text or epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Iso(String),
    EpochMillis(serde_json::Number),
}

/// One of the five top-level data categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Domain {
    Tasks,
    Sequences,
    Habits,
    Dumps,
    Schedule,
}

impl Domain {
    /// All domains, in export order.
    pub const ALL: [Domain; 5] = [
        Self::Tasks,
        Self::Sequences,
        Self::Habits,
        Self::Dumps,
        Self::Schedule,
    ];

    /// Key the domain is persisted under in the key-string store.
    #[must_use]
    pub const fn storage_key(&self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Sequences => "routines",
            Self::Habits => "habits",
            Self::Dumps => "dumps",
            Self::Schedule => "schedule",
        }
    }

    /// Field name inside the export document.
    #[must_use]
    pub const fn document_field(&self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Sequences => "sequences",
            Self::Habits => "habits",
            Self::Dumps => "dumps",
            Self::Schedule => "schedule",
        }
    }

    /// Human-readable label for CLI output.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Tasks => "Tasks",
            Self::Sequences => "Routines",
            Self::Habits => "Habits",
            Self::Dumps => "Notes",
            Self::Schedule => "Schedule",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.document_field())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_accepts_text_and_numbers() {
        let text: RecordId = serde_json::from_str("\"note_1\"").unwrap();
        let num: RecordId = serde_json::from_str("1735689600000").unwrap();
        assert_eq!(text.to_string(), "note_1");
        assert_eq!(num.to_string(), "1735689600000");
        assert_eq!(serde_json::to_string(&num).unwrap(), "1735689600000");
    }

    #[test]
    fn test_domain_keys() {
        assert_eq!(Domain::Sequences.storage_key(), "routines");
        assert_eq!(Domain::Sequences.document_field(), "sequences");
        assert_eq!(Domain::Dumps.storage_key(), "dumps");
        assert_eq!(Domain::ALL.len(), 5);
    }
}
