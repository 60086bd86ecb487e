//! Task model.
//!
//! Tasks are classified into one of the four Eisenhower quadrants.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use super::{RecordId, Timestamp};

/// Eisenhower priority quadrant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    UrgentImportant,
    NotUrgentImportant,
    UrgentNotImportant,
    NotUrgentNotImportant,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Self::UrgentImportant,
        Self::NotUrgentImportant,
        Self::UrgentNotImportant,
        Self::NotUrgentNotImportant,
    ];

    /// Key used both as the serialized tag and as the group key in the
    /// legacy quadrant-grouped task store.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UrgentImportant => "urgent_important",
            Self::NotUrgentImportant => "not_urgent_important",
            Self::UrgentNotImportant => "urgent_not_important",
            Self::NotUrgentNotImportant => "not_urgent_not_important",
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Quadrant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|q| q.as_str() == s)
            .ok_or_else(|| format!("Unknown quadrant: {s}"))
    }
}

/// A single task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    /// Display text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Quadrant key as stored; see [`Task::quadrant`]
    #[serde(rename = "quadrant", skip_serializing_if = "Option::is_none")]
    pub quadrant_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// The task's quadrant, if it names a known one.
    #[must_use]
    pub fn quadrant(&self) -> Option<Quadrant> {
        self.quadrant_key.as_deref().and_then(|k| k.parse().ok())
    }

    /// Whether the task is marked done. Missing or non-boolean flags count
    /// as open.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed.as_ref().and_then(Value::as_bool).unwrap_or(false)
    }
}
