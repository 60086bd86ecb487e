//! Habit model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::RecordId;

/// A tracked habit with its current streak.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Consecutive days completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streak: Option<serde_json::Number>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub paused: Option<bool>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Habit {
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused.unwrap_or(false)
    }
}
