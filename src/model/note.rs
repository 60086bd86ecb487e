//! Note model (brain dump entries).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{RecordId, Timestamp};

/// A free-form markdown note.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Markdown body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
