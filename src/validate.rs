//! Shape validation for export/import documents.
//!
//! Validation runs on the parsed JSON value before it is decoded into
//! typed records, so that every problem in a payload is reported at once
//! instead of stopping at the first decode error.

use chrono::DateTime;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::model::Domain;

/// Top-level fields every document must carry.
pub const REQUIRED_FIELDS: [&str; 2] = ["version", "exportedAt"];

/// Compatibility fields that must be objects when present.
pub const COMPAT_FIELDS: [&str; 2] = ["auroraeTasksData", "brainDumpData"];

/// Historical alias accepted for the `sequences` field.
const SEQUENCES_ALIAS: &str = "routines";

/// Outcome of validating a document. Never an error by itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Convert into a `Result`, failing with [`Error::Validation`].
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` listing every failing rule.
    pub fn into_result(self) -> Result<()> {
        if self.valid {
            Ok(())
        } else {
            Err(Error::Validation {
                errors: self.errors,
            })
        }
    }
}

/// Validate the shape of an export/import document.
///
/// Checks required fields, the type of `version` and `exportedAt`, and
/// that every domain present is an array of objects. Does not mutate the
/// input and never fails; all problems are collected in the report.
#[must_use]
pub fn validate(document: &Value) -> ValidationReport {
    let Some(obj) = document.as_object() else {
        return ValidationReport::from_errors(vec!["Data must be a JSON object".to_string()]);
    };

    let mut errors = Vec::new();

    for field in REQUIRED_FIELDS {
        if !obj.contains_key(field) {
            errors.push(format!("Missing required field: {field}"));
        }
    }

    if let Some(version) = obj.get("version") {
        if version.as_u64().is_none() {
            errors.push("Field 'version' must be a non-negative integer".to_string());
        }
    }

    if let Some(exported_at) = obj.get("exportedAt") {
        match exported_at.as_str() {
            Some(s) if DateTime::parse_from_rfc3339(s).is_ok() => {}
            Some(_) => {
                errors.push("Field 'exportedAt' must be an ISO-8601 timestamp".to_string());
            }
            None => errors.push("Field 'exportedAt' must be a string".to_string()),
        }
    }

    if obj.contains_key(Domain::Sequences.document_field()) && obj.contains_key(SEQUENCES_ALIAS) {
        errors.push(format!(
            "Fields 'sequences' and '{SEQUENCES_ALIAS}' cannot both be present"
        ));
    }

    let domain_fields = Domain::ALL
        .iter()
        .map(Domain::document_field)
        .chain(std::iter::once(SEQUENCES_ALIAS));
    for field in domain_fields {
        if let Some(value) = obj.get(field) {
            check_record_array(field, value, &mut errors);
        }
    }

    for field in COMPAT_FIELDS {
        if let Some(value) = obj.get(field) {
            if !value.is_object() {
                errors.push(format!("Field '{field}' must be an object"));
            }
        }
    }

    ValidationReport::from_errors(errors)
}

fn check_record_array(field: &str, value: &Value, errors: &mut Vec<String>) {
    let Some(items) = value.as_array() else {
        errors.push(format!("Field '{field}' must be an array"));
        return;
    };

    for (index, item) in items.iter().enumerate() {
        if !item.is_object() {
            errors.push(format!("Field '{field}[{index}]' must be an object"));
        }
    }
}
