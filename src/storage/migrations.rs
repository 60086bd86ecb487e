//! Legacy storage key migrations.
//!
//! Older app versions persisted some domains under different keys or in
//! different shapes. This table maps each legacy key/shape onto the
//! current domain so the export builder (and tests) can apply it without
//! special cases. Rows are applied in table order.

use serde_json::{Map, Value};

use crate::model::{Domain, Quadrant};

/// Shape of the data found under a legacy key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyShape {
    /// A plain array stored under an old key name.
    FlatArray,
    /// Either a plain array, or an object wrapping the array in `entries_field`
    /// next to metadata.
    WrappedArray { entries_field: &'static str },
    /// An object of quadrant key to array. Entries are tagged with their
    /// group key in `tag_field`.
    QuadrantGrouped { tag_field: &'static str },
}

/// A single legacy key migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMigration {
    /// Export format version that introduced the current key/shape.
    pub version: u32,
    /// Key the legacy data lives under.
    pub legacy_key: &'static str,
    /// Domain the entries belong to.
    pub domain: Domain,
    pub shape: LegacyShape,
    /// Export document field that carries the raw legacy structure, if any.
    pub compat_field: Option<&'static str>,
}

/// All legacy key migrations, in application order.
pub const KEY_MIGRATIONS: &[KeyMigration] = &[
    KeyMigration {
        version: 1,
        legacy_key: "aurorae_tasks",
        domain: Domain::Tasks,
        shape: LegacyShape::QuadrantGrouped {
            tag_field: "quadrant",
        },
        compat_field: Some("auroraeTasksData"),
    },
    KeyMigration {
        version: 1,
        legacy_key: "sequences",
        domain: Domain::Sequences,
        shape: LegacyShape::FlatArray,
        compat_field: None,
    },
    KeyMigration {
        version: 1,
        legacy_key: "brainDumpEntries",
        domain: Domain::Dumps,
        shape: LegacyShape::WrappedArray {
            entries_field: "entries",
        },
        compat_field: Some("brainDumpData"),
    },
];

/// Entries recovered from a legacy key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyEntries {
    /// Entries in the current domain shape.
    pub entries: Vec<Value>,
    /// Raw structure to carry in the compatibility field.
    pub compat: Option<Value>,
    /// Parts of the legacy structure that were not understood and dropped.
    pub skipped: Vec<String>,
}

impl KeyMigration {
    /// Convert raw legacy data into current-shape entries.
    ///
    /// # Errors
    ///
    /// Returns a description of the mismatch if `raw` does not have the
    /// expected shape at all.
    pub fn apply(&self, raw: &Value) -> Result<LegacyEntries, String> {
        match self.shape {
            LegacyShape::FlatArray => match raw {
                Value::Array(items) => Ok(LegacyEntries {
                    entries: items.clone(),
                    ..LegacyEntries::default()
                }),
                _ => Err(format!("'{}' is not an array", self.legacy_key)),
            },
            LegacyShape::WrappedArray { entries_field } => match raw {
                Value::Array(items) => Ok(LegacyEntries {
                    entries: items.clone(),
                    ..LegacyEntries::default()
                }),
                Value::Object(obj) => match obj.get(entries_field) {
                    Some(Value::Array(items)) => Ok(LegacyEntries {
                        entries: items.clone(),
                        compat: self.compat_field.map(|_| raw.clone()),
                        skipped: Vec::new(),
                    }),
                    _ => Err(format!(
                        "'{}' has no '{entries_field}' array",
                        self.legacy_key
                    )),
                },
                _ => Err(format!(
                    "'{}' is neither an array nor a wrapped object",
                    self.legacy_key
                )),
            },
            LegacyShape::QuadrantGrouped { tag_field } => match raw {
                Value::Object(groups) => Ok(flatten_quadrants(
                    groups,
                    tag_field,
                    self.compat_field.map(|_| raw.clone()),
                )),
                _ => Err(format!("'{}' is not a quadrant map", self.legacy_key)),
            },
        }
    }
}

fn flatten_quadrants(
    groups: &Map<String, Value>,
    tag_field: &str,
    compat: Option<Value>,
) -> LegacyEntries {
    let mut out = LegacyEntries {
        compat,
        ..LegacyEntries::default()
    };

    for quadrant in Quadrant::ALL {
        let Some(group) = groups.get(quadrant.as_str()) else {
            continue;
        };
        let Some(items) = group.as_array() else {
            out.skipped.push(format!("{quadrant} (not an array)"));
            continue;
        };
        for (index, item) in items.iter().enumerate() {
            if let Value::Object(fields) = item {
                let mut tagged = fields.clone();
                tagged.insert(
                    tag_field.to_string(),
                    Value::String(quadrant.as_str().to_string()),
                );
                out.entries.push(Value::Object(tagged));
            } else {
                out.skipped.push(format!("{quadrant}[{index}] (not an object)"));
            }
        }
    }

    for key in groups.keys() {
        if key.parse::<Quadrant>().is_err() {
            out.skipped.push(format!("{key} (unknown quadrant)"));
        }
    }

    out
}

/// Migrations that feed a domain, in table order.
pub fn migrations_for(domain: Domain) -> impl Iterator<Item = &'static KeyMigration> {
    KEY_MIGRATIONS.iter().filter(move |m| m.domain == domain)
}

/// Legacy key a compatibility field is restored to on import.
#[must_use]
pub fn legacy_key_for_compat(field: &str) -> Option<&'static str> {
    KEY_MIGRATIONS
        .iter()
        .find(|m| m.compat_field == Some(field))
        .map(|m| m.legacy_key)
}

/// All compatibility fields with the legacy key each one restores to.
pub fn compat_fields() -> impl Iterator<Item = (&'static str, &'static str)> {
    KEY_MIGRATIONS
        .iter()
        .filter_map(|m| m.compat_field.map(|f| (f, m.legacy_key)))
}
