//! Routine model: a named, ordered sequence of timed steps.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::RecordId;

/// A routine (historically called a "sequence").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Steps in execution order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<RoutineStep>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Routine {
    /// Sum of step durations, ignoring steps without a numeric duration.
    #[must_use]
    pub fn total_duration(&self) -> f64 {
        self.steps
            .iter()
            .flatten()
            .filter_map(|s| s.duration.as_ref().and_then(serde_json::Number::as_f64))
            .sum()
    }
}

/// One step of a routine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineStep {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<serde_json::Number>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_duration() {
        let routine: Routine = serde_json::from_str(
            r#"{"id":"r1","name":"Morning","steps":[
                {"id":"s1","text":"Stretch","duration":300},
                {"id":"s2","text":"Water"},
                {"id":"s3","text":"Journal","duration":600}
            ]}"#,
        )
        .unwrap();
        assert!((routine.total_duration() - 900.0).abs() < f64::EPSILON);
    }
}
