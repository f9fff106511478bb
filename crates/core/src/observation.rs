//! Questionnaire responses ("observations") and metric extraction.
//!
//! An observation is immutable once persisted. Its `data` object is free-form
//! JSON coming from the questionnaire forms, so every accessor here is
//! lenient: a missing, `null`, textual or otherwise non-numeric metric is
//! reported as absent rather than as zero.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::metric_names::{FIELD_COMMENT, FIELD_INJURIES};
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// QuestionnaireKind
// ---------------------------------------------------------------------------

/// Which questionnaire produced an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionnaireKind {
    /// Filled in before a training session.
    Pre,
    /// Filled in after a training session.
    Post,
    /// Filled in after a match.
    Match,
    /// Injury follow-up.
    Injury,
}

impl QuestionnaireKind {
    pub const ALL: [QuestionnaireKind; 4] = [Self::Pre, Self::Post, Self::Match, Self::Injury];

    /// Storage / wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pre => "pre",
            Self::Post => "post",
            Self::Match => "match",
            Self::Injury => "injury",
        }
    }
}

impl fmt::Display for QuestionnaireKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionnaireKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown questionnaire kind '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// InjuryEntry
// ---------------------------------------------------------------------------

fn default_active() -> bool {
    true
}

/// One injury reported inside an observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjuryEntry {
    /// Body location, e.g. `"Cheville droite"`.
    pub location: String,
    /// Pain intensity on the 1-10 scale.
    pub intensity: f64,
    /// Whether the injury is still current. Entries without the flag are
    /// treated as active.
    #[serde(default = "default_active")]
    pub active: bool,
}

// ---------------------------------------------------------------------------
// Observation
// ---------------------------------------------------------------------------

/// A persisted questionnaire response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub id: DbId,
    /// The player who submitted the questionnaire.
    pub subject_id: DbId,
    pub kind: QuestionnaireKind,
    /// Metric name -> value, plus the optional `comment` and `injuries` fields.
    pub data: serde_json::Value,
    pub created_at: Timestamp,
}

impl Observation {
    /// Numeric value of `metric`, or `None` when absent or non-numeric.
    pub fn metric(&self, metric: &str) -> Option<f64> {
        metric_value(&self.data, metric)
    }

    /// All well-formed injury entries. Malformed entries are skipped.
    pub fn injuries(&self) -> Vec<InjuryEntry> {
        parse_injuries(&self.data)
    }

    /// Injury entries flagged as active.
    pub fn active_injuries(&self) -> Vec<InjuryEntry> {
        self.injuries().into_iter().filter(|i| i.active).collect()
    }

    /// The free-text comment, if any.
    pub fn comment(&self) -> Option<&str> {
        self.data
            .get(FIELD_COMMENT)
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Extract a numeric metric from a questionnaire `data` object.
///
/// Only JSON numbers qualify. `null`, strings, lists and objects are absent.
pub fn metric_value(data: &serde_json::Value, metric: &str) -> Option<f64> {
    data.get(metric)?.as_f64().filter(|v| v.is_finite())
}

/// Parse the `injuries` list of a questionnaire `data` object.
pub fn parse_injuries(data: &serde_json::Value) -> Vec<InjuryEntry> {
    data.get(FIELD_INJURIES)
        .and_then(|v| v.as_array())
        .map(|entries| {
            entries
                .iter()
                .filter_map(|e| serde_json::from_value::<InjuryEntry>(e.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;

    fn observation(data: serde_json::Value) -> Observation {
        Observation {
            id: 1,
            subject_id: 7,
            kind: QuestionnaireKind::Pre,
            data,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn numeric_metric_is_extracted() {
        let obs = observation(json!({"fatigue": 12, "motivation": 9.5}));
        assert_eq!(obs.metric("fatigue"), Some(12.0));
        assert_eq!(obs.metric("motivation"), Some(9.5));
    }

    #[test]
    fn null_string_and_missing_metrics_are_absent() {
        let obs = observation(json!({"fatigue": null, "motivation": "high", "stress": [3]}));
        assert_eq!(obs.metric("fatigue"), None);
        assert_eq!(obs.metric("motivation"), None);
        assert_eq!(obs.metric("stress"), None);
        assert_eq!(obs.metric("sleep_quality"), None);
    }

    #[test]
    fn non_object_data_has_no_metrics() {
        let obs = observation(json!([1, 2, 3]));
        assert_eq!(obs.metric("fatigue"), None);
        assert!(obs.injuries().is_empty());
    }

    #[test]
    fn injuries_default_to_active_and_skip_malformed_entries() {
        let obs = observation(json!({
            "injuries": [
                {"location": "Cheville droite", "intensity": 7},
                {"location": "Genou gauche", "intensity": 3, "active": false},
                {"intensity": 5},
            ]
        }));

        let all = obs.injuries();
        assert_eq!(all.len(), 2);
        assert!(all[0].active);

        let active = obs.active_injuries();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].location, "Cheville droite");
    }

    #[test]
    fn blank_comment_is_none() {
        assert_eq!(observation(json!({"comment": "   "})).comment(), None);
        assert_eq!(
            observation(json!({"comment": " tight hamstring "})).comment(),
            Some("tight hamstring")
        );
    }

    #[test]
    fn kind_round_trips_through_str() {
        for kind in QuestionnaireKind::ALL {
            assert_eq!(kind.as_str().parse::<QuestionnaireKind>().unwrap(), kind);
        }
        assert!("warmup".parse::<QuestionnaireKind>().is_err());
    }
}
