//! Submission-time validation of questionnaire responses.
//!
//! Only presence is checked. Values outside the nominal 1-20 scale are
//! accepted as-is because the input widgets already constrain them.

use crate::error::CoreError;
use crate::metric_names::{
    FIELD_INJURIES, METRIC_FATIGUE, METRIC_MOTIVATION, METRIC_RPE, METRIC_SLEEP_QUALITY,
    METRIC_SORENESS,
};
use crate::observation::{metric_value, parse_injuries, QuestionnaireKind};

/// Metrics that must be present (and numeric) for each questionnaire kind.
pub fn required_metrics(kind: QuestionnaireKind) -> &'static [&'static str] {
    match kind {
        QuestionnaireKind::Pre => &[
            METRIC_FATIGUE,
            METRIC_MOTIVATION,
            METRIC_SLEEP_QUALITY,
            METRIC_SORENESS,
        ],
        QuestionnaireKind::Post | QuestionnaireKind::Match => &[METRIC_RPE],
        QuestionnaireKind::Injury => &[],
    }
}

/// Validate a questionnaire submission before it is persisted.
pub fn validate_submission(
    kind: QuestionnaireKind,
    data: &serde_json::Value,
) -> Result<(), CoreError> {
    if !data.is_object() {
        return Err(CoreError::Validation(
            "data must be a JSON object".to_string(),
        ));
    }

    let missing: Vec<&str> = required_metrics(kind)
        .iter()
        .copied()
        .filter(|m| metric_value(data, m).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(CoreError::Validation(format!(
            "Missing required metric(s) for '{kind}' questionnaire: {}",
            missing.join(", ")
        )));
    }

    if kind == QuestionnaireKind::Injury {
        let injuries = parse_injuries(data);
        if injuries.is_empty() {
            return Err(CoreError::Validation(format!(
                "An injury questionnaire needs at least one entry in '{FIELD_INJURIES}'"
            )));
        }
        if injuries.iter().any(|i| i.location.trim().is_empty()) {
            return Err(CoreError::Validation(
                "Injury location must not be empty".to_string(),
            ));
        }
    }

    Ok(())
}
