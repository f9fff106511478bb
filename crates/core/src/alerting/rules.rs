//! Alert rule evaluation for a freshly submitted observation.
//!
//! Pure logic. The caller loads the settings and the subject's recent
//! history and passes them in. Every rule is independent: all matching rules
//! fire, in the order injury, fatigue, motivation, RPE, variation.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::alerting::settings::AlertSettings;
use crate::error::CoreError;
use crate::metric_names::{
    METRIC_FATIGUE, METRIC_MOTIVATION, METRIC_RPE, PAIN_SCALE_MAX, SCALE_MAX, VARIATION_METRICS,
};
use crate::observation::Observation;
use crate::types::DbId;

/// Minimum number of prior values before a variation can be judged.
pub const VARIATION_MIN_HISTORY: usize = 3;

/// How many of the subject's previous observations form the variation
/// baseline. All questionnaire kinds are pooled.
pub const VARIATION_WINDOW: i64 = 10;

/// Prior values per metric for one subject, most recent first.
pub type MetricHistory = HashMap<String, Vec<f64>>;

// ---------------------------------------------------------------------------
// AlertKind / Direction
// ---------------------------------------------------------------------------

/// Which rule produced an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Injury,
    LowFatigue,
    LowMotivation,
    HighRpe,
    Variation,
}

impl AlertKind {
    pub const ALL: [AlertKind; 5] = [
        Self::Injury,
        Self::LowFatigue,
        Self::LowMotivation,
        Self::HighRpe,
        Self::Variation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Injury => "injury",
            Self::LowFatigue => "low_fatigue",
            Self::LowMotivation => "low_motivation",
            Self::HighRpe => "high_rpe",
            Self::Variation => "variation",
        }
    }

    /// Human-readable heading used in notifications.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Injury => "Injury reported",
            Self::LowFatigue => "Low fatigue score",
            Self::LowMotivation => "Low motivation",
            Self::HighRpe => "High RPE",
            Self::Variation => "Unusual variation",
        }
    }

    /// Notification accent colour (`0xRRGGBB`).
    pub fn color(&self) -> u32 {
        match self {
            Self::Injury => 0xE7_4C_3C,
            Self::LowFatigue => 0xE6_7E_22,
            Self::LowMotivation => 0xF1_C4_0F,
            Self::HighRpe => 0x9B_59_B6,
            Self::Variation => 0x34_98_DB,
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown alert kind '{s}'")))
    }
}

/// Direction of a variation relative to the recent mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Increase,
    Decrease,
}

impl Direction {
    fn verb(&self) -> &'static str {
        match self {
            Self::Increase => "increased",
            Self::Decrease => "decreased",
        }
    }
}

// ---------------------------------------------------------------------------
// AlertEvent
// ---------------------------------------------------------------------------

/// One fired alert, ready to be dispatched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertEvent {
    pub kind: AlertKind,
    pub subject_id: DbId,
    /// Metric involved, or the body location for injuries.
    pub metric: String,
    /// Observed value (pain intensity for injuries).
    pub value: f64,
    /// Threshold that was crossed; `None` for injuries.
    pub threshold: Option<f64>,
    /// Recent mean the value was compared with (variation only).
    pub baseline: Option<f64>,
    pub direction: Option<Direction>,
    pub message: String,
}

/// Format a score without a trailing `.0` for whole numbers.
pub fn format_score(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:.1}")
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Evaluate every enabled rule against `observation`.
///
/// `history` holds the subject's prior values per metric (the current
/// observation excluded).
pub fn evaluate(
    observation: &Observation,
    settings: &AlertSettings,
    history: &MetricHistory,
) -> Vec<AlertEvent> {
    let mut alerts = Vec::new();
    let subject_id = observation.subject_id;

    // Injuries: one alert per active entry.
    if settings.injury_enabled {
        for injury in observation.active_injuries() {
            alerts.push(AlertEvent {
                kind: AlertKind::Injury,
                subject_id,
                message: format!(
                    "Active injury: {} (pain {}/{PAIN_SCALE_MAX})",
                    injury.location,
                    format_score(injury.intensity)
                ),
                metric: injury.location,
                value: injury.intensity,
                threshold: None,
                baseline: None,
                direction: None,
            });
        }
    }

    if settings.fatigue.enabled {
        if let Some(value) = observation.metric(METRIC_FATIGUE) {
            if value <= settings.fatigue.threshold {
                alerts.push(threshold_alert(
                    AlertKind::LowFatigue,
                    subject_id,
                    METRIC_FATIGUE,
                    value,
                    settings.fatigue.threshold,
                ));
            }
        }
    }

    if settings.motivation.enabled {
        if let Some(value) = observation.metric(METRIC_MOTIVATION) {
            if value <= settings.motivation.threshold {
                alerts.push(threshold_alert(
                    AlertKind::LowMotivation,
                    subject_id,
                    METRIC_MOTIVATION,
                    value,
                    settings.motivation.threshold,
                ));
            }
        }
    }

    if settings.rpe.enabled {
        if let Some(value) = observation.metric(METRIC_RPE) {
            if value >= settings.rpe.threshold {
                alerts.push(threshold_alert(
                    AlertKind::HighRpe,
                    subject_id,
                    METRIC_RPE,
                    value,
                    settings.rpe.threshold,
                ));
            }
        }
    }

    if settings.variation.enabled {
        for metric in VARIATION_METRICS {
            let Some(value) = observation.metric(metric) else {
                continue;
            };
            let prior = history.get(*metric).map(Vec::as_slice).unwrap_or_default();
            if let Some(alert) =
                variation_alert(subject_id, metric, value, prior, settings.variation.threshold)
            {
                alerts.push(alert);
            }
        }
    }

    alerts
}

fn threshold_alert(
    kind: AlertKind,
    subject_id: DbId,
    metric: &str,
    value: f64,
    threshold: f64,
) -> AlertEvent {
    AlertEvent {
        kind,
        subject_id,
        metric: metric.to_string(),
        value,
        threshold: Some(threshold),
        baseline: None,
        direction: None,
        message: format!(
            "{metric} reported at {}/{SCALE_MAX} (threshold {})",
            format_score(value),
            format_score(threshold)
        ),
    }
}

/// Compare `value` with the mean of `prior`.
///
/// Returns `None` with fewer than [`VARIATION_MIN_HISTORY`] prior values: a
/// lone data point has no trend to deviate from.
pub fn variation_alert(
    subject_id: DbId,
    metric: &str,
    value: f64,
    prior: &[f64],
    threshold: f64,
) -> Option<AlertEvent> {
    if prior.len() < VARIATION_MIN_HISTORY {
        return None;
    }

    let mean = prior.iter().sum::<f64>() / prior.len() as f64;
    let diff = value - mean;
    if diff.abs() < threshold {
        return None;
    }

    let direction = if diff >= 0.0 {
        Direction::Increase
    } else {
        Direction::Decrease
    };

    Some(AlertEvent {
        kind: AlertKind::Variation,
        subject_id,
        metric: metric.to_string(),
        value,
        threshold: Some(threshold),
        baseline: Some(mean),
        direction: Some(direction),
        message: format!(
            "{metric} {} by {} ({}/{SCALE_MAX} vs recent mean {})",
            direction.verb(),
            format_score(diff.abs()),
            format_score(value),
            format_score(mean)
        ),
    })
}

/// Collect the variation metrics of `prior` observations, keeping their
/// order (most recent first when the caller passes them that way).
pub fn metric_history<'a, I>(prior: I) -> MetricHistory
where
    I: IntoIterator<Item = &'a Observation>,
{
    let mut history = MetricHistory::new();
    for obs in prior {
        for metric in VARIATION_METRICS {
            if let Some(value) = obs.metric(metric) {
                history.entry(metric.to_string()).or_default().push(value);
            }
        }
    }
    history
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::alerting::settings::RuleSetting;
    use crate::observation::QuestionnaireKind;

    fn observation(kind: QuestionnaireKind, data: serde_json::Value) -> Observation {
        Observation {
            id: 99,
            subject_id: 4,
            kind,
            data,
            created_at: Utc::now(),
        }
    }

    /// Settings with every rule disabled, to switch on one at a time.
    fn all_off() -> AlertSettings {
        AlertSettings {
            injury_enabled: false,
            fatigue: RuleSetting::new(false, 5.0),
            motivation: RuleSetting::new(false, 5.0),
            rpe: RuleSetting::new(false, 17.0),
            variation: RuleSetting::new(false, 3.0),
            webhook_url: Some("https://hooks.example.org/alerts".into()),
        }
    }

    #[test]
    fn low_fatigue_fires_once_with_score_in_message() {
        let settings = AlertSettings {
            fatigue: RuleSetting::new(true, 5.0),
            ..all_off()
        };
        let obs = observation(QuestionnaireKind::Pre, json!({"fatigue": 3}));

        let alerts = evaluate(&obs, &settings, &MetricHistory::new());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::LowFatigue);
        assert_eq!(alerts[0].subject_id, 4);
        assert!(alerts[0].message.contains("3/20"), "{}", alerts[0].message);
    }

    #[test]
    fn fatigue_threshold_is_inclusive() {
        let settings = AlertSettings {
            fatigue: RuleSetting::new(true, 5.0),
            ..all_off()
        };
        let at = observation(QuestionnaireKind::Pre, json!({"fatigue": 5}));
        let above = observation(QuestionnaireKind::Pre, json!({"fatigue": 6}));
        assert_eq!(evaluate(&at, &settings, &MetricHistory::new()).len(), 1);
        assert!(evaluate(&above, &settings, &MetricHistory::new()).is_empty());
    }

    #[test]
    fn active_injury_fires_with_location_and_intensity() {
        let settings = AlertSettings {
            injury_enabled: true,
            ..all_off()
        };
        let obs = observation(
            QuestionnaireKind::Injury,
            json!({"injuries": [{"location": "Cheville droite", "intensity": 7, "active": true}]}),
        );

        let alerts = evaluate(&obs, &settings, &MetricHistory::new());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::Injury);
        assert!(alerts[0].message.contains("Cheville droite"));
        assert!(alerts[0].message.contains("7/10"));
    }

    #[test]
    fn one_alert_per_active_injury_and_inactive_ones_are_ignored() {
        let settings = AlertSettings {
            injury_enabled: true,
            ..all_off()
        };
        let obs = observation(
            QuestionnaireKind::Injury,
            json!({"injuries": [
                {"location": "Genou gauche", "intensity": 4, "active": true},
                {"location": "Epaule", "intensity": 2, "active": false},
                {"location": "Dos", "intensity": 6, "active": true},
            ]}),
        );
        let alerts = evaluate(&obs, &settings, &MetricHistory::new());
        let locations: Vec<&str> = alerts.iter().map(|a| a.metric.as_str()).collect();
        assert_eq!(locations, vec!["Genou gauche", "Dos"]);
    }

    #[test]
    fn independent_rules_all_fire() {
        let settings = AlertSettings {
            fatigue: RuleSetting::new(true, 5.0),
            motivation: RuleSetting::new(true, 5.0),
            rpe: RuleSetting::new(true, 17.0),
            ..all_off()
        };
        let obs = observation(
            QuestionnaireKind::Post,
            json!({"fatigue": 2, "motivation": 4, "rpe": 19}),
        );
        let kinds: Vec<AlertKind> = evaluate(&obs, &settings, &MetricHistory::new())
            .into_iter()
            .map(|a| a.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![AlertKind::LowFatigue, AlertKind::LowMotivation, AlertKind::HighRpe]
        );
    }

    #[test]
    fn disabled_rule_never_fires() {
        let obs = observation(QuestionnaireKind::Post, json!({"rpe": 20}));
        assert!(evaluate(&obs, &all_off(), &MetricHistory::new()).is_empty());
    }

    #[test]
    fn variation_fires_at_or_above_threshold() {
        let prior = [10.0, 10.0, 10.0];
        let alert = variation_alert(1, "fatigue", 14.0, &prior, 3.0).unwrap();
        assert_eq!(alert.direction, Some(Direction::Increase));
        assert_eq!(alert.baseline, Some(10.0));

        assert!(variation_alert(1, "fatigue", 12.0, &prior, 3.0).is_none());
        assert!(variation_alert(1, "fatigue", 13.0, &prior, 3.0).is_some());
    }

    #[test]
    fn variation_records_decrease() {
        let alert = variation_alert(1, "motivation", 4.0, &[12.0, 11.0, 13.0], 3.0).unwrap();
        assert_eq!(alert.direction, Some(Direction::Decrease));
        assert!(alert.message.contains("decreased by 8"), "{}", alert.message);
    }

    #[test]
    fn variation_needs_three_prior_values() {
        assert!(variation_alert(1, "fatigue", 20.0, &[1.0, 1.0], 3.0).is_none());
        assert!(variation_alert(1, "fatigue", 20.0, &[1.0], 3.0).is_none());
        assert!(variation_alert(1, "fatigue", 20.0, &[], 3.0).is_none());
    }

    #[test]
    fn variation_rule_uses_history_per_metric() {
        let settings = AlertSettings {
            variation: RuleSetting::new(true, 3.0),
            ..all_off()
        };
        let mut history = MetricHistory::new();
        history.insert("fatigue".into(), vec![10.0, 10.0, 10.0]);
        history.insert("motivation".into(), vec![10.0, 10.0]);

        let obs = observation(QuestionnaireKind::Pre, json!({"fatigue": 14, "motivation": 2}));
        let alerts = evaluate(&obs, &settings, &history);

        assert_eq!(alerts.len(), 1);
        assert_matches!(
            &alerts[0],
            AlertEvent { kind: AlertKind::Variation, metric, .. } if metric == "fatigue"
        );
    }

    #[test]
    fn kind_parses_from_storage_name() {
        for kind in AlertKind::ALL {
            assert_eq!(kind.as_str().parse::<AlertKind>().unwrap(), kind);
        }
        assert!("high_fatigue".parse::<AlertKind>().is_err());
    }

    #[test]
    fn score_formatting() {
        assert_eq!(format_score(3.0), "3");
        assert_eq!(format_score(12.26), "12.3");
        assert_eq!(format_score(7.5), "7.5");
    }

    #[test]
    fn history_pools_kinds_and_skips_missing_values() {
        let prior = vec![
            observation(QuestionnaireKind::Post, json!({"rpe": 15})),
            observation(QuestionnaireKind::Pre, json!({"fatigue": 12, "rpe": null})),
            observation(QuestionnaireKind::Match, json!({"rpe": 18, "comment": "tough"})),
        ];
        let history = metric_history(&prior);
        assert_eq!(history["rpe"], vec![15.0, 18.0]);
        assert_eq!(history["fatigue"], vec![12.0]);
        assert!(!history.contains_key("comment"));
    }
}
