//! Threshold and variation alerts on questionnaire responses.

pub mod rules;
pub mod settings;

pub use rules::{
    evaluate, format_score, metric_history, variation_alert, AlertEvent, AlertKind, Direction,
    MetricHistory, VARIATION_MIN_HISTORY, VARIATION_WINDOW,
};
pub use settings::{AlertSettings, RuleSetting};

/// Outcome of one delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Failed,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Failed => "failed",
        }
    }
}
