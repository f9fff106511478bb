//! Alert configuration.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Enabled flag and threshold for one rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleSetting {
    pub enabled: bool,
    pub threshold: f64,
}

impl RuleSetting {
    pub const fn new(enabled: bool, threshold: f64) -> Self {
        Self { enabled, threshold }
    }
}

/// Club-wide alert settings (a singleton row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertSettings {
    /// Report active injuries.
    pub injury_enabled: bool,
    /// Fires when fatigue <= threshold.
    pub fatigue: RuleSetting,
    /// Fires when motivation <= threshold.
    pub motivation: RuleSetting,
    /// Fires when RPE >= threshold.
    pub rpe: RuleSetting,
    /// Fires when |value - recent mean| >= threshold.
    pub variation: RuleSetting,
    /// Where alerts are POSTed. Alerting is off while this is unset.
    pub webhook_url: Option<String>,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            injury_enabled: true,
            fatigue: RuleSetting::new(true, 5.0),
            motivation: RuleSetting::new(true, 5.0),
            rpe: RuleSetting::new(true, 17.0),
            variation: RuleSetting::new(true, 5.0),
            webhook_url: None,
        }
    }
}

impl AlertSettings {
    /// The configured webhook, if it is non-blank.
    pub fn webhook_url(&self) -> Option<&str> {
        self.webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }

    /// Reject settings an administrator should not be able to save.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (name, rule) in [
            ("fatigue", &self.fatigue),
            ("motivation", &self.motivation),
            ("rpe", &self.rpe),
            ("variation", &self.variation),
        ] {
            if !rule.threshold.is_finite() || rule.threshold < 0.0 {
                return Err(CoreError::Validation(format!(
                    "{name} threshold must be a non-negative number, got {}",
                    rule.threshold
                )));
            }
        }

        if let Some(url) = self.webhook_url() {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(CoreError::Validation(
                    "webhook_url must be an http(s) URL".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_and_have_no_webhook() {
        let settings = AlertSettings::default();
        assert!(settings.validate().is_ok());
        assert!(settings.webhook_url().is_none());
    }

    #[test]
    fn blank_webhook_counts_as_unset() {
        let settings = AlertSettings {
            webhook_url: Some("   ".into()),
            ..Default::default()
        };
        assert!(settings.webhook_url().is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn rejects_negative_threshold() {
        let settings = AlertSettings {
            rpe: RuleSetting::new(true, -1.0),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn rejects_non_http_webhook() {
        let settings = AlertSettings {
            webhook_url: Some("ftp://example.org/hook".into()),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }
}
