//! Single-attempt webhook delivery.
//!
//! [`WebhookDelivery`] POSTs a JSON [`WebhookMessage`] to the configured URL.
//! Each alert gets exactly one attempt: a non-2xx status or a network error
//! is returned to the caller, which records it as a failed delivery.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use squadline_core::alerting::AlertEvent;

use crate::alerting::AlertSink;

/// Default HTTP timeout for a single delivery attempt.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for webhook delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("Webhook returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// WebhookMessage
// ---------------------------------------------------------------------------

/// The JSON body of one webhook call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookMessage {
    pub title: String,
    pub body: String,
    /// Severity colour as a 24-bit RGB integer.
    pub color: u32,
    pub timestamp: DateTime<Utc>,
}

impl WebhookMessage {
    /// Render `alert` for the player called `subject_name`.
    pub fn from_alert(alert: &AlertEvent, subject_name: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            title: format!("{}: {subject_name}", alert.kind.title()),
            body: alert.message.clone(),
            color: alert.kind.color(),
            timestamp,
        }
    }
}

// ---------------------------------------------------------------------------
// WebhookDelivery
// ---------------------------------------------------------------------------

/// Delivers alerts to an external webhook endpoint.
pub struct WebhookDelivery {
    client: reqwest::Client,
}

impl WebhookDelivery {
    /// Create a delivery service whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, WebhookError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// POST `message` to `url` once and check the response status.
    pub async fn deliver(&self, url: &str, message: &WebhookMessage) -> Result<(), WebhookError> {
        let response = self.client.post(url).json(message).send().await?;
        if !response.status().is_success() {
            return Err(WebhookError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

#[async_trait]
impl AlertSink for WebhookDelivery {
    async fn send(&self, url: &str, message: &WebhookMessage) -> Result<(), WebhookError> {
        self.deliver(url, message).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use squadline_core::alerting::AlertKind;

    use super::*;

    #[test]
    fn new_builds_a_client() {
        assert!(WebhookDelivery::new(DEFAULT_TIMEOUT).is_ok());
    }

    #[test]
    fn webhook_error_display_http_status() {
        let err = WebhookError::HttpStatus(502);
        assert_eq!(err.to_string(), "Webhook returned HTTP 502");
    }

    #[test]
    fn webhook_error_display_request() {
        let req_err = reqwest::Client::new().get("://bad").build().unwrap_err();
        let err = WebhookError::Request(req_err);
        assert!(err.to_string().contains("HTTP request failed"));
    }

    #[test]
    fn message_serializes_title_body_color_timestamp() {
        let alert = AlertEvent {
            kind: AlertKind::LowFatigue,
            subject_id: 3,
            metric: "fatigue".into(),
            value: 3.0,
            threshold: Some(5.0),
            baseline: None,
            direction: None,
            message: "fatigue reported at 3/20 (threshold 5)".into(),
        };
        let at = Utc.with_ymd_and_hms(2024, 9, 14, 8, 30, 0).unwrap();
        let message = WebhookMessage::from_alert(&alert, "Léa Martin", at);

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["title"], format!("{}: Léa Martin", AlertKind::LowFatigue.title()));
        assert_eq!(json["body"], "fatigue reported at 3/20 (threshold 5)");
        assert_eq!(json["color"], AlertKind::LowFatigue.color());
        assert_eq!(json["timestamp"], "2024-09-14T08:30:00Z");
        assert_eq!(json.as_object().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn unreachable_endpoint_fails_without_retry() {
        let delivery = WebhookDelivery::new(Duration::from_millis(500)).unwrap();
        let message = WebhookMessage {
            title: "t".into(),
            body: "b".into(),
            color: 0,
            timestamp: Utc::now(),
        };
        // Port 9 (discard) on localhost is not expected to accept HTTP.
        let result = delivery.deliver("http://127.0.0.1:9/hook", &message).await;
        assert!(matches!(result, Err(WebhookError::Request(_))));
    }
}
