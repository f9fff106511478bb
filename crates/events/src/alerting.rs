//! The alert pipeline for one submitted observation.
//!
//! [`AlertEvaluator::run`] walks an observation through
//! `Idle -> SettingsLoaded -> RulesEvaluated -> Dispatching -> Recorded`:
//! it loads the club's alert settings, evaluates every rule against the
//! observation and the player's recent history, then dispatches each fired
//! alert once and records the outcome.
//!
//! Alerting is best-effort. Missing settings, a missing webhook or a failing
//! store never surface to the player who submitted the observation; they are
//! logged and the run stops early.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use squadline_core::alerting::{evaluate, AlertEvent, AlertSettings, DeliveryStatus, MetricHistory};
use squadline_core::observation::Observation;
use squadline_core::types::DbId;
use squadline_db::models::alert::NewAlertRecord;

use crate::delivery::webhook::{WebhookError, WebhookMessage};

// ---------------------------------------------------------------------------
// Backend seams
// ---------------------------------------------------------------------------

/// Everything the pipeline reads from or writes to storage.
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// The saved settings, or `None` when none were ever saved.
    async fn load_settings(&self) -> Result<Option<AlertSettings>, sqlx::Error>;

    /// Prior metric values of the observation's subject, most recent first,
    /// excluding the observation itself.
    async fn recent_history(&self, observation: &Observation) -> Result<MetricHistory, sqlx::Error>;

    /// Display name of a player, for the notification title.
    async fn subject_name(&self, subject_id: DbId) -> Result<Option<String>, sqlx::Error>;

    /// Append one delivery attempt to the audit log.
    async fn record(&self, record: NewAlertRecord) -> Result<(), sqlx::Error>;
}

/// An outbound channel that accepts one alert per call.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn send(&self, url: &str, message: &WebhookMessage) -> Result<(), WebhookError>;
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// How far a run got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationStage {
    Idle,
    SettingsLoaded,
    RulesEvaluated,
    Dispatching,
    Recorded,
}

/// Outcome of one [`AlertEvaluator::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    /// The last stage reached.
    pub stage: EvaluationStage,
    /// Alerts that fired, in rule order.
    pub alerts: Vec<AlertEvent>,
    pub sent: usize,
    pub failed: usize,
}

impl EvaluationReport {
    fn stopped_at(stage: EvaluationStage) -> Self {
        Self {
            stage,
            alerts: Vec::new(),
            sent: 0,
            failed: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// AlertEvaluator
// ---------------------------------------------------------------------------

/// Runs the alert rules for submitted observations.
#[derive(Clone)]
pub struct AlertEvaluator {
    store: Arc<dyn AlertStore>,
    sink: Arc<dyn AlertSink>,
}

impl AlertEvaluator {
    pub fn new(store: Arc<dyn AlertStore>, sink: Arc<dyn AlertSink>) -> Self {
        Self { store, sink }
    }

    /// Evaluate `observation` and dispatch every alert it fires.
    ///
    /// Alerts are sent one after another. A failed delivery is recorded as
    /// `failed` and the remaining alerts are still sent; there are no
    /// retries. Every attempt produces exactly one audit record.
    pub async fn run(&self, observation: &Observation) -> EvaluationReport {
        let subject_id = observation.subject_id;

        let settings = match self.store.load_settings().await {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                tracing::debug!(subject_id, "No alert settings saved, skipping alerts");
                return EvaluationReport::stopped_at(EvaluationStage::Idle);
            }
            Err(e) => {
                tracing::warn!(subject_id, error = %e, "Alert settings unavailable, skipping alerts");
                return EvaluationReport::stopped_at(EvaluationStage::Idle);
            }
        };
        let Some(url) = settings.webhook_url().map(str::to_owned) else {
            tracing::debug!(subject_id, "No alert webhook configured, skipping alerts");
            return EvaluationReport::stopped_at(EvaluationStage::Idle);
        };

        let history = if settings.variation.enabled {
            self.store
                .recent_history(observation)
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!(
                        subject_id,
                        error = %e,
                        "Could not load history, variation rule skipped"
                    );
                    MetricHistory::new()
                })
        } else {
            MetricHistory::new()
        };

        let alerts = evaluate(observation, &settings, &history);
        if alerts.is_empty() {
            return EvaluationReport {
                stage: EvaluationStage::RulesEvaluated,
                alerts,
                sent: 0,
                failed: 0,
            };
        }

        let subject_name = match self.store.subject_name(subject_id).await {
            Ok(Some(name)) => name,
            Ok(None) => format!("Player #{subject_id}"),
            Err(e) => {
                tracing::warn!(subject_id, error = %e, "Could not load player name");
                format!("Player #{subject_id}")
            }
        };

        let mut sent = 0;
        let mut failed = 0;
        for alert in &alerts {
            let message = WebhookMessage::from_alert(alert, &subject_name, Utc::now());
            let (status, error) = match self.sink.send(&url, &message).await {
                Ok(()) => {
                    sent += 1;
                    (DeliveryStatus::Sent, None)
                }
                Err(e) => {
                    failed += 1;
                    tracing::warn!(
                        subject_id,
                        kind = alert.kind.as_str(),
                        error = %e,
                        "Alert delivery failed"
                    );
                    (DeliveryStatus::Failed, Some(e.to_string()))
                }
            };

            let record = NewAlertRecord {
                player_id: subject_id,
                kind: alert.kind,
                message: alert.message.clone(),
                status,
                error,
            };
            if let Err(e) = self.store.record(record).await {
                tracing::error!(
                    subject_id,
                    kind = alert.kind.as_str(),
                    error = %e,
                    "Failed to record alert delivery"
                );
            }
        }

        tracing::info!(subject_id, sent, failed, "Alerts dispatched");

        EvaluationReport {
            stage: EvaluationStage::Recorded,
            alerts,
            sent,
            failed,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;
    use squadline_core::alerting::{AlertKind, RuleSetting};
    use squadline_core::observation::QuestionnaireKind;

    use super::*;

    const HOOK: &str = "https://hooks.example.org/club";

    #[derive(Default)]
    struct FakeStore {
        settings: Option<AlertSettings>,
        settings_fail: bool,
        history: MetricHistory,
        history_fail: bool,
        records: Mutex<Vec<NewAlertRecord>>,
    }

    #[async_trait]
    impl AlertStore for FakeStore {
        async fn load_settings(&self) -> Result<Option<AlertSettings>, sqlx::Error> {
            if self.settings_fail {
                return Err(sqlx::Error::PoolTimedOut);
            }
            Ok(self.settings.clone())
        }

        async fn recent_history(&self, _: &Observation) -> Result<MetricHistory, sqlx::Error> {
            if self.history_fail {
                return Err(sqlx::Error::PoolTimedOut);
            }
            Ok(self.history.clone())
        }

        async fn subject_name(&self, _: DbId) -> Result<Option<String>, sqlx::Error> {
            Ok(Some("Léa Martin".into()))
        }

        async fn record(&self, record: NewAlertRecord) -> Result<(), sqlx::Error> {
            self.records.lock().unwrap().push(record);
            Ok(())
        }
    }

    /// Records every message; fails the ones whose body contains `fail_on`.
    #[derive(Default)]
    struct FakeSink {
        fail_on: Option<&'static str>,
        sent: Mutex<Vec<(String, WebhookMessage)>>,
    }

    #[async_trait]
    impl AlertSink for FakeSink {
        async fn send(&self, url: &str, message: &WebhookMessage) -> Result<(), WebhookError> {
            self.sent
                .lock()
                .unwrap()
                .push((url.to_string(), message.clone()));
            match self.fail_on {
                Some(needle) if message.body.contains(needle) => Err(WebhookError::HttpStatus(500)),
                _ => Ok(()),
            }
        }
    }

    fn settings() -> AlertSettings {
        AlertSettings {
            webhook_url: Some(HOOK.into()),
            ..Default::default()
        }
    }

    fn observation(data: serde_json::Value) -> Observation {
        Observation {
            id: 10,
            subject_id: 4,
            kind: QuestionnaireKind::Pre,
            data,
            created_at: Utc::now(),
        }
    }

    fn evaluator(store: &Arc<FakeStore>, sink: &Arc<FakeSink>) -> AlertEvaluator {
        AlertEvaluator::new(store.clone(), sink.clone())
    }

    #[tokio::test]
    async fn no_settings_is_a_silent_no_op() {
        let store = Arc::new(FakeStore::default());
        let sink = Arc::new(FakeSink::default());

        let report = evaluator(&store, &sink)
            .run(&observation(json!({"fatigue": 1})))
            .await;

        assert_eq!(report.stage, EvaluationStage::Idle);
        assert!(sink.sent.lock().unwrap().is_empty());
        assert!(store.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn settings_failure_is_a_silent_no_op() {
        let store = Arc::new(FakeStore {
            settings: Some(settings()),
            settings_fail: true,
            ..Default::default()
        });
        let sink = Arc::new(FakeSink::default());

        let report = evaluator(&store, &sink)
            .run(&observation(json!({"fatigue": 1})))
            .await;
        assert_eq!(report.stage, EvaluationStage::Idle);
        assert!(store.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_webhook_skips_dispatch() {
        let store = Arc::new(FakeStore {
            settings: Some(AlertSettings::default()),
            ..Default::default()
        });
        let sink = Arc::new(FakeSink::default());

        let report = evaluator(&store, &sink)
            .run(&observation(json!({"fatigue": 1})))
            .await;
        assert_eq!(report.stage, EvaluationStage::Idle);
        assert!(sink.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn nothing_fired_stops_after_evaluation() {
        let store = Arc::new(FakeStore {
            settings: Some(settings()),
            ..Default::default()
        });
        let sink = Arc::new(FakeSink::default());

        let report = evaluator(&store, &sink)
            .run(&observation(json!({"fatigue": 14, "motivation": 15})))
            .await;
        assert_eq!(report.stage, EvaluationStage::RulesEvaluated);
        assert!(report.alerts.is_empty());
        assert!(store.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn low_fatigue_is_sent_and_recorded() {
        let store = Arc::new(FakeStore {
            settings: Some(settings()),
            ..Default::default()
        });
        let sink = Arc::new(FakeSink::default());

        let report = evaluator(&store, &sink)
            .run(&observation(json!({"fatigue": 3, "motivation": 12})))
            .await;

        assert_eq!(report.stage, EvaluationStage::Recorded);
        assert_eq!(report.sent, 1);

        let sent = sink.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, HOOK);
        assert!(sent[0].1.body.contains("3/20"));
        assert!(sent[0].1.title.contains("Léa Martin"));

        let records = store.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, AlertKind::LowFatigue);
        assert_eq!(records[0].status, DeliveryStatus::Sent);
        assert_eq!(records[0].player_id, 4);
        assert!(records[0].error.is_none());
    }

    #[tokio::test]
    async fn failed_delivery_is_recorded_and_siblings_still_sent() {
        let store = Arc::new(FakeStore {
            settings: Some(settings()),
            ..Default::default()
        });
        let sink = Arc::new(FakeSink {
            fail_on: Some("fatigue"),
            ..Default::default()
        });

        let report = evaluator(&store, &sink)
            .run(&observation(json!({"fatigue": 2, "motivation": 1, "rpe": 19})))
            .await;

        assert_eq!(report.alerts.len(), 3);
        assert_eq!((report.sent, report.failed), (2, 1));
        assert_eq!(sink.sent.lock().unwrap().len(), 3);

        let records = store.records.lock().unwrap();
        assert_eq!(records.len(), 3);
        let failed: Vec<_> = records
            .iter()
            .filter(|r| r.status == DeliveryStatus::Failed)
            .collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].kind, AlertKind::LowFatigue);
        assert_eq!(failed[0].error.as_deref(), Some("Webhook returned HTTP 500"));
    }

    #[tokio::test]
    async fn variation_uses_store_history() {
        let mut history = MetricHistory::new();
        history.insert("soreness".into(), vec![10.0, 10.0, 10.0]);
        let store = Arc::new(FakeStore {
            settings: Some(AlertSettings {
                variation: RuleSetting::new(true, 3.0),
                ..settings()
            }),
            history,
            ..Default::default()
        });
        let sink = Arc::new(FakeSink::default());

        let report = evaluator(&store, &sink)
            .run(&observation(json!({"soreness": 14, "fatigue": 12, "motivation": 12})))
            .await;

        assert_eq!(report.alerts.len(), 1);
        assert_eq!(report.alerts[0].kind, AlertKind::Variation);
        assert_eq!(store.records.lock().unwrap()[0].kind, AlertKind::Variation);
    }

    #[tokio::test]
    async fn history_failure_skips_variation_but_keeps_thresholds() {
        let mut history = MetricHistory::new();
        history.insert("soreness".into(), vec![10.0, 10.0, 10.0]);
        let store = Arc::new(FakeStore {
            settings: Some(AlertSettings {
                variation: RuleSetting::new(true, 3.0),
                ..settings()
            }),
            history,
            history_fail: true,
            ..Default::default()
        });
        let sink = Arc::new(FakeSink::default());

        let report = evaluator(&store, &sink)
            .run(&observation(json!({"soreness": 14, "fatigue": 12, "motivation": 12, "rpe": 19})))
            .await;

        assert_eq!(report.stage, EvaluationStage::Recorded);
        assert_eq!(report.alerts.len(), 1);
        assert_eq!(report.alerts[0].kind, AlertKind::HighRpe);
        assert_eq!(report.sent, 1);

        let records = store.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, AlertKind::HighRpe);
    }

    #[tokio::test]
    async fn injury_alert_references_location_and_pain() {
        let store = Arc::new(FakeStore {
            settings: Some(settings()),
            ..Default::default()
        });
        let sink = Arc::new(FakeSink::default());
        let obs = Observation {
            kind: QuestionnaireKind::Injury,
            ..observation(json!({
                "injuries": [{"location": "Cheville droite", "intensity": 7, "active": true}]
            }))
        };

        let report = evaluator(&store, &sink).run(&obs).await;

        assert_eq!(report.alerts.len(), 1);
        let body = &sink.sent.lock().unwrap()[0].1.body;
        assert!(body.contains("Cheville droite"));
        assert!(body.contains("7/10"));
    }
}
