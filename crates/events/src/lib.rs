//! Squadline event bus and alert delivery.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`ClubEvent`]: the domain event envelope.
//! - [`AlertEvaluator`]: loads settings and history for a submitted
//!   observation, runs the alert rules and dispatches every fired alert.
//! - [`delivery`]: outbound channels (webhook).
//! - [`PgAlertStore`]: the Postgres-backed [`AlertStore`].

pub mod alerting;
pub mod bus;
pub mod delivery;
pub mod store;

pub use alerting::{AlertEvaluator, AlertSink, AlertStore, EvaluationReport, EvaluationStage};
pub use bus::{ClubEvent, EventBus, EVENT_OBSERVATION_SUBMITTED};
pub use delivery::webhook::{WebhookDelivery, WebhookError, WebhookMessage};
pub use store::PgAlertStore;
