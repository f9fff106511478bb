//! Event-to-alert bridge.
//!
//! [`AlertListener`] subscribes to the event bus and runs the
//! [`AlertEvaluator`] for every `observation.submitted` event, each in its
//! own task so a slow webhook never delays the next submission.

use squadline_core::observation::Observation;
use squadline_events::{AlertEvaluator, ClubEvent, EVENT_OBSERVATION_SUBMITTED};
use tokio::sync::broadcast;
use tokio_util::task::TaskTracker;

/// Runs alert evaluation for submitted observations.
pub struct AlertListener {
    evaluator: AlertEvaluator,
    tracker: TaskTracker,
}

impl AlertListener {
    pub fn new(evaluator: AlertEvaluator) -> Self {
        Self {
            evaluator,
            tracker: TaskTracker::new(),
        }
    }

    /// Handle on the in-flight evaluations, for draining at shutdown.
    pub fn tracker(&self) -> TaskTracker {
        self.tracker.clone()
    }

    /// Run the listener loop.
    ///
    /// Exits when the channel is closed (the [`EventBus`](squadline_events::EventBus)
    /// is dropped). Evaluations already spawned keep running.
    pub async fn run(self, mut receiver: broadcast::Receiver<ClubEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => self.handle(event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Alert listener lagged, observations not evaluated");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, alert listener shutting down");
                    break;
                }
            }
        }
    }

    fn handle(&self, event: ClubEvent) {
        if event.event_type != EVENT_OBSERVATION_SUBMITTED {
            return;
        }

        let observation: Observation = match serde_json::from_value(event.payload) {
            Ok(observation) => observation,
            Err(e) => {
                tracing::error!(error = %e, "Malformed observation event payload");
                return;
            }
        };

        let evaluator = self.evaluator.clone();
        self.tracker.spawn(async move {
            let report = evaluator.run(&observation).await;
            tracing::debug!(
                observation_id = observation.id,
                subject_id = observation.subject_id,
                stage = ?report.stage,
                fired = report.alerts.len(),
                "Alert evaluation finished"
            );
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
