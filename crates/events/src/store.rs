//! Postgres-backed [`AlertStore`].

use async_trait::async_trait;
use squadline_core::alerting::{metric_history, AlertSettings, MetricHistory, VARIATION_WINDOW};
use squadline_core::observation::Observation;
use squadline_core::types::DbId;
use squadline_db::models::alert::NewAlertRecord;
use squadline_db::models::observation::ObservationRow;
use squadline_db::repositories::{AlertRecordRepo, AlertSettingsRepo, ObservationRepo, PlayerRepo};
use squadline_db::DbPool;

use crate::alerting::AlertStore;

/// Reads settings and history from, and writes audit records to, Postgres.
#[derive(Clone)]
pub struct PgAlertStore {
    pool: DbPool,
}

impl PgAlertStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlertStore for PgAlertStore {
    async fn load_settings(&self) -> Result<Option<AlertSettings>, sqlx::Error> {
        AlertSettingsRepo::get(&self.pool).await
    }

    async fn recent_history(&self, observation: &Observation) -> Result<MetricHistory, sqlx::Error> {
        let rows = ObservationRepo::list_recent_before(
            &self.pool,
            observation.subject_id,
            observation.created_at,
            observation.id,
            VARIATION_WINDOW,
        )
        .await?;

        let prior: Vec<Observation> = rows.into_iter().filter_map(as_history_entry).collect();
        Ok(metric_history(&prior))
    }

    async fn subject_name(&self, subject_id: DbId) -> Result<Option<String>, sqlx::Error> {
        Ok(PlayerRepo::find_by_id(&self.pool, subject_id)
            .await?
            .map(|p| p.display_name()))
    }

    async fn record(&self, record: NewAlertRecord) -> Result<(), sqlx::Error> {
        AlertRecordRepo::create(&self.pool, &record).await?;
        Ok(())
    }
}

fn as_history_entry(row: ObservationRow) -> Option<Observation> {
    let id = row.id;
    match row.into_domain() {
        Ok(obs) => Some(obs),
        Err(e) => {
            tracing::warn!(observation_id = id, error = %e, "Skipping unreadable observation");
            None
        }
    }
}
