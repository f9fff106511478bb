//! Repository for the `alert_records` audit log (append-only).

use sqlx::PgPool;
use squadline_core::types::DbId;

use crate::models::alert::{AlertRecord, NewAlertRecord};

/// Column list for `alert_records` queries.
const COLUMNS: &str = "id, player_id, kind, message, status, error, created_at";

/// Appends and lists alert delivery attempts.
pub struct AlertRecordRepo;

impl AlertRecordRepo {
    /// Append one delivery attempt.
    pub async fn create(
        pool: &PgPool,
        record: &NewAlertRecord,
    ) -> Result<AlertRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO alert_records (player_id, kind, message, status, error) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AlertRecord>(&query)
            .bind(record.player_id)
            .bind(record.kind.as_str())
            .bind(&record.message)
            .bind(record.status.as_str())
            .bind(&record.error)
            .fetch_one(pool)
            .await
    }

    /// Most recent attempts first, optionally for a single player.
    pub async fn list(
        pool: &PgPool,
        player_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AlertRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM alert_records \
             WHERE ($1::bigint IS NULL OR player_id = $1) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, AlertRecord>(&query)
            .bind(player_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
