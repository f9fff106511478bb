//! Repository for the `observations` table (append-only).

use sqlx::PgPool;
use squadline_core::types::{DbId, Timestamp};

use crate::models::observation::ObservationRow;

/// Column list for `observations` queries.
const COLUMNS: &str = "id, player_id, kind, data, created_at";

/// Provides insert and query operations for questionnaire responses.
pub struct ObservationRepo;

impl ObservationRepo {
    /// Persist a questionnaire response.
    pub async fn create(
        pool: &PgPool,
        player_id: DbId,
        kind: &str,
        data: &serde_json::Value,
    ) -> Result<ObservationRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO observations (player_id, kind, data) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ObservationRow>(&query)
            .bind(player_id)
            .bind(kind)
            .bind(data)
            .fetch_one(pool)
            .await
    }

    /// A player's responses in `[since, until)`, oldest first.
    ///
    /// Every bound is optional; `kind` restricts to one questionnaire.
    pub async fn list_for_player(
        pool: &PgPool,
        player_id: DbId,
        since: Option<Timestamp>,
        until: Option<Timestamp>,
        kind: Option<&str>,
    ) -> Result<Vec<ObservationRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM observations \
             WHERE player_id = $1 \
               AND ($2::timestamptz IS NULL OR created_at >= $2) \
               AND ($3::timestamptz IS NULL OR created_at < $3) \
               AND ($4::text IS NULL OR kind = $4) \
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, ObservationRow>(&query)
            .bind(player_id)
            .bind(since)
            .bind(until)
            .bind(kind)
            .fetch_all(pool)
            .await
    }

    /// Responses of several players (all players when `player_ids` is
    /// `None`) in `[since, until)`, oldest first.
    pub async fn list_for_players(
        pool: &PgPool,
        player_ids: Option<&[DbId]>,
        since: Option<Timestamp>,
        until: Option<Timestamp>,
    ) -> Result<Vec<ObservationRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM observations \
             WHERE ($1::bigint[] IS NULL OR player_id = ANY($1)) \
               AND ($2::timestamptz IS NULL OR created_at >= $2) \
               AND ($3::timestamptz IS NULL OR created_at < $3) \
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, ObservationRow>(&query)
            .bind(player_ids)
            .bind(since)
            .bind(until)
            .fetch_all(pool)
            .await
    }

    /// The `limit` responses a player submitted before the given one, most
    /// recent first. All questionnaire kinds are included.
    pub async fn list_recent_before(
        pool: &PgPool,
        player_id: DbId,
        before_created_at: Timestamp,
        before_id: DbId,
        limit: i64,
    ) -> Result<Vec<ObservationRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM observations \
             WHERE player_id = $1 AND (created_at, id) < ($2, $3) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $4"
        );
        sqlx::query_as::<_, ObservationRow>(&query)
            .bind(player_id)
            .bind(before_created_at)
            .bind(before_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// The player's most recent response that carries an `injuries` list.
    pub async fn latest_with_injuries(
        pool: &PgPool,
        player_id: DbId,
    ) -> Result<Option<ObservationRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM observations \
             WHERE player_id = $1 AND jsonb_typeof(data -> 'injuries') = 'array' \
             ORDER BY created_at DESC, id DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, ObservationRow>(&query)
            .bind(player_id)
            .fetch_optional(pool)
            .await
    }
}
