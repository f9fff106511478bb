//! Repository for the `objectives` table.

use sqlx::PgPool;
use squadline_core::types::DbId;

use crate::models::objective::{CreateObjective, Objective, UpdateObjective};

/// Column list for `objectives` queries.
const COLUMNS: &str = "\
    id, player_id, title, description, target_date, status, created_at, updated_at";

/// Provides CRUD operations for player objectives.
pub struct ObjectiveRepo;

impl ObjectiveRepo {
    /// Set a new objective for a player.
    pub async fn create(
        pool: &PgPool,
        player_id: DbId,
        input: &CreateObjective,
    ) -> Result<Objective, sqlx::Error> {
        let query = format!(
            "INSERT INTO objectives (player_id, title, description, target_date) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Objective>(&query)
            .bind(player_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.target_date)
            .fetch_one(pool)
            .await
    }

    /// A player's objectives, newest first.
    pub async fn list_for_player(
        pool: &PgPool,
        player_id: DbId,
    ) -> Result<Vec<Objective>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM objectives \
             WHERE player_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Objective>(&query)
            .bind(player_id)
            .fetch_all(pool)
            .await
    }

    /// Update an objective. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateObjective,
    ) -> Result<Option<Objective>, sqlx::Error> {
        let query = format!(
            "UPDATE objectives SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                target_date = COALESCE($4, target_date), \
                status = COALESCE($5, status), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Objective>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.target_date)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }
}
