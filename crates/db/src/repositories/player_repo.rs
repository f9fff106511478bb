//! Repository for the `players` table.

use sqlx::PgPool;
use squadline_core::types::DbId;

use crate::models::player::{CreatePlayer, Player, UpdatePlayer};

/// Column list for `players` queries.
const COLUMNS: &str = "\
    id, first_name, last_name, position, jersey_number, photo_url, \
    is_active, created_at, updated_at";

/// Provides CRUD operations for the roster.
pub struct PlayerRepo;

impl PlayerRepo {
    /// Add a player, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreatePlayer) -> Result<Player, sqlx::Error> {
        let query = format!(
            "INSERT INTO players (first_name, last_name, position, jersey_number, photo_url) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Player>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.position)
            .bind(input.jersey_number)
            .bind(&input.photo_url)
            .fetch_one(pool)
            .await
    }

    /// Find a player by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Player>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM players WHERE id = $1");
        sqlx::query_as::<_, Player>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the roster ordered by name. Deactivated players are skipped
    /// unless `include_inactive` is set.
    pub async fn list(pool: &PgPool, include_inactive: bool) -> Result<Vec<Player>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM players \
             WHERE ($1 OR is_active) \
             ORDER BY last_name, first_name, id"
        );
        sqlx::query_as::<_, Player>(&query)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    /// Ids of every active player (the "global" population for team analytics).
    pub async fn list_active_ids(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM players WHERE is_active ORDER BY id")
            .fetch_all(pool)
            .await
    }

    /// Update a player. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePlayer,
    ) -> Result<Option<Player>, sqlx::Error> {
        let query = format!(
            "UPDATE players SET \
                first_name = COALESCE($2, first_name), \
                last_name = COALESCE($3, last_name), \
                position = COALESCE($4, position), \
                jersey_number = COALESCE($5, jersey_number), \
                photo_url = COALESCE($6, photo_url), \
                is_active = COALESCE($7, is_active), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Player>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.position)
            .bind(input.jersey_number)
            .bind(&input.photo_url)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Soft-deactivate a player. Returns `true` if a row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE players SET is_active = false, updated_at = NOW() \
             WHERE id = $1 AND is_active",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
