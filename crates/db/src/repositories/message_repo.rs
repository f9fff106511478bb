//! Repository for the `messages` table.

use sqlx::PgPool;
use squadline_core::types::DbId;

use crate::models::message::{CreateMessage, Message};

/// Column list for `messages` queries.
const COLUMNS: &str = "id, player_id, sender_name, body, read_at, created_at";

/// Provides send/list/read operations for coach messages.
pub struct MessageRepo;

impl MessageRepo {
    /// Send a message to a player.
    pub async fn create(
        pool: &PgPool,
        player_id: DbId,
        input: &CreateMessage,
    ) -> Result<Message, sqlx::Error> {
        let query = format!(
            "INSERT INTO messages (player_id, sender_name, body) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(player_id)
            .bind(&input.sender_name)
            .bind(&input.body)
            .fetch_one(pool)
            .await
    }

    /// A player's inbox, newest first.
    ///
    /// When `unread_only` is `true`, read messages are skipped.
    pub async fn list_for_player(
        pool: &PgPool,
        player_id: DbId,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Message>, sqlx::Error> {
        let filter = if unread_only {
            "AND read_at IS NULL"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM messages \
             WHERE player_id = $1 {filter} \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(player_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Mark a message as read. Reading twice keeps the first timestamp.
    pub async fn mark_read(pool: &PgPool, id: DbId) -> Result<Option<Message>, sqlx::Error> {
        let query = format!(
            "UPDATE messages SET read_at = COALESCE(read_at, NOW()) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
