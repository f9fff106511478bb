//! Coach-to-player message model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use squadline_core::types::{DbId, Timestamp};

/// A row from the `messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Message {
    pub id: DbId,
    pub player_id: DbId,
    pub sender_name: String,
    pub body: String,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for sending a message to a player.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMessage {
    pub sender_name: String,
    pub body: String,
}
