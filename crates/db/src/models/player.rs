//! Roster entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use squadline_core::types::{DbId, Timestamp};

/// A row from the `players` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Player {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub position: Option<String>,
    pub jersey_number: Option<i16>,
    pub photo_url: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Player {
    /// "First Last", as shown in notifications.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// DTO for adding a player to the roster.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlayer {
    pub first_name: String,
    pub last_name: String,
    pub position: Option<String>,
    pub jersey_number: Option<i16>,
    pub photo_url: Option<String>,
}

/// DTO for updating a player. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePlayer {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub position: Option<String>,
    pub jersey_number: Option<i16>,
    pub photo_url: Option<String>,
    pub is_active: Option<bool>,
}
