//! Player objective model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use squadline_core::types::{DbId, Timestamp};

/// A row from the `objectives` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Objective {
    pub id: DbId,
    pub player_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for setting a new objective.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateObjective {
    pub title: String,
    pub description: Option<String>,
    pub target_date: Option<NaiveDate>,
}

/// DTO for updating an objective. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateObjective {
    pub title: Option<String>,
    pub description: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub status: Option<String>,
}
