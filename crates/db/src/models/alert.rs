//! Alert settings and the alert audit log.

use serde::Serialize;
use sqlx::FromRow;
use squadline_core::alerting::{AlertKind, AlertSettings, DeliveryStatus, RuleSetting};
use squadline_core::types::{DbId, Timestamp};

/// The singleton row of `alert_settings`, flattened per column.
#[derive(Debug, Clone, FromRow)]
pub struct AlertSettingsRow {
    pub injury_enabled: bool,
    pub fatigue_enabled: bool,
    pub fatigue_threshold: f64,
    pub motivation_enabled: bool,
    pub motivation_threshold: f64,
    pub rpe_enabled: bool,
    pub rpe_threshold: f64,
    pub variation_enabled: bool,
    pub variation_threshold: f64,
    pub webhook_url: Option<String>,
}

impl From<AlertSettingsRow> for AlertSettings {
    fn from(row: AlertSettingsRow) -> Self {
        Self {
            injury_enabled: row.injury_enabled,
            fatigue: RuleSetting::new(row.fatigue_enabled, row.fatigue_threshold),
            motivation: RuleSetting::new(row.motivation_enabled, row.motivation_threshold),
            rpe: RuleSetting::new(row.rpe_enabled, row.rpe_threshold),
            variation: RuleSetting::new(row.variation_enabled, row.variation_threshold),
            webhook_url: row.webhook_url,
        }
    }
}

/// A row from the `alert_records` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AlertRecord {
    pub id: DbId,
    pub player_id: DbId,
    pub kind: String,
    pub message: String,
    pub status: String,
    pub error: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for appending one delivery attempt to the audit log.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAlertRecord {
    pub player_id: DbId,
    pub kind: AlertKind,
    pub message: String,
    pub status: DeliveryStatus,
    pub error: Option<String>,
}
