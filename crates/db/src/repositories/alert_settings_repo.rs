//! Repository for the singleton `alert_settings` row.

use sqlx::PgPool;
use squadline_core::alerting::AlertSettings;

use crate::models::alert::AlertSettingsRow;

/// Column list for `alert_settings` queries.
const COLUMNS: &str = "\
    injury_enabled, fatigue_enabled, fatigue_threshold, \
    motivation_enabled, motivation_threshold, rpe_enabled, rpe_threshold, \
    variation_enabled, variation_threshold, webhook_url";

/// Reads and replaces the club alert configuration.
pub struct AlertSettingsRepo;

impl AlertSettingsRepo {
    /// The saved settings, or `None` if an administrator never saved any.
    pub async fn get(pool: &PgPool) -> Result<Option<AlertSettings>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM alert_settings WHERE id = 1");
        let row = sqlx::query_as::<_, AlertSettingsRow>(&query)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(AlertSettings::from))
    }

    /// Replace the settings, creating the row on first save.
    pub async fn upsert(
        pool: &PgPool,
        settings: &AlertSettings,
    ) -> Result<AlertSettings, sqlx::Error> {
        let query = format!(
            "INSERT INTO alert_settings (id, {COLUMNS}) \
             VALUES (1, $1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             ON CONFLICT (id) DO UPDATE SET \
                injury_enabled = EXCLUDED.injury_enabled, \
                fatigue_enabled = EXCLUDED.fatigue_enabled, \
                fatigue_threshold = EXCLUDED.fatigue_threshold, \
                motivation_enabled = EXCLUDED.motivation_enabled, \
                motivation_threshold = EXCLUDED.motivation_threshold, \
                rpe_enabled = EXCLUDED.rpe_enabled, \
                rpe_threshold = EXCLUDED.rpe_threshold, \
                variation_enabled = EXCLUDED.variation_enabled, \
                variation_threshold = EXCLUDED.variation_threshold, \
                webhook_url = EXCLUDED.webhook_url, \
                updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, AlertSettingsRow>(&query)
            .bind(settings.injury_enabled)
            .bind(settings.fatigue.enabled)
            .bind(settings.fatigue.threshold)
            .bind(settings.motivation.enabled)
            .bind(settings.motivation.threshold)
            .bind(settings.rpe.enabled)
            .bind(settings.rpe.threshold)
            .bind(settings.variation.enabled)
            .bind(settings.variation.threshold)
            .bind(settings.webhook_url())
            .fetch_one(pool)
            .await?;
        Ok(row.into())
    }
}
