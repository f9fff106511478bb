//! Handlers for alert configuration and the alert audit log.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use squadline_core::alerting::AlertSettings;
use squadline_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use squadline_core::types::DbId;
use squadline_db::models::alert::AlertRecord;
use squadline_db::repositories::{AlertRecordRepo, AlertSettingsRepo};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the audit log.
#[derive(Debug, Deserialize)]
pub struct AlertRecordParams {
    pub player_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /alerts/settings
///
/// Returns the defaults (no webhook) until settings are first saved.
pub async fn get_settings(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<AlertSettings>>> {
    let settings = AlertSettingsRepo::get(&state.pool)
        .await?
        .unwrap_or_default();
    Ok(Json(DataResponse::ok(settings)))
}

/// PUT /alerts/settings
pub async fn update_settings(
    State(state): State<AppState>,
    Json(input): Json<AlertSettings>,
) -> AppResult<Json<DataResponse<AlertSettings>>> {
    input.validate()?;
    let saved = AlertSettingsRepo::upsert(&state.pool, &input).await?;
    tracing::info!(
        webhook_configured = saved.webhook_url().is_some(),
        "Alert settings updated"
    );
    Ok(Json(DataResponse::ok(saved)))
}

/// GET /alerts/records
///
/// Newest first; one row per delivery attempt.
pub async fn list_records(
    State(state): State<AppState>,
    Query(params): Query<AlertRecordParams>,
) -> AppResult<Json<DataResponse<Vec<AlertRecord>>>> {
    let records = AlertRecordRepo::list(
        &state.pool,
        params.player_id,
        clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT),
        clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(DataResponse::ok(records)))
}
