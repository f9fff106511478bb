//! Handlers for coach-to-player messages.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use squadline_core::error::CoreError;
use squadline_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use squadline_core::types::DbId;
use squadline_db::models::message::{CreateMessage, Message};
use squadline_db::repositories::MessageRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::players::find_player;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for a player's inbox.
#[derive(Debug, Deserialize)]
pub struct MessageListParams {
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /players/{id}/messages
///
/// Newest first.
pub async fn list_messages(
    State(state): State<AppState>,
    Path(player_id): Path<DbId>,
    Query(params): Query<MessageListParams>,
) -> AppResult<Json<DataResponse<Vec<Message>>>> {
    find_player(&state.pool, player_id).await?;
    let messages = MessageRepo::list_for_player(
        &state.pool,
        player_id,
        params.unread_only,
        clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT),
        clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(DataResponse::ok(messages)))
}

/// POST /players/{id}/messages
pub async fn send_message(
    State(state): State<AppState>,
    Path(player_id): Path<DbId>,
    Json(input): Json<CreateMessage>,
) -> AppResult<(StatusCode, Json<DataResponse<Message>>)> {
    if input.sender_name.trim().is_empty() {
        return Err(CoreError::Validation("sender_name is required".into()).into());
    }
    if input.body.trim().is_empty() {
        return Err(CoreError::Validation("body must not be empty".into()).into());
    }
    find_player(&state.pool, player_id).await?;

    let message = MessageRepo::create(&state.pool, player_id, &input).await?;
    tracing::debug!(player_id, message_id = message.id, "Message sent");
    Ok((StatusCode::CREATED, Json(DataResponse::ok(message))))
}

/// POST /messages/{id}/read
///
/// Idempotent: the first read time is kept.
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Message>>> {
    let message = MessageRepo::mark_read(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Message",
            id,
        }))?;
    Ok(Json(DataResponse::ok(message)))
}
