//! Handlers for the player roster.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use squadline_core::error::CoreError;
use squadline_core::types::DbId;
use squadline_db::models::player::{CreatePlayer, Player, UpdatePlayer};
use squadline_db::repositories::PlayerRepo;
use squadline_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a player or fail with 404.
pub async fn find_player(pool: &DbPool, id: DbId) -> AppResult<Player> {
    PlayerRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Player",
            id,
        }))
}

fn require_name(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// GET /players
pub async fn list_players(
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<Json<DataResponse<Vec<Player>>>> {
    let players = PlayerRepo::list(&state.pool, params.include_inactive).await?;
    Ok(Json(DataResponse::ok(players)))
}

/// POST /players
pub async fn create_player(
    State(state): State<AppState>,
    Json(input): Json<CreatePlayer>,
) -> AppResult<(StatusCode, Json<DataResponse<Player>>)> {
    require_name("first_name", &input.first_name)?;
    require_name("last_name", &input.last_name)?;

    let player = PlayerRepo::create(&state.pool, &input).await?;
    tracing::info!(player_id = player.id, "Player created");
    Ok((StatusCode::CREATED, Json(DataResponse::ok(player))))
}

/// GET /players/{id}
pub async fn get_player(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Player>>> {
    let player = find_player(&state.pool, id).await?;
    Ok(Json(DataResponse::ok(player)))
}

/// PUT /players/{id}
pub async fn update_player(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePlayer>,
) -> AppResult<Json<DataResponse<Player>>> {
    if let Some(first) = &input.first_name {
        require_name("first_name", first)?;
    }
    if let Some(last) = &input.last_name {
        require_name("last_name", last)?;
    }

    let player = PlayerRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Player",
            id,
        }))?;
    Ok(Json(DataResponse::ok(player)))
}

/// DELETE /players/{id}
///
/// Deactivates the player; their history is kept. Deactivating an inactive
/// player is a no-op.
pub async fn deactivate_player(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if PlayerRepo::deactivate(&state.pool, id).await? {
        tracing::info!(player_id = id, "Player deactivated");
    } else {
        find_player(&state.pool, id).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}
