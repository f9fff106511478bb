//! Handlers for player objectives.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use squadline_core::error::CoreError;
use squadline_core::objective::{validate_title, ObjectiveStatus};
use squadline_core::types::DbId;
use squadline_db::models::objective::{CreateObjective, Objective, UpdateObjective};
use squadline_db::repositories::ObjectiveRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::players::find_player;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /players/{id}/objectives
pub async fn list_objectives(
    State(state): State<AppState>,
    Path(player_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Objective>>>> {
    find_player(&state.pool, player_id).await?;
    let objectives = ObjectiveRepo::list_for_player(&state.pool, player_id).await?;
    Ok(Json(DataResponse::ok(objectives)))
}

/// POST /players/{id}/objectives
pub async fn create_objective(
    State(state): State<AppState>,
    Path(player_id): Path<DbId>,
    Json(input): Json<CreateObjective>,
) -> AppResult<(StatusCode, Json<DataResponse<Objective>>)> {
    validate_title(&input.title)?;
    find_player(&state.pool, player_id).await?;

    let objective = ObjectiveRepo::create(&state.pool, player_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::ok(objective))))
}

/// PUT /objectives/{id}
pub async fn update_objective(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateObjective>,
) -> AppResult<Json<DataResponse<Objective>>> {
    if let Some(title) = &input.title {
        validate_title(title)?;
    }
    if let Some(status) = &input.status {
        status.parse::<ObjectiveStatus>()?;
    }

    let objective = ObjectiveRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Objective",
            id,
        }))?;
    Ok(Json(DataResponse::ok(objective)))
}
