//! Handlers for questionnaire submissions and the injury report.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use squadline_core::aggregation::ObservationFilter;
use squadline_core::error::CoreError;
use squadline_core::observation::{InjuryEntry, Observation, QuestionnaireKind};
use squadline_core::types::{DbId, Timestamp};
use squadline_core::validation::validate_submission;
use squadline_db::models::observation::{into_domain_all, CreateObservation};
use squadline_db::repositories::ObservationRepo;
use squadline_events::{ClubEvent, EVENT_OBSERVATION_SUBMITTED};

use crate::error::{AppError, AppResult};
use crate::handlers::players::find_player;
use crate::query::DateRangeParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for a player's observation history.
#[derive(Debug, Deserialize)]
pub struct ObservationListParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub kind: Option<QuestionnaireKind>,
}

/// Active injuries from the player's latest injury report.
#[derive(Debug, Serialize)]
pub struct InjuryReport {
    /// The observation the injuries come from; `None` when the player never
    /// reported one.
    pub observation_id: Option<DbId>,
    pub reported_at: Option<Timestamp>,
    pub injuries: Vec<InjuryEntry>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /players/{id}/observations
///
/// Oldest first. `from`/`to` are inclusive local dates.
pub async fn list_observations(
    State(state): State<AppState>,
    Path(player_id): Path<DbId>,
    Query(params): Query<ObservationListParams>,
) -> AppResult<Json<DataResponse<Vec<Observation>>>> {
    let range = DateRangeParams {
        from: params.from,
        to: params.to,
    };
    range.validate()?;
    find_player(&state.pool, player_id).await?;

    let offset = state.config.reporting_offset;
    let mut filter = ObservationFilter::default().with_range(range.from, range.to);
    if let Some(kind) = params.kind {
        filter = filter.with_kinds([kind]);
    }
    let (since, until) = filter.utc_bounds(&offset);

    let rows = ObservationRepo::list_for_player(
        &state.pool,
        player_id,
        since,
        until,
        params.kind.map(|k| k.as_str()),
    )
    .await?;
    let observations = into_domain_all(rows)?;

    let selected: Vec<Observation> = filter
        .apply(&observations, &offset)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(DataResponse::ok(selected)))
}

/// POST /players/{id}/observations
///
/// Validates the required metrics, stores the response and hands it to the
/// alert listener. Alerting runs in the background; its failures never
/// affect this response.
pub async fn submit_observation(
    State(state): State<AppState>,
    Path(player_id): Path<DbId>,
    Json(input): Json<CreateObservation>,
) -> AppResult<(StatusCode, Json<DataResponse<Observation>>)> {
    let player = find_player(&state.pool, player_id).await?;
    if !player.is_active {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Player {player_id} is inactive"
        ))));
    }
    validate_submission(input.kind, &input.data)?;

    let row = ObservationRepo::create(&state.pool, player_id, input.kind.as_str(), &input.data)
        .await?;
    let observation = row.into_domain()?;

    tracing::info!(
        player_id,
        observation_id = observation.id,
        kind = %observation.kind,
        "Observation submitted"
    );

    match serde_json::to_value(&observation) {
        Ok(payload) => state.event_bus.publish(
            ClubEvent::new(EVENT_OBSERVATION_SUBMITTED)
                .with_subject(player_id)
                .with_payload(payload),
        ),
        Err(e) => tracing::error!(error = %e, "Could not encode observation event"),
    }

    Ok((StatusCode::CREATED, Json(DataResponse::ok(observation))))
}

/// GET /players/{id}/injuries
pub async fn list_injuries(
    State(state): State<AppState>,
    Path(player_id): Path<DbId>,
) -> AppResult<Json<DataResponse<InjuryReport>>> {
    find_player(&state.pool, player_id).await?;

    let report = match ObservationRepo::latest_with_injuries(&state.pool, player_id).await? {
        Some(row) => {
            let observation = row.into_domain()?;
            InjuryReport {
                observation_id: Some(observation.id),
                reported_at: Some(observation.created_at),
                injuries: observation.active_injuries(),
            }
        }
        None => InjuryReport {
            observation_id: None,
            reported_at: None,
            injuries: Vec::new(),
        },
    };
    Ok(Json(DataResponse::ok(report)))
}
