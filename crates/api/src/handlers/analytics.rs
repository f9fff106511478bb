//! Chart and average endpoints.
//!
//! Observations are narrowed in SQL by UTC bounds that cover the requested
//! local days, then filtered exactly and aggregated in `squadline_core`.

use std::collections::BTreeSet;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use squadline_core::aggregation::{
    build_chart, population_averages, ChartSeries, ObservationFilter, PopulationAverages,
    DEFAULT_EMA_PERIOD,
};
use squadline_core::error::CoreError;
use squadline_core::metric_names::SCORE_METRICS;
use squadline_core::observation::QuestionnaireKind;
use squadline_core::types::DbId;
use squadline_db::models::observation::into_domain_all;
use squadline_db::repositories::{ObservationRepo, PlayerRepo};

use crate::error::AppResult;
use crate::handlers::players::find_player;
use crate::query::{parse_id_list, split_csv, DateRangeParams};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters shared by the analytics endpoints.
///
/// `metrics` and `kinds` are comma-separated; omitted means "all".
#[derive(Debug, Deserialize)]
pub struct AnalyticsParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub metrics: Option<String>,
    pub kinds: Option<String>,
    /// Comma-separated player ids (team endpoint only).
    pub players: Option<String>,
    /// EMA smoothing period (default 7).
    pub ema_period: Option<usize>,
}

/// Team view: the selection compared with the whole active roster.
#[derive(Debug, Serialize)]
pub struct TeamAnalytics {
    /// Players in the selection.
    pub players: Vec<DbId>,
    pub averages: PopulationAverages,
    /// Chart of the selection.
    pub chart: ChartSeries,
}

impl AnalyticsParams {
    /// Build the filter for everything but the subject set.
    fn to_filter(&self) -> Result<ObservationFilter, CoreError> {
        let range = DateRangeParams {
            from: self.from,
            to: self.to,
        };
        range.validate()?;

        let mut filter = ObservationFilter::default().with_range(range.from, range.to);
        if let Some(raw) = &self.metrics {
            let metrics = split_csv(raw);
            if metrics.is_empty() {
                return Err(CoreError::Validation("metrics must not be empty".into()));
            }
            filter = filter.with_metrics(metrics);
        }
        if let Some(raw) = &self.kinds {
            let kinds = split_csv(raw)
                .iter()
                .map(|k| k.parse::<QuestionnaireKind>())
                .collect::<Result<Vec<_>, _>>()?;
            filter = filter.with_kinds(kinds);
        }
        Ok(filter)
    }

    fn ema_period(&self) -> usize {
        self.ema_period.unwrap_or(DEFAULT_EMA_PERIOD)
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /players/{id}/analytics
pub async fn player_analytics(
    State(state): State<AppState>,
    Path(player_id): Path<DbId>,
    Query(params): Query<AnalyticsParams>,
) -> AppResult<Json<DataResponse<ChartSeries>>> {
    let filter = params.to_filter()?.with_subjects([player_id]);
    find_player(&state.pool, player_id).await?;

    let offset = state.config.reporting_offset;
    let (since, until) = filter.utc_bounds(&offset);
    let rows = ObservationRepo::list_for_player(&state.pool, player_id, since, until, None).await?;
    let observations = into_domain_all(rows)?;

    let metrics = filter.resolve_metrics(SCORE_METRICS);
    let chart = build_chart(
        &observations,
        &filter,
        &metrics,
        &offset,
        params.ema_period(),
    );
    Ok(Json(DataResponse::ok(chart)))
}

/// GET /analytics/team
///
/// Without `players` the selection is the whole active roster, and the
/// filtered and global averages are identical.
pub async fn team_analytics(
    State(state): State<AppState>,
    Query(params): Query<AnalyticsParams>,
) -> AppResult<Json<DataResponse<TeamAnalytics>>> {
    let mut filter = params.to_filter()?;
    let selection = params.players.as_deref().map(parse_id_list).transpose()?;

    let population: BTreeSet<DbId> = PlayerRepo::list_active_ids(&state.pool)
        .await?
        .into_iter()
        .collect();
    if let Some(ids) = &selection {
        filter = filter.with_subjects(ids.iter().copied());
    }

    let mut wanted = population.clone();
    if let Some(ids) = &selection {
        wanted.extend(ids.iter().copied());
    }
    let wanted: Vec<DbId> = wanted.into_iter().collect();

    let offset = state.config.reporting_offset;
    let (since, until) = filter.utc_bounds(&offset);
    let rows =
        ObservationRepo::list_for_players(&state.pool, Some(wanted.as_slice()), since, until)
            .await?;
    let observations = into_domain_all(rows)?;

    let metrics = filter.resolve_metrics(SCORE_METRICS);
    let averages = population_averages(&observations, &filter, &population, &metrics, &offset);

    let chart_filter = ObservationFilter {
        subjects: Some(filter.subjects.clone().unwrap_or_else(|| population.clone())),
        ..filter
    };
    let chart = build_chart(
        &observations,
        &chart_filter,
        &metrics,
        &offset,
        params.ema_period(),
    );

    let players = chart_filter
        .subjects
        .map(|s| s.into_iter().collect())
        .unwrap_or_default();

    Ok(Json(DataResponse::ok(TeamAnalytics {
        players,
        averages,
        chart,
    })))
}
