//! Route definitions for cross-player analytics.

use axum::routing::get;
use axum::Router;

use crate::handlers::analytics;
use crate::state::AppState;

/// Routes mounted at `/analytics`.
///
/// ```text
/// GET /team    -> team_analytics
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/team", get(analytics::team_analytics))
}
