use axum::routing::put;
use axum::Router;

use crate::handlers::objectives;
use crate::state::AppState;

/// Routes mounted at `/objectives`.
///
/// ```text
/// PUT /{id}    -> update_objective
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", put(objectives::update_objective))
}
