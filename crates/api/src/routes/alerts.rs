//! Route definitions for alert configuration and history.

use axum::routing::get;
use axum::Router;

use crate::handlers::alerts;
use crate::state::AppState;

/// Routes mounted at `/alerts`.
///
/// ```text
/// GET, PUT  /settings    -> get_settings, update_settings
/// GET       /records     -> list_records
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/settings",
            get(alerts::get_settings).put(alerts::update_settings),
        )
        .route("/records", get(alerts::list_records))
}
