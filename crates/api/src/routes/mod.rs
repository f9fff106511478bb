pub mod alerts;
pub mod analytics;
pub mod health;
pub mod messages;
pub mod objectives;
pub mod players;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /players                                  list, create
/// /players/{id}                             get, update, deactivate
/// /players/{id}/observations                history, submit
/// /players/{id}/injuries                    active injuries (latest report)
/// /players/{id}/analytics                   chart series for one player
/// /players/{id}/objectives                  list, create
/// /players/{id}/messages                    inbox, send
///
/// /analytics/team                           selection vs whole roster
///
/// /objectives/{id}                          update
///
/// /messages/{id}/read                       mark as read (POST)
///
/// /alerts/settings                          get, replace
/// /alerts/records                           delivery audit log
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/players", players::router())
        .nest("/analytics", analytics::router())
        .nest("/objectives", objectives::router())
        .nest("/messages", messages::router())
        .nest("/alerts", alerts::router())
}
