//! Route definitions for the roster and everything scoped to one player.

use axum::routing::get;
use axum::Router;

use crate::handlers::{analytics, messages, objectives, observations, players};
use crate::state::AppState;

/// Routes mounted at `/players`.
///
/// ```text
/// GET, POST         /                      -> list_players, create_player
/// GET, PUT, DELETE  /{id}                  -> get_player, update_player, deactivate_player
/// GET, POST         /{id}/observations     -> list_observations, submit_observation
/// GET               /{id}/injuries         -> list_injuries
/// GET               /{id}/analytics        -> player_analytics
/// GET, POST         /{id}/objectives       -> list_objectives, create_objective
/// GET, POST         /{id}/messages         -> list_messages, send_message
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(players::list_players).post(players::create_player))
        .route(
            "/{id}",
            get(players::get_player)
                .put(players::update_player)
                .delete(players::deactivate_player),
        )
        .route(
            "/{id}/observations",
            get(observations::list_observations).post(observations::submit_observation),
        )
        .route("/{id}/injuries", get(observations::list_injuries))
        .route("/{id}/analytics", get(analytics::player_analytics))
        .route(
            "/{id}/objectives",
            get(objectives::list_objectives).post(objectives::create_objective),
        )
        .route(
            "/{id}/messages",
            get(messages::list_messages).post(messages::send_message),
        )
}
