use std::sync::Arc;

use squadline_events::EventBus;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything inside is behind `Arc` or is a pool handle.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: squadline_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Event bus; submissions are published here for the alert listener.
    pub event_bus: Arc<EventBus>,
}
