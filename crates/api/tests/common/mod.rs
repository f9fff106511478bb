#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use chrono::FixedOffset;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use squadline_api::config::ServerConfig;
use squadline_api::router::build_app_router;
use squadline_api::state::AppState;
use squadline_events::EventBus;

/// Build a test `ServerConfig` with safe defaults (UTC reporting day).
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        reporting_offset: FixedOffset::east_opt(0).unwrap(),
        webhook_timeout_secs: 1,
    }
}

/// Build the full application router, middleware included, on `pool`.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_bus(pool, Arc::new(EventBus::default()))
}

/// Same as [`build_test_app`], publishing onto `event_bus`.
pub fn build_test_app_with_bus(pool: PgPool, event_bus: Arc<EventBus>) -> Router {
    build_test_app_with(pool, event_bus, test_config())
}

/// Same as [`build_test_app`] with an explicit configuration.
pub fn build_test_app_with_config(pool: PgPool, config: ServerConfig) -> Router {
    build_test_app_with(pool, Arc::new(EventBus::default()), config)
}

fn build_test_app_with(pool: PgPool, event_bus: Arc<EventBus>, config: ServerConfig) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus,
    };
    build_app_router(state, &config)
}

async fn send(app: Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response {
    send(app, Method::POST, uri, None).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::PUT, uri, Some(body)).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a player through the API and return its id.
pub async fn create_player(pool: &PgPool, first: &str, last: &str) -> i64 {
    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/players",
        serde_json::json!({"first_name": first, "last_name": last}),
    )
    .await;
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Insert an observation with an explicit timestamp, bypassing validation.
pub async fn insert_observation(
    pool: &PgPool,
    player_id: i64,
    kind: &str,
    data: serde_json::Value,
    created_at: chrono::DateTime<chrono::Utc>,
) {
    sqlx::query(
        "INSERT INTO observations (player_id, kind, data, created_at) VALUES ($1, $2, $3, $4)",
    )
    .bind(player_id)
    .bind(kind)
    .bind(data)
    .bind(created_at)
    .execute(pool)
    .await
    .unwrap();
}
