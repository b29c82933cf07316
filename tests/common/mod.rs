//! Shared helpers for the HTTP integration tests.
//!
//! Each test file is its own crate, so not every helper is used everywhere.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use player_api::db::{MemoryPlayerStore, PlayerStore, SqlitePlayerStore};
use player_api::response::ResponseShape;
use player_api::{routes, AppState};

/// Store backed by a private in-memory SQLite database.
pub async fn sqlite_store() -> Arc<dyn PlayerStore> {
    // A single connection keeps every query on the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    Arc::new(SqlitePlayerStore::with_pool(pool).await.expect("players table"))
}

/// One router per store implementation, all using `shape`.
pub async fn apps(shape: ResponseShape) -> Vec<(&'static str, Router)> {
    let memory: Arc<dyn PlayerStore> = Arc::new(MemoryPlayerStore::new());
    vec![
        ("sqlite", app_with(sqlite_store().await, shape)),
        ("memory", app_with(memory, shape)),
    ]
}

pub fn app_with(store: Arc<dyn PlayerStore>, shape: ResponseShape) -> Router {
    routes::router(AppState::new(store).with_response_shape(shape))
}

pub fn app_with_state(state: AppState) -> Router {
    routes::router(state)
}

/// Send a request with an optional raw body and decode the JSON response.
pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<&str>,
    json_content_type: bool,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if json_content_type {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let request = builder
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .expect("request");

    let response = app.clone().oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("response body")
        .to_bytes();

    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json response body")
    };
    (status, json)
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = body.map(|value| value.to_string());
    send_raw(app, method, uri, body.as_deref(), true).await
}

pub fn player_body(name: &str, region: &str, position: &str) -> Value {
    serde_json::json!({ "name": name, "region": region, "position": position })
}

/// Create a player through the API and return its id.
pub async fn create(app: &Router, name: &str, region: &str, position: &str) -> String {
    let (status, body) = send(app, Method::POST, "/player", Some(player_body(name, region, position))).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_str().expect("id in created player").to_string()
}
