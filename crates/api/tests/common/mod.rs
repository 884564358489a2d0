//! Router harness over an in-memory SQLite database.

#![allow(dead_code)]

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use hwf_api::{AppState, create_router};
use hwf_db::{connect_with, run_migrations};
use hwf_shared::DatabaseConfig;
use serde_json::Value;
use tower::ServiceExt;

/// Builds the full router on a fresh migrated database.
pub async fn app() -> Router {
    let mut config = DatabaseConfig::with_url("sqlite::memory:");
    config.max_connections = 1;
    config.min_connections = 1;

    let db = connect_with(&config).await.expect("connect to sqlite");
    run_migrations(&db).await.expect("apply migrations");
    create_router(AppState::new(db), Duration::from_secs(10))
}

/// Sends a request and returns the status and decoded JSON body.
///
/// Empty bodies decode to `Value::Null`.
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("build request");

    let response = app.clone().oneshot(request).await.expect("router responds");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, json)
}

/// Creates a row and returns its id.
pub async fn create(app: &Router, uri: &str, body: Value) -> i64 {
    let (status, json) = send(app, Method::POST, uri, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "POST {uri}: {json}");
    json["id"].as_i64().expect("id in response")
}
