//! Common test utilities for integration tests.
//!
//! Tests run against an isolated in-memory SQLite database with the full
//! schema applied, driving the router directly with `tower::ServiceExt`.

// Helper utilities shared across integration tests; not every test uses
// every helper.
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use carecircle_api::app::create_app;
use carecircle_api::config::Config;
use carecircle_api::services::ledger::LedgerGateway;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower::ServiceExt;

/// Opens an isolated in-memory database with the schema applied.
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Test configuration (embedded defaults, no filesystem access).
pub fn test_config() -> Config {
    Config::load_for_test(&[]).expect("Failed to build test config")
}

/// Router wired to the given pool, cache-only.
pub fn create_test_app(pool: SqlitePool) -> Router {
    create_app(test_config(), pool, None)
}

/// Router wired to the given pool and a ledger gateway.
pub fn create_test_app_with_ledger(pool: SqlitePool, ledger: Arc<dyn LedgerGateway>) -> Router {
    create_app(test_config(), pool, Some(ledger))
}

/// Builds a JSON request.
pub fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Builds a GET request.
pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Reads and parses a JSON response body.
pub async fn parse_response_body(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&bytes).expect("Response body was not JSON")
}

/// Well-formed test addresses.
pub const OWNER: &str = "aaaaaaaaaaaaaaaa";
pub const MEMBER: &str = "bbbbbbbbbbbbbbbb";
pub const OTHER: &str = "cccccccccccccccc";

/// Upserts a circle through the API.
pub async fn seed_circle(app: &Router, id: i64, name: &str, owner: &str) {
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/circles/upsert",
            serde_json::json!({"id": id, "name": name, "owner": owner}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

/// Upserts a task through the API.
pub async fn seed_task(app: &Router, body: serde_json::Value) {
    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/tasks/upsert", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

/// Upserts a member through the API.
pub async fn seed_member(app: &Router, body: serde_json::Value) {
    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/members/upsert", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
