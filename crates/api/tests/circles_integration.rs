//! Integration tests for circle endpoints: upsert merge rules, read-through
//! lookup, and stats.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    create_test_app, create_test_pool, get_request, json_request, parse_response_body,
    seed_circle, seed_member, seed_task, MEMBER, OWNER,
};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_upsert_and_get_circle() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/circles/upsert",
            json!({"id": 1, "name": "Family", "owner": OWNER}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["id"], json!(1));
    // wallet_key defaults to the owner key
    assert_eq!(body["circle"]["wallet_key"], json!(OWNER));

    let response = app.oneshot(get_request("/circles/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["name"], json!("Family"));
    assert_eq!(body["owner"], json!(OWNER));
}

#[tokio::test]
async fn test_get_unknown_circle_returns_null() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);

    let response = app.oneshot(get_request("/circles/99")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert!(body.is_null());
}

#[tokio::test]
async fn test_upsert_rejects_invalid_payload() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);

    // Zero id
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/circles/upsert",
            json!({"id": 0, "name": "Family", "owner": OWNER}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], json!("validation_error"));

    // Empty name
    let response = app
        .oneshot(json_request(
            Method::POST,
            "/circles/upsert",
            json!({"id": 1, "name": "  ", "owner": OWNER}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upsert_is_idempotent() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);

    let payload = json!({
        "id": 3,
        "name": "Weekend Crew",
        "owner": OWNER,
        "tx_hash": "0xabcdef12"
    });

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/circles/upsert", payload.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.oneshot(get_request("/circles/3")).await.unwrap();
    let body = parse_response_body(response).await;
    assert_eq!(body["name"], json!("Weekend Crew"));
    assert_eq!(body["tx_hash"], json!("0xabcdef12"));
}

#[tokio::test]
async fn test_tx_hash_is_sticky_across_rewrites() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);

    // First write carries the provenance hash.
    seed_circle(&app, 5, "Original", OWNER).await;
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/circles/upsert",
            json!({"id": 5, "name": "Original", "owner": OWNER, "tx_hash": "0x11223344"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Later write renames the circle and omits the hash entirely.
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/circles/upsert",
            json!({"id": 5, "name": "Renamed", "owner": OWNER}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get_request("/circles/5")).await.unwrap();
    let body = parse_response_body(response).await;
    assert_eq!(body["name"], json!("Renamed"));
    assert_eq!(body["tx_hash"], json!("0x11223344"));
}

#[tokio::test]
async fn test_wallet_key_first_write_wins() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);

    // No wallet key supplied: defaults to the owner key.
    seed_circle(&app, 6, "Circle", OWNER).await;

    // A later wallet key does not displace the first one.
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/circles/upsert",
            json!({"id": 6, "name": "Circle", "owner": OWNER, "wallet_key": MEMBER}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get_request("/circles/6")).await.unwrap();
    let body = parse_response_body(response).await;
    assert_eq!(body["wallet_key"], json!(OWNER));
}

#[tokio::test]
async fn test_stats_empty_circle_has_zero_rate() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);

    seed_circle(&app, 1, "Family", OWNER).await;

    let response = app.oneshot(get_request("/circles/1/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["total_tasks"], json!(0));
    assert_eq!(body["completed_tasks"], json!(0));
    assert_eq!(body["open_tasks"], json!(0));
    assert_eq!(body["completion_rate"], json!(0));
    assert_eq!(body["member_count"], json!(0));
}

#[tokio::test]
async fn test_stats_counts_and_rounds() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);

    seed_circle(&app, 1, "Family", OWNER).await;
    seed_member(&app, json!({"circle_id": 1, "address": OWNER, "is_owner": true})).await;
    seed_member(&app, json!({"circle_id": 1, "address": MEMBER})).await;

    for (id, completed) in [(1, true), (2, false), (3, false)] {
        seed_task(
            &app,
            json!({
                "id": id,
                "circle_id": 1,
                "title": format!("Task {id}"),
                "created_by": OWNER,
                "completed": completed
            }),
        )
        .await;
    }

    let response = app.oneshot(get_request("/circles/1/stats")).await.unwrap();
    let body = parse_response_body(response).await;
    assert_eq!(body["total_tasks"], json!(3));
    assert_eq!(body["completed_tasks"], json!(1));
    assert_eq!(body["open_tasks"], json!(2));
    assert_eq!(body["completion_rate"], json!(33));
    assert_eq!(body["member_count"], json!(2));
}

#[tokio::test]
async fn test_stats_unknown_circle_is_404() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);

    let response = app.oneshot(get_request("/circles/42/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], json!("not_found"));
}
