//! Integration tests for task endpoints: merge rules, normalization, sort
//! order, and the derived payment state.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    create_test_app, create_test_pool, get_request, json_request, parse_response_body,
    seed_circle, seed_task, MEMBER, OWNER,
};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_upsert_task_acknowledges_with_id() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);

    seed_circle(&app, 1, "Family", OWNER).await;

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/tasks/upsert",
            json!({
                "id": 10,
                "circle_id": 1,
                "title": "Pick up prescriptions",
                "created_by": OWNER,
                "completed": false
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["id"], json!(10));
}

#[tokio::test]
async fn test_whitespace_assignee_stored_as_unassigned() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);

    seed_circle(&app, 1, "Family", OWNER).await;
    seed_task(
        &app,
        json!({
            "id": 1,
            "circle_id": 1,
            "title": "Water the plants",
            "created_by": OWNER,
            "assigned_to": "   ",
            "completed": false
        }),
    )
    .await;

    let response = app.oneshot(get_request("/circles/1/tasks")).await.unwrap();
    let body = parse_response_body(response).await;
    // Unassigned renders as null, never as an empty string.
    assert!(body[0]["assigned_to"].is_null());
}

#[tokio::test]
async fn test_task_sort_order() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);

    seed_circle(&app, 1, "Family", OWNER).await;

    // (completed, priority, id) triples from the contract:
    // open-before-completed, then priority desc, then id desc.
    for (id, completed, priority) in [(5, false, 1), (2, false, 3), (9, true, 3)] {
        seed_task(
            &app,
            json!({
                "id": id,
                "circle_id": 1,
                "title": format!("Task {id}"),
                "created_by": OWNER,
                "priority": priority,
                "completed": completed
            }),
        )
        .await;
    }

    let response = app.oneshot(get_request("/circles/1/tasks")).await.unwrap();
    let body = parse_response_body(response).await;
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![2, 5, 9]);
}

#[tokio::test]
async fn test_newest_task_first_within_same_priority() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);

    seed_circle(&app, 1, "Family", OWNER).await;
    for id in [3, 8] {
        seed_task(
            &app,
            json!({
                "id": id,
                "circle_id": 1,
                "title": format!("Task {id}"),
                "created_by": OWNER,
                "priority": 2,
                "completed": false
            }),
        )
        .await;
    }

    let response = app.oneshot(get_request("/circles/1/tasks")).await.unwrap();
    let body = parse_response_body(response).await;
    assert_eq!(body[0]["id"], json!(8));
    assert_eq!(body[1]["id"], json!(3));
}

#[tokio::test]
async fn test_proof_hashes_are_sticky() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);

    seed_circle(&app, 1, "Family", OWNER).await;
    seed_task(
        &app,
        json!({
            "id": 1,
            "circle_id": 1,
            "title": "Grocery run",
            "created_by": OWNER,
            "payment_amount": "5000",
            "tx_hash": "0xaa11bb22",
            "payment_tx_hash": "0xcc33dd44",
            "completed": true
        }),
    )
    .await;

    // A later write omitting both hashes must not clear them.
    seed_task(
        &app,
        json!({
            "id": 1,
            "circle_id": 1,
            "title": "Grocery run (edited)",
            "created_by": OWNER,
            "payment_amount": "5000",
            "completed": true
        }),
    )
    .await;

    let response = app.oneshot(get_request("/circles/1/tasks")).await.unwrap();
    let body = parse_response_body(response).await;
    assert_eq!(body[0]["title"], json!("Grocery run (edited)"));
    assert_eq!(body[0]["tx_hash"], json!("0xaa11bb22"));
    assert_eq!(body[0]["payment_tx_hash"], json!("0xcc33dd44"));
}

#[tokio::test]
async fn test_rejected_flag_is_monotone() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);

    seed_circle(&app, 1, "Family", OWNER).await;
    seed_task(
        &app,
        json!({
            "id": 1,
            "circle_id": 1,
            "title": "Reimburse taxi",
            "created_by": MEMBER,
            "request_money": true,
            "payment_amount": "1200",
            "rejected": true,
            "completed": false
        }),
    )
    .await;

    // Rejection is terminal; an explicit false cannot revive the request.
    seed_task(
        &app,
        json!({
            "id": 1,
            "circle_id": 1,
            "title": "Reimburse taxi",
            "created_by": MEMBER,
            "request_money": true,
            "payment_amount": "1200",
            "rejected": false,
            "completed": false
        }),
    )
    .await;

    let response = app.oneshot(get_request("/circles/1/tasks")).await.unwrap();
    let body = parse_response_body(response).await;
    assert_eq!(body[0]["rejected"], json!(true));
    assert_eq!(body[0]["payment_state"], json!("rejected"));
}

#[tokio::test]
async fn test_open_task_carries_no_completion_facts() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);

    seed_circle(&app, 1, "Family", OWNER).await;
    seed_task(
        &app,
        json!({
            "id": 1,
            "circle_id": 1,
            "title": "Call the pharmacy",
            "created_by": OWNER,
            "completed": true,
            "completed_by": MEMBER
        }),
    )
    .await;

    // Reopening clears completion facts even if the payload still carries
    // stale ones.
    seed_task(
        &app,
        json!({
            "id": 1,
            "circle_id": 1,
            "title": "Call the pharmacy",
            "created_by": OWNER,
            "completed": false,
            "completed_by": MEMBER
        }),
    )
    .await;

    let response = app.oneshot(get_request("/circles/1/tasks")).await.unwrap();
    let body = parse_response_body(response).await;
    assert_eq!(body[0]["completed"], json!(false));
    assert!(body[0].get("completed_by").is_none() || body[0]["completed_by"].is_null());
    assert!(body[0].get("completed_at").is_none() || body[0]["completed_at"].is_null());
}

#[tokio::test]
async fn test_payment_state_progression() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);

    seed_circle(&app, 1, "Family", OWNER).await;

    let base = json!({
        "id": 1,
        "circle_id": 1,
        "title": "Mow the lawn",
        "created_by": OWNER,
        "payment_amount": "2500",
        "completed": false
    });

    seed_task(&app, base.clone()).await;
    let body = parse_response_body(
        app.clone()
            .oneshot(get_request("/circles/1/tasks"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body[0]["payment_state"], json!("open"));

    let mut completed = base.clone();
    completed["completed"] = json!(true);
    seed_task(&app, completed.clone()).await;
    let body = parse_response_body(
        app.clone()
            .oneshot(get_request("/circles/1/tasks"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body[0]["payment_state"], json!("approved"));

    completed["payment_tx_hash"] = json!("0xfeed0011");
    seed_task(&app, completed).await;
    let body = parse_response_body(app.oneshot(get_request("/circles/1/tasks")).await.unwrap())
        .await;
    assert_eq!(body[0]["payment_state"], json!("paid"));
}

#[tokio::test]
async fn test_priority_defaults_to_medium() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);

    seed_circle(&app, 1, "Family", OWNER).await;
    seed_task(
        &app,
        json!({
            "id": 1,
            "circle_id": 1,
            "title": "Fold laundry",
            "created_by": OWNER,
            "completed": false
        }),
    )
    .await;

    let response = app.oneshot(get_request("/circles/1/tasks")).await.unwrap();
    let body = parse_response_body(response).await;
    assert_eq!(body[0]["priority"], json!(1));
    assert_eq!(body[0]["priority_label"], json!("medium"));
}

#[tokio::test]
async fn test_upsert_task_for_unknown_circle_is_404() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/tasks/upsert",
            json!({
                "id": 1,
                "circle_id": 404,
                "title": "Orphan task",
                "created_by": OWNER,
                "completed": false
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
