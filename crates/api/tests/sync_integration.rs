//! Integration tests for the client synchronization loop: level-triggered
//! polling, wholesale snapshot replacement, and clean cancellation when the
//! watched circle changes.

mod common;

use std::time::Duration;

use carecircle_api::sync::CircleWatcher;
use common::{create_test_app, create_test_pool, seed_circle, seed_member, seed_task, MEMBER, OWNER};
use serde_json::json;

const TICK: Duration = Duration::from_millis(50);

#[tokio::test]
async fn test_watcher_populates_snapshot() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool.clone());

    seed_circle(&app, 1, "Family", OWNER).await;
    seed_member(&app, json!({"circle_id": 1, "address": OWNER, "is_owner": true})).await;
    seed_task(
        &app,
        json!({
            "id": 1,
            "circle_id": 1,
            "title": "Water the plants",
            "created_by": OWNER,
            "completed": false
        }),
    )
    .await;

    let watcher = CircleWatcher::new(pool, TICK);
    watcher.watch(1).await;
    tokio::time::sleep(TICK * 3).await;

    let snapshot = watcher.snapshot().await.expect("snapshot should exist");
    assert_eq!(snapshot.circle_id, 1);
    assert_eq!(snapshot.tasks.len(), 1);
    assert_eq!(snapshot.members.len(), 1);
    assert_eq!(snapshot.stats.total_tasks, 1);
    assert_eq!(snapshot.stats.completion_rate, 0);

    watcher.stop().await;
}

#[tokio::test]
async fn test_watcher_picks_up_new_rows_on_later_ticks() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool.clone());

    seed_circle(&app, 1, "Family", OWNER).await;

    let watcher = CircleWatcher::new(pool, TICK);
    watcher.watch(1).await;
    tokio::time::sleep(TICK * 2).await;

    let before = watcher.snapshot().await.unwrap();
    assert_eq!(before.stats.total_tasks, 0);

    // Level-triggered: the next full re-read sees the new task without any
    // change notification.
    seed_task(
        &app,
        json!({
            "id": 5,
            "circle_id": 1,
            "title": "Refill pillbox",
            "created_by": OWNER,
            "completed": false
        }),
    )
    .await;
    tokio::time::sleep(TICK * 3).await;

    let after = watcher.snapshot().await.unwrap();
    assert_eq!(after.stats.total_tasks, 1);
    assert!(after.refreshed_at >= before.refreshed_at);

    watcher.stop().await;
}

#[tokio::test]
async fn test_watcher_switches_circles_cleanly() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool.clone());

    seed_circle(&app, 1, "First", OWNER).await;
    seed_circle(&app, 2, "Second", MEMBER).await;
    seed_task(
        &app,
        json!({
            "id": 1,
            "circle_id": 1,
            "title": "Only in first circle",
            "created_by": OWNER,
            "completed": false
        }),
    )
    .await;

    let watcher = CircleWatcher::new(pool, TICK);
    watcher.watch(1).await;
    tokio::time::sleep(TICK * 2).await;
    assert_eq!(watcher.watched_circle().await, Some(1));

    // Switching stops the old poller and replaces the snapshot wholesale.
    watcher.watch(2).await;
    assert_eq!(watcher.watched_circle().await, Some(2));
    tokio::time::sleep(TICK * 3).await;

    let snapshot = watcher.snapshot().await.unwrap();
    assert_eq!(snapshot.circle_id, 2);
    assert_eq!(snapshot.tasks.len(), 0);

    watcher.stop().await;
    assert_eq!(watcher.watched_circle().await, None);
}

#[tokio::test]
async fn test_watcher_tolerates_unknown_circle() {
    let pool = create_test_pool().await;

    // Nothing cached for this circle at all; every tick just yields an
    // empty snapshot instead of failing.
    let watcher = CircleWatcher::new(pool, TICK);
    watcher.watch(42).await;
    tokio::time::sleep(TICK * 2).await;

    let snapshot = watcher.snapshot().await.unwrap();
    assert_eq!(snapshot.circle_id, 42);
    assert_eq!(snapshot.stats.total_tasks, 0);
    assert_eq!(snapshot.stats.member_count, 0);

    watcher.stop().await;
}
