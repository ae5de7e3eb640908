//! Client synchronization loop.
//!
//! A level-triggered poller for one watched circle: every tick re-fetches
//! tasks, members, and stats from the cache and replaces the shared
//! snapshot wholesale. There is no delta computation and no backoff; a
//! failed tick logs and leaves the previous snapshot in place until the
//! next interval. Switching circles stops the old poller before the new
//! one starts, which is the only cancellation path in the system.

use chrono::{DateTime, Utc};
use domain::models::CircleStatsResponse;
use persistence::entities::{MemberEntity, TaskEntity};
use persistence::repositories::{MemberRepository, StatsRepository, TaskRepository};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Full view state for one circle, replaced wholesale on every refresh.
#[derive(Debug, Clone)]
pub struct CircleSnapshot {
    pub circle_id: i64,
    pub tasks: Vec<TaskEntity>,
    pub members: Vec<MemberEntity>,
    pub stats: CircleStatsResponse,
    pub refreshed_at: DateTime<Utc>,
}

struct ActivePoll {
    circle_id: i64,
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Timer-driven poller keeping a snapshot of the watched circle current.
pub struct CircleWatcher {
    pool: SqlitePool,
    interval: Duration,
    snapshot: Arc<RwLock<Option<CircleSnapshot>>>,
    active: Mutex<Option<ActivePoll>>,
}

impl CircleWatcher {
    pub fn new(pool: SqlitePool, interval: Duration) -> Self {
        Self {
            pool,
            interval,
            snapshot: Arc::new(RwLock::new(None)),
            active: Mutex::new(None),
        }
    }

    /// Starts polling `circle_id`, stopping any previous poller first.
    ///
    /// The first refresh happens immediately; subsequent ones on the
    /// configured interval.
    pub async fn watch(&self, circle_id: i64) {
        let mut active = self.active.lock().await;
        if let Some(previous) = active.take() {
            info!(
                old_circle_id = previous.circle_id,
                new_circle_id = circle_id,
                "Switching watched circle"
            );
            let _ = previous.shutdown.send(true);
            let _ = previous.handle.await;
        }

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let pool = self.pool.clone();
        let snapshot = Arc::clone(&self.snapshot);
        let interval = self.interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match refresh(&pool, circle_id).await {
                            Ok(next) => {
                                *snapshot.write().await = Some(next);
                            }
                            Err(err) => {
                                warn!(
                                    circle_id,
                                    error = %err,
                                    "Sync tick failed; retrying next interval"
                                );
                            }
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }
        });

        *active = Some(ActivePoll {
            circle_id,
            shutdown: shutdown_tx,
            handle,
        });
    }

    /// Stops the poller, if one is running. The last snapshot stays
    /// readable.
    pub async fn stop(&self) {
        if let Some(previous) = self.active.lock().await.take() {
            let _ = previous.shutdown.send(true);
            let _ = previous.handle.await;
        }
    }

    /// The circle currently being polled.
    pub async fn watched_circle(&self) -> Option<i64> {
        self.active.lock().await.as_ref().map(|a| a.circle_id)
    }

    /// Latest snapshot, if any refresh has succeeded yet.
    pub async fn snapshot(&self) -> Option<CircleSnapshot> {
        self.snapshot.read().await.clone()
    }
}

async fn refresh(pool: &SqlitePool, circle_id: i64) -> Result<CircleSnapshot, sqlx::Error> {
    let tasks = TaskRepository::new(pool.clone())
        .list_by_circle(circle_id)
        .await?;
    let members = MemberRepository::new(pool.clone())
        .list_by_circle(circle_id)
        .await?;
    let totals = StatsRepository::new(pool.clone())
        .circle_totals(circle_id)
        .await?;

    Ok(CircleSnapshot {
        circle_id,
        tasks,
        members,
        stats: CircleStatsResponse::from_totals(
            totals.total_tasks,
            totals.completed_tasks,
            totals.member_count,
        ),
        refreshed_at: Utc::now(),
    })
}
