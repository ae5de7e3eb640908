//! Repository for task cache operations.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::entities::TaskEntity;
use crate::metrics::QueryTimer;

const TASK_COLUMNS: &str = "id, circle_id, title, description, assigned_to, created_by, \
     priority, payment_amount, request_money, payment_tx_hash, rejected, completed, \
     completed_by, completed_at, tx_hash, created_at";

/// Candidate task state for an upsert. Callers normalize before building
/// this (whitespace assignee collapsed to `None`, completion facts cleared
/// on open tasks).
#[derive(Debug, Clone)]
pub struct TaskUpsert {
    pub id: i64,
    pub circle_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: Option<String>,
    pub created_by: String,
    pub priority: i64,
    pub payment_amount: Option<String>,
    pub request_money: bool,
    pub payment_tx_hash: Option<String>,
    pub rejected: Option<bool>,
    pub completed: bool,
    pub completed_by: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub tx_hash: Option<String>,
}

/// Repository for task rows.
#[derive(Clone)]
pub struct TaskRepository {
    pool: SqlitePool,
}

impl TaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Merges a candidate task into the cache.
    ///
    /// Most fields take the newest write. `tx_hash` and `payment_tx_hash`
    /// are sticky (incoming non-null wins, incoming null never clears);
    /// `rejected` is monotone and can only move from false to true.
    /// A completed task with no caller-supplied timestamp is stamped with
    /// the server clock.
    pub async fn upsert(&self, input: &TaskUpsert) -> Result<TaskEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_task");
        let now = Utc::now();
        let completed_at = if input.completed {
            Some(input.completed_at.unwrap_or(now))
        } else {
            None
        };

        let result = sqlx::query_as::<_, TaskEntity>(
            r#"
            INSERT INTO tasks (id, circle_id, title, description, assigned_to, created_by,
                               priority, payment_amount, request_money, payment_tx_hash,
                               rejected, completed, completed_by, completed_at, tx_hash,
                               created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                    COALESCE(?11, 0), ?12, ?13, ?14, ?15, ?16)
            ON CONFLICT(id) DO UPDATE SET
                circle_id = excluded.circle_id,
                title = excluded.title,
                description = excluded.description,
                assigned_to = excluded.assigned_to,
                created_by = excluded.created_by,
                priority = excluded.priority,
                payment_amount = excluded.payment_amount,
                request_money = excluded.request_money,
                payment_tx_hash = COALESCE(excluded.payment_tx_hash, tasks.payment_tx_hash),
                rejected = MAX(tasks.rejected, excluded.rejected),
                completed = excluded.completed,
                completed_by = excluded.completed_by,
                completed_at = excluded.completed_at,
                tx_hash = COALESCE(excluded.tx_hash, tasks.tx_hash)
            RETURNING id, circle_id, title, description, assigned_to, created_by,
                      priority, payment_amount, request_money, payment_tx_hash, rejected,
                      completed, completed_by, completed_at, tx_hash, created_at
            "#,
        )
        .bind(input.id)
        .bind(input.circle_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.assigned_to)
        .bind(&input.created_by)
        .bind(input.priority)
        .bind(&input.payment_amount)
        .bind(input.request_money)
        .bind(&input.payment_tx_hash)
        .bind(input.rejected)
        .bind(input.completed)
        .bind(&input.completed_by)
        .bind(completed_at)
        .bind(&input.tx_hash)
        .bind(now)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Lists a circle's tasks: incomplete before complete, then priority
    /// descending, then id descending (newest first within ties).
    pub async fn list_by_circle(&self, circle_id: i64) -> Result<Vec<TaskEntity>, sqlx::Error> {
        sqlx::query_as::<_, TaskEntity>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE circle_id = ?1
            ORDER BY completed ASC, priority DESC, id DESC
            "#
        ))
        .bind(circle_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Finds a task by its ledger id.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<TaskEntity>, sqlx::Error> {
        sqlx::query_as::<_, TaskEntity>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }
}
