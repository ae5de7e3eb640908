//! Repository for circle aggregate counts.

use sqlx::SqlitePool;

/// Raw counts backing the circle stats endpoint. Rate computation lives in
/// the domain layer, where the zero-task case is guarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircleTotals {
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub member_count: i64,
}

/// Repository for computed aggregates.
#[derive(Clone)]
pub struct StatsRepository {
    pool: SqlitePool,
}

impl StatsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Fetches task and member totals for one circle.
    pub async fn circle_totals(&self, circle_id: i64) -> Result<CircleTotals, sqlx::Error> {
        let row: (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM tasks WHERE circle_id = ?1),
                (SELECT COUNT(*) FROM tasks WHERE circle_id = ?1 AND completed = 1),
                (SELECT COUNT(*) FROM members WHERE circle_id = ?1)
            "#,
        )
        .bind(circle_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(CircleTotals {
            total_tasks: row.0,
            completed_tasks: row.1,
            member_count: row.2,
        })
    }
}
