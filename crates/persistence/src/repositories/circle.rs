//! Repository for circle cache operations.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::entities::CircleEntity;
use crate::metrics::QueryTimer;

const CIRCLE_COLUMNS: &str = "id, name, owner, wallet_key, tx_hash, created_at";

/// Repository for circle rows.
#[derive(Clone)]
pub struct CircleRepository {
    pool: SqlitePool,
}

impl CircleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Merges a candidate circle into the cache.
    ///
    /// `name` and `owner` always take the newest write. `wallet_key`
    /// defaults to the owner key at first insert and keeps its first value
    /// thereafter; `tx_hash` likewise keeps the first non-null value.
    /// Applying the same candidate twice leaves the row unchanged.
    pub async fn upsert(
        &self,
        id: i64,
        name: &str,
        owner: &str,
        wallet_key: Option<&str>,
        tx_hash: Option<&str>,
    ) -> Result<CircleEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_circle");
        let result = sqlx::query_as::<_, CircleEntity>(
            r#"
            INSERT INTO circles (id, name, owner, wallet_key, tx_hash, created_at)
            VALUES (?1, ?2, ?3, COALESCE(?4, ?3), ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                owner = excluded.owner,
                wallet_key = COALESCE(circles.wallet_key, excluded.wallet_key),
                tx_hash = COALESCE(circles.tx_hash, excluded.tx_hash)
            RETURNING id, name, owner, wallet_key, tx_hash, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(owner)
        .bind(wallet_key)
        .bind(tx_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Finds a circle by its ledger id.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<CircleEntity>, sqlx::Error> {
        sqlx::query_as::<_, CircleEntity>(&format!(
            "SELECT {CIRCLE_COLUMNS} FROM circles WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }
}
