//! Repository for member cache operations.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::entities::MemberEntity;

const MEMBER_COLUMNS: &str = "circle_id, address, name, is_owner, tx_hash, joined_at";

/// Repository for member rows, keyed by (circle_id, address).
#[derive(Clone)]
pub struct MemberRepository {
    pool: SqlitePool,
}

impl MemberRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Merges a candidate member into the cache.
    ///
    /// `name` and `tx_hash` are sticky: an incoming non-null value wins,
    /// an incoming null never clears a stored value. `is_owner` always
    /// takes the newest write. `joined_at` is stamped once at first insert.
    pub async fn upsert(
        &self,
        circle_id: i64,
        address: &str,
        name: Option<&str>,
        is_owner: bool,
        tx_hash: Option<&str>,
    ) -> Result<MemberEntity, sqlx::Error> {
        sqlx::query_as::<_, MemberEntity>(
            r#"
            INSERT INTO members (circle_id, address, name, is_owner, tx_hash, joined_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(circle_id, address) DO UPDATE SET
                name = COALESCE(excluded.name, members.name),
                is_owner = excluded.is_owner,
                tx_hash = COALESCE(excluded.tx_hash, members.tx_hash)
            RETURNING circle_id, address, name, is_owner, tx_hash, joined_at
            "#,
        )
        .bind(circle_id)
        .bind(address)
        .bind(name)
        .bind(is_owner)
        .bind(tx_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
    }

    /// Lists a circle's members: owner first, then by join order.
    pub async fn list_by_circle(&self, circle_id: i64) -> Result<Vec<MemberEntity>, sqlx::Error> {
        sqlx::query_as::<_, MemberEntity>(&format!(
            r#"
            SELECT {MEMBER_COLUMNS}
            FROM members
            WHERE circle_id = ?1
            ORDER BY is_owner DESC, joined_at ASC, address ASC
            "#
        ))
        .bind(circle_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Finds one member row.
    pub async fn find(
        &self,
        circle_id: i64,
        address: &str,
    ) -> Result<Option<MemberEntity>, sqlx::Error> {
        sqlx::query_as::<_, MemberEntity>(&format!(
            "SELECT {MEMBER_COLUMNS} FROM members WHERE circle_id = ?1 AND address = ?2"
        ))
        .bind(circle_id)
        .bind(address)
        .fetch_optional(&self.pool)
        .await
    }

    /// Counts a circle's members.
    pub async fn count_by_circle(&self, circle_id: i64) -> Result<i64, sqlx::Error> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM members WHERE circle_id = ?1")
                .bind(circle_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count.0)
    }
}
