//! Circle entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the circles table.
///
/// `wallet_key` is always populated: it defaults to the owner key at first
/// insert and keeps the first non-empty value written thereafter.
#[derive(Debug, Clone, FromRow)]
pub struct CircleEntity {
    pub id: i64,
    pub name: String,
    pub owner: String,
    pub wallet_key: String,
    pub tx_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}
