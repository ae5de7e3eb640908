//! Member entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the members table, keyed by (circle_id, address).
#[derive(Debug, Clone, FromRow)]
pub struct MemberEntity {
    pub circle_id: i64,
    pub address: String,
    pub name: Option<String>,
    pub is_owner: bool,
    pub tx_hash: Option<String>,
    pub joined_at: DateTime<Utc>,
}
