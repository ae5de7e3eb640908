//! Circle domain models.
//!
//! A circle is a caregiving group recorded on the ledger; the cache only
//! mirrors it. Candidate payloads arrive after the client has confirmed the
//! corresponding ledger write.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use shared::validation::{non_empty, validate_address, validate_tx_hash};

/// Candidate circle state submitted for cache reconciliation.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpsertCircleRequest {
    /// Ledger-assigned circle id.
    #[validate(range(min = 1, message = "Circle id must be a positive integer"))]
    pub id: i64,

    /// Display name; always replaced by the latest write.
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: String,

    /// Owner public key; always replaced by the latest write.
    #[validate(custom(function = "validate_address"))]
    pub owner: String,

    /// Circle wallet key; defaults to the owner key, first write wins.
    #[validate(custom(function = "validate_address"))]
    pub wallet_key: Option<String>,

    /// Ledger transaction that recorded the circle; first write wins.
    #[validate(custom(function = "validate_tx_hash"))]
    pub tx_hash: Option<String>,
}

impl UpsertCircleRequest {
    /// Trims string fields and collapses empty optionals to `None`.
    ///
    /// Must run before validation so that whitespace-only optional values
    /// read as absent rather than malformed.
    pub fn normalized(self) -> Self {
        Self {
            id: self.id,
            name: self.name.trim().to_string(),
            owner: self.owner.trim().to_string(),
            wallet_key: non_empty(self.wallet_key),
            tx_hash: non_empty(self.tx_hash),
        }
    }
}

/// A cached circle as served to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CircleResponse {
    pub id: i64,
    pub name: String,
    pub owner: String,
    pub wallet_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Response for a circle upsert.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UpsertCircleResponse {
    pub ok: bool,
    pub id: i64,
    pub circle: CircleResponse,
}
