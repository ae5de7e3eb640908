//! Member domain models.
//!
//! Membership is keyed by (circle, address). The display name is sticky:
//! once a non-empty name is stored it survives later writes that omit one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use shared::validation::{non_empty, validate_address, validate_tx_hash};

/// Candidate member state submitted for cache reconciliation.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpsertMemberRequest {
    #[validate(range(min = 1, message = "Circle id must be a positive integer"))]
    pub circle_id: i64,

    /// Member public key.
    #[validate(custom(function = "validate_address"))]
    pub address: String,

    /// Display name; sticky (coalesced on write).
    #[validate(length(max = 120, message = "Name must be at most 120 characters"))]
    pub name: Option<String>,

    /// Ownership flag; always replaced by the latest write.
    pub is_owner: Option<bool>,

    /// Ledger transaction that recorded the membership; sticky.
    #[validate(custom(function = "validate_tx_hash"))]
    pub tx_hash: Option<String>,
}

impl UpsertMemberRequest {
    /// Trims string fields and collapses empty optionals to `None`.
    pub fn normalized(self) -> Self {
        Self {
            circle_id: self.circle_id,
            address: self.address.trim().to_string(),
            name: non_empty(self.name),
            is_owner: self.is_owner,
            tx_hash: non_empty(self.tx_hash),
        }
    }

    /// Ownership flag with its default applied.
    pub fn is_owner(&self) -> bool {
        self.is_owner.unwrap_or(false)
    }
}

/// A cached member as served to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MemberResponse {
    pub circle_id: i64,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub is_owner: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    pub joined_at: DateTime<Utc>,
}

/// Response for a member upsert.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UpsertMemberResponse {
    pub ok: bool,
}
