//! Invitation entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::InvitationStatus;
use sqlx::FromRow;

/// Stored status for an invitation awaiting acceptance.
pub const STATUS_PENDING: &str = "pending";

/// Stored status for a consumed invitation.
pub const STATUS_ACCEPTED: &str = "accepted";

/// Database row mapping for the invitations table.
#[derive(Debug, Clone, FromRow)]
pub struct InvitationEntity {
    pub token: String,
    pub circle_id: i64,
    pub email: String,
    pub member_name: String,
    pub inviter_name: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub accepted_address: Option<String>,
}

impl InvitationEntity {
    /// True if the invitation has been consumed.
    pub fn is_accepted(&self) -> bool {
        self.status == STATUS_ACCEPTED
    }

    /// True if the invitation is past its expiry and still unconsumed.
    pub fn is_expired(&self) -> bool {
        !self.is_accepted() && self.expires_at <= Utc::now()
    }

    /// True if the invitation can still be accepted.
    pub fn is_valid(&self) -> bool {
        !self.is_accepted() && self.expires_at > Utc::now()
    }

    /// Status as derived from the stored row and the clock.
    pub fn derived_status(&self) -> InvitationStatus {
        if self.is_accepted() {
            InvitationStatus::Accepted
        } else if self.is_expired() {
            InvitationStatus::Expired
        } else {
            InvitationStatus::Pending
        }
    }
}
