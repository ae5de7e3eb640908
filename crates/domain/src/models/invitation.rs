//! Invitation domain models.
//!
//! Invitations are the one entity the cache owns outright: a time-boxed,
//! single-use token that grants circle membership on acceptance. Tokens are
//! shown only once, in the creation response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use shared::validation::{non_empty, validate_address};

/// Request to create a new invitation.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct SendInvitationRequest {
    #[validate(range(min = 1, message = "Circle id must be a positive integer"))]
    pub circle_id: i64,

    /// Email address of the invitee.
    #[validate(email(message = "Invalid email address"))]
    #[validate(length(max = 255, message = "Email must be at most 255 characters"))]
    pub email: String,

    /// Display name the invitee will join under (sticky on the member row).
    #[validate(length(min = 1, max = 120, message = "Member name must be 1-120 characters"))]
    pub member_name: String,

    /// Name of the inviting member, for the invitation text.
    #[validate(length(max = 120, message = "Inviter name must be at most 120 characters"))]
    pub inviter_name: Option<String>,

    /// Days until expiration (1-30, default 7).
    #[validate(range(min = 1, max = 30, message = "Expiration must be between 1 and 30 days"))]
    pub expires_in_days: Option<i64>,
}

impl SendInvitationRequest {
    /// Trims string fields and collapses empty optionals to `None`.
    pub fn normalized(self) -> Self {
        Self {
            circle_id: self.circle_id,
            email: self.email.trim().to_string(),
            member_name: self.member_name.trim().to_string(),
            inviter_name: non_empty(self.inviter_name),
            expires_in_days: self.expires_in_days,
        }
    }
}

/// Response after creating an invitation. The token appears here and
/// nowhere else.
#[derive(Debug, Clone, Serialize)]
pub struct SendInvitationResponse {
    pub success: bool,
    pub token: String,
    #[serde(rename = "joinUrl")]
    pub join_url: String,
    pub expires_at: DateTime<Utc>,
}

/// Request to accept an invitation.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct AcceptInvitationRequest {
    /// Ledger address of the accepting wallet.
    #[validate(custom(function = "validate_address"))]
    pub address: String,
}

/// Response after accepting an invitation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AcceptInvitationResponse {
    pub success: bool,
    pub circle_id: i64,
    pub circle_name: String,
    pub member_name: String,
}

/// Invitation status as derived from the stored row.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Expired,
}

/// An invitation as listed to circle members (token withheld).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InvitationResponse {
    pub circle_id: i64,
    pub email: String,
    pub member_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inviter_name: Option<String>,
    pub status: InvitationStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_address: Option<String>,
}

/// Query parameters for listing invitations.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct ListInvitationsQuery {
    /// Filter: "pending", "accepted", "expired", or "all" (default).
    pub status: Option<String>,
}

impl ListInvitationsQuery {
    /// Whether a derived status passes this filter.
    pub fn matches(&self, status: InvitationStatus) -> bool {
        match self.status.as_deref() {
            Some("pending") => status == InvitationStatus::Pending,
            Some("accepted") => status == InvitationStatus::Accepted,
            Some("expired") => status == InvitationStatus::Expired,
            _ => true,
        }
    }
}

/// Response for listing invitations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListInvitationsResponse {
    pub invitations: Vec<InvitationResponse>,
    pub summary: InvitationSummary,
}

/// Summary counts across all of a circle's invitations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InvitationSummary {
    pub pending: i64,
    pub accepted: i64,
    pub expired: i64,
}
