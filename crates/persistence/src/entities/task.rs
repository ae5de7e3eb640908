//! Task entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::services::payment::PaymentState;
use sqlx::FromRow;

/// Database row mapping for the tasks table.
#[derive(Debug, Clone, FromRow)]
pub struct TaskEntity {
    pub id: i64,
    pub circle_id: i64,
    pub title: String,
    pub description: Option<String>,
    /// NULL means unassigned; an empty string is never stored.
    pub assigned_to: Option<String>,
    pub created_by: String,
    pub priority: i64,
    pub payment_amount: Option<String>,
    pub request_money: bool,
    pub payment_tx_hash: Option<String>,
    pub rejected: bool,
    pub completed: bool,
    pub completed_by: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub tx_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TaskEntity {
    /// Derived payment lifecycle state for this row.
    pub fn payment_state(&self) -> PaymentState {
        PaymentState::derive(
            self.payment_amount.as_deref(),
            self.request_money,
            self.completed,
            self.rejected,
            self.payment_tx_hash.as_deref(),
        )
    }
}
