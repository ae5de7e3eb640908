//! Task domain models.
//!
//! Tasks are the unit of caregiving work. A task may carry a payment in
//! either direction: `request_money = false` means "pay on completion",
//! `request_money = true` means the assignee is requesting money from the
//! circle wallet. Proof hashes (`tx_hash`, `payment_tx_hash`) are
//! append-only provenance and never regress from set to unset.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use shared::amount::validate_amount;
use shared::validation::{non_empty, validate_address, validate_tx_hash};

use crate::services::payment::PaymentState;

/// Task priority, mirrored from the ledger as an integer 0-3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

/// Error for out-of-range priority values.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("priority out of range: {0}")]
pub struct InvalidPriority(pub i64);

impl TaskPriority {
    /// Maps the ledger integer onto the priority scale.
    pub fn from_value(value: i64) -> Result<Self, InvalidPriority> {
        match value {
            0 => Ok(TaskPriority::Low),
            1 => Ok(TaskPriority::Medium),
            2 => Ok(TaskPriority::High),
            3 => Ok(TaskPriority::Urgent),
            other => Err(InvalidPriority(other)),
        }
    }

    /// The ledger integer for this priority.
    pub fn value(self) -> i64 {
        match self {
            TaskPriority::Low => 0,
            TaskPriority::Medium => 1,
            TaskPriority::High => 2,
            TaskPriority::Urgent => 3,
        }
    }

    /// Human-readable label, as shown in clients.
    pub fn label(self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Urgent => "urgent",
        }
    }
}

/// Candidate task state submitted for cache reconciliation.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpsertTaskRequest {
    /// Ledger-assigned task id.
    #[validate(range(min = 1, message = "Task id must be a positive integer"))]
    pub id: i64,

    #[validate(range(min = 1, message = "Circle id must be a positive integer"))]
    pub circle_id: i64,

    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    /// Assignee public key; empty or whitespace means unassigned.
    #[validate(custom(function = "validate_address"))]
    pub assigned_to: Option<String>,

    /// Creator public key.
    #[validate(custom(function = "validate_address"))]
    pub created_by: String,

    /// Priority 0-3 (Low/Medium/High/Urgent); defaults to Medium.
    #[validate(range(min = 0, max = 3, message = "Priority must be between 0 and 3"))]
    pub priority: Option<i64>,

    /// Payment amount in smallest units, as a decimal string.
    #[validate(custom(function = "validate_amount"))]
    pub payment_amount: Option<String>,

    /// True for a money-request task, false for pay-on-completion.
    pub request_money: Option<bool>,

    /// Proof of the payment transaction; sticky.
    #[validate(custom(function = "validate_tx_hash"))]
    pub payment_tx_hash: Option<String>,

    /// Money-request rejection flag; monotone (false to true only).
    pub rejected: Option<bool>,

    #[serde(default)]
    pub completed: bool,

    #[validate(custom(function = "validate_address"))]
    pub completed_by: Option<String>,

    pub completed_at: Option<DateTime<Utc>>,

    /// Ledger transaction that recorded the task; sticky.
    #[validate(custom(function = "validate_tx_hash"))]
    pub tx_hash: Option<String>,
}

impl UpsertTaskRequest {
    /// Trims string fields, collapses empty optionals to `None`, and
    /// enforces that an open task carries no completion facts.
    ///
    /// Must run before validation so that a whitespace-only assignee reads
    /// as unassigned rather than as a malformed address.
    pub fn normalized(self) -> Self {
        let completed = self.completed;
        Self {
            id: self.id,
            circle_id: self.circle_id,
            title: self.title.trim().to_string(),
            description: non_empty(self.description),
            assigned_to: non_empty(self.assigned_to),
            created_by: self.created_by.trim().to_string(),
            priority: self.priority,
            payment_amount: non_empty(self.payment_amount),
            request_money: self.request_money,
            payment_tx_hash: non_empty(self.payment_tx_hash),
            rejected: self.rejected,
            completed,
            completed_by: if completed {
                non_empty(self.completed_by)
            } else {
                None
            },
            completed_at: if completed { self.completed_at } else { None },
            tx_hash: non_empty(self.tx_hash),
        }
    }

    /// Priority with its default applied.
    pub fn priority_or_default(&self) -> i64 {
        self.priority.unwrap_or(TaskPriority::Medium.value())
    }
}

/// A cached task as served to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TaskResponse {
    pub id: i64,
    pub circle_id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `null` when unassigned; never an empty string.
    pub assigned_to: Option<String>,
    pub created_by: String,
    pub priority: i64,
    pub priority_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_amount: Option<String>,
    pub request_money: bool,
    pub payment_state: PaymentState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_tx_hash: Option<String>,
    pub rejected: bool,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Response for a task upsert.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UpsertTaskResponse {
    pub ok: bool,
    pub id: i64,
}
