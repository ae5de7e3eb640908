//! Payment lifecycle for tasks.
//!
//! The cache stores the raw mirrored facts (`request_money`, `rejected`,
//! `payment_tx_hash`, `completed`); this module folds them into one explicit
//! state so clients do not have to re-derive the lifecycle from three
//! loosely-correlated columns. Lifecycle: open, then completed or rejected,
//! then paid once a proof hash lands. Rejection is terminal.

use serde::Serialize;

/// Derived payment state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentState {
    /// No payment attached to this task.
    None,
    /// Payment promised or requested; not yet settled.
    Open,
    /// Money request rejected; no further payment expected.
    Rejected,
    /// Task completed or request approved, proof hash not yet recorded.
    Approved,
    /// Payment proof recorded on the ledger.
    Paid,
}

impl PaymentState {
    /// Folds the raw task columns into a payment state.
    pub fn derive(
        payment_amount: Option<&str>,
        request_money: bool,
        completed: bool,
        rejected: bool,
        payment_tx_hash: Option<&str>,
    ) -> Self {
        if payment_amount.is_none() && !request_money {
            return PaymentState::None;
        }
        if rejected {
            return PaymentState::Rejected;
        }
        if payment_tx_hash.is_some() {
            return PaymentState::Paid;
        }
        if completed {
            return PaymentState::Approved;
        }
        PaymentState::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_payment() {
        assert_eq!(
            PaymentState::derive(None, false, true, false, None),
            PaymentState::None
        );
    }

    #[test]
    fn test_open_pay_on_completion() {
        assert_eq!(
            PaymentState::derive(Some("1000"), false, false, false, None),
            PaymentState::Open
        );
    }

    #[test]
    fn test_open_money_request_without_amount() {
        assert_eq!(
            PaymentState::derive(None, true, false, false, None),
            PaymentState::Open
        );
    }

    #[test]
    fn test_completed_awaits_proof() {
        assert_eq!(
            PaymentState::derive(Some("1000"), false, true, false, None),
            PaymentState::Approved
        );
    }

    #[test]
    fn test_paid_with_proof() {
        assert_eq!(
            PaymentState::derive(Some("1000"), false, true, false, Some("0xab")),
            PaymentState::Paid
        );
    }

    #[test]
    fn test_rejected_is_terminal() {
        // A rejected request stays rejected even if other columns drift.
        assert_eq!(
            PaymentState::derive(Some("1000"), true, true, true, Some("0xab")),
            PaymentState::Rejected
        );
    }

    #[test]
    fn test_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&PaymentState::Open).unwrap(),
            "\"open\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentState::Rejected).unwrap(),
            "\"rejected\""
        );
    }
}
