//! External collaborators and reconciliation services.

pub mod ledger;
pub mod reconcile;

pub use ledger::{HttpLedgerGateway, LedgerCircleRecord, LedgerError, LedgerGateway};
pub use reconcile::CircleReconciler;
