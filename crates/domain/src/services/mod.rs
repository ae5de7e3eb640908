//! Domain services.

pub mod payment;

pub use payment::PaymentState;
