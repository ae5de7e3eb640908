//! Shared utilities and common types for the CareCircle cache backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Ledger address and transaction hash validation
//! - Smallest-unit monetary amount handling
//! - Common normalization helpers for optional fields

pub mod amount;
pub mod validation;
