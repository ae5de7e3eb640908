//! Smallest-unit monetary amounts.
//!
//! Payment amounts are carried as decimal strings in the ledger's smallest
//! denomination. They are never parsed into floats; arithmetic happens in
//! integer space and the stored representation stays the original string.

use thiserror::Error;
use validator::ValidationError;

/// Maximum digits accepted in an amount string (fits u128).
const MAX_AMOUNT_DIGITS: usize = 39;

/// Errors produced when parsing a smallest-unit amount string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("Amount is empty")]
    Empty,

    #[error("Amount contains non-digit characters")]
    NonDigit,

    #[error("Amount exceeds {MAX_AMOUNT_DIGITS} digits")]
    TooLong,
}

/// Parses a smallest-unit decimal string into an integer amount.
pub fn parse_amount(raw: &str) -> Result<u128, AmountError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }
    if trimmed.len() > MAX_AMOUNT_DIGITS {
        return Err(AmountError::TooLong);
    }
    if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AmountError::NonDigit);
    }
    trimmed.parse::<u128>().map_err(|_| AmountError::TooLong)
}

/// Normalizes an amount string for storage (strips surrounding whitespace
/// and leading zeros, keeping at least one digit).
pub fn normalize_amount(raw: &str) -> Result<String, AmountError> {
    parse_amount(raw).map(|v| v.to_string())
}

/// Validator-compatible wrapper for request DTOs.
pub fn validate_amount(raw: &str) -> Result<(), ValidationError> {
    parse_amount(raw).map(|_| ()).map_err(|e| {
        let mut err = ValidationError::new("amount_format");
        err.message = Some(e.to_string().into());
        err
    })
}
