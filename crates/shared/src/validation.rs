//! Common validation utilities for ledger-derived values.
//!
//! Every identifier in the cache is assigned by the ledger; the cache never
//! mints its own. These validators gate what candidate payloads are allowed
//! to carry before they reach the merge layer.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

/// Maximum accepted length for a public-key address (hex, optional 0x prefix).
const MAX_ADDRESS_LEN: usize = 130;

/// Minimum accepted length for a public-key address, prefix excluded.
const MIN_ADDRESS_LEN: usize = 8;

lazy_static! {
    static ref ADDRESS_RE: Regex =
        Regex::new(r"^(0x)?[0-9a-fA-F]{8,128}$").expect("address regex must compile");
}

/// Validates a ledger public-key address (hex string, optional `0x` prefix).
pub fn validate_address(address: &str) -> Result<(), ValidationError> {
    if address.len() <= MAX_ADDRESS_LEN && ADDRESS_RE.is_match(address) {
        Ok(())
    } else {
        let mut err = ValidationError::new("address_format");
        err.message = Some(
            format!(
                "Address must be {}-128 hex characters (optional 0x prefix)",
                MIN_ADDRESS_LEN
            )
            .into(),
        );
        Err(err)
    }
}

/// Validates a ledger transaction hash (hex string, optional `0x` prefix).
///
/// Hashes are provenance-only; the cache stores them verbatim but refuses
/// values that cannot be hex-decoded.
pub fn validate_tx_hash(tx_hash: &str) -> Result<(), ValidationError> {
    let raw = tx_hash.strip_prefix("0x").unwrap_or(tx_hash);
    let ok = !raw.is_empty() && raw.len() <= 128 && raw.len() % 2 == 0 && hex::decode(raw).is_ok();
    if ok {
        Ok(())
    } else {
        let mut err = ValidationError::new("tx_hash_format");
        err.message = Some("Transaction hash must be a hex string".into());
        Err(err)
    }
}

/// Trims an optional string, collapsing empty and whitespace-only values to `None`.
///
/// Sticky merge columns rely on this: an empty incoming value must read as
/// "absent", never as a fresh write.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
