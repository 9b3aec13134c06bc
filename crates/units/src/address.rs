//! Address validation and display shortening.
//!
//! Addresses are held as [`Address`] values, which compare byte-wise, so two
//! inputs that differ only in hex letter case are the same account.

use alloy_primitives::Address;
use thiserror::Error;

/// Reasons a user-supplied address is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("Address is empty")]
    Empty,

    #[error("Invalid address format: {0}")]
    Malformed(String),

    /// Mixed-case input whose casing is not a valid EIP-55 checksum.
    #[error("Invalid address checksum: {0}")]
    BadChecksum(String),
}

/// Parse and validate a user-supplied address.
///
/// Accepts 40 hex digits with or without the `0x` prefix. All-lowercase and
/// all-uppercase inputs are accepted as-is; mixed-case inputs must carry a
/// valid checksum.
pub fn parse_address(input: &str) -> Result<Address, AddressError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AddressError::Empty);
    }

    let hex = input.strip_prefix("0x").unwrap_or(input);
    if hex.len() != 40 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(AddressError::Malformed(input.to_string()));
    }

    let address: Address = hex
        .parse()
        .map_err(|_| AddressError::Malformed(input.to_string()))?;

    let has_lower = hex.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = hex.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        let checksummed = address.to_checksum(None);
        if checksummed[2..] != *hex {
            return Err(AddressError::BadChecksum(input.to_string()));
        }
    }

    Ok(address)
}

/// Shorten a hex identifier for display: `0x1234...abcd`.
///
/// Works for addresses and transaction hashes alike. Values too short to
/// shorten are returned unchanged; an empty value stays empty.
pub fn shorten(value: &str) -> String {
    if value.len() <= 10 || !value.is_ascii() {
        return value.to_string();
    }
    format!("{}...{}", &value[..6], &value[value.len() - 4..])
}

/// Shorten the checksummed form of an address.
pub fn shorten_address(address: &Address) -> String {
    shorten(&address.to_checksum(None))
}
