//! Display and parsing helpers shared by every front-end surface.
//!
//! - [`address`]: address validation and shortening
//! - [`amount`]: conversion between human decimal strings and base units

pub mod address;
pub mod amount;

pub use address::{parse_address, shorten, shorten_address, AddressError};
pub use amount::{
    format_decimal, to_base_units, to_exact_units, to_human_units, ParseError, Precision,
};
