//! Conversion between human-readable decimal amounts and integer base units.
//!
//! Base units are the token's smallest indivisible amount: a human amount `h`
//! of a token with `d` decimals is `h * 10^d` base units.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when parsing a human amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Amount is empty")]
    Empty,

    #[error("Invalid amount: {0}")]
    Invalid(String),

    #[error("Amount must not be negative: {0}")]
    Negative(String),

    /// More fractional digits than the token can represent. Rejected rather
    /// than rounded so the submitted amount is exactly what was typed.
    #[error("Amount {value} has more than {decimals} decimal places")]
    TooPrecise { value: String, decimals: u8 },

    #[error("Amount is too large: {0}")]
    Overflow(String),
}

/// Fixed number of fractional digits used when displaying an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Precision {
    /// Balances, allowances and transfer amounts (4 places).
    Balance,
    /// Swap output and minimum received (6 places).
    Quote,
    /// Inverse exchange rates (8 places).
    InverseRate,
}

impl Precision {
    pub const fn digits(self) -> u8 {
        match self {
            Self::Balance => 4,
            Self::Quote => 6,
            Self::InverseRate => 8,
        }
    }
}

fn pow10(exp: u8) -> Option<U256> {
    U256::from(10u8).checked_pow(U256::from(exp))
}

/// Parse a non-negative decimal string into base units.
pub fn to_base_units(human: &str, decimals: u8) -> Result<U256, ParseError> {
    let human = human.trim();
    if human.is_empty() {
        return Err(ParseError::Empty);
    }
    if human.starts_with('-') {
        return Err(ParseError::Negative(human.to_string()));
    }

    let (whole, fraction) = human.split_once('.').unwrap_or((human, ""));
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Err(ParseError::Invalid(human.to_string()));
    }

    if fraction.len() > decimals as usize {
        return Err(ParseError::TooPrecise {
            value: human.to_string(),
            decimals,
        });
    }

    let overflow = || ParseError::Overflow(human.to_string());

    let whole_value = if whole.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(whole, 10).map_err(|_| overflow())?
    };

    let fraction_value = if decimals == 0 {
        U256::ZERO
    } else {
        let padded = format!("{fraction:0<width$}", width = decimals as usize);
        U256::from_str_radix(&padded, 10).map_err(|_| overflow())?
    };

    if whole_value.is_zero() {
        return Ok(fraction_value);
    }

    pow10(decimals)
        .and_then(|scale| whole_value.checked_mul(scale))
        .and_then(|scaled| scaled.checked_add(fraction_value))
        .ok_or_else(overflow)
}

/// Format base units with exactly `precision` fractional digits.
///
/// Rounds half up when the token has more decimals than the display keeps,
/// and pads with zeros when it has fewer.
pub fn to_human_units(base: U256, decimals: u8, precision: Precision) -> String {
    let digits = precision.digits();

    if decimals <= digits {
        // 10^decimals never overflows here: decimals <= 8.
        let scale = pow10(decimals).unwrap_or(U256::from(1u8));
        let whole = base / scale;
        let fraction = if decimals == 0 {
            String::new()
        } else {
            format!("{:0>width$}", (base % scale).to_string(), width = decimals as usize)
        };
        return format!("{whole}.{fraction:0<width$}", width = digits as usize);
    }

    let scaled = pow10(decimals - digits).map_or(U256::ZERO, |divisor| {
        let quotient = base / divisor;
        if base % divisor >= divisor / U256::from(2u8) {
            quotient + U256::from(1u8)
        } else {
            quotient
        }
    });

    let unit = pow10(digits).unwrap_or(U256::from(1u8));
    format!(
        "{}.{:0>width$}",
        scaled / unit,
        (scaled % unit).to_string(),
        width = digits as usize
    )
}

/// Lossless formatting: every significant fractional digit is kept, trailing
/// zeros are trimmed, and at least one fractional digit is shown (`"1.0"`).
pub fn to_exact_units(base: U256, decimals: u8) -> String {
    let (whole, fraction) = match pow10(decimals) {
        Some(scale) => (base / scale, base % scale),
        None => (U256::ZERO, base),
    };

    if decimals == 0 {
        return format!("{whole}.0");
    }

    let padded = format!("{:0>width$}", fraction.to_string(), width = decimals as usize);
    let trimmed = padded.trim_end_matches('0');
    if trimmed.is_empty() {
        format!("{whole}.0")
    } else {
        format!("{whole}.{trimmed}")
    }
}

/// Format a floating-point amount (swap pane values) with a fixed precision.
pub fn format_decimal(value: f64, precision: Precision) -> String {
    // Avoid rendering "-0.000000".
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{:.*}", precision.digits() as usize, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_base_units_eighteen_decimals() {
        assert_eq!(
            to_base_units("1.5", 18).unwrap(),
            U256::from(1_500_000_000_000_000_000u128)
        );
    }

    #[test]
    fn test_to_base_units_rejects_excess_precision() {
        assert_eq!(
            to_base_units("1.23456789", 2),
            Err(ParseError::TooPrecise {
                value: "1.23456789".to_string(),
                decimals: 2,
            })
        );
    }

    #[test]
    fn test_to_base_units_variants() {
        assert_eq!(to_base_units("42", 0).unwrap(), U256::from(42u8));
        assert_eq!(to_base_units(".5", 1).unwrap(), U256::from(5u8));
        assert_eq!(to_base_units("1.", 2).unwrap(), U256::from(100u8));
        assert_eq!(to_base_units(" 0.000001 ", 6).unwrap(), U256::from(1u8));
        assert_eq!(to_base_units("0", 18).unwrap(), U256::ZERO);
    }

    #[test]
    fn test_to_base_units_rejects_garbage() {
        assert_eq!(to_base_units("", 18), Err(ParseError::Empty));
        assert!(matches!(to_base_units("abc", 18), Err(ParseError::Invalid(_))));
        assert!(matches!(to_base_units(".", 18), Err(ParseError::Invalid(_))));
        assert!(matches!(to_base_units("1.2.3", 18), Err(ParseError::Invalid(_))));
        assert!(matches!(to_base_units("1e18", 18), Err(ParseError::Invalid(_))));
        assert!(matches!(to_base_units("-1", 18), Err(ParseError::Negative(_))));
    }

    #[test]
    fn test_to_base_units_overflow() {
        let huge = "1".repeat(80);
        assert!(matches!(to_base_units(&huge, 18), Err(ParseError::Overflow(_))));
    }

    #[test]
    fn test_to_human_units_rounds_half_up() {
        // 0.123456 with six decimals
        let amount = U256::from(123_456u64);
        assert_eq!(to_human_units(amount, 6, Precision::Balance), "0.1235");
        assert_eq!(to_human_units(amount, 6, Precision::Quote), "0.123456");
        assert_eq!(to_human_units(amount, 6, Precision::InverseRate), "0.12345600");
    }

    #[test]
    fn test_to_human_units_pads() {
        assert_eq!(
            to_human_units(U256::from(12_345u64), 2, Precision::Balance),
            "123.4500"
        );
        assert_eq!(to_human_units(U256::from(5u8), 0, Precision::Balance), "5.0000");
        assert_eq!(
            to_human_units(U256::from(1_500_000_000_000_000_000u128), 18, Precision::Balance),
            "1.5000"
        );
    }

    #[test]
    fn test_to_human_units_carries() {
        // 0.99996 rounds up into the whole part.
        assert_eq!(
            to_human_units(U256::from(99_996u64), 5, Precision::Balance),
            "1.0000"
        );
    }

    #[test]
    fn test_to_human_units_extreme_decimals() {
        assert_eq!(to_human_units(U256::MAX, 255, Precision::Balance), "0.0000");
    }

    #[test]
    fn test_to_exact_units() {
        assert_eq!(
            to_exact_units(U256::from(1_500_000_000_000_000_000u128), 18),
            "1.5"
        );
        assert_eq!(to_exact_units(U256::from(1_000_000u64), 6), "1.0");
        assert_eq!(to_exact_units(U256::from(7u8), 0), "7.0");
        assert_eq!(to_exact_units(U256::from(1u8), 6), "0.000001");
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(5000.0, Precision::Quote), "5000.000000");
        assert_eq!(format_decimal(0.001, Precision::InverseRate), "0.00100000");
        assert_eq!(format_decimal(-0.0, Precision::Quote), "0.000000");
    }
}
