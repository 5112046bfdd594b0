// Path: crates/types/src/app/amount.rs

use super::Balance;
use crate::error::LeaseError;

/// Number of fractional digits of the human-facing token.
pub const TOKEN_DECIMALS: usize = 12;
/// Base units per whole token (10^12).
pub const BASE_UNITS_PER_TOKEN: Balance = 1_000_000_000_000;

/// Parses a human-facing decimal amount (e.g. `"1.5"`) into base units.
///
/// The conversion is exact: no floating point is involved, and more than
/// [`TOKEN_DECIMALS`] fractional digits is an error rather than a rounding.
pub fn parse_amount(input: &str) -> Result<Balance, LeaseError> {
    let s = input.trim();
    let invalid = |why: &str| LeaseError::Validation(format!("invalid amount '{}': {}", input, why));

    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid("no digits"));
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("only decimal digits and one '.' are allowed"));
    }
    if frac.len() > TOKEN_DECIMALS {
        return Err(invalid("more than 12 fractional digits"));
    }

    let whole_units: Balance = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid("out of range"))?
    };
    let frac_units: Balance = if frac.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", frac, width = TOKEN_DECIMALS);
        padded.parse().map_err(|_| invalid("out of range"))?
    };

    whole_units
        .checked_mul(BASE_UNITS_PER_TOKEN)
        .and_then(|w| w.checked_add(frac_units))
        .ok_or_else(|| invalid("out of range"))
}

/// Formats base units as a human-facing decimal amount, without trailing zeros.
pub fn format_amount(units: Balance) -> String {
    let whole = units / BASE_UNITS_PER_TOKEN;
    let frac = units % BASE_UNITS_PER_TOKEN;
    if frac == 0 {
        return whole.to_string();
    }
    let digits = format!("{:0>width$}", frac, width = TOKEN_DECIMALS);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}
