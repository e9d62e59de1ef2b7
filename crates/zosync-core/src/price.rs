//! Integer-yen price arithmetic and lenient price coercion.
//!
//! All rounding goes through [`round_half_up`] so every stage of a price
//! calculation uses the same convention.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to the nearest whole yen, halves away from zero.
#[must_use]
pub fn round_half_up(value: Decimal) -> i64 {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

/// Returns `amount × (100 − percent_off) / 100`, rounded half up.
///
/// `percent_off` is clamped to `0..=100`.
#[must_use]
pub fn apply_percent_off(amount: i64, percent_off: i64) -> i64 {
    let keep = 100 - percent_off.clamp(0, 100);
    round_half_up(Decimal::from(amount) * Decimal::from(keep) / Decimal::ONE_HUNDRED)
}

/// Parses a storefront price field such as `"1990.00"` or `"1990"` into whole
/// yen, truncating any fraction.
///
/// Returns `None` for empty or non-numeric text.
#[must_use]
pub fn coerce_amount(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
        .and_then(|d| d.trunc().to_i64())
}
