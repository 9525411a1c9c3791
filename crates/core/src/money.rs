//! Discount application and currency rounding.
//!
//! All money flows through [`rust_decimal::Decimal`]; totals are rounded to
//! two decimal places with half-up (midpoint away from zero) rounding, which
//! must stay consistent everywhere a total is computed.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round an amount to two decimal places, half-up.
#[must_use]
pub fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Apply a percentage discount to a total and round to two decimal places.
///
/// `apply_discount(total, 10)` returns 90% of `total`. A zero percent
/// discount still rounds, so callers get a uniform 2-decimal total whether
/// or not a coupon was applied.
#[must_use]
pub fn apply_discount(total: Decimal, percent: Decimal) -> Decimal {
    let keep = (Decimal::ONE_HUNDRED - percent) / Decimal::ONE_HUNDRED;
    round2(total * keep)
}
