//! Coupon code generation and issuance constants.
//!
//! Abandonment-issued coupons are short, human-enterable codes. The alphabet
//! excludes visually ambiguous characters (0/O, 1/I/l) so a code read off a
//! popup survives being typed into the checkout form. Uniqueness is
//! probabilistic; the database unique index on `coupon.code` is the backstop.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rust_decimal::Decimal;

/// Characters allowed in generated coupon codes.
///
/// Uppercase alphanumerics minus `O`, `I`, `0`, and `1`.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Default length of the random portion of a coupon code.
pub const DEFAULT_CODE_LENGTH: usize = 5;

/// Default prefix for abandonment-issued codes (`SALE-XXXXX`).
pub const DEFAULT_CODE_PREFIX: &str = "SALE";

/// Fixed discount applied by abandonment-issued coupons, in percent.
pub const DISCOUNT_PERCENT: u32 = 10;

/// How long an issued coupon stays valid.
pub const VALIDITY_HOURS: i64 = 24;

/// The fixed abandonment discount as a [`Decimal`].
#[must_use]
pub fn discount_percent() -> Decimal {
    Decimal::from(DISCOUNT_PERCENT)
}

/// Expiry timestamp for a coupon issued at `issued_at`.
#[must_use]
pub fn expiry_from(issued_at: DateTime<Utc>) -> DateTime<Utc> {
    issued_at + Duration::hours(VALIDITY_HOURS)
}

/// Generate a random coupon code.
///
/// The random portion is `length` characters drawn from [`CODE_ALPHABET`].
/// A non-empty `prefix` is prepended with a `-` separator, e.g.
/// `generate_code(Some("SALE"), 5)` yields codes like `SALE-K7Q2M`.
#[must_use]
pub fn generate_code(prefix: Option<&str>, length: usize) -> String {
    let mut rng = rand::rng();
    let body: String = (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CODE_ALPHABET.len());
            char::from(*CODE_ALPHABET.get(idx).unwrap_or(&b'X'))
        })
        .collect();

    match prefix {
        Some(p) if !p.is_empty() => format!("{p}-{body}"),
        _ => body,
    }
}
