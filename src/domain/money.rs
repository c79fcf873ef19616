//! Monetary and odds types.
//!
//! Odds are implied-probability prices in `(0, 1]`: a lower quote means a
//! larger payout multiplier. All monetary amounts are fixed-point
//! [`Decimal`]s floored to [`PAYOUT_SCALE`] places; every division rounds
//! down, so residual dust always stays with the pool rather than the
//! buyer.

use rust_decimal::Decimal;

/// Odds represented as a Decimal price in `(0, 1]`.
pub type Odds = Decimal;

/// Monetary amount in the settlement token, represented as a Decimal.
pub type Amount = Decimal;

/// Decimal places carried by settlement-token amounts (stablecoin
/// convention).
pub const PAYOUT_SCALE: u32 = 6;

/// Truncate an amount down to [`PAYOUT_SCALE`] decimal places.
#[must_use]
pub fn floor_amount(value: Decimal) -> Amount {
    value.trunc_with_scale(PAYOUT_SCALE)
}
