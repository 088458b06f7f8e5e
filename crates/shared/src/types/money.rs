//! Money rounding helpers.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are `rust_decimal::Decimal`; these helpers pin down the
//! rounding rule used when amounts are compared or reported.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places money amounts are compared and reported at.
pub const MONEY_SCALE: u32 = 2;

/// Most decimal places a stored amount, price or quantity may carry.
pub const STORED_SCALE: u32 = 4;

/// Returns true if `value` has more significant decimal places than
/// [`STORED_SCALE`]. Trailing zeros do not count.
#[must_use]
pub fn exceeds_stored_scale(value: Decimal) -> bool {
    value.normalize().scale() > STORED_SCALE
}

/// Rounds a money amount to [`MONEY_SCALE`] places, midpoint away from zero.
///
/// `0.005` rounds to `0.01` and `-0.005` rounds to `-0.01`.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Sums amounts and rounds the total with [`round_money`].
#[must_use]
pub fn rounded_sum<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    round_money(amounts.into_iter().sum())
}
