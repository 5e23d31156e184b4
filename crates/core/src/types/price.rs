//! Currency arithmetic helpers.
//!
//! All amounts are `rust_decimal::Decimal` in dollars (not cents). Values are
//! carried at full precision through multiplication and summation, then rounded
//! once with [`round_currency`] at the point they are displayed or aggregated.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places kept for displayed currency amounts.
pub const CURRENCY_SCALE: u32 = 2;

/// Round an amount to cents, half away from zero.
///
/// The result always carries exactly [`CURRENCY_SCALE`] decimal places, so
/// `3` becomes `3.00` and serializes as `"3.00"`.
///
/// ```
/// use rust_decimal::Decimal;
/// use sous_chef_core::round_currency;
///
/// let amount = Decimal::new(2_345, 3); // 2.345
/// assert_eq!(round_currency(amount).to_string(), "2.35");
/// ```
#[must_use]
pub fn round_currency(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    // round_dp never increases scale; pad up so "3" displays as "3.00"
    rounded.rescale(CURRENCY_SCALE);
    rounded
}
