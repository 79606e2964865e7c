//! Rounding shared by the withholding calculations.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a withholding amount to three decimal places, midpoint away from zero.
///
/// Every stored result field goes through this before later steps consume it.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use isr_core::calculations::common::round_amount;
///
/// assert_eq!(round_amount(dec!(1853.999875)), dec!(1854.000));
/// assert_eq!(round_amount(dec!(0.0005)), dec!(0.001));
/// assert_eq!(round_amount(dec!(-0.0005)), dec!(-0.001));
/// ```
pub fn round_amount(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to whole cents for display, midpoint away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use isr_core::calculations::common::round_currency;
///
/// assert_eq!(round_currency(dec!(3486.650)), dec!(3486.65));
/// assert_eq!(round_currency(dec!(0.005)), dec!(0.01));
/// ```
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
