//! Rupee rounding helpers.
//!
//! Payroll amounts round half away from zero, which is how salary sheets
//! round. `Decimal::round` uses banker's rounding and must not be used for
//! money here.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to the nearest whole rupee, halves away from zero.
///
/// # Examples
///
/// ```
/// use ctc_engine::calculation::round_rupees;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_rupees(Decimal::new(78845, 1)), Decimal::from(7885));
/// assert_eq!(round_rupees(Decimal::new(78844, 1)), Decimal::from(7884));
/// ```
pub fn round_rupees(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to the nearest paisa (2 decimal places), halves away from zero.
pub fn round_paise(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
