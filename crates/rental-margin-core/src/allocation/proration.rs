//! Revenue proration: converting a nominal monthly contract value
//! into the revenue recognised for its active days in the window.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::Money;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Fixed average month length, avoiding calendar-dependent drift.
pub const AVERAGE_MONTH_DAYS: Decimal = dec!(30.44);

/// Floor on the month fraction. Guarantees any contract with at least
/// one effective day contributes a non-zero denominator to the cost
/// allocation ratios downstream.
pub const MIN_MONTHS: Decimal = dec!(0.1);

/// Prorate a monthly value over the effective days in the window:
/// `revenue = monthly_value * max(0.1, days / 30.44)`.
///
/// No rounding is applied here; rounding is a presentation concern of
/// the caller.
pub fn prorate(monthly_value: Money, effective_days: i64) -> Money {
    let months = (Decimal::from(effective_days) / AVERAGE_MONTH_DAYS).max(MIN_MONTHS);
    monthly_value * months
}
