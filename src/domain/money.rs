//! Monetary and duration types for hourly rental pricing.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Price represented as a Decimal for precision (USD).
pub type Price = Decimal;

/// Rental duration in hours.
pub type Hours = Decimal;

/// Continuous-usage hours in a (non-leap) year.
pub const HOURS_PER_YEAR: Hours = dec!(8760);

/// Continuous-usage hours in an average month (8760 / 12).
pub const HOURS_PER_MONTH: Hours = dec!(730);

/// Hours in a day; also the upper bound for `hours_per_day`.
pub const HOURS_PER_DAY: Hours = dec!(24);

/// Largest accepted hourly price in USD.
///
/// Keeps price times usage hours inside `Decimal` range for every
/// scenario `UsageScenario` accepts.
pub const MAX_PRICE_PER_HOUR: Price = dec!(1_000_000);

/// Hours in an average month (365 / 12 days) at the given daily usage.
pub(crate) fn month_hours(hours_per_day: Hours) -> Hours {
    hours_per_day * dec!(365) / dec!(12)
}
