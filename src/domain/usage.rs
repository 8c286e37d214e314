//! Usage scenarios for projecting absolute costs from hourly prices.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use super::error::DomainError;
use super::money::{month_hours, Hours, HOURS_PER_DAY};

/// How much GPU time the caller plans to rent.
///
/// Defaults to continuous single-instance use for 30 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UsageScenario {
    unit_count: u32,
    duration_days: u32,
    hours_per_day: Hours,
}

impl UsageScenario {
    /// Create a validated scenario.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidUsage`] unless `unit_count >= 1`,
    /// `duration_days >= 1` and `0 < hours_per_day <= 24`.
    pub fn try_new(
        unit_count: u32,
        duration_days: u32,
        hours_per_day: Hours,
    ) -> Result<Self, DomainError> {
        if unit_count == 0 {
            return Err(DomainError::InvalidUsage {
                field: "unit_count",
                reason: "must be at least 1".to_string(),
            });
        }
        if duration_days == 0 {
            return Err(DomainError::InvalidUsage {
                field: "duration_days",
                reason: "must be at least 1".to_string(),
            });
        }
        if hours_per_day <= Decimal::ZERO || hours_per_day > HOURS_PER_DAY {
            return Err(DomainError::InvalidUsage {
                field: "hours_per_day",
                reason: format!("must be within (0, 24], got {hours_per_day}"),
            });
        }
        Ok(Self {
            unit_count,
            duration_days,
            hours_per_day,
        })
    }

    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.unit_count
    }

    #[must_use]
    pub fn duration_days(&self) -> u32 {
        self.duration_days
    }

    #[must_use]
    pub fn hours_per_day(&self) -> Hours {
        self.hours_per_day
    }

    /// `unit_count * duration_days * hours_per_day`.
    #[must_use]
    pub fn total_hours(&self) -> Hours {
        Decimal::from(self.unit_count) * Decimal::from(self.duration_days) * self.hours_per_day
    }

    /// Instance-hours in an average month at this scenario's daily rate.
    #[must_use]
    pub fn monthly_hours(&self) -> Hours {
        Decimal::from(self.unit_count) * month_hours(self.hours_per_day)
    }
}

impl Default for UsageScenario {
    fn default() -> Self {
        Self {
            unit_count: 1,
            duration_days: 30,
            hours_per_day: dec!(24),
        }
    }
}
