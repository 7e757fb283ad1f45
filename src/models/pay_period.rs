//! Pay period models.
//!
//! This module contains the [`PayPeriod`] date interval and the compact
//! [`PeriodKey`] used to group work-logs by period. Both are derived values;
//! use [`crate::calculation::period_of`] to obtain the period for a date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A semi-monthly pay period: the 1st to the 15th, or the 16th to the last
/// day of a month.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::period_of;
/// use chrono::NaiveDate;
///
/// let period = period_of(NaiveDate::from_ymd_opt(2024, 2, 20).unwrap());
///
/// assert_eq!(period.start_date, NaiveDate::from_ymd_opt(2024, 2, 16).unwrap());
/// assert_eq!(period.end_date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The start date of the pay period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the pay period (inclusive).
    pub end_date: NaiveDate,
}

impl PayPeriod {
    /// Checks if a given date falls within this pay period.
    ///
    /// The check is inclusive of both start and end dates.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// Identifies a pay period by its start day, month and year.
///
/// Ordering follows calendar order: year, then month, then half of the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeriodKey {
    pub(crate) year: i32,
    pub(crate) month: u32,
    pub(crate) start_day: u32,
}

impl PeriodKey {
    /// Start day of the first half of a month.
    pub const FIRST_HALF_START: u32 = 1;
    /// Start day of the second half of a month.
    pub const SECOND_HALF_START: u32 = 16;

    /// Creates a key, returning `None` unless `start_day` is 1 or 16 and
    /// `month` is in `1..=12`.
    pub fn new(start_day: u32, month: u32, year: i32) -> Option<Self> {
        let valid_start = start_day == Self::FIRST_HALF_START || start_day == Self::SECOND_HALF_START;
        if !valid_start || !(1..=12).contains(&month) {
            return None;
        }
        Some(Self {
            year,
            month,
            start_day,
        })
    }

    /// The day of the month the period starts on (1 or 16).
    pub fn start_day(&self) -> u32 {
        self.start_day
    }

    /// The month of the period (1-12).
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The year of the period.
    pub fn year(&self) -> i32 {
        self.year
    }
}
