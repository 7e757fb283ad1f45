//! Pay period assignment.
//!
//! This module maps calendar dates onto their enclosing semi-monthly pay
//! period and converts periods to and from the [`PeriodKey`] grouping key.

use chrono::{Datelike, NaiveDate};

use crate::models::{PayPeriod, PeriodKey};

/// Last day of the month covered by the first half-month period.
pub const FIRST_HALF_END_DAY: u32 = 15;

/// Returns the pay period containing `date`.
///
/// Days 1-15 belong to the period ending on the 15th; days 16 onwards belong
/// to the period ending on the last day of the month, leap years included.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::period_of;
/// use chrono::NaiveDate;
///
/// let period = period_of(NaiveDate::from_ymd_opt(2023, 1, 2).unwrap());
/// assert_eq!(period.start_date, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
/// assert_eq!(period.end_date, NaiveDate::from_ymd_opt(2023, 1, 15).unwrap());
///
/// let period = period_of(NaiveDate::from_ymd_opt(2023, 2, 16).unwrap());
/// assert_eq!(period.end_date, NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
/// ```
pub fn period_of(date: NaiveDate) -> PayPeriod {
    if date.day() <= FIRST_HALF_END_DAY {
        PayPeriod {
            start_date: with_day_or_same(date, PeriodKey::FIRST_HALF_START),
            end_date: with_day_or_same(date, FIRST_HALF_END_DAY),
        }
    } else {
        PayPeriod {
            start_date: with_day_or_same(date, PeriodKey::SECOND_HALF_START),
            end_date: last_day_of_month(date),
        }
    }
}

/// Returns the grouping key of the pay period containing `date`.
pub fn period_key(date: NaiveDate) -> PeriodKey {
    let start_day = if date.day() <= FIRST_HALF_END_DAY {
        PeriodKey::FIRST_HALF_START
    } else {
        PeriodKey::SECOND_HALF_START
    };

    PeriodKey {
        year: date.year(),
        month: date.month(),
        start_day,
    }
}

/// Rebuilds the pay period identified by `key`.
///
/// Returns `None` only when the key's year lies outside the range of dates
/// representable by `chrono`.
pub fn period_from_key(key: PeriodKey) -> Option<PayPeriod> {
    NaiveDate::from_ymd_opt(key.year(), key.month(), key.start_day()).map(period_of)
}

/// Returns the last calendar day of the month containing `date`.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::last_day_of_month;
/// use chrono::NaiveDate;
///
/// let leap = last_day_of_month(NaiveDate::from_ymd_opt(2024, 2, 3).unwrap());
/// assert_eq!(leap, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
/// ```
pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    (28..=31)
        .rev()
        .find_map(|day| date.with_day(day))
        .unwrap_or(date)
}

// Every month has days 1, 15 and 16, so the fallback is never taken for
// the days this module asks for.
fn with_day_or_same(date: NaiveDate, day: u32) -> NaiveDate {
    date.with_day(day).unwrap_or(date)
}
