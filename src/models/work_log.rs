//! Work-log and job group rate models.
//!
//! This module defines the [`WorkLogRecord`] produced from one validated CSV
//! row and the [`JobGroupRate`] reference data used to price it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::JobGroup;

/// Identifies one uploaded file; taken from the third dash-separated segment
/// of its name.
pub type SubmissionId = i64;

/// One validated observation of hours worked by an employee on a date.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{JobGroup, WorkLogRecord};
/// use chrono::NaiveDate;
///
/// let log = WorkLogRecord {
///     employee_id: 1,
///     job_group: JobGroup::A,
///     date: NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(),
///     hours_logged: 8.0,
/// };
/// assert_eq!(log.amount_at(20.0), 160.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkLogRecord {
    /// The employee who logged the hours.
    pub employee_id: u64,
    /// The job group the hours were worked under.
    pub job_group: JobGroup,
    /// The calendar date the hours were worked on.
    pub date: NaiveDate,
    /// The number of hours worked (never negative).
    pub hours_logged: f64,
}

impl WorkLogRecord {
    /// Returns the amount owed for this log at the given hourly rate.
    pub fn amount_at(&self, hourly_rate: f64) -> f64 {
        self.hours_logged * hourly_rate
    }
}

/// The hourly rate paid for a job group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobGroupRate {
    /// The job group this rate applies to.
    pub job_group: JobGroup,
    /// The hourly rate in dollars.
    pub hourly_rate: f64,
}
