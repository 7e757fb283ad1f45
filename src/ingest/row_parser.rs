//! Row parsing and validation.
//!
//! Columns are positional: date, hours, employee id, job group code. The
//! first three are mandatory; a missing job group code means group A.

use chrono::NaiveDate;
use csv::StringRecord;

use crate::error::{PayrollError, PayrollResult, RowError};
use crate::models::{JobGroup, WorkLogRecord};

/// Number of columns every row must carry.
pub const REQUIRED_COLUMNS: usize = 3;

const DATE_COLUMN: usize = 0;
const HOURS_COLUMN: usize = 1;
const EMPLOYEE_ID_COLUMN: usize = 2;
const JOB_GROUP_COLUMN: usize = 3;

/// Converts one CSV row into a validated work-log.
///
/// `line` is the row's line number within the file and is only used to
/// locate the row in the returned error.
///
/// # Example
///
/// ```
/// use csv::StringRecord;
/// use payroll_engine::ingest::parse_row;
/// use payroll_engine::models::JobGroup;
///
/// let row = StringRecord::from(vec!["14/11/2023", "7.5", "1", "B"]);
/// let log = parse_row(2, &row).unwrap();
///
/// assert_eq!(log.employee_id, 1);
/// assert_eq!(log.job_group, JobGroup::B);
/// assert_eq!(log.hours_logged, 7.5);
/// ```
pub fn parse_row(line: u64, row: &StringRecord) -> PayrollResult<WorkLogRecord> {
    let invalid = |reason| PayrollError::InvalidRow { line, reason };

    if row.len() < REQUIRED_COLUMNS {
        return Err(invalid(RowError::MissingColumns { found: row.len() }));
    }

    let date = parse_date(&row[DATE_COLUMN]).map_err(invalid)?;
    let hours_logged = parse_hours(&row[HOURS_COLUMN]).map_err(invalid)?;
    let employee_id = parse_employee_id(&row[EMPLOYEE_ID_COLUMN]).map_err(invalid)?;
    let job_group = row
        .get(JOB_GROUP_COLUMN)
        .map_or_else(JobGroup::default, JobGroup::from_code);

    Ok(WorkLogRecord {
        employee_id,
        job_group,
        date,
        hours_logged,
    })
}

/// Parses a `DD/MM/YYYY` date.
///
/// Day must be in `1..=31`, month in `1..=12` and the year exactly four
/// digits. Dates that do not exist on the calendar, such as `31/02/2023`,
/// are rejected.
pub fn parse_date(value: &str) -> Result<NaiveDate, RowError> {
    let fail = |message: &str| RowError::InvalidDate {
        value: value.to_string(),
        message: message.to_string(),
    };

    let parts: Vec<&str> = value.split('/').collect();
    let [day, month, year] = parts.as_slice() else {
        return Err(fail("expected DD/MM/YYYY"));
    };

    let day = numeric_component(day).ok_or_else(|| fail("day is not a number"))?;
    if !(1..=31).contains(&day) {
        return Err(fail("day must be between 1 and 31"));
    }

    let month = numeric_component(month).ok_or_else(|| fail("month is not a number"))?;
    if !(1..=12).contains(&month) {
        return Err(fail("month must be between 1 and 12"));
    }

    if year.len() != 4 {
        return Err(fail("year must have exactly 4 digits"));
    }
    let year = numeric_component(year).ok_or_else(|| fail("year is not a number"))?;

    NaiveDate::from_ymd_opt(year as i32, month, day)
        .ok_or_else(|| fail("day does not exist in that month"))
}

/// Parses the hours column as a finite, non-negative number.
pub fn parse_hours(value: &str) -> Result<f64, RowError> {
    let fail = |message: String| RowError::InvalidHours {
        value: value.to_string(),
        message,
    };

    let hours: f64 = value.parse().map_err(|e| fail(format!("{}", e)))?;
    if !hours.is_finite() {
        return Err(fail("hours must be a finite number".to_string()));
    }
    if hours < 0.0 {
        return Err(fail("hours cannot be negative".to_string()));
    }
    Ok(hours)
}

/// Parses the employee id column as a non-negative integer.
///
/// Ids above `i64::MAX` are rejected because stores keep them in a signed
/// 64-bit column.
pub fn parse_employee_id(value: &str) -> Result<u64, RowError> {
    let fail = |message: String| RowError::InvalidEmployeeId {
        value: value.to_string(),
        message,
    };

    let id: u64 = value.parse().map_err(|e| fail(format!("{}", e)))?;
    if id > i64::MAX as u64 {
        return Err(fail(format!("employee id cannot exceed {}", i64::MAX)));
    }
    Ok(id)
}

// Only ASCII digits; rejects signs and whitespace that `u32::from_str` would
// otherwise let through.
fn numeric_component(part: &str) -> Option<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}
