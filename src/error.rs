//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the ingestion and reporting paths can produce.

use chrono::NaiveDate;
use thiserror::Error;

/// The reason a single CSV row was rejected.
///
/// Row errors are always wrapped in [`PayrollError::InvalidRow`] together with
/// the line number they were found on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    /// The row had fewer than the three mandatory columns.
    #[error("expected at least 3 columns, found {found}")]
    MissingColumns {
        /// The number of columns actually present.
        found: usize,
    },

    /// The date column was not a valid `DD/MM/YYYY` calendar date.
    #[error("invalid date '{value}': {message}")]
    InvalidDate {
        /// The raw column value.
        value: String,
        /// What was wrong with it.
        message: String,
    },

    /// The hours column was not a finite, non-negative number.
    #[error("invalid hours '{value}': {message}")]
    InvalidHours {
        /// The raw column value.
        value: String,
        /// What was wrong with it.
        message: String,
    },

    /// The employee id column was not a non-negative integer.
    #[error("invalid employee id '{value}': {message}")]
    InvalidEmployeeId {
        /// The raw column value.
        value: String,
        /// What was wrong with it.
        message: String,
    },

    /// The CSV reader could not decode the row at all.
    #[error("unreadable row: {message}")]
    Unreadable {
        /// The decoder's description of the failure.
        message: String,
    },
}

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::PayrollError;
///
/// let error = PayrollError::DuplicateSubmission { submission_id: 42 };
/// assert_eq!(error.to_string(), "Submission 42 has already been processed");
/// assert!(error.is_client_error());
/// ```
#[derive(Debug, Error)]
pub enum PayrollError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A row of an uploaded file failed validation.
    #[error("Invalid row on line {line}: {reason}")]
    InvalidRow {
        /// The 1-based line number of the row within the file.
        line: u64,
        /// Why the row was rejected.
        #[source]
        reason: RowError,
    },

    /// The upload's file name does not carry a usable submission id.
    #[error("Invalid submission file name '{filename}': {message}")]
    InvalidSubmissionId {
        /// The file name as uploaded.
        filename: String,
        /// What was wrong with it.
        message: String,
    },

    /// The submission id has already been committed.
    #[error("Submission {submission_id} has already been processed")]
    DuplicateSubmission {
        /// The submission id that was rejected.
        submission_id: i64,
    },

    /// The upload contained a header but no work-log rows.
    #[error("Submission {submission_id} contains no work-log rows")]
    EmptyBatch {
        /// The submission id of the empty upload.
        submission_id: i64,
    },

    /// The upload request itself was unusable.
    #[error("Malformed upload: {message}")]
    MalformedUpload {
        /// A description of what was missing or unreadable.
        message: String,
    },

    /// A report amount does not fit in a finite number of dollars.
    #[error(
        "Amount paid to employee {employee_id} for the period starting {period_start} is out of range"
    )]
    AmountOutOfRange {
        /// The employee whose amount overflowed.
        employee_id: u64,
        /// The first day of the affected pay period.
        period_start: NaiveDate,
    },

    /// The store failed while reading or writing.
    #[error("Persistence error during {operation}: {message}")]
    Persistence {
        /// The store operation that failed.
        operation: String,
        /// The underlying error message.
        message: String,
    },
}

impl PayrollError {
    /// Creates a persistence error for the given store operation.
    pub fn persistence(operation: impl Into<String>, message: impl ToString) -> Self {
        PayrollError::Persistence {
            operation: operation.into(),
            message: message.to_string(),
        }
    }

    /// Returns true if the error was caused by invalid caller input rather
    /// than a failure of the system.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PayrollError::InvalidRow { .. }
                | PayrollError::InvalidSubmissionId { .. }
                | PayrollError::DuplicateSubmission { .. }
                | PayrollError::EmptyBatch { .. }
                | PayrollError::MalformedUpload { .. }
        )
    }
}

/// A type alias for Results that return PayrollError.
pub type PayrollResult<T> = Result<T, PayrollError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = PayrollError::ConfigNotFound {
            path: "/missing/payroll.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/payroll.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = PayrollError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_row_displays_line_and_reason() {
        let error = PayrollError::InvalidRow {
            line: 3,
            reason: RowError::InvalidHours {
                value: "-1".to_string(),
                message: "hours cannot be negative".to_string(),
            },
        };
        assert_eq!(
            error.to_string(),
            "Invalid row on line 3: invalid hours '-1': hours cannot be negative"
        );
    }

    #[test]
    fn test_missing_columns_displays_count() {
        let reason = RowError::MissingColumns { found: 2 };
        assert_eq!(reason.to_string(), "expected at least 3 columns, found 2");
    }

    #[test]
    fn test_invalid_submission_id_displays_filename() {
        let error = PayrollError::InvalidSubmissionId {
            filename: "abc.csv".to_string(),
            message: "expected <prefix>-<prefix>-<id>.csv".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid submission file name 'abc.csv': expected <prefix>-<prefix>-<id>.csv"
        );
    }

    #[test]
    fn test_amount_out_of_range_is_server_error() {
        let error = PayrollError::AmountOutOfRange {
            employee_id: 7,
            period_start: NaiveDate::from_ymd_opt(2023, 1, 16).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Amount paid to employee 7 for the period starting 2023-01-16 is out of range"
        );
        assert!(!error.is_client_error());
    }

    #[test]
    fn test_persistence_helper_builds_variant() {
        let error = PayrollError::persistence("insert work logs", "connection reset");
        assert_eq!(
            error.to_string(),
            "Persistence error during insert work logs: connection reset"
        );
        assert!(!error.is_client_error());
    }

    #[test]
    fn test_client_errors_are_classified() {
        assert!(PayrollError::EmptyBatch { submission_id: 1 }.is_client_error());
        assert!(
            PayrollError::MalformedUpload {
                message: "no file".to_string()
            }
            .is_client_error()
        );
        assert!(
            PayrollError::InvalidRow {
                line: 2,
                reason: RowError::MissingColumns { found: 1 },
            }
            .is_client_error()
        );
        assert!(
            !PayrollError::ConfigNotFound {
                path: "x".to_string()
            }
            .is_client_error()
        );
    }

    #[test]
    fn test_invalid_row_exposes_source() {
        use std::error::Error;

        let error = PayrollError::InvalidRow {
            line: 2,
            reason: RowError::MissingColumns { found: 1 },
        };
        assert!(error.source().is_some());
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<PayrollError>();
        assert_error::<RowError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_duplicate() -> PayrollResult<()> {
            Err(PayrollError::DuplicateSubmission { submission_id: 7 })
        }

        fn propagates_error() -> PayrollResult<()> {
            returns_duplicate()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
