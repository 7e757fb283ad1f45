//! Response types for the payroll API.
//!
//! This module defines the JSON bodies returned by the endpoints and the
//! mapping from [`PayrollError`] to HTTP error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::PayrollError;
use crate::models::{EmployeeReport, PayPeriod, PayrollReport};
use crate::service::UploadSummary;

/// Body of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Always `Upload successful`.
    pub message: String,
    /// The submission id taken from the file name.
    pub submission_id: i64,
    /// Number of work-logs stored.
    pub records_created: usize,
}

impl From<UploadSummary> for UploadResponse {
    fn from(summary: UploadSummary) -> Self {
        Self {
            message: "Upload successful".to_string(),
            submission_id: summary.submission_id,
            records_created: summary.record_ids.len(),
        }
    }
}

/// Body of the `/report` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportResponse {
    /// The report itself.
    pub payroll_report: PayrollReportBody,
}

/// The report entries in report order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollReportBody {
    /// One entry per employee and pay period.
    pub employee_reports: Vec<EmployeeReportBody>,
}

/// One report entry with the amount formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeReportBody {
    /// The employee the amount is owed to.
    pub employee_id: u64,
    /// The pay period the amount covers.
    pub pay_period: PayPeriod,
    /// The amount owed, e.g. `$160.00`.
    pub amount_paid: String,
}

impl From<&EmployeeReport> for EmployeeReportBody {
    fn from(report: &EmployeeReport) -> Self {
        Self {
            employee_id: report.employee_id,
            pay_period: report.pay_period,
            amount_paid: report.amount_paid_display(),
        }
    }
}

impl From<&PayrollReport> for ReportResponse {
    fn from(report: &PayrollReport) -> Self {
        Self {
            payroll_report: PayrollReportBody {
                employee_reports: report
                    .employee_reports()
                    .iter()
                    .map(EmployeeReportBody::from)
                    .collect(),
            },
        }
    }
}

/// Body of the `/health` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok`.
    pub status: String,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates an invalid query string error response.
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::new("INVALID_QUERY", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<PayrollError> for ApiErrorResponse {
    fn from(error: PayrollError) -> Self {
        let status = if error.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let message = error.to_string();

        let error = match error {
            PayrollError::InvalidRow { line, .. } => ApiError::with_details(
                "INVALID_ROW",
                message,
                format!("No rows were stored; fix line {} and upload the file again", line),
            ),
            PayrollError::InvalidSubmissionId { .. } => ApiError::with_details(
                "INVALID_SUBMISSION_ID",
                message,
                "File names must follow <prefix>-<prefix>-<id>.csv",
            ),
            PayrollError::DuplicateSubmission { .. } => ApiError::with_details(
                "DUPLICATE_SUBMISSION",
                message,
                "A submission is stored at most once",
            ),
            PayrollError::EmptyBatch { .. } => ApiError::new("EMPTY_BATCH", message),
            PayrollError::MalformedUpload { .. } => ApiError::new("MALFORMED_UPLOAD", message),
            PayrollError::AmountOutOfRange { .. } => ApiError::with_details(
                "AMOUNT_OUT_OF_RANGE",
                message,
                "Stored hours or rates are too large to report",
            ),
            PayrollError::Persistence { operation, .. } => ApiError::with_details(
                "PERSISTENCE_ERROR",
                "Storage error",
                format!("The store failed during {}", operation),
            ),
            PayrollError::ConfigNotFound { .. } | PayrollError::ConfigParseError { .. } => {
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message)
            }
        };

        ApiErrorResponse { status, error }
    }
}
