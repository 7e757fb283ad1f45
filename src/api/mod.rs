//! HTTP API module for the payroll service.
//!
//! This module provides the REST endpoints for uploading time-log files
//! (`POST /upload`), reading the payroll report (`GET /report`) and checking
//! liveness (`GET /health`).

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{UPLOAD_FIELD, create_router};
pub use request::{ReportQuery, UploadedFile};
pub use response::{
    ApiError, ApiErrorResponse, EmployeeReportBody, HealthResponse, PayrollReportBody,
    ReportResponse, UploadResponse,
};
pub use state::AppState;
