//! HTTP request handlers for the payroll API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, Query, State, multipart::MultipartRejection,
        rejection::QueryRejection,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::{PayrollError, PayrollResult};

use super::request::{ReportQuery, UploadedFile};
use super::response::{ApiError, ApiErrorResponse, HealthResponse, ReportResponse, UploadResponse};
use super::state::AppState;

/// Name of the multipart field carrying the CSV file.
pub const UPLOAD_FIELD: &str = "file";

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes();
    Router::new()
        .route("/upload", post(upload_handler))
        .route("/report", get(report_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Handler for POST /upload endpoint.
///
/// Accepts a multipart body whose `file` field holds a time-log CSV and
/// stores its rows under the submission id from the file name.
async fn upload_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing upload request");

    let upload = match read_upload(multipart).await {
        Ok(upload) => upload,
        Err(err) => return error_response(correlation_id, err),
    };

    let start_time = Instant::now();
    match state
        .service()
        .submit_batch(&upload.filename, &upload.bytes)
        .await
    {
        Ok(summary) => {
            info!(
                correlation_id = %correlation_id,
                filename = %upload.filename,
                submission_id = summary.submission_id,
                records = summary.record_ids.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Upload completed successfully"
            );
            (StatusCode::OK, Json(UploadResponse::from(summary))).into_response()
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /report endpoint.
///
/// Aggregates one page of stored work-logs into a payroll report.
async fn report_handler(
    State(state): State<AppState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing report request");

    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            let body_text = rejection.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "Invalid report query"
            );
            return (StatusCode::BAD_REQUEST, Json(ApiError::invalid_query(body_text)))
                .into_response();
        }
    };

    let start_time = Instant::now();
    match state.service().report(query.limit, query.offset).await {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                entries = report.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Report completed successfully"
            );
            (StatusCode::OK, Json(ReportResponse::from(&report))).into_response()
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /health endpoint.
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Pulls the `file` field out of the multipart body.
async fn read_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> PayrollResult<UploadedFile> {
    let mut multipart = multipart.map_err(|rejection| PayrollError::MalformedUpload {
        message: rejection.body_text(),
    })?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| PayrollError::MalformedUpload {
            message: e.body_text(),
        })?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| PayrollError::MalformedUpload {
                message: format!("field '{}' has no file name", UPLOAD_FIELD),
            })?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| PayrollError::MalformedUpload {
                message: e.body_text(),
            })?;

        return Ok(UploadedFile {
            filename,
            bytes: bytes.to_vec(),
        });
    }

    Err(PayrollError::MalformedUpload {
        message: format!("missing multipart field '{}'", UPLOAD_FIELD),
    })
}

fn error_response(correlation_id: Uuid, err: PayrollError) -> Response {
    if err.is_client_error() {
        warn!(correlation_id = %correlation_id, error = %err, "Request rejected");
    } else {
        error!(correlation_id = %correlation_id, error = %err, "Request failed");
    }
    ApiErrorResponse::from(err).into_response()
}
