//! Request types for the payroll API.

use serde::{Deserialize, Serialize};

/// Query string of the `/report` endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportQuery {
    /// Maximum number of work-logs to aggregate.
    #[serde(default)]
    pub limit: Option<u64>,
    /// Number of work-logs to skip, in date order.
    #[serde(default)]
    pub offset: Option<u64>,
}

/// An uploaded file taken from the multipart body.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// The file name sent by the client.
    pub filename: String,
    /// The file content.
    pub bytes: Vec<u8>,
}
