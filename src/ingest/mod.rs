//! Upload ingestion for the payroll engine.
//!
//! This module contains the ingestion pipeline:
//!
//! - row parsing: validates a single CSV row into a [`WorkLogRecord`]
//! - submission decoding: extracts the submission id from a file name and
//!   decodes the CSV body
//! - batch ingestion: persists a decoded submission exactly once
//!
//! [`WorkLogRecord`]: crate::models::WorkLogRecord

mod batch;
mod row_parser;
mod submission;

pub use batch::BatchIngestor;
pub use row_parser::{REQUIRED_COLUMNS, parse_date, parse_employee_id, parse_hours, parse_row};
pub use submission::{Submission, decode_upload, read_work_logs, submission_id_from_filename};
