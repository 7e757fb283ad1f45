//! Submission decoding.
//!
//! Turns an uploaded file (its name plus raw bytes) into a submission id and
//! the validated work-logs it carries. Any problem with the name or with any
//! row rejects the whole upload.

use std::io::Read;

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{PayrollError, PayrollResult, RowError};
use crate::models::{SubmissionId, WorkLogRecord};

use super::row_parser::parse_row;

const CSV_EXTENSION: &str = ".csv";
const SUBMISSION_ID_SEGMENT: usize = 2;

/// A decoded upload, ready to be handed to the batch ingestor.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    /// The id taken from the file name.
    pub id: SubmissionId,
    /// Every row of the file, in file order.
    pub records: Vec<WorkLogRecord>,
}

/// Extracts the submission id from a `<prefix>-<prefix>-<id>.csv` file name.
///
/// # Example
///
/// ```
/// use payroll_engine::ingest::submission_id_from_filename;
///
/// assert_eq!(submission_id_from_filename("time-report-42.csv").unwrap(), 42);
/// assert!(submission_id_from_filename("abc.csv").is_err());
/// ```
pub fn submission_id_from_filename(filename: &str) -> PayrollResult<SubmissionId> {
    let fail = |message: String| PayrollError::InvalidSubmissionId {
        filename: filename.to_string(),
        message,
    };

    let stem = filename.strip_suffix(CSV_EXTENSION).unwrap_or(filename);
    let segments: Vec<&str> = stem.split('-').collect();
    let segment = segments
        .get(SUBMISSION_ID_SEGMENT)
        .ok_or_else(|| fail("expected <prefix>-<prefix>-<id>.csv".to_string()))?;

    segment
        .parse()
        .map_err(|e| fail(format!("submission id '{}' is not an integer: {}", segment, e)))
}

/// Reads every data row of a CSV document.
///
/// The first line is always treated as a header and skipped. Rows may carry
/// three or more columns. Fields are taken as written, so a padded value such
/// as ` 8` is not a number and ` B` is not job group B. The first invalid row
/// aborts reading.
pub fn read_work_logs<R: Read>(reader: R) -> PayrollResult<Vec<WorkLogRecord>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for (index, result) in csv_reader.records().enumerate() {
        // Header is line 1.
        let fallback_line = index as u64 + 2;
        let row = result.map_err(|e| PayrollError::InvalidRow {
            line: e.position().map_or(fallback_line, |p| p.line()),
            reason: RowError::Unreadable {
                message: e.to_string(),
            },
        })?;
        let line = row.position().map_or(fallback_line, |p| p.line());
        records.push(parse_row(line, &row)?);
    }

    debug!(rows = records.len(), "Read work logs from CSV");
    Ok(records)
}

/// Decodes an uploaded file.
///
/// The file name is checked before a single row is read, so a badly named
/// file is rejected regardless of its content. A file with no data rows is
/// rejected with [`PayrollError::EmptyBatch`].
pub fn decode_upload(filename: &str, bytes: &[u8]) -> PayrollResult<Submission> {
    let id = submission_id_from_filename(filename)?;
    let records = read_work_logs(bytes)?;

    if records.is_empty() {
        return Err(PayrollError::EmptyBatch { submission_id: id });
    }

    Ok(Submission { id, records })
}
