//! Batch ingestion.
//!
//! Persists one submission's work-logs exactly once. The submission marker
//! and the work-logs are written inside a single store transaction, and the
//! store's uniqueness constraint on the submission id is the only duplicate
//! check.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::{PayrollError, PayrollResult};
use crate::models::{SubmissionId, WorkLogRecord};
use crate::store::{PayrollStore, StoreTransaction};

/// Writes submissions through a [`PayrollStore`].
#[derive(Clone)]
pub struct BatchIngestor {
    store: Arc<dyn PayrollStore>,
}

impl BatchIngestor {
    /// Creates an ingestor writing to `store`.
    pub fn new(store: Arc<dyn PayrollStore>) -> Self {
        Self { store }
    }

    /// Persists `records` under `submission_id`, all or nothing.
    ///
    /// Returns the generated id of every record in insertion order. On any
    /// failure the transaction is rolled back and the error that caused the
    /// failure is returned; nothing from the batch becomes visible.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use chrono::NaiveDate;
    /// use payroll_engine::ingest::BatchIngestor;
    /// use payroll_engine::models::{JobGroup, WorkLogRecord};
    /// use payroll_engine::store::InMemoryStore;
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let ingestor = BatchIngestor::new(Arc::new(InMemoryStore::new()));
    /// let log = WorkLogRecord {
    ///     employee_id: 1,
    ///     job_group: JobGroup::A,
    ///     date: NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(),
    ///     hours_logged: 8.0,
    /// };
    ///
    /// assert_eq!(ingestor.ingest(42, &[log.clone()]).await.unwrap(), vec![1]);
    /// assert!(ingestor.ingest(42, &[log]).await.is_err());
    /// # }
    /// ```
    pub async fn ingest(
        &self,
        submission_id: SubmissionId,
        records: &[WorkLogRecord],
    ) -> PayrollResult<Vec<i64>> {
        let mut tx = self.store.begin().await?;

        match write_submission(&mut tx, submission_id, records).await {
            Ok(ids) => {
                tx.commit().await?;
                info!(
                    submission_id,
                    records = ids.len(),
                    "Submission committed"
                );
                Ok(ids)
            }
            Err(err) => {
                warn!(submission_id, error = %err, "Submission rejected, rolling back");
                if let Err(rollback_err) = tx.rollback().await {
                    error!(
                        submission_id,
                        error = %rollback_err,
                        "Rollback failed"
                    );
                }
                Err(err)
            }
        }
    }
}

async fn write_submission(
    tx: &mut Box<dyn StoreTransaction>,
    submission_id: SubmissionId,
    records: &[WorkLogRecord],
) -> PayrollResult<Vec<i64>> {
    tx.insert_submission(submission_id).await?;
    let ids = tx.insert_work_logs(records).await?;

    if ids.len() != records.len() {
        return Err(PayrollError::persistence(
            "read back generated ids",
            format!("expected {} ids, store returned {}", records.len(), ids.len()),
        ));
    }
    Ok(ids)
}
