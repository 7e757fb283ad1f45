//! The payroll service facade.
//!
//! [`PayrollService`] is what the transport layer talks to. It owns the store
//! handle and composes decoding, batch ingestion and report aggregation.

use std::sync::Arc;

use tracing::{debug, info};

use crate::calculation::aggregate;
use crate::config::ReportConfig;
use crate::error::{PayrollError, PayrollResult};
use crate::ingest::{BatchIngestor, decode_upload};
use crate::models::{PayrollReport, SubmissionId};
use crate::store::PayrollStore;

/// The outcome of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSummary {
    /// The submission id taken from the file name.
    pub submission_id: SubmissionId,
    /// The generated id of every stored work-log, in file order.
    pub record_ids: Vec<i64>,
}

/// Ingestion and reporting entry points.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use payroll_engine::config::ReportConfig;
/// use payroll_engine::models::{JobGroup, JobGroupRate};
/// use payroll_engine::service::PayrollService;
/// use payroll_engine::store::InMemoryStore;
///
/// # #[tokio::main]
/// # async fn main() {
/// let store = InMemoryStore::with_rates(vec![
///     JobGroupRate { job_group: JobGroup::A, hourly_rate: 20.0 },
///     JobGroupRate { job_group: JobGroup::B, hourly_rate: 30.0 },
/// ]);
/// let service = PayrollService::new(Arc::new(store), ReportConfig::default());
///
/// let csv = "date,hours worked,employee id,job group\n02/01/2023,8,1,A\n18/01/2023,4,1,B\n";
/// let summary = service.submit_batch("time-report-42.csv", csv.as_bytes()).await.unwrap();
/// assert_eq!(summary.submission_id, 42);
///
/// let report = service.report(None, None).await.unwrap();
/// assert_eq!(report.employee_reports()[0].amount_paid_display(), "$160.00");
/// assert_eq!(report.employee_reports()[1].amount_paid_display(), "$120.00");
/// # }
/// ```
#[derive(Clone)]
pub struct PayrollService {
    store: Arc<dyn PayrollStore>,
    ingestor: BatchIngestor,
    report_config: ReportConfig,
}

impl PayrollService {
    /// Creates a service over `store` using the given report paging limits.
    pub fn new(store: Arc<dyn PayrollStore>, report_config: ReportConfig) -> Self {
        Self {
            ingestor: BatchIngestor::new(Arc::clone(&store)),
            store,
            report_config,
        }
    }

    /// Decodes and persists one uploaded file.
    ///
    /// The file name is validated first, then every row; the batch is only
    /// written once the whole file is known to be valid.
    pub async fn submit_batch(&self, filename: &str, bytes: &[u8]) -> PayrollResult<UploadSummary> {
        let submission = decode_upload(filename, bytes)?;
        debug!(
            submission_id = submission.id,
            rows = submission.records.len(),
            "Decoded upload"
        );

        let record_ids = self
            .ingestor
            .ingest(submission.id, &submission.records)
            .await?;

        Ok(UploadSummary {
            submission_id: submission.id,
            record_ids,
        })
    }

    /// Builds a payroll report from one page of stored work-logs.
    ///
    /// `limit` defaults to the configured default and is capped at the
    /// configured maximum; `offset` defaults to zero. Rates and work-logs are
    /// read separately, so a report may straddle a concurrent upload.
    pub async fn report(&self, limit: Option<u64>, offset: Option<u64>) -> PayrollResult<PayrollReport> {
        let limit = self.effective_limit(limit);
        let offset = offset.unwrap_or(0);

        let rates = self.store.job_group_rates().await?;
        let logs = self.store.work_logs(limit, offset).await?;
        let report = aggregate(&rates, &logs);

        if let Some(entry) = report
            .employee_reports()
            .iter()
            .find(|entry| !entry.amount_paid.is_finite())
        {
            return Err(PayrollError::AmountOutOfRange {
                employee_id: entry.employee_id,
                period_start: entry.pay_period.start_date,
            });
        }

        info!(
            limit,
            offset,
            logs = logs.len(),
            entries = report.len(),
            "Payroll report generated"
        );
        Ok(report)
    }

    /// Returns the work-log limit applied for a requested `limit`.
    pub fn effective_limit(&self, requested: Option<u64>) -> u64 {
        requested
            .unwrap_or(self.report_config.default_limit)
            .min(self.report_config.max_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobGroup, JobGroupRate};
    use crate::store::InMemoryStore;

    const HEADER: &str = "date,hours worked,employee id,job group\n";

    fn rates() -> Vec<JobGroupRate> {
        vec![
            JobGroupRate {
                job_group: JobGroup::A,
                hourly_rate: 20.0,
            },
            JobGroupRate {
                job_group: JobGroup::B,
                hourly_rate: 30.0,
            },
        ]
    }

    fn service_with(store: &InMemoryStore, report_config: ReportConfig) -> PayrollService {
        PayrollService::new(Arc::new(store.clone()), report_config)
    }

    #[tokio::test]
    async fn test_submit_batch_returns_summary() {
        let store = InMemoryStore::with_rates(rates());
        let service = service_with(&store, ReportConfig::default());
        let csv = format!("{}02/01/2023,8,1,A\n18/01/2023,4,1,B\n", HEADER);

        let summary = service
            .submit_batch("time-report-42.csv", csv.as_bytes())
            .await
            .unwrap();

        assert_eq!(
            summary,
            UploadSummary {
                submission_id: 42,
                record_ids: vec![1, 2],
            }
        );
    }

    #[tokio::test]
    async fn test_bad_filename_writes_nothing() {
        let store = InMemoryStore::with_rates(rates());
        let service = service_with(&store, ReportConfig::default());
        let csv = format!("{}02/01/2023,8,1,A\n", HEADER);

        let result = service.submit_batch("abc.csv", csv.as_bytes()).await;

        assert!(matches!(result, Err(PayrollError::InvalidSubmissionId { .. })));
        assert_eq!(store.work_log_count().await, 0);
    }

    #[tokio::test]
    async fn test_one_bad_row_rejects_whole_file() {
        let store = InMemoryStore::with_rates(rates());
        let service = service_with(&store, ReportConfig::default());
        let csv = format!("{}02/01/2023,8,1,A\n03/01/2023,-1,1,A\n", HEADER);

        let result = service.submit_batch("time-report-3.csv", csv.as_bytes()).await;

        assert!(matches!(result, Err(PayrollError::InvalidRow { line: 3, .. })));
        assert_eq!(store.work_log_count().await, 0);
        assert!(!store.is_processed(3).await);
    }

    #[tokio::test]
    async fn test_report_of_empty_store_is_empty() {
        let store = InMemoryStore::with_rates(rates());
        let service = service_with(&store, ReportConfig::default());

        assert!(service.report(None, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_report_pages_work_logs() {
        let store = InMemoryStore::with_rates(rates());
        let service = service_with(&store, ReportConfig::default());
        let csv = format!(
            "{}02/01/2023,1,1,A\n03/01/2023,1,2,A\n04/01/2023,1,3,A\n",
            HEADER
        );
        service
            .submit_batch("time-report-1.csv", csv.as_bytes())
            .await
            .unwrap();

        let page = service.report(Some(1), Some(1)).await.unwrap();

        assert_eq!(page.len(), 1);
        assert_eq!(page.employee_reports()[0].employee_id, 2);
    }

    #[tokio::test]
    async fn test_report_rejects_amount_that_overflows() {
        let store = InMemoryStore::with_rates(vec![JobGroupRate {
            job_group: JobGroup::A,
            hourly_rate: f64::MAX,
        }]);
        let service = service_with(&store, ReportConfig::default());
        let csv = format!("{}18/01/2023,2,5,A\n", HEADER);
        service
            .submit_batch("time-report-1.csv", csv.as_bytes())
            .await
            .unwrap();

        match service.report(None, None).await {
            Err(PayrollError::AmountOutOfRange {
                employee_id,
                period_start,
            }) => {
                assert_eq!(employee_id, 5);
                assert_eq!(period_start, chrono::NaiveDate::from_ymd_opt(2023, 1, 16).unwrap());
            }
            other => panic!("Expected AmountOutOfRange error, got {:?}", other),
        }
    }

    #[test]
    fn test_effective_limit_defaults_and_clamps() {
        let store = InMemoryStore::new();
        let service = service_with(
            &store,
            ReportConfig {
                default_limit: 100,
                max_limit: 500,
            },
        );

        assert_eq!(service.effective_limit(None), 100);
        assert_eq!(service.effective_limit(Some(20)), 20);
        assert_eq!(service.effective_limit(Some(10_000)), 500);
    }
}
