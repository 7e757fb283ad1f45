//! Storage ports for the payroll engine.
//!
//! The engine never talks to a database directly. It reads reference data and
//! work-logs through [`PayrollStore`] and writes a submission through a
//! [`StoreTransaction`] obtained from [`PayrollStore::begin`]. The store is
//! responsible for enforcing that a submission id is committed at most once.
//!
//! Two implementations are provided: [`InMemoryStore`] for tests and local
//! runs, and [`PostgresStore`] for deployments.

mod memory;
mod postgres;

use async_trait::async_trait;

use crate::error::PayrollResult;
use crate::models::{JobGroupRate, SubmissionId, WorkLogRecord};

pub use memory::InMemoryStore;
pub use postgres::{MAX_ROWS_PER_STATEMENT, PostgresStore};

/// Read access to stored payroll data and the entry point for writes.
#[async_trait]
pub trait PayrollStore: Send + Sync {
    /// Returns the hourly rate of every job group.
    async fn job_group_rates(&self) -> PayrollResult<Vec<JobGroupRate>>;

    /// Returns up to `limit` work-logs ordered by date ascending, skipping the
    /// first `offset`.
    async fn work_logs(&self, limit: u64, offset: u64) -> PayrollResult<Vec<WorkLogRecord>>;

    /// Opens a transaction for writing one submission.
    async fn begin(&self) -> PayrollResult<Box<dyn StoreTransaction>>;
}

/// An open, all-or-nothing write scope.
///
/// Dropping a transaction without calling [`commit`](Self::commit) discards
/// everything written through it.
#[async_trait]
pub trait StoreTransaction: Send {
    /// Records that `submission_id` has been processed.
    ///
    /// Fails with [`PayrollError::DuplicateSubmission`](crate::error::PayrollError::DuplicateSubmission)
    /// if the id is already committed.
    async fn insert_submission(&mut self, submission_id: SubmissionId) -> PayrollResult<()>;

    /// Inserts `records` and returns one generated id per record, in order.
    async fn insert_work_logs(&mut self, records: &[WorkLogRecord]) -> PayrollResult<Vec<i64>>;

    /// Makes every write in this transaction visible.
    async fn commit(self: Box<Self>) -> PayrollResult<()>;

    /// Discards every write in this transaction.
    async fn rollback(self: Box<Self>) -> PayrollResult<()>;
}
