//! In-memory store.
//!
//! Holds rates, work-logs and processed submission ids behind one async mutex.
//! A transaction owns the lock for its whole lifetime, so transactions are
//! serialised and a second submission of the same id always observes the
//! first one's outcome.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use crate::error::{PayrollError, PayrollResult};
use crate::models::{JobGroupRate, SubmissionId, WorkLogRecord};

use super::{PayrollStore, StoreTransaction};

#[derive(Debug, Default)]
struct MemoryState {
    rates: Vec<JobGroupRate>,
    logs: Vec<(i64, WorkLogRecord)>,
    submissions: BTreeSet<i64>,
    last_id: i64,
}

/// A [`PayrollStore`] kept entirely in process memory.
///
/// Cloning the store yields another handle to the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryStore {
    /// Creates an empty store with no job group rates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store seeded with the given rates.
    pub fn with_rates(rates: Vec<JobGroupRate>) -> Self {
        let state = MemoryState {
            rates,
            ..MemoryState::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Replaces the job group rate table.
    pub async fn set_rates(&self, rates: Vec<JobGroupRate>) {
        self.state.lock().await.rates = rates;
    }

    /// Returns the number of committed work-logs.
    pub async fn work_log_count(&self) -> usize {
        self.state.lock().await.logs.len()
    }

    /// Returns true if `submission_id` has been committed.
    pub async fn is_processed(&self, submission_id: SubmissionId) -> bool {
        self.state.lock().await.submissions.contains(&submission_id)
    }
}

#[async_trait]
impl PayrollStore for InMemoryStore {
    async fn job_group_rates(&self) -> PayrollResult<Vec<JobGroupRate>> {
        Ok(self.state.lock().await.rates.clone())
    }

    async fn work_logs(&self, limit: u64, offset: u64) -> PayrollResult<Vec<WorkLogRecord>> {
        let state = self.state.lock().await;
        let mut logs: Vec<&(i64, WorkLogRecord)> = state.logs.iter().collect();
        logs.sort_by_key(|(id, record)| (record.date, *id));

        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(logs
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn begin(&self) -> PayrollResult<Box<dyn StoreTransaction>> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        Ok(Box::new(InMemoryTransaction {
            guard,
            submissions: Vec::new(),
            logs: Vec::new(),
        }))
    }
}

struct InMemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    submissions: Vec<i64>,
    logs: Vec<(i64, WorkLogRecord)>,
}

#[async_trait]
impl StoreTransaction for InMemoryTransaction {
    async fn insert_submission(&mut self, submission_id: SubmissionId) -> PayrollResult<()> {
        if self.guard.submissions.contains(&submission_id) || self.submissions.contains(&submission_id) {
            return Err(PayrollError::DuplicateSubmission { submission_id });
        }
        self.submissions.push(submission_id);
        Ok(())
    }

    async fn insert_work_logs(&mut self, records: &[WorkLogRecord]) -> PayrollResult<Vec<i64>> {
        let first_id = self.guard.last_id + self.logs.len() as i64 + 1;
        let ids: Vec<i64> = (first_id..).take(records.len()).collect();
        self.logs
            .extend(ids.iter().copied().zip(records.iter().cloned()));
        Ok(ids)
    }

    async fn commit(self: Box<Self>) -> PayrollResult<()> {
        let InMemoryTransaction {
            mut guard,
            submissions,
            logs,
        } = *self;

        if let Some((last_id, _)) = logs.last() {
            guard.last_id = *last_id;
        }
        debug!(
            submissions = submissions.len(),
            logs = logs.len(),
            "Committing in-memory transaction"
        );
        guard.submissions.extend(submissions);
        guard.logs.extend(logs);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> PayrollResult<()> {
        debug!(
            discarded_logs = self.logs.len(),
            "Rolling back in-memory transaction"
        );
        Ok(())
    }
}
