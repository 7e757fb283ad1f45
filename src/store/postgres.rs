//! PostgreSQL store.
//!
//! Tables:
//! - `jobgroup_rate (job_group, rate)` holds the rate reference data.
//! - `processed_files (file_id)` holds one row per committed submission; its
//!   primary key is what rejects a second commit of the same id.
//! - `worklog (id, employee_id, log_date, log_hours, job_group, updated_ts)`
//!   holds the work-logs.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder, Row, Transaction};
use tracing::{debug, info, warn};

use crate::config::DatabaseConfig;
use crate::error::{PayrollError, PayrollResult};
use crate::models::{JobGroup, JobGroupRate, SubmissionId, WorkLogRecord};

use super::{PayrollStore, StoreTransaction};

/// Postgres accepts at most 65535 bind parameters per statement and every
/// work-log row binds five.
pub const MAX_ROWS_PER_STATEMENT: usize = 65535 / WORKLOG_INSERT_COLUMNS;

const WORKLOG_INSERT_COLUMNS: usize = 5;

const SCHEMA_STATEMENTS: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS jobgroup_rate (
        job_group VARCHAR(8) PRIMARY KEY,
        rate DOUBLE PRECISION NOT NULL CHECK (rate >= 0)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS processed_files (
        file_id BIGINT PRIMARY KEY
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS worklog (
        id BIGSERIAL PRIMARY KEY,
        employee_id BIGINT NOT NULL CHECK (employee_id >= 0),
        log_date DATE NOT NULL,
        log_hours DOUBLE PRECISION NOT NULL CHECK (log_hours >= 0),
        job_group VARCHAR(8) NOT NULL,
        updated_ts TIMESTAMPTZ NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS worklog_log_date_idx ON worklog (log_date, id)",
];

/// A [`PayrollStore`] backed by a PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connects a pool using `config` and makes sure the schema exists.
    pub async fn connect(config: &DatabaseConfig) -> PayrollResult<Self> {
        info!(
            max_connections = config.max_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_secs)))
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| PayrollError::persistence("connect", e))?;

        let store = Self::from_pool(pool);
        store.initialize_schema().await?;
        Ok(store)
    }

    /// Wraps an existing pool without touching the schema.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the tables and indexes if they do not exist.
    pub async fn initialize_schema(&self) -> PayrollResult<()> {
        for statement in SCHEMA_STATEMENTS {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| PayrollError::persistence("initialize schema", e))?;
        }
        info!("PostgreSQL schema initialized");
        Ok(())
    }

    /// Inserts rates for job groups that do not have one yet.
    ///
    /// Existing rates are left untouched so operators can change them in the
    /// database without the next restart reverting the change.
    pub async fn seed_rates(&self, rates: &[JobGroupRate]) -> PayrollResult<()> {
        for rate in rates {
            sqlx::query(
                "insert into jobgroup_rate (job_group, rate) values ($1, $2) on conflict (job_group) do nothing",
            )
            .bind(rate.job_group.code())
            .bind(rate.hourly_rate)
            .execute(&self.pool)
            .await
            .map_err(|e| PayrollError::persistence("seed job group rates", e))?;
        }
        Ok(())
    }
}

#[async_trait]
impl PayrollStore for PostgresStore {
    async fn job_group_rates(&self) -> PayrollResult<Vec<JobGroupRate>> {
        let rows = sqlx::query("select job_group, rate from jobgroup_rate")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PayrollError::persistence("fetch job group rates", e))?;

        let mut rates = Vec::with_capacity(rows.len());
        for row in rows {
            let code: String = row
                .try_get("job_group")
                .map_err(|e| PayrollError::persistence("read job group rates", e))?;
            let hourly_rate: f64 = row
                .try_get("rate")
                .map_err(|e| PayrollError::persistence("read job group rates", e))?;

            match code.parse::<JobGroup>() {
                Ok(job_group) => rates.push(JobGroupRate {
                    job_group,
                    hourly_rate,
                }),
                Err(message) => warn!(%message, "Ignoring rate for unknown job group"),
            }
        }
        Ok(rates)
    }

    async fn work_logs(&self, limit: u64, offset: u64) -> PayrollResult<Vec<WorkLogRecord>> {
        let rows = sqlx::query(
            "select employee_id, log_date, log_hours, job_group from worklog order by log_date, id limit $1 offset $2",
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .bind(i64::try_from(offset).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PayrollError::persistence("fetch work logs", e))?;

        rows.iter()
            .map(|row| -> Result<WorkLogRecord, sqlx::Error> {
                let employee_id: i64 = row.try_get("employee_id")?;
                let job_group: String = row.try_get("job_group")?;
                Ok(WorkLogRecord {
                    employee_id: u64::try_from(employee_id)
                        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
                    job_group: JobGroup::from_code(&job_group),
                    date: row.try_get("log_date")?,
                    hours_logged: row.try_get("log_hours")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(|e| PayrollError::persistence("read work logs", e))
    }

    async fn begin(&self) -> PayrollResult<Box<dyn StoreTransaction>> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| PayrollError::persistence("begin transaction", e))?;
        Ok(Box::new(PostgresTransaction { tx }))
    }
}

struct PostgresTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTransaction for PostgresTransaction {
    async fn insert_submission(&mut self, submission_id: SubmissionId) -> PayrollResult<()> {
        sqlx::query("insert into processed_files (file_id) values ($1)")
            .bind(submission_id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    PayrollError::DuplicateSubmission { submission_id }
                }
                _ => PayrollError::persistence("insert submission marker", e),
            })?;
        Ok(())
    }

    async fn insert_work_logs(&mut self, records: &[WorkLogRecord]) -> PayrollResult<Vec<i64>> {
        let rows = records
            .iter()
            .map(|record| i64::try_from(record.employee_id).map(|id| (id, record)))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| PayrollError::persistence("insert work logs", e))?;

        let updated_ts = Utc::now();
        let mut ids = Vec::with_capacity(rows.len());

        for mut builder in insert_statements(&rows, updated_ts) {
            let inserted = builder
                .build()
                .fetch_all(&mut *self.tx)
                .await
                .map_err(|e| PayrollError::persistence("insert work logs", e))?;

            for row in inserted {
                ids.push(
                    row.try_get::<i64, _>("id")
                        .map_err(|e| PayrollError::persistence("read inserted ids", e))?,
                );
            }
        }

        debug!(count = ids.len(), "Inserted work logs");
        Ok(ids)
    }

    async fn commit(self: Box<Self>) -> PayrollResult<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| PayrollError::persistence("commit transaction", e))
    }

    async fn rollback(self: Box<Self>) -> PayrollResult<()> {
        self.tx
            .rollback()
            .await
            .map_err(|e| PayrollError::persistence("rollback transaction", e))
    }
}

/// Splits rows into multi-row inserts that each stay under the bind limit.
fn insert_statements<'a>(
    rows: &'a [(i64, &'a WorkLogRecord)],
    updated_ts: DateTime<Utc>,
) -> impl Iterator<Item = QueryBuilder<'static, Postgres>> + 'a {
    rows.chunks(MAX_ROWS_PER_STATEMENT)
        .map(move |chunk| insert_statement(chunk, updated_ts))
}

/// Builds one `insert ... returning id` statement for a chunk of rows.
fn insert_statement(
    chunk: &[(i64, &WorkLogRecord)],
    updated_ts: DateTime<Utc>,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(
        "insert into worklog (employee_id, log_date, log_hours, job_group, updated_ts) ",
    );
    builder.push_values(chunk, |mut row, (employee_id, record)| {
        row.push_bind(*employee_id)
            .push_bind(record.date)
            .push_bind(record.hours_logged)
            .push_bind(record.job_group.code())
            .push_bind(updated_ts);
    });
    builder.push(" returning id");
    builder
}
