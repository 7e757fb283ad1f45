//! Payroll report aggregation.
//!
//! This module turns raw work-logs and the job group rate table into a
//! [`PayrollReport`] with one entry per employee and pay period.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::models::{EmployeeReport, JobGroup, JobGroupRate, PayrollReport, PeriodKey, WorkLogRecord};

use super::pay_period::{period_key, period_of};

/// Hourly rates keyed by job group.
pub type RateTable = BTreeMap<JobGroup, f64>;

/// Builds the job group rate lookup.
///
/// When the same job group appears more than once, the last rate wins.
pub fn rate_table(rates: &[JobGroupRate]) -> RateTable {
    rates
        .iter()
        .map(|rate| (rate.job_group, rate.hourly_rate))
        .collect()
}

/// Sums `hours_logged * rate` over the given logs.
///
/// Job groups absent from `rates` contribute nothing. The logs are summed in
/// a canonical order (date, job group, hours) so the floating-point result
/// does not depend on the order they arrived in.
pub fn amount_paid(rates: &RateTable, logs: &[&WorkLogRecord]) -> f64 {
    let mut ordered = logs.to_vec();
    ordered.sort_by(|a, b| canonical_order(a, b));

    ordered.iter().fold(0.0, |total, log| {
        let rate = rates.get(&log.job_group).copied().unwrap_or(0.0);
        total + log.amount_at(rate)
    })
}

/// Aggregates work-logs into a payroll report.
///
/// Logs are partitioned by employee id and pay period, each partition is
/// priced with [`amount_paid`], and the result is sorted by employee id then
/// pay period start.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::aggregate;
/// use payroll_engine::models::{JobGroup, JobGroupRate, WorkLogRecord};
/// use chrono::NaiveDate;
///
/// let rates = vec![
///     JobGroupRate { job_group: JobGroup::A, hourly_rate: 20.0 },
///     JobGroupRate { job_group: JobGroup::B, hourly_rate: 30.0 },
/// ];
/// let logs = vec![
///     WorkLogRecord {
///         employee_id: 1,
///         job_group: JobGroup::A,
///         date: NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(),
///         hours_logged: 8.0,
///     },
///     WorkLogRecord {
///         employee_id: 1,
///         job_group: JobGroup::B,
///         date: NaiveDate::from_ymd_opt(2023, 1, 18).unwrap(),
///         hours_logged: 4.0,
///     },
/// ];
///
/// let report = aggregate(&rates, &logs);
/// let amounts: Vec<String> = report
///     .employee_reports()
///     .iter()
///     .map(|r| r.amount_paid_display())
///     .collect();
/// assert_eq!(amounts, vec!["$160.00", "$120.00"]);
/// ```
pub fn aggregate(rates: &[JobGroupRate], logs: &[WorkLogRecord]) -> PayrollReport {
    let rates = rate_table(rates);
    warn_on_unpriced_groups(&rates, logs);

    let mut groups: BTreeMap<(u64, PeriodKey), Vec<&WorkLogRecord>> = BTreeMap::new();
    for log in logs {
        groups
            .entry((log.employee_id, period_key(log.date)))
            .or_default()
            .push(log);
    }

    let employee_reports: Vec<EmployeeReport> = groups
        .into_values()
        .filter_map(|group| {
            let first = group.first()?;
            Some(EmployeeReport {
                employee_id: first.employee_id,
                pay_period: period_of(first.date),
                amount_paid: amount_paid(&rates, &group),
            })
        })
        .collect();

    debug!(
        logs = logs.len(),
        entries = employee_reports.len(),
        "Aggregated work logs into payroll report"
    );

    PayrollReport::from_unsorted(employee_reports)
}

fn canonical_order(a: &WorkLogRecord, b: &WorkLogRecord) -> Ordering {
    a.date
        .cmp(&b.date)
        .then_with(|| a.job_group.cmp(&b.job_group))
        .then_with(|| a.hours_logged.total_cmp(&b.hours_logged))
}

fn warn_on_unpriced_groups(rates: &RateTable, logs: &[WorkLogRecord]) {
    let unpriced: BTreeSet<JobGroup> = logs
        .iter()
        .map(|log| log.job_group)
        .filter(|group| !rates.contains_key(group))
        .collect();

    for group in unpriced {
        warn!(job_group = %group, "No rate configured for job group, pricing at zero");
    }
}
