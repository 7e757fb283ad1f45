//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod job_group;
mod pay_period;
mod payroll_report;
mod work_log;

pub use job_group::JobGroup;
pub use pay_period::{PayPeriod, PeriodKey};
pub use payroll_report::{EmployeeReport, PayrollReport, format_currency};
pub use work_log::{JobGroupRate, SubmissionId, WorkLogRecord};
