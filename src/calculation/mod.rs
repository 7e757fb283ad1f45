//! Calculation logic for the payroll engine.
//!
//! This module contains the pay period calculator, which assigns each date to
//! its semi-monthly pay period, and the report aggregator, which groups
//! work-logs by employee and pay period and prices them with the job group
//! rate table.

mod pay_period;
mod report_aggregation;

pub use pay_period::{
    FIRST_HALF_END_DAY, last_day_of_month, period_from_key, period_key, period_of,
};
pub use report_aggregation::{RateTable, aggregate, amount_paid, rate_table};
