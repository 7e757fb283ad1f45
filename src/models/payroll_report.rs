//! Payroll report models.
//!
//! This module contains the [`EmployeeReport`] produced for every
//! (employee, pay period) pair and the ordered [`PayrollReport`] built from
//! them.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::PayPeriod;

/// The amount owed to one employee for one pay period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeReport {
    /// The employee the amount is owed to.
    pub employee_id: u64,
    /// The pay period the amount covers.
    pub pay_period: PayPeriod,
    /// The unrounded amount owed, in dollars.
    pub amount_paid: f64,
}

impl EmployeeReport {
    /// Returns the amount owed formatted as currency, e.g. `$160.00`.
    pub fn amount_paid_display(&self) -> String {
        format_currency(self.amount_paid)
    }
}

/// A payroll report sorted by employee id, then by pay period start.
///
/// The ordering is established on construction and cannot be disturbed
/// afterwards, so every consumer sees the same sequence for the same input.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::period_of;
/// use payroll_engine::models::{EmployeeReport, PayrollReport};
/// use chrono::NaiveDate;
///
/// let jan = period_of(NaiveDate::from_ymd_opt(2023, 1, 3).unwrap());
/// let report = PayrollReport::from_unsorted(vec![
///     EmployeeReport { employee_id: 2, pay_period: jan, amount_paid: 10.0 },
///     EmployeeReport { employee_id: 1, pay_period: jan, amount_paid: 20.0 },
/// ]);
///
/// assert_eq!(report.employee_reports()[0].employee_id, 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PayrollReport {
    employee_reports: Vec<EmployeeReport>,
}

impl PayrollReport {
    /// Builds a report from entries in any order.
    pub fn from_unsorted(mut employee_reports: Vec<EmployeeReport>) -> Self {
        employee_reports.sort_by(|a, b| {
            a.employee_id
                .cmp(&b.employee_id)
                .then_with(|| a.pay_period.start_date.cmp(&b.pay_period.start_date))
        });
        Self { employee_reports }
    }

    /// Returns the entries in report order.
    pub fn employee_reports(&self) -> &[EmployeeReport] {
        &self.employee_reports
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.employee_reports.len()
    }

    /// Returns true if the report has no entries.
    pub fn is_empty(&self) -> bool {
        self.employee_reports.is_empty()
    }

    /// Consumes the report, returning its entries in report order.
    pub fn into_employee_reports(self) -> Vec<EmployeeReport> {
        self.employee_reports
    }
}

/// Formats a dollar amount with two decimal places, e.g. `$120.00`.
///
/// The full binary value of the float is kept and rounded half to even, so
/// `2.675` (stored as `2.67499...`) formats as `$2.67` and the exact tie
/// `3.125` formats as `$3.12`.
pub fn format_currency(amount: f64) -> String {
    match Decimal::from_f64_retain(amount) {
        Some(value) => {
            let mut rounded =
                value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
            rounded.rescale(2);
            format!("${}", rounded)
        }
        None => format!("${:.2}", amount),
    }
}
