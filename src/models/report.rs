//! Payroll output models.
//!
//! This module contains the [`PayrollLine`] computed per employee, the
//! [`PayrollReport`] produced by a batch run, and the [`AuditStep`] records
//! that explain how each figure was reached.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AttendanceCode, MonthlyAggregate, YearMonth};

/// A single step in the audit trail recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// The monthly payroll figures for one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollLine {
    /// Employee identifier.
    pub employee_id: String,
    /// Employee display name.
    pub emp_name: String,
    /// Department.
    pub department: String,
    /// Team.
    pub team: String,
    /// Shift type.
    pub shift_type: String,
    /// The month computed.
    pub month: YearMonth,
    /// Gross monthly salary.
    pub monthly_salary: Decimal,
    /// Non-rest days in the month.
    pub working_days: u32,
    /// Days present.
    pub present_days: u32,
    /// Loss-of-pay days.
    pub lop_days: u32,
    /// Approved leave days.
    pub leave_days: u32,
    /// Absent days.
    pub absent_days: u32,
    /// Days with no attendance data.
    pub not_available_days: u32,
    /// Salary per day (monthly salary over the fixed divisor).
    pub per_day_rate: Decimal,
    /// Deduction for loss-of-pay and absent days.
    pub lop_deduction: Decimal,
    /// Salary after deduction.
    pub net_salary: Decimal,
}

/// The outcome of one employee's pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EmployeeOutcome {
    /// The line was computed.
    Computed {
        /// The payroll figures.
        line: PayrollLine,
        /// The statuses the line was computed from.
        aggregate: MonthlyAggregate,
        /// How the figures were reached.
        audit_steps: Vec<AuditStep>,
    },
    /// The line could not be computed.
    Failed {
        /// Machine-readable error code.
        code: String,
        /// Human-readable error message.
        message: String,
    },
}

/// One roster entry in a payroll report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeEntry {
    /// Employee identifier.
    pub employee_id: String,
    /// Employee display name.
    pub emp_name: String,
    /// Department.
    pub department: String,
    /// Shift type.
    pub shift_type: String,
    /// Computed line or failure.
    pub outcome: EmployeeOutcome,
}

impl EmployeeEntry {
    /// The computed payroll line, if any.
    pub fn line(&self) -> Option<&PayrollLine> {
        match &self.outcome {
            EmployeeOutcome::Computed { line, .. } => Some(line),
            EmployeeOutcome::Failed { .. } => None,
        }
    }

    /// The monthly aggregate, if the line was computed.
    pub fn aggregate(&self) -> Option<&MonthlyAggregate> {
        match &self.outcome {
            EmployeeOutcome::Computed { aggregate, .. } => Some(aggregate),
            EmployeeOutcome::Failed { .. } => None,
        }
    }

    /// The failure code, if the line could not be computed.
    pub fn failure_code(&self) -> Option<&str> {
        match &self.outcome {
            EmployeeOutcome::Computed { .. } => None,
            EmployeeOutcome::Failed { code, .. } => Some(code),
        }
    }
}

/// Totals across all computed lines of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchTotals {
    /// Employees in the report, computed or failed.
    pub total_employees: usize,
    /// Employees whose line could not be computed.
    pub failed_employees: usize,
    /// Sum of monthly salaries.
    pub total_salary: Decimal,
    /// Sum of LOP deductions.
    pub total_deductions: Decimal,
    /// Sum of net salaries.
    pub total_net_salary: Decimal,
    /// Sum of LOP days.
    pub total_lop_days: u32,
    /// Sum of present days.
    pub total_present_days: u32,
}

impl BatchTotals {
    /// Sums the computed lines among `entries`, saturating at the numeric bounds.
    pub fn from_entries(entries: &[EmployeeEntry]) -> Self {
        entries.iter().fold(
            BatchTotals {
                total_employees: entries.len(),
                ..Default::default()
            },
            |mut totals, entry| {
                match entry.line() {
                    Some(line) => {
                        totals.total_salary = totals.total_salary.saturating_add(line.monthly_salary);
                        totals.total_deductions =
                            totals.total_deductions.saturating_add(line.lop_deduction);
                        totals.total_net_salary =
                            totals.total_net_salary.saturating_add(line.net_salary);
                        totals.total_lop_days = totals.total_lop_days.saturating_add(line.lop_days);
                        totals.total_present_days =
                            totals.total_present_days.saturating_add(line.present_days);
                    }
                    None => totals.failed_employees += 1,
                }
                totals
            },
        )
    }
}

/// One row of the per-day attendance grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceGridRow {
    /// Employee identifier.
    pub employee_id: String,
    /// Employee display name.
    pub emp_name: String,
    /// One code per calendar day, in date order; empty when the employee failed.
    pub codes: Vec<AttendanceCode>,
    /// Failure code when the employee's statuses could not be computed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The complete result of a payroll batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollReport {
    /// The month computed.
    pub month: YearMonth,
    /// One entry per dispatched employee, in roster order.
    pub entries: Vec<EmployeeEntry>,
    /// Totals across computed lines.
    pub totals: BatchTotals,
    /// True if the batch was cancelled before every employee was dispatched.
    pub cancelled: bool,
    /// Inactive employees left out of the run.
    pub skipped_inactive: usize,
}

impl PayrollReport {
    /// Computed payroll lines, in roster order.
    pub fn lines(&self) -> impl Iterator<Item = &PayrollLine> {
        self.entries.iter().filter_map(EmployeeEntry::line)
    }

    /// Entries whose line could not be computed.
    pub fn failures(&self) -> impl Iterator<Item = &EmployeeEntry> {
        self.entries.iter().filter(|e| e.line().is_none())
    }

    /// Looks up an employee's entry.
    pub fn entry(&self, employee_id: &str) -> Option<&EmployeeEntry> {
        self.entries.iter().find(|e| e.employee_id == employee_id)
    }

    /// Builds the per-day attendance grid.
    pub fn attendance_grid(&self) -> Vec<AttendanceGridRow> {
        self.entries
            .iter()
            .map(|entry| AttendanceGridRow {
                employee_id: entry.employee_id.clone(),
                emp_name: entry.emp_name.clone(),
                codes: entry
                    .aggregate()
                    .map(|agg| agg.days.iter().map(|d| d.code()).collect())
                    .unwrap_or_default(),
                error: entry.failure_code().map(str::to_string),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatusCounts;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn computed(id: &str, salary: &str, deduction: &str, lop_days: u32) -> EmployeeEntry {
        let month = YearMonth::new(2024, 6).unwrap();
        let line = PayrollLine {
            employee_id: id.to_string(),
            emp_name: format!("Employee {}", id),
            department: "Ops".to_string(),
            team: "Alpha".to_string(),
            shift_type: "General".to_string(),
            month,
            monthly_salary: dec(salary),
            working_days: 25,
            present_days: 25 - lop_days,
            lop_days,
            leave_days: 0,
            absent_days: 0,
            not_available_days: 0,
            per_day_rate: dec(salary) / dec("30"),
            lop_deduction: dec(deduction),
            net_salary: dec(salary) - dec(deduction),
        };
        EmployeeEntry {
            employee_id: id.to_string(),
            emp_name: line.emp_name.clone(),
            department: "Ops".to_string(),
            shift_type: "General".to_string(),
            outcome: EmployeeOutcome::Computed {
                line,
                aggregate: MonthlyAggregate {
                    employee_id: id.to_string(),
                    month,
                    counts: StatusCounts::default(),
                    weeks: vec![],
                    days: vec![],
                },
                audit_steps: vec![],
            },
        }
    }

    fn failed(id: &str) -> EmployeeEntry {
        EmployeeEntry {
            employee_id: id.to_string(),
            emp_name: format!("Employee {}", id),
            department: "Ops".to_string(),
            shift_type: "General".to_string(),
            outcome: EmployeeOutcome::Failed {
                code: "OVERLAPPING_LEAVE".to_string(),
                message: "overlap".to_string(),
            },
        }
    }

    #[test]
    fn test_totals_skip_failed_entries() {
        let entries = vec![
            computed("e1", "30000", "3000", 2),
            failed("e2"),
            computed("e3", "60000", "0", 0),
        ];
        let totals = BatchTotals::from_entries(&entries);
        assert_eq!(totals.total_employees, 3);
        assert_eq!(totals.failed_employees, 1);
        assert_eq!(totals.total_salary, dec("90000"));
        assert_eq!(totals.total_deductions, dec("3000"));
        assert_eq!(totals.total_net_salary, dec("87000"));
        assert_eq!(totals.total_lop_days, 2);
        assert_eq!(totals.total_present_days, 48);
    }

    #[test]
    fn test_totals_saturate_instead_of_overflowing() {
        let max = Decimal::MAX.to_string();
        let entries = vec![computed("e1", &max, "0", 0), computed("e2", &max, "0", 0)];
        let totals = BatchTotals::from_entries(&entries);
        assert_eq!(totals.total_salary, Decimal::MAX);
        assert_eq!(totals.total_net_salary, Decimal::MAX);
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(failed("e2")).unwrap();
        assert_eq!(json["outcome"]["status"], "failed");
        assert_eq!(json["outcome"]["code"], "OVERLAPPING_LEAVE");

        let json = serde_json::to_value(computed("e1", "30000", "0", 0)).unwrap();
        assert_eq!(json["outcome"]["status"], "computed");
        assert_eq!(json["outcome"]["line"]["month"], "2024-06");
    }

    #[test]
    fn test_grid_flags_failed_rows() {
        let entries = vec![computed("e1", "30000", "0", 0), failed("e2")];
        let report = PayrollReport {
            month: YearMonth::new(2024, 6).unwrap(),
            totals: BatchTotals::from_entries(&entries),
            entries,
            cancelled: false,
            skipped_inactive: 0,
        };
        let grid = report.attendance_grid();
        assert_eq!(grid.len(), 2);
        assert!(grid[0].error.is_none());
        assert_eq!(grid[1].error.as_deref(), Some("OVERLAPPING_LEAVE"));
        assert_eq!(report.lines().count(), 1);
        assert_eq!(report.failures().count(), 1);
        assert!(report.entry("e2").is_some());
    }
}
