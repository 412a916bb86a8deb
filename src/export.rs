//! CSV rendering of payroll reports.
//!
//! Two layouts are produced: the monthly summary (one row per employee) and
//! the attendance grid (the summary columns followed by one status code per
//! day of the month). Employees whose line could not be computed keep their
//! row, with `ERROR: <code>` in every figure column.

use chrono::Datelike;

use crate::models::{EmployeeEntry, PayrollReport};

const SUMMARY_HEADER: [&str; 13] = [
    "Emp ID",
    "Name",
    "Department",
    "Shift",
    "Monthly Salary",
    "Working Days",
    "Present Days",
    "LOP Days",
    "Leave Days",
    "Absent Days",
    "Per Day Rate",
    "LOP Deduction",
    "Net Salary",
];

/// Renders the monthly summary as CSV.
///
/// # Example
///
/// ```
/// use attendance_payroll::export::summary_csv;
/// use attendance_payroll::models::{BatchTotals, PayrollReport, YearMonth};
///
/// let report = PayrollReport {
///     month: YearMonth::new(2024, 6).unwrap(),
///     entries: vec![],
///     totals: BatchTotals::default(),
///     cancelled: false,
///     skipped_inactive: 0,
/// };
/// let csv = summary_csv(&report);
/// assert!(csv.starts_with("Emp ID,Name,Department,Shift,Monthly Salary"));
/// assert_eq!(csv.lines().count(), 1);
/// ```
pub fn summary_csv(report: &PayrollReport) -> String {
    let mut out = String::new();
    push_row(&mut out, SUMMARY_HEADER.iter().map(|h| h.to_string()));
    for entry in &report.entries {
        push_row(&mut out, summary_fields(entry));
    }
    out
}

/// Renders the attendance grid as CSV.
///
/// Day columns are headed `01`, `02`, ... up to the last day of the month.
/// A failed employee's day cells are left empty.
pub fn grid_csv(report: &PayrollReport) -> String {
    let days = report.month.days_in_month();
    let mut out = String::new();

    let header = SUMMARY_HEADER
        .iter()
        .map(|h| h.to_string())
        .chain((1..=days).map(|d| format!("{:02}", d)));
    push_row(&mut out, header);

    for entry in &report.entries {
        let mut cells = vec![String::new(); days as usize];
        if let Some(aggregate) = entry.aggregate() {
            for status in &aggregate.days {
                if let Some(cell) = cells.get_mut(status.date.day0() as usize) {
                    *cell = status.code().to_string();
                }
            }
        }
        push_row(&mut out, summary_fields(entry).into_iter().chain(cells));
    }
    out
}

fn summary_fields(entry: &EmployeeEntry) -> Vec<String> {
    let mut fields = vec![
        entry.employee_id.clone(),
        entry.emp_name.clone(),
        entry.department.clone(),
        entry.shift_type.clone(),
    ];
    match (entry.line(), entry.failure_code()) {
        (Some(line), _) => fields.extend([
            line.monthly_salary.to_string(),
            line.working_days.to_string(),
            line.present_days.to_string(),
            line.lop_days.to_string(),
            line.leave_days.to_string(),
            line.absent_days.to_string(),
            line.per_day_rate.to_string(),
            line.lop_deduction.to_string(),
            line.net_salary.to_string(),
        ]),
        (None, code) => {
            let flag = format!("ERROR: {}", code.unwrap_or("UNKNOWN"));
            fields.extend(std::iter::repeat_n(flag, SUMMARY_HEADER.len() - 4));
        }
    }
    fields
}

fn push_row(out: &mut String, fields: impl IntoIterator<Item = String>) {
    let row: Vec<String> = fields.into_iter().map(|f| csv_escape(&f)).collect();
    out.push_str(&row.join(","));
    out.push_str("\r\n");
}

fn should_neutralize(value: &str) -> bool {
    matches!(
        value.trim_start().chars().next(),
        Some('=') | Some('+') | Some('-') | Some('@')
    )
}

/// Quotes a field per RFC 4180 and defuses spreadsheet formulas.
fn csv_escape(value: &str) -> String {
    let safe = if should_neutralize(value) {
        format!("'{}", value)
    } else {
        value.to_string()
    };
    if safe.contains(',') || safe.contains('"') || safe.contains('\n') || safe.contains('\r') {
        format!("\"{}\"", safe.replace('"', "\"\""))
    } else {
        safe
    }
}
