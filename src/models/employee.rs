//! Employee model and related types.
//!
//! Employees are owned by the HR system and are read-only for the duration
//! of a payroll run.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ShiftRule;

/// Whether the employee is currently on the payroll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    /// On the payroll.
    #[default]
    Active,
    /// Left or suspended; excluded from payroll runs.
    Inactive,
}

impl EmploymentStatus {
    /// Maps a raw label. Anything other than "inactive" counts as active.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "inactive" | "terminated" | "resigned" => EmploymentStatus::Inactive,
            _ => EmploymentStatus::Active,
        }
    }
}

/// An employee subject to attendance reconciliation and payroll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Department name.
    pub department: String,
    /// Team name.
    pub team: String,
    /// Shift type referencing the shift catalog (e.g. "General", "Night").
    pub shift_type: String,
    /// Per-employee shift override, used by "Custom" shifts.
    #[serde(default)]
    pub shift_override: Option<ShiftRule>,
    /// Gross monthly salary.
    pub monthly_salary: Decimal,
    /// Employment status.
    #[serde(default)]
    pub status: EmploymentStatus,
}

impl Employee {
    /// Returns true if the employee should be included in a payroll run.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_payroll::models::{Employee, EmploymentStatus};
    /// use rust_decimal::Decimal;
    ///
    /// let employee = Employee {
    ///     id: "emp_001".to_string(),
    ///     name: "Asha Rao".to_string(),
    ///     department: "Operations".to_string(),
    ///     team: "Alpha".to_string(),
    ///     shift_type: "General".to_string(),
    ///     shift_override: None,
    ///     monthly_salary: Decimal::new(30000, 0),
    ///     status: EmploymentStatus::Active,
    /// };
    /// assert!(employee.is_active());
    /// ```
    pub fn is_active(&self) -> bool {
        self.status == EmploymentStatus::Active
    }
}
