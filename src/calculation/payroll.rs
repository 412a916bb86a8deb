//! Loss-of-pay payroll calculation.
//!
//! This module turns an employee's [`MonthlyAggregate`] into a [`PayrollLine`]:
//!
//! ```text
//! per_day_rate  = round(monthly_salary / divisor)
//! lop_deduction = round(per_day_rate x (lop_days + absent_days))
//! net_salary    = monthly_salary - lop_deduction
//! ```
//!
//! The divisor is fixed (30 by default) regardless of the month's length.
//! Every intermediate figure is rounded once with the configured strategy,
//! so the same inputs always reconcile to the same cents.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, Employee, MonthlyAggregate, PayrollLine};

/// The rounding applied to currency figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Round half to even.
    #[default]
    Bankers,
    /// Round half away from zero.
    HalfUp,
    /// Drop digits beyond the precision.
    Truncate,
}

impl RoundingMode {
    fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingMode::Bankers => RoundingStrategy::MidpointNearestEven,
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::Truncate => RoundingStrategy::ToZero,
        }
    }
}

/// Payroll arithmetic settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollSettings {
    /// Days the monthly salary is divided by.
    #[serde(default = "default_divisor")]
    pub per_day_divisor: Decimal,
    /// Decimal places kept on currency figures.
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    /// Rounding applied at `decimal_places`.
    #[serde(default)]
    pub rounding: RoundingMode,
}

fn default_divisor() -> Decimal {
    Decimal::from(30)
}

fn default_decimal_places() -> u32 {
    2
}

impl Default for PayrollSettings {
    fn default() -> Self {
        Self {
            per_day_divisor: default_divisor(),
            decimal_places: default_decimal_places(),
            rounding: RoundingMode::default(),
        }
    }
}

impl PayrollSettings {
    /// Rounds `value` to the configured precision, keeping a fixed scale.
    ///
    /// # Example
    ///
    /// ```
    /// use attendance_payroll::calculation::PayrollSettings;
    /// use rust_decimal::Decimal;
    /// use std::str::FromStr;
    ///
    /// let settings = PayrollSettings::default();
    /// let rounded = settings.round(Decimal::from_str("1000.125").unwrap());
    /// assert_eq!(rounded.to_string(), "1000.12");
    /// ```
    pub fn round(&self, value: Decimal) -> Decimal {
        let mut rounded = value.round_dp_with_strategy(self.decimal_places, self.rounding.strategy());
        rounded.rescale(self.decimal_places);
        rounded
    }
}

/// The payroll line for one employee and how it was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollCalculation {
    /// The computed figures.
    pub line: PayrollLine,
    /// One step per computed figure.
    pub audit_steps: Vec<AuditStep>,
}

/// Computes an employee's monthly payroll line.
///
/// # Errors
///
/// Returns `InvalidCompensation` if the monthly salary is zero or negative,
/// or too large for the deduction to be represented.
///
/// # Example
///
/// ```
/// use attendance_payroll::calculation::{calculate_payroll, PayrollSettings};
/// use attendance_payroll::models::{Employee, EmploymentStatus, MonthlyAggregate, StatusCounts, YearMonth};
/// use rust_decimal::Decimal;
///
/// let employee = Employee {
///     id: "emp_001".to_string(),
///     name: "Asha Rao".to_string(),
///     department: "Operations".to_string(),
///     team: "Alpha".to_string(),
///     shift_type: "General".to_string(),
///     shift_override: None,
///     monthly_salary: Decimal::from(30000),
///     status: EmploymentStatus::Active,
/// };
/// let aggregate = MonthlyAggregate {
///     employee_id: "emp_001".to_string(),
///     month: YearMonth::new(2024, 6).unwrap(),
///     counts: StatusCounts { present: 22, lop: 2, absent: 1, rest_day: 5, ..Default::default() },
///     weeks: vec![],
///     days: vec![],
/// };
///
/// let result = calculate_payroll(&employee, &aggregate, &PayrollSettings::default()).unwrap();
/// assert_eq!(result.line.per_day_rate, Decimal::from(1000));
/// assert_eq!(result.line.lop_deduction, Decimal::from(3000));
/// assert_eq!(result.line.net_salary, Decimal::from(27000));
/// ```
pub fn calculate_payroll(
    employee: &Employee,
    aggregate: &MonthlyAggregate,
    settings: &PayrollSettings,
) -> EngineResult<PayrollCalculation> {
    let salary = employee.monthly_salary;
    if salary <= Decimal::ZERO {
        return Err(EngineError::InvalidCompensation {
            employee_id: employee.id.clone(),
            salary,
        });
    }

    let divisor = settings.per_day_divisor;
    let per_day_rate = salary
        .checked_div(divisor)
        .filter(|_| divisor > Decimal::ZERO)
        .map(|rate| settings.round(rate))
        .ok_or_else(|| EngineError::ConfigParseError {
            path: "payroll.per_day_divisor".to_string(),
            message: format!("divisor must be positive, got {}", divisor),
        })?;

    let counts = aggregate.counts;
    let deductible_days = Decimal::from(counts.deductible_days());
    let uncapped = per_day_rate
        .checked_mul(deductible_days)
        .map(|deduction| settings.round(deduction))
        .ok_or_else(|| EngineError::InvalidCompensation {
            employee_id: employee.id.clone(),
            salary,
        })?;
    let lop_deduction = uncapped.min(settings.round(salary));
    let net_salary = settings.round(salary - lop_deduction);

    let audit_steps = vec![
        AuditStep {
            step_number: 1,
            rule_id: "per_day_rate".to_string(),
            rule_name: "Per-Day Rate".to_string(),
            input: serde_json::json!({
                "monthly_salary": salary.to_string(),
                "divisor": divisor.to_string()
            }),
            output: serde_json::json!({
                "per_day_rate": per_day_rate.to_string()
            }),
            reasoning: format!("{} / {} = {}", salary, divisor, per_day_rate),
        },
        AuditStep {
            step_number: 2,
            rule_id: "lop_deduction".to_string(),
            rule_name: "Loss-of-Pay Deduction".to_string(),
            input: serde_json::json!({
                "per_day_rate": per_day_rate.to_string(),
                "lop_days": counts.lop,
                "absent_days": counts.absent
            }),
            output: serde_json::json!({
                "lop_deduction": lop_deduction.to_string(),
                "capped": lop_deduction < uncapped
            }),
            reasoning: if lop_deduction < uncapped {
                format!(
                    "{} x ({} + {}) = {}, capped at salary {}",
                    per_day_rate, counts.lop, counts.absent, uncapped, lop_deduction
                )
            } else {
                format!(
                    "{} x ({} + {}) = {}",
                    per_day_rate, counts.lop, counts.absent, lop_deduction
                )
            },
        },
        AuditStep {
            step_number: 3,
            rule_id: "net_salary".to_string(),
            rule_name: "Net Salary".to_string(),
            input: serde_json::json!({
                "monthly_salary": salary.to_string(),
                "lop_deduction": lop_deduction.to_string()
            }),
            output: serde_json::json!({
                "net_salary": net_salary.to_string()
            }),
            reasoning: format!("{} - {} = {}", salary, lop_deduction, net_salary),
        },
    ];

    let line = PayrollLine {
        employee_id: employee.id.clone(),
        emp_name: employee.name.clone(),
        department: employee.department.clone(),
        team: employee.team.clone(),
        shift_type: employee.shift_type.clone(),
        month: aggregate.month,
        monthly_salary: salary,
        working_days: counts.working_days(),
        present_days: counts.present,
        lop_days: counts.lop,
        leave_days: counts.leave,
        absent_days: counts.absent,
        not_available_days: counts.not_available,
        per_day_rate,
        lop_deduction,
        net_salary,
    };

    Ok(PayrollCalculation { line, audit_steps })
}
