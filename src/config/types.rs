//! Configuration types for attendance policy.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the policy YAML files.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::calculation::{PayrollSettings, RestDays};
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, GracePolicy, ShiftRule};

/// The shift type whose times come from the employee record.
///
/// It is listed in the catalog without times, but never resolves from it.
pub const CUSTOM_SHIFT: &str = "Custom";

/// Policy configuration file structure (`policy.yaml`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyFile {
    /// Designated rest days.
    #[serde(default)]
    pub rest_days: RestDays,
    /// Payroll arithmetic.
    #[serde(default)]
    pub payroll: PayrollSettings,
    /// First date with attendance data, as `dd-mm-yyyy`.
    #[serde(default, with = "crate::models::external_date_option")]
    pub data_available_from: Option<NaiveDate>,
}

/// Shift catalog file structure (`shifts.yaml`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftCatalog {
    /// Map of shift type to its rule.
    pub shifts: BTreeMap<String, ShiftRule>,
}

impl ShiftCatalog {
    /// Looks up a shift type, falling back to a case-insensitive match.
    pub fn get(&self, shift_type: &str) -> Option<&ShiftRule> {
        let wanted = shift_type.trim();
        self.shifts.get(wanted).or_else(|| {
            self.shifts
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(wanted))
                .map(|(_, rule)| rule)
        })
    }

    /// The shift type names in the catalog.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.shifts.keys().map(String::as_str)
    }
}

impl Default for ShiftCatalog {
    fn default() -> Self {
        let fixed = |name: &str, login: (u32, u32), logout: (u32, u32)| {
            let login = NaiveTime::from_hms_opt(login.0, login.1, 0);
            let logout = NaiveTime::from_hms_opt(logout.0, logout.1, 0);
            let rule = match (login, logout) {
                (Some(login), Some(logout)) => ShiftRule::from_span(login, logout),
                _ => flexible(0),
            };
            (name.to_string(), rule)
        };

        let shifts = [
            fixed("General", (10, 0), (21, 0)),
            fixed("Morning", (6, 0), (14, 0)),
            fixed("Evening", (14, 0), (22, 0)),
            fixed("Night", (22, 0), (6, 0)),
            ("Flexible".to_string(), flexible(8 * 60)),
            (CUSTOM_SHIFT.to_string(), flexible(0)),
        ];
        Self {
            shifts: shifts.into_iter().collect(),
        }
    }
}

fn flexible(required_minimum_minutes: u32) -> ShiftRule {
    ShiftRule {
        expected_login: None,
        expected_logout: None,
        required_minimum_minutes,
        grace: GracePolicy::STRICT,
    }
}

/// The complete policy a payroll run is computed under.
///
/// `Default` reproduces the built-in policy: Sunday rest days, a fixed
/// 30-day divisor with banker's rounding to 2 places, and the standard
/// shift catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyConfig {
    /// Designated rest days.
    pub rest_days: RestDays,
    /// Payroll arithmetic.
    pub payroll: PayrollSettings,
    /// First date with attendance data, if known.
    pub data_available_from: Option<NaiveDate>,
    /// Shift rules by shift type.
    pub shifts: ShiftCatalog,
}

impl PolicyConfig {
    /// Combines the parsed policy and shift files.
    pub fn new(policy: PolicyFile, shifts: ShiftCatalog) -> Self {
        Self {
            rest_days: policy.rest_days,
            payroll: policy.payroll,
            data_available_from: policy.data_available_from,
            shifts,
        }
    }

    /// Resolves the shift rule an employee is measured against.
    ///
    /// A per-employee override wins; otherwise the catalog entry for the
    /// employee's shift type is used.
    ///
    /// # Errors
    ///
    /// Returns `MissingShiftRule` for a `Custom` shift without an override,
    /// or for a shift type the catalog does not know.
    ///
    /// # Example
    ///
    /// ```
    /// use attendance_payroll::config::PolicyConfig;
    /// use attendance_payroll::models::{Employee, EmploymentStatus};
    /// use rust_decimal::Decimal;
    ///
    /// let mut employee = Employee {
    ///     id: "emp_001".to_string(),
    ///     name: "Asha Rao".to_string(),
    ///     department: "Operations".to_string(),
    ///     team: "Alpha".to_string(),
    ///     shift_type: "night".to_string(),
    ///     shift_override: None,
    ///     monthly_salary: Decimal::from(30000),
    ///     status: EmploymentStatus::Active,
    /// };
    ///
    /// let policy = PolicyConfig::default();
    /// let rule = policy.resolve_shift(&employee).unwrap();
    /// assert!(rule.is_overnight());
    ///
    /// employee.shift_type = "Custom".to_string();
    /// assert!(policy.resolve_shift(&employee).is_err());
    /// ```
    pub fn resolve_shift(&self, employee: &Employee) -> EngineResult<ShiftRule> {
        if let Some(rule) = &employee.shift_override {
            return Ok(rule.clone());
        }

        let missing = || EngineError::MissingShiftRule {
            employee_id: employee.id.clone(),
            shift_type: employee.shift_type.clone(),
        };
        if employee.shift_type.trim().eq_ignore_ascii_case(CUSTOM_SHIFT) {
            return Err(missing());
        }
        self.shifts.get(&employee.shift_type).cloned().ok_or_else(missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::RoundingMode;
    use crate::models::EmploymentStatus;
    use chrono::Weekday;
    use rust_decimal::Decimal;

    fn employee(shift_type: &str) -> Employee {
        Employee {
            id: "emp_001".to_string(),
            name: "Asha Rao".to_string(),
            department: "Operations".to_string(),
            team: "Alpha".to_string(),
            shift_type: shift_type.to_string(),
            shift_override: None,
            monthly_salary: Decimal::from(30000),
            status: EmploymentStatus::Active,
        }
    }

    #[test]
    fn test_default_catalog() {
        let catalog = ShiftCatalog::default();
        let names: Vec<_> = catalog.names().collect();
        assert_eq!(names, ["Custom", "Evening", "Flexible", "General", "Morning", "Night"]);
        assert_eq!(catalog.get("General").unwrap().required_minimum_minutes, 660);
        assert_eq!(catalog.get("Night").unwrap().required_minimum_minutes, 480);
        assert!(catalog.get("Flexible").unwrap().expected_login.is_none());
    }

    #[test]
    fn test_catalog_lookup_ignores_case() {
        let catalog = ShiftCatalog::default();
        assert!(catalog.get("MORNING").is_some());
        assert!(catalog.get(" evening ").is_some());
        assert!(catalog.get("Graveyard").is_none());
    }

    #[test]
    fn test_override_wins() {
        let mut emp = employee("Custom");
        let rule = ShiftRule::from_span(
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        );
        emp.shift_override = Some(rule.clone());
        assert_eq!(PolicyConfig::default().resolve_shift(&emp).unwrap(), rule);
    }

    #[test]
    fn test_listed_custom_shift_still_needs_override() {
        let policy = PolicyConfig::default();
        assert!(policy.shifts.get(CUSTOM_SHIFT).unwrap().expected_login.is_none());
        assert_eq!(
            policy.resolve_shift(&employee("custom")).unwrap_err().code(),
            "MISSING_SHIFT_RULE"
        );
    }

    #[test]
    fn test_unknown_shift_is_missing() {
        let err = PolicyConfig::default()
            .resolve_shift(&employee("Graveyard"))
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::MissingShiftRule {
                employee_id: "emp_001".to_string(),
                shift_type: "Graveyard".to_string(),
            }
        );
    }

    #[test]
    fn test_policy_file_parses() {
        let yaml = r#"
rest_days: [saturday, sunday]
payroll:
  per_day_divisor: 26
  rounding: truncate
data_available_from: "10-06-2024"
"#;
        let policy: PolicyFile = serde_yaml::from_str(yaml).unwrap();
        assert!(policy.rest_days.contains(Weekday::Sat));
        assert_eq!(policy.payroll.per_day_divisor, Decimal::from(26));
        assert_eq!(policy.payroll.decimal_places, 2);
        assert_eq!(policy.payroll.rounding, RoundingMode::Truncate);
        assert_eq!(policy.data_available_from, NaiveDate::from_ymd_opt(2024, 6, 10));
    }

    #[test]
    fn test_empty_policy_file_uses_defaults() {
        let policy: PolicyFile = serde_yaml::from_str("{}").unwrap();
        assert_eq!(policy, PolicyFile::default());
        assert!(policy.data_available_from.is_none());
    }

    #[test]
    fn test_bad_available_date_rejected() {
        assert!(serde_yaml::from_str::<PolicyFile>("data_available_from: \"2024-06-10\"").is_err());
    }
}
