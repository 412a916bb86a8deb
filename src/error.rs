//! Error types for the attendance and payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every error condition the reconciliation pipeline can raise.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for the attendance and payroll engine.
///
/// Errors split into two scopes. [`EngineError::InvalidPeriod`] is request-level
/// and aborts a whole batch. Classification and compensation errors are
/// per-employee and are recorded against that employee only.
///
/// # Example
///
/// ```
/// use attendance_payroll::error::EngineError;
///
/// let error = EngineError::InvalidPeriod { year: 2024, month: 13 };
/// assert_eq!(error.to_string(), "Invalid period: 2024-13");
/// assert_eq!(error.code(), "INVALID_PERIOD");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The requested year/month does not name a real calendar month.
    #[error("Invalid period: {year}-{month:02}")]
    InvalidPeriod {
        /// The requested year.
        year: i32,
        /// The requested month (1-12 when valid).
        month: u32,
    },

    /// More than one attendance punch exists for the same employee and date.
    #[error("Duplicate punch for employee '{employee_id}' on {date}: {count} records")]
    DuplicatePunch {
        /// The employee with conflicting punches.
        employee_id: String,
        /// The date with conflicting punches.
        date: NaiveDate,
        /// How many punches were found.
        count: usize,
    },

    /// More than one approved leave request covers the same day.
    #[error("Overlapping approved leave for employee '{employee_id}' on {date}: {count} requests")]
    OverlappingLeave {
        /// The employee with overlapping approvals.
        employee_id: String,
        /// The day covered more than once.
        date: NaiveDate,
        /// How many approved requests cover the day.
        count: usize,
    },

    /// The same employee ID appears more than once on the active roster.
    #[error("Employee '{employee_id}' appears {count} times on the roster")]
    DuplicateEmployee {
        /// The repeated employee ID.
        employee_id: String,
        /// How many active roster entries carry the ID.
        count: usize,
    },

    /// The employee's monthly salary is zero or negative.
    #[error("Invalid compensation for employee '{employee_id}': monthly salary {salary}")]
    InvalidCompensation {
        /// The employee with the invalid salary.
        employee_id: String,
        /// The rejected salary.
        salary: Decimal,
    },

    /// No shift rule could be resolved for the employee.
    #[error("No shift rule for employee '{employee_id}' (shift type '{shift_type}')")]
    MissingShiftRule {
        /// The employee without a resolvable shift.
        employee_id: String,
        /// The shift type recorded on the employee.
        shift_type: String,
    },

    /// A date string at the boundary was not `dd-mm-yyyy`.
    #[error("Invalid date '{value}': expected dd-mm-yyyy")]
    InvalidDate {
        /// The rejected input.
        value: String,
    },

    /// A time-of-day string at the boundary could not be parsed.
    #[error("Invalid time '{value}'")]
    InvalidTime {
        /// The rejected input.
        value: String,
    },

    /// A worked-duration string at the boundary could not be parsed.
    #[error("Invalid duration '{value}'")]
    InvalidDuration {
        /// The rejected input.
        value: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl EngineError {
    /// Returns a stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::InvalidPeriod { .. } => "INVALID_PERIOD",
            EngineError::DuplicatePunch { .. } => "DUPLICATE_PUNCH",
            EngineError::OverlappingLeave { .. } => "OVERLAPPING_LEAVE",
            EngineError::DuplicateEmployee { .. } => "DUPLICATE_EMPLOYEE",
            EngineError::InvalidCompensation { .. } => "INVALID_COMPENSATION",
            EngineError::MissingShiftRule { .. } => "MISSING_SHIFT_RULE",
            EngineError::InvalidDate { .. } => "INVALID_DATE",
            EngineError::InvalidTime { .. } => "INVALID_TIME",
            EngineError::InvalidDuration { .. } => "INVALID_DURATION",
            EngineError::ConfigNotFound { .. } => "CONFIG_NOT_FOUND",
            EngineError::ConfigParseError { .. } => "CONFIG_PARSE_ERROR",
        }
    }

    /// Returns true if the error belongs to a single employee's pipeline
    /// and must not abort a batch.
    pub fn is_per_employee(&self) -> bool {
        matches!(
            self,
            EngineError::DuplicatePunch { .. }
                | EngineError::OverlappingLeave { .. }
                | EngineError::DuplicateEmployee { .. }
                | EngineError::InvalidCompensation { .. }
                | EngineError::MissingShiftRule { .. }
        )
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_period_displays_year_and_month() {
        let error = EngineError::InvalidPeriod {
            year: 2024,
            month: 0,
        };
        assert_eq!(error.to_string(), "Invalid period: 2024-00");
    }

    #[test]
    fn test_duplicate_punch_displays_employee_and_date() {
        let error = EngineError::DuplicatePunch {
            employee_id: "emp_001".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            count: 2,
        };
        assert_eq!(
            error.to_string(),
            "Duplicate punch for employee 'emp_001' on 2024-06-03: 2 records"
        );
    }

    #[test]
    fn test_overlapping_leave_displays_employee_and_date() {
        let error = EngineError::OverlappingLeave {
            employee_id: "emp_002".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            count: 2,
        };
        assert_eq!(
            error.to_string(),
            "Overlapping approved leave for employee 'emp_002' on 2024-06-15: 2 requests"
        );
    }

    #[test]
    fn test_duplicate_employee_is_per_employee() {
        let error = EngineError::DuplicateEmployee {
            employee_id: "emp_001".to_string(),
            count: 2,
        };
        assert_eq!(
            error.to_string(),
            "Employee 'emp_001' appears 2 times on the roster"
        );
        assert_eq!(error.code(), "DUPLICATE_EMPLOYEE");
        assert!(error.is_per_employee());
    }

    #[test]
    fn test_invalid_compensation_displays_salary() {
        let error = EngineError::InvalidCompensation {
            employee_id: "emp_003".to_string(),
            salary: Decimal::new(-100, 0),
        };
        assert_eq!(
            error.to_string(),
            "Invalid compensation for employee 'emp_003': monthly salary -100"
        );
    }

    #[test]
    fn test_missing_shift_rule_displays_shift_type() {
        let error = EngineError::MissingShiftRule {
            employee_id: "emp_004".to_string(),
            shift_type: "Custom".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "No shift rule for employee 'emp_004' (shift type 'Custom')"
        );
    }

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/policy.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/policy.yaml"
        );
    }

    #[test]
    fn test_codes_are_stable() {
        let error = EngineError::InvalidDate {
            value: "2024-06-01".to_string(),
        };
        assert_eq!(error.code(), "INVALID_DATE");
        assert_eq!(
            error.to_string(),
            "Invalid date '2024-06-01': expected dd-mm-yyyy"
        );
    }

    #[test]
    fn test_per_employee_scope() {
        assert!(
            EngineError::MissingShiftRule {
                employee_id: "e".to_string(),
                shift_type: "x".to_string(),
            }
            .is_per_employee()
        );
        assert!(!EngineError::InvalidPeriod { year: 2024, month: 13 }.is_per_employee());
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_invalid_period() -> EngineResult<()> {
            Err(EngineError::InvalidPeriod {
                year: 2024,
                month: 13,
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_invalid_period()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
