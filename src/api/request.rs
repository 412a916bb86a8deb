//! Request types for the payroll API.
//!
//! Request bodies carry the raw records as the time-tracking and HR systems
//! write them: `dd-mm-yyyy` dates, `hh:mm AM/PM` times and free-form status
//! labels. They are converted into domain types before anything else runs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::BatchInput;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    ApprovalStatus, AttendancePunch, Employee, EmploymentStatus, LeaveRequest, LeaveType,
    PunchStatus, ShiftRule, YearMonth, parse_clock_time, parse_external_date,
    parse_worked_duration,
};

/// Request body for the payroll and attendance endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRequest {
    /// The month to compute, as `YYYY-MM`.
    pub month: String,
    /// The employee roster.
    pub employees: Vec<EmployeeRecord>,
    /// Attendance punches.
    #[serde(default)]
    pub punches: Vec<PunchRecord>,
    /// Leave requests.
    #[serde(default)]
    pub leaves: Vec<LeaveRecord>,
}

/// An employee as exported by the HR module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Unique identifier for the employee.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Department name.
    #[serde(default)]
    pub department: String,
    /// Team name.
    #[serde(default)]
    pub team: String,
    /// Shift type (e.g. "General", "Night", "Custom").
    pub shift_type: String,
    /// Login time for a custom shift.
    #[serde(default)]
    pub custom_login: Option<String>,
    /// Logout time for a custom shift.
    #[serde(default)]
    pub custom_logout: Option<String>,
    /// Gross monthly salary.
    pub monthly_salary: Decimal,
    /// Employment status label; active when omitted.
    #[serde(default)]
    pub status: Option<String>,
}

/// A worked duration as either text or a number of hours.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HoursField {
    /// `H:MM`, `8.5` or `8h 30m`.
    Text(String),
    /// Decimal hours.
    Hours(Decimal),
}

/// An attendance punch as recorded by the time-tracking source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PunchRecord {
    /// The employee.
    pub employee_id: String,
    /// Date as `dd-mm-yyyy`.
    pub date: String,
    /// Check-in time.
    #[serde(default)]
    pub check_in: Option<String>,
    /// Check-out time.
    #[serde(default)]
    pub check_out: Option<String>,
    /// Worked duration, when the source provides it.
    #[serde(default)]
    pub total_hours: Option<HoursField>,
    /// Raw status label.
    #[serde(default)]
    pub status: String,
    /// Explicit loss-of-pay flag.
    #[serde(default)]
    pub is_lop: bool,
}

/// A leave request as exported by the leave workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRecord {
    /// The employee.
    pub employee_id: String,
    /// First day as `dd-mm-yyyy`.
    pub start_date: String,
    /// Last day (inclusive) as `dd-mm-yyyy`.
    pub end_date: String,
    /// Leave type label.
    pub leave_type: String,
    /// Approval status label.
    pub status: String,
    /// Free-text reason.
    #[serde(default)]
    pub reason: Option<String>,
}

impl PayrollRequest {
    /// Converts the request into a validated month and batch input.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPeriod`, `InvalidDate`, `InvalidTime` or
    /// `InvalidDuration` for the first malformed field.
    pub fn into_batch_input(self) -> EngineResult<(YearMonth, BatchInput)> {
        let month: YearMonth = self.month.parse()?;
        let input = BatchInput {
            employees: self
                .employees
                .into_iter()
                .map(Employee::try_from)
                .collect::<EngineResult<_>>()?,
            punches: self
                .punches
                .into_iter()
                .map(AttendancePunch::try_from)
                .collect::<EngineResult<_>>()?,
            leaves: self
                .leaves
                .into_iter()
                .map(LeaveRequest::try_from)
                .collect::<EngineResult<_>>()?,
        };
        Ok((month, input))
    }
}

impl TryFrom<EmployeeRecord> for Employee {
    type Error = EngineError;

    fn try_from(req: EmployeeRecord) -> EngineResult<Self> {
        let shift_override = match (&req.custom_login, &req.custom_logout) {
            (Some(login), Some(logout)) => Some(ShiftRule::from_span(
                parse_clock_time(login)?,
                parse_clock_time(logout)?,
            )),
            _ => None,
        };
        Ok(Employee {
            id: req.id,
            name: req.name,
            department: req.department,
            team: req.team,
            shift_type: req.shift_type,
            shift_override,
            monthly_salary: req.monthly_salary,
            status: req
                .status
                .as_deref()
                .map(EmploymentStatus::from_label)
                .unwrap_or_default(),
        })
    }
}

impl TryFrom<PunchRecord> for AttendancePunch {
    type Error = EngineError;

    fn try_from(req: PunchRecord) -> EngineResult<Self> {
        let time = |value: &Option<String>| -> EngineResult<_> {
            match value.as_deref().map(str::trim) {
                None | Some("") => Ok(None),
                Some(text) => parse_clock_time(text).map(Some),
            }
        };
        let total_worked_minutes = match &req.total_hours {
            None => None,
            Some(HoursField::Text(text)) if text.trim().is_empty() => None,
            Some(HoursField::Text(text)) => Some(parse_worked_duration(text)?),
            Some(HoursField::Hours(hours)) => Some(parse_worked_duration(&hours.to_string())?),
        };
        Ok(AttendancePunch {
            date: parse_external_date(&req.date)?,
            check_in: time(&req.check_in)?,
            check_out: time(&req.check_out)?,
            total_worked_minutes,
            status: PunchStatus::from_label(&req.status),
            is_lop: req.is_lop,
            employee_id: req.employee_id,
        })
    }
}

impl TryFrom<LeaveRecord> for LeaveRequest {
    type Error = EngineError;

    fn try_from(req: LeaveRecord) -> EngineResult<Self> {
        Ok(LeaveRequest {
            start_date: parse_external_date(&req.start_date)?,
            end_date: parse_external_date(&req.end_date)?,
            leave_type: LeaveType::from_label(&req.leave_type),
            status: ApprovalStatus::from_label(&req.status),
            reason: req.reason,
            employee_id: req.employee_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn test_deserialize_payroll_request() {
        let json = r#"{
            "month": "2024-06",
            "employees": [
                {
                    "id": "emp_001",
                    "name": "Asha Rao",
                    "department": "Operations",
                    "team": "Alpha",
                    "shift_type": "General",
                    "monthly_salary": "30000"
                }
            ],
            "punches": [
                {
                    "employee_id": "emp_001",
                    "date": "03-06-2024",
                    "check_in": "10:00 AM",
                    "check_out": "09:00 PM",
                    "total_hours": "11:00",
                    "status": "Completed"
                }
            ],
            "leaves": [
                {
                    "employee_id": "emp_001",
                    "start_date": "04-06-2024",
                    "end_date": "05-06-2024",
                    "leave_type": "Sick Leave",
                    "status": "approved"
                }
            ]
        }"#;

        let request: PayrollRequest = serde_json::from_str(json).unwrap();
        let (month, input) = request.into_batch_input().unwrap();
        assert_eq!(month, YearMonth::new(2024, 6).unwrap());
        assert_eq!(input.employees[0].status, EmploymentStatus::Active);

        let punch = &input.punches[0];
        assert_eq!(punch.date, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        assert_eq!(punch.check_out, NaiveTime::from_hms_opt(21, 0, 0));
        assert_eq!(punch.total_worked_minutes, Some(660));
        assert_eq!(punch.status, PunchStatus::Completed);

        assert_eq!(input.leaves[0].leave_type, LeaveType::Sick);
        assert!(input.leaves[0].is_approved());
    }

    #[test]
    fn test_numeric_total_hours() {
        let json = r#"{"employee_id": "e1", "date": "03-06-2024", "total_hours": 7.5, "status": "Completed"}"#;
        let record: PunchRecord = serde_json::from_str(json).unwrap();
        let punch = AttendancePunch::try_from(record).unwrap();
        assert_eq!(punch.total_worked_minutes, Some(450));
        assert!(punch.check_in.is_none());
    }

    #[test]
    fn test_iso_date_rejected() {
        let record = PunchRecord {
            employee_id: "e1".to_string(),
            date: "2024-06-03".to_string(),
            check_in: None,
            check_out: None,
            total_hours: None,
            status: "Completed".to_string(),
            is_lop: false,
        };
        let err = AttendancePunch::try_from(record).unwrap_err();
        assert_eq!(err.code(), "INVALID_DATE");
    }

    #[test]
    fn test_bad_month_rejected() {
        let request = PayrollRequest {
            month: "2024-13".to_string(),
            employees: vec![],
            punches: vec![],
            leaves: vec![],
        };
        assert_eq!(
            request.into_batch_input().unwrap_err().code(),
            "INVALID_PERIOD"
        );
    }

    #[test]
    fn test_custom_shift_times_become_override() {
        let record = EmployeeRecord {
            id: "e1".to_string(),
            name: "Asha".to_string(),
            department: String::new(),
            team: String::new(),
            shift_type: "Custom".to_string(),
            custom_login: Some("09:30 AM".to_string()),
            custom_logout: Some("06:30 PM".to_string()),
            monthly_salary: Decimal::from(30000),
            status: Some("Inactive".to_string()),
        };
        let employee = Employee::try_from(record).unwrap();
        let rule = employee.shift_override.unwrap();
        assert_eq!(rule.required_minimum_minutes, 540);
        assert_eq!(employee.status, EmploymentStatus::Inactive);
    }

    #[test]
    fn test_blank_times_are_missing() {
        let record = PunchRecord {
            employee_id: "e1".to_string(),
            date: "03-06-2024".to_string(),
            check_in: Some(" ".to_string()),
            check_out: None,
            total_hours: Some(HoursField::Text(String::new())),
            status: "Not Logged".to_string(),
            is_lop: false,
        };
        let punch = AttendancePunch::try_from(record).unwrap();
        assert!(punch.is_placeholder());
    }
}
