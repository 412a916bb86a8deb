//! Response types for the payroll API.
//!
//! This module defines the summary and grid response bodies, the error
//! response structures, and the mapping from engine errors to HTTP statuses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{
    AttendanceCode, BatchTotals, EmployeeOutcome, PayrollLine, PayrollReport, YearMonth,
    format_external_date,
};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates a not-found error response.
    pub fn not_found(what: &str, id: &str) -> Self {
        Self::new("NOT_FOUND", format!("{} not found: {}", what, id))
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Pairs an error body with a status.
    pub fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let code = error.code();
        match error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                ApiErrorResponse::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::with_details("CONFIG_ERROR", "Configuration error", error.to_string()),
                )
            }
            EngineError::InvalidPeriod { .. }
            | EngineError::InvalidDate { .. }
            | EngineError::InvalidTime { .. }
            | EngineError::InvalidDuration { .. } => ApiErrorResponse::new(
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    code,
                    error.to_string(),
                    "The request contains a value that could not be parsed",
                ),
            ),
            EngineError::DuplicatePunch { .. }
            | EngineError::OverlappingLeave { .. }
            | EngineError::DuplicateEmployee { .. }
            | EngineError::InvalidCompensation { .. }
            | EngineError::MissingShiftRule { .. } => ApiErrorResponse::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new(code, error.to_string()),
            ),
        }
    }
}

/// An employee whose line could not be computed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedEmployee {
    /// Employee identifier.
    pub employee_id: String,
    /// Employee display name.
    pub emp_name: String,
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Response body for `POST /payroll/summary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollSummary {
    /// The month computed.
    pub month: YearMonth,
    /// Computed lines, in roster order.
    pub lines: Vec<PayrollLine>,
    /// Employees whose line could not be computed.
    pub failures: Vec<FailedEmployee>,
    /// Batch totals.
    pub totals: BatchTotals,
    /// True if the batch was cancelled early.
    pub cancelled: bool,
    /// Inactive employees left out of the run.
    pub skipped_inactive: usize,
}

impl From<&PayrollReport> for PayrollSummary {
    fn from(report: &PayrollReport) -> Self {
        let failures = report
            .entries
            .iter()
            .filter_map(|entry| match &entry.outcome {
                EmployeeOutcome::Failed { code, message } => Some(FailedEmployee {
                    employee_id: entry.employee_id.clone(),
                    emp_name: entry.emp_name.clone(),
                    code: code.clone(),
                    message: message.clone(),
                }),
                EmployeeOutcome::Computed { .. } => None,
            })
            .collect();
        Self {
            month: report.month,
            lines: report.lines().cloned().collect(),
            failures,
            totals: report.totals.clone(),
            cancelled: report.cancelled,
            skipped_inactive: report.skipped_inactive,
        }
    }
}

/// One employee's row in the attendance grid response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridRow {
    /// Employee identifier.
    pub employee_id: String,
    /// Employee display name.
    pub emp_name: String,
    /// One code per entry of [`AttendanceGrid::days`].
    pub codes: Vec<AttendanceCode>,
    /// Failure code when the row could not be computed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response body for `POST /attendance/grid`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceGrid {
    /// The month shown.
    pub month: YearMonth,
    /// Column dates as `dd-mm-yyyy`.
    pub days: Vec<String>,
    /// One row per employee.
    pub rows: Vec<GridRow>,
}

impl From<&PayrollReport> for AttendanceGrid {
    fn from(report: &PayrollReport) -> Self {
        let days = report
            .month
            .first_day()
            .iter_days()
            .take(report.month.days_in_month() as usize)
            .map(format_external_date)
            .collect();
        let rows = report
            .attendance_grid()
            .into_iter()
            .map(|row| GridRow {
                employee_id: row.employee_id,
                emp_name: row.emp_name,
                codes: row.codes,
                error: row.error,
            })
            .collect();
        Self {
            month: report.month,
            days,
            rows,
        }
    }
}

/// A shift catalog entry in `GET /config/shifts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftEntry {
    /// Shift type name.
    pub shift_type: String,
    /// The rule for the shift.
    #[serde(flatten)]
    pub rule: crate::models::ShiftRule,
    /// Whether the shift crosses midnight.
    pub overnight: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_invalid_period_is_bad_request() {
        let api_error: ApiErrorResponse = EngineError::InvalidPeriod {
            year: 2024,
            month: 13,
        }
        .into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "INVALID_PERIOD");
    }

    #[test]
    fn test_config_error_is_internal() {
        let api_error: ApiErrorResponse = EngineError::ConfigNotFound {
            path: "policy.yaml".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.error.code, "CONFIG_ERROR");
    }

    #[test]
    fn test_per_employee_error_is_unprocessable() {
        let api_error: ApiErrorResponse = EngineError::MissingShiftRule {
            employee_id: "e1".to_string(),
            shift_type: "Custom".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(api_error.error.code, "MISSING_SHIFT_RULE");
    }
}
