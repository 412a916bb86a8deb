//! HTTP API module for the attendance and payroll engine.
//!
//! This module provides the REST endpoints that compute monthly payroll,
//! the per-day attendance grid and their CSV exports from submitted
//! roster, punch and leave records.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{EmployeeRecord, HoursField, LeaveRecord, PayrollRequest, PunchRecord};
pub use response::{
    ApiError, ApiErrorResponse, AttendanceGrid, FailedEmployee, GridRow, PayrollSummary,
    ShiftEntry,
};
pub use state::AppState;
