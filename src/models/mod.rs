//! Core data models for the attendance and payroll engine.
//!
//! This module contains the input records (employees, shift rules, punches,
//! leave requests) and the derived projections (day statuses, aggregates,
//! payroll lines and reports).

mod aggregate;
mod attendance;
mod day_status;
mod employee;
mod leave;
mod period;
mod report;
mod shift_rule;

pub(crate) use period::{external_date, external_date_option};

pub use aggregate::{MonthlyAggregate, StatusCounts, WeekBucket};
pub use attendance::{AttendancePunch, PunchStatus, parse_worked_duration};
pub use day_status::{AttendanceCode, DayStatus, DayStatusTag};
pub use employee::{Employee, EmploymentStatus};
pub use leave::{ApprovalStatus, LeaveRequest, LeaveType};
pub use period::{EXTERNAL_DATE_FORMAT, YearMonth, format_external_date, parse_external_date};
pub use report::{
    AttendanceGridRow, AuditStep, BatchTotals, EmployeeEntry, EmployeeOutcome, PayrollLine,
    PayrollReport,
};
pub use shift_rule::{
    GracePolicy, ShiftRule, clock_offset_minutes, parse_clock_time, span_minutes,
};
