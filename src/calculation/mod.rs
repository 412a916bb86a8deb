//! Calculation logic for the attendance and payroll engine.
//!
//! The pipeline runs leaf-first for each employee:
//!
//! 1. [`generate_calendar`] lays out the month with its rest days.
//! 2. [`classify_day`] resolves each day's punch and leave records into one
//!    [`DayStatus`](crate::models::DayStatus).
//! 3. [`aggregate_month`] folds the statuses into monthly and weekly counts.
//! 4. [`calculate_payroll`] turns the counts into a loss-of-pay payroll line.
//!
//! [`PayrollBatch`] runs the pipeline across a roster.

mod aggregator;
mod batch;
mod calendar;
mod classifier;
mod payroll;

pub use aggregator::{aggregate_days, aggregate_month, bucket_weeks};
pub use batch::{
    BatchCancellation, BatchInput, EmployeeRecords, INTERNAL_ERROR_CODE, InMemorySource,
    PayrollBatch, RecordSource, compute_employee,
};
pub use calendar::{CalendarDay, MonthCalendar, RestDays, generate_calendar};
pub use classifier::{ClassifierOptions, DayRecords, LopReason, classify_day, lop_reason};
pub use payroll::{PayrollCalculation, PayrollSettings, RoundingMode, calculate_payroll};
