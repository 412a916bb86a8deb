//! Daily status classification.
//!
//! Resolves one employee's punch and leave records for one calendar day into
//! exactly one [`DayStatus`]. Rules are applied in a fixed order and the first
//! match wins:
//!
//! 1. Rest day
//! 2. Loss of pay (late login, early exit, short hours, explicit flag)
//! 3. Present
//! 4. Approved leave
//! 5. Absent
//!
//! Lateness and early exit are strict: one minute past the expected login is
//! a loss-of-pay day under the default zero-grace policy.

use std::fmt;

use chrono::NaiveDate;

use crate::error::{EngineError, EngineResult};
use crate::models::{AttendancePunch, DayStatus, DayStatusTag, LeaveRequest, PunchStatus, ShiftRule};

use super::calendar::CalendarDay;

/// Why a day was classified as loss of pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LopReason {
    /// Check-in after the expected login.
    LateLogin {
        /// Minutes late.
        minutes: u32,
    },
    /// Check-out before the expected logout.
    EarlyOut {
        /// Minutes early.
        minutes: u32,
    },
    /// Worked less than the required minimum.
    ShortHours {
        /// Minutes worked.
        worked: u32,
        /// Minutes required.
        required: u32,
    },
    /// The source flagged the day as loss of pay.
    Marked,
    /// The source recorded a late login without usable times.
    LateLoginRecorded,
    /// The source recorded an early exit without usable times.
    EarlyOutRecorded,
}

impl fmt::Display for LopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LopReason::LateLogin { minutes } => write!(f, "late login by {}", format_minutes(*minutes)),
            LopReason::EarlyOut { minutes } => write!(f, "early out by {}", format_minutes(*minutes)),
            LopReason::ShortHours { worked, required } => write!(
                f,
                "worked {} of {}",
                format_minutes(*worked),
                format_minutes(*required)
            ),
            LopReason::Marked => write!(f, "marked loss of pay"),
            LopReason::LateLoginRecorded => write!(f, "late login recorded"),
            LopReason::EarlyOutRecorded => write!(f, "early out recorded"),
        }
    }
}

fn format_minutes(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

/// The records an employee has that may bear on one day.
///
/// Candidates are passed unfiltered; the classifier itself rejects conflicting
/// records instead of picking one.
#[derive(Debug, Clone, Copy, Default)]
pub struct DayRecords<'a> {
    /// Punches dated on the day.
    pub punches: &'a [&'a AttendancePunch],
    /// Leave requests of any status that may cover the day.
    pub leaves: &'a [&'a LeaveRequest],
}

/// Options that vary per run rather than per employee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifierOptions {
    /// First date with attendance data. Earlier unrecorded days are
    /// `NotAvailable` instead of `Absent`.
    pub data_available_from: Option<NaiveDate>,
}

/// Returns the loss-of-pay reason for a punch, if any.
///
/// Checks run in order: check-in, check-out, worked duration, explicit flag.
///
/// # Example
///
/// ```
/// use attendance_payroll::calculation::{LopReason, lop_reason};
/// use attendance_payroll::models::{AttendancePunch, PunchStatus, ShiftRule};
/// use chrono::{NaiveDate, NaiveTime};
///
/// let rule = ShiftRule::from_span(
///     NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
///     NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
/// );
/// let punch = AttendancePunch {
///     employee_id: "emp_001".to_string(),
///     date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
///     check_in: NaiveTime::from_hms_opt(10, 1, 0),
///     check_out: NaiveTime::from_hms_opt(21, 0, 0),
///     total_worked_minutes: None,
///     status: PunchStatus::Completed,
///     is_lop: false,
/// };
/// assert_eq!(lop_reason(&punch, &rule), Some(LopReason::LateLogin { minutes: 1 }));
/// ```
pub fn lop_reason(punch: &AttendancePunch, rule: &ShiftRule) -> Option<LopReason> {
    if let Some(minutes) = punch.check_in.and_then(|t| rule.late_by_minutes(t)) {
        return Some(LopReason::LateLogin { minutes });
    }
    if let Some(minutes) = punch.check_out.and_then(|t| rule.early_by_minutes(t)) {
        return Some(LopReason::EarlyOut { minutes });
    }
    if let Some(worked) = punch.worked_minutes() {
        if worked < rule.required_minimum_minutes {
            return Some(LopReason::ShortHours {
                worked,
                required: rule.required_minimum_minutes,
            });
        }
    }
    if punch.is_lop || punch.status == PunchStatus::LossOfPay {
        return Some(LopReason::Marked);
    }
    match punch.status {
        PunchStatus::LateLogin => Some(LopReason::LateLoginRecorded),
        PunchStatus::EarlyOut => Some(LopReason::EarlyOutRecorded),
        _ => None,
    }
}

/// Classifies one employee's day.
///
/// # Errors
///
/// - `DuplicatePunch` if more than one punch is dated on the day.
/// - `OverlappingLeave` if more than one approved request covers the day.
///
/// Neither is raised on a rest day, which overrides every record.
///
/// # Example
///
/// ```
/// use attendance_payroll::calculation::{classify_day, CalendarDay, ClassifierOptions, DayRecords};
/// use attendance_payroll::models::{DayStatusTag, ShiftRule};
/// use chrono::{NaiveDate, NaiveTime};
///
/// let rule = ShiftRule::from_span(
///     NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
///     NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
/// );
/// let day = CalendarDay {
///     day_of_month: 3,
///     date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
///     is_rest_day: false,
/// };
///
/// let status = classify_day("emp_001", day, &rule, DayRecords::default(), ClassifierOptions::default())
///     .unwrap();
/// assert_eq!(status.tag, DayStatusTag::Absent);
/// ```
pub fn classify_day(
    employee_id: &str,
    day: CalendarDay,
    rule: &ShiftRule,
    records: DayRecords<'_>,
    options: ClassifierOptions,
) -> EngineResult<DayStatus> {
    let status = |tag: DayStatusTag, detail: Option<String>| DayStatus {
        employee_id: employee_id.to_string(),
        date: day.date,
        tag,
        detail,
    };

    if day.is_rest_day {
        return Ok(status(DayStatusTag::RestDay, None));
    }

    let punch = single_punch(employee_id, day.date, records.punches)?
        .filter(|p| !p.is_placeholder());
    let leave = single_approved_leave(employee_id, day.date, records.leaves)?;

    if let Some(punch) = punch {
        if let Some(reason) = lop_reason(punch, rule) {
            return Ok(status(DayStatusTag::LossOfPay, Some(reason.to_string())));
        }
        if punch.status.is_working_session() {
            return Ok(status(DayStatusTag::Present, None));
        }
    }

    if let Some(leave) = leave {
        return Ok(status(DayStatusTag::Leave, Some(leave.leave_type.to_string())));
    }

    let before_data = options
        .data_available_from
        .is_some_and(|first| day.date < first);
    if punch.is_none() && before_data {
        return Ok(status(DayStatusTag::NotAvailable, None));
    }

    Ok(status(DayStatusTag::Absent, None))
}

fn single_punch<'a>(
    employee_id: &str,
    date: NaiveDate,
    punches: &[&'a AttendancePunch],
) -> EngineResult<Option<&'a AttendancePunch>> {
    let mut on_day = punches.iter().filter(|p| p.date == date);
    let first = on_day.next().copied();
    let extra = on_day.count();
    if extra > 0 {
        return Err(EngineError::DuplicatePunch {
            employee_id: employee_id.to_string(),
            date,
            count: extra + 1,
        });
    }
    Ok(first)
}

fn single_approved_leave<'a>(
    employee_id: &str,
    date: NaiveDate,
    leaves: &[&'a LeaveRequest],
) -> EngineResult<Option<&'a LeaveRequest>> {
    let mut covering = leaves.iter().filter(|l| l.applies_to(date));
    let first = covering.next().copied();
    let extra = covering.count();
    if extra > 0 {
        return Err(EngineError::OverlappingLeave {
            employee_id: employee_id.to_string(),
            date,
            count: extra + 1,
        });
    }
    Ok(first)
}
