//! Daily status model.
//!
//! A [`DayStatus`] is the single resolved outcome for one employee on one
//! calendar day. Every downstream count, deduction and report cell is derived
//! from it.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The resolved classification of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatusTag {
    /// Designated non-working day.
    RestDay,
    /// Late login, early exit, short hours or explicitly flagged.
    LossOfPay,
    /// Worked the shift.
    Present,
    /// Covered by an approved leave request.
    Leave,
    /// No punch and no approved leave.
    Absent,
    /// Before attendance data is available; neither present nor absent.
    NotAvailable,
}

/// Status code shown in the per-day attendance grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceCode {
    /// Present.
    P,
    /// Loss of pay.
    #[serde(rename = "LOP")]
    Lop,
    /// Leave.
    L,
    /// Absent.
    A,
    /// Rest day (Sunday under current policy).
    Su,
    /// No data available.
    #[serde(rename = "NA")]
    Na,
}

impl AttendanceCode {
    /// The code as printed in reports and CSV exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceCode::P => "P",
            AttendanceCode::Lop => "LOP",
            AttendanceCode::L => "L",
            AttendanceCode::A => "A",
            AttendanceCode::Su => "Su",
            AttendanceCode::Na => "NA",
        }
    }
}

impl fmt::Display for AttendanceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<DayStatusTag> for AttendanceCode {
    fn from(tag: DayStatusTag) -> Self {
        match tag {
            DayStatusTag::RestDay => AttendanceCode::Su,
            DayStatusTag::LossOfPay => AttendanceCode::Lop,
            DayStatusTag::Present => AttendanceCode::P,
            DayStatusTag::Leave => AttendanceCode::L,
            DayStatusTag::Absent => AttendanceCode::A,
            DayStatusTag::NotAvailable => AttendanceCode::Na,
        }
    }
}

/// The resolved status of one employee on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStatus {
    /// The employee.
    pub employee_id: String,
    /// The calendar date.
    #[serde(with = "super::external_date")]
    pub date: NaiveDate,
    /// The single resolved tag.
    pub tag: DayStatusTag,
    /// LOP reason or leave type, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl DayStatus {
    /// The grid status code for this day.
    pub fn code(&self) -> AttendanceCode {
        self.tag.into()
    }
}
