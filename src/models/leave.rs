//! Leave request model.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The kind of leave requested.
///
/// Labels the engine does not recognise are preserved in [`LeaveType::Other`]
/// so reports can still show them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LeaveType {
    /// Sick leave.
    Sick,
    /// Casual leave.
    Casual,
    /// Earned (privilege) leave.
    Earned,
    /// Maternity leave.
    Maternity,
    /// Paternity leave.
    Paternity,
    /// Unpaid leave.
    Unpaid,
    /// Any other label.
    Other(String),
}

impl LeaveType {
    /// Maps a raw label, ignoring case and a trailing "leave".
    ///
    /// # Example
    ///
    /// ```
    /// use attendance_payroll::models::LeaveType;
    ///
    /// assert_eq!(LeaveType::from_label("Sick Leave"), LeaveType::Sick);
    /// assert_eq!(LeaveType::from_label("casual"), LeaveType::Casual);
    /// assert_eq!(
    ///     LeaveType::from_label("Bereavement"),
    ///     LeaveType::Other("Bereavement".to_string())
    /// );
    /// ```
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        let lowered = trimmed.to_ascii_lowercase();
        let key = lowered.strip_suffix(" leave").unwrap_or(&lowered);
        match key {
            "sick" => LeaveType::Sick,
            "casual" => LeaveType::Casual,
            "earned" | "privilege" | "annual" => LeaveType::Earned,
            "maternity" => LeaveType::Maternity,
            "paternity" => LeaveType::Paternity,
            "unpaid" | "loss of pay" => LeaveType::Unpaid,
            _ => LeaveType::Other(trimmed.to_string()),
        }
    }
}

impl fmt::Display for LeaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeaveType::Sick => write!(f, "Sick Leave"),
            LeaveType::Casual => write!(f, "Casual Leave"),
            LeaveType::Earned => write!(f, "Earned Leave"),
            LeaveType::Maternity => write!(f, "Maternity Leave"),
            LeaveType::Paternity => write!(f, "Paternity Leave"),
            LeaveType::Unpaid => write!(f, "Unpaid Leave"),
            LeaveType::Other(label) => write!(f, "{}", label),
        }
    }
}

impl From<String> for LeaveType {
    fn from(value: String) -> Self {
        LeaveType::from_label(&value)
    }
}

impl From<LeaveType> for String {
    fn from(value: LeaveType) -> Self {
        value.to_string()
    }
}

/// Approval state of a leave request. Decided by an external workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Awaiting a decision.
    Pending,
    /// Approved; the only state that affects classification.
    Approved,
    /// Rejected.
    Rejected,
}

impl ApprovalStatus {
    /// Maps a raw label. Unknown labels count as pending, which never
    /// changes a day's status.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "approved" => ApprovalStatus::Approved,
            "rejected" => ApprovalStatus::Rejected,
            _ => ApprovalStatus::Pending,
        }
    }
}

/// A request for leave over an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// The employee requesting leave.
    pub employee_id: String,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Kind of leave.
    pub leave_type: LeaveType,
    /// Approval state.
    pub status: ApprovalStatus,
    /// Free-text reason.
    #[serde(default)]
    pub reason: Option<String>,
}

impl LeaveRequest {
    /// Returns true if `date` falls inside the inclusive range.
    ///
    /// An inverted range covers nothing.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Returns true if the request is approved.
    pub fn is_approved(&self) -> bool {
        self.status == ApprovalStatus::Approved
    }

    /// Returns true if the request is approved and covers `date`.
    pub fn applies_to(&self, date: NaiveDate) -> bool {
        self.is_approved() && self.covers(date)
    }

    /// Returns true if any day of the request falls between `first` and `last`.
    pub fn overlaps(&self, first: NaiveDate, last: NaiveDate) -> bool {
        self.start_date <= last && first <= self.end_date
    }
}
