//! Attendance punch model.
//!
//! The time-tracking source records free-form status labels ("Login",
//! "Completed", "Early Out", ...). They are mapped into the closed
//! [`PunchStatus`] enumeration here so the classifier only ever matches over
//! a finite set.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::shift_rule::span_minutes;

/// Status label recorded by the time-tracking source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PunchStatus {
    /// Checked in, session still open.
    Login,
    /// Checked in and out.
    Completed,
    /// Marked present by an administrator.
    Present,
    /// Checked out before the shift ended.
    EarlyOut,
    /// Checked in after the shift started.
    LateLogin,
    /// Explicitly marked as a loss-of-pay day.
    LossOfPay,
    /// Placeholder written before any check-in.
    NotLogged,
    /// A label this engine does not know.
    Unrecognized,
}

impl PunchStatus {
    /// Maps a raw label, ignoring case and surrounding whitespace.
    ///
    /// # Example
    ///
    /// ```
    /// use attendance_payroll::models::PunchStatus;
    ///
    /// assert_eq!(PunchStatus::from_label("Loss of Pay"), PunchStatus::LossOfPay);
    /// assert_eq!(PunchStatus::from_label(" completed "), PunchStatus::Completed);
    /// assert_eq!(PunchStatus::from_label("On Break"), PunchStatus::Unrecognized);
    /// ```
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "login" | "logged in" => PunchStatus::Login,
            "completed" | "logout" | "logged out" => PunchStatus::Completed,
            "present" => PunchStatus::Present,
            "early out" => PunchStatus::EarlyOut,
            "late login" => PunchStatus::LateLogin,
            "loss of pay" | "lop" => PunchStatus::LossOfPay,
            "not logged" | "not login" => PunchStatus::NotLogged,
            _ => PunchStatus::Unrecognized,
        }
    }

    /// The canonical label for this status.
    pub fn label(&self) -> &'static str {
        match self {
            PunchStatus::Login => "Login",
            PunchStatus::Completed => "Completed",
            PunchStatus::Present => "Present",
            PunchStatus::EarlyOut => "Early Out",
            PunchStatus::LateLogin => "Late Login",
            PunchStatus::LossOfPay => "Loss of Pay",
            PunchStatus::NotLogged => "Not Logged",
            PunchStatus::Unrecognized => "Unrecognized",
        }
    }

    /// Returns true for labels describing a completed or active working session.
    pub fn is_working_session(&self) -> bool {
        matches!(
            self,
            PunchStatus::Login | PunchStatus::Completed | PunchStatus::Present
        )
    }
}

/// One employee's attendance record for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendancePunch {
    /// The employee this punch belongs to.
    pub employee_id: String,
    /// The calendar date of the punch.
    pub date: NaiveDate,
    /// Check-in time, if recorded.
    pub check_in: Option<NaiveTime>,
    /// Check-out time, if recorded.
    pub check_out: Option<NaiveTime>,
    /// Worked duration in minutes as provided by the source.
    pub total_worked_minutes: Option<u32>,
    /// Mapped status label.
    pub status: PunchStatus,
    /// Explicit loss-of-pay flag set by the source.
    #[serde(default)]
    pub is_lop: bool,
}

impl AttendancePunch {
    /// Worked minutes, as provided or derived from check-in and check-out.
    ///
    /// A check-out earlier than the check-in is treated as crossing midnight.
    ///
    /// # Example
    ///
    /// ```
    /// use attendance_payroll::models::{AttendancePunch, PunchStatus};
    /// use chrono::{NaiveDate, NaiveTime};
    ///
    /// let punch = AttendancePunch {
    ///     employee_id: "emp_001".to_string(),
    ///     date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
    ///     check_in: Some(NaiveTime::from_hms_opt(22, 0, 0).unwrap()),
    ///     check_out: Some(NaiveTime::from_hms_opt(6, 30, 0).unwrap()),
    ///     total_worked_minutes: None,
    ///     status: PunchStatus::Completed,
    ///     is_lop: false,
    /// };
    /// assert_eq!(punch.worked_minutes(), Some(510));
    /// ```
    pub fn worked_minutes(&self) -> Option<u32> {
        self.total_worked_minutes.or_else(|| match (self.check_in, self.check_out) {
            (Some(check_in), Some(check_out)) => Some(span_minutes(check_in, check_out)),
            _ => None,
        })
    }

    /// Returns true if the record is a placeholder with no session behind it.
    pub fn is_placeholder(&self) -> bool {
        self.status == PunchStatus::NotLogged && self.check_in.is_none()
    }
}

/// Parses a worked-duration string into minutes.
///
/// Accepts `H:MM`, decimal hours (`8.5`) and `8h 30m`.
///
/// # Example
///
/// ```
/// use attendance_payroll::models::parse_worked_duration;
///
/// assert_eq!(parse_worked_duration("8:30").unwrap(), 510);
/// assert_eq!(parse_worked_duration("8.5").unwrap(), 510);
/// assert_eq!(parse_worked_duration("8h 30m").unwrap(), 510);
/// ```
pub fn parse_worked_duration(value: &str) -> EngineResult<u32> {
    let invalid = || EngineError::InvalidDuration {
        value: value.to_string(),
    };
    let trimmed = value.trim().to_ascii_lowercase();

    if let Some((hours, minutes)) = trimmed.split_once(':') {
        let hours: u32 = hours.trim().parse().map_err(|_| invalid())?;
        let minutes: u32 = minutes.trim().parse().map_err(|_| invalid())?;
        if minutes >= 60 {
            return Err(invalid());
        }
        return hours
            .checked_mul(60)
            .and_then(|m| m.checked_add(minutes))
            .ok_or_else(invalid);
    }

    if trimmed.contains('h') || trimmed.ends_with('m') {
        let mut total = 0u32;
        let mut number = String::new();
        for ch in trimmed.chars() {
            match ch {
                '0'..='9' => number.push(ch),
                'h' | 'm' => {
                    let amount: u32 = number.parse().map_err(|_| invalid())?;
                    let minutes = if ch == 'h' { amount.checked_mul(60) } else { Some(amount) };
                    total = minutes
                        .and_then(|m| total.checked_add(m))
                        .ok_or_else(invalid)?;
                    number.clear();
                }
                ' ' => {}
                _ => return Err(invalid()),
            }
        }
        if !number.is_empty() {
            return Err(invalid());
        }
        return Ok(total);
    }

    let hours: Decimal = trimmed.parse().map_err(|_| invalid())?;
    if hours.is_sign_negative() {
        return Err(invalid());
    }
    hours
        .checked_mul(Decimal::from(60))
        .and_then(|minutes| minutes.round().to_u32())
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn punch(check_in: Option<(u32, u32)>, check_out: Option<(u32, u32)>) -> AttendancePunch {
        AttendancePunch {
            employee_id: "emp_001".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            check_in: check_in.map(|(h, m)| NaiveTime::from_hms_opt(h, m, 0).unwrap()),
            check_out: check_out.map(|(h, m)| NaiveTime::from_hms_opt(h, m, 0).unwrap()),
            total_worked_minutes: None,
            status: PunchStatus::Completed,
            is_lop: false,
        }
    }

    #[test]
    fn test_status_labels_map_case_insensitively() {
        assert_eq!(PunchStatus::from_label("LOGIN"), PunchStatus::Login);
        assert_eq!(PunchStatus::from_label("Early Out"), PunchStatus::EarlyOut);
        assert_eq!(PunchStatus::from_label("late login"), PunchStatus::LateLogin);
        assert_eq!(PunchStatus::from_label("Not Logged"), PunchStatus::NotLogged);
        assert_eq!(PunchStatus::from_label(""), PunchStatus::Unrecognized);
    }

    #[test]
    fn test_label_round_trips_through_mapping() {
        for status in [
            PunchStatus::Login,
            PunchStatus::Completed,
            PunchStatus::Present,
            PunchStatus::EarlyOut,
            PunchStatus::LateLogin,
            PunchStatus::LossOfPay,
            PunchStatus::NotLogged,
        ] {
            assert_eq!(PunchStatus::from_label(status.label()), status);
        }
    }

    #[test]
    fn test_working_session_labels() {
        assert!(PunchStatus::Login.is_working_session());
        assert!(PunchStatus::Completed.is_working_session());
        assert!(PunchStatus::Present.is_working_session());
        assert!(!PunchStatus::NotLogged.is_working_session());
        assert!(!PunchStatus::Unrecognized.is_working_session());
    }

    #[test]
    fn test_worked_minutes_derived() {
        assert_eq!(punch(Some((10, 0)), Some((21, 0))).worked_minutes(), Some(660));
        assert_eq!(punch(Some((10, 0)), None).worked_minutes(), None);
    }

    #[test]
    fn test_worked_minutes_prefers_provided_total() {
        let mut p = punch(Some((10, 0)), Some((21, 0)));
        p.total_worked_minutes = Some(600);
        assert_eq!(p.worked_minutes(), Some(600));
    }

    #[test]
    fn test_placeholder_detection() {
        let mut p = punch(None, None);
        p.status = PunchStatus::NotLogged;
        assert!(p.is_placeholder());
        p.check_in = NaiveTime::from_hms_opt(10, 0, 0);
        assert!(!p.is_placeholder());
    }

    #[test]
    fn test_parse_worked_duration_rejects_garbage() {
        assert!(parse_worked_duration("eight").is_err());
        assert!(parse_worked_duration("8:75").is_err());
        assert!(parse_worked_duration("-2").is_err());
        assert!(parse_worked_duration("8h 30").is_err());
    }

    #[test]
    fn test_parse_worked_duration_rejects_out_of_range() {
        assert!(matches!(
            parse_worked_duration("99999999:00"),
            Err(EngineError::InvalidDuration { .. })
        ));
        assert!(matches!(
            parse_worked_duration("99999999h"),
            Err(EngineError::InvalidDuration { .. })
        ));
        assert!(matches!(
            parse_worked_duration("4294967295m 1m"),
            Err(EngineError::InvalidDuration { .. })
        ));
        assert!(matches!(
            parse_worked_duration("79228162514264337593543950335"),
            Err(EngineError::InvalidDuration { .. })
        ));
        assert!(parse_worked_duration("71582788:15").is_ok());
    }

    #[test]
    fn test_parse_worked_duration_hours_only() {
        assert_eq!(parse_worked_duration("11").unwrap(), 660);
        assert_eq!(parse_worked_duration("9h").unwrap(), 540);
        assert_eq!(parse_worked_duration("45m").unwrap(), 45);
    }
}
