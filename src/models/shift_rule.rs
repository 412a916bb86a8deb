//! Shift rule model.
//!
//! A [`ShiftRule`] is the policy a day's punch is measured against: when the
//! employee is expected to log in and out, and the minimum time they must work.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Parses a time of day as written by the time-tracking source.
///
/// Accepts `hh:mm AM/PM`, `HH:MM` and `HH:MM:SS`.
///
/// # Example
///
/// ```
/// use attendance_payroll::models::parse_clock_time;
/// use chrono::NaiveTime;
///
/// let expected = NaiveTime::from_hms_opt(21, 5, 0).unwrap();
/// assert_eq!(parse_clock_time("09:05 PM").unwrap(), expected);
/// assert_eq!(parse_clock_time("21:05").unwrap(), expected);
/// ```
pub fn parse_clock_time(value: &str) -> EngineResult<NaiveTime> {
    let trimmed = value.trim();
    ["%I:%M %p", "%I:%M%p", "%H:%M:%S", "%H:%M"]
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| EngineError::InvalidTime {
            value: value.to_string(),
        })
}

/// Minutes from `expected` to `actual` on a 24h clock, normalised to
/// the range (-720, 720].
///
/// A 21:55 check-in against a 22:00 login is `-5`; a 00:10 check-in
/// against a 23:50 login is `20`.
pub fn clock_offset_minutes(actual: NaiveTime, expected: NaiveTime) -> i64 {
    let raw = minute_of_day(actual) - minute_of_day(expected);
    let wrapped = raw.rem_euclid(MINUTES_PER_DAY);
    if wrapped > MINUTES_PER_DAY / 2 {
        wrapped - MINUTES_PER_DAY
    } else {
        wrapped
    }
}

fn minute_of_day(time: NaiveTime) -> i64 {
    i64::from(time.hour()) * 60 + i64::from(time.minute())
}

/// Minutes between a login and a logout, wrapping past midnight.
pub fn span_minutes(start: NaiveTime, end: NaiveTime) -> u32 {
    let raw = (minute_of_day(end) - minute_of_day(start)).rem_euclid(MINUTES_PER_DAY);
    // rem_euclid keeps this in 0..1440
    u32::try_from(raw).unwrap_or(0)
}

/// Tolerance applied before a late login or early exit counts as LOP.
///
/// Current business policy fixes this at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GracePolicy {
    /// Minutes of tolerance.
    #[serde(default)]
    pub minutes: u32,
}

impl GracePolicy {
    /// The zero-tolerance policy.
    pub const STRICT: GracePolicy = GracePolicy { minutes: 0 };
}

/// The expected schedule for one employee.
///
/// `expected_login` and `expected_logout` are optional so that flexible
/// shifts can enforce only the minimum duration. A logout at or before
/// the login marks an overnight shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRule {
    /// Expected login time.
    #[serde(default, with = "clock_option")]
    pub expected_login: Option<NaiveTime>,
    /// Expected logout time.
    #[serde(default, with = "clock_option")]
    pub expected_logout: Option<NaiveTime>,
    /// Minimum worked duration, in minutes.
    pub required_minimum_minutes: u32,
    /// Grace tolerance (zero under current policy).
    #[serde(default)]
    pub grace: GracePolicy,
}

impl ShiftRule {
    /// Builds a fixed shift whose minimum duration is the login-to-logout span.
    ///
    /// # Example
    ///
    /// ```
    /// use attendance_payroll::models::ShiftRule;
    /// use chrono::NaiveTime;
    ///
    /// let rule = ShiftRule::from_span(
    ///     NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
    ///     NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
    /// );
    /// assert_eq!(rule.required_minimum_minutes, 9 * 60);
    /// assert!(!rule.is_overnight());
    /// ```
    pub fn from_span(login: NaiveTime, logout: NaiveTime) -> Self {
        Self {
            expected_login: Some(login),
            expected_logout: Some(logout),
            required_minimum_minutes: span_minutes(login, logout),
            grace: GracePolicy::STRICT,
        }
    }

    /// Returns true if the shift crosses midnight.
    pub fn is_overnight(&self) -> bool {
        match (self.expected_login, self.expected_logout) {
            (Some(login), Some(logout)) => logout <= login,
            _ => false,
        }
    }

    /// Minutes the check-in is past the expected login, beyond grace.
    ///
    /// Returns `None` when the check-in is on time (or early), or when the
    /// shift has no fixed login.
    pub fn late_by_minutes(&self, check_in: NaiveTime) -> Option<u32> {
        let expected = self.expected_login?;
        let offset = self.offset_minutes(check_in, expected);
        let late = offset - i64::from(self.grace.minutes);
        (late > 0).then(|| u32::try_from(offset).unwrap_or(u32::MAX))
    }

    /// Minutes the check-out is before the expected logout, beyond grace.
    pub fn early_by_minutes(&self, check_out: NaiveTime) -> Option<u32> {
        let expected = self.expected_logout?;
        let offset = self.offset_minutes(check_out, expected);
        let early = -offset - i64::from(self.grace.minutes);
        (early > 0).then(|| u32::try_from(-offset).unwrap_or(u32::MAX))
    }

    /// Only overnight shifts measure on a circular clock; a day shift
    /// compares minutes of the same day.
    fn offset_minutes(&self, actual: NaiveTime, expected: NaiveTime) -> i64 {
        if self.is_overnight() {
            clock_offset_minutes(actual, expected)
        } else {
            minute_of_day(actual) - minute_of_day(expected)
        }
    }
}

/// Serde helper for optional `HH:MM` clock fields.
pub(crate) mod clock_option {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(time) => s.collect_str(&time.format("%H:%M")),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        raw.map(|value| super::parse_clock_time(&value).map_err(serde::de::Error::custom))
            .transpose()
    }
}
