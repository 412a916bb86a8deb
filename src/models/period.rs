//! Calendar month and external date handling.
//!
//! External interfaces exchange dates as `dd-mm-yyyy` strings and months as
//! `YYYY-MM`. Both are converted into ordered chrono types here, at the
//! boundary, so nothing downstream reasons about dates as strings.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{EngineError, EngineResult};

/// The `dd-mm-yyyy` format used by every external interface.
pub const EXTERNAL_DATE_FORMAT: &str = "%d-%m-%Y";

/// Parses a `dd-mm-yyyy` string into a [`NaiveDate`].
///
/// # Example
///
/// ```
/// use attendance_payroll::models::parse_external_date;
/// use chrono::NaiveDate;
///
/// let date = parse_external_date("15-06-2024").unwrap();
/// assert_eq!(date, NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
/// assert!(parse_external_date("2024-06-15").is_err());
/// ```
pub fn parse_external_date(value: &str) -> EngineResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), EXTERNAL_DATE_FORMAT).map_err(|_| {
        EngineError::InvalidDate {
            value: value.to_string(),
        }
    })
}

/// Formats a date as `dd-mm-yyyy`.
pub fn format_external_date(date: NaiveDate) -> String {
    date.format(EXTERNAL_DATE_FORMAT).to_string()
}

/// Serde helper for `dd-mm-yyyy` fields.
pub(crate) mod external_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_external_date(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_external_date(&raw).map_err(serde::de::Error::custom)
    }
}

/// Serde helper for optional `dd-mm-yyyy` fields.
pub(crate) mod external_date_option {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => s.serialize_str(&super::format_external_date(*date)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        raw.map(|value| super::parse_external_date(&value).map_err(serde::de::Error::custom))
            .transpose()
    }
}

/// A validated calendar month.
///
/// Serializes as `YYYY-MM`.
///
/// # Example
///
/// ```
/// use attendance_payroll::models::YearMonth;
///
/// let june: YearMonth = "2024-06".parse().unwrap();
/// assert_eq!(june.days_in_month(), 30);
/// assert_eq!(june.to_string(), "2024-06");
///
/// let february = YearMonth::new(2024, 2).unwrap();
/// assert_eq!(february.days_in_month(), 29);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Creates a month, rejecting anything chrono cannot place on the calendar.
    pub fn new(year: i32, month: u32) -> EngineResult<Self> {
        if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(EngineError::InvalidPeriod { year, month });
        }
        Ok(Self { year, month })
    }

    /// The year component.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The month component (1-12).
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The first day of the month.
    pub fn first_day(&self) -> NaiveDate {
        // Validated in `new`.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// The last day of the month.
    pub fn last_day(&self) -> NaiveDate {
        let first = self.first_day();
        let next_first = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
        };
        match next_first {
            Some(next) => next - Duration::days(1),
            None => first.with_day(31).unwrap_or(first),
        }
    }

    /// Number of calendar days in the month.
    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    /// Returns true if `date` falls inside this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidPeriod { year: 0, month: 0 };
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| EngineError::InvalidPeriod { year, month: 0 })?;
        YearMonth::new(year, month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
