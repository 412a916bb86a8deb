//! Calendar generation.
//!
//! Produces the ordered days of a month with each day's rest-day flag. The
//! sequence is computed lazily from the month and the rest-day set, so it can
//! be regenerated per employee without any shared mutable state.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::YearMonth;

/// The set of weekdays designated as non-working.
///
/// Serializes as a list of lowercase weekday names.
///
/// # Example
///
/// ```
/// use attendance_payroll::calculation::RestDays;
/// use chrono::Weekday;
///
/// let rest_days = RestDays::default();
/// assert!(rest_days.contains(Weekday::Sun));
/// assert!(!rest_days.contains(Weekday::Sat));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct RestDays {
    days: Vec<Weekday>,
}

impl RestDays {
    /// Creates a rest-day set from weekdays. Duplicates are ignored.
    pub fn new(days: impl IntoIterator<Item = Weekday>) -> Self {
        let mut unique: Vec<Weekday> = Vec::new();
        for day in days {
            if !unique.contains(&day) {
                unique.push(day);
            }
        }
        unique.sort_by_key(|d| d.num_days_from_monday());
        Self { days: unique }
    }

    /// Returns true if `weekday` is a rest day.
    pub fn contains(&self, weekday: Weekday) -> bool {
        self.days.contains(&weekday)
    }

    /// Returns true if `date` falls on a rest day.
    pub fn is_rest_day(&self, date: NaiveDate) -> bool {
        self.contains(date.weekday())
    }

    /// The rest weekdays, Monday first.
    pub fn weekdays(&self) -> &[Weekday] {
        &self.days
    }
}

impl Default for RestDays {
    fn default() -> Self {
        Self::new([Weekday::Sun])
    }
}

impl TryFrom<Vec<String>> for RestDays {
    type Error = String;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        names
            .iter()
            .map(|name| parse_weekday(name).ok_or_else(|| format!("unknown weekday '{}'", name)))
            .collect::<Result<Vec<_>, _>>()
            .map(RestDays::new)
    }
}

impl From<RestDays> for Vec<String> {
    fn from(rest_days: RestDays) -> Self {
        rest_days.days.iter().map(|d| weekday_name(*d).to_string()).collect()
    }
}

fn parse_weekday(name: &str) -> Option<Weekday> {
    match name.trim().to_ascii_lowercase().as_str() {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// One day of a generated calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    /// Day of the month, starting at 1.
    pub day_of_month: u32,
    /// The date.
    pub date: NaiveDate,
    /// Whether the day is a designated rest day.
    pub is_rest_day: bool,
}

/// A month's calendar under a rest-day policy.
///
/// Iterating it twice yields the same sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthCalendar {
    month: YearMonth,
    rest_days: RestDays,
}

impl MonthCalendar {
    /// The month this calendar covers.
    pub fn month(&self) -> YearMonth {
        self.month
    }

    /// The ordered days of the month, 1st to last inclusive.
    pub fn days(&self) -> impl Iterator<Item = CalendarDay> + '_ {
        self.month
            .first_day()
            .iter_days()
            .take(self.month.days_in_month() as usize)
            .map(|date| CalendarDay {
                day_of_month: date.day(),
                date,
                is_rest_day: self.rest_days.is_rest_day(date),
            })
    }

    /// Number of days in the month.
    pub fn len(&self) -> usize {
        self.month.days_in_month() as usize
    }

    /// Always false; every month has days.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of days that are not rest days.
    pub fn working_days(&self) -> u32 {
        self.days().filter(|d| !d.is_rest_day).count() as u32
    }
}

/// Generates the calendar for `year`/`month`.
///
/// # Errors
///
/// Returns `InvalidPeriod` if the month is outside 1-12 or the year is
/// outside chrono's range.
///
/// # Example
///
/// ```
/// use attendance_payroll::calculation::{generate_calendar, RestDays};
///
/// // June 2024 starts on a Saturday and has five Sundays.
/// let calendar = generate_calendar(2024, 6, &RestDays::default()).unwrap();
/// let days: Vec<_> = calendar.days().collect();
///
/// assert_eq!(days.len(), 30);
/// assert_eq!(days[0].day_of_month, 1);
/// assert!(!days[0].is_rest_day);
/// assert!(days[1].is_rest_day);
/// assert_eq!(calendar.working_days(), 25);
/// ```
pub fn generate_calendar(year: i32, month: u32, rest_days: &RestDays) -> EngineResult<MonthCalendar> {
    let month = YearMonth::new(year, month)?;
    Ok(MonthCalendar {
        month,
        rest_days: rest_days.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    #[test]
    fn test_invalid_month_rejected() {
        let err = generate_calendar(2024, 13, &RestDays::default()).unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidPeriod {
                year: 2024,
                month: 13
            }
        );
        assert!(generate_calendar(2024, 0, &RestDays::default()).is_err());
    }

    #[test]
    fn test_covers_every_day_in_order() {
        let calendar = generate_calendar(2024, 2, &RestDays::default()).unwrap();
        let days: Vec<_> = calendar.days().collect();
        assert_eq!(days.len(), 29);
        for (index, day) in days.iter().enumerate() {
            assert_eq!(day.day_of_month as usize, index + 1);
        }
        assert_eq!(days.last().unwrap().date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_sundays_are_rest_days() {
        let calendar = generate_calendar(2024, 9, &RestDays::default()).unwrap();
        for day in calendar.days() {
            assert_eq!(day.is_rest_day, day.date.weekday() == Weekday::Sun);
        }
        // September 2024: 1, 8, 15, 22, 29
        assert_eq!(calendar.working_days(), 25);
    }

    #[test]
    fn test_sequence_is_restartable() {
        let calendar = generate_calendar(2024, 6, &RestDays::default()).unwrap();
        let first: Vec<_> = calendar.days().collect();
        let second: Vec<_> = calendar.days().collect();
        assert_eq!(first, second);
        assert_eq!(calendar.len(), 30);
    }

    #[test]
    fn test_custom_rest_days() {
        let rest = RestDays::new([Weekday::Sat, Weekday::Sun, Weekday::Sun]);
        assert_eq!(rest.weekdays(), &[Weekday::Sat, Weekday::Sun]);
        let calendar = generate_calendar(2024, 6, &rest).unwrap();
        // June 2024 has 5 Saturdays and 5 Sundays.
        assert_eq!(calendar.working_days(), 20);
    }

    #[test]
    fn test_december_rolls_over_year() {
        let calendar = generate_calendar(2024, 12, &RestDays::default()).unwrap();
        assert_eq!(calendar.len(), 31);
        assert_eq!(
            calendar.days().last().unwrap().date,
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_rest_days_deserialize_from_names() {
        let rest: RestDays = serde_yaml::from_str("[sunday, Saturday]").unwrap();
        assert!(rest.contains(Weekday::Sat));
        assert!(rest.contains(Weekday::Sun));
        assert!(serde_yaml::from_str::<RestDays>("[funday]").is_err());
        assert_eq!(
            serde_json::to_string(&RestDays::default()).unwrap(),
            "[\"sunday\"]"
        );
    }
}
