//! Monthly aggregation of daily statuses.
//!
//! Counts are a pure fold over the day sequence, so aggregating the same
//! statuses twice gives the same result.

use crate::models::{DayStatus, DayStatusTag, MonthlyAggregate, StatusCounts, WeekBucket, YearMonth};

/// Counts the days per status tag.
///
/// An empty sequence yields all-zero counts.
pub fn aggregate_days(days: &[DayStatus]) -> StatusCounts {
    days.iter().fold(StatusCounts::default(), |mut counts, day| {
        counts.record(day.tag);
        counts
    })
}

/// Splits the day sequence into weekly buckets.
///
/// A bucket closes on the last rest day of a run of consecutive rest days.
/// Days after the final rest day of the month form a trailing partial bucket.
///
/// # Example
///
/// ```
/// use attendance_payroll::calculation::bucket_weeks;
/// use attendance_payroll::models::{DayStatus, DayStatusTag};
/// use chrono::NaiveDate;
///
/// // Saturday 1 June 2024, Sunday 2 June, Monday 3 June.
/// let days: Vec<DayStatus> = [(1, DayStatusTag::Present), (2, DayStatusTag::RestDay), (3, DayStatusTag::Absent)]
///     .into_iter()
///     .map(|(d, tag)| DayStatus {
///         employee_id: "emp_001".to_string(),
///         date: NaiveDate::from_ymd_opt(2024, 6, d).unwrap(),
///         tag,
///         detail: None,
///     })
///     .collect();
///
/// let weeks = bucket_weeks(&days);
/// assert_eq!(weeks.len(), 2);
/// assert_eq!(weeks[0].counts.present, 1);
/// assert_eq!(weeks[0].counts.rest_day, 1);
/// assert_eq!(weeks[1].counts.absent, 1);
/// ```
pub fn bucket_weeks(days: &[DayStatus]) -> Vec<WeekBucket> {
    let mut weeks = Vec::new();
    let mut current: Option<WeekBucket> = None;

    for (index, day) in days.iter().enumerate() {
        let bucket = current.get_or_insert_with(|| WeekBucket {
            start: day.date,
            end: day.date,
            counts: StatusCounts::default(),
        });
        bucket.end = day.date;
        bucket.counts.record(day.tag);

        let next_is_rest = days
            .get(index + 1)
            .is_some_and(|next| next.tag == DayStatusTag::RestDay);
        if day.tag == DayStatusTag::RestDay && !next_is_rest {
            weeks.extend(current.take());
        }
    }

    weeks.extend(current);
    weeks
}

/// Builds the monthly aggregate for one employee.
pub fn aggregate_month(employee_id: &str, month: YearMonth, days: Vec<DayStatus>) -> MonthlyAggregate {
    MonthlyAggregate {
        employee_id: employee_id.to_string(),
        month,
        counts: aggregate_days(&days),
        weeks: bucket_weeks(&days),
        days,
    }
}
