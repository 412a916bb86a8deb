//! Per-employee rollups of daily statuses.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{DayStatus, DayStatusTag, YearMonth};

/// Day counts per [`DayStatusTag`].
///
/// # Example
///
/// ```
/// use attendance_payroll::models::{DayStatusTag, StatusCounts};
///
/// let mut counts = StatusCounts::default();
/// counts.record(DayStatusTag::Present);
/// counts.record(DayStatusTag::Absent);
/// counts.record(DayStatusTag::RestDay);
///
/// assert_eq!(counts.total(), 3);
/// assert_eq!(counts.working_days(), 2);
/// assert_eq!(counts.deductible_days(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    /// Days present.
    pub present: u32,
    /// Loss-of-pay days.
    pub lop: u32,
    /// Approved leave days.
    pub leave: u32,
    /// Absent days.
    pub absent: u32,
    /// Rest days.
    pub rest_day: u32,
    /// Days before attendance data was available.
    pub not_available: u32,
}

impl StatusCounts {
    /// Adds one day with the given tag.
    pub fn record(&mut self, tag: DayStatusTag) {
        match tag {
            DayStatusTag::Present => self.present += 1,
            DayStatusTag::LossOfPay => self.lop += 1,
            DayStatusTag::Leave => self.leave += 1,
            DayStatusTag::Absent => self.absent += 1,
            DayStatusTag::RestDay => self.rest_day += 1,
            DayStatusTag::NotAvailable => self.not_available += 1,
        }
    }

    /// Total days counted, across every tag.
    pub fn total(&self) -> u32 {
        self.present + self.lop + self.leave + self.absent + self.rest_day + self.not_available
    }

    /// Days that are not rest days.
    pub fn working_days(&self) -> u32 {
        self.total() - self.rest_day
    }

    /// Days charged against salary: loss-of-pay plus absent.
    pub fn deductible_days(&self) -> u32 {
        self.lop + self.absent
    }
}

impl std::ops::AddAssign for StatusCounts {
    fn add_assign(&mut self, other: Self) {
        self.present += other.present;
        self.lop += other.lop;
        self.leave += other.leave;
        self.absent += other.absent;
        self.rest_day += other.rest_day;
        self.not_available += other.not_available;
    }
}

/// Counts for one week of a period.
///
/// Weeks close on the rest day, so the first and last buckets of a month
/// are usually partial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekBucket {
    /// First day in the bucket.
    #[serde(with = "super::external_date")]
    pub start: NaiveDate,
    /// Last day in the bucket.
    #[serde(with = "super::external_date")]
    pub end: NaiveDate,
    /// Counts for the days in the bucket.
    pub counts: StatusCounts,
}

/// One employee's statuses for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    /// The employee.
    pub employee_id: String,
    /// The month.
    pub month: YearMonth,
    /// Counts across the whole month.
    pub counts: StatusCounts,
    /// Week-bucketed counts.
    pub weeks: Vec<WeekBucket>,
    /// Ordered per-day statuses.
    pub days: Vec<DayStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zero() {
        let counts = StatusCounts::default();
        assert_eq!(counts.total(), 0);
        assert_eq!(counts.working_days(), 0);
    }

    #[test]
    fn test_record_every_tag() {
        let mut counts = StatusCounts::default();
        for tag in [
            DayStatusTag::Present,
            DayStatusTag::LossOfPay,
            DayStatusTag::Leave,
            DayStatusTag::Absent,
            DayStatusTag::RestDay,
            DayStatusTag::NotAvailable,
        ] {
            counts.record(tag);
        }
        assert_eq!(counts.total(), 6);
        assert_eq!(counts.working_days(), 5);
        assert_eq!(counts.deductible_days(), 2);
    }

    #[test]
    fn test_add_assign() {
        let mut a = StatusCounts {
            present: 2,
            lop: 1,
            ..Default::default()
        };
        a += StatusCounts {
            present: 3,
            rest_day: 1,
            ..Default::default()
        };
        assert_eq!(a.present, 5);
        assert_eq!(a.lop, 1);
        assert_eq!(a.rest_day, 1);
    }
}
