//! Calendar math for ages and due dates.
//!
//! Day boundaries are whatever single display zone the caller used when
//! converting timestamps to dates; these functions never consult the
//! ambient time zone.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Whole-calendar-unit age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Age {
    pub years: u32,
    pub months: u32,
}

/// Compute whole-year/month age from a birth date.
///
/// The year count decrements when `as_of`'s month/day precedes the
/// birthday in the current year; months are computed analogously on the
/// remainder. A future birth date yields zero, never a negative age.
pub fn compute_age(birth_date: NaiveDate, as_of: NaiveDate) -> Age {
    if birth_date > as_of {
        return Age { years: 0, months: 0 };
    }

    let mut years = as_of.year() - birth_date.year();
    let mut months = as_of.month() as i32 - birth_date.month() as i32;
    if as_of.day() < birth_date.day() {
        months -= 1;
    }
    if months < 0 {
        years -= 1;
        months += 12;
    }

    Age {
        years: years.max(0) as u32,
        months: months as u32,
    }
}

/// Day-granular due status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueStatus {
    pub is_overdue: bool,
    pub days_until_due: Option<u32>,
    pub days_overdue: Option<u32>,
}

/// Compare a due date against an as-of date.
///
/// Due today is not overdue and reports zero days until due.
pub fn compute_due_status(due_at: NaiveDate, as_of: NaiveDate) -> DueStatus {
    let delta = due_at.signed_duration_since(as_of).num_days();
    if delta < 0 {
        DueStatus {
            is_overdue: true,
            days_until_due: None,
            days_overdue: Some((-delta) as u32),
        }
    } else {
        DueStatus {
            is_overdue: false,
            days_until_due: Some(delta as u32),
            days_overdue: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_age_day_before_birthday() {
        let age = compute_age(date(2020, 3, 15), date(2024, 3, 14));
        assert_eq!(age, Age { years: 3, months: 11 });
    }

    #[test]
    fn test_age_on_birthday() {
        let age = compute_age(date(2020, 3, 15), date(2024, 3, 15));
        assert_eq!(age, Age { years: 4, months: 0 });
    }

    #[test]
    fn test_age_under_one_year() {
        let age = compute_age(date(2024, 1, 31), date(2024, 3, 1));
        assert_eq!(age, Age { years: 0, months: 1 });
    }

    #[test]
    fn test_age_future_birth_date_is_zero() {
        let age = compute_age(date(2025, 1, 1), date(2024, 6, 1));
        assert_eq!(age, Age { years: 0, months: 0 });
    }

    #[test]
    fn test_age_same_day() {
        let age = compute_age(date(2024, 6, 1), date(2024, 6, 1));
        assert_eq!(age, Age { years: 0, months: 0 });
    }

    #[test]
    fn test_due_today_is_not_overdue() {
        let status = compute_due_status(date(2024, 1, 10), date(2024, 1, 10));
        assert!(!status.is_overdue);
        assert_eq!(status.days_until_due, Some(0));
        assert_eq!(status.days_overdue, None);
    }

    #[test]
    fn test_due_yesterday_is_one_day_overdue() {
        let status = compute_due_status(date(2024, 1, 9), date(2024, 1, 10));
        assert!(status.is_overdue);
        assert_eq!(status.days_overdue, Some(1));
        assert_eq!(status.days_until_due, None);
    }

    #[test]
    fn test_due_in_thirty_days() {
        let status = compute_due_status(date(2024, 2, 9), date(2024, 1, 10));
        assert!(!status.is_overdue);
        assert_eq!(status.days_until_due, Some(30));
    }
}
