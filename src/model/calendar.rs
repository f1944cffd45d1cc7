//! Gregorian calendar helpers. Month indexes are zero-based throughout the crate.

use chrono::{Datelike, NaiveDate};

pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// The highest week index. Days 29 through 31 fall into this partial fifth week.
pub const LAST_WEEK: u32 = 4;

pub fn month_name(month: u32) -> Option<&'static str> {
    MONTHS.get(month as usize).copied()
}

/// Number of days in month index `month` of `year`, or 0 if `month` is not in `0..12`.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let Some(start) = NaiveDate::from_ymd_opt(year, month + 1, 1) else {
        return 0;
    };
    let next = if month == 11 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 2, 1)
    };
    next.map(|n| (n - start).num_days() as u32).unwrap_or(0)
}

/// Which week of the month a day belongs to: days 1-7 are week 0, 8-14 week 1 and so on. This is
/// not ISO week numbering.
pub fn week_of_month(day: u32) -> u32 {
    (day.saturating_sub(1) / 7).min(LAST_WEEK)
}

/// How many weeks month index `month` spans, 4 or 5.
pub fn weeks_in_month(year: i32, month: u32) -> u32 {
    days_in_month(year, month).div_ceil(7)
}

/// The days of the month that belong to `week`, clipped to the month's length.
pub fn days_of_week(year: i32, month: u32, week: u32) -> std::ops::RangeInclusive<u32> {
    let last = days_in_month(year, month);
    let first = week * 7 + 1;
    let end = if week >= LAST_WEEK { last } else { (first + 6).min(last) };
    first..=end
}

/// Splits a date into its zero-based month index and day of month.
pub fn month_and_day(date: NaiveDate) -> (u32, u32) {
    (date.month0(), date.day())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2025, 0), 31);
        assert_eq!(days_in_month(2025, 1), 28);
        assert_eq!(days_in_month(2024, 1), 29);
        assert_eq!(days_in_month(1900, 1), 28);
        assert_eq!(days_in_month(2000, 1), 29);
        assert_eq!(days_in_month(2025, 3), 30);
        assert_eq!(days_in_month(2025, 11), 31);
        assert_eq!(days_in_month(2025, 12), 0);
    }

    #[test]
    fn test_week_of_month() {
        assert_eq!(week_of_month(1), 0);
        assert_eq!(week_of_month(7), 0);
        assert_eq!(week_of_month(8), 1);
        assert_eq!(week_of_month(28), 3);
        assert_eq!(week_of_month(29), 4);
        assert_eq!(week_of_month(31), 4);
    }

    #[test]
    fn test_weeks_in_month() {
        assert_eq!(weeks_in_month(2025, 1), 4);
        assert_eq!(weeks_in_month(2024, 1), 5);
        assert_eq!(weeks_in_month(2025, 0), 5);
    }

    #[test]
    fn test_days_of_week() {
        assert_eq!(days_of_week(2025, 0, 0), 1..=7);
        assert_eq!(days_of_week(2025, 0, 4), 29..=31);
        assert_eq!(days_of_week(2024, 1, 4), 29..=29);
        assert!(days_of_week(2025, 1, 4).is_empty());
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(0), Some("January"));
        assert_eq!(month_name(11), Some("December"));
        assert_eq!(month_name(12), None);
    }
}
