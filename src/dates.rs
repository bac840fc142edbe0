//! Calendar-date arithmetic and comparison primitives
//!
//! Everything in the engine works on whole calendar days. Dates cross the
//! public boundary as `YYYY-MM-DD` strings and are `NaiveDate` internally;
//! no time-zone handling happens beyond reading the host's local date.

use chrono::{Datelike, Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{PeriodRsError, Result};

/// Wire format for calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Calendar-day delta `b - a` (positive when `b` is later)
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    (b - a).num_days()
}

/// Shift a date by `n` days, saturating at the representable range
pub fn add_days(date: NaiveDate, n: i64) -> NaiveDate {
    let days = Days::new(n.unsigned_abs());
    if n >= 0 {
        date.checked_add_days(days).unwrap_or(NaiveDate::MAX)
    } else {
        date.checked_sub_days(days).unwrap_or(NaiveDate::MIN)
    }
}

/// Today's date on the host clock
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn is_same_day(a: NaiveDate, b: NaiveDate) -> bool {
    a == b
}

/// Inclusive range containment
pub fn is_within(date: NaiveDate, from: NaiveDate, to: NaiveDate) -> bool {
    from <= date && date <= to
}

/// First and last day of a month, `None` for an invalid month
pub fn month_range(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let last = next_month.pred_opt()?;
    debug_assert_eq!(last.month(), month);
    Some((first, last))
}

/// Parse a strict `YYYY-MM-DD` calendar date
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    if !has_date_shape(trimmed) {
        return Err(PeriodRsError::InvalidDate {
            value: value.to_string(),
            reason: "expected YYYY-MM-DD".to_string(),
        });
    }

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|e| PeriodRsError::InvalidDate {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Exactly `DDDD-DD-DD`; chrono alone tolerates signs, padding and short fields
fn has_date_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Position of a date relative to a reference day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelativeDay {
    Today,
    Yesterday,
    Tomorrow,
    DaysAgo(u32),
    DaysAhead(u32),
}

impl fmt::Display for RelativeDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelativeDay::Today => write!(f, "today"),
            RelativeDay::Yesterday => write!(f, "yesterday"),
            RelativeDay::Tomorrow => write!(f, "tomorrow"),
            RelativeDay::DaysAgo(n) => write!(f, "{} days ago", n),
            RelativeDay::DaysAhead(n) => write!(f, "in {} days", n),
        }
    }
}

/// Label `date` relative to `today`
pub fn relative_label(date: NaiveDate, today: NaiveDate) -> RelativeDay {
    let delta = days_between(today, date);
    let magnitude = u32::try_from(delta.unsigned_abs()).unwrap_or(u32::MAX);

    match delta {
        0 => RelativeDay::Today,
        -1 => RelativeDay::Yesterday,
        1 => RelativeDay::Tomorrow,
        d if d < 0 => RelativeDay::DaysAgo(magnitude),
        _ => RelativeDay::DaysAhead(magnitude),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_days_between() {
        assert_eq!(days_between(date("2024-01-01"), date("2024-01-29")), 28);
        assert_eq!(days_between(date("2024-01-29"), date("2024-01-01")), -28);
        assert_eq!(days_between(date("2024-02-28"), date("2024-03-01")), 2); // leap year
        assert_eq!(days_between(date("2024-05-05"), date("2024-05-05")), 0);
    }

    #[test]
    fn test_add_days() {
        assert_eq!(add_days(date("2024-01-29"), 28), date("2024-02-26"));
        assert_eq!(add_days(date("2024-02-26"), -14), date("2024-02-12"));
        assert_eq!(add_days(date("2024-12-31"), 1), date("2025-01-01"));
        assert_eq!(add_days(NaiveDate::MAX, 5), NaiveDate::MAX);
        assert_eq!(add_days(NaiveDate::MIN, -5), NaiveDate::MIN);
    }

    #[test]
    fn test_month_range() {
        assert_eq!(
            month_range(2024, 2),
            Some((date("2024-02-01"), date("2024-02-29")))
        );
        assert_eq!(
            month_range(2023, 12),
            Some((date("2023-12-01"), date("2023-12-31")))
        );
        assert_eq!(month_range(2024, 13), None);
        assert_eq!(month_range(2024, 0), None);
    }

    #[test]
    fn test_parse_date_rejects_malformed_input() {
        assert!(parse_date("2024-01-05").is_ok());
        assert!(parse_date(" 2024-01-05 ").is_ok());
        assert!(parse_date("2024-1-5").is_err());
        assert!(parse_date("2024-02-30").is_err());
        assert!(parse_date("05/01/2024").is_err());
        assert!(parse_date("").is_err());
        assert!(parse_date("+2024-1-05").is_err());
        assert!(parse_date("2024- 1-05").is_err());
        assert!(parse_date("2024-01- 5").is_err());
        assert!(parse_date("2024-01-0５").is_err());
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(date("2024-03-07")), "2024-03-07");
    }

    #[test]
    fn test_relative_label() {
        let today = date("2024-06-15");
        assert_eq!(relative_label(today, today), RelativeDay::Today);
        assert_eq!(relative_label(date("2024-06-14"), today), RelativeDay::Yesterday);
        assert_eq!(relative_label(date("2024-06-16"), today), RelativeDay::Tomorrow);
        assert_eq!(relative_label(date("2024-06-10"), today), RelativeDay::DaysAgo(5));
        assert_eq!(relative_label(date("2024-06-25"), today), RelativeDay::DaysAhead(10));

        assert_eq!(RelativeDay::DaysAgo(5).to_string(), "5 days ago");
        assert_eq!(RelativeDay::DaysAhead(3).to_string(), "in 3 days");
    }

    #[test]
    fn test_range_helpers() {
        assert!(is_same_day(date("2024-01-01"), date("2024-01-01")));
        assert!(is_within(date("2024-01-05"), date("2024-01-01"), date("2024-01-05")));
        assert!(!is_within(date("2024-01-06"), date("2024-01-01"), date("2024-01-05")));
    }
}
