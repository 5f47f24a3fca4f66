//! Calendar helpers
//!
//! Dates are plain calendar values (`NaiveDate`): no time zone, no
//! time-of-day. The week anchor is computed from the weekday of the calendar
//! date itself, so a play made just after midnight local time lands in the
//! right week regardless of the UTC offset.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Canonical `YYYY-MM-DD` key format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Monday of an ISO week. Identity of a weekly deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "NaiveDate", into = "NaiveDate")]
pub struct WeekAnchor(NaiveDate);

impl WeekAnchor {
    /// Anchor of the week containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        week_anchor_of(date)
    }

    pub fn monday(&self) -> NaiveDate {
        self.0
    }

    pub fn sunday(&self) -> NaiveDate {
        self.0 + Duration::days(6)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        week_anchor_of(date) == *self
    }

    /// Monday..Sunday
    pub fn days(&self) -> [NaiveDate; 7] {
        days_in_week(*self)
    }

    pub fn next(&self) -> Self {
        WeekAnchor(self.0 + Duration::weeks(1))
    }

    pub fn previous(&self) -> Self {
        WeekAnchor(self.0 - Duration::weeks(1))
    }
}

impl TryFrom<NaiveDate> for WeekAnchor {
    type Error = ParseError;

    fn try_from(date: NaiveDate) -> Result<Self, Self::Error> {
        if date.weekday() == Weekday::Mon {
            Ok(WeekAnchor(date))
        } else {
            Err(ParseError::NotAMonday(date))
        }
    }
}

impl From<WeekAnchor> for NaiveDate {
    fn from(anchor: WeekAnchor) -> Self {
        anchor.0
    }
}

impl fmt::Display for WeekAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_date(self.0))
    }
}

impl FromStr for WeekAnchor {
    type Err = ParseError;

    /// Strict: the string must name a Monday.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WeekAnchor::try_from(parse_date(s)?)
    }
}

/// Monday on or before `date`.
pub fn week_anchor_of(date: NaiveDate) -> WeekAnchor {
    let offset = date.weekday().num_days_from_monday();
    WeekAnchor(date - Duration::days(i64::from(offset)))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(key: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(key.trim(), DATE_FORMAT)
        .map_err(|_| ParseError::InvalidDate(key.to_string()))
}

/// Today's date from the local calendar.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn days_in_week(anchor: WeekAnchor) -> [NaiveDate; 7] {
    std::array::from_fn(|i| anchor.0 + Duration::days(i as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_anchor_is_monday_on_or_before() {
        // 2024-06-03 is a Monday
        assert_eq!(week_anchor_of(date(2024, 6, 3)).monday(), date(2024, 6, 3));
        assert_eq!(week_anchor_of(date(2024, 6, 5)).monday(), date(2024, 6, 3));
        // Sunday belongs to the week that started six days earlier
        assert_eq!(week_anchor_of(date(2024, 6, 9)).monday(), date(2024, 6, 3));
        assert_eq!(week_anchor_of(date(2024, 6, 10)).monday(), date(2024, 6, 10));
    }

    #[test]
    fn test_week_anchor_across_year_boundary() {
        // 2025-01-01 is a Wednesday
        assert_eq!(week_anchor_of(date(2025, 1, 1)).monday(), date(2024, 12, 30));
    }

    #[test]
    fn test_format_and_parse() {
        assert_eq!(format_date(date(2024, 6, 3)), "2024-06-03");
        assert_eq!(parse_date("2024-06-03").unwrap(), date(2024, 6, 3));
        assert!(matches!(parse_date("2024-13-01"), Err(ParseError::InvalidDate(_))));
        assert!(parse_date("hello").is_err());
    }

    #[test]
    fn test_anchor_from_str_requires_monday() {
        assert!("2024-06-03".parse::<WeekAnchor>().is_ok());
        assert_eq!(
            "2024-06-04".parse::<WeekAnchor>(),
            Err(ParseError::NotAMonday(date(2024, 6, 4)))
        );
    }

    #[test]
    fn test_days_in_week() {
        let anchor = WeekAnchor::of(date(2024, 6, 6));
        let days = days_in_week(anchor);

        assert_eq!(days[0], date(2024, 6, 3));
        assert_eq!(days[6], date(2024, 6, 9));
        assert_eq!(anchor.sunday(), date(2024, 6, 9));
        assert!(days.iter().all(|d| anchor.contains(*d)));
        assert!(!anchor.contains(date(2024, 6, 10)));
        assert_eq!(anchor.next().monday(), date(2024, 6, 10));
        assert_eq!(anchor.next().previous(), anchor);
    }

    #[test]
    fn test_anchor_serializes_as_date_string() {
        let anchor = WeekAnchor::of(date(2024, 6, 6));
        assert_eq!(serde_json::to_string(&anchor).unwrap(), "\"2024-06-03\"");

        let bad: Result<WeekAnchor, _> = serde_json::from_str("\"2024-06-04\"");
        assert!(bad.is_err());
    }

    proptest! {
        #[test]
        fn prop_parse_format_roundtrip(days in 0i64..40_000) {
            let d = date(1970, 1, 1) + Duration::days(days);
            prop_assert_eq!(parse_date(&format_date(d)).unwrap(), d);
        }

        #[test]
        fn prop_same_anchor_iff_same_week(a in 0i64..10_000, b in 0i64..10_000) {
            let base = date(2000, 1, 3); // Monday
            let da = base + Duration::days(a);
            let db = base + Duration::days(b);
            let same_window = a.div_euclid(7) == b.div_euclid(7);
            prop_assert_eq!(week_anchor_of(da) == week_anchor_of(db), same_window);
        }
    }
}
