//! Monday-based training weeks

use crate::error::{LoadwatchError, Result};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Days in a training week
pub const DAYS_PER_WEEK: usize = 7;

/// Round a date down to the Monday of its week
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Parse an ISO `YYYY-MM-DD` date
pub fn parse_iso_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| LoadwatchError::InvalidDate {
        value: value.to_string(),
    })
}

/// Seven consecutive dates starting on a Monday
///
/// Derived from any anchor date and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WeekWindow {
    start: NaiveDate,
}

impl WeekWindow {
    /// The week containing `date`
    pub fn containing(date: NaiveDate) -> Self {
        WeekWindow {
            start: week_start(date),
        }
    }

    /// Monday of the week
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Sunday of the week
    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(DAYS_PER_WEEK as i64 - 1)
    }

    /// The seven dates, Monday first
    pub fn dates(&self) -> [NaiveDate; DAYS_PER_WEEK] {
        std::array::from_fn(|i| self.start + Duration::days(i as i64))
    }

    /// Shift by a whole number of weeks (negative goes back in time)
    ///
    /// Panics outside chrono's calendar range; use [`checked_offset_weeks`]
    /// for untrusted offsets.
    ///
    /// [`checked_offset_weeks`]: WeekWindow::checked_offset_weeks
    pub fn offset_weeks(&self, weeks: i64) -> Self {
        WeekWindow {
            start: self.start + Duration::weeks(weeks),
        }
    }

    /// Shift by a whole number of weeks, `None` past the calendar range
    pub fn checked_offset_weeks(&self, weeks: i64) -> Option<Self> {
        let start = self.start.checked_add_signed(Duration::try_weeks(weeks)?)?;
        // The window's Sunday must exist too
        start.checked_add_signed(Duration::days(DAYS_PER_WEEK as i64 - 1))?;
        Some(WeekWindow { start })
    }

    pub fn previous(&self) -> Self {
        self.offset_weeks(-1)
    }

    pub fn next(&self) -> Self {
        self.offset_weeks(1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end()
    }
}

impl fmt::Display for WeekWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%Y-%m-%d"),
            self.end().format("%Y-%m-%d")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn test_week_start_rounds_down_to_monday() {
        // 2024-09-23 is a Monday
        let monday = NaiveDate::from_ymd_opt(2024, 9, 23).unwrap();
        assert_eq!(week_start(monday), monday);

        let sunday = NaiveDate::from_ymd_opt(2024, 9, 29).unwrap();
        assert_eq!(week_start(sunday), monday);

        let wednesday = NaiveDate::from_ymd_opt(2024, 9, 25).unwrap();
        assert_eq!(week_start(wednesday), monday);

        // Crossing a month boundary
        let tuesday = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
        assert_eq!(
            week_start(tuesday),
            NaiveDate::from_ymd_opt(2024, 9, 30).unwrap()
        );
    }

    #[test]
    fn test_week_dates() {
        let window = WeekWindow::containing(NaiveDate::from_ymd_opt(2024, 9, 26).unwrap());
        let dates = window.dates();

        assert_eq!(dates.len(), 7);
        assert_eq!(dates[0].weekday(), Weekday::Mon);
        assert_eq!(dates[6].weekday(), Weekday::Sun);
        assert_eq!(dates[6], window.end());
        assert!(window.contains(dates[3]));
        assert!(!window.contains(window.next().start()));
    }

    #[test]
    fn test_week_navigation() {
        let window = WeekWindow::containing(NaiveDate::from_ymd_opt(2024, 9, 23).unwrap());
        assert_eq!(
            window.previous().start(),
            NaiveDate::from_ymd_opt(2024, 9, 16).unwrap()
        );
        assert_eq!(window.offset_weeks(-4).offset_weeks(4), window);
        assert_eq!(window.to_string(), "2024-09-23 to 2024-09-29");
    }

    #[test]
    fn test_checked_offset_stops_at_calendar_range() {
        let window = WeekWindow::containing(NaiveDate::from_ymd_opt(2024, 9, 23).unwrap());
        assert_eq!(window.checked_offset_weeks(-4), Some(window.offset_weeks(-4)));
        assert_eq!(window.checked_offset_weeks(-14_000_000), None);
        assert_eq!(window.checked_offset_weeks(i64::MIN), None);
        assert_eq!(window.checked_offset_weeks(14_000_000), None);
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(
            parse_iso_date("2024-09-23").unwrap(),
            NaiveDate::from_ymd_opt(2024, 9, 23).unwrap()
        );
        assert!(matches!(
            parse_iso_date("23/09/2024"),
            Err(LoadwatchError::InvalidDate { .. })
        ));
        assert!(parse_iso_date("2024-02-30").is_err());
    }
}
