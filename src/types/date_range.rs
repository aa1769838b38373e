//! Inclusive calendar date range requested from the archive.

use crate::MinTempError;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// An inclusive range of calendar dates, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range from `start` to `end`, both inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`MinTempError::InvalidDateRange`] if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, MinTempError> {
        if start > end {
            return Err(MinTempError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parses two `YYYY-MM-DD` strings into a range.
    ///
    /// # Errors
    ///
    /// Returns [`MinTempError::DateParsing`] if either string is not a valid date,
    /// or [`MinTempError::InvalidDateRange`] if `start` is after `end`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mintemp::DateRange;
    ///
    /// let range = DateRange::parse("2022-01-01", "2024-01-01").unwrap();
    /// assert_eq!(range.to_string(), "2022-01-01..=2024-01-01");
    /// assert!(DateRange::parse("2024-01-01", "2022-01-01").is_err());
    /// ```
    pub fn parse(start: &str, end: &str) -> Result<Self, MinTempError> {
        let parse = |s: &str| {
            NaiveDate::parse_from_str(s, DATE_FORMAT)
                .map_err(|e| MinTempError::DateParsing(s.to_string(), e))
        };
        Self::new(parse(start)?, parse(end)?)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days covered, counting both ends.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub(crate) fn start_param(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    pub(crate) fn end_param(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start_param(), self.end_param())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_day_range() {
        let day = NaiveDate::from_ymd_opt(2023, 2, 28).unwrap();
        let range = DateRange::new(day, day).unwrap();
        assert_eq!(range.num_days(), 1);
        assert_eq!(range.start_param(), "2023-02-28");
    }

    #[test]
    fn test_range_covers_leap_day() {
        let range = DateRange::parse("2024-01-01", "2024-12-31").unwrap();
        assert_eq!(range.num_days(), 366);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = DateRange::parse("2023-13-01", "2023-12-31").unwrap_err();
        assert!(matches!(err, MinTempError::DateParsing(ref s, _) if s == "2023-13-01"));
    }

    #[test]
    fn test_rejects_reversed() {
        let err = DateRange::parse("2023-06-02", "2023-06-01").unwrap_err();
        assert!(matches!(err, MinTempError::InvalidDateRange { .. }));
    }
}
