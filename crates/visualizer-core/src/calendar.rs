//! Seasons and season-year assignment.
//!
//! A season is a run of consecutive calendar months. Seasons that wrap the
//! calendar year (e.g. DJF) are labelled by the year of their final month, so
//! December 2000 belongs to winter 2001.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, VerificationError};

/// An ordered run of consecutive months (1 = January).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct Season {
    months: Vec<u32>,
}

impl Season {
    /// Create a season with validation.
    ///
    /// Validates:
    /// - at least one and at most twelve months
    /// - every month lies in 1..=12
    /// - months are consecutive (wrapping from 12 to 1 is allowed)
    pub fn new(months: Vec<u32>) -> Result<Self> {
        let invalid = |reason| VerificationError::InvalidParameter {
            name: "season",
            value: format!("{months:?}"),
            reason,
        };
        if months.is_empty() || months.len() > 12 {
            return Err(invalid("must contain between 1 and 12 months"));
        }
        if months.iter().any(|m| !(1..=12).contains(m)) {
            return Err(invalid("months must lie in 1..=12"));
        }
        if months.windows(2).any(|w| w[1] != w[0] % 12 + 1) {
            return Err(invalid("months must be consecutive"));
        }
        Ok(Self { months })
    }

    /// December, January, February.
    pub fn djf() -> Self {
        Self { months: vec![12, 1, 2] }
    }

    /// June, July, August.
    pub fn jja() -> Self {
        Self { months: vec![6, 7, 8] }
    }

    /// The full calendar year.
    pub fn annual() -> Self {
        Self {
            months: (1..=12).collect(),
        }
    }

    /// Months of the season in order.
    pub fn months(&self) -> &[u32] {
        &self.months
    }

    /// Number of months in the season.
    pub fn len(&self) -> usize {
        self.months.len()
    }

    /// Always `false`; a validated season has at least one month.
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Returns `true` when the season crosses the calendar-year boundary.
    pub fn wraps_year(&self) -> bool {
        self.months.windows(2).any(|w| w[1] < w[0])
    }

    /// Season-year of `date`, or `None` when the date falls outside the season.
    pub fn season_year(&self, date: NaiveDate) -> Option<i32> {
        let month = date.month();
        if !self.months.contains(&month) {
            return None;
        }
        let last = *self.months.last()?;
        if self.wraps_year() && month > last {
            Some(date.year() + 1)
        } else {
            Some(date.year())
        }
    }
}

impl TryFrom<Vec<u32>> for Season {
    type Error = VerificationError;

    fn try_from(months: Vec<u32>) -> Result<Self> {
        Self::new(months)
    }
}

impl From<Season> for Vec<u32> {
    fn from(season: Season) -> Self {
        season.months
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn djf_assigns_december_to_following_year() {
        let s = Season::djf();
        assert!(s.wraps_year());
        assert_eq!(s.season_year(ymd(2000, 12, 15)), Some(2001));
        assert_eq!(s.season_year(ymd(2001, 1, 15)), Some(2001));
        assert_eq!(s.season_year(ymd(2001, 2, 28)), Some(2001));
    }

    #[test]
    fn months_outside_season_are_skipped() {
        let s = Season::djf();
        assert_eq!(s.season_year(ymd(2001, 3, 1)), None);
        assert_eq!(s.season_year(ymd(2001, 11, 30)), None);
    }

    #[test]
    fn non_wrapping_season_keeps_calendar_year() {
        let s = Season::jja();
        assert!(!s.wraps_year());
        assert_eq!(s.season_year(ymd(1990, 7, 1)), Some(1990));
    }

    #[test]
    fn annual_season_covers_every_month() {
        let s = Season::annual();
        assert_eq!(s.len(), 12);
        assert!(!s.wraps_year());
        assert_eq!(s.season_year(ymd(1990, 12, 31)), Some(1990));
    }

    #[test]
    fn long_wrapping_season() {
        let s = Season::new(vec![11, 12, 1, 2, 3]).unwrap();
        assert_eq!(s.season_year(ymd(2000, 11, 1)), Some(2001));
        assert_eq!(s.season_year(ymd(2001, 3, 1)), Some(2001));
    }

    #[test]
    fn rejects_non_consecutive_months() {
        assert!(Season::new(vec![1, 3]).is_err());
    }

    #[test]
    fn rejects_out_of_range_month() {
        assert!(Season::new(vec![0]).is_err());
        assert!(Season::new(vec![13]).is_err());
    }

    #[test]
    fn rejects_empty_season() {
        assert!(Season::new(vec![]).is_err());
    }

    #[test]
    fn deserialization_validates() {
        let ok: Season = serde_json::from_str("[12, 1, 2]").unwrap();
        assert_eq!(ok, Season::djf());
        assert!(serde_json::from_str::<Season>("[1, 5]").is_err());
    }
}
