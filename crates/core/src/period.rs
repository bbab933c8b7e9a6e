use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// A reconciliation period: one calendar month of one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPeriodo")]
pub struct Periodo {
    year: i32,
    month: u32,
}

#[derive(Deserialize)]
struct RawPeriodo {
    year: i32,
    month: u32,
}

impl TryFrom<RawPeriodo> for Periodo {
    type Error = CoreError;

    fn try_from(raw: RawPeriodo) -> Result<Self, Self::Error> {
        Periodo::new(raw.year, raw.month)
    }
}

impl Periodo {
    pub fn new(year: i32, month: u32) -> Result<Self, CoreError> {
        if !(1..=12).contains(&month) {
            return Err(CoreError::InvalidMonth(month));
        }
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(CoreError::InvalidYear(year));
        }
        Ok(Periodo { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Periodo {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn first_day(self) -> NaiveDate {
        // Validated in `new`.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last calendar day of the month (inclusive end).
    pub fn last_day(self) -> NaiveDate {
        let next = self.next().first_day();
        next.pred_opt().unwrap_or(next)
    }

    pub fn previous(self) -> Self {
        if self.month == 1 {
            Periodo { year: self.year - 1, month: 12 }
        } else {
            Periodo { year: self.year, month: self.month - 1 }
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Periodo { year: self.year + 1, month: 1 }
        } else {
            Periodo { year: self.year, month: self.month + 1 }
        }
    }

    pub fn range(self) -> DateRange {
        DateRange::new(self.first_day(), self.last_day())
    }
}

impl fmt::Display for Periodo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Periodo {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (y, m) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| CoreError::InvalidPeriod(s.to_string()))?;
        let year = y
            .parse::<i32>()
            .map_err(|_| CoreError::InvalidPeriod(s.to_string()))?;
        let month = m
            .parse::<u32>()
            .map_err(|_| CoreError::InvalidPeriod(s.to_string()))?;
        Periodo::new(year, month)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    /// January 1st of `today`'s year through `today`, the dashboard's initial range.
    pub fn year_to_date(today: NaiveDate) -> Self {
        let start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
        DateRange { start, end: today }
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn is_valid(self) -> bool {
        self.start <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn periodo_rejects_bad_month() {
        assert!(matches!(Periodo::new(2024, 0), Err(CoreError::InvalidMonth(0))));
        assert!(matches!(Periodo::new(2024, 13), Err(CoreError::InvalidMonth(13))));
        assert!(Periodo::new(2024, 12).is_ok());
    }

    #[test]
    fn periodo_display_and_parse() {
        let p = Periodo::new(2024, 3).unwrap();
        assert_eq!(p.to_string(), "2024-03");
        assert_eq!("2024-03".parse::<Periodo>().unwrap(), p);
        assert!("2024/03".parse::<Periodo>().is_err());
        assert!("2024-13".parse::<Periodo>().is_err());
    }

    #[test]
    fn last_day_handles_leap_years_and_december() {
        assert_eq!(Periodo::new(2024, 2).unwrap().last_day(), date(2024, 2, 29));
        assert_eq!(Periodo::new(2023, 2).unwrap().last_day(), date(2023, 2, 28));
        assert_eq!(Periodo::new(2024, 12).unwrap().last_day(), date(2024, 12, 31));
    }

    #[test]
    fn previous_and_next_wrap_years() {
        let jan = Periodo::new(2024, 1).unwrap();
        assert_eq!(jan.previous(), Periodo::new(2023, 12).unwrap());
        assert_eq!(jan.previous().next(), jan);
    }

    #[test]
    fn containing_date() {
        assert_eq!(Periodo::containing(date(2024, 3, 17)), Periodo::new(2024, 3).unwrap());
    }

    #[test]
    fn date_range_contains_inclusive() {
        let range = Periodo::new(2024, 3).unwrap().range();
        assert!(range.contains(date(2024, 3, 1)));
        assert!(range.contains(date(2024, 3, 31)));
        assert!(!range.contains(date(2024, 4, 1)));
        assert_eq!(range.to_string(), "2024-03-01 to 2024-03-31");
    }

    #[test]
    fn year_to_date_starts_in_january() {
        let range = DateRange::year_to_date(date(2024, 6, 15));
        assert_eq!(range.start, date(2024, 1, 1));
        assert_eq!(range.end, date(2024, 6, 15));
        assert!(range.is_valid());
        assert!(!DateRange::new(date(2024, 2, 1), date(2024, 1, 1)).is_valid());
    }

    #[test]
    fn deserialize_validates_month() {
        let ok: Periodo = serde_json::from_str(r#"{"year": 2024, "month": 3}"#).unwrap();
        assert_eq!(ok, Periodo::new(2024, 3).unwrap());
        let err = serde_json::from_str::<Periodo>(r#"{"year": 2024, "month": 13}"#).unwrap_err();
        assert!(err.to_string().contains("Invalid month: 13"));
    }
}
