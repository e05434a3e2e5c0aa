use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::ScheduleError;

/// A calendar month, ordered chronologically.
///
/// Serialized as `{"month": 3, "year": 2024}`; `Display`/`FromStr` use `2024-03`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawYearMonth", into = "RawYearMonth")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

#[derive(Serialize, Deserialize)]
struct RawYearMonth {
    month: u32,
    year: i32,
}

impl TryFrom<RawYearMonth> for YearMonth {
    type Error = ScheduleError;

    fn try_from(raw: RawYearMonth) -> Result<Self, Self::Error> {
        YearMonth::new(raw.year, raw.month)
    }
}

impl From<YearMonth> for RawYearMonth {
    fn from(ym: YearMonth) -> Self {
        RawYearMonth {
            month: ym.month,
            year: ym.year,
        }
    }
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, ScheduleError> {
        if !(1..=12).contains(&month) {
            return Err(ScheduleError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Absolute month number (`year * 12 + month - 1`).
    fn ordinal(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    fn from_ordinal(ordinal: i64) -> Option<Self> {
        let year = i32::try_from(ordinal.div_euclid(12)).ok()?;
        let month = u32::try_from(ordinal.rem_euclid(12)).ok()? + 1;
        Some(Self { year, month })
    }

    /// Whole calendar months from `earlier` to `self`; negative when `self` comes first.
    pub fn months_since(&self, earlier: YearMonth) -> i64 {
        self.ordinal() - earlier.ordinal()
    }

    pub fn plus_months(&self, months: u32) -> Option<Self> {
        Self::from_ordinal(self.ordinal() + i64::from(months))
    }

    pub fn first_day(&self) -> Result<NaiveDate, ScheduleError> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .ok_or_else(|| ScheduleError::DateOutOfRange(self.to_string()))
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ScheduleError::InvalidYearMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.is_empty() || month.len() > 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        YearMonth::new(year, month)
    }
}
