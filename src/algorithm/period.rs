//! Calendar period buckets
//!
//! Records are grouped by the calendar month or quarter of their enrollment
//! date. Keys order chronologically, so sorting a set of keys yields the
//! chart axis directly.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::SurveillanceError;

/// Time granularity of a period series
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// Calendar months
    #[default]
    Monthly,
    /// Calendar quarters
    Quarterly,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monthly => write!(f, "monthly"),
            Self::Quarterly => write!(f, "quarterly"),
        }
    }
}

impl FromStr for Granularity {
    type Err = SurveillanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" | "month" | "m" => Ok(Self::Monthly),
            "quarterly" | "quarter" | "q" => Ok(Self::Quarterly),
            other => Err(SurveillanceError::InvalidArgument(format!(
                "Unknown granularity: {other}"
            ))),
        }
    }
}

/// A calendar period bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PeriodKey {
    /// Monthly period (e.g., 2024-01)
    Month(i32, u32), // year, month
    /// Quarterly period (e.g., 2024Q1)
    Quarter(i32, u32), // year, quarter (1-4)
}

impl PeriodKey {
    /// Bucket a date at the given granularity
    #[must_use]
    pub fn from_date(date: NaiveDate, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Monthly => Self::Month(date.year(), date.month()),
            Granularity::Quarterly => Self::Quarter(date.year(), (date.month() - 1) / 3 + 1),
        }
    }

    /// Granularity of this key
    #[must_use]
    pub const fn granularity(&self) -> Granularity {
        match self {
            Self::Month(..) => Granularity::Monthly,
            Self::Quarter(..) => Granularity::Quarterly,
        }
    }

    /// First month of the period as (year, month)
    const fn first_month(&self) -> (i32, u32) {
        match *self {
            Self::Month(year, month) => (year, month),
            Self::Quarter(year, quarter) => (year, quarter.saturating_sub(1) * 3 + 1),
        }
    }

    /// First day of the period
    ///
    /// Keys only come from [`PeriodKey::from_date`] or a validated parse, so
    /// the fallback is never hit in practice.
    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        let (year, month) = self.first_month();
        NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last day of the period (inclusive)
    #[must_use]
    pub fn end_date(&self) -> NaiveDate {
        let (year, month) = self.first_month();
        let span = match self {
            Self::Month(..) => 1,
            Self::Quarter(..) => 3,
        };
        let next = month + span;
        let (next_year, next_month) = if next > 12 {
            (year + 1, next - 12)
        } else {
            (year, next)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    /// Check if this period contains the given date
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date() <= date && date <= self.end_date()
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Month(year, month) => write!(f, "{year}-{month:02}"),
            Self::Quarter(year, quarter) => write!(f, "{year}Q{quarter}"),
        }
    }
}

impl Serialize for PeriodKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromStr for PeriodKey {
    type Err = SurveillanceError;

    /// Parse a period key
    ///
    /// Supported formats:
    /// - "2024-01" / "202401" - Year and month
    /// - "2024Q1" / "2024-Q1" - Year and quarter
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SurveillanceError::InvalidArgument(format!("Invalid period: {s}"));
        let trimmed = s.trim();

        let year_part = trimmed.get(..4).ok_or_else(invalid)?;
        if !year_part.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let year = year_part.parse::<i32>().map_err(|_| invalid())?;
        let rest = &trimmed[4..];
        let rest = rest.strip_prefix('-').unwrap_or(rest);

        if let Some(quarter) = rest.strip_prefix(['Q', 'q']) {
            let quarter = quarter.parse::<u32>().map_err(|_| invalid())?;
            if !(1..=4).contains(&quarter) {
                return Err(SurveillanceError::InvalidArgument(format!(
                    "Invalid quarter: {quarter}"
                )));
            }
            return Ok(Self::Quarter(year, quarter));
        }

        if rest.len() != 2 || !rest.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let month = rest.parse::<u32>().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(SurveillanceError::InvalidArgument(format!(
                "Invalid month: {month}"
            )));
        }
        Ok(Self::Month(year, month))
    }
}
