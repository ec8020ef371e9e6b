//! Accounting periods: calendar-month keys used to bucket ledger rows.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Utc};
use serde::{Serialize, Serializer};

use crate::error::CoreError;
use crate::types::Timestamp;

/// A calendar month in UTC, rendered as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountingPeriod {
    year: i32,
    month: u32,
}

impl AccountingPeriod {
    /// Build a period, rejecting months outside `1..=12` and years that do
    /// not fit in four digits.
    pub fn new(year: i32, month: u32) -> Result<Self, CoreError> {
        if !(1..=12).contains(&month) {
            return Err(CoreError::Validation(format!(
                "Invalid accounting month {month}. Must be between 1 and 12"
            )));
        }
        if !(0..=9999).contains(&year) {
            return Err(CoreError::Validation(format!(
                "Invalid accounting year {year}. Must be between 0 and 9999"
            )));
        }
        Ok(Self { year, month })
    }

    /// The period containing `at`.
    pub fn containing(at: Timestamp) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
        }
    }

    /// The period containing the current wall-clock instant.
    pub fn current() -> Self {
        Self::containing(Utc::now())
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    /// The period immediately after this one.
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl fmt::Display for AccountingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for AccountingPeriod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid =
            || CoreError::Validation(format!("Invalid accounting period '{s}'. Expected YYYY-MM"));

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

impl Serialize for AccountingPeriod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
