//! Fixed-point money amounts.
//!
//! Amounts are stored as a signed count of micro-units (1e-6 of the
//! currency unit) so that sub-cent per-stream rates stay exact. The
//! database columns holding money are `BIGINT` micro-unit counts.

use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::CoreError;

/// Micro-units per whole currency unit.
pub const MICROS_PER_UNIT: i64 = 1_000_000;

/// Number of fractional digits a [`Money`] value can carry.
const MAX_FRACTION_DIGITS: usize = 6;

/// Minimum number of fractional digits rendered by [`Money`]'s `Display`.
const MIN_DISPLAY_DIGITS: usize = 2;

/// A money amount in micro-units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Build an amount from a raw micro-unit count.
    pub const fn from_micros(micros: i64) -> Self {
        Self(micros)
    }

    /// Build an amount from whole cents.
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents.saturating_mul(MICROS_PER_UNIT / 100))
    }

    /// The raw micro-unit count, as persisted.
    pub const fn micros(self) -> i64 {
        self.0
    }

    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Multiply by a non-negative count, saturating at the `i64` bounds.
    pub fn saturating_mul(self, count: i64) -> Money {
        Money(self.0.saturating_mul(count))
    }
}

impl From<i64> for Money {
    fn from(micros: i64) -> Self {
        Self(micros)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Money::saturating_add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let whole = abs / MICROS_PER_UNIT as u64;
        let frac = abs % MICROS_PER_UNIT as u64;

        let mut digits = format!("{frac:06}");
        while digits.len() > MIN_DISPLAY_DIGITS && digits.ends_with('0') {
            digits.pop();
        }
        write!(f, "{sign}{whole}.{digits}")
    }
}

impl FromStr for Money {
    type Err = CoreError;

    /// Parse a plain decimal string such as `"0.01"`, `"12"` or `"-3.5"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::Validation(format!("Invalid money amount '{s}'"));

        let trimmed = s.trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (whole, frac) = body.split_once('.').unwrap_or((body, ""));

        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }
        if frac.len() > MAX_FRACTION_DIGITS {
            return Err(CoreError::Validation(format!(
                "Money amount '{s}' has more than {MAX_FRACTION_DIGITS} fractional digits"
            )));
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let frac_micros: i64 = if frac.is_empty() {
            0
        } else {
            let padded = format!("{frac:0<width$}", width = MAX_FRACTION_DIGITS);
            padded.parse().map_err(|_| invalid())?
        };

        let micros = whole
            .checked_mul(MICROS_PER_UNIT)
            .and_then(|m| m.checked_add(frac_micros))
            .ok_or_else(invalid)?;

        Ok(Money(if negative { -micros } else { micros }))
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_pads_to_two_decimals() {
        assert_eq!(Money::from_cents(100).to_string(), "1.00");
        assert_eq!(Money::from_cents(250).to_string(), "2.50");
        assert_eq!(Money::ZERO.to_string(), "0.00");
    }

    #[test]
    fn display_keeps_sub_cent_precision() {
        assert_eq!(Money::from_micros(3_500).to_string(), "0.0035");
        assert_eq!(Money::from_micros(1).to_string(), "0.000001");
    }

    #[test]
    fn display_negative() {
        assert_eq!(Money::from_cents(-50).to_string(), "-0.50");
    }

    #[test]
    fn parse_decimal_strings() {
        assert_eq!("0.01".parse::<Money>().unwrap(), Money::from_micros(10_000));
        assert_eq!("12".parse::<Money>().unwrap(), Money::from_cents(1200));
        assert_eq!(".5".parse::<Money>().unwrap(), Money::from_cents(50));
        assert_eq!("-3.5".parse::<Money>().unwrap(), Money::from_cents(-350));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("1.2.3".parse::<Money>().is_err());
        assert!("0.0000001".parse::<Money>().is_err());
    }

    #[test]
    fn sum_saturates() {
        let total: Money = [Money::from_micros(i64::MAX), Money::from_micros(1)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from_micros(i64::MAX));
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_value(Money::from_cents(100)).unwrap();
        assert_eq!(json, serde_json::json!("1.00"));
    }
}
