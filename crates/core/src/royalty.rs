//! Per-stream royalty calculation.

use crate::error::CoreError;
use crate::money::Money;

/// Default payout per stream: 0.01 currency units.
pub const DEFAULT_RATE_PER_STREAM: Money = Money::from_micros(10_000);

/// Maps a track's stream count to its royalty amount for the period.
///
/// Negative stream counts are clamped to zero; products beyond the `i64`
/// range saturate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoyaltyCalculator {
    rate: Money,
}

impl RoyaltyCalculator {
    /// Build a calculator with a fixed per-stream rate. The rate must not be
    /// negative.
    pub fn new(rate: Money) -> Result<Self, CoreError> {
        if rate < Money::ZERO {
            return Err(CoreError::Validation(format!(
                "Royalty rate must not be negative, got {rate}"
            )));
        }
        Ok(Self { rate })
    }

    pub fn rate(&self) -> Money {
        self.rate
    }

    /// Royalty owed for `streams` plays.
    pub fn royalty_for(&self, streams: i64) -> Money {
        self.rate.saturating_mul(streams.max(0))
    }
}

impl Default for RoyaltyCalculator {
    fn default() -> Self {
        Self {
            rate: DEFAULT_RATE_PER_STREAM,
        }
    }
}
