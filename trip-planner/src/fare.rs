//! Fare estimation.
//!
//! The fare is a flat per-minute rate applied to the whole minutes of the
//! route duration. Amounts are kept in cents so the two-decimal rounding is
//! exact rather than a float artefact.

use std::fmt;

use serde::{Serialize, Serializer};

/// Per-minute price in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FareRate {
    cents_per_minute: u64,
}

impl FareRate {
    pub const fn from_cents_per_minute(cents: u64) -> Self {
        Self {
            cents_per_minute: cents,
        }
    }

    pub fn cents_per_minute(&self) -> u64 {
        self.cents_per_minute
    }
}

impl Default for FareRate {
    /// 1.23 per minute.
    fn default() -> Self {
        Self::from_cents_per_minute(123)
    }
}

/// An estimated fare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FareEstimate {
    cents: u64,
}

impl FareEstimate {
    pub fn from_cents(cents: u64) -> Self {
        Self { cents }
    }

    pub fn cents(&self) -> u64 {
        self.cents
    }

    /// The fare in major currency units.
    pub fn amount(&self) -> f64 {
        self.cents as f64 / 100.0
    }
}

impl fmt::Display for FareEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.cents / 100, self.cents % 100)
    }
}

impl Serialize for FareEstimate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Whole minutes in a duration. Negative and NaN durations count as zero.
pub fn whole_minutes(duration_seconds: f64) -> u64 {
    // Float-to-int `as` saturates and maps NaN to 0.
    (duration_seconds / 60.0).floor() as u64
}

/// Estimate the fare for a route of the given duration.
///
/// # Examples
///
/// ```
/// use trip_planner::fare::{FareRate, estimate_fare};
///
/// let fare = estimate_fare(125.0, FareRate::default());
/// assert_eq!(fare.to_string(), "2.46");
/// ```
pub fn estimate_fare(duration_seconds: f64, rate: FareRate) -> FareEstimate {
    let minutes = whole_minutes(duration_seconds);
    FareEstimate::from_cents(minutes.saturating_mul(rate.cents_per_minute))
}
