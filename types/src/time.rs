//! Timestamp type used throughout the engine.
//!
//! Timestamps are Unix epoch seconds (UTC). Yield idempotency is keyed on
//! the UTC day index, so the daily distribution job can be re-triggered
//! within the same day without double-paying.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds in one UTC day.
pub const SECS_PER_DAY: u64 = 86_400;

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// Get the current system time as a `Timestamp`.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before Unix epoch")
            .as_secs();
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// The UTC day index (days since epoch). Two timestamps share a day
    /// index iff they fall on the same UTC calendar day.
    pub fn day_index(&self) -> u64 {
        self.0 / SECS_PER_DAY
    }

    /// This timestamp advanced by a whole number of days.
    pub fn plus_days(&self, days: u64) -> Self {
        Self(self.0 + days * SECS_PER_DAY)
    }

    /// Seconds elapsed since this timestamp (relative to `now`).
    pub fn elapsed_since(&self, now: Timestamp) -> u64 {
        now.0.saturating_sub(self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}
