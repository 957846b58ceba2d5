//! Monetary amount type shared by both currency units.
//!
//! Amounts are `f64` values rounded to two decimals at every credit/debit
//! boundary. Repeated fractional credits accumulate rounding drift, so
//! "sufficient balance" comparisons always go through [`Amount::approx_ge`]
//! (round to two decimals, then allow a small epsilon) instead of exact
//! comparison.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};

/// A monetary amount in either the withdrawable or the internal point unit.
///
/// May be negative when used as a signed delta (ledger entries, team-volume
/// deltas); balances and volumes themselves are kept non-negative by the
/// code paths that maintain them.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount(f64);

impl Amount {
    pub const ZERO: Self = Self(0.0);

    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0.0
    }

    /// Round to two decimal places (cent precision).
    pub fn round2(self) -> Self {
        Self((self.0 * 100.0).round() / 100.0)
    }

    /// `self >= other` after rounding both to two decimals, with `epsilon`
    /// of slack for accumulated drift.
    pub fn approx_ge(self, other: Self, epsilon: f64) -> bool {
        self.round2().0 + epsilon >= other.round2().0
    }

    /// Percentage of this amount, e.g. `pct(15.0)` is 15%.
    pub fn pct(self, rate_pct: f64) -> Self {
        Self(self.0 * rate_pct / 100.0)
    }

    /// Scale by a plain multiplier (e.g. a bonus-cap multiplier).
    pub fn scale(self, factor: f64) -> Self {
        Self(self.0 * factor)
    }

    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }

    /// Clamp negative values to zero. Team volume and balances never go
    /// below zero even when a delta would overshoot.
    pub fn clamp_floor_zero(self) -> Self {
        if self.0 < 0.0 {
            Self::ZERO
        } else {
            self
        }
    }
}

impl Add for Amount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Amount {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Amount {
    type Output = Self;
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, a| acc + a)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_truncates_to_cents() {
        assert_eq!(Amount::new(1.006).round2(), Amount::new(1.01));
        assert_eq!(Amount::new(0.333).round2(), Amount::new(0.33));
        assert_eq!(Amount::new(-0.336).round2(), Amount::new(-0.34));
    }

    #[test]
    fn approx_ge_tolerates_drift() {
        // A balance built from repeated 0.1 credits drifts below the exact sum.
        let mut balance = Amount::ZERO;
        for _ in 0..30 {
            balance += Amount::new(0.1);
        }
        assert!(balance.approx_ge(Amount::new(3.0), 1e-6));
        assert!(!balance.approx_ge(Amount::new(3.02), 1e-6));
    }

    #[test]
    fn pct_computes_percentage() {
        assert_eq!(Amount::new(100.0).pct(15.0), Amount::new(15.0));
        assert_eq!(Amount::new(100.0).pct(1.0), Amount::new(1.0));
    }

    #[test]
    fn clamp_floor_zero_only_affects_negatives() {
        assert_eq!(Amount::new(-5.0).clamp_floor_zero(), Amount::ZERO);
        assert_eq!(Amount::new(5.0).clamp_floor_zero(), Amount::new(5.0));
    }
}
