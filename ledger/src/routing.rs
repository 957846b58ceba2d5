//! Currency abstraction — where distribution credits land.
//!
//! One toggle decides whether the cascade's credits go to the withdrawable
//! unit or the internal point unit. Amounts are computed upstream and never
//! change here; only the destination balance and entry currency do.

use canopy_types::{Amount, CompParams, Currency};

/// Per-run snapshot of the currency abstraction settings.
#[derive(Clone, Copy, Debug)]
pub struct RewardRouting {
    /// When true, all distribution credits land in the point unit.
    pub pay_in_points: bool,
    /// Withdrawable units received per point on an explicit swap.
    pub swap_rate: f64,
    /// Minimum point amount accepted for a swap.
    pub min_swap: Amount,
}

impl RewardRouting {
    pub fn from_params(params: &CompParams) -> Self {
        Self {
            pay_in_points: params.pay_in_points,
            swap_rate: params.swap_rate,
            min_swap: params.min_swap_amount(),
        }
    }

    /// The unit distribution credits are denominated in under this routing.
    pub fn reward_currency(&self) -> Currency {
        if self.pay_in_points {
            Currency::Points
        } else {
            Currency::Withdrawable
        }
    }
}

impl Default for RewardRouting {
    fn default() -> Self {
        Self::from_params(&CompParams::default())
    }
}
