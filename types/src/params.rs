//! Compensation parameters — every tunable knob of the engine.
//!
//! Loaded from the configuration store (TOML in practice) and snapshotted
//! once per distribution run so a mid-run change can never produce
//! inconsistent per-level treatment.

use serde::{Deserialize, Serialize};

use crate::Amount;

/// A purchasable stake plan: lock for `days`, accrue `daily_rate_pct` per day.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CyclePlan {
    pub days: u32,
    pub daily_rate_pct: f64,
}

/// All compensation parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompParams {
    /// Hard ceiling for every upward tree walk (volume propagation, rank
    /// re-evaluation, upline collection). Exceeding it truncates the walk
    /// and logs a data-integrity warning.
    #[serde(default = "default_max_tree_depth")]
    pub max_tree_depth: u32,

    /// Direct/indirect bonus rates paid unconditionally to the first upline
    /// levels, as a percentage of the daily yield. Index 0 is level 1.
    #[serde(default = "default_direct_bonus_rates")]
    pub direct_bonus_rates_pct: Vec<f64>,

    /// Unilevel commission rates for levels 1..=10, as a percentage of the
    /// daily yield. The ten entries sum to 16%.
    #[serde(default = "default_unilevel_rates")]
    pub unilevel_rates_pct: Vec<f64>,

    /// Stake plans available for purchase.
    #[serde(default = "default_cycle_plans")]
    pub cycle_plans: Vec<CyclePlan>,

    /// When true, all distribution credits land in the internal point unit
    /// instead of the withdrawable unit.
    #[serde(default)]
    pub pay_in_points: bool,

    /// Withdrawable units received per point on an explicit swap.
    #[serde(default = "default_swap_rate")]
    pub swap_rate: f64,

    /// Minimum point amount accepted for a swap.
    #[serde(default = "default_min_swap")]
    pub min_swap: f64,

    /// Slack for rounded balance comparisons.
    #[serde(default = "default_amount_epsilon")]
    pub amount_epsilon: f64,

    /// Global pause flags supplied by the configuration store.
    #[serde(default)]
    pub staking_paused: bool,

    #[serde(default)]
    pub withdrawals_paused: bool,

    #[serde(default = "default_true")]
    pub referral_bonuses_enabled: bool,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_max_tree_depth() -> u32 {
    50
}

fn default_direct_bonus_rates() -> Vec<f64> {
    vec![15.0, 10.0]
}

fn default_unilevel_rates() -> Vec<f64> {
    vec![3.0, 2.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 3.0]
}

fn default_cycle_plans() -> Vec<CyclePlan> {
    vec![
        CyclePlan { days: 30, daily_rate_pct: 1.0 },
        CyclePlan { days: 60, daily_rate_pct: 1.2 },
        CyclePlan { days: 90, daily_rate_pct: 1.5 },
        CyclePlan { days: 180, daily_rate_pct: 2.0 },
    ]
}

fn default_swap_rate() -> f64 {
    1.0
}

fn default_min_swap() -> f64 {
    10.0
}

fn default_amount_epsilon() -> f64 {
    1e-6
}

fn default_true() -> bool {
    true
}

// ── Impl ───────────────────────────────────────────────────────────────

impl CompParams {
    /// Look up the plan for a cycle length, if it is offered.
    pub fn plan_for(&self, days: u32) -> Option<&CyclePlan> {
        self.cycle_plans.iter().find(|p| p.days == days)
    }

    /// Unilevel rate for a 1-based level, if within the table.
    pub fn unilevel_rate(&self, level: u32) -> Option<f64> {
        if level == 0 {
            return None;
        }
        self.unilevel_rates_pct.get(level as usize - 1).copied()
    }

    /// Number of unilevel levels the rate table covers.
    pub fn unilevel_max_levels(&self) -> u32 {
        self.unilevel_rates_pct.len() as u32
    }

    pub fn min_swap_amount(&self) -> Amount {
        Amount::new(self.min_swap)
    }
}

impl Default for CompParams {
    fn default() -> Self {
        Self {
            max_tree_depth: default_max_tree_depth(),
            direct_bonus_rates_pct: default_direct_bonus_rates(),
            unilevel_rates_pct: default_unilevel_rates(),
            cycle_plans: default_cycle_plans(),
            pay_in_points: false,
            swap_rate: default_swap_rate(),
            min_swap: default_min_swap(),
            amount_epsilon: default_amount_epsilon(),
            staking_paused: false,
            withdrawals_paused: false,
            referral_bonuses_enabled: default_true(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_unilevel_rates_sum_to_sixteen_percent() {
        let params = CompParams::default();
        let total: f64 = params.unilevel_rates_pct.iter().sum();
        assert_eq!(total, 16.0);
        assert_eq!(params.unilevel_max_levels(), 10);
    }

    #[test]
    fn plan_lookup_by_cycle_length() {
        let params = CompParams::default();
        assert_eq!(params.plan_for(30).unwrap().daily_rate_pct, 1.0);
        assert!(params.plan_for(45).is_none());
    }

    #[test]
    fn unilevel_rate_is_one_based() {
        let params = CompParams::default();
        assert_eq!(params.unilevel_rate(0), None);
        assert_eq!(params.unilevel_rate(1), Some(3.0));
        assert_eq!(params.unilevel_rate(10), Some(3.0));
        assert_eq!(params.unilevel_rate(11), None);
    }
}
