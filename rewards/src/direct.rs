//! Direct/indirect (L1/L2) bonus.
//!
//! Paid unconditionally to the first upline levels as a percentage of the
//! daily yield — no rank gate, no unlock gate, no cap.

use std::sync::Arc;

use canopy_ledger::{CurrencyLedger, RewardRouting};
use canopy_ranks::find_upline;
use canopy_store::{AccountStore, EntryKind, Notifier, NotifyCategory};
use canopy_types::{AccountId, Amount, StakeId, Timestamp};
use serde_json::json;

use crate::RewardError;

pub struct DirectBonus {
    accounts: Arc<dyn AccountStore + Send + Sync>,
    ledger: CurrencyLedger,
    notifier: Arc<dyn Notifier>,
    /// Rate per upline level, index 0 = level 1. Production: [15, 10].
    rates_pct: Vec<f64>,
}

impl DirectBonus {
    pub fn new(
        accounts: Arc<dyn AccountStore + Send + Sync>,
        ledger: CurrencyLedger,
        notifier: Arc<dyn Notifier>,
        rates_pct: Vec<f64>,
    ) -> Self {
        Self {
            accounts,
            ledger,
            notifier,
            rates_pct,
        }
    }

    /// Pay the level bonuses for one stake's daily yield. Returns the total
    /// paid across all levels.
    pub fn distribute(
        &self,
        routing: &RewardRouting,
        staker: AccountId,
        stake: StakeId,
        daily_yield: Amount,
        now: Timestamp,
    ) -> Result<Amount, RewardError> {
        let upline = find_upline(
            self.accounts.as_ref(),
            staker,
            self.rates_pct.len() as u32,
        )?;
        let mut total = Amount::ZERO;

        for (ancestor, level) in upline {
            let rate = self.rates_pct[level as usize - 1];
            let bonus = daily_yield.pct(rate).round2();
            if !bonus.is_positive() {
                continue;
            }
            self.ledger.credit_reward(
                routing,
                ancestor,
                bonus,
                EntryKind::DirectBonus { level },
                Some(stake),
                now,
            )?;
            self.notifier.notify(
                ancestor,
                NotifyCategory::Commission,
                "Referral bonus",
                &format!("Level {} bonus of {} from {}", level, bonus, staker),
                "bonus",
                json!({ "level": level, "amount": bonus.value(), "source": staker.raw() }),
            );
            total += bonus;
        }
        Ok(total)
    }
}
