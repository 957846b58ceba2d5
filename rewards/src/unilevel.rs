//! 10-level unilevel commission with progressive unlock.
//!
//! Each ancestor's unlocked-level count is recomputed at payout time; a
//! locked level pays nothing at all — unlike the rank-bonus cap there is no
//! partial credit. Every paid level also writes one commission history row
//! with reporting buckets.

use std::sync::Arc;

use canopy_ledger::{CurrencyLedger, RewardRouting};
use canopy_ranks::find_upline;
use canopy_store::{
    AccountStore, CommissionRecord, CommissionStore, EntryKind, Notifier, NotifyCategory,
    ReportBuckets, StakeStore,
};
use canopy_types::{AccountId, Amount, StakeId, Timestamp};
use serde_json::json;

use crate::unlock::refresh_unlock_state;
use crate::RewardError;

pub struct UnilevelDistributor {
    accounts: Arc<dyn AccountStore + Send + Sync>,
    stakes: Arc<dyn StakeStore + Send + Sync>,
    commissions: Arc<dyn CommissionStore + Send + Sync>,
    ledger: CurrencyLedger,
    notifier: Arc<dyn Notifier>,
    /// Rate per level, index 0 = level 1. Production: ten entries summing
    /// to 16%.
    rates_pct: Vec<f64>,
}

impl UnilevelDistributor {
    pub fn new(
        accounts: Arc<dyn AccountStore + Send + Sync>,
        stakes: Arc<dyn StakeStore + Send + Sync>,
        commissions: Arc<dyn CommissionStore + Send + Sync>,
        ledger: CurrencyLedger,
        notifier: Arc<dyn Notifier>,
        rates_pct: Vec<f64>,
    ) -> Self {
        Self {
            accounts,
            stakes,
            commissions,
            ledger,
            notifier,
            rates_pct,
        }
    }

    /// Distribute unilevel commissions for one stake's daily yield across
    /// up to ten upline levels. Returns the total paid.
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
        let buckets = ReportBuckets::from_timestamp(now);
        let mut total = Amount::ZERO;

        for (ancestor, level) in upline {
            let (_, unlocked) =
                refresh_unlock_state(self.accounts.as_ref(), self.stakes.as_ref(), ancestor)?;
            // A locked level pays nothing — no partial credit.
            if level > unlocked as u32 {
                continue;
            }
            let rate = self.rates_pct[level as usize - 1];
            let commission = daily_yield.pct(rate).round2();
            if !commission.is_positive() {
                continue;
            }
            self.ledger.credit_reward(
                routing,
                ancestor,
                commission,
                EntryKind::UnilevelCommission {
                    level,
                    rate_pct: rate,
                },
                Some(stake),
                now,
            )?;
            self.commissions.append_commission(&CommissionRecord {
                account: ancestor,
                source_account: staker,
                stake,
                level,
                rate_pct: rate,
                source_yield: daily_yield,
                commission,
                buckets: buckets.clone(),
                created_at: now,
            })?;
            self.notifier.notify(
                ancestor,
                NotifyCategory::Commission,
                "Unilevel commission",
                &format!("Level {} commission of {} from {}", level, commission, staker),
                "commission",
                json!({ "level": level, "amount": commission.value(), "source": staker.raw() }),
            );
            total += commission;
        }
        Ok(total)
    }
}
