//! Rank-gated bonus under a dynamic cap.
//!
//! The cap is proportional to the sponsor's currently staked capital, not a
//! fixed ceiling: staking more raises it immediately, while an expiring
//! stake lowers future caps without clawing back bonus already paid. Hitting
//! the cap is a clamp, not a rejection — a bonus can be partially paid.

use std::sync::Arc;

use canopy_ledger::{CurrencyLedger, RewardRouting};
use canopy_ranks::RankRuleTable;
use canopy_store::{AccountStore, EntryKind, Notifier, NotifyCategory, StakeStore};
use canopy_types::{AccountId, Amount, StakeId, Timestamp};
use serde_json::json;

use crate::RewardError;

/// What happened to one rank-bonus distribution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RankBonusOutcome {
    /// No sponsor, sponsor at the entry tier, or zero nominal bonus.
    None,
    /// Cap already exhausted — nothing paid.
    CapReached,
    /// Clamped to the remaining headroom.
    Partial(Amount),
    /// Full nominal bonus paid.
    Paid(Amount),
}

impl RankBonusOutcome {
    pub fn paid(&self) -> Amount {
        match self {
            RankBonusOutcome::Partial(a) | RankBonusOutcome::Paid(a) => *a,
            _ => Amount::ZERO,
        }
    }
}

pub struct RankBonusLedger {
    accounts: Arc<dyn AccountStore + Send + Sync>,
    stakes: Arc<dyn StakeStore + Send + Sync>,
    ledger: CurrencyLedger,
    notifier: Arc<dyn Notifier>,
    table: RankRuleTable,
    epsilon: f64,
}

impl RankBonusLedger {
    pub fn new(
        accounts: Arc<dyn AccountStore + Send + Sync>,
        stakes: Arc<dyn StakeStore + Send + Sync>,
        ledger: CurrencyLedger,
        notifier: Arc<dyn Notifier>,
        table: RankRuleTable,
        epsilon: f64,
    ) -> Self {
        Self {
            accounts,
            stakes,
            ledger,
            notifier,
            table,
            epsilon,
        }
    }

    fn active_principal(&self, account: AccountId) -> Result<Amount, RewardError> {
        Ok(self
            .stakes
            .active_stakes_for(account)?
            .into_iter()
            .map(|s| s.principal)
            .sum())
    }

    /// Pay the rank bonus for one stake's daily yield to the staker's
    /// direct sponsor, clamped against the sponsor's current cap.
    pub fn distribute(
        &self,
        routing: &RewardRouting,
        staker: AccountId,
        stake: StakeId,
        daily_yield: Amount,
        now: Timestamp,
    ) -> Result<RankBonusOutcome, RewardError> {
        let sponsor_id = match self.accounts.get_account(staker)?.referrer {
            Some(id) => id,
            None => return Ok(RankBonusOutcome::None),
        };
        let mut sponsor = self.accounts.get_account(sponsor_id)?;
        if sponsor.tier == self.table.lowest().tier {
            return Ok(RankBonusOutcome::None);
        }
        let rule = self
            .table
            .rule_for(&sponsor.tier)
            .ok_or_else(|| RewardError::RuleNotFound(sponsor.tier.to_string()))?;

        let cap = self
            .active_principal(sponsor_id)?
            .scale(rule.cap_multiplier)
            .round2();
        let remaining = (cap - sponsor.rank_bonus_received).round2();

        if !remaining.is_positive() || remaining.value() <= self.epsilon {
            if !sponsor.cap_notified {
                sponsor.cap_notified = true;
                self.accounts.put_account(&sponsor)?;
                self.notifier.notify(
                    sponsor_id,
                    NotifyCategory::BonusCap,
                    "Bonus cap reached",
                    "Your rank bonus cap is exhausted. Stake more to raise it.",
                    "cap",
                    json!({ "cap": cap.value() }),
                );
            }
            return Ok(RankBonusOutcome::CapReached);
        }

        let nominal = daily_yield.pct(rule.commission_rate_pct).round2();
        if !nominal.is_positive() {
            return Ok(RankBonusOutcome::None);
        }
        let paid = nominal.min(remaining);

        self.ledger.credit_reward(
            routing,
            sponsor_id,
            paid,
            EntryKind::RankBonus,
            Some(stake),
            now,
        )?;
        sponsor.rank_bonus_received = (sponsor.rank_bonus_received + paid).round2();

        let outcome = if paid < nominal {
            // This payment consumed the last headroom; the crossing is
            // notified here, not again by the zero-pay branch.
            sponsor.cap_notified = true;
            self.notifier.notify(
                sponsor_id,
                NotifyCategory::BonusCap,
                "Bonus partially paid",
                &format!(
                    "Rank bonus clamped to {} of {} — cap reached",
                    paid, nominal
                ),
                "cap",
                json!({ "paid": paid.value(), "nominal": nominal.value() }),
            );
            RankBonusOutcome::Partial(paid)
        } else {
            // Headroom exists again (e.g. new stake raised the cap).
            sponsor.cap_notified = false;
            self.notifier.notify(
                sponsor_id,
                NotifyCategory::RankBonus,
                "Rank bonus paid",
                &format!("Rank bonus of {} from {}", paid, staker),
                "bonus",
                json!({ "amount": paid.value(), "source": staker.raw() }),
            );
            RankBonusOutcome::Paid(paid)
        };
        self.accounts.put_account(&sponsor)?;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_nullables::{MemoryStore, RecordingNotifier};
    use canopy_ranks::RankRule;
    use canopy_store::{AccountRecord, StakeRecord};
    use canopy_types::{Currency, TierId, Timestamp};

    /// Two-tier table: entry tier plus one paying tier at 10% with a 2.0
    /// cap multiplier.
    fn test_table() -> RankRuleTable {
        RankRuleTable::new(vec![
            RankRule {
                tier: TierId::new("B0"),
                min_team_volume: Amount::ZERO,
                min_directs: 0,
                structural: None,
                commission_rate_pct: 0.0,
                cap_multiplier: 0.0,
            },
            RankRule {
                tier: TierId::new("B1"),
                min_team_volume: Amount::new(1_000.0),
                min_directs: 2,
                structural: None,
                commission_rate_pct: 10.0,
                cap_multiplier: 2.0,
            },
        ])
        .unwrap()
    }

    struct Fixture {
        store: Arc<MemoryStore>,
        notifier: Arc<RecordingNotifier>,
        bonus: RankBonusLedger,
        ledger: CurrencyLedger,
    }

    /// Sponsor 1 (tier B1, one active 200 stake) sponsors staker 2.
    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let ledger = CurrencyLedger::new(store.clone(), store.clone(), 1e-6);
        let bonus = RankBonusLedger::new(
            store.clone(),
            store.clone(),
            ledger.clone(),
            notifier.clone(),
            test_table(),
            1e-6,
        );

        let mut sponsor = AccountRecord::new(
            AccountId::new(1),
            None,
            TierId::new("B1"),
            Timestamp::new(0),
        );
        sponsor.direct_count = 1;
        store.put_account(&sponsor).unwrap();
        store
            .put_account(&AccountRecord::new(
                AccountId::new(2),
                Some(AccountId::new(1)),
                TierId::new("B0"),
                Timestamp::new(0),
            ))
            .unwrap();
        store
            .put_stake(&StakeRecord::new(
                StakeId::new(10),
                AccountId::new(1),
                Amount::new(200.0),
                30,
                1.0,
                Timestamp::new(0),
            ))
            .unwrap();

        Fixture {
            store,
            notifier,
            bonus,
            ledger,
        }
    }

    fn distribute(f: &Fixture, daily_yield: f64) -> RankBonusOutcome {
        f.bonus
            .distribute(
                &RewardRouting::default(),
                AccountId::new(2),
                StakeId::new(99),
                Amount::new(daily_yield),
                Timestamp::new(1_000),
            )
            .unwrap()
    }

    #[test]
    fn full_bonus_within_cap() {
        let f = fixture();
        // cap = 200 × 2 = 400; nominal = 10% of 50 = 5.
        let outcome = distribute(&f, 50.0);
        assert_eq!(outcome, RankBonusOutcome::Paid(Amount::new(5.0)));
        assert_eq!(
            f.ledger.balance(AccountId::new(1), Currency::Withdrawable).unwrap(),
            Amount::new(5.0)
        );
        assert_eq!(
            f.store.get_account(AccountId::new(1)).unwrap().rank_bonus_received,
            Amount::new(5.0)
        );
    }

    #[test]
    fn exhausted_cap_pays_nothing_and_notifies_once() {
        let f = fixture();
        // Lifetime already at the cap of 400.
        let mut sponsor = f.store.get_account(AccountId::new(1)).unwrap();
        sponsor.rank_bonus_received = Amount::new(400.0);
        f.store.put_account(&sponsor).unwrap();

        assert_eq!(distribute(&f, 50.0), RankBonusOutcome::CapReached);
        assert_eq!(distribute(&f, 50.0), RankBonusOutcome::CapReached);
        assert_eq!(
            f.notifier
                .for_account(AccountId::new(1), NotifyCategory::BonusCap)
                .len(),
            1
        );
        assert_eq!(
            f.store.get_account(AccountId::new(1)).unwrap().rank_bonus_received,
            Amount::new(400.0)
        );
    }

    #[test]
    fn partial_clamp_pays_remaining_headroom_exactly() {
        let f = fixture();
        // cap 400, lifetime 370 → remaining 30; nominal = 10% of 500 = 50.
        let mut sponsor = f.store.get_account(AccountId::new(1)).unwrap();
        sponsor.rank_bonus_received = Amount::new(370.0);
        f.store.put_account(&sponsor).unwrap();

        let outcome = distribute(&f, 500.0);
        assert_eq!(outcome, RankBonusOutcome::Partial(Amount::new(30.0)));
        let sponsor = f.store.get_account(AccountId::new(1)).unwrap();
        // Lifetime grew by the clamped 30, not the nominal 50.
        assert_eq!(sponsor.rank_bonus_received, Amount::new(400.0));
        assert!(sponsor.cap_notified);
    }

    #[test]
    fn entry_tier_sponsor_receives_nothing() {
        let f = fixture();
        let mut sponsor = f.store.get_account(AccountId::new(1)).unwrap();
        sponsor.tier = TierId::new("B0");
        f.store.put_account(&sponsor).unwrap();

        assert_eq!(distribute(&f, 50.0), RankBonusOutcome::None);
        assert_eq!(
            f.ledger.balance(AccountId::new(1), Currency::Withdrawable).unwrap(),
            Amount::ZERO
        );
    }

    #[test]
    fn rootless_staker_pays_no_bonus() {
        let f = fixture();
        let outcome = f
            .bonus
            .distribute(
                &RewardRouting::default(),
                AccountId::new(1), // the root — no sponsor
                StakeId::new(99),
                Amount::new(50.0),
                Timestamp::new(1_000),
            )
            .unwrap();
        assert_eq!(outcome, RankBonusOutcome::None);
    }

    #[test]
    fn new_stake_raises_cap_and_clears_latch() {
        let f = fixture();
        let mut sponsor = f.store.get_account(AccountId::new(1)).unwrap();
        sponsor.rank_bonus_received = Amount::new(400.0);
        f.store.put_account(&sponsor).unwrap();
        assert_eq!(distribute(&f, 50.0), RankBonusOutcome::CapReached);
        assert!(f.store.get_account(AccountId::new(1)).unwrap().cap_notified);

        // Sponsor stakes another 100 → cap rises to 600, bonus flows again.
        f.store
            .put_stake(&StakeRecord::new(
                StakeId::new(11),
                AccountId::new(1),
                Amount::new(100.0),
                30,
                1.0,
                Timestamp::new(0),
            ))
            .unwrap();
        assert_eq!(distribute(&f, 50.0), RankBonusOutcome::Paid(Amount::new(5.0)));
        assert!(!f.store.get_account(AccountId::new(1)).unwrap().cap_notified);
    }
}
