//! Stake desk — the synchronous operations participants trigger directly:
//! registration, deposits/withdrawals, stake purchase, and point swaps.
//!
//! Validation failures here are local, synchronous errors surfaced to the
//! caller; nothing is retried.

use std::sync::Arc;

use canopy_ledger::CurrencyLedger;
use canopy_ranks::{RankChange, RankEngine, TeamVolumePropagator};
use canopy_rewards::refresh_unlock_state;
use canopy_store::{
    AccountRecord, AccountStore, EntryKind, MetaStore, Notifier, StakeRecord, StakeStore,
    TransactionStore,
};
use canopy_types::{AccountId, Amount, Currency, StakeId, StakeStatus, Timestamp};

use crate::{EngineError, RunSnapshot};

const NEXT_ACCOUNT_ID_KEY: &str = "next_account_id";
const NEXT_STAKE_ID_KEY: &str = "next_stake_id";

pub struct StakeDesk {
    accounts: Arc<dyn AccountStore + Send + Sync>,
    stakes: Arc<dyn StakeStore + Send + Sync>,
    transactions: Arc<dyn TransactionStore + Send + Sync>,
    meta: Arc<dyn MetaStore + Send + Sync>,
    notifier: Arc<dyn Notifier>,
}

impl StakeDesk {
    pub fn new(
        accounts: Arc<dyn AccountStore + Send + Sync>,
        stakes: Arc<dyn StakeStore + Send + Sync>,
        transactions: Arc<dyn TransactionStore + Send + Sync>,
        meta: Arc<dyn MetaStore + Send + Sync>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            accounts,
            stakes,
            transactions,
            meta,
            notifier,
        }
    }

    pub fn ledger(&self, snapshot: &RunSnapshot) -> CurrencyLedger {
        CurrencyLedger::new(
            self.accounts.clone(),
            self.transactions.clone(),
            snapshot.params.amount_epsilon,
        )
    }

    pub fn propagator(&self, snapshot: &RunSnapshot) -> TeamVolumePropagator {
        let ranks = RankEngine::new(
            self.accounts.clone(),
            self.notifier.clone(),
            snapshot.table.clone(),
            snapshot.params.max_tree_depth,
        );
        TeamVolumePropagator::new(self.accounts.clone(), ranks, snapshot.params.max_tree_depth)
    }

    /// Allocate the next id from a persistent meta counter.
    fn next_id(&self, key: &str) -> Result<u64, EngineError> {
        let next = match self.meta.get_meta(key)? {
            Some(bytes) if bytes.len() >= 8 => {
                u64::from_be_bytes(bytes[..8].try_into().expect("checked length"))
            }
            _ => 1,
        };
        self.meta.put_meta(key, &(next + 1).to_be_bytes())?;
        Ok(next)
    }

    /// Create an account at the entry tier, linked under its sponsor.
    pub fn register(
        &self,
        snapshot: &RunSnapshot,
        referrer: Option<AccountId>,
        now: Timestamp,
    ) -> Result<AccountRecord, EngineError> {
        if let Some(sponsor_id) = referrer {
            let mut sponsor = self.accounts.get_account(sponsor_id)?;
            sponsor.direct_count += 1;
            self.accounts.put_account(&sponsor)?;
        }
        let id = AccountId::new(self.next_id(NEXT_ACCOUNT_ID_KEY)?);
        let record = AccountRecord::new(id, referrer, snapshot.table.lowest().tier.clone(), now);
        self.accounts.put_account(&record)?;
        tracing::info!(%id, ?referrer, "account registered");
        Ok(record)
    }

    /// Credit a deposit from the blockchain pipeline.
    pub fn deposit(
        &self,
        snapshot: &RunSnapshot,
        account: AccountId,
        amount: Amount,
        now: Timestamp,
    ) -> Result<(), EngineError> {
        self.ledger(snapshot).credit(
            account,
            amount,
            Currency::Withdrawable,
            EntryKind::Deposit,
            None,
            now,
        )?;
        Ok(())
    }

    /// Debit a withdrawal for the blockchain pipeline, gated by the global
    /// pause flag.
    pub fn withdraw(
        &self,
        snapshot: &RunSnapshot,
        account: AccountId,
        amount: Amount,
        now: Timestamp,
    ) -> Result<(), EngineError> {
        if snapshot.params.withdrawals_paused {
            return Err(EngineError::WithdrawalsPaused);
        }
        self.ledger(snapshot).debit(
            account,
            amount,
            Currency::Withdrawable,
            EntryKind::Withdrawal,
            None,
            now,
        )?;
        Ok(())
    }

    /// Convert points to the withdrawable unit at the configured rate.
    pub fn swap_points(
        &self,
        snapshot: &RunSnapshot,
        account: AccountId,
        points: Amount,
        now: Timestamp,
    ) -> Result<Amount, EngineError> {
        Ok(self
            .ledger(snapshot)
            .swap_points(&snapshot.routing, account, points, now)?)
    }

    /// Purchase a stake: deduct the principal from the withdrawable
    /// balance, open the position, and push its volume up the tree.
    pub fn create_stake(
        &self,
        snapshot: &RunSnapshot,
        account: AccountId,
        principal: Amount,
        cycle_days: u32,
        now: Timestamp,
    ) -> Result<StakeRecord, EngineError> {
        if snapshot.params.staking_paused {
            return Err(EngineError::StakingPaused);
        }
        if !principal.is_positive() {
            return Err(EngineError::InvalidAmount(principal.value()));
        }
        let plan = snapshot
            .params
            .plan_for(cycle_days)
            .copied()
            .ok_or(EngineError::UnknownCycle(cycle_days))?;
        let principal = principal.round2();

        let id = StakeId::new(self.next_id(NEXT_STAKE_ID_KEY)?);
        self.ledger(snapshot).debit(
            account,
            principal,
            Currency::Withdrawable,
            EntryKind::StakePurchase,
            Some(id),
            now,
        )?;
        let record = StakeRecord::new(id, account, principal, plan.days, plan.daily_rate_pct, now);
        self.stakes.put_stake(&record)?;

        self.propagator(snapshot)
            .apply_volume_delta(account, principal)?;
        self.refresh_sponsor_unlock(account)?;

        tracing::info!(%id, %account, %principal, cycle_days, "stake created");
        Ok(record)
    }

    /// Close a matured stake: flip it to `Completed`, subtract its
    /// principal from team volume up the tree, and refresh the sponsor's
    /// unlock state. Returns the rank changes the volume drop triggered.
    pub fn expire_stake(
        &self,
        snapshot: &RunSnapshot,
        stake: &StakeRecord,
    ) -> Result<Vec<RankChange>, EngineError> {
        let mut record = stake.clone();
        record.status = StakeStatus::Completed;
        self.stakes.put_stake(&record)?;

        let changes = self
            .propagator(snapshot)
            .apply_volume_delta(record.account, -record.principal)?;
        self.refresh_sponsor_unlock(record.account)?;

        tracing::info!(id = %record.id, account = %record.account, "stake completed");
        Ok(changes)
    }

    fn refresh_sponsor_unlock(&self, account: AccountId) -> Result<(), EngineError> {
        if let Some(sponsor) = self.accounts.get_account(account)?.referrer {
            refresh_unlock_state(self.accounts.as_ref(), self.stakes.as_ref(), sponsor)?;
        }
        Ok(())
    }
}
