//! Append-only transaction log storage trait.

use crate::StoreError;
use canopy_types::{AccountId, Amount, Currency, StakeId, Timestamp};
use serde::{Deserialize, Serialize};

/// Why a ledger entry exists. Commission variants carry their scheme
/// metadata so reporting never has to re-derive it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EntryKind {
    Deposit,
    Withdrawal,
    /// Principal deducted when a stake is purchased.
    StakePurchase,
    /// Daily yield credited to the staker.
    Yield,
    /// L1/L2 direct/indirect bonus (level is 1-based).
    DirectBonus { level: u32 },
    /// Unilevel commission with the level and rate that produced it.
    UnilevelCommission { level: u32, rate_pct: f64 },
    /// Rank-gated bonus under the dynamic cap.
    RankBonus,
    /// One leg of a point-to-withdrawable conversion.
    PointSwap,
}

/// One append-only ledger entry. The signed sum of an account's entries in
/// a currency unit is that account's balance in that unit — the ledger is
/// the source of truth, materialized balances are a cache.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Append order, assigned by the store on insert. Zero until appended.
    pub id: u64,
    pub account: AccountId,
    /// Signed: credits positive, debits negative.
    pub amount: Amount,
    pub currency: Currency,
    pub kind: EntryKind,
    /// The stake whose cascade produced this entry, if any.
    pub stake: Option<StakeId>,
    pub created_at: Timestamp,
}

/// Trait for the append-only transaction log.
pub trait TransactionStore {
    /// Append an entry, returning its assigned id.
    fn append_entry(&self, entry: &LedgerEntry) -> Result<u64, StoreError>;

    fn entries_for(&self, account: AccountId) -> Result<Vec<LedgerEntry>, StoreError>;

    fn entry_count(&self) -> Result<u64, StoreError>;

    /// Signed sum of an account's entries in one currency unit.
    fn signed_total(&self, account: AccountId, currency: Currency) -> Result<Amount, StoreError> {
        Ok(self
            .entries_for(account)?
            .into_iter()
            .filter(|e| e.currency == currency)
            .map(|e| e.amount)
            .sum())
    }
}
