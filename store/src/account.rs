//! Account storage trait.

use crate::StoreError;
use canopy_types::{AccountId, Amount, TierId, Timestamp};
use serde::{Deserialize, Serialize};

/// One participant in the sponsor tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: AccountId,
    /// Direct sponsor. `None` for a tree root.
    pub referrer: Option<AccountId>,
    /// Current rank tier — always the highest tier whose requirements the
    /// account currently satisfies.
    pub tier: TierId,
    /// Own plus all descendants' currently-active stake principal. Never
    /// negative.
    pub team_volume: Amount,
    /// Number of direct referrals.
    pub direct_count: u32,
    /// Direct referrals holding at least one active stake.
    pub active_direct_count: u32,
    /// Unlocked unilevel levels (0–10), derived from active directs.
    pub unlocked_levels: u8,
    /// Lifetime bonus received under the capped rank-bonus scheme.
    pub rank_bonus_received: Amount,
    /// Set once when the rank-bonus cap is crossed, cleared when headroom
    /// returns; gates the cap-reached notification to once per crossing.
    pub cap_notified: bool,
    /// Withdrawable-unit balance (materialized from the ledger).
    pub balance: Amount,
    /// Internal point-unit balance (materialized from the ledger).
    pub points: Amount,
    pub created_at: Timestamp,
}

impl AccountRecord {
    /// A fresh account at the given tier with zero balances and counters.
    pub fn new(
        id: AccountId,
        referrer: Option<AccountId>,
        tier: TierId,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            referrer,
            tier,
            team_volume: Amount::ZERO,
            direct_count: 0,
            active_direct_count: 0,
            unlocked_levels: 0,
            rank_bonus_received: Amount::ZERO,
            cap_notified: false,
            balance: Amount::ZERO,
            points: Amount::ZERO,
            created_at,
        }
    }
}

/// Trait for account storage operations.
pub trait AccountStore {
    fn get_account(&self, id: AccountId) -> Result<AccountRecord, StoreError>;
    fn put_account(&self, record: &AccountRecord) -> Result<(), StoreError>;
    fn exists(&self, id: AccountId) -> Result<bool, StoreError>;
    fn account_count(&self) -> Result<u64, StoreError>;
    fn iter_accounts(&self) -> Result<Vec<AccountRecord>, StoreError>;

    /// All accounts whose direct sponsor is `id`.
    fn directs_of(&self, id: AccountId) -> Result<Vec<AccountRecord>, StoreError> {
        Ok(self
            .iter_accounts()?
            .into_iter()
            .filter(|a| a.referrer == Some(id))
            .collect())
    }
}
