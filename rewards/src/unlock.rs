//! Unilevel unlock calculation.
//!
//! Each active direct unlocks two unilevel levels, up to all ten. The
//! count is recomputed from live stores on demand (stake creation, expiry,
//! and per unilevel payout) rather than maintained incrementally — O(directs)
//! per call, no cache to go stale in interesting ways.

use canopy_store::{AccountStore, StakeStore, StoreError};
use canopy_types::AccountId;

/// Levels unlocked by a number of active directs: `min(2n, 10)`.
pub fn unlocked_levels(active_directs: u32) -> u8 {
    (active_directs * 2).min(10) as u8
}

/// Direct referrals currently holding at least one active stake.
pub fn active_directs(
    accounts: &dyn AccountStore,
    stakes: &dyn StakeStore,
    account: AccountId,
) -> Result<u32, StoreError> {
    let mut count = 0u32;
    for direct in accounts.directs_of(account)? {
        if !stakes.active_stakes_for(direct.id)?.is_empty() {
            count += 1;
        }
    }
    Ok(count)
}

/// Recompute and persist an account's active-direct count and unlocked
/// levels. Returns `(active_directs, unlocked_levels)`.
pub fn refresh_unlock_state(
    accounts: &dyn AccountStore,
    stakes: &dyn StakeStore,
    account: AccountId,
) -> Result<(u32, u8), StoreError> {
    let active = active_directs(accounts, stakes, account)?;
    let unlocked = unlocked_levels(active);
    let mut record = accounts.get_account(account)?;
    if record.active_direct_count != active || record.unlocked_levels != unlocked {
        record.active_direct_count = active;
        record.unlocked_levels = unlocked;
        accounts.put_account(&record)?;
    }
    Ok((active, unlocked))
}
