//! Stake storage trait.

use crate::StoreError;
use canopy_types::{AccountId, Amount, StakeId, StakeStatus, Timestamp};
use serde::{Deserialize, Serialize};

/// A fixed-principal, fixed-duration staking position.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StakeRecord {
    pub id: StakeId,
    pub account: AccountId,
    pub principal: Amount,
    pub cycle_days: u32,
    pub daily_rate_pct: f64,
    pub started_at: Timestamp,
    /// Always `started_at + cycle_days` whole days.
    pub ends_at: Timestamp,
    pub status: StakeStatus,
    /// Last time yield was credited. The day index of this timestamp is the
    /// idempotency marker: one yield credit per stake per UTC day.
    pub last_yield_at: Option<Timestamp>,
}

impl StakeRecord {
    pub fn new(
        id: StakeId,
        account: AccountId,
        principal: Amount,
        cycle_days: u32,
        daily_rate_pct: f64,
        started_at: Timestamp,
    ) -> Self {
        Self {
            id,
            account,
            principal,
            cycle_days,
            daily_rate_pct,
            started_at,
            ends_at: started_at.plus_days(cycle_days as u64),
            status: StakeStatus::Active,
            last_yield_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == StakeStatus::Active
    }

    /// Whether the lock period has elapsed at `now`.
    pub fn is_matured(&self, now: Timestamp) -> bool {
        now > self.ends_at
    }

    /// Whether yield was already credited for the UTC day of `now`.
    pub fn yielded_on(&self, now: Timestamp) -> bool {
        self.last_yield_at
            .map(|t| t.day_index() == now.day_index())
            .unwrap_or(false)
    }

    /// One day's yield: `principal × daily_rate / 100`, cent-rounded.
    pub fn daily_yield(&self) -> Amount {
        self.principal.pct(self.daily_rate_pct).round2()
    }
}

/// Trait for stake storage operations.
pub trait StakeStore {
    fn get_stake(&self, id: StakeId) -> Result<StakeRecord, StoreError>;
    fn put_stake(&self, record: &StakeRecord) -> Result<(), StoreError>;
    fn stake_count(&self) -> Result<u64, StoreError>;
    fn iter_stakes(&self) -> Result<Vec<StakeRecord>, StoreError>;

    /// All stakes with status `Active`, in id order.
    fn active_stakes(&self) -> Result<Vec<StakeRecord>, StoreError> {
        let mut stakes: Vec<StakeRecord> = self
            .iter_stakes()?
            .into_iter()
            .filter(|s| s.is_active())
            .collect();
        stakes.sort_by_key(|s| s.id);
        Ok(stakes)
    }

    fn stakes_for(&self, account: AccountId) -> Result<Vec<StakeRecord>, StoreError> {
        Ok(self
            .iter_stakes()?
            .into_iter()
            .filter(|s| s.account == account)
            .collect())
    }

    fn active_stakes_for(&self, account: AccountId) -> Result<Vec<StakeRecord>, StoreError> {
        Ok(self
            .stakes_for(account)?
            .into_iter()
            .filter(|s| s.is_active())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_stake() -> StakeRecord {
        StakeRecord::new(
            StakeId::new(1),
            AccountId::new(7),
            Amount::new(100.0),
            30,
            1.0,
            Timestamp::new(86_400),
        )
    }

    #[test]
    fn ends_at_is_start_plus_cycle() {
        let stake = test_stake();
        assert_eq!(stake.ends_at, stake.started_at.plus_days(30));
    }

    #[test]
    fn maturity_is_strictly_after_end() {
        let stake = test_stake();
        assert!(!stake.is_matured(stake.ends_at));
        assert!(stake.is_matured(Timestamp::new(stake.ends_at.as_secs() + 1)));
    }

    #[test]
    fn yielded_on_matches_day_index() {
        let mut stake = test_stake();
        let noon = Timestamp::new(5 * 86_400 + 43_200);
        assert!(!stake.yielded_on(noon));
        stake.last_yield_at = Some(noon);
        assert!(stake.yielded_on(Timestamp::new(5 * 86_400 + 1)));
        assert!(!stake.yielded_on(Timestamp::new(6 * 86_400)));
    }

    #[test]
    fn daily_yield_is_rate_of_principal() {
        assert_eq!(test_stake().daily_yield(), Amount::new(1.0));
    }
}
