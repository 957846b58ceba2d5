//! The currency ledger — every credit/debit in the engine goes through here.

use std::sync::Arc;

use canopy_store::{AccountRecord, AccountStore, EntryKind, LedgerEntry, TransactionStore};
use canopy_types::{AccountId, Amount, Currency, StakeId, Timestamp};

use crate::{LedgerError, RewardRouting};

/// Append-only transaction log plus materialized per-account balances in
/// two fungible units.
///
/// All amounts are cent-rounded at this boundary; sufficient-balance checks
/// round then allow `epsilon` of slack, so repeated fractional credits never
/// produce spurious rejections.
#[derive(Clone)]
pub struct CurrencyLedger {
    accounts: Arc<dyn AccountStore + Send + Sync>,
    transactions: Arc<dyn TransactionStore + Send + Sync>,
    epsilon: f64,
}

impl CurrencyLedger {
    pub fn new(
        accounts: Arc<dyn AccountStore + Send + Sync>,
        transactions: Arc<dyn TransactionStore + Send + Sync>,
        epsilon: f64,
    ) -> Self {
        Self {
            accounts,
            transactions,
            epsilon,
        }
    }

    fn balance_of(record: &AccountRecord, currency: Currency) -> Amount {
        match currency {
            Currency::Withdrawable => record.balance,
            Currency::Points => record.points,
        }
    }

    fn set_balance(record: &mut AccountRecord, currency: Currency, value: Amount) {
        match currency {
            Currency::Withdrawable => record.balance = value,
            Currency::Points => record.points = value,
        }
    }

    /// Credit `amount` to an account, recording one ledger entry.
    /// Returns the entry id.
    pub fn credit(
        &self,
        account: AccountId,
        amount: Amount,
        currency: Currency,
        kind: EntryKind,
        stake: Option<StakeId>,
        now: Timestamp,
    ) -> Result<u64, LedgerError> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount(amount.value()));
        }
        let amount = amount.round2();
        let mut record = self.accounts.get_account(account)?;
        let id = self.transactions.append_entry(&LedgerEntry {
            id: 0,
            account,
            amount,
            currency,
            kind,
            stake,
            created_at: now,
        })?;
        let balance = (Self::balance_of(&record, currency) + amount).round2();
        Self::set_balance(&mut record, currency, balance);
        self.accounts.put_account(&record)?;
        Ok(id)
    }

    /// Debit `amount` from an account, recording one negative ledger entry.
    ///
    /// Fails with [`LedgerError::InsufficientBalance`] when the rounded
    /// balance plus epsilon does not cover the amount.
    pub fn debit(
        &self,
        account: AccountId,
        amount: Amount,
        currency: Currency,
        kind: EntryKind,
        stake: Option<StakeId>,
        now: Timestamp,
    ) -> Result<u64, LedgerError> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount(amount.value()));
        }
        let amount = amount.round2();
        let mut record = self.accounts.get_account(account)?;
        let available = Self::balance_of(&record, currency);
        if !available.approx_ge(amount, self.epsilon) {
            return Err(LedgerError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        let id = self.transactions.append_entry(&LedgerEntry {
            id: 0,
            account,
            amount: -amount,
            currency,
            kind,
            stake,
            created_at: now,
        })?;
        // Epsilon slack can leave a dust-sized negative after subtraction.
        let balance = (available - amount).round2().clamp_floor_zero();
        Self::set_balance(&mut record, currency, balance);
        self.accounts.put_account(&record)?;
        Ok(id)
    }

    /// Credit a distribution reward, routed to the unit the currency
    /// abstraction currently selects.
    pub fn credit_reward(
        &self,
        routing: &RewardRouting,
        account: AccountId,
        amount: Amount,
        kind: EntryKind,
        stake: Option<StakeId>,
        now: Timestamp,
    ) -> Result<u64, LedgerError> {
        self.credit(account, amount, routing.reward_currency(), kind, stake, now)
    }

    /// Current materialized balance.
    pub fn balance(&self, account: AccountId, currency: Currency) -> Result<Amount, LedgerError> {
        let record = self.accounts.get_account(account)?;
        Ok(Self::balance_of(&record, currency))
    }

    /// Re-derive the balance from the transaction log (the source of truth).
    /// Must always match the materialized balance up to cent rounding.
    pub fn rederive_balance(
        &self,
        account: AccountId,
        currency: Currency,
    ) -> Result<Amount, LedgerError> {
        Ok(self.transactions.signed_total(account, currency)?)
    }

    /// Convert points to the withdrawable unit at the configured rate.
    ///
    /// Rejected below the minimum swap size or when the rounded point
    /// balance (plus epsilon) does not cover the amount. Returns the
    /// withdrawable amount received.
    pub fn swap_points(
        &self,
        routing: &RewardRouting,
        account: AccountId,
        points: Amount,
        now: Timestamp,
    ) -> Result<Amount, LedgerError> {
        if !points.is_positive() {
            return Err(LedgerError::InvalidAmount(points.value()));
        }
        if !points.approx_ge(routing.min_swap, self.epsilon) {
            return Err(LedgerError::SwapBelowMinimum {
                minimum: routing.min_swap,
            });
        }
        self.debit(
            account,
            points,
            Currency::Points,
            EntryKind::PointSwap,
            None,
            now,
        )?;
        let received = points.scale(routing.swap_rate).round2();
        self.credit(
            account,
            received,
            Currency::Withdrawable,
            EntryKind::PointSwap,
            None,
            now,
        )?;
        tracing::debug!(%account, %points, %received, "points swapped");
        Ok(received)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_nullables::MemoryStore;
    use canopy_types::TierId;

    fn setup() -> (Arc<MemoryStore>, CurrencyLedger) {
        let store = Arc::new(MemoryStore::new());
        let ledger = CurrencyLedger::new(store.clone(), store.clone(), 1e-6);
        store
            .put_account(&AccountRecord::new(
                AccountId::new(1),
                None,
                TierId::new("B0"),
                Timestamp::new(0),
            ))
            .unwrap();
        (store, ledger)
    }

    fn now() -> Timestamp {
        Timestamp::new(1_000)
    }

    #[test]
    fn credit_updates_balance_and_log() {
        let (_, ledger) = setup();
        let a = AccountId::new(1);
        ledger
            .credit(a, Amount::new(50.0), Currency::Withdrawable, EntryKind::Deposit, None, now())
            .unwrap();
        assert_eq!(ledger.balance(a, Currency::Withdrawable).unwrap(), Amount::new(50.0));
        assert_eq!(
            ledger.rederive_balance(a, Currency::Withdrawable).unwrap(),
            Amount::new(50.0)
        );
    }

    #[test]
    fn materialized_balance_matches_entry_sum_across_mixed_operations() {
        let (_, ledger) = setup();
        let a = AccountId::new(1);
        ledger
            .credit(a, Amount::new(100.0), Currency::Withdrawable, EntryKind::Deposit, None, now())
            .unwrap();
        ledger
            .debit(a, Amount::new(30.0), Currency::Withdrawable, EntryKind::Withdrawal, None, now())
            .unwrap();
        ledger
            .credit(a, Amount::new(2.5), Currency::Points, EntryKind::Yield, None, now())
            .unwrap();
        for currency in [Currency::Withdrawable, Currency::Points] {
            let materialized = ledger.balance(a, currency).unwrap();
            let derived = ledger.rederive_balance(a, currency).unwrap().round2();
            assert_eq!(materialized, derived);
        }
    }

    #[test]
    fn debit_rejects_insufficient_balance() {
        let (_, ledger) = setup();
        let a = AccountId::new(1);
        ledger
            .credit(a, Amount::new(10.0), Currency::Withdrawable, EntryKind::Deposit, None, now())
            .unwrap();
        let err = ledger
            .debit(a, Amount::new(10.01), Currency::Withdrawable, EntryKind::Withdrawal, None, now())
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
    }

    #[test]
    fn debit_tolerates_fractional_credit_drift() {
        let (_, ledger) = setup();
        let a = AccountId::new(1);
        // 30 credits of 0.10 — binary float drift must not block a 3.00 debit.
        for _ in 0..30 {
            ledger
                .credit(a, Amount::new(0.10), Currency::Withdrawable, EntryKind::Yield, None, now())
                .unwrap();
        }
        ledger
            .debit(a, Amount::new(3.0), Currency::Withdrawable, EntryKind::Withdrawal, None, now())
            .unwrap();
        assert_eq!(ledger.balance(a, Currency::Withdrawable).unwrap(), Amount::ZERO);
    }

    #[test]
    fn reward_routing_selects_unit() {
        let (_, ledger) = setup();
        let a = AccountId::new(1);
        let to_points = RewardRouting {
            pay_in_points: true,
            swap_rate: 1.0,
            min_swap: Amount::new(10.0),
        };
        ledger
            .credit_reward(&to_points, a, Amount::new(5.0), EntryKind::Yield, None, now())
            .unwrap();
        assert_eq!(ledger.balance(a, Currency::Points).unwrap(), Amount::new(5.0));
        assert_eq!(ledger.balance(a, Currency::Withdrawable).unwrap(), Amount::ZERO);
    }

    #[test]
    fn swap_enforces_minimum_and_rate() {
        let (_, ledger) = setup();
        let a = AccountId::new(1);
        let routing = RewardRouting {
            pay_in_points: true,
            swap_rate: 0.5,
            min_swap: Amount::new(10.0),
        };
        ledger
            .credit(a, Amount::new(40.0), Currency::Points, EntryKind::Yield, None, now())
            .unwrap();

        let err = ledger
            .swap_points(&routing, a, Amount::new(5.0), now())
            .unwrap_err();
        assert!(matches!(err, LedgerError::SwapBelowMinimum { .. }));

        let received = ledger.swap_points(&routing, a, Amount::new(20.0), now()).unwrap();
        assert_eq!(received, Amount::new(10.0));
        assert_eq!(ledger.balance(a, Currency::Points).unwrap(), Amount::new(20.0));
        assert_eq!(ledger.balance(a, Currency::Withdrawable).unwrap(), Amount::new(10.0));
    }
}
