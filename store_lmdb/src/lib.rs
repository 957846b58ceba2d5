//! LMDB storage backend for the canopy engine.
//!
//! Implements all storage traits from `canopy-store` using the `heed` LMDB
//! bindings. One environment, one database per logical store, `bincode`
//! payloads, big-endian `u64` keys so iteration order follows id order.

pub mod account;
pub mod commission;
pub mod environment;
pub mod error;
pub mod ledger;
pub mod meta;
pub mod run_log;
pub mod stake;

pub use environment::LmdbStores;
pub use error::LmdbError;

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_store::{
        AccountRecord, AccountStore, CommissionRecord, CommissionStore, EntryKind, LedgerEntry,
        MetaStore, ReportBuckets, RunLogStore, RunRecord, StakeRecord, StakeStore, StoreError,
        TransactionStore,
    };
    use canopy_types::{
        AccountId, Amount, Currency, RunStatus, StakeId, TierId, Timestamp,
    };

    fn open_stores() -> (tempfile::TempDir, LmdbStores) {
        let dir = tempfile::tempdir().unwrap();
        let stores = LmdbStores::open(dir.path()).unwrap();
        (dir, stores)
    }

    fn test_account(id: u64) -> AccountRecord {
        AccountRecord::new(
            AccountId::new(id),
            if id > 1 { Some(AccountId::new(id - 1)) } else { None },
            TierId::new("B0"),
            Timestamp::new(0),
        )
    }

    #[test]
    fn account_roundtrip_and_count() {
        let (_dir, stores) = open_stores();
        assert!(matches!(
            stores.get_account(AccountId::new(1)),
            Err(StoreError::NotFound(_))
        ));

        stores.put_account(&test_account(1)).unwrap();
        stores.put_account(&test_account(2)).unwrap();

        let fetched = stores.get_account(AccountId::new(2)).unwrap();
        assert_eq!(fetched.referrer, Some(AccountId::new(1)));
        assert!(stores.exists(AccountId::new(1)).unwrap());
        assert_eq!(stores.account_count().unwrap(), 2);
        assert_eq!(stores.directs_of(AccountId::new(1)).unwrap().len(), 1);
    }

    #[test]
    fn stake_roundtrip_and_active_filter() {
        let (_dir, stores) = open_stores();
        let mut stake = StakeRecord::new(
            StakeId::new(1),
            AccountId::new(1),
            Amount::new(100.0),
            30,
            1.0,
            Timestamp::new(0),
        );
        stores.put_stake(&stake).unwrap();
        stake.id = StakeId::new(2);
        stake.status = canopy_types::StakeStatus::Completed;
        stores.put_stake(&stake).unwrap();

        assert_eq!(stores.stake_count().unwrap(), 2);
        let active = stores.active_stakes().unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, StakeId::new(1));
    }

    #[test]
    fn entries_get_sequential_ids_and_sum() {
        let (_dir, stores) = open_stores();
        let entry = LedgerEntry {
            id: 0,
            account: AccountId::new(1),
            amount: Amount::new(10.0),
            currency: Currency::Withdrawable,
            kind: EntryKind::Deposit,
            stake: None,
            created_at: Timestamp::new(0),
        };
        assert_eq!(stores.append_entry(&entry).unwrap(), 1);
        let mut debit = entry.clone();
        debit.amount = Amount::new(-4.0);
        debit.kind = EntryKind::Withdrawal;
        assert_eq!(stores.append_entry(&debit).unwrap(), 2);

        assert_eq!(stores.entry_count().unwrap(), 2);
        let total = stores
            .signed_total(AccountId::new(1), Currency::Withdrawable)
            .unwrap();
        assert_eq!(total, Amount::new(6.0));
    }

    #[test]
    fn commissions_and_runs_append() {
        let (_dir, stores) = open_stores();
        stores
            .append_commission(&CommissionRecord {
                account: AccountId::new(1),
                source_account: AccountId::new(2),
                stake: StakeId::new(1),
                level: 1,
                rate_pct: 3.0,
                source_yield: Amount::new(100.0),
                commission: Amount::new(3.0),
                buckets: ReportBuckets::from_timestamp(Timestamp::new(1_710_504_000)),
                created_at: Timestamp::new(1_710_504_000),
            })
            .unwrap();
        assert_eq!(stores.commission_count().unwrap(), 1);
        assert_eq!(stores.commissions_for(AccountId::new(1)).unwrap().len(), 1);

        for n in 0..3u64 {
            stores
                .append_run(&RunRecord {
                    job: "daily-distribution".into(),
                    status: RunStatus::Success,
                    message: format!("run {}", n),
                    stakes_processed: n,
                    stakes_expired: 0,
                    total_yield: Amount::ZERO,
                    total_commissions: Amount::ZERO,
                    duration_ms: 5,
                    errors: vec![],
                    started_at: Timestamp::new(n),
                })
                .unwrap();
        }
        let recent = stores.recent_runs(2).unwrap();
        assert_eq!(recent.len(), 2);
        // Newest first.
        assert_eq!(recent[0].stakes_processed, 2);
        assert_eq!(recent[1].stakes_processed, 1);
    }

    #[test]
    fn meta_roundtrip_and_delete() {
        let (_dir, stores) = open_stores();
        assert_eq!(stores.get_meta("k").unwrap(), None);
        stores.put_meta("k", b"v").unwrap();
        assert_eq!(stores.get_meta("k").unwrap(), Some(b"v".to_vec()));
        stores.delete_meta("k").unwrap();
        assert_eq!(stores.get_meta("k").unwrap(), None);
    }
}
