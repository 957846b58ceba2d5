//! Memory store — thread-safe in-memory storage for testing.

use canopy_store::{
    AccountRecord, AccountStore, CommissionRecord, CommissionStore, LedgerEntry, MetaStore,
    RunLogStore, RunRecord, StakeRecord, StakeStore, StoreError, TransactionStore,
};
use canopy_types::{AccountId, StakeId};
use std::collections::HashMap;
use std::sync::Mutex;

/// An in-memory implementation of every storage trait.
/// Thread-safe so one instance can be shared behind `Arc` across the
/// ledger, rank, reward, and orchestration components under test.
#[derive(Default)]
pub struct MemoryStore {
    accounts: Mutex<HashMap<u64, AccountRecord>>,
    stakes: Mutex<HashMap<u64, StakeRecord>>,
    entries: Mutex<Vec<LedgerEntry>>,
    commissions: Mutex<Vec<CommissionRecord>>,
    runs: Mutex<Vec<RunRecord>>,
    meta: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountStore for MemoryStore {
    fn get_account(&self, id: AccountId) -> Result<AccountRecord, StoreError> {
        self.accounts
            .lock()
            .unwrap()
            .get(&id.raw())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn put_account(&self, record: &AccountRecord) -> Result<(), StoreError> {
        self.accounts
            .lock()
            .unwrap()
            .insert(record.id.raw(), record.clone());
        Ok(())
    }

    fn exists(&self, id: AccountId) -> Result<bool, StoreError> {
        Ok(self.accounts.lock().unwrap().contains_key(&id.raw()))
    }

    fn account_count(&self) -> Result<u64, StoreError> {
        Ok(self.accounts.lock().unwrap().len() as u64)
    }

    fn iter_accounts(&self) -> Result<Vec<AccountRecord>, StoreError> {
        let mut all: Vec<AccountRecord> =
            self.accounts.lock().unwrap().values().cloned().collect();
        all.sort_by_key(|a| a.id);
        Ok(all)
    }
}

impl StakeStore for MemoryStore {
    fn get_stake(&self, id: StakeId) -> Result<StakeRecord, StoreError> {
        self.stakes
            .lock()
            .unwrap()
            .get(&id.raw())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn put_stake(&self, record: &StakeRecord) -> Result<(), StoreError> {
        self.stakes
            .lock()
            .unwrap()
            .insert(record.id.raw(), record.clone());
        Ok(())
    }

    fn stake_count(&self) -> Result<u64, StoreError> {
        Ok(self.stakes.lock().unwrap().len() as u64)
    }

    fn iter_stakes(&self) -> Result<Vec<StakeRecord>, StoreError> {
        let mut all: Vec<StakeRecord> = self.stakes.lock().unwrap().values().cloned().collect();
        all.sort_by_key(|s| s.id);
        Ok(all)
    }
}

impl TransactionStore for MemoryStore {
    fn append_entry(&self, entry: &LedgerEntry) -> Result<u64, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        let id = entries.len() as u64 + 1;
        let mut stored = entry.clone();
        stored.id = id;
        entries.push(stored);
        Ok(id)
    }

    fn entries_for(&self, account: AccountId) -> Result<Vec<LedgerEntry>, StoreError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.account == account)
            .cloned()
            .collect())
    }

    fn entry_count(&self) -> Result<u64, StoreError> {
        Ok(self.entries.lock().unwrap().len() as u64)
    }
}

impl CommissionStore for MemoryStore {
    fn append_commission(&self, record: &CommissionRecord) -> Result<(), StoreError> {
        self.commissions.lock().unwrap().push(record.clone());
        Ok(())
    }

    fn commissions_for(&self, account: AccountId) -> Result<Vec<CommissionRecord>, StoreError> {
        Ok(self
            .commissions
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.account == account)
            .cloned()
            .collect())
    }

    fn commission_count(&self) -> Result<u64, StoreError> {
        Ok(self.commissions.lock().unwrap().len() as u64)
    }
}

impl RunLogStore for MemoryStore {
    fn append_run(&self, record: &RunRecord) -> Result<(), StoreError> {
        self.runs.lock().unwrap().push(record.clone());
        Ok(())
    }

    fn recent_runs(&self, limit: usize) -> Result<Vec<RunRecord>, StoreError> {
        Ok(self
            .runs
            .lock()
            .unwrap()
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }
}

impl MetaStore for MemoryStore {
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.meta
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.meta.lock().unwrap().get(key).cloned())
    }

    fn delete_meta(&self, key: &str) -> Result<(), StoreError> {
        self.meta.lock().unwrap().remove(key);
        Ok(())
    }
}
