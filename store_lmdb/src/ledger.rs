//! LMDB implementation of `TransactionStore`.
//!
//! Entries are append-only: the id is the database length plus one,
//! assigned inside the write transaction so ids stay dense and ordered.

use canopy_store::{LedgerEntry, StoreError, TransactionStore};
use canopy_types::AccountId;

use crate::environment::{decode, encode};
use crate::{LmdbError, LmdbStores};

impl TransactionStore for LmdbStores {
    fn append_entry(&self, entry: &LedgerEntry) -> Result<u64, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let id = self.entries.len(&wtxn).map_err(LmdbError::from)? + 1;
        let mut stored = entry.clone();
        stored.id = id;
        let bytes = encode(&stored)?;
        self.entries
            .put(&mut wtxn, &id.to_be_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(id)
    }

    fn entries_for(&self, account: AccountId) -> Result<Vec<LedgerEntry>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut matching = Vec::new();
        for item in self.entries.iter(&rtxn).map_err(LmdbError::from)? {
            let (_, bytes) = item.map_err(LmdbError::from)?;
            let entry: LedgerEntry = decode(bytes)?;
            if entry.account == account {
                matching.push(entry);
            }
        }
        Ok(matching)
    }

    fn entry_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.entries.len(&rtxn).map_err(LmdbError::from)?)
    }
}
