//! LMDB implementation of `AccountStore`.

use canopy_store::{AccountRecord, AccountStore, StoreError};
use canopy_types::AccountId;

use crate::environment::{decode, encode};
use crate::{LmdbError, LmdbStores};

impl AccountStore for LmdbStores {
    fn get_account(&self, id: AccountId) -> Result<AccountRecord, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let bytes = self
            .accounts
            .get(&rtxn, &id.raw().to_be_bytes())
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::NotFound(id.to_string()))?;
        Ok(decode(bytes)?)
    }

    fn put_account(&self, record: &AccountRecord) -> Result<(), StoreError> {
        let bytes = encode(record)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.accounts
            .put(&mut wtxn, &record.id.raw().to_be_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn exists(&self, id: AccountId) -> Result<bool, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self
            .accounts
            .get(&rtxn, &id.raw().to_be_bytes())
            .map_err(LmdbError::from)?
            .is_some())
    }

    fn account_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.accounts.len(&rtxn).map_err(LmdbError::from)?)
    }

    fn iter_accounts(&self) -> Result<Vec<AccountRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut all = Vec::new();
        for item in self.accounts.iter(&rtxn).map_err(LmdbError::from)? {
            let (_, bytes) = item.map_err(LmdbError::from)?;
            all.push(decode(bytes)?);
        }
        Ok(all)
    }
}
