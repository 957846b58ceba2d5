//! LMDB implementation of `StakeStore`.

use canopy_store::{StakeRecord, StakeStore, StoreError};
use canopy_types::StakeId;

use crate::environment::{decode, encode};
use crate::{LmdbError, LmdbStores};

impl StakeStore for LmdbStores {
    fn get_stake(&self, id: StakeId) -> Result<StakeRecord, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let bytes = self
            .stakes
            .get(&rtxn, &id.raw().to_be_bytes())
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::NotFound(id.to_string()))?;
        Ok(decode(bytes)?)
    }

    fn put_stake(&self, record: &StakeRecord) -> Result<(), StoreError> {
        let bytes = encode(record)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.stakes
            .put(&mut wtxn, &record.id.raw().to_be_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn stake_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.stakes.len(&rtxn).map_err(LmdbError::from)?)
    }

    fn iter_stakes(&self) -> Result<Vec<StakeRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut all = Vec::new();
        for item in self.stakes.iter(&rtxn).map_err(LmdbError::from)? {
            let (_, bytes) = item.map_err(LmdbError::from)?;
            all.push(decode(bytes)?);
        }
        Ok(all)
    }
}
