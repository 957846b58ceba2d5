//! LMDB implementation of `CommissionStore`.

use canopy_store::{CommissionRecord, CommissionStore, StoreError};
use canopy_types::AccountId;

use crate::environment::{decode, encode};
use crate::{LmdbError, LmdbStores};

impl CommissionStore for LmdbStores {
    fn append_commission(&self, record: &CommissionRecord) -> Result<(), StoreError> {
        let bytes = encode(record)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let id = self.commissions.len(&wtxn).map_err(LmdbError::from)? + 1;
        self.commissions
            .put(&mut wtxn, &id.to_be_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn commissions_for(&self, account: AccountId) -> Result<Vec<CommissionRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut matching = Vec::new();
        for item in self.commissions.iter(&rtxn).map_err(LmdbError::from)? {
            let (_, bytes) = item.map_err(LmdbError::from)?;
            let record: CommissionRecord = decode(bytes)?;
            if record.account == account {
                matching.push(record);
            }
        }
        Ok(matching)
    }

    fn commission_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.commissions.len(&rtxn).map_err(LmdbError::from)?)
    }
}
