//! LMDB implementation of `RunLogStore`.

use canopy_store::{RunLogStore, RunRecord, StoreError};

use crate::environment::{decode, encode};
use crate::{LmdbError, LmdbStores};

impl RunLogStore for LmdbStores {
    fn append_run(&self, record: &RunRecord) -> Result<(), StoreError> {
        let bytes = encode(record)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let id = self.runs.len(&wtxn).map_err(LmdbError::from)? + 1;
        self.runs
            .put(&mut wtxn, &id.to_be_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn recent_runs(&self, limit: usize) -> Result<Vec<RunRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut all = Vec::new();
        for item in self.runs.iter(&rtxn).map_err(LmdbError::from)? {
            let (_, bytes) = item.map_err(LmdbError::from)?;
            all.push(decode(bytes)?);
        }
        // Keys are big-endian ids, so iteration order is append order.
        all.reverse();
        all.truncate(limit);
        Ok(all)
    }
}
