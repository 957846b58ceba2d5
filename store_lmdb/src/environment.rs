//! LMDB environment setup.

use std::path::Path;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::LmdbError;

const MAP_SIZE: usize = 1 << 30; // 1 GiB
const MAX_DBS: u32 = 8;

/// One LMDB environment holding every logical store as a named database.
pub struct LmdbStores {
    pub(crate) env: Env,
    pub(crate) accounts: Database<Bytes, Bytes>,
    pub(crate) stakes: Database<Bytes, Bytes>,
    pub(crate) entries: Database<Bytes, Bytes>,
    pub(crate) commissions: Database<Bytes, Bytes>,
    pub(crate) runs: Database<Bytes, Bytes>,
    pub(crate) meta: Database<Bytes, Bytes>,
}

impl LmdbStores {
    /// Open or create the environment at `path`.
    pub fn open(path: &Path) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;
        // SAFETY: the path is a directory we just created; no other process
        // opens it with conflicting options.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(MAP_SIZE)
                .max_dbs(MAX_DBS)
                .open(path)?
        };
        let mut wtxn = env.write_txn()?;
        let accounts = env.create_database(&mut wtxn, Some("accounts"))?;
        let stakes = env.create_database(&mut wtxn, Some("stakes"))?;
        let entries = env.create_database(&mut wtxn, Some("entries"))?;
        let commissions = env.create_database(&mut wtxn, Some("commissions"))?;
        let runs = env.create_database(&mut wtxn, Some("runs"))?;
        let meta = env.create_database(&mut wtxn, Some("meta"))?;
        wtxn.commit()?;
        tracing::debug!(path = %path.display(), "opened LMDB environment");
        Ok(Self {
            env,
            accounts,
            stakes,
            entries,
            commissions,
            runs,
            meta,
        })
    }
}

pub(crate) fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, LmdbError> {
    bincode::serialize(value).map_err(|e| LmdbError::Serialization(e.to_string()))
}

pub(crate) fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, LmdbError> {
    bincode::deserialize(bytes).map_err(|e| LmdbError::Serialization(e.to_string()))
}
