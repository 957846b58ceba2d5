//! Metadata storage trait — counters, locks, schema bookkeeping.

use crate::StoreError;

/// Trait for small keyed metadata blobs (id counters, the distribution
/// job's single-flight lock, schema version).
pub trait MetaStore {
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;
    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    fn delete_meta(&self, key: &str) -> Result<(), StoreError>;
}
