//! Execution log for distribution runs.

use crate::StoreError;
use canopy_types::{Amount, RunStatus, Timestamp};
use serde::{Deserialize, Serialize};

/// One structured record per distribution run — success or failure, exactly
/// one record either way.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunRecord {
    pub job: String,
    pub status: RunStatus,
    pub message: String,
    pub stakes_processed: u64,
    pub stakes_expired: u64,
    pub total_yield: Amount,
    pub total_commissions: Amount,
    pub duration_ms: u64,
    /// Per-stake failures collected during the run. A non-empty list does
    /// not make the run `Failed`; only a top-level error does.
    pub errors: Vec<String>,
    pub started_at: Timestamp,
}

/// Trait for run log storage.
pub trait RunLogStore {
    fn append_run(&self, record: &RunRecord) -> Result<(), StoreError>;

    /// Most recent runs, newest first, up to `limit`.
    fn recent_runs(&self, limit: usize) -> Result<Vec<RunRecord>, StoreError>;
}
