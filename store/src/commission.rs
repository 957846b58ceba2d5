//! Unilevel commission history — reporting-only derivative of the ledger.

use crate::StoreError;
use canopy_types::{AccountId, Amount, StakeId, Timestamp};
use chrono::{DateTime, Datelike};
use serde::{Deserialize, Serialize};

/// Calendar bucket keys for aggregate reporting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportBuckets {
    /// `YYYY-MM-DD`
    pub day: String,
    /// ISO week, `YYYY-Www`
    pub week: String,
    /// `YYYY-MM`
    pub month: String,
    /// `YYYY`
    pub year: String,
}

impl ReportBuckets {
    /// Derive all bucket keys from a timestamp (UTC).
    pub fn from_timestamp(ts: Timestamp) -> Self {
        let dt = DateTime::from_timestamp(ts.as_secs() as i64, 0).unwrap_or_default();
        let iso = dt.iso_week();
        Self {
            day: dt.format("%Y-%m-%d").to_string(),
            week: format!("{}-W{:02}", iso.year(), iso.week()),
            month: dt.format("%Y-%m").to_string(),
            year: dt.format("%Y").to_string(),
        }
    }
}

/// One paid unilevel commission. Written once by the distribution job,
/// only ever read by reporting.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommissionRecord {
    /// The ancestor who received the commission.
    pub account: AccountId,
    /// The staker whose yield produced it.
    pub source_account: AccountId,
    pub stake: StakeId,
    /// 1-based unilevel level.
    pub level: u32,
    pub rate_pct: f64,
    /// The daily yield the rate was applied to.
    pub source_yield: Amount,
    pub commission: Amount,
    pub buckets: ReportBuckets,
    pub created_at: Timestamp,
}

/// Trait for commission history storage.
pub trait CommissionStore {
    fn append_commission(&self, record: &CommissionRecord) -> Result<(), StoreError>;
    fn commissions_for(&self, account: AccountId) -> Result<Vec<CommissionRecord>, StoreError>;
    fn commission_count(&self) -> Result<u64, StoreError>;
}
