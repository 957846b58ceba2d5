use canopy_ledger::LedgerError;
use canopy_ranks::RankError;
use canopy_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RewardError {
    #[error("no rank rule for tier {0}")]
    RuleNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Rank(#[from] RankError),
}
