use canopy_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RankError {
    #[error("invalid rank rule table: {0}")]
    InvalidRuleTable(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
