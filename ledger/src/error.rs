use canopy_store::StoreError;
use canopy_types::Amount;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("amount must be positive, got {0}")]
    InvalidAmount(f64),

    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Amount, available: Amount },

    #[error("swap amount below minimum of {minimum}")]
    SwapBelowMinimum { minimum: Amount },

    #[error(transparent)]
    Store(#[from] StoreError),
}
