use canopy_ledger::LedgerError;
use canopy_ranks::RankError;
use canopy_rewards::RewardError;
use canopy_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("job '{0}' is already running")]
    JobAlreadyRunning(String),

    #[error("staking is paused")]
    StakingPaused,

    #[error("withdrawals are paused")]
    WithdrawalsPaused,

    #[error("no stake plan for a {0}-day cycle")]
    UnknownCycle(u32),

    #[error("amount must be positive, got {0}")]
    InvalidAmount(f64),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Rank(#[from] RankError),

    #[error(transparent)]
    Reward(#[from] RewardError),
}
