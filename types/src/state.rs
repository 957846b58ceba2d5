//! State enums shared across the workspace.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The two fungible units every balance and ledger entry is denominated in.
///
/// `Withdrawable` is the unit the blockchain pipeline can pay out;
/// `Points` is the internal stable unit. The currency abstraction decides
/// which one distribution credits land in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    Withdrawable,
    Points,
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Withdrawable => write!(f, "withdrawable"),
            Currency::Points => write!(f, "points"),
        }
    }
}

/// Lifecycle state of a stake. `Completed` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StakeStatus {
    Active,
    Completed,
}

/// Outcome of one distribution run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Success,
    Failed,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Success => write!(f, "success"),
            RunStatus::Failed => write!(f, "failed"),
        }
    }
}
