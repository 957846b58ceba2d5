//! Commission schemes layered on the sponsor tree.
//!
//! Three overlapping schemes fire on every stake's daily yield: the
//! unconditional L1/L2 direct/indirect bonus, the rank-gated bonus under a
//! dynamic cap, and the 10-level unilevel scheme behind a progressive
//! unlock. Locked levels and exhausted caps are policy branches, never
//! errors.

pub mod direct;
pub mod error;
pub mod rank_bonus;
pub mod unilevel;
pub mod unlock;

pub use direct::DirectBonus;
pub use error::RewardError;
pub use rank_bonus::{RankBonusLedger, RankBonusOutcome};
pub use unilevel::UnilevelDistributor;
pub use unlock::{active_directs, refresh_unlock_state, unlocked_levels};
