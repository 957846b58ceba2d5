//! Rank subsystem: the ordered rank rule table, the dynamic bidirectional
//! rank engine, team-volume propagation up the sponsor tree, and the
//! upline/downline walks the commission schemes are built on.

pub mod engine;
pub mod error;
pub mod rules;
pub mod upline;
pub mod volume;

pub use engine::{RankChange, RankEngine};
pub use error::RankError;
pub use rules::{RankRule, RankRuleTable, StructuralRequirement};
pub use upline::{find_downline, find_upline};
pub use volume::TeamVolumePropagator;
