//! Rank tier identifier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A rank tier id, e.g. `B0` through `B9`.
///
/// Tier ordering is not encoded in the id itself; the ordered rank rule
/// table determines which tier outranks which.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TierId(String);

impl TierId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TierId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
