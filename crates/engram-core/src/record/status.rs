use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::EngramError;

/// Lifecycle status of a memory record.
///
/// Transitions are monotonic and one-directional: `Active` may move to
/// `Superseded` (correction, forget, dedup) or `Retired` (consolidation).
/// Both destinations are terminal; records are never physically deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryStatus {
    Active,
    Superseded,
    Retired,
}

impl MemoryStatus {
    /// All variants for iteration.
    pub const ALL: [MemoryStatus; 3] = [Self::Active, Self::Superseded, Self::Retired];

    /// Stable storage identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Superseded => "superseded",
            Self::Retired => "retired",
        }
    }

    /// Terminal statuses admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Superseded | Self::Retired)
    }

    /// Whether a transition from `self` to `next` is legal.
    pub fn can_transition_to(self, next: MemoryStatus) -> bool {
        self == Self::Active && next.is_terminal()
    }
}

impl fmt::Display for MemoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemoryStatus {
    type Err = EngramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| EngramError::validation("status", format!("unknown status '{s}'")))
    }
}
