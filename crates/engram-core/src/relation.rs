//! Directed relations between memory records.
//!
//! Relations are additive facts about the record graph; they never decay
//! and are never deleted. A `Supersedes` edge written through `correct`
//! also sets the two records' scalar back-references; edges written
//! through the explicit `relate` operation are advisory and change no
//! status.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::EngramError;

/// The 4 relation kinds between memories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Supports,
    Contradicts,
    Refines,
    Supersedes,
}

impl RelationKind {
    /// Total number of relation kinds.
    pub const COUNT: usize = 4;

    /// All variants for iteration.
    pub const ALL: [RelationKind; 4] = [
        Self::Supports,
        Self::Contradicts,
        Self::Refines,
        Self::Supersedes,
    ];

    /// Stable storage identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Supports => "supports",
            Self::Contradicts => "contradicts",
            Self::Refines => "refines",
            Self::Supersedes => "supersedes",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationKind {
    type Err = EngramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| EngramError::validation("relation", format!("unknown relation kind '{s}'")))
    }
}

/// A directed edge in the relation graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationEdge {
    pub from_id: String,
    pub to_id: String,
    pub kind: RelationKind,
}

/// Which side of an edge the queried record sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationDirection {
    Outgoing,
    Incoming,
}

/// One entry in a `relations_of` listing: the peer on the other side of
/// an edge, the edge kind, and which direction the edge points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedMemory {
    pub peer_id: String,
    pub kind: RelationKind,
    pub direction: RelationDirection,
}
