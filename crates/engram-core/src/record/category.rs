use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::EngramError;

/// The 7 memory categories. Closed enumeration so invalid values are
/// caught at the boundary instead of at query time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Preferences,
    Corrections,
    Decisions,
    Facts,
    Procedures,
    ProjectKnowledge,
    Relationships,
}

impl Category {
    /// Total number of categories.
    pub const COUNT: usize = 7;

    /// All variants for iteration.
    pub const ALL: [Category; 7] = [
        Self::Preferences,
        Self::Corrections,
        Self::Decisions,
        Self::Facts,
        Self::Procedures,
        Self::ProjectKnowledge,
        Self::Relationships,
    ];

    /// Stable storage identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Preferences => "preferences",
            Self::Corrections => "corrections",
            Self::Decisions => "decisions",
            Self::Facts => "facts",
            Self::Procedures => "procedures",
            Self::ProjectKnowledge => "project-knowledge",
            Self::Relationships => "relationships",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = EngramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| EngramError::validation("category", format!("unknown category '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_variant() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn rejects_unknown_category() {
        assert!(matches!(
            "musings".parse::<Category>(),
            Err(EngramError::Validation { field: "category", .. })
        ));
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&Category::ProjectKnowledge).unwrap();
        assert_eq!(json, "\"project-knowledge\"");
    }
}
