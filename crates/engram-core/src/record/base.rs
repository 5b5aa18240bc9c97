use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::Category;
use super::confidence::Confidence;
use super::importance::Importance;
use super::status::MemoryStatus;

/// A single stored unit of knowledge with scoring and lifecycle metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// UUID v4 identifier. Never reused, even after retirement.
    pub id: String,
    /// The knowledge payload, free text.
    pub content: String,
    /// Which kind of knowledge this is.
    pub category: Category,
    /// Project label if project-specific; None means global.
    pub project: Option<String>,
    /// Optional note about where/when this was learned.
    pub context: Option<String>,
    /// How critical this knowledge is, [0.0, 1.0].
    pub importance: Importance,
    /// How certain the knowledge is, [0.0, 1.0].
    pub confidence: Confidence,
    /// Incremented once per successful retrieval.
    pub access_count: u64,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// Last retrieval that counted as an access, if any.
    pub last_accessed_at: Option<DateTime<Utc>>,
    /// Last mutation of any kind.
    pub updated_at: DateTime<Utc>,
    /// Baseline for consolidation decay. A pass only decays a record
    /// whose last activity (creation, access, or prior decay) is older
    /// than the decay window, so immediate re-runs change nothing.
    pub last_decayed_at: Option<DateTime<Utc>>,
    /// Keyword tags, lowercased and trimmed at the boundary.
    pub tags: Vec<String>,
    /// Lifecycle status. Transitions are monotonic; see [`MemoryStatus`].
    pub status: MemoryStatus,
    /// ID of the record this one replaced via correction.
    pub supersedes: Option<String>,
    /// ID of the record that replaced this one.
    pub superseded_by: Option<String>,
    /// blake3 hash of the normalized content, used for deduplication.
    pub content_hash: String,
    /// Session label recorded at creation, if the caller supplied one.
    pub source_session: Option<String>,
}

impl MemoryRecord {
    /// Normalize content for duplicate detection: trim, collapse internal
    /// whitespace runs to a single space, Unicode-lowercase.
    pub fn normalize_content(content: &str) -> String {
        content
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    /// Compute the blake3 hash of the normalized content.
    pub fn compute_content_hash(content: &str) -> String {
        let normalized = Self::normalize_content(content);
        blake3::hash(normalized.as_bytes()).to_hex().to_string()
    }

    /// Fractional hours elapsed since creation, never negative.
    pub fn age_hours(&self, now: DateTime<Utc>) -> f64 {
        ((now - self.created_at).num_seconds().max(0)) as f64 / 3600.0
    }

    /// The most recent of creation, access, and decay baseline. This is
    /// the reference instant consolidation measures idleness from.
    pub fn last_activity(&self) -> DateTime<Utc> {
        let mut latest = self.created_at;
        if let Some(accessed) = self.last_accessed_at {
            latest = latest.max(accessed);
        }
        if let Some(decayed) = self.last_decayed_at {
            latest = latest.max(decayed);
        }
        latest
    }
}

/// Identity equality: two records are equal if they have the same ID.
/// For duplicate detection, compare `content_hash` and `category` instead.
impl PartialEq for MemoryRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
