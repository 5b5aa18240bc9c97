use chrono::{DateTime, Utc};

use super::base::MemoryRecord;
use super::category::Category;
use super::confidence::Confidence;
use super::importance::Importance;
use super::status::MemoryStatus;
use crate::constants::{DEFAULT_CONFIDENCE, DEFAULT_IMPORTANCE};
use crate::errors::{EngramError, EngramResult};

/// Input for `remember`: everything the caller supplies before the store
/// assigns identity and timestamps. Importance and confidence stay raw
/// f64 here; validation happens in [`MemoryDraft::into_record`] so the
/// boundary rejects bad input before any write.
#[derive(Debug, Clone)]
pub struct MemoryDraft {
    pub content: String,
    pub category: Category,
    pub project: Option<String>,
    pub context: Option<String>,
    pub importance: f64,
    pub confidence: f64,
    pub tags: Vec<String>,
    pub source_session: Option<String>,
}

impl MemoryDraft {
    /// New draft with the default importance/confidence and no tags.
    pub fn new(content: impl Into<String>, category: Category) -> Self {
        Self {
            content: content.into(),
            category,
            project: None,
            context: None,
            importance: DEFAULT_IMPORTANCE,
            confidence: DEFAULT_CONFIDENCE,
            tags: Vec::new(),
            source_session: None,
        }
    }

    /// Validate the draft and build the record to insert.
    ///
    /// Rejects empty content and out-of-range importance/confidence.
    /// Tags are trimmed, lowercased, deduplicated; empty tags dropped.
    pub fn into_record(self, id: String, now: DateTime<Utc>) -> EngramResult<MemoryRecord> {
        if self.content.trim().is_empty() {
            return Err(EngramError::validation("content", "must not be empty"));
        }
        let importance = Importance::new(self.importance)?;
        let confidence = Confidence::new(self.confidence)?;

        let mut tags: Vec<String> = self
            .tags
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        tags.sort();
        tags.dedup();

        let content_hash = MemoryRecord::compute_content_hash(&self.content);

        Ok(MemoryRecord {
            id,
            content: self.content,
            category: self.category,
            project: self.project,
            context: self.context,
            importance,
            confidence,
            access_count: 0,
            created_at: now,
            last_accessed_at: None,
            updated_at: now,
            last_decayed_at: None,
            tags,
            status: MemoryStatus::Active,
            supersedes: None,
            superseded_by: None,
            content_hash,
            source_session: self.source_session,
        })
    }
}
