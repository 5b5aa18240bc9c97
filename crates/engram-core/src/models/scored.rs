use serde::{Deserialize, Serialize};

use crate::record::MemoryRecord;

/// A record paired with its composite score at the time of the read.
/// Scores are recomputed on every read and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredMemory {
    pub memory: MemoryRecord,
    pub score: f64,
}
