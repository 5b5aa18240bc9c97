use chrono::{DateTime, Utc};

use engram_core::config::ScoringConfig;
use engram_core::record::MemoryRecord;

/// Composite retrieval score.
///
/// ```text
/// score = importance
///   × confidence
///   × (1 + access_count × 0.1)
///   × 0.998 ^ (hours since created_at)
/// ```
///
/// Importance and confidence are explicit judgments of value; the access
/// multiplier rewards demonstrated usefulness; the exponential factor is
/// a soft recency bias that never reaches zero, so old but important
/// memories stay retrievable. Removal is consolidation's job, not the
/// score's. The score is recomputed on every read and never persisted.
pub fn compute(memory: &MemoryRecord, config: &ScoringConfig, now: DateTime<Utc>) -> f64 {
    let frequency_boost = 1.0 + memory.access_count as f64 * config.access_boost;
    let time_decay = config.hourly_decay.powf(memory.age_hours(now));
    memory.importance.value() * memory.confidence.value() * frequency_boost * time_decay
}

/// Each factor individually, for debugging/observability.
#[derive(Debug, Clone)]
pub struct ScoreBreakdown {
    pub importance: f64,
    pub confidence: f64,
    pub frequency_boost: f64,
    pub time_decay: f64,
    pub score: f64,
}

/// Compute the score with a full breakdown of each factor.
pub fn compute_breakdown(
    memory: &MemoryRecord,
    config: &ScoringConfig,
    now: DateTime<Utc>,
) -> ScoreBreakdown {
    let importance = memory.importance.value();
    let confidence = memory.confidence.value();
    let frequency_boost = 1.0 + memory.access_count as f64 * config.access_boost;
    let time_decay = config.hourly_decay.powf(memory.age_hours(now));

    ScoreBreakdown {
        importance,
        confidence,
        frequency_boost,
        time_decay,
        score: importance * confidence * frequency_boost * time_decay,
    }
}
