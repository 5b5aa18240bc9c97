use chrono::{DateTime, Utc};

use engram_core::config::ScoringConfig;
use engram_core::models::ScoredMemory;
use engram_core::record::MemoryRecord;

use crate::formula;

/// Scoring engine: ranks batches of records by composite score.
///
/// Stateless apart from configuration; every call takes the current
/// time explicitly so results are deterministic under test.
#[derive(Debug, Default, Clone)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    /// Create a new ScoringEngine with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a custom configuration.
    pub fn with_config(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Get the scoring configuration.
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score a single record at `now`.
    pub fn score(&self, memory: &MemoryRecord, now: DateTime<Utc>) -> f64 {
        formula::compute(memory, &self.config, now)
    }

    /// Score with a full factor breakdown.
    pub fn breakdown(&self, memory: &MemoryRecord, now: DateTime<Utc>) -> formula::ScoreBreakdown {
        formula::compute_breakdown(memory, &self.config, now)
    }

    /// Score a batch and sort descending. Ties break by most recent
    /// `created_at`, then id, so ordering is deterministic.
    pub fn rank(&self, memories: Vec<MemoryRecord>, now: DateTime<Utc>) -> Vec<ScoredMemory> {
        let mut scored: Vec<ScoredMemory> = memories
            .into_iter()
            .map(|memory| {
                let score = formula::compute(&memory, &self.config, now);
                ScoredMemory { memory, score }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.memory.created_at.cmp(&a.memory.created_at))
                .then_with(|| a.memory.id.cmp(&b.memory.id))
        });
        scored
    }
}
