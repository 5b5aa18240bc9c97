//! ConsolidationEngine: runs the three steps in order behind a
//! single-execution guard.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};

use engram_core::config::ConsolidationConfig;
use engram_core::errors::{EngramError, EngramResult};
use engram_core::models::ConsolidationSummary;
use engram_scoring::ScoringEngine;
use engram_storage::StorageEngine;

use crate::passes;

/// The consolidation engine.
///
/// A pass is decay → retirement → dedup, each step committing
/// independently. The guard rejects overlapping passes with
/// `ConsolidationBusy`; every step is also idempotent, so even a
/// duplicate pass that slipped through scheduling changes nothing.
pub struct ConsolidationEngine {
    /// Guard: only one consolidation can run at a time.
    is_running: AtomicBool,
    config: ConsolidationConfig,
    scoring: ScoringEngine,
}

impl ConsolidationEngine {
    /// Create a new engine with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ConsolidationConfig::default())
    }

    /// Create with a custom configuration.
    pub fn with_config(config: ConsolidationConfig) -> Self {
        Self {
            is_running: AtomicBool::new(false),
            config,
            scoring: ScoringEngine::new(),
        }
    }

    /// Check if a consolidation is currently running.
    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Relaxed)
    }

    /// Get the consolidation configuration.
    pub fn config(&self) -> &ConsolidationConfig {
        &self.config
    }

    /// Run one full pass at the given instant.
    pub fn run(
        &self,
        storage: &StorageEngine,
        now: DateTime<Utc>,
    ) -> EngramResult<ConsolidationSummary> {
        // Acquire the single-execution guard.
        if self
            .is_running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(EngramError::ConsolidationBusy);
        }

        let result = self.run_steps(storage, now);

        // Release the guard before surfacing any step failure.
        self.is_running.store(false, Ordering::SeqCst);

        let summary = result?;
        tracing::info!(
            decayed = summary.decayed,
            retired = summary.retired,
            deduplicated = summary.deduplicated,
            "consolidation pass complete"
        );
        Ok(summary)
    }

    fn run_steps(
        &self,
        storage: &StorageEngine,
        now: DateTime<Utc>,
    ) -> EngramResult<ConsolidationSummary> {
        let decayed = passes::decay::run(storage, &self.config, now)?;
        let retired = passes::retire::run(storage, &self.config, now)?;
        let deduplicated = passes::dedup::run(storage, &self.scoring, now)?;
        Ok(ConsolidationSummary {
            decayed,
            retired,
            deduplicated,
        })
    }
}

impl Default for ConsolidationEngine {
    fn default() -> Self {
        Self::new()
    }
}
