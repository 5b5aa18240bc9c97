//! Retirement of records that decayed to irrelevance.
//!
//! All three conditions must hold: importance below threshold, past the
//! minimum age, never accessed. The storage layer re-asserts the same
//! conditions in its UPDATE, so anything that changed since the read is
//! skipped rather than retired.

use chrono::{DateTime, Duration, Utc};

use engram_core::config::ConsolidationConfig;
use engram_core::errors::EngramResult;
use engram_scoring::evaluate_retirement;
use engram_storage::StorageEngine;

/// Run the retirement step. Returns the number of records retired.
pub fn run(
    storage: &StorageEngine,
    config: &ConsolidationConfig,
    now: DateTime<Utc>,
) -> EngramResult<u64> {
    let cutoff = now - Duration::days(config.retire_after_days);
    let candidates = storage.active_older_than(cutoff)?;

    let ids: Vec<String> = candidates
        .iter()
        .filter(|record| {
            let decision = evaluate_retirement(record, config, now);
            if decision.should_retire {
                tracing::debug!(id = %record.id, reason = %decision.reason, "retiring");
            }
            decision.should_retire
        })
        .map(|record| record.id.clone())
        .collect();

    if ids.is_empty() {
        return Ok(0);
    }

    let retired = storage.retire(&ids, config.retire_below, cutoff, now)?;
    tracing::info!(retired, "retirement step complete");
    Ok(retired)
}
