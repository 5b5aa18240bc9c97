//! Importance decay for records nobody has touched in a while.
//!
//! Eligibility keys off the record's last activity: the latest of
//! creation, access, and the previous decay. That baseline is what makes
//! the step idempotent: an immediate re-run finds every just-decayed
//! record active again today and skips it, while passes separated by
//! another full idle window decay geometrically.

use chrono::{DateTime, Duration, Utc};

use engram_core::config::ConsolidationConfig;
use engram_core::errors::EngramResult;
use engram_storage::StorageEngine;

/// Run the decay step. Returns the number of records decayed.
pub fn run(
    storage: &StorageEngine,
    config: &ConsolidationConfig,
    now: DateTime<Utc>,
) -> EngramResult<u64> {
    let cutoff = now - Duration::days(config.decay_after_days);
    let candidates = storage.decay_candidates(cutoff)?;
    if candidates.is_empty() {
        return Ok(0);
    }

    let ids: Vec<String> = candidates.iter().map(|m| m.id.clone()).collect();
    let decayed = storage.apply_decay(&ids, config.decay_multiplier, cutoff, now)?;
    tracing::info!(
        decayed,
        multiplier = config.decay_multiplier,
        idle_days = config.decay_after_days,
        "decay step complete"
    );
    Ok(decayed)
}
