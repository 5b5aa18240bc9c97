//! Deduplication of active records with identical normalized content.
//!
//! Duplicates are grouped by (category, content_hash), where the hash is
//! taken over trimmed, whitespace-collapsed, lowercased content. Within
//! each group the highest-scoring record stays active (ties go to the
//! most recently created); the rest are superseded and linked to the
//! keeper with a supersedes edge.

use chrono::{DateTime, Utc};

use engram_core::errors::EngramResult;
use engram_scoring::ScoringEngine;
use engram_storage::StorageEngine;

/// Run the dedup step. Returns the number of records superseded.
pub fn run(
    storage: &StorageEngine,
    scoring: &ScoringEngine,
    now: DateTime<Utc>,
) -> EngramResult<u64> {
    let groups = storage.duplicate_groups()?;
    if groups.is_empty() {
        return Ok(0);
    }

    let mut superseded = 0u64;
    for group in groups {
        let ranked = scoring.rank(group, now);
        let Some(keeper) = ranked.first() else {
            continue;
        };
        let keeper_id = keeper.memory.id.clone();
        let loser_ids: Vec<String> = ranked
            .iter()
            .skip(1)
            .map(|s| s.memory.id.clone())
            .collect();

        tracing::debug!(
            keeper = %keeper_id,
            duplicates = loser_ids.len(),
            "folding duplicate group"
        );
        superseded += storage.apply_dedup(&keeper_id, &loser_ids, now)?;
    }

    tracing::info!(superseded, "dedup step complete");
    Ok(superseded)
}
