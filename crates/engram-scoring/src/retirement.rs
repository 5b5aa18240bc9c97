use chrono::{DateTime, Duration, Utc};

use engram_core::config::ConsolidationConfig;
use engram_core::record::MemoryRecord;

/// Retirement eligibility check.
///
/// A record is retired only when all three conditions hold at once:
/// importance below the threshold, age at or past the minimum, and zero
/// accesses. Any access ever recorded keeps the record out of
/// retirement permanently. Non-active records are skipped; retirement
/// is a transition out of `Active` only.
#[derive(Debug, Clone)]
pub struct RetirementDecision {
    pub memory_id: String,
    pub should_retire: bool,
    pub reason: String,
}

/// Evaluate retirement eligibility for a record.
pub fn evaluate(
    memory: &MemoryRecord,
    config: &ConsolidationConfig,
    now: DateTime<Utc>,
) -> RetirementDecision {
    let decision = |should_retire: bool, reason: String| RetirementDecision {
        memory_id: memory.id.clone(),
        should_retire,
        reason,
    };

    if memory.status.is_terminal() {
        return decision(false, format!("already {}", memory.status));
    }
    if memory.importance.value() >= config.retire_below {
        return decision(
            false,
            format!(
                "importance {:.3} at or above threshold {:.3}",
                memory.importance.value(),
                config.retire_below
            ),
        );
    }
    if memory.access_count > 0 {
        return decision(false, format!("accessed {} times", memory.access_count));
    }
    let min_age = Duration::days(config.retire_after_days);
    if now - memory.created_at < min_age {
        return decision(
            false,
            format!("younger than {} days", config.retire_after_days),
        );
    }

    decision(
        true,
        format!(
            "importance {:.3} below {:.3}, never accessed, older than {} days",
            memory.importance.value(),
            config.retire_below,
            config.retire_after_days
        ),
    )
}
