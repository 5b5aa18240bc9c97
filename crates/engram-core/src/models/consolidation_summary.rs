use serde::{Deserialize, Serialize};

/// What a consolidation pass did, reported to the caller.
/// Scheduling is the caller's concern; the engine only reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidationSummary {
    /// Records whose importance was decayed.
    pub decayed: u64,
    /// Records moved to retired.
    pub retired: u64,
    /// Records superseded as duplicates.
    pub deduplicated: u64,
}

impl ConsolidationSummary {
    /// True when the pass changed nothing.
    pub fn is_noop(&self) -> bool {
        self.decayed == 0 && self.retired == 0 && self.deduplicated == 0
    }
}
