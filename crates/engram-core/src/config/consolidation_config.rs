use serde::{Deserialize, Serialize};

use super::defaults;

/// Consolidation subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsolidationConfig {
    /// Days a record must sit untouched before a pass decays it.
    pub decay_after_days: i64,
    /// Importance multiplier applied by each qualifying decay pass.
    pub decay_multiplier: f64,
    /// Importance threshold below which a record may be retired.
    pub retire_below: f64,
    /// Minimum age in days before a record can be retired.
    pub retire_after_days: i64,
}

impl Default for ConsolidationConfig {
    fn default() -> Self {
        Self {
            decay_after_days: defaults::DEFAULT_DECAY_AFTER_DAYS,
            decay_multiplier: defaults::DEFAULT_DECAY_MULTIPLIER,
            retire_below: defaults::DEFAULT_RETIRE_BELOW,
            retire_after_days: defaults::DEFAULT_RETIRE_AFTER_DAYS,
        }
    }
}
