use serde::{Deserialize, Serialize};

use super::defaults;

/// Scoring engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Frequency boost per access: `1 + access_count * access_boost`.
    pub access_boost: f64,
    /// Base of the exponential time decay: `hourly_decay ^ hours_old`.
    pub hourly_decay: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            access_boost: defaults::DEFAULT_ACCESS_BOOST,
            hourly_decay: defaults::DEFAULT_HOURLY_DECAY,
        }
    }
}
