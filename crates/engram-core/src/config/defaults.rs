//! Default values shared by the config structs.

/// Per-access multiplier on the frequency boost: `1 + access_count * 0.1`.
pub const DEFAULT_ACCESS_BOOST: f64 = 0.1;

/// Hourly decay base for the composite score: `0.998 ^ hours`.
pub const DEFAULT_HOURLY_DECAY: f64 = 0.998;

/// A record must sit untouched this long before a consolidation pass
/// decays its importance.
pub const DEFAULT_DECAY_AFTER_DAYS: i64 = 30;

/// Importance multiplier applied by each qualifying decay pass.
pub const DEFAULT_DECAY_MULTIPLIER: f64 = 0.9;

/// Records with importance below this are retirement candidates.
pub const DEFAULT_RETIRE_BELOW: f64 = 0.1;

/// Minimum age before a record can be retired.
pub const DEFAULT_RETIRE_AFTER_DAYS: i64 = 90;
