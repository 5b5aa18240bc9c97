/// Engram system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Importance assigned to a memory when the caller does not specify one.
pub const DEFAULT_IMPORTANCE: f64 = 0.5;

/// Confidence assigned to a memory when the caller does not specify one.
pub const DEFAULT_CONFIDENCE: f64 = 0.8;

/// Confidence assigned to a correction replacement unless overridden.
pub const CORRECTION_CONFIDENCE: f64 = 0.9;

/// A correction is at least this important, regardless of the original.
pub const CORRECTION_MIN_IMPORTANCE: f64 = 0.7;

/// Default number of results returned by `recall`.
pub const DEFAULT_RECALL_LIMIT: usize = 10;

/// Recall fetches this many times the requested limit from the search
/// index, then re-ranks by composite score before truncating.
pub const RECALL_CANDIDATE_FACTOR: usize = 4;

/// Default number of results returned by `list_memories`.
pub const DEFAULT_LIST_LIMIT: usize = 20;

/// Number of most-accessed records reported by `memory_stats`.
pub const TOP_ACCESSED_LIMIT: usize = 5;
