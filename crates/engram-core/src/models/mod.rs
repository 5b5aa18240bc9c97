pub mod consolidation_summary;
pub mod listing;
pub mod scored;
pub mod stats;

pub use consolidation_summary::ConsolidationSummary;
pub use listing::{ListFilter, ListSort};
pub use scored::ScoredMemory;
pub use stats::{AccessSummary, MemoryStats};
