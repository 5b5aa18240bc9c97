//! # engram-core
//!
//! Foundation crate for the Engram memory store.
//! Defines the record model, relation types, errors, config, constants,
//! and the clock abstraction. Every other crate in the workspace depends
//! on this.

pub mod clock;
pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod record;
pub mod relation;

// Re-export the most commonly used types at the crate root.
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConsolidationConfig, ScoringConfig};
pub use errors::{EngramError, EngramResult};
pub use record::{Category, Confidence, Importance, MemoryDraft, MemoryRecord, MemoryStatus};
pub use relation::{RelatedMemory, RelationDirection, RelationEdge, RelationKind};
