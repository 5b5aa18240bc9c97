//! # engram
//!
//! A local, persistent memory store for an AI coding assistant: facts,
//! preferences, corrections, decisions, and procedures that survive
//! otherwise stateless sessions.
//!
//! This crate is the query façade: the seven operations external
//! callers use (`remember`, `recall`, `correct`, `forget`,
//! `list_memories`, `memory_stats`, `relate`), plus the `consolidate`
//! maintenance entry point and the `top_memories` snapshot for
//! session-start surfacing.
//!
//! ```no_run
//! use engram::{Engram, MemoryDraft, Category, RecallRequest};
//!
//! # fn main() -> engram::EngramResult<()> {
//! let engram = Engram::open(std::path::Path::new(".claude/memory/engram.db"))?;
//! engram.remember(MemoryDraft::new(
//!     "user prefers rebase over merge",
//!     Category::Preferences,
//! ))?;
//! let hits = engram.recall(&RecallRequest::new("rebase"))?;
//! # let _ = hits;
//! # Ok(())
//! # }
//! ```

pub mod facade;
pub mod request;

pub use facade::Engram;
pub use request::{ForgetTarget, RecallRequest};

// Re-export the vocabulary callers need alongside the façade.
pub use engram_core::{
    Category, Clock, ConsolidationConfig, EngramError, EngramResult, FixedClock, MemoryDraft,
    MemoryRecord, MemoryStatus, RelatedMemory, RelationKind, ScoringConfig, SystemClock,
};
pub use engram_core::models::{
    ConsolidationSummary, ListFilter, ListSort, MemoryStats, ScoredMemory,
};
