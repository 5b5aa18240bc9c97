//! # engram-storage
//!
//! SQLite persistence for the Engram memory store: the record table, the
//! FTS5 search index (kept in sync by triggers, no divergence window),
//! and the relation graph. One write connection behind a mutex gives
//! every mutating operation single-transaction atomicity; a small WAL
//! read pool serves queries.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;
pub mod search;

use chrono::{DateTime, SecondsFormat, Utc};

use engram_core::errors::EngramError;

pub use engine::StorageEngine;
pub use queries::memory_search::SearchFilter;
pub use search::{parse_query, QueryExpr};

/// Wrap a low-level failure message in the storage error variant.
pub(crate) fn to_storage_err(message: String) -> EngramError {
    EngramError::Storage { message }
}

/// Render a timestamp for storage. Fixed-width UTC so that string
/// comparison in SQL is chronological.
pub(crate) fn ts(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp.
pub(crate) fn parse_ts(raw: &str) -> Result<DateTime<Utc>, EngramError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| to_storage_err(format!("bad timestamp '{raw}': {e}")))
}
