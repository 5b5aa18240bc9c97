//! SQL query modules. Every SELECT names its columns explicitly so a
//! database touched by a newer schema (extra columns) still reads here.

pub mod maintenance;
pub mod memory_crud;
pub mod memory_query;
pub mod memory_search;
pub mod relation_ops;
pub mod stats;

/// The base SELECT columns for all memory queries (18 columns, indices 0-17).
pub(crate) const MEMORY_COLUMNS: &str =
    "id, content, category, project, context, importance, confidence,
     access_count, created_at, last_accessed_at, updated_at, last_decayed_at,
     tags, status, supersedes, superseded_by, content_hash, source_session";
