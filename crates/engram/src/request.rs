//! Caller-facing request types for the façade operations.

use engram_core::constants::DEFAULT_RECALL_LIMIT;
use engram_core::record::Category;

/// Parameters for `recall`.
#[derive(Debug, Clone)]
pub struct RecallRequest {
    /// Search query: implicit AND, explicit OR, `NOT term`, "quoted phrase".
    pub query: String,
    pub category: Option<Category>,
    /// Restrict to one project; global memories are included as well.
    pub project: Option<String>,
    /// Admit superseded/retired records (audit queries). Inactive
    /// records returned this way do not get their access bumped.
    pub include_inactive: bool,
    pub limit: usize,
}

impl RecallRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            category: None,
            project: None,
            include_inactive: false,
            limit: DEFAULT_RECALL_LIMIT,
        }
    }
}

/// Target selector for `forget`.
///
/// A query target must resolve to exactly one active record; anything
/// else is an error, so `forget` never silently acts on multiple
/// records.
#[derive(Debug, Clone)]
pub enum ForgetTarget {
    Id(String),
    Query(String),
}
