use serde::{Deserialize, Serialize};

use crate::record::{Category, MemoryStatus};

/// Filters for `list_memories`. `status: None` lists active records;
/// passing an explicit status supports audit listings of terminal ones.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub category: Option<Category>,
    /// Restrict to one project. Records with no project (global) are
    /// included as well, so project views never hide global knowledge.
    pub project: Option<String>,
    pub status: Option<MemoryStatus>,
}

/// Sort orders for `list_memories`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListSort {
    /// Composite score, computed at read time.
    Score,
    /// Most recently created first.
    Recency,
    /// Most accessed first.
    AccessCount,
}
