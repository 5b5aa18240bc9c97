use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::record::Category;

/// Aggregate counts over the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStats {
    pub total_active: u64,
    pub total_superseded: u64,
    pub total_retired: u64,
    /// Active records per category.
    pub by_category: BTreeMap<Category, u64>,
    /// Active records per project; global records under "global".
    pub by_project: BTreeMap<String, u64>,
    /// Most-accessed active records, descending.
    pub most_accessed: Vec<AccessSummary>,
}

/// One row of the most-accessed listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessSummary {
    pub id: String,
    pub content: String,
    pub access_count: u64,
}
