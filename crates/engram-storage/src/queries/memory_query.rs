//! Filtered listings over the memories table.

use rusqlite::Connection;

use engram_core::errors::EngramResult;
use engram_core::models::{ListFilter, ListSort};
use engram_core::record::{MemoryRecord, MemoryStatus};

use super::memory_crud::parse_memory_row;
use super::MEMORY_COLUMNS;
use crate::to_storage_err;

/// List records matching the filter.
///
/// The score ordering here is the stored-field proxy
/// `importance * confidence * (1 + access_count * 0.1)`; the time-decay
/// factor depends on "now", which SQL does not know. Callers that need
/// exact score order re-rank the returned page with the scoring engine.
pub fn list_memories(
    conn: &Connection,
    filter: &ListFilter,
    sort: ListSort,
    limit: Option<usize>,
) -> EngramResult<Vec<MemoryRecord>> {
    let mut conditions = vec!["status = ?1".to_string()];
    let status = filter.status.unwrap_or(MemoryStatus::Active);
    let mut dyn_params: Vec<Box<dyn rusqlite::types::ToSql>> =
        vec![Box::new(status.as_str().to_string())];

    if let Some(category) = filter.category {
        dyn_params.push(Box::new(category.as_str().to_string()));
        conditions.push(format!("category = ?{}", dyn_params.len()));
    }
    if let Some(project) = &filter.project {
        dyn_params.push(Box::new(project.clone()));
        conditions.push(format!(
            "(project = ?{} OR project IS NULL)",
            dyn_params.len()
        ));
    }

    let order = match sort {
        ListSort::Score => "importance * confidence * (1.0 + access_count * 0.1) DESC",
        ListSort::Recency => "created_at DESC",
        ListSort::AccessCount => "access_count DESC",
    };

    dyn_params.push(Box::new(limit.map(|l| l as i64).unwrap_or(-1)));
    let sql = format!(
        "SELECT {MEMORY_COLUMNS} FROM memories
         WHERE {}
         ORDER BY {order}, created_at DESC
         LIMIT ?{}",
        conditions.join(" AND "),
        dyn_params.len()
    );

    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        dyn_params.iter().map(|p| p.as_ref()).collect();

    let rows = stmt
        .query_map(params_refs.as_slice(), |row| Ok(parse_memory_row(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut results = Vec::new();
    for row in rows {
        let record = row.map_err(|e| to_storage_err(e.to_string()))??;
        results.push(record);
    }
    Ok(results)
}
