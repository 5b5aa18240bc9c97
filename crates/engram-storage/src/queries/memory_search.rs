//! FTS5 full-text search queries.

use rusqlite::Connection;

use engram_core::errors::EngramResult;
use engram_core::record::{Category, MemoryRecord};

use super::memory_crud::parse_memory_row;
use super::MEMORY_COLUMNS;
use crate::to_storage_err;

/// Filters applied alongside the MATCH expression.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    pub category: Option<Category>,
    /// Restrict to one project; global records are included as well.
    pub project: Option<String>,
    /// Admit superseded/retired records (audit and maintenance queries).
    pub include_inactive: bool,
}

/// Search the FTS index. `match_expr` must come from the query parser,
/// which quotes every term. Results arrive in BM25 relevance order; the
/// façade re-ranks by composite score.
pub fn search_fts(
    conn: &Connection,
    match_expr: &str,
    filter: &SearchFilter,
    limit: usize,
) -> EngramResult<Vec<MemoryRecord>> {
    let mut conditions = vec!["memories_fts MATCH ?1".to_string()];
    let mut dyn_params: Vec<Box<dyn rusqlite::types::ToSql>> =
        vec![Box::new(match_expr.to_string())];

    if !filter.include_inactive {
        conditions.push("m.status = 'active'".to_string());
    }
    if let Some(category) = filter.category {
        dyn_params.push(Box::new(category.as_str().to_string()));
        conditions.push(format!("m.category = ?{}", dyn_params.len()));
    }
    if let Some(project) = &filter.project {
        dyn_params.push(Box::new(project.clone()));
        conditions.push(format!(
            "(m.project = ?{} OR m.project IS NULL)",
            dyn_params.len()
        ));
    }

    dyn_params.push(Box::new(limit as i64));
    let columns = prefixed_columns();
    let sql = format!(
        "SELECT {columns} FROM memories_fts fts
         JOIN memories m ON m.rowid = fts.rowid
         WHERE {}
         ORDER BY rank
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

/// `MEMORY_COLUMNS` with each column prefixed `m.` for the FTS join.
fn prefixed_columns() -> String {
    MEMORY_COLUMNS
        .split(',')
        .map(|col| format!("m.{}", col.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}
