//! Aggregate counts for `memory_stats`.

use std::collections::BTreeMap;

use rusqlite::{params, Connection};

use engram_core::errors::EngramResult;
use engram_core::models::{AccessSummary, MemoryStats};
use engram_core::record::Category;

use crate::to_storage_err;

/// Collect store-wide statistics.
pub fn collect_stats(conn: &Connection, top_n: usize) -> EngramResult<MemoryStats> {
    let mut stats = MemoryStats::default();

    let mut stmt = conn
        .prepare("SELECT status, COUNT(*) FROM memories GROUP BY status")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;
    for row in rows {
        let (status, count) = row.map_err(|e| to_storage_err(e.to_string()))?;
        let count = count.max(0) as u64;
        match status.as_str() {
            "active" => stats.total_active = count,
            "superseded" => stats.total_superseded = count,
            "retired" => stats.total_retired = count,
            _ => {}
        }
    }

    stats.by_category = grouped_counts(conn, "category")?
        .into_iter()
        .filter_map(|(raw, count)| raw.parse::<Category>().ok().map(|c| (c, count)))
        .collect();

    stats.by_project = grouped_counts(conn, "COALESCE(project, 'global')")?
        .into_iter()
        .collect();

    let mut stmt = conn
        .prepare(
            "SELECT id, content, access_count FROM memories
             WHERE status = 'active'
             ORDER BY access_count DESC, created_at DESC
             LIMIT ?1",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![top_n as i64], |row| {
            Ok(AccessSummary {
                id: row.get(0)?,
                content: row.get(1)?,
                access_count: row.get::<_, i64>(2)?.max(0) as u64,
            })
        })
        .map_err(|e| to_storage_err(e.to_string()))?;
    for row in rows {
        stats
            .most_accessed
            .push(row.map_err(|e| to_storage_err(e.to_string()))?);
    }

    Ok(stats)
}

/// Active-record counts grouped by the given expression.
fn grouped_counts(conn: &Connection, group_expr: &str) -> EngramResult<BTreeMap<String, u64>> {
    let sql = format!(
        "SELECT {group_expr}, COUNT(*) FROM memories
         WHERE status = 'active'
         GROUP BY {group_expr}"
    );
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut counts = BTreeMap::new();
    for row in rows {
        let (key, count) = row.map_err(|e| to_storage_err(e.to_string()))?;
        counts.insert(key, count.max(0) as u64);
    }
    Ok(counts)
}
