//! Consolidation support: decay, retirement, and dedup application.
//!
//! Every UPDATE here re-asserts its eligibility conditions in the WHERE
//! clause, so a candidate that changed between the read and the write
//! (an access, a racing transition) is simply skipped.

use rusqlite::{params, Connection};

use chrono::{DateTime, Utc};

use engram_core::errors::EngramResult;
use engram_core::record::MemoryRecord;
use engram_core::relation::RelationKind;

use super::memory_crud::parse_memory_row;
use super::MEMORY_COLUMNS;
use crate::{to_storage_err, ts};

/// The instant a record last saw activity: creation, access, or decay.
/// Timestamps are fixed-width UTC strings, so MAX() compares chronologically.
const LAST_ACTIVITY: &str = "MAX(created_at,
     COALESCE(last_accessed_at, created_at),
     COALESCE(last_decayed_at, created_at))";

/// Active records whose last activity predates `cutoff`.
pub fn decay_candidates(
    conn: &Connection,
    cutoff: DateTime<Utc>,
) -> EngramResult<Vec<MemoryRecord>> {
    let sql = format!(
        "SELECT {MEMORY_COLUMNS} FROM memories
         WHERE status = 'active' AND {LAST_ACTIVITY} <= ?1"
    );
    collect_records(conn, &sql, params![ts(cutoff)])
}

/// Multiply importance for the given records, clamped to [0, 1], and
/// advance their decay baseline. Eligibility is re-asserted per row.
/// Returns the number of records actually decayed.
pub fn apply_decay(
    conn: &Connection,
    ids: &[String],
    multiplier: f64,
    cutoff: DateTime<Utc>,
    now: DateTime<Utc>,
) -> EngramResult<u64> {
    if ids.is_empty() {
        return Ok(0);
    }
    let placeholders: Vec<String> = (0..ids.len()).map(|i| format!("?{}", i + 4)).collect();
    let sql = format!(
        "UPDATE memories
         SET importance = MIN(1.0, MAX(0.0, importance * ?1)),
             last_decayed_at = ?2,
             updated_at = ?2
         WHERE id IN ({})
           AND status = 'active'
           AND {LAST_ACTIVITY} <= ?3",
        placeholders.join(", ")
    );

    let mut dyn_params: Vec<Box<dyn rusqlite::types::ToSql>> = vec![
        Box::new(multiplier),
        Box::new(ts(now)),
        Box::new(ts(cutoff)),
    ];
    for id in ids {
        dyn_params.push(Box::new(id.clone()));
    }
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        dyn_params.iter().map(|p| p.as_ref()).collect();

    let rows = conn
        .execute(&sql, params_refs.as_slice())
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(rows as u64)
}

/// Active records created at or before `cutoff` (retirement prefilter).
pub fn active_older_than(
    conn: &Connection,
    cutoff: DateTime<Utc>,
) -> EngramResult<Vec<MemoryRecord>> {
    let sql = format!(
        "SELECT {MEMORY_COLUMNS} FROM memories
         WHERE status = 'active' AND created_at <= ?1"
    );
    collect_records(conn, &sql, params![ts(cutoff)])
}

/// Retire the given records, re-asserting all three retirement
/// conditions per row. Returns the number of records retired.
pub fn retire(
    conn: &Connection,
    ids: &[String],
    importance_below: f64,
    created_cutoff: DateTime<Utc>,
    now: DateTime<Utc>,
) -> EngramResult<u64> {
    if ids.is_empty() {
        return Ok(0);
    }
    let placeholders: Vec<String> = (0..ids.len()).map(|i| format!("?{}", i + 4)).collect();
    let sql = format!(
        "UPDATE memories
         SET status = 'retired', updated_at = ?1
         WHERE id IN ({})
           AND status = 'active'
           AND importance < ?2
           AND access_count = 0
           AND created_at <= ?3",
        placeholders.join(", ")
    );

    let mut dyn_params: Vec<Box<dyn rusqlite::types::ToSql>> = vec![
        Box::new(ts(now)),
        Box::new(importance_below),
        Box::new(ts(created_cutoff)),
    ];
    for id in ids {
        dyn_params.push(Box::new(id.clone()));
    }
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        dyn_params.iter().map(|p| p.as_ref()).collect();

    let rows = conn
        .execute(&sql, params_refs.as_slice())
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(rows as u64)
}

/// Groups of active records sharing (category, content_hash), each group
/// holding two or more records.
pub fn duplicate_groups(conn: &Connection) -> EngramResult<Vec<Vec<MemoryRecord>>> {
    let mut stmt = conn
        .prepare(
            "SELECT category, content_hash FROM memories
             WHERE status = 'active'
             GROUP BY category, content_hash
             HAVING COUNT(*) > 1",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let keys = stmt
        .query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut groups = Vec::new();
    for key in keys {
        let (category, content_hash) = key.map_err(|e| to_storage_err(e.to_string()))?;
        let sql = format!(
            "SELECT {MEMORY_COLUMNS} FROM memories
             WHERE status = 'active' AND category = ?1 AND content_hash = ?2"
        );
        let members = collect_records(conn, &sql, params![category, content_hash])?;
        if members.len() > 1 {
            groups.push(members);
        }
    }
    Ok(groups)
}

/// Supersede every loser in favor of the keeper, recording a
/// keeper→loser supersedes edge. One transaction per group. Returns the
/// number of records actually superseded.
pub fn apply_dedup(
    conn: &Connection,
    keeper_id: &str,
    loser_ids: &[String],
    now: DateTime<Utc>,
) -> EngramResult<u64> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("apply_dedup begin: {e}")))?;

    let result = (|| {
        let mut superseded = 0u64;
        for loser in loser_ids {
            let rows = tx
                .execute(
                    "UPDATE memories
                     SET status = 'superseded', superseded_by = ?2, updated_at = ?3
                     WHERE id = ?1 AND status = 'active'",
                    params![loser, keeper_id, ts(now)],
                )
                .map_err(|e| to_storage_err(e.to_string()))?;
            if rows == 0 {
                continue; // Already transitioned by an earlier pass.
            }
            superseded += rows as u64;
            tx.execute(
                "INSERT OR IGNORE INTO relations (from_id, to_id, kind) VALUES (?1, ?2, ?3)",
                params![keeper_id, loser, RelationKind::Supersedes.as_str()],
            )
            .map_err(|e| to_storage_err(e.to_string()))?;
        }
        Ok(superseded)
    })();

    match result {
        Ok(count) => {
            tx.commit()
                .map_err(|e| to_storage_err(format!("apply_dedup commit: {e}")))?;
            Ok(count)
        }
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}

fn collect_records<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> EngramResult<Vec<MemoryRecord>> {
    let mut stmt = conn.prepare(sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params, |row| Ok(parse_memory_row(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut results = Vec::new();
    for row in rows {
        let record = row.map_err(|e| to_storage_err(e.to_string()))??;
        results.push(record);
    }
    Ok(results)
}
