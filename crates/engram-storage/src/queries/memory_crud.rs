//! Insert, get, update, status transitions, and access bumps.

use rusqlite::{params, Connection, OptionalExtension, Row};

use chrono::{DateTime, Utc};

use engram_core::errors::{EngramError, EngramResult};
use engram_core::record::{Confidence, Importance, MemoryRecord, MemoryStatus};
use engram_core::relation::RelationKind;

use super::MEMORY_COLUMNS;
use crate::{parse_ts, to_storage_err, ts};

/// Insert a single record.
/// Wrapped in a transaction: row + FTS trigger effects are all-or-nothing.
pub fn insert_memory(conn: &Connection, record: &MemoryRecord) -> EngramResult<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("insert_memory begin: {e}")))?;

    match insert_memory_inner(&tx, record) {
        Ok(()) => {
            tx.commit()
                .map_err(|e| to_storage_err(format!("insert_memory commit: {e}")))?;
            Ok(())
        }
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}

/// Inner insert logic, operating on the provided connection (or transaction via Deref).
pub(crate) fn insert_memory_inner(conn: &Connection, record: &MemoryRecord) -> EngramResult<()> {
    let tags_json =
        serde_json::to_string(&record.tags).map_err(|e| to_storage_err(e.to_string()))?;

    conn.execute(
        "INSERT INTO memories (
            id, content, category, project, context, importance, confidence,
            access_count, created_at, last_accessed_at, updated_at, last_decayed_at,
            tags, status, supersedes, superseded_by, content_hash, source_session
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18
        )",
        params![
            record.id,
            record.content,
            record.category.as_str(),
            record.project,
            record.context,
            record.importance.value(),
            record.confidence.value(),
            record.access_count,
            ts(record.created_at),
            record.last_accessed_at.map(ts),
            ts(record.updated_at),
            record.last_decayed_at.map(ts),
            tags_json,
            record.status.as_str(),
            record.supersedes,
            record.superseded_by,
            record.content_hash,
            record.source_session,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Get a single record by ID.
pub fn get_memory(conn: &Connection, id: &str) -> EngramResult<Option<MemoryRecord>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {MEMORY_COLUMNS} FROM memories WHERE id = ?1"))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let result = stmt
        .query_row(params![id], |row| Ok(parse_memory_row(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    match result {
        Some(Ok(record)) => Ok(Some(record)),
        Some(Err(e)) => Err(e),
        None => Ok(None),
    }
}

/// Update an existing record in place. The FTS triggers re-index it.
pub fn update_memory(conn: &Connection, record: &MemoryRecord) -> EngramResult<()> {
    let tags_json =
        serde_json::to_string(&record.tags).map_err(|e| to_storage_err(e.to_string()))?;

    let rows = conn
        .execute(
            "UPDATE memories SET
                content = ?2, category = ?3, project = ?4, context = ?5,
                importance = ?6, confidence = ?7, access_count = ?8,
                created_at = ?9, last_accessed_at = ?10, updated_at = ?11,
                last_decayed_at = ?12, tags = ?13, status = ?14,
                supersedes = ?15, superseded_by = ?16, content_hash = ?17,
                source_session = ?18
             WHERE id = ?1",
            params![
                record.id,
                record.content,
                record.category.as_str(),
                record.project,
                record.context,
                record.importance.value(),
                record.confidence.value(),
                record.access_count,
                ts(record.created_at),
                record.last_accessed_at.map(ts),
                ts(record.updated_at),
                record.last_decayed_at.map(ts),
                tags_json,
                record.status.as_str(),
                record.supersedes,
                record.superseded_by,
                record.content_hash,
                record.source_session,
            ],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    if rows == 0 {
        return Err(EngramError::NotFound {
            id: record.id.clone(),
        });
    }
    Ok(())
}

/// Move a record out of `Active`. The WHERE guard makes racing
/// transitions deterministic: whoever runs second affects zero rows and
/// surfaces `ConflictingTransition`.
pub fn mark_status(
    conn: &Connection,
    id: &str,
    status: MemoryStatus,
    superseded_by: Option<&str>,
    now: DateTime<Utc>,
) -> EngramResult<()> {
    if !MemoryStatus::Active.can_transition_to(status) {
        return Err(EngramError::validation(
            "status",
            format!("no legal transition targets '{status}'"),
        ));
    }

    let rows = conn
        .execute(
            "UPDATE memories
             SET status = ?2, superseded_by = COALESCE(?3, superseded_by), updated_at = ?4
             WHERE id = ?1 AND status = 'active'",
            params![id, status.as_str(), superseded_by, ts(now)],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    if rows == 0 {
        return match get_memory(conn, id)? {
            None => Err(EngramError::NotFound { id: id.to_string() }),
            Some(existing) => Err(EngramError::ConflictingTransition {
                id: id.to_string(),
                current: existing.status,
                requested: status,
            }),
        };
    }
    Ok(())
}

/// Bump access counters for the given records.
pub fn increment_access(conn: &Connection, ids: &[String], now: DateTime<Utc>) -> EngramResult<()> {
    if ids.is_empty() {
        return Ok(());
    }
    let placeholders: Vec<String> = (0..ids.len()).map(|i| format!("?{}", i + 3)).collect();
    let sql = format!(
        "UPDATE memories
         SET access_count = access_count + 1, last_accessed_at = ?1, updated_at = ?2
         WHERE id IN ({})",
        placeholders.join(", ")
    );

    let mut dyn_params: Vec<Box<dyn rusqlite::types::ToSql>> =
        vec![Box::new(ts(now)), Box::new(ts(now))];
    for id in ids {
        dyn_params.push(Box::new(id.clone()));
    }
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        dyn_params.iter().map(|p| p.as_ref()).collect();

    conn.execute(&sql, params_refs.as_slice())
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Atomically apply a correction: insert the replacement, supersede the
/// original, set both scalar back-references, and record the edge.
/// The guard on the original's status means two racing corrections get
/// a deterministic outcome: the loser sees `ConflictingTransition`.
pub fn apply_correction(
    conn: &Connection,
    original_id: &str,
    replacement: &MemoryRecord,
    now: DateTime<Utc>,
) -> EngramResult<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("apply_correction begin: {e}")))?;

    let result = (|| {
        let original = get_memory(&tx, original_id)?.ok_or_else(|| EngramError::NotFound {
            id: original_id.to_string(),
        })?;
        if original.status != MemoryStatus::Active {
            return Err(EngramError::ConflictingTransition {
                id: original_id.to_string(),
                current: original.status,
                requested: MemoryStatus::Superseded,
            });
        }

        insert_memory_inner(&tx, replacement)?;

        let rows = tx
            .execute(
                "UPDATE memories
                 SET status = 'superseded', superseded_by = ?2, updated_at = ?3
                 WHERE id = ?1 AND status = 'active'",
                params![original_id, replacement.id, ts(now)],
            )
            .map_err(|e| to_storage_err(e.to_string()))?;
        if rows == 0 {
            return Err(EngramError::ConflictingTransition {
                id: original_id.to_string(),
                current: MemoryStatus::Superseded,
                requested: MemoryStatus::Superseded,
            });
        }

        tx.execute(
            "INSERT OR IGNORE INTO relations (from_id, to_id, kind) VALUES (?1, ?2, ?3)",
            params![replacement.id, original_id, RelationKind::Supersedes.as_str()],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
        Ok(())
    })();

    match result {
        Ok(()) => {
            tx.commit()
                .map_err(|e| to_storage_err(format!("apply_correction commit: {e}")))?;
            Ok(())
        }
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}

/// Parse one row of `MEMORY_COLUMNS` into a record.
pub(crate) fn parse_memory_row(row: &Row<'_>) -> EngramResult<MemoryRecord> {
    let get_str = |idx: usize| -> EngramResult<String> {
        row.get::<_, String>(idx).map_err(|e| to_storage_err(e.to_string()))
    };
    let get_opt_str = |idx: usize| -> EngramResult<Option<String>> {
        row.get::<_, Option<String>>(idx)
            .map_err(|e| to_storage_err(e.to_string()))
    };

    let category = get_str(2)?.parse()?;
    let importance = row
        .get::<_, f64>(5)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let confidence = row
        .get::<_, f64>(6)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let access_count = row
        .get::<_, i64>(7)
        .map_err(|e| to_storage_err(e.to_string()))?
        .max(0) as u64;

    let created_at = parse_ts(&get_str(8)?)?;
    let last_accessed_at = get_opt_str(9)?.map(|raw| parse_ts(&raw)).transpose()?;
    let updated_at = parse_ts(&get_str(10)?)?;
    let last_decayed_at = get_opt_str(11)?.map(|raw| parse_ts(&raw)).transpose()?;

    let tags: Vec<String> = serde_json::from_str(&get_str(12)?)
        .map_err(|e| to_storage_err(format!("parse tags: {e}")))?;
    let status = get_str(13)?.parse()?;

    Ok(MemoryRecord {
        id: get_str(0)?,
        content: get_str(1)?,
        category,
        project: get_opt_str(3)?,
        context: get_opt_str(4)?,
        importance: Importance::clamped(importance),
        confidence: Confidence::clamped(confidence),
        access_count,
        created_at,
        last_accessed_at,
        updated_at,
        last_decayed_at,
        tags,
        status,
        supersedes: get_opt_str(14)?,
        superseded_by: get_opt_str(15)?,
        content_hash: get_str(16)?,
        source_session: get_opt_str(17)?,
    })
}
