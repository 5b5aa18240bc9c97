//! Relation graph CRUD. Edges are additive facts: inserted at most once
//! per (from, to, kind), never updated, never deleted.

use rusqlite::{params, Connection};

use engram_core::errors::{EngramError, EngramResult};
use engram_core::relation::{RelatedMemory, RelationDirection, RelationEdge, RelationKind};

use crate::to_storage_err;

/// Add a relation edge. Both endpoints must exist; re-adding an existing
/// edge is a no-op.
pub fn add_relation(conn: &Connection, edge: &RelationEdge) -> EngramResult<()> {
    for id in [&edge.from_id, &edge.to_id] {
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM memories WHERE id = ?1)",
                params![id],
                |row| row.get(0),
            )
            .map_err(|e| to_storage_err(e.to_string()))?;
        if !exists {
            return Err(EngramError::NotFound { id: id.clone() });
        }
    }

    conn.execute(
        "INSERT OR IGNORE INTO relations (from_id, to_id, kind) VALUES (?1, ?2, ?3)",
        params![edge.from_id, edge.to_id, edge.kind.as_str()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// All edges touching a record, from either side.
pub fn relations_of(conn: &Connection, id: &str) -> EngramResult<Vec<RelatedMemory>> {
    let mut stmt = conn
        .prepare(
            "SELECT to_id AS peer_id, kind, 'outgoing' AS direction
             FROM relations WHERE from_id = ?1
             UNION ALL
             SELECT from_id AS peer_id, kind, 'incoming' AS direction
             FROM relations WHERE to_id = ?1
             ORDER BY peer_id, kind",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut results = Vec::new();
    for row in rows {
        let (peer_id, kind_str, direction_str) = row.map_err(|e| to_storage_err(e.to_string()))?;
        let kind: RelationKind = kind_str.parse()?;
        let direction = match direction_str.as_str() {
            "outgoing" => RelationDirection::Outgoing,
            _ => RelationDirection::Incoming,
        };
        results.push(RelatedMemory {
            peer_id,
            kind,
            direction,
        });
    }
    Ok(results)
}
