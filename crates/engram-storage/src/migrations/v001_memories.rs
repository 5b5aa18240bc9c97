//! v001: the memories table.

use rusqlite::Connection;

use engram_core::errors::EngramResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> EngramResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS memories (
            id               TEXT PRIMARY KEY,
            content          TEXT NOT NULL,
            category         TEXT NOT NULL,
            project          TEXT,
            context          TEXT,
            importance       REAL NOT NULL,
            confidence       REAL NOT NULL,
            access_count     INTEGER NOT NULL DEFAULT 0,
            created_at       TEXT NOT NULL,
            last_accessed_at TEXT,
            updated_at       TEXT NOT NULL,
            last_decayed_at  TEXT,
            tags             TEXT NOT NULL DEFAULT '[]',
            status           TEXT NOT NULL DEFAULT 'active',
            supersedes       TEXT,
            superseded_by    TEXT,
            content_hash     TEXT NOT NULL,
            source_session   TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_memories_category ON memories(category);
        CREATE INDEX IF NOT EXISTS idx_memories_project ON memories(project);
        CREATE INDEX IF NOT EXISTS idx_memories_status ON memories(status);
        CREATE INDEX IF NOT EXISTS idx_memories_content_hash ON memories(content_hash);
        CREATE INDEX IF NOT EXISTS idx_memories_access ON memories(access_count DESC);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
