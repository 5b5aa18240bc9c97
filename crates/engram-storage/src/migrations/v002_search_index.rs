//! v002: FTS5 search index over content, tags, and category.
//!
//! External-content table kept in sync by triggers, so the index can
//! never diverge from the memories table. Non-active records stay
//! indexed; default search filters them out at query time.

use rusqlite::Connection;

use engram_core::errors::EngramResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> EngramResult<()> {
    conn.execute_batch(
        "
        CREATE VIRTUAL TABLE IF NOT EXISTS memories_fts USING fts5(
            content, tags, category,
            content='memories'
        );

        CREATE TRIGGER IF NOT EXISTS memories_ai AFTER INSERT ON memories BEGIN
            INSERT INTO memories_fts(rowid, content, tags, category)
            VALUES (new.rowid, new.content, new.tags, new.category);
        END;

        CREATE TRIGGER IF NOT EXISTS memories_ad AFTER DELETE ON memories BEGIN
            INSERT INTO memories_fts(memories_fts, rowid, content, tags, category)
            VALUES ('delete', old.rowid, old.content, old.tags, old.category);
        END;

        CREATE TRIGGER IF NOT EXISTS memories_au AFTER UPDATE ON memories BEGIN
            INSERT INTO memories_fts(memories_fts, rowid, content, tags, category)
            VALUES ('delete', old.rowid, old.content, old.tags, old.category);
            INSERT INTO memories_fts(rowid, content, tags, category)
            VALUES (new.rowid, new.content, new.tags, new.category);
        END;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
