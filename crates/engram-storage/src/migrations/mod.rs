//! Versioned schema migrations, tracked via `PRAGMA user_version`.
//!
//! Migrations only ever ADD tables, indexes, or columns. Queries name
//! their columns explicitly, so a database written by a newer version
//! with extra columns still reads cleanly here.

mod v001_memories;
mod v002_search_index;
mod v003_relations;

use rusqlite::Connection;

use engram_core::errors::EngramResult;

use crate::to_storage_err;

type Migration = fn(&Connection) -> EngramResult<()>;

const MIGRATIONS: &[(i64, Migration)] = &[
    (1, v001_memories::migrate),
    (2, v002_search_index::migrate),
    (3, v003_relations::migrate),
];

/// Apply all migrations newer than the database's current version.
pub fn run_migrations(conn: &Connection) -> EngramResult<()> {
    let current: i64 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;

    for (version, migrate) in MIGRATIONS {
        if *version > current {
            migrate(conn).map_err(|e| {
                to_storage_err(format!("migration v{version} failed: {e}"))
            })?;
            conn.pragma_update(None, "user_version", version)
                .map_err(|e| to_storage_err(e.to_string()))?;
            tracing::info!(version, "applied schema migration");
        }
    }
    Ok(())
}

/// The schema version this build writes.
pub fn latest_version() -> i64 {
    MIGRATIONS.last().map(|(v, _)| *v).unwrap_or(0)
}
