//! StorageEngine: owns the connection pool, runs migrations at open,
//! and exposes the record store, search index, and relation graph
//! operations. Every mutating call runs on the single write connection,
//! so each operation is atomic and serialized.

use std::path::Path;

use chrono::{DateTime, Utc};

use engram_core::errors::{EngramError, EngramResult};
use engram_core::models::{ListFilter, ListSort, MemoryStats};
use engram_core::record::{MemoryRecord, MemoryStatus};
use engram_core::relation::{RelatedMemory, RelationEdge};

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries::{
    maintenance, memory_crud, memory_query, memory_search, relation_ops, stats,
};
use crate::search::parse_query;

pub use crate::queries::memory_search::SearchFilter;

/// The main storage engine. Owns the connection pool and provides the
/// record store, search, relation, and maintenance interface.
pub struct StorageEngine {
    pool: ConnectionPool,
    /// When true, use the read pool for read operations (file-backed
    /// mode). When false, route all reads through the writer (in-memory
    /// mode, because in-memory read pool connections are isolated
    /// databases).
    use_read_pool: bool,
}

impl StorageEngine {
    /// Open a storage engine backed by a file on disk.
    pub fn open(path: &Path) -> EngramResult<Self> {
        let pool = ConnectionPool::open(path, crate::pool::ReadPool::default_size())?;
        let engine = Self {
            pool,
            use_read_pool: true,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Open an in-memory storage engine (for testing).
    pub fn open_in_memory() -> EngramResult<Self> {
        let pool = ConnectionPool::open_in_memory(1)?;
        let engine = Self {
            pool,
            use_read_pool: false,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Run migrations on the writer.
    fn initialize(&self) -> EngramResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| migrations::run_migrations(conn))
    }

    /// Execute a read-only query on the best available connection.
    fn with_reader<F, T>(&self, f: F) -> EngramResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> EngramResult<T>,
    {
        if self.use_read_pool {
            self.pool.readers.with_conn(f)
        } else {
            self.pool.writer.with_conn_sync(f)
        }
    }

    // ── Record store ────────────────────────────────────────────────

    /// Insert a new record. The id must be fresh; ids are never reused.
    pub fn create(&self, record: &MemoryRecord) -> EngramResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| memory_crud::insert_memory(conn, record))
    }

    /// Fetch a record by id.
    pub fn get(&self, id: &str) -> EngramResult<Option<MemoryRecord>> {
        self.with_reader(|conn| memory_crud::get_memory(conn, id))
    }

    /// Overwrite a record in place. `NotFound` if the id is unknown.
    pub fn update(&self, record: &MemoryRecord) -> EngramResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| memory_crud::update_memory(conn, record))
    }

    /// Transition a record out of `Active`. Requests that would leave a
    /// terminal state fail with `ConflictingTransition`; requests for a
    /// non-terminal target are validation errors.
    pub fn mark_status(
        &self,
        id: &str,
        status: MemoryStatus,
        now: DateTime<Utc>,
    ) -> EngramResult<()> {
        self.pool.writer.with_conn_sync(|conn| {
            let superseded_by = match status {
                // A forget-by-id tombstone points at itself.
                MemoryStatus::Superseded => Some(id),
                _ => None,
            };
            memory_crud::mark_status(conn, id, status, superseded_by, now)
        })
    }

    /// Supersede `id` in favor of `by_id` (dedup, explicit replacement).
    pub fn supersede(&self, id: &str, by_id: &str, now: DateTime<Utc>) -> EngramResult<()> {
        self.pool.writer.with_conn_sync(|conn| {
            memory_crud::mark_status(conn, id, MemoryStatus::Superseded, Some(by_id), now)
        })
    }

    /// Bump access counters for the given records.
    pub fn increment_access(&self, ids: &[String], now: DateTime<Utc>) -> EngramResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| memory_crud::increment_access(conn, ids, now))
    }

    /// Atomic correction: insert replacement, supersede original, link both.
    pub fn apply_correction(
        &self,
        original_id: &str,
        replacement: &MemoryRecord,
        now: DateTime<Utc>,
    ) -> EngramResult<()> {
        self.pool.writer.with_conn_sync(|conn| {
            memory_crud::apply_correction(conn, original_id, replacement, now)
        })
    }

    /// List records matching a filter. `limit: None` means unbounded.
    pub fn list(
        &self,
        filter: &ListFilter,
        sort: ListSort,
        limit: Option<usize>,
    ) -> EngramResult<Vec<MemoryRecord>> {
        self.with_reader(|conn| memory_query::list_memories(conn, filter, sort, limit))
    }

    /// Aggregate counts plus the top-N most-accessed records.
    pub fn stats(&self, top_n: usize) -> EngramResult<MemoryStats> {
        self.with_reader(|conn| stats::collect_stats(conn, top_n))
    }

    // ── Search index ────────────────────────────────────────────────

    /// Parse `query` and search the FTS index. Malformed queries are
    /// validation errors; nothing is read before the query parses.
    pub fn search(
        &self,
        query: &str,
        filter: &SearchFilter,
        limit: usize,
    ) -> EngramResult<Vec<MemoryRecord>> {
        let match_expr = parse_query(query)?.to_match_expr();
        self.with_reader(|conn| memory_search::search_fts(conn, &match_expr, filter, limit))
    }

    // ── Relation graph ──────────────────────────────────────────────

    /// Add a relation edge. Self-loops are rejected before touching the
    /// store; unknown endpoints surface as `NotFound`.
    pub fn add_relation(&self, edge: &RelationEdge) -> EngramResult<()> {
        if edge.from_id == edge.to_id {
            return Err(EngramError::validation(
                "relation",
                "a memory cannot relate to itself",
            ));
        }
        self.pool
            .writer
            .with_conn_sync(|conn| relation_ops::add_relation(conn, edge))
    }

    /// All edges touching `id`, with direction.
    pub fn relations_of(&self, id: &str) -> EngramResult<Vec<RelatedMemory>> {
        self.with_reader(|conn| relation_ops::relations_of(conn, id))
    }

    // ── Consolidation support ───────────────────────────────────────

    /// Active records idle since before `cutoff` (decay candidates).
    pub fn decay_candidates(&self, cutoff: DateTime<Utc>) -> EngramResult<Vec<MemoryRecord>> {
        self.with_reader(|conn| maintenance::decay_candidates(conn, cutoff))
    }

    /// Apply importance decay; eligibility re-asserted per row.
    pub fn apply_decay(
        &self,
        ids: &[String],
        multiplier: f64,
        cutoff: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> EngramResult<u64> {
        self.pool
            .writer
            .with_conn_sync(|conn| maintenance::apply_decay(conn, ids, multiplier, cutoff, now))
    }

    /// Active records created at or before `cutoff` (retirement prefilter).
    pub fn active_older_than(&self, cutoff: DateTime<Utc>) -> EngramResult<Vec<MemoryRecord>> {
        self.with_reader(|conn| maintenance::active_older_than(conn, cutoff))
    }

    /// Retire records; all three conditions re-asserted per row.
    pub fn retire(
        &self,
        ids: &[String],
        importance_below: f64,
        created_cutoff: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> EngramResult<u64> {
        self.pool.writer.with_conn_sync(|conn| {
            maintenance::retire(conn, ids, importance_below, created_cutoff, now)
        })
    }

    /// Groups of active records with identical (category, content_hash).
    pub fn duplicate_groups(&self) -> EngramResult<Vec<Vec<MemoryRecord>>> {
        self.with_reader(|conn| maintenance::duplicate_groups(conn))
    }

    /// Supersede duplicates in favor of the keeper, in one transaction.
    pub fn apply_dedup(
        &self,
        keeper_id: &str,
        loser_ids: &[String],
        now: DateTime<Utc>,
    ) -> EngramResult<u64> {
        self.pool
            .writer
            .with_conn_sync(|conn| maintenance::apply_dedup(conn, keeper_id, loser_ids, now))
    }
}
