//! The query façade: the only entry points external callers use.

use std::collections::BTreeMap;
use std::path::Path;

use engram_consolidation::ConsolidationEngine;
use engram_core::clock::{Clock, SystemClock};
use engram_core::constants::{
    CORRECTION_CONFIDENCE, CORRECTION_MIN_IMPORTANCE, RECALL_CANDIDATE_FACTOR, TOP_ACCESSED_LIMIT,
};
use engram_core::errors::{EngramError, EngramResult};
use engram_core::models::{
    ConsolidationSummary, ListFilter, ListSort, MemoryStats, ScoredMemory,
};
use engram_core::record::{Category, MemoryDraft, MemoryRecord, MemoryStatus};
use engram_core::relation::{RelatedMemory, RelationEdge, RelationKind};
use engram_scoring::ScoringEngine;
use engram_storage::{SearchFilter, StorageEngine};

use crate::request::{ForgetTarget, RecallRequest};

/// How many records a forget-by-query inspects when checking that the
/// query is unambiguous.
const FORGET_SCAN_LIMIT: usize = 16;

/// The memory store façade. One instance per database file.
pub struct Engram {
    storage: StorageEngine,
    scoring: ScoringEngine,
    consolidation: ConsolidationEngine,
    clock: Box<dyn Clock>,
}

impl Engram {
    /// Open (or create) the store at the given path.
    pub fn open(path: &Path) -> EngramResult<Self> {
        Ok(Self::assemble(StorageEngine::open(path)?, Box::new(SystemClock)))
    }

    /// Open with an injected clock, for deterministic tests.
    pub fn open_with_clock(path: &Path, clock: Box<dyn Clock>) -> EngramResult<Self> {
        Ok(Self::assemble(StorageEngine::open(path)?, clock))
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> EngramResult<Self> {
        Ok(Self::assemble(
            StorageEngine::open_in_memory()?,
            Box::new(SystemClock),
        ))
    }

    /// Open an in-memory store with an injected clock.
    pub fn open_in_memory_with_clock(clock: Box<dyn Clock>) -> EngramResult<Self> {
        Ok(Self::assemble(StorageEngine::open_in_memory()?, clock))
    }

    fn assemble(storage: StorageEngine, clock: Box<dyn Clock>) -> Self {
        Self {
            storage,
            scoring: ScoringEngine::new(),
            consolidation: ConsolidationEngine::new(),
            clock,
        }
    }

    /// Store a new memory. Returns the assigned id.
    pub fn remember(&self, draft: MemoryDraft) -> EngramResult<String> {
        let now = self.clock.now();
        let record = draft.into_record(uuid::Uuid::new_v4().to_string(), now)?;
        self.storage.create(&record)?;
        tracing::debug!(id = %record.id, category = %record.category, "stored memory");
        Ok(record.id)
    }

    /// Fetch a record by id.
    pub fn get(&self, id: &str) -> EngramResult<MemoryRecord> {
        self.storage
            .get(id)?
            .ok_or_else(|| EngramError::NotFound { id: id.to_string() })
    }

    /// Search, rank by composite score, and bump access counters for
    /// the returned records.
    ///
    /// The search index returns a candidate pool larger than the
    /// requested limit; candidates are then scored at the current
    /// instant and the top `limit` returned, descending. Every active
    /// record returned counts as one access; the store cannot observe
    /// whether the caller went on to use it.
    pub fn recall(&self, request: &RecallRequest) -> EngramResult<Vec<ScoredMemory>> {
        let now = self.clock.now();
        let filter = SearchFilter {
            category: request.category,
            project: request.project.clone(),
            include_inactive: request.include_inactive,
        };
        let candidates = self.storage.search(
            &request.query,
            &filter,
            request.limit.saturating_mul(RECALL_CANDIDATE_FACTOR),
        )?;

        let mut ranked = self.scoring.rank(candidates, now);
        ranked.truncate(request.limit);

        let accessed: Vec<String> = ranked
            .iter()
            .filter(|s| s.memory.status == MemoryStatus::Active)
            .map(|s| s.memory.id.clone())
            .collect();
        self.storage.increment_access(&accessed, now)?;

        Ok(ranked)
    }

    /// Replace a memory with corrected content. The original is marked
    /// superseded and both records are linked. Unless overridden, the
    /// replacement keeps the original's importance floored at 0.7, with
    /// confidence 0.9.
    pub fn correct(
        &self,
        original_id: &str,
        new_content: &str,
        importance: Option<f64>,
        confidence: Option<f64>,
    ) -> EngramResult<String> {
        let now = self.clock.now();
        let original = self.get(original_id)?;
        if original.status != MemoryStatus::Active {
            return Err(EngramError::ConflictingTransition {
                id: original_id.to_string(),
                current: original.status,
                requested: MemoryStatus::Superseded,
            });
        }

        let mut draft = MemoryDraft::new(new_content, original.category);
        draft.project = original.project.clone();
        draft.tags = original.tags.clone();
        draft.context = Some(format!("correction of {original_id}"));
        draft.importance = importance
            .unwrap_or_else(|| original.importance.value().max(CORRECTION_MIN_IMPORTANCE));
        draft.confidence = confidence.unwrap_or(CORRECTION_CONFIDENCE);

        let mut replacement = draft.into_record(uuid::Uuid::new_v4().to_string(), now)?;
        replacement.supersedes = Some(original_id.to_string());

        self.storage.apply_correction(original_id, &replacement, now)?;
        tracing::debug!(original = %original_id, replacement = %replacement.id, "corrected memory");
        Ok(replacement.id)
    }

    /// Soft-delete: mark the target superseded. By query, the match
    /// must be unique: zero matches is `NotFound`, several is
    /// `AmbiguousTarget` with the candidate ids and no mutation.
    pub fn forget(&self, target: &ForgetTarget) -> EngramResult<Vec<String>> {
        let now = self.clock.now();
        let id = match target {
            ForgetTarget::Id(id) => id.clone(),
            ForgetTarget::Query(query) => {
                let matches =
                    self.storage
                        .search(query, &SearchFilter::default(), FORGET_SCAN_LIMIT)?;
                match matches.as_slice() {
                    [] => {
                        return Err(EngramError::NotFound {
                            id: query.clone(),
                        })
                    }
                    [only] => only.id.clone(),
                    several => {
                        return Err(EngramError::AmbiguousTarget {
                            matches: several.iter().map(|m| m.id.clone()).collect(),
                        })
                    }
                }
            }
        };

        self.storage.mark_status(&id, MemoryStatus::Superseded, now)?;
        tracing::debug!(id = %id, "forgot memory");
        Ok(vec![id])
    }

    /// List memories with their scores. `Score` order is exact: the
    /// page is re-ranked at the current instant.
    pub fn list_memories(
        &self,
        filter: &ListFilter,
        sort: ListSort,
        limit: usize,
    ) -> EngramResult<Vec<ScoredMemory>> {
        let now = self.clock.now();
        match sort {
            ListSort::Score => {
                let candidates = self.storage.list(
                    filter,
                    sort,
                    Some(limit.saturating_mul(RECALL_CANDIDATE_FACTOR)),
                )?;
                let mut ranked = self.scoring.rank(candidates, now);
                ranked.truncate(limit);
                Ok(ranked)
            }
            ListSort::Recency | ListSort::AccessCount => {
                let records = self.storage.list(filter, sort, Some(limit))?;
                Ok(records
                    .into_iter()
                    .map(|memory| {
                        let score = self.scoring.score(&memory, now);
                        ScoredMemory { memory, score }
                    })
                    .collect())
            }
        }
    }

    /// Aggregate counts: totals per status, per-category, per-project,
    /// and the most-accessed records.
    pub fn memory_stats(&self) -> EngramResult<MemoryStats> {
        self.storage.stats(TOP_ACCESSED_LIMIT)
    }

    /// Record a directed relation between two memories. Advisory: no
    /// status changes, whatever the kind.
    pub fn relate(&self, from_id: &str, to_id: &str, kind: RelationKind) -> EngramResult<()> {
        self.storage.add_relation(&RelationEdge {
            from_id: from_id.to_string(),
            to_id: to_id.to_string(),
            kind,
        })
    }

    /// All relations touching a record, with direction.
    pub fn relations_of(&self, id: &str) -> EngramResult<Vec<RelatedMemory>> {
        self.storage.relations_of(id)
    }

    /// Run one consolidation pass (decay, retirement, dedup) now.
    /// Callers decide scheduling, typically a session-boundary hook.
    pub fn consolidate(&self) -> EngramResult<ConsolidationSummary> {
        self.consolidation.run(&self.storage, self.clock.now())
    }

    /// Snapshot for the surfacing collaborator: the top-scored active
    /// memories of each category, optionally narrowed to one project
    /// (global memories included).
    pub fn top_memories(
        &self,
        project: Option<&str>,
        per_category_limit: usize,
    ) -> EngramResult<BTreeMap<Category, Vec<ScoredMemory>>> {
        let now = self.clock.now();
        let filter = ListFilter {
            project: project.map(str::to_string),
            ..Default::default()
        };
        let actives = self.storage.list(&filter, ListSort::Score, None)?;
        let ranked = self.scoring.rank(actives, now);

        let mut grouped: BTreeMap<Category, Vec<ScoredMemory>> = BTreeMap::new();
        for scored in ranked {
            let bucket = grouped.entry(scored.memory.category).or_default();
            if bucket.len() < per_category_limit {
                bucket.push(scored);
            }
        }
        Ok(grouped)
    }
}
