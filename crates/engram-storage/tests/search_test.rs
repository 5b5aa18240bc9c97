use chrono::Utc;
use engram_core::errors::EngramError;
use engram_core::record::{Category, MemoryDraft, MemoryRecord, MemoryStatus};
use engram_storage::{SearchFilter, StorageEngine};

fn insert(engine: &StorageEngine, content: &str, category: Category) -> MemoryRecord {
    let draft = MemoryDraft::new(content, category);
    let record = draft
        .into_record(uuid::Uuid::new_v4().to_string(), Utc::now())
        .unwrap();
    engine.create(&record).unwrap();
    record
}

fn insert_with(engine: &StorageEngine, draft: MemoryDraft) -> MemoryRecord {
    let record = draft
        .into_record(uuid::Uuid::new_v4().to_string(), Utc::now())
        .unwrap();
    engine.create(&record).unwrap();
    record
}

#[test]
fn implicit_and_requires_every_term() {
    let engine = StorageEngine::open_in_memory().unwrap();
    insert(&engine, "deploy the service to production", Category::Procedures);
    insert(&engine, "deploy the docs site", Category::Procedures);

    let hits = engine
        .search("deploy production", &SearchFilter::default(), 10)
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert!(hits[0].content.contains("production"));
}

#[test]
fn explicit_or_matches_either_term() {
    let engine = StorageEngine::open_in_memory().unwrap();
    insert(&engine, "rollback procedure for postgres", Category::Procedures);
    insert(&engine, "rollforward steps for redis", Category::Procedures);
    insert(&engine, "unrelated note", Category::Facts);

    let hits = engine
        .search("postgres OR redis", &SearchFilter::default(), 10)
        .unwrap();
    assert_eq!(hits.len(), 2);
}

#[test]
fn negation_excludes_matching_records() {
    let engine = StorageEngine::open_in_memory().unwrap();
    insert(&engine, "deploy to production cluster", Category::Procedures);
    insert(&engine, "deploy to staging first, then production", Category::Procedures);

    let hits = engine
        .search("deploy AND NOT staging", &SearchFilter::default(), 10)
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert!(!hits[0].content.contains("staging"));
}

#[test]
fn quoted_phrase_requires_adjacency() {
    let engine = StorageEngine::open_in_memory().unwrap();
    insert(&engine, "always run cargo test before pushing", Category::Procedures);
    insert(&engine, "test the cargo manifest separately", Category::Procedures);

    let hits = engine
        .search("\"cargo test\"", &SearchFilter::default(), 10)
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert!(hits[0].content.contains("cargo test"));
}

#[test]
fn tags_are_searchable() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let mut draft = MemoryDraft::new("use the blue pipeline", Category::Procedures);
    draft.tags = vec!["kubernetes".to_string()];
    insert_with(&engine, draft);

    let hits = engine
        .search("kubernetes", &SearchFilter::default(), 10)
        .unwrap();
    assert_eq!(hits.len(), 1);
}

#[test]
fn non_active_records_are_hidden_by_default_but_reachable_for_audit() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let record = insert(&engine, "obsolete deploy knowledge", Category::Facts);
    engine
        .mark_status(&record.id, MemoryStatus::Superseded, Utc::now())
        .unwrap();

    let default_hits = engine
        .search("obsolete", &SearchFilter::default(), 10)
        .unwrap();
    assert!(default_hits.is_empty());

    let audit = SearchFilter {
        include_inactive: true,
        ..Default::default()
    };
    let audit_hits = engine.search("obsolete", &audit, 10).unwrap();
    assert_eq!(audit_hits.len(), 1);
    assert_eq!(audit_hits[0].status, MemoryStatus::Superseded);
}

#[test]
fn status_changes_reindex_synchronously() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let record = insert(&engine, "ephemeral convention", Category::Facts);

    assert_eq!(
        engine
            .search("ephemeral", &SearchFilter::default(), 10)
            .unwrap()
            .len(),
        1
    );
    engine
        .mark_status(&record.id, MemoryStatus::Superseded, Utc::now())
        .unwrap();
    // No eventual-consistency window: the very next search excludes it.
    assert!(engine
        .search("ephemeral", &SearchFilter::default(), 10)
        .unwrap()
        .is_empty());
}

#[test]
fn category_and_project_filters_compose_with_match() {
    let engine = StorageEngine::open_in_memory().unwrap();
    insert(&engine, "deploy notes for everything", Category::Facts);
    let mut draft = MemoryDraft::new("deploy runbook for alpha", Category::Procedures);
    draft.project = Some("alpha".to_string());
    insert_with(&engine, draft);
    let mut draft = MemoryDraft::new("deploy runbook for beta", Category::Procedures);
    draft.project = Some("beta".to_string());
    insert_with(&engine, draft);

    let filter = SearchFilter {
        category: Some(Category::Procedures),
        project: Some("alpha".to_string()),
        include_inactive: false,
    };
    let hits = engine.search("deploy", &filter, 10).unwrap();
    assert_eq!(hits.len(), 1);
    assert!(hits[0].content.contains("alpha"));
}

#[test]
fn malformed_queries_are_rejected_before_any_read() {
    let engine = StorageEngine::open_in_memory().unwrap();
    for bad in ["", "NOT staging", "deploy OR", "\"unbalanced"] {
        assert!(matches!(
            engine.search(bad, &SearchFilter::default(), 10),
            Err(EngramError::Validation { field: "query", .. })
        ));
    }
}

#[test]
fn fts_operator_injection_is_neutralized() {
    let engine = StorageEngine::open_in_memory().unwrap();
    insert(&engine, "plain note about columns", Category::Facts);

    // A term that would be an FTS5 column filter or syntax error if
    // passed through raw must behave as an ordinary (non-matching) term.
    let hits = engine
        .search("content:columns", &SearchFilter::default(), 10)
        .unwrap();
    assert!(hits.is_empty());
}
