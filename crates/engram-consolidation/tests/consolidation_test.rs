use chrono::{DateTime, Duration, Utc};
use engram_consolidation::{passes, ConsolidationEngine};
use engram_core::config::ConsolidationConfig;
use engram_core::record::{Category, MemoryDraft, MemoryRecord, MemoryStatus};
use engram_core::relation::{RelationDirection, RelationKind};
use engram_scoring::ScoringEngine;
use engram_storage::StorageEngine;

fn insert_at(
    engine: &StorageEngine,
    content: &str,
    category: Category,
    importance: f64,
    created_at: DateTime<Utc>,
) -> MemoryRecord {
    let mut draft = MemoryDraft::new(content, category);
    draft.importance = importance;
    let record = draft
        .into_record(uuid::Uuid::new_v4().to_string(), created_at)
        .unwrap();
    engine.create(&record).unwrap();
    record
}

// ── Decay ───────────────────────────────────────────────────────────

#[test]
fn decay_applies_only_past_the_idle_window() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let now = Utc::now();
    let config = ConsolidationConfig::default();

    let stale = insert_at(&storage, "stale fact", Category::Facts, 0.5, now - Duration::days(31));
    let fresh = insert_at(&storage, "fresh fact", Category::Facts, 0.5, now - Duration::days(5));

    let decayed = passes::decay::run(&storage, &config, now).unwrap();
    assert_eq!(decayed, 1);

    let stale = storage.get(&stale.id).unwrap().unwrap();
    assert!((stale.importance.value() - 0.45).abs() < 1e-9);
    assert!(stale.last_decayed_at.is_some());

    let fresh = storage.get(&fresh.id).unwrap().unwrap();
    assert!((fresh.importance.value() - 0.5).abs() < 1e-9);
    assert!(fresh.last_decayed_at.is_none());
}

#[test]
fn recent_access_defers_decay() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let now = Utc::now();
    let config = ConsolidationConfig::default();

    let record = insert_at(&storage, "old but used", Category::Facts, 0.5, now - Duration::days(60));
    storage
        .increment_access(&[record.id.clone()], now - Duration::days(3))
        .unwrap();

    let decayed = passes::decay::run(&storage, &config, now).unwrap();
    assert_eq!(decayed, 0);
    let fetched = storage.get(&record.id).unwrap().unwrap();
    assert!((fetched.importance.value() - 0.5).abs() < 1e-9);
}

#[test]
fn decay_is_geometric_per_idle_window_not_per_invocation() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let t0 = Utc::now() - Duration::days(120);
    let config = ConsolidationConfig::default();

    let record = insert_at(&storage, "slowly fading", Category::Facts, 0.8, t0);

    // First qualifying pass.
    let pass1 = t0 + Duration::days(31);
    assert_eq!(passes::decay::run(&storage, &config, pass1).unwrap(), 1);
    let after1 = storage.get(&record.id).unwrap().unwrap().importance.value();
    assert!((after1 - 0.72).abs() < 1e-9);

    // Immediate re-run: same interval, nothing further.
    assert_eq!(passes::decay::run(&storage, &config, pass1).unwrap(), 0);
    let again = storage.get(&record.id).unwrap().unwrap().importance.value();
    assert!((again - 0.72).abs() < 1e-9);

    // A day later: still inside the window started by pass1.
    assert_eq!(
        passes::decay::run(&storage, &config, pass1 + Duration::days(1)).unwrap(),
        0
    );

    // Another full idle window: decays again, geometrically.
    let pass2 = pass1 + Duration::days(31);
    assert_eq!(passes::decay::run(&storage, &config, pass2).unwrap(), 1);
    let after2 = storage.get(&record.id).unwrap().unwrap().importance.value();
    assert!((after2 - 0.648).abs() < 1e-9);
}

// ── Retirement ──────────────────────────────────────────────────────

#[test]
fn retirement_requires_all_three_conditions() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let now = Utc::now();
    let config = ConsolidationConfig::default();

    let doomed = insert_at(&storage, "worthless", Category::Facts, 0.05, now - Duration::days(100));
    let important = insert_at(&storage, "low but salvageable", Category::Facts, 0.5, now - Duration::days(100));
    let young = insert_at(&storage, "new and weak", Category::Facts, 0.05, now - Duration::days(10));
    let used = insert_at(&storage, "weak but used", Category::Facts, 0.05, now - Duration::days(100));
    storage
        .increment_access(&[used.id.clone()], now - Duration::days(50))
        .unwrap();

    let retired = passes::retire::run(&storage, &config, now).unwrap();
    assert_eq!(retired, 1);

    assert_eq!(
        storage.get(&doomed.id).unwrap().unwrap().status,
        MemoryStatus::Retired
    );
    for survivor in [&important.id, &young.id, &used.id] {
        assert_eq!(
            storage.get(survivor).unwrap().unwrap().status,
            MemoryStatus::Active,
        );
    }
}

#[test]
fn retirement_is_idempotent() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let now = Utc::now();
    let config = ConsolidationConfig::default();

    insert_at(&storage, "worthless", Category::Facts, 0.05, now - Duration::days(100));
    assert_eq!(passes::retire::run(&storage, &config, now).unwrap(), 1);
    assert_eq!(passes::retire::run(&storage, &config, now).unwrap(), 0);
}

// ── Deduplication ───────────────────────────────────────────────────

#[test]
fn dedup_keeps_the_higher_scoring_duplicate() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let scoring = ScoringEngine::new();
    let now = Utc::now();

    // Same normalized content, same category, different importance.
    let keeper = insert_at(&storage, "User prefers  Rebase", Category::Preferences, 0.9, now - Duration::hours(2));
    let loser = insert_at(&storage, "user prefers rebase", Category::Preferences, 0.4, now - Duration::hours(1));

    let superseded = passes::dedup::run(&storage, &scoring, now).unwrap();
    assert_eq!(superseded, 1);

    let kept = storage.get(&keeper.id).unwrap().unwrap();
    assert_eq!(kept.status, MemoryStatus::Active);

    let folded = storage.get(&loser.id).unwrap().unwrap();
    assert_eq!(folded.status, MemoryStatus::Superseded);
    assert_eq!(folded.superseded_by.as_deref(), Some(keeper.id.as_str()));

    // Keeper→loser supersedes edge recorded.
    let relations = storage.relations_of(&keeper.id).unwrap();
    assert!(relations.iter().any(|r| r.peer_id == loser.id
        && r.kind == RelationKind::Supersedes
        && r.direction == RelationDirection::Outgoing));
}

#[test]
fn dedup_tie_goes_to_the_more_recent_record() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let scoring = ScoringEngine::new();
    let now = Utc::now();

    let older = insert_at(&storage, "same idea", Category::Facts, 0.5, now - Duration::hours(10));
    let newer = insert_at(&storage, "same idea", Category::Facts, 0.5, now - Duration::hours(1));

    passes::dedup::run(&storage, &scoring, now).unwrap();

    assert_eq!(
        storage.get(&newer.id).unwrap().unwrap().status,
        MemoryStatus::Active
    );
    assert_eq!(
        storage.get(&older.id).unwrap().unwrap().status,
        MemoryStatus::Superseded
    );
}

#[test]
fn dedup_scope_is_per_category() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let scoring = ScoringEngine::new();
    let now = Utc::now();

    insert_at(&storage, "shared wording", Category::Facts, 0.5, now);
    insert_at(&storage, "shared wording", Category::Decisions, 0.5, now);

    assert_eq!(passes::dedup::run(&storage, &scoring, now).unwrap(), 0);
}

#[test]
fn dedup_is_idempotent() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let scoring = ScoringEngine::new();
    let now = Utc::now();

    insert_at(&storage, "duplicate", Category::Facts, 0.5, now - Duration::hours(2));
    insert_at(&storage, "duplicate", Category::Facts, 0.5, now - Duration::hours(1));
    insert_at(&storage, "duplicate", Category::Facts, 0.5, now);

    assert_eq!(passes::dedup::run(&storage, &scoring, now).unwrap(), 2);
    assert_eq!(passes::dedup::run(&storage, &scoring, now).unwrap(), 0);
}

// ── Full pass ───────────────────────────────────────────────────────

#[test]
fn full_pass_reports_each_step_and_reruns_as_noop() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let engine = ConsolidationEngine::new();
    let now = Utc::now();

    // One stale record to decay, one hopeless record to retire, one
    // duplicate pair to fold.
    insert_at(&storage, "stale fact", Category::Facts, 0.8, now - Duration::days(40));
    insert_at(&storage, "hopeless", Category::Facts, 0.05, now - Duration::days(120));
    insert_at(&storage, "twin note", Category::Facts, 0.5, now - Duration::hours(2));
    insert_at(&storage, "twin note", Category::Facts, 0.5, now - Duration::hours(1));

    let summary = engine.run(&storage, now).unwrap();
    // The hopeless record decays too (it is stale and active), then retires.
    assert_eq!(summary.decayed, 2);
    assert_eq!(summary.retired, 1);
    assert_eq!(summary.deduplicated, 1);
    assert!(!engine.is_running());

    let rerun = engine.run(&storage, now).unwrap();
    assert!(rerun.is_noop(), "second pass changed state: {rerun:?}");
}

#[test]
fn consolidation_never_reactivates_terminal_records() {
    let storage = StorageEngine::open_in_memory().unwrap();
    let engine = ConsolidationEngine::new();
    let now = Utc::now();

    let record = insert_at(&storage, "was forgotten", Category::Facts, 0.9, now - Duration::days(200));
    storage
        .mark_status(&record.id, MemoryStatus::Superseded, now)
        .unwrap();

    engine.run(&storage, now).unwrap();
    assert_eq!(
        storage.get(&record.id).unwrap().unwrap().status,
        MemoryStatus::Superseded
    );
}
