use chrono::{DateTime, Duration, Utc};
use engram_core::config::ScoringConfig;
use engram_core::record::{Category, Confidence, Importance, MemoryRecord, MemoryStatus};
use engram_scoring::{compute, compute_breakdown, ScoringEngine};

fn make_record(
    id: &str,
    importance: f64,
    confidence: f64,
    access_count: u64,
    created_at: DateTime<Utc>,
) -> MemoryRecord {
    MemoryRecord {
        id: id.to_string(),
        content: "test knowledge".to_string(),
        category: Category::Facts,
        project: None,
        context: None,
        importance: Importance::new(importance).unwrap(),
        confidence: Confidence::new(confidence).unwrap(),
        access_count,
        created_at,
        last_accessed_at: None,
        updated_at: created_at,
        last_decayed_at: None,
        tags: vec![],
        status: MemoryStatus::Active,
        supersedes: None,
        superseded_by: None,
        content_hash: MemoryRecord::compute_content_hash("test knowledge"),
        source_session: None,
    }
}

#[test]
fn fresh_record_scores_importance_times_confidence() {
    let now = Utc::now();
    let record = make_record("m1", 0.8, 0.9, 0, now);
    let score = compute(&record, &ScoringConfig::default(), now);
    assert!((score - 0.72).abs() < 1e-9, "expected 0.72, got {score}");
}

#[test]
fn hundred_hours_of_decay_matches_reference_value() {
    let now = Utc::now();
    let record = make_record("m1", 0.8, 0.9, 0, now - Duration::hours(100));
    let score = compute(&record, &ScoringConfig::default(), now);
    // 0.8 * 0.9 * 0.998^100 ≈ 0.5894
    assert!((score - 0.5894).abs() < 5e-4, "expected ≈0.5894, got {score}");
}

#[test]
fn score_is_non_increasing_over_time() {
    let created = Utc::now();
    let record = make_record("m1", 0.7, 0.8, 3, created);
    let config = ScoringConfig::default();

    let mut prev = f64::INFINITY;
    for hours in [0, 1, 10, 100, 1000, 10000] {
        let score = compute(&record, &config, created + Duration::hours(hours));
        assert!(
            score <= prev + f64::EPSILON,
            "score rose from {prev} to {score} at hour {hours}"
        );
        prev = score;
    }
}

#[test]
fn decay_never_reaches_zero() {
    let created = Utc::now();
    let record = make_record("m1", 1.0, 1.0, 0, created);
    let score = compute(
        &record,
        &ScoringConfig::default(),
        created + Duration::days(365 * 10),
    );
    assert!(score > 0.0);
}

#[test]
fn an_access_strictly_increases_the_score() {
    let now = Utc::now();
    let created = now - Duration::hours(50);
    let before = make_record("m1", 0.5, 0.8, 2, created);
    let mut after = before.clone();
    after.access_count += 1;

    let config = ScoringConfig::default();
    assert!(compute(&after, &config, now) > compute(&before, &config, now));
}

#[test]
fn breakdown_factors_multiply_to_the_score() {
    let now = Utc::now();
    let record = make_record("m1", 0.6, 0.7, 4, now - Duration::hours(12));
    let b = compute_breakdown(&record, &ScoringConfig::default(), now);
    let product = b.importance * b.confidence * b.frequency_boost * b.time_decay;
    assert!((b.score - product).abs() < 1e-12);
    assert!((b.frequency_boost - 1.4).abs() < 1e-12);
}

#[test]
fn rank_sorts_descending_with_recency_tiebreak() {
    let now = Utc::now();
    let engine = ScoringEngine::new();

    let high = make_record("high", 0.9, 0.9, 0, now);
    let low = make_record("low", 0.2, 0.5, 0, now);
    // Identical inputs except creation time: newer wins the tie.
    let tie_old = make_record("tie-old", 0.5, 0.5, 0, now - Duration::hours(0));
    let tie_new = make_record("tie-new", 0.5, 0.5, 0, now - Duration::hours(0));

    let ranked = engine.rank(vec![low.clone(), tie_old, high.clone(), tie_new], now);
    assert_eq!(ranked[0].memory.id, "high");
    assert_eq!(ranked[3].memory.id, "low");
    // Exact tie on score and created_at falls back to id order.
    assert_eq!(ranked[1].memory.id, "tie-new");
    assert_eq!(ranked[2].memory.id, "tie-old");
}

#[test]
fn future_created_at_does_not_inflate_the_score() {
    // Clock skew: a record "created in the future" decays as if fresh.
    let now = Utc::now();
    let record = make_record("m1", 0.8, 0.9, 0, now + Duration::hours(5));
    let score = compute(&record, &ScoringConfig::default(), now);
    assert!((score - 0.72).abs() < 1e-9);
}
