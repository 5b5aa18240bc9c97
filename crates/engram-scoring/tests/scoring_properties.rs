use chrono::{Duration, Utc};
use engram_core::config::ScoringConfig;
use engram_core::record::{Category, Confidence, Importance, MemoryRecord, MemoryStatus};
use engram_scoring::compute;
use proptest::prelude::*;

fn make_record(importance: f64, confidence: f64, access_count: u64, age_hours: i64) -> MemoryRecord {
    let created = Utc::now() - Duration::hours(age_hours);
    MemoryRecord {
        id: "m1".to_string(),
        content: "prop".to_string(),
        category: Category::Facts,
        project: None,
        context: None,
        importance: Importance::new(importance).unwrap(),
        confidence: Confidence::new(confidence).unwrap(),
        access_count,
        created_at: created,
        last_accessed_at: None,
        updated_at: created,
        last_decayed_at: None,
        tags: vec![],
        status: MemoryStatus::Active,
        supersedes: None,
        superseded_by: None,
        content_hash: MemoryRecord::compute_content_hash("prop"),
        source_session: None,
    }
}

proptest! {
    #[test]
    fn score_is_non_negative_and_bounded_by_undecayed_value(
        importance in 0.0f64..=1.0,
        confidence in 0.0f64..=1.0,
        access_count in 0u64..=1000,
        age_hours in 0i64..=100_000,
    ) {
        let record = make_record(importance, confidence, access_count, age_hours);
        let score = compute(&record, &ScoringConfig::default(), Utc::now());
        let ceiling = importance * confidence * (1.0 + access_count as f64 * 0.1);
        prop_assert!(score >= 0.0);
        prop_assert!(score <= ceiling + 1e-9);
    }

    #[test]
    fn older_never_outscores_newer_all_else_equal(
        importance in 0.01f64..=1.0,
        confidence in 0.01f64..=1.0,
        access_count in 0u64..=100,
        younger in 0i64..=5_000,
        extra in 1i64..=5_000,
    ) {
        let config = ScoringConfig::default();
        let now = Utc::now();
        let young = make_record(importance, confidence, access_count, younger);
        let old = make_record(importance, confidence, access_count, younger + extra);
        prop_assert!(compute(&old, &config, now) <= compute(&young, &config, now) + 1e-12);
    }
}
