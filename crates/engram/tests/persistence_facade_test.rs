use engram::{Category, Engram, ForgetTarget, MemoryDraft, MemoryStatus, RecallRequest};

#[test]
fn memories_survive_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("engram.db");

    // Session one: learn something, forget something else.
    let (kept, forgotten) = {
        let engram = Engram::open(&db_path).unwrap();
        let kept = engram
            .remember(MemoryDraft::new(
                "release builds need the vendored feature",
                Category::ProjectKnowledge,
            ))
            .unwrap();
        let forgotten = engram
            .remember(MemoryDraft::new("scratch note", Category::Facts))
            .unwrap();
        engram.forget(&ForgetTarget::Id(forgotten.clone())).unwrap();
        (kept, forgotten)
    };

    // Session two: everything is still there, statuses intact.
    let engram = Engram::open(&db_path).unwrap();
    assert_eq!(engram.get(&kept).unwrap().status, MemoryStatus::Active);
    assert_eq!(
        engram.get(&forgotten).unwrap().status,
        MemoryStatus::Superseded
    );

    let hits = engram.recall(&RecallRequest::new("vendored")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].memory.id, kept);

    // The recall above counted as an access and was persisted.
    assert_eq!(engram.get(&kept).unwrap().access_count, 1);
}
