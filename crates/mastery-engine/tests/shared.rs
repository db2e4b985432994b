use std::sync::Arc;
use std::thread;

use chrono::{TimeZone, Utc};
use mastery_core::{
    ContextTag, Dimension, EngineConfig, EvidenceDraft, ExerciseResult, LearnerId, StatusKind,
    Tier,
};
use mastery_engine::{ManualClock, MasteryEngine, PromotionResult, SharedEngine};
use mastery_store::{JournalStore, MemoryStore};
use tempfile::TempDir;

const TAGS: [&str; 5] = ["formal", "informal", "technical", "creative", "teaching"];

fn learner() -> LearnerId {
    LearnerId::parse("lin").unwrap()
}

fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
    ))
}

fn level_one_results() -> Vec<ExerciseResult> {
    let mut results = Vec::new();
    for (i, tag) in TAGS.iter().enumerate() {
        let mut r = ExerciseResult::standard(format!("stretch-{i}"), 1, true, 0.9);
        r.tier = Tier::Elite;
        r.context_tag = Some(ContextTag::parse(*tag).unwrap());
        results.push(r);
    }
    for i in 0..3 {
        let mut r = ExerciseResult::standard(format!("curveball-{i}"), 1, true, 4.5);
        r.is_curveball = true;
        results.push(r);
    }
    let mut cap = ExerciseResult::standard("capstone", 1, true, 0.9);
    cap.is_capstone = true;
    results.push(cap);
    results
}

#[test]
fn test_concurrent_submissions_promote_exactly_once() {
    let engine = MasteryEngine::with_clock(MemoryStore::new(), EngineConfig::default(), clock());
    let shared = SharedEngine::new(engine);
    shared.with(|e| e.assign_level(&learner(), 1)).unwrap();

    let handles: Vec<_> = level_one_results()
        .into_iter()
        .map(|result| {
            let shared = shared.clone();
            thread::spawn(move || shared.process(&learner(), &result).unwrap())
        })
        .collect();

    let promotions = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|outcome| outcome.promotion_event().is_some())
        .count();
    assert_eq!(promotions, 1);

    let row = shared
        .with(|e| e.get_status(&learner(), Some(1)))
        .unwrap()
        .pop()
        .unwrap();
    assert_eq!(row.status, StatusKind::Confirmed);
    assert_eq!(row.breadth_count, 5);
    assert_eq!(row.depth_count, 3);

    assert!(matches!(
        shared.evaluate(&learner(), 1).unwrap(),
        PromotionResult::AlreadyConfirmed { .. }
    ));
}

#[test]
fn test_journal_engine_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mastery.mvj");

    {
        let store = JournalStore::open(&path).unwrap();
        let mut engine = MasteryEngine::with_clock(store, EngineConfig::default(), clock());
        engine.assign_level(&learner(), 1).unwrap();
        for result in level_one_results().iter().take(8) {
            engine.process(&learner(), result).unwrap();
        }
    }

    let store = JournalStore::open(&path).unwrap();
    let mut engine = MasteryEngine::with_clock(store, EngineConfig::default(), clock());
    let row = engine.get_status(&learner(), Some(1)).unwrap().pop().unwrap();
    assert_eq!(row.breadth_count, 5);
    assert_eq!(row.depth_count, 3);
    assert!(!row.application_passed);

    let log = engine.get_evidence_log(&learner(), None, 100).unwrap();
    assert_eq!(log.len(), 8);
    assert!(log.iter().all(|r| r.verify_id().unwrap()));

    let capstone = level_one_results().pop().unwrap();
    let outcome = engine.process(&learner(), &capstone).unwrap();
    assert!(outcome.promotion_event().is_some());
}

#[test]
fn test_second_handle_sees_foreign_writes_before_evaluating() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mastery.mvj");

    let mut first = MasteryEngine::with_clock(
        JournalStore::open(&path).unwrap(),
        EngineConfig::default(),
        clock(),
    );
    let mut second = MasteryEngine::with_clock(
        JournalStore::open(&path).unwrap(),
        EngineConfig::default(),
        clock(),
    );

    first.assign_level(&learner(), 1).unwrap();
    for tag in TAGS {
        first
            .record_evidence(
                EvidenceDraft::new(Dimension::Breadth, learner(), 1, 1.0, true)
                    .with_context_tag(ContextTag::parse(tag).unwrap()),
            )
            .unwrap();
    }
    for _ in 0..3 {
        first
            .record_evidence(EvidenceDraft::new(Dimension::Depth, learner(), 1, 4.0, true))
            .unwrap();
    }
    first
        .record_evidence(EvidenceDraft::new(Dimension::Application, learner(), 1, 1.0, true))
        .unwrap();

    // the second handle never read these entries before this call
    let result = second.evaluate(&learner(), 1).unwrap();
    assert!(result.promotion().is_some());

    // the first handle's view is stale, but its write path catches up
    assert!(matches!(
        first.evaluate(&learner(), 1).unwrap(),
        PromotionResult::AlreadyConfirmed { .. }
    ));
    assert_eq!(first.store().path(), path.as_path());
}
