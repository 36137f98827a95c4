//! Integration tests for graph completion

use std::collections::BTreeSet;

use questlogic_engine::{
    CompletionController, CompletionLimits, CompletionMode, InMemorySource, RawQuestRecord,
};
use questlogic_foundation::{ErrorKind, SemanticLimit};

use crate::{r, seed, storyline};

fn chain(count: u32) -> InMemorySource {
    (1..=count)
        .map(|i| {
            let condition = if i == 1 { String::new() } else { format!("Qf={}", i - 1) };
            RawQuestRecord::new(i, format!("Quest {i}"), condition)
        })
        .collect()
}

// =============================================================================
// Closure
// =============================================================================

#[test]
fn full_completion_reaches_whole_storyline() {
    let mut source = storyline();
    let mut map = seed(&mut source, &[3]);
    let report = CompletionController::new(&mut source)
        .complete(&mut map)
        .unwrap();

    let expected: BTreeSet<_> = [1, 2, 3, 4, 5, 6, 7, 10, 11].into_iter().map(r).collect();
    assert_eq!(map.ids(), expected);
    assert_eq!(report.added, 8);
    assert_eq!(report.passes, 5);
    assert!(map.validate_closed().is_ok());
}

#[test]
fn negated_reference_is_not_followed_forward() {
    // 6 mentions 7 only as "not completed", so 6 is found through 5 alone.
    let mut source = storyline();
    let mut map = seed(&mut source, &[7]);
    CompletionController::new(&mut source)
        .complete(&mut map)
        .unwrap();
    assert!(map.contains(r(6)));
    assert!(map.dependents(r(7)).is_empty());
}

#[test]
fn backward_only_stays_on_the_path() {
    let mut source = storyline();
    let mut map = seed(&mut source, &[4]);
    let report = CompletionController::new(&mut source)
        .with_mode(CompletionMode::BackwardOnly)
        .complete(&mut map)
        .unwrap();
    assert_eq!(map.ids(), [1, 2, 3, 4].into_iter().map(r).collect());
    assert_eq!(report.forward_queries, 0);
}

#[test]
fn completed_map_needs_no_more_work() {
    let mut source = storyline();
    let mut map = seed(&mut source, &[1]);
    let mut controller = CompletionController::new(&mut source);
    controller.complete(&mut map).unwrap();
    let size = map.len();

    let report = controller.complete(&mut map).unwrap();
    assert_eq!(report.added, 0);
    assert_eq!(report.fetches, 0);
    assert_eq!(map.len(), size);
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn missing_record_is_not_found() {
    let mut source: InMemorySource = [RawQuestRecord::new(5, "Five", "Qf=4")].into_iter().collect();
    let mut map = seed(&mut source, &[5]);
    let err = CompletionController::new(&mut source)
        .complete(&mut map)
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn cycle_in_backward_chain() {
    let mut source: InMemorySource = [
        RawQuestRecord::new(1, "One", "Qf=2"),
        RawQuestRecord::new(2, "Two", "Qf=3"),
        RawQuestRecord::new(3, "Three", "Qf=2"),
    ]
    .into_iter()
    .collect();
    let mut map = seed(&mut source, &[1]);
    let err = CompletionController::new(&mut source)
        .complete(&mut map)
        .unwrap_err();
    match err.kind {
        ErrorKind::Cycle { path } => assert_eq!(path, vec![r(2), r(3), r(2)]),
        other => panic!("expected a cycle, got {other:?}"),
    }
}

#[test]
fn fetch_budget() {
    let mut source = chain(10);
    let mut map = seed(&mut source, &[10]);
    let err = CompletionController::new(&mut source)
        .with_limits(CompletionLimits::default().with_max_fetches(3))
        .complete(&mut map)
        .unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::LimitExceeded(SemanticLimit::MaxFetches { limit: 3, .. })
    ));
}

#[test]
fn pass_budget() {
    let mut source = chain(5);
    let mut map = seed(&mut source, &[1]);
    let err = CompletionController::new(&mut source)
        .with_limits(CompletionLimits::default().with_max_passes(2))
        .complete(&mut map)
        .unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::LimitExceeded(SemanticLimit::MaxPasses { limit: 2 })
    ));
    // Quests found before the budget ran out stay.
    assert_eq!(map.ids(), [1, 2, 3].into_iter().map(r).collect());
}

#[test]
fn depth_budget() {
    let mut source = chain(10);
    let mut map = seed(&mut source, &[10]);
    let err = CompletionController::new(&mut source)
        .with_limits(CompletionLimits::default().with_max_depth(4))
        .complete(&mut map)
        .unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::LimitExceeded(SemanticLimit::MaxDepth { limit: 4, .. })
    ));
}
