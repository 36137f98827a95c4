//! Integration tests for map queries and transitive reduction

use std::collections::BTreeSet;

use questlogic_engine::{CompletionController, QuestMap, TransitiveReducer};
use questlogic_foundation::ErrorKind;

use crate::{map_of, r, seed, storyline};

fn completed_storyline() -> QuestMap {
    let mut source = storyline();
    let mut map = seed(&mut source, &[3]);
    CompletionController::new(&mut source)
        .complete(&mut map)
        .unwrap();
    map
}

// =============================================================================
// Queries
// =============================================================================

#[test]
fn topological_order_puts_requirements_first() {
    let map = completed_storyline();
    let order = map.topological_order().unwrap();
    assert_eq!(order.len(), map.len());
    for (position, id) in order.iter().enumerate() {
        for required in map.requested_quests(*id).unwrap() {
            let at = order.iter().position(|&o| o == required).unwrap();
            assert!(at < position, "{required} should come before {id}");
        }
    }
}

#[test]
fn longest_path_prefers_longer_chain() {
    let map = completed_storyline();
    assert_eq!(map.longest_path(r(3), r(1)).unwrap(), Some(vec![r(3), r(2), r(1)]));
    // Ties between the two trials go to the smaller id.
    assert_eq!(
        map.longest_path(r(6), r(1)).unwrap(),
        Some([6, 5, 10, 4, 3, 2, 1].into_iter().map(r).collect())
    );
    assert_eq!(map.longest_path(r(1), r(6)).unwrap(), None);
}

#[test]
fn requirement_closure_and_dependents() {
    let map = completed_storyline();
    assert_eq!(map.requirement_closure(r(4)), [1, 2, 3].into_iter().map(r).collect());
    assert_eq!(map.dependents(r(4)), [7, 10, 11].into_iter().map(r).collect());
}

#[test]
fn cycle_is_reported() {
    let map = map_of(&[(1, "Qf=2"), (2, "Qf=1")]);
    let err = map.topological_order().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Cycle { .. }));
}

#[test]
fn open_map_has_missing_references() {
    let map = map_of(&[(1, "Qf=9&Qf=2"), (2, "")]);
    assert_eq!(map.missing_references(), vec![(r(1), r(9))]);
    assert!(map.validate_closed().is_err());
}

// =============================================================================
// Transitive Reduction
// =============================================================================

#[test]
fn reduction_removes_shortcut() {
    let mut map = completed_storyline();
    let edges_before = map.edges().len();
    let report = TransitiveReducer::new().reduce(&mut map).unwrap();
    assert_eq!(report.examined, edges_before);
    assert_eq!(report.removed, vec![(r(3), r(1))]);
    assert_eq!(map.edges().len(), edges_before - 1);
    assert_eq!(map.requested_quests(r(3)).unwrap(), BTreeSet::from([r(2)]));
}

#[test]
fn reduction_keeps_reachability() {
    let mut map = completed_storyline();
    let before: Vec<_> = map.ids().into_iter().map(|id| map.requirement_closure(id)).collect();
    TransitiveReducer::new().reduce(&mut map).unwrap();
    let after: Vec<_> = map.ids().into_iter().map(|id| map.requirement_closure(id)).collect();
    assert_eq!(before, after);
}

#[test]
fn reduction_drops_mentioning_group_whole() {
    let mut map = map_of(&[(1, ""), (2, "Qf=1"), (3, "Qf=2&(Qf=1|PL>5)")]);
    TransitiveReducer::new().reduce(&mut map).unwrap();
    assert_eq!(map.get(r(3)).unwrap().condition.to_string(), "Qf=2");
}

#[test]
fn reduction_rejects_cycles_untouched() {
    let mut map = map_of(&[(1, "Qf=2"), (2, "Qf=1&Qf=3"), (3, "Qf=1")]);
    let before = map.clone();
    assert!(TransitiveReducer::new().reduce(&mut map).is_err());
    assert_eq!(map, before);
}

#[test]
fn reduction_rejects_open_maps() {
    let mut map = map_of(&[(1, "Qf=9")]);
    let err = TransitiveReducer::new().reduce(&mut map).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::StructuralInvariant(_)));
}
