//! Integration tests for class-cluster contraction

use std::collections::BTreeSet;

use questlogic_engine::{ClusterContractor, QuestKind, TransitiveReducer};
use questlogic_foundation::QuestId;

use crate::{map_of, r};

#[test]
fn storyline_trials_collapse() {
    let mut map = map_of(&[
        (4, ""),
        (5, "(Qf=10&PG=1)|(Qf=11&PG=2)"),
        (6, "Qf=5"),
        (10, "Qf=4"),
        (11, "Qf=4"),
    ]);
    let report = ClusterContractor::new().contract(&mut map).unwrap();

    assert_eq!(report.roots, vec![r(5)]);
    assert_eq!(report.merged_count(), 1);
    assert_eq!(map.ids(), [4, 5, 6, 10].into_iter().map(r).collect());
    assert_eq!(map.get(r(5)).unwrap().condition.to_string(), "Qf=10");

    let trial = map.get(r(10)).unwrap();
    assert_eq!(trial.kind, QuestKind::Substitute);
    assert!(trial.display_name().starts_with("substitute: "));
    assert_eq!(trial.requested_quests(), BTreeSet::from([r(4)]));
}

#[test]
fn variants_with_different_requirements() {
    // The representative keeps only its own requirements outside the cluster.
    let mut map = map_of(&[
        (1, ""),
        (2, ""),
        (5, "(Qf=10&PG=1)|(Qf=11&PG=2)"),
        (10, "Qf=1"),
        (11, "Qf=2"),
    ]);
    let report = ClusterContractor::new().contract(&mut map).unwrap();
    assert_eq!(report.clusters[0].representative, r(10));
    assert_eq!(map.requested_quests(r(10)).unwrap(), BTreeSet::from([r(1)]));
    assert!(map.contains(r(2)));
    assert!(map.validate_closed().is_ok());
}

#[test]
fn contraction_after_reduction_stays_reducible() {
    let mut map = map_of(&[
        (1, ""),
        (5, "(Qf=10&PG=1)|(Qf=11&PG=2)"),
        (10, "Qf=1"),
        (11, "Qf=1"),
        (12, "Qf=11&Qf=1"),
    ]);
    TransitiveReducer::new().reduce(&mut map).unwrap();
    ClusterContractor::new().contract(&mut map).unwrap();
    assert_eq!(map.requested_quests(r(12)).unwrap(), BTreeSet::from([r(10)]));
    assert!(map.topological_order().is_ok());
    let report = TransitiveReducer::new().reduce(&mut map).unwrap();
    assert!(report.removed.is_empty());
}

#[test]
fn bridge_ids_are_synthetic_and_gone_afterwards() {
    let mut map = map_of(&[
        (1, "(Qf=10&PG=1)|(Qf=11&PG=2)"),
        (10, ""),
        (11, ""),
        (30, "Qf=40&((Qf=31&PG=1)|(Qf=32&PG=2))"),
        (31, ""),
        (32, ""),
        (40, ""),
    ]);
    let report = ClusterContractor::new().contract(&mut map).unwrap();
    assert!(!report.bridges.is_empty());
    assert!(report.bridges.iter().all(|id| matches!(id, QuestId::Synthetic(_))));
    assert!(map.ids().iter().all(|id| id.is_real()));
}

#[test]
fn second_pass_does_nothing() {
    let mut map = map_of(&[
        (5, "(Qf=10&PG=1)|(Qf=11&PG=2)|(Qf=12&PG=3)"),
        (10, ""),
        (11, ""),
        (12, ""),
    ]);
    let mut contractor = ClusterContractor::new();
    contractor.contract(&mut map).unwrap();
    let once = map.clone();
    assert!(contractor.contract(&mut map).unwrap().is_noop());
    assert_eq!(map, once);
}
