//! Integration tests for LogicalGroup operations
//!
//! Tests the edits the engine performs on parsed conditions.

use std::collections::BTreeSet;

use questlogic_foundation::QuestId;
use questlogic_language::{Link, LogicalGroup, parse};

fn group(source: &str) -> LogicalGroup {
    parse(source).unwrap().group
}

fn ids(values: &[u32]) -> BTreeSet<QuestId> {
    values.iter().copied().map(QuestId::Real).collect()
}

// =============================================================================
// Removal
// =============================================================================

#[test]
fn remove_direct_requirement() {
    let mut g = group("Qf=1&Qf=2&PL>5");
    assert_eq!(g.remove(&ids(&[2])), 1);
    assert_eq!(g.to_string(), "Qf=1&PL>5");
}

#[test]
fn remove_drops_whole_child_group() {
    let mut g = group("Qf=1&(Qf=2|Qf=3)&PL>5");
    assert_eq!(g.remove(&ids(&[3])), 1);
    assert_eq!(g.to_string(), "Qf=1&PL>5");
}

#[test]
fn remove_absent_id_changes_nothing() {
    let mut g = group("Qf=1&Qf!2");
    assert_eq!(g.remove(&ids(&[9])), 0);
    assert_eq!(g.to_string(), "Qf=1&Qf!2");
}

// =============================================================================
// Retargeting
// =============================================================================

#[test]
fn retarget_collapses_duplicates() {
    let mut g = group("Qf=1&(Qf=2|Qf=3)");
    let merged = QuestId::Synthetic(1);
    assert_eq!(g.retarget(&ids(&[2, 3]), merged), 2);
    assert_eq!(g.referenced_quest_ids(), BTreeSet::from([QuestId::Real(1), merged]));
    assert_eq!(g.to_string(), "Qf=1&Qf=s1");
}

#[test]
fn retarget_leaves_negations_alone() {
    let mut g = group("Qf!2&Qf=3");
    assert_eq!(g.retarget(&ids(&[2, 3]), QuestId::Real(4)), 1);
    assert_eq!(g.to_string(), "Qf!2&Qf=4");
}

// =============================================================================
// Adding Requirements and Alternatives
// =============================================================================

#[test]
fn add_requirement_to_alternatives() {
    let mut g = group("Qf=1|Qf=2");
    g.add_requirement(QuestId::Real(3));
    assert_eq!(g.link(), Link::And);
    assert_eq!(g.to_string(), "(Qf=1|Qf=2)&Qf=3");
}

#[test]
fn add_requirement_is_idempotent() {
    let mut g = group("Qf=1&Qf=2");
    g.add_requirement(QuestId::Real(2));
    assert_eq!(g.to_string(), "Qf=1&Qf=2");
}

#[test]
fn add_alternative_to_chain() {
    let mut g = group("Qf=1&Qf=2");
    g.add_alternative(QuestId::Real(3));
    assert_eq!(g.link(), Link::Or);
    assert_eq!(g.to_string(), "(Qf=1&Qf=2)|Qf=3");
}

#[test]
fn add_alternative_to_empty() {
    let mut g = LogicalGroup::empty();
    g.add_alternative(QuestId::Real(3));
    assert_eq!(g.to_string(), "Qf=3");
    assert_eq!(g.referenced_quest_ids(), ids(&[3]));
}

// =============================================================================
// Class Clusters
// =============================================================================

#[test]
fn independent_clusters_under_and() {
    let g = group("Qf=5&((Qf=1&PG=1)|(Qf=2&PG=2))&((Qf=3&PG=1)|(Qf=4&PG=2))");
    assert!(g.has_class_dependency());
    assert!(!g.is_class_cluster());
    assert_eq!(g.class_clusters(), vec![ids(&[1, 2]), ids(&[3, 4])]);
}

#[test]
fn builders() {
    let all = LogicalGroup::all_of([QuestId::Real(1), QuestId::Real(2)]);
    assert_eq!(all.to_string(), "Qf=1&Qf=2");
    let any = LogicalGroup::any_of([QuestId::Real(1), QuestId::Achievement(2)]);
    assert_eq!(any.to_string(), "Qf=1|Qf=a2");
}
