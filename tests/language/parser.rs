//! Integration tests for the condition parser
//!
//! Tests whole conditions as they appear in quest records.

use std::collections::BTreeSet;

use questlogic_foundation::{ErrorKind, QuestId, SemanticLimit};
use questlogic_language::{DiagnosticKind, Link, Parser, parse};

fn ids(values: &[u32]) -> BTreeSet<QuestId> {
    values.iter().copied().map(QuestId::Real).collect()
}

// =============================================================================
// Well-formed Conditions
// =============================================================================

#[test]
fn empty_condition_is_always_satisfied() {
    let parsed = parse("").unwrap();
    assert!(parsed.group.is_empty());
    assert!(parsed.is_clean());
    assert!(parsed.referenced_quest_ids().is_empty());
}

#[test]
fn chain_with_level_gate() {
    let parsed = parse("Qf=1&Qf=2&PL>10").unwrap();
    assert!(parsed.is_clean());
    assert_eq!(parsed.group.link(), Link::And);
    assert_eq!(parsed.group.len(), 3);
    assert_eq!(parsed.referenced_quest_ids(), ids(&[1, 2]));
}

#[test]
fn negated_quests_are_not_prerequisites() {
    let parsed = parse("Qf=1&Qf!2").unwrap();
    assert_eq!(parsed.referenced_quest_ids(), ids(&[1]));
    assert!(!parsed.group.references(QuestId::Real(2)));
}

#[test]
fn class_variants() {
    let parsed = parse("(Qf=10&PG=1)|(Qf=11&PG=2)|(Qf=12&PG=3)").unwrap();
    assert_eq!(parsed.group.link(), Link::Or);
    assert!(parsed.group.is_class_cluster());
    assert_eq!(parsed.group.class_cluster_ids(), ids(&[10, 11, 12]));
}

#[test]
fn alternatives_without_class_are_not_a_cluster() {
    let parsed = parse("Qf=1|Qf=2").unwrap();
    assert!(!parsed.group.is_class_cluster());
    assert!(parsed.group.class_cluster_ids().is_empty());
}

#[test]
fn depth_of_nested_groups() {
    assert_eq!(parse("Qf=1").unwrap().group.depth(), 1);
    assert_eq!(parse("Qf=1&(Qf=2|(Qf=3&PG=1))").unwrap().group.depth(), 3);
}

// =============================================================================
// Recoverable Problems
// =============================================================================

#[test]
fn bad_tokens_are_skipped_with_diagnostics() {
    let parsed = parse("Qf=1&Zz=2&Qf<3&Qf=4").unwrap();
    assert_eq!(parsed.referenced_quest_ids(), ids(&[1, 4]));
    let kinds: Vec<DiagnosticKind> = parsed.diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![DiagnosticKind::UnknownPredicate, DiagnosticKind::MalformedToken]
    );
}

#[test]
fn diagnostics_are_ordered_by_position() {
    let parsed = parse("Zz=1&Qf=2&Yy=3").unwrap();
    let starts: Vec<usize> = parsed.diagnostics.iter().map(|d| d.span.start).collect();
    assert_eq!(starts, vec![0, 10]);
}

#[test]
fn unpaired_parenthesis_is_dropped() {
    let parsed = parse("((Qf=1|Qf=2)&Qf=7").unwrap();
    assert_eq!(parsed.referenced_quest_ids(), ids(&[1, 2, 7]));
    assert!(
        parsed
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::UnbalancedParenthesis)
    );
}

// =============================================================================
// Fatal Problems
// =============================================================================

#[test]
fn mixed_operators_without_parentheses() {
    let err = parse("Qf=1|Qf=2&Qf=3").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Parse { .. }));
}

#[test]
fn nesting_beyond_limit() {
    let source = format!("{}Qf=1&Qf=2{}", "(".repeat(6), ")".repeat(6));
    let err = Parser::new(&source).with_max_depth(2).parse().unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::LimitExceeded(SemanticLimit::MaxDepth { .. })
    ));
}
