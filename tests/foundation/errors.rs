//! Integration tests for Error types
//!
//! Tests error construction, display, context, and error kinds.

use questlogic_foundation::{
    Error, ErrorContext, ErrorKind, FetchErrorKind, QuestId, SemanticLimit,
};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_parse() {
    let err = Error::parse("mixed operators", 4, "Qf=1&Qf=2|Qf=3");
    assert!(matches!(err.kind, ErrorKind::Parse { offset: 4, .. }));
    let msg = format!("{err}");
    assert!(msg.contains("offset 4"));
    assert!(msg.contains("mixed operators"));
}

#[test]
fn error_not_found() {
    let err = Error::not_found(QuestId::Real(42));
    assert!(err.is_not_found());
    assert!(format!("{err}").contains("42"));
    assert!(format!("{err}").contains("not found"));
}

#[test]
fn error_unsupported_fetch_is_not_not_found() {
    let err = Error::fetch(
        QuestId::Achievement(3),
        FetchErrorKind::Unsupported("achievements".to_string()),
    );
    assert!(!err.is_not_found());
    assert!(format!("{err}").contains("a3"));
}

#[test]
fn error_cycle_shows_path() {
    let err = Error::cycle(vec![QuestId::Real(1), QuestId::Real(2), QuestId::Real(1)]);
    assert_eq!(format!("{err}"), "requirement cycle: 1 -> 2 -> 1");
}

#[test]
fn error_structural() {
    let err = Error::structural("dangling reference 3 -> 9");
    assert!(matches!(err.kind, ErrorKind::StructuralInvariant(_)));
    assert!(format!("{err}").contains("dangling reference"));
}

#[test]
fn error_limits() {
    let err = Error::limit_exceeded(SemanticLimit::MaxPasses { limit: 8 });
    assert!(format!("{err}").contains("max completion passes (8)"));

    let err = Error::limit_exceeded(SemanticLimit::MaxFetches {
        limit: 10,
        quest: Some(QuestId::Real(5)),
    });
    assert!(format!("{err}").contains("while fetching quest 5"));

    let err = Error::limit_exceeded(SemanticLimit::MaxDepth {
        limit: 64,
        context: Some("condition".to_string()),
    });
    assert!(format!("{err}").contains("max depth (64) exceeded in condition"));
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn error_with_context() {
    let context = ErrorContext::new()
        .with_source("records.json")
        .with_quest(QuestId::Real(7))
        .with_frame("completion")
        .with_frame("fetch");
    let err = Error::not_found(QuestId::Real(8)).with_context(context);

    let context = err.context.as_ref().unwrap();
    assert_eq!(context.source.as_deref(), Some("records.json"));
    assert_eq!(context.quest, Some(QuestId::Real(7)));
    assert_eq!(context.stack, vec!["completion", "fetch"]);
}

#[test]
fn error_is_std_error() {
    fn assert_error<E: std::error::Error>(_: &E) {}
    assert_error(&Error::new(ErrorKind::Internal("boom".to_string())));
}
