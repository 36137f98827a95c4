//! Integration tests for the condition lexer

use questlogic_language::{Comparison, Lexer, Span, TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    Lexer::tokenize_all(source)
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn empty_input() {
    assert!(Lexer::tokenize_all("").is_empty());
    assert!(Lexer::tokenize_all("   \t ").is_empty());
}

#[test]
fn operators_and_parentheses() {
    assert_eq!(
        kinds("(&|)"),
        vec![TokenKind::LParen, TokenKind::And, TokenKind::Or, TokenKind::RParen]
    );
}

#[test]
fn predicate_parts() {
    let tokens = Lexer::tokenize_all("Qf!42");
    assert_eq!(tokens.len(), 1);
    let TokenKind::Predicate(predicate) = &tokens[0].kind else {
        panic!("expected predicate, got {:?}", tokens[0].kind);
    };
    assert_eq!(predicate.code, "Qf");
    assert_eq!(predicate.comparison, Comparison::Not);
    assert_eq!(predicate.value.as_deref(), Some("42"));
}

#[test]
fn valueless_predicate() {
    let tokens = Lexer::tokenize_all("PG=");
    let TokenKind::Predicate(predicate) = &tokens[0].kind else {
        panic!("expected predicate");
    };
    assert_eq!(predicate.value, None);
}

#[test]
fn spans_cover_source_text() {
    let source = " Qf=1 & PL>20";
    let tokens = Lexer::tokenize_all(source);
    let texts: Vec<&str> = tokens.iter().map(|t| t.text(source)).collect();
    assert_eq!(texts, vec!["Qf=1", "&", "PL>20"]);
    assert_eq!(tokens[0].span, Span::new(1, 5));
}

#[test]
fn malformed_words() {
    assert!(matches!(&kinds("Qf<3")[0], TokenKind::Malformed(word) if word == "Qf<3"));
    assert!(matches!(&kinds("=3")[0], TokenKind::Malformed(_)));
    assert!(matches!(&kinds("Qf=3x")[0], TokenKind::Malformed(_)));
}
