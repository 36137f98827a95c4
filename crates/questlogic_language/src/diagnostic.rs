//! Non-fatal findings reported while parsing a condition.
//!
//! Malformed tokens never abort a parse; they are skipped and recorded so
//! callers can attach them to the quest that owns the condition.

use thiserror::Error;

use crate::span::Span;

/// A skipped or suspicious piece of a condition string.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("{kind} '{text}' at {span}")]
pub struct Diagnostic {
    /// What went wrong.
    pub kind: DiagnosticKind,
    /// Where in the condition string.
    pub span: Span,
    /// The offending source text.
    pub text: String,
}

impl Diagnostic {
    /// Creates a diagnostic.
    #[must_use]
    pub fn new(kind: DiagnosticKind, span: Span, text: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            text: text.into(),
        }
    }
}

/// Categories of parse diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagnosticKind {
    /// The word is not `<code><symbol><digits>?`.
    #[error("malformed token")]
    MalformedToken,
    /// The predicate code is not one the engine knows.
    #[error("unknown predicate")]
    UnknownPredicate,
    /// The value does not fit the predicate (e.g. quest id out of range).
    #[error("invalid value")]
    InvalidValue,
    /// A parenthesis has no partner.
    #[error("unbalanced parenthesis")]
    UnbalancedParenthesis,
    /// An operator has nothing on one side.
    #[error("empty operand")]
    EmptyOperand,
    /// Tokens after a closing parenthesis inside one operand were ignored.
    #[error("trailing tokens")]
    TrailingTokens,
}
