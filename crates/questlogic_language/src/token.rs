//! Token types for the start-condition mini-language.
//!
//! Tokens are the output of the lexer and input to the parser.

use std::fmt;

use crate::span::Span;

/// A token from lexical analysis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// The type and value of this token.
    pub kind: TokenKind,
    /// Source location of this token.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the text this token covers in the given source.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.span.text(source)
    }

    /// Returns true if this token joins operands (`&` or `|`).
    #[must_use]
    pub const fn is_operator(&self) -> bool {
        matches!(self.kind, TokenKind::And | TokenKind::Or)
    }
}

/// Token types for the mini-language.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `&`
    And,
    /// `|`
    Or,
    /// A well-formed `<code><symbol><value>?` predicate like `Qf=12` or `PG!`.
    Predicate(PredicateToken),
    /// A run of characters that is not a well-formed predicate.
    Malformed(String),
}

impl TokenKind {
    /// Returns a human-readable name for this token kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::And => "'&'",
            Self::Or => "'|'",
            Self::Predicate(_) => "predicate",
            Self::Malformed(_) => "malformed token",
        }
    }
}

/// The pieces of a predicate token, before the code is interpreted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PredicateToken {
    /// Predicate code, e.g. `Qf` or `PG`.
    pub code: String,
    /// Comparison symbol.
    pub comparison: Comparison,
    /// Digits following the symbol, if any.
    pub value: Option<String>,
}

/// The symbol between a predicate code and its value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Comparison {
    /// `=`
    Equal,
    /// `>`
    Greater,
    /// `!` (negation)
    Not,
}

impl Comparison {
    /// Parses a comparison symbol.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '=' => Some(Self::Equal),
            '>' => Some(Self::Greater),
            '!' => Some(Self::Not),
            _ => None,
        }
    }

    /// Returns the symbol character.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Equal => '=',
            Self::Greater => '>',
            Self::Not => '!',
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
