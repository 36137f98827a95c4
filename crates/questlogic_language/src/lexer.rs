//! Lexer for the start-condition mini-language.
//!
//! The lexer converts a condition string into a stream of tokens. Anything
//! between operators, parentheses and whitespace is a single word, which is
//! either a well-formed predicate (`Qf=12`, `PL>50`, `Ps!1`) or malformed.

use crate::span::Span;
use crate::token::{Comparison, PredicateToken, Token, TokenKind};

/// Lexer for condition strings.
pub struct Lexer<'src> {
    /// Source text being tokenized.
    source: &'src str,
    /// Current byte offset in source.
    position: usize,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            position: 0,
        }
    }

    /// Returns the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Option<Token> {
        self.skip_whitespace();

        let start = self.position;
        let c = self.peek_char()?;
        let kind = match c {
            '(' => {
                self.advance();
                TokenKind::LParen
            }
            ')' => {
                self.advance();
                TokenKind::RParen
            }
            '&' => {
                self.advance();
                TokenKind::And
            }
            '|' => {
                self.advance();
                TokenKind::Or
            }
            _ => self.scan_word(),
        };

        Some(Token::new(kind, Span::new(start, self.position)))
    }

    /// Tokenizes all source and returns a vector of tokens.
    #[must_use]
    pub fn tokenize_all(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        while let Some(token) = lexer.next_token() {
            tokens.push(token);
        }
        tokens
    }

    /// Peeks at the next character without consuming it.
    fn peek_char(&self) -> Option<char> {
        self.source[self.position..].chars().next()
    }

    /// Advances past the next character.
    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.position += c.len_utf8();
        }
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    /// Scans a word up to the next operator, parenthesis or whitespace.
    fn scan_word(&mut self) -> TokenKind {
        let start = self.position;
        while let Some(c) = self.peek_char() {
            if is_word_boundary(c) {
                break;
            }
            self.advance();
        }
        let word = &self.source[start..self.position];
        match split_predicate(word) {
            Some(predicate) => TokenKind::Predicate(predicate),
            None => TokenKind::Malformed(word.to_string()),
        }
    }
}

fn is_word_boundary(c: char) -> bool {
    matches!(c, '(' | ')' | '&' | '|') || c.is_whitespace()
}

/// Splits a word shaped like `<code><symbol><digits>?`.
///
/// The code is one or more ASCII alphanumerics or underscores.
fn split_predicate(word: &str) -> Option<PredicateToken> {
    let symbol_at = word.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))?;
    if symbol_at == 0 {
        return None;
    }
    let (code, rest) = word.split_at(symbol_at);
    let mut chars = rest.chars();
    let comparison = Comparison::from_char(chars.next()?)?;
    let digits = chars.as_str();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(PredicateToken {
        code: code.to_string(),
        comparison,
        value: (!digits.is_empty()).then(|| digits.to_string()),
    })
}
