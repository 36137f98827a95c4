//! Parser for the start-condition mini-language.
//!
//! A level of the expression is split into segments at `&`/`|` tokens that
//! are not inside parentheses. A segment that opens with `(` is parsed as a
//! nested level; any other segment is a flat conjunction of its predicates.
//!
//! Bad tokens never abort the parse. They are skipped and reported as
//! [`Diagnostic`]s. Only a level that mixes `&` and `|` is rejected, since
//! there is no way to tell which grouping was meant.

use questlogic_foundation::{Error, QuestId, Result, SemanticLimit};

use crate::criterion::{Criterion, CriterionKind};
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::group::{Link, LogicalGroup, Node};
use crate::lexer::Lexer;
use crate::span::Span;
use crate::token::{Comparison, PredicateToken, Token, TokenKind};

/// Default limit on parenthesis nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// The outcome of parsing one condition string.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ParsedCondition {
    /// The expression tree.
    pub group: LogicalGroup,
    /// Tokens that were skipped, in source order.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParsedCondition {
    /// Returns true if nothing was skipped.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Quest ids the condition makes hard prerequisites.
    #[must_use]
    pub fn referenced_quest_ids(&self) -> std::collections::BTreeSet<QuestId> {
        self.group.referenced_quest_ids()
    }
}

/// Parser for condition strings.
pub struct Parser<'src> {
    /// Source text (for error messages and segment text).
    source: &'src str,
    /// Tokens with unmatched parentheses already removed.
    tokens: Vec<Token>,
    /// For each `(` token, the index of its `)`.
    partners: Vec<Option<usize>>,
    /// Maximum nesting depth.
    max_depth: usize,
    /// Findings collected so far.
    diagnostics: Vec<Diagnostic>,
}

impl<'src> Parser<'src> {
    /// Creates a new parser for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        let mut diagnostics = Vec::new();
        let (tokens, partners) = match_parentheses(source, &mut diagnostics);
        Self {
            source,
            tokens,
            partners,
            max_depth: DEFAULT_MAX_DEPTH,
            diagnostics,
        }
    }

    /// Sets the maximum parenthesis nesting.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parses the whole source.
    ///
    /// # Errors
    /// Returns a parse error if one level mixes `&` and `|`, or a limit error
    /// if nesting exceeds the configured depth.
    pub fn parse(mut self) -> Result<ParsedCondition> {
        let group = self.parse_level(0, self.tokens.len(), 0)?;
        let mut diagnostics = self.diagnostics;
        diagnostics.sort_by_key(|d| d.span.start);
        Ok(ParsedCondition { group, diagnostics })
    }

    /// Parses the tokens in `start..end` as one level.
    fn parse_level(&mut self, start: usize, end: usize, depth: usize) -> Result<LogicalGroup> {
        if depth > self.max_depth {
            return Err(Error::limit_exceeded(SemanticLimit::MaxDepth {
                limit: self.max_depth,
                context: Some("criterion nesting".to_string()),
            }));
        }
        if start == end {
            return Ok(LogicalGroup::empty());
        }

        let (segments, link) = self.split(start, end)?;
        let mut children: Vec<Node> = Vec::new();
        for (from, to) in segments {
            if from == to {
                let offset = self.tokens.get(from).map_or(self.source.len(), |t| t.span.start);
                self.report(DiagnosticKind::EmptyOperand, Span::point(offset));
                continue;
            }
            let node = if self.tokens[from].kind == TokenKind::LParen {
                self.parse_parenthesized(from, to, depth)?
            } else {
                self.parse_flat(from, to)
            };
            if let Some(node) = node {
                if !children.contains(&node) {
                    children.push(node);
                }
            }
        }

        // A level holding a single group is that group.
        if matches!(children.as_slice(), [Node::Group(_)]) {
            if let Some(Node::Group(inner)) = children.pop() {
                return Ok(inner);
            }
        }
        Ok(LogicalGroup::new(link, children))
    }

    /// Splits `start..end` at top-level operators and works out the link.
    fn split(&self, start: usize, end: usize) -> Result<(Vec<(usize, usize)>, Link)> {
        let mut segments = Vec::new();
        let mut link: Option<Link> = None;
        let mut segment_start = start;
        let mut i = start;
        while i < end {
            let token = &self.tokens[i];
            let seen = match token.kind {
                TokenKind::LParen => {
                    i = self.partners[i].unwrap_or(i) + 1;
                    continue;
                }
                TokenKind::And => Link::And,
                TokenKind::Or => Link::Or,
                _ => {
                    i += 1;
                    continue;
                }
            };
            match link {
                Some(first) if first != seen => {
                    return Err(Error::parse(
                        "ambiguous mix of '&' and '|' at one nesting level",
                        token.span.start,
                        self.source,
                    ));
                }
                Some(_) => {}
                None => link = Some(seen),
            }
            segments.push((segment_start, i));
            segment_start = i + 1;
            i += 1;
        }
        segments.push((segment_start, end));
        Ok((segments, link.unwrap_or(Link::None)))
    }

    /// Parses a segment that opens with `(`.
    fn parse_parenthesized(&mut self, from: usize, to: usize, depth: usize) -> Result<Option<Node>> {
        let close = self.partners[from].unwrap_or(to - 1);
        if close + 1 < to {
            let span = self.tokens[close + 1].span.to(self.tokens[to - 1].span);
            self.report(DiagnosticKind::TrailingTokens, span);
        }
        let inner = self.parse_level(from + 1, close, depth + 1)?;
        Ok(match inner.len() {
            0 => None,
            1 => inner.children().first().cloned(),
            _ => Some(Node::Group(inner)),
        })
    }

    /// Parses a segment as a conjunction of its predicates.
    ///
    /// Parentheses and operators nested inside such a segment carry no
    /// structure; every predicate in it is simply required.
    fn parse_flat(&mut self, from: usize, to: usize) -> Option<Node> {
        let mut criteria: Vec<Node> = Vec::new();
        for index in from..to {
            let token = self.tokens[index].clone();
            let criterion = match &token.kind {
                TokenKind::Predicate(predicate) => self.criterion(predicate, token.span),
                TokenKind::Malformed(_) => {
                    self.report(DiagnosticKind::MalformedToken, token.span);
                    None
                }
                _ => None,
            };
            if let Some(criterion) = criterion.map(Node::Criterion) {
                if !criteria.contains(&criterion) {
                    criteria.push(criterion);
                }
            }
        }
        match criteria.len() {
            0 => None,
            1 => criteria.pop(),
            _ => Some(Node::Group(LogicalGroup::and(criteria))),
        }
    }

    /// Interprets a predicate token, reporting what cannot be used.
    fn criterion(&mut self, predicate: &PredicateToken, span: Span) -> Option<Criterion> {
        let Some(kind) = CriterionKind::from_code(&predicate.code) else {
            self.report(DiagnosticKind::UnknownPredicate, span);
            return None;
        };
        let value = match &predicate.value {
            Some(digits) => {
                if let Ok(n) = digits.parse::<i64>() {
                    Some(n)
                } else {
                    self.report(DiagnosticKind::InvalidValue, span);
                    return None;
                }
            }
            None => None,
        };
        let negated = predicate.comparison == Comparison::Not;
        let criterion = Criterion::new(kind, value, negated);
        if criterion.is_none() {
            self.report(DiagnosticKind::InvalidValue, span);
        }
        criterion
    }

    fn report(&mut self, kind: DiagnosticKind, span: Span) {
        let text = span.text(self.source).to_string();
        self.diagnostics.push(Diagnostic::new(kind, span, text));
    }
}

/// Lexes `source`, drops parentheses without a partner, and pairs the rest.
fn match_parentheses(
    source: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> (Vec<Token>, Vec<Option<usize>>) {
    let raw = Lexer::tokenize_all(source);
    let mut keep = vec![true; raw.len()];
    let mut open: Vec<usize> = Vec::new();
    for (i, token) in raw.iter().enumerate() {
        match token.kind {
            TokenKind::LParen => open.push(i),
            TokenKind::RParen => {
                if open.pop().is_none() {
                    keep[i] = false;
                }
            }
            _ => {}
        }
    }
    for i in open {
        keep[i] = false;
    }

    let mut tokens = Vec::with_capacity(raw.len());
    for (token, kept) in raw.into_iter().zip(keep) {
        if kept {
            tokens.push(token);
        } else {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnbalancedParenthesis,
                token.span,
                token.text(source),
            ));
        }
    }

    let mut partners = vec![None; tokens.len()];
    let mut open: Vec<usize> = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LParen => open.push(i),
            TokenKind::RParen => {
                if let Some(o) = open.pop() {
                    partners[o] = Some(i);
                }
            }
            _ => {}
        }
    }
    (tokens, partners)
}

/// Parses a condition string with default settings.
///
/// # Errors
/// Returns an error if a level mixes `&` and `|` or nesting is too deep.
pub fn parse(source: &str) -> Result<ParsedCondition> {
    Parser::new(source).parse()
}
