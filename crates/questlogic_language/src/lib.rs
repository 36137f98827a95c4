//! Start-condition mini-language for questlogic.
//!
//! This crate provides:
//! - [`Lexer`] - Tokenization of condition strings such as `Qf=12&(PG=1|PG=2)`
//! - [`Parser`] - Parsing tokens into a [`LogicalGroup`] with [`Diagnostic`]s
//! - [`Criterion`] - Leaf predicates (required quest, class, level, ...)
//! - [`LogicalGroup`] - AND/OR trees and the queries the graph engine needs

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod criterion;
pub mod diagnostic;
pub mod group;
pub mod lexer;
pub mod parser;
pub mod pretty;
pub mod span;
pub mod token;


pub use criterion::{Criterion, CriterionKind, CriterionValue};
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use group::{Link, LogicalGroup, Node};
pub use lexer::Lexer;
pub use parser::{DEFAULT_MAX_DEPTH, ParsedCondition, Parser, parse};
pub use span::Span;
pub use token::{Comparison, PredicateToken, Token, TokenKind};
