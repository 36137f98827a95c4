//! Integration tests for Layer 1: Language
//!
//! Tests for the criterion lexer, condition parser, tree operations, and printing.

mod groups;
mod lexer;
mod parser;
mod printing;
