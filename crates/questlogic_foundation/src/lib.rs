//! Core identifiers and error types for questlogic.
//!
//! This crate provides:
//! - [`QuestId`] - Tagged quest identifiers keeping engine-made ids apart from game ids
//! - [`Error`] - Rich error types with context
//! - [`SemanticLimit`] - Budgets that stop runaway work

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod id;

pub use error::{Error, ErrorContext, ErrorKind, FetchErrorKind, Result, SemanticLimit};
pub use id::QuestId;
