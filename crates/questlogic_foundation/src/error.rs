//! Error types for the questlogic system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::id::QuestId;

/// Result alias used across all questlogic crates.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for questlogic operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a parse error for a start-condition text.
    #[must_use]
    pub fn parse(message: impl Into<String>, offset: usize, text: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse {
            message: message.into(),
            offset,
            text: text.into(),
        })
    }

    /// Creates a fetch error for the given quest.
    #[must_use]
    pub fn fetch(id: QuestId, kind: FetchErrorKind) -> Self {
        Self::new(ErrorKind::Fetch { id, kind })
    }

    /// Creates a "quest does not exist" fetch error.
    #[must_use]
    pub fn not_found(id: QuestId) -> Self {
        Self::fetch(id, FetchErrorKind::NotFound)
    }

    /// Creates a cycle error from the ids forming the cycle.
    #[must_use]
    pub fn cycle(path: Vec<QuestId>) -> Self {
        Self::new(ErrorKind::Cycle { path })
    }

    /// Creates a structural invariant violation.
    #[must_use]
    pub fn structural(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StructuralInvariant(message.into()))
    }

    /// Creates a semantic limit exceeded error.
    #[must_use]
    pub fn limit_exceeded(limit: SemanticLimit) -> Self {
        Self::new(ErrorKind::LimitExceeded(limit))
    }

    /// Returns true if this error reports a missing quest.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Fetch {
                kind: FetchErrorKind::NotFound,
                ..
            }
        )
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// The start-condition text could not be given a single meaning.
    #[error("parse error at offset {offset}: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
        /// Byte offset in the source text.
        offset: usize,
        /// The full start-condition text.
        text: String,
    },

    /// An external lookup failed.
    #[error("fetch of quest {id} failed: {kind}")]
    Fetch {
        /// The quest that was requested.
        id: QuestId,
        /// Why the lookup failed.
        kind: FetchErrorKind,
    },

    /// The requirement graph contains a cycle.
    #[error("requirement cycle: {}", format_path(.path))]
    Cycle {
        /// Ids along the cycle, first id repeated at the end.
        path: Vec<QuestId>,
    },

    /// A graph invariant does not hold (programming-contract violation).
    #[error("structural invariant violated: {0}")]
    StructuralInvariant(String),

    /// Semantic limit exceeded (kill switch triggered).
    #[error("limit exceeded: {0}")]
    LimitExceeded(SemanticLimit),

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    IoError(String),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Reasons an external quest lookup can fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The id does not exist in the source.
    NotFound,
    /// The source cannot answer this kind of request.
    Unsupported(String),
    /// The source failed for its own reasons (network, disk, decoding).
    Source(String),
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::Unsupported(what) => write!(f, "unsupported request: {what}"),
            Self::Source(msg) => write!(f, "{msg}"),
        }
    }
}

/// Semantic limits (kill switches) that can be exceeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticLimit {
    /// Maximum completion passes exceeded.
    MaxPasses {
        /// The configured limit.
        limit: u32,
    },
    /// Maximum fetch calls exceeded.
    MaxFetches {
        /// The configured limit.
        limit: u32,
        /// The quest whose fetch would have crossed the limit.
        quest: Option<QuestId>,
    },
    /// Maximum nesting depth exceeded.
    MaxDepth {
        /// The configured limit.
        limit: usize,
        /// What was being nested.
        context: Option<String>,
    },
}

impl fmt::Display for SemanticLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxPasses { limit } => {
                write!(f, "max completion passes ({limit}) exceeded")
            }
            Self::MaxFetches { limit, quest } => {
                write!(f, "max fetches ({limit}) exceeded")?;
                if let Some(id) = quest {
                    write!(f, " while fetching quest {id}")?;
                }
                Ok(())
            }
            Self::MaxDepth { limit, context } => {
                write!(f, "max depth ({limit}) exceeded")?;
                if let Some(ctx) = context {
                    write!(f, " in {ctx}")?;
                }
                Ok(())
            }
        }
    }
}

fn format_path(path: &[QuestId]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Source file or quest name.
    pub source: Option<String>,
    /// Quest being processed when the error occurred.
    pub quest: Option<QuestId>,
    /// Stack of stages the error passed through.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source location.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the quest being processed.
    #[must_use]
    pub fn with_quest(mut self, quest: QuestId) -> Self {
        self.quest = Some(quest);
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "at {source}")?;
        }
        if let Some(quest) = self.quest {
            write!(f, " (quest {quest})")?;
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}
