//! Record store, persistence, REPL, and CLI for questlogic.
//!
//! This crate provides:
//! - [`RecordStore`] - Quest and achievement records loaded from JSON
//! - [`Session`] - A record store, the map being built, and stage settings
//! - [`Repl`] - Interactive read-eval-print loop over a session
//! - [`RuntimeConfig`] - TOML configuration for the CLI
//! - Map serialization (`MessagePack`) and the JSON export

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod editor;
pub mod highlight;
pub mod repl;
pub mod serialize;
pub mod session;
pub mod store;

pub use config::{CompletionSection, LogSection, ModeSetting, PipelineSection, RuntimeConfig};
pub use editor::{LineEditor, ReadResult, RustylineEditor};
pub use highlight::ConditionHighlighter;
pub use repl::{Outcome, Repl};
pub use serialize::{
    ExportedQuest, export, export_json, export_to_file, from_bytes, load_from_file, save_to_file,
    to_bytes,
};
pub use session::Session;
pub use store::RecordStore;
