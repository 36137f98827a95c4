//! questlogic - Quest prerequisite logic engine
//!
//! This crate re-exports all layers of the questlogic system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: questlogic_runtime    - Record store, persistence, REPL, CLI
//! Layer 2: questlogic_engine     - Completion, reduction, cluster contraction
//! Layer 1: questlogic_language   - Criterion lexer, parser, condition trees
//! Layer 0: questlogic_foundation - Core types (QuestId, Error)
//! ```

pub use questlogic_engine as engine;
pub use questlogic_foundation as foundation;
pub use questlogic_language as language;
pub use questlogic_runtime as runtime;
