//! Quest graph engine for questlogic.
//!
//! This crate provides:
//! - [`Quest`] and [`QuestMap`] - Quests with parsed start conditions, keyed by id
//! - [`QuestSource`] - The lookups the engine needs from its environment
//! - [`CompletionController`] - Grows a seed map to a closed requirement graph
//! - [`TransitiveReducer`] - Drops prerequisite edges implied by longer chains
//! - [`ClusterContractor`] - Collapses per-class quest variants into one node
//! - [`Pipeline`] - Runs the stages in order with one configuration

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod completion;
pub mod contract;
pub mod map;
pub mod pipeline;
pub mod quest;
pub mod reduce;
pub mod source;


pub use completion::{CompletionController, CompletionLimits, CompletionMode, CompletionReport};
pub use contract::{ClusterContractor, ContractionReport, MergedCluster, SyntheticIdAllocator};
pub use map::QuestMap;
pub use pipeline::{
    Pipeline, PipelineConfig, PipelineReport, seed_from_achievement, seed_from_ids,
};
pub use quest::{Objective, Quest, QuestKind, RawAchievementRecord, RawQuestRecord};
pub use reduce::{ReductionReport, TransitiveReducer};
pub use source::{InMemorySource, QuestSource};
