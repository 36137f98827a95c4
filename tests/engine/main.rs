//! Integration tests for Layer 2: Engine
//!
//! Tests for completion, reduction, contraction, and the pipeline that
//! chains them, against a small storyline held in memory.

mod completion;
mod contraction;
mod graph;

use questlogic_engine::{InMemorySource, Quest, QuestMap, QuestSource, RawQuestRecord};
use questlogic_foundation::QuestId;

pub fn r(id: u32) -> QuestId {
    QuestId::Real(id)
}

/// Records of a storyline.
///
/// ```text
/// 1 <- 2 <- 3 <- 4 <- 10 (class 1) <-+
/// 1 <------ 3         11 (class 2) <-+- 5 <- 6 (unless 7)
///                4 <- 7
/// ```
pub fn storyline() -> InMemorySource {
    [
        RawQuestRecord::new(1, "Arrival", ""),
        RawQuestRecord::new(2, "Errand", "Qf=1"),
        RawQuestRecord::new(3, "Report", "Qf=1&Qf=2"),
        RawQuestRecord::new(4, "Crossroads", "Qf=3"),
        RawQuestRecord::new(5, "Reunion", "(Qf=10&PG=1)|(Qf=11&PG=2)"),
        RawQuestRecord::new(6, "Epilogue", "Qf=5&Qf!7"),
        RawQuestRecord::new(7, "Betrayal", "Qf=4"),
        RawQuestRecord::new(10, "Trial of steel", "Qf=4"),
        RawQuestRecord::new(11, "Trial of wits", "Qf=4"),
    ]
    .into_iter()
    .collect()
}

pub fn seed(source: &mut InMemorySource, ids: &[u32]) -> QuestMap {
    ids.iter()
        .map(|&id| Quest::from_record(source.fetch_quest(r(id)).unwrap()).unwrap())
        .collect()
}

pub fn map_of(records: &[(u32, &str)]) -> QuestMap {
    records
        .iter()
        .map(|&(id, condition)| {
            Quest::from_record(RawQuestRecord::new(id, format!("Quest {id}"), condition)).unwrap()
        })
        .collect()
}
