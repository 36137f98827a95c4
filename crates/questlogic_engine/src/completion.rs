//! Graph completion: growing a seed map to a closed requirement graph.
//!
//! Each pass has two halves:
//! 1. Backward closure: every missing requirement of an unsettled quest is
//!    fetched, depth-first, and inserted only once its own requirements are
//!    in the map.
//! 2. Forward closure: every unsettled quest asks the source which quests
//!    require it, and the missing ones are fetched and inserted.
//!
//! Quests examined in a pass are settled at the end of it and never queried
//! again. Passes repeat until one adds nothing.

use std::collections::BTreeSet;

use questlogic_foundation::{Error, ErrorContext, QuestId, Result, SemanticLimit};

use crate::map::QuestMap;
use crate::quest::Quest;
use crate::source::QuestSource;

// =============================================================================
// Configuration
// =============================================================================

/// Budgets that stop completion when a source misbehaves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompletionLimits {
    /// Maximum number of passes.
    pub max_passes: u32,
    /// Maximum number of quest fetches over the controller's lifetime.
    pub max_fetches: u32,
    /// Maximum length of one backward expansion chain.
    pub max_depth: usize,
}

impl Default for CompletionLimits {
    fn default() -> Self {
        Self {
            max_passes: 256,
            max_fetches: 100_000,
            max_depth: 10_000,
        }
    }
}

impl CompletionLimits {
    /// Sets the pass budget.
    #[must_use]
    pub fn with_max_passes(mut self, max: u32) -> Self {
        self.max_passes = max;
        self
    }

    /// Sets the fetch budget.
    #[must_use]
    pub fn with_max_fetches(mut self, max: u32) -> Self {
        self.max_fetches = max;
        self
    }

    /// Sets the backward chain budget.
    #[must_use]
    pub fn with_max_depth(mut self, max: usize) -> Self {
        self.max_depth = max;
        self
    }
}

/// Which closures a completion runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompletionMode {
    /// Backward and forward closure until nothing new appears.
    #[default]
    Full,
    /// Only what the seed quests require (the path to them).
    BackwardOnly,
}

/// What a completion run did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompletionReport {
    /// Passes run, including the final one that found nothing new.
    pub passes: u32,
    /// Quests inserted into the map.
    pub added: usize,
    /// Quest fetches issued.
    pub fetches: u32,
    /// Forward-reference queries issued.
    pub forward_queries: u32,
}

// =============================================================================
// Controller
// =============================================================================

/// Drives completion against a [`QuestSource`].
///
/// The settled set lives in the controller, so a second call on the same
/// map only examines quests added since the first.
pub struct CompletionController<S> {
    source: S,
    limits: CompletionLimits,
    mode: CompletionMode,
    settled: BTreeSet<QuestId>,
    fetches: u32,
}

impl<S: QuestSource> CompletionController<S> {
    /// Creates a controller with default limits in full mode.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            limits: CompletionLimits::default(),
            mode: CompletionMode::default(),
            settled: BTreeSet::new(),
            fetches: 0,
        }
    }

    /// Sets the budgets.
    #[must_use]
    pub fn with_limits(mut self, limits: CompletionLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Sets the mode.
    #[must_use]
    pub fn with_mode(mut self, mode: CompletionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Starts from quests settled by an earlier controller.
    ///
    /// Every id in `settled` must still be in the map with its requirements
    /// present; a settled id is never examined again.
    #[must_use]
    pub fn with_settled(mut self, settled: BTreeSet<QuestId>) -> Self {
        self.settled = settled;
        self
    }

    /// Quests that will not be examined again.
    #[must_use]
    pub fn settled(&self) -> &BTreeSet<QuestId> {
        &self.settled
    }

    /// Gives the settled set back, for a later [`with_settled`](Self::with_settled).
    #[must_use]
    pub fn into_settled(self) -> BTreeSet<QuestId> {
        self.settled
    }

    /// Gives the source back.
    pub fn into_source(self) -> S {
        self.source
    }

    /// Grows `map` until a pass adds no quest.
    ///
    /// # Errors
    /// Propagates fetch errors, reports a cycle met within one backward
    /// expansion chain, and fails when a budget is exhausted. Quests fetched
    /// before the failure stay in the map.
    pub fn complete(&mut self, map: &mut QuestMap) -> Result<CompletionReport> {
        let fetches_before = self.fetches;
        let mut report = CompletionReport::default();
        loop {
            if report.passes >= self.limits.max_passes {
                return Err(Error::limit_exceeded(SemanticLimit::MaxPasses {
                    limit: self.limits.max_passes,
                }));
            }
            report.passes += 1;

            let pending: Vec<QuestId> = map
                .ids()
                .into_iter()
                .filter(|id| !self.settled.contains(id))
                .collect();

            let mut added = 0;
            for &id in &pending {
                added += self.backward(map, id)?;
            }
            if self.mode == CompletionMode::Full {
                for &id in &pending {
                    report.forward_queries += 1;
                    added += self.forward(map, id)?;
                }
            }
            self.settled.extend(pending);

            tracing::info!(pass = report.passes, added, size = map.len(), "completion pass");
            report.added += added;
            if added == 0 {
                break;
            }
        }
        report.fetches = self.fetches - fetches_before;
        Ok(report)
    }

    /// Fetches every missing requirement of `id`, depth-first.
    fn backward(&mut self, map: &mut QuestMap, id: QuestId) -> Result<usize> {
        struct Frame {
            quest: Quest,
            missing: Vec<QuestId>,
        }

        let Some(missing) = map.requested_quests(id) else {
            return Ok(0);
        };
        let mut missing: Vec<QuestId> = missing.into_iter().rev().collect();
        let mut stack: Vec<Frame> = Vec::new();
        let mut expanding: Vec<QuestId> = vec![id];
        let mut added = 0;

        loop {
            let next = match stack.last_mut() {
                Some(frame) => frame.missing.pop(),
                None => missing.pop(),
            };
            let Some(next) = next else {
                // Everything this quest requires is present now.
                let Some(frame) = stack.pop() else {
                    break;
                };
                expanding.pop();
                tracing::debug!(quest = %frame.quest.id, "inserted");
                map.insert(frame.quest);
                added += 1;
                continue;
            };
            if map.contains(next) {
                continue;
            }
            if let Some(at) = expanding.iter().position(|&e| e == next) {
                let mut cycle = expanding[at..].to_vec();
                cycle.push(next);
                return Err(Error::cycle(cycle)
                    .with_context(ErrorContext::new().with_quest(id).with_frame("backward completion")));
            }
            if stack.len() >= self.limits.max_depth {
                return Err(Error::limit_exceeded(SemanticLimit::MaxDepth {
                    limit: self.limits.max_depth,
                    context: Some("backward completion".to_string()),
                }));
            }
            let quest = self.fetch(next)?;
            let missing = quest
                .requested_quests()
                .into_iter()
                .rev()
                .filter(|r| !map.contains(*r))
                .collect();
            expanding.push(next);
            stack.push(Frame { quest, missing });
        }
        Ok(added)
    }

    /// Fetches quests that require `id` and are not in the map yet.
    fn forward(&mut self, map: &mut QuestMap, id: QuestId) -> Result<usize> {
        let mut added = 0;
        for follower in self.source.forward_references(id)? {
            if map.contains(follower) {
                continue;
            }
            let quest = self.fetch(follower)?;
            tracing::debug!(quest = %follower, requires = %id, "inserted follower");
            map.insert(quest);
            added += 1;
        }
        Ok(added)
    }

    fn fetch(&mut self, id: QuestId) -> Result<Quest> {
        if self.fetches >= self.limits.max_fetches {
            return Err(Error::limit_exceeded(SemanticLimit::MaxFetches {
                limit: self.limits.max_fetches,
                quest: Some(id),
            }));
        }
        self.fetches += 1;
        tracing::debug!(quest = %id, "fetch");
        let record = self.source.fetch_quest(id)?;
        let quest = Quest::from_record(record)?;
        if quest.id != id {
            return Err(Error::structural(format!(
                "source returned quest {} when asked for {id}",
                quest.id
            )));
        }
        Ok(quest)
    }
}
