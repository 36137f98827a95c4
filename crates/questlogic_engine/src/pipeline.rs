//! The stages in the order they are meant to run.
//!
//! Completion closes the seed map, reduction removes inferable edges, and
//! contraction merges class variants. Reduction runs first so contraction
//! never merges through an edge that was going away anyway.

use questlogic_foundation::{ErrorContext, QuestId, Result};

use crate::completion::{CompletionController, CompletionLimits, CompletionMode, CompletionReport};
use crate::contract::{ClusterContractor, ContractionReport};
use crate::map::QuestMap;
use crate::quest::Quest;
use crate::reduce::{ReductionReport, TransitiveReducer};
use crate::source::QuestSource;

// =============================================================================
// Configuration
// =============================================================================

/// Which stages run and with which budgets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PipelineConfig {
    /// Completion mode.
    pub mode: CompletionMode,
    /// Completion budgets.
    pub limits: CompletionLimits,
    /// Run transitive reduction.
    pub reduce: bool,
    /// Run cluster contraction.
    pub contract: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            mode: CompletionMode::Full,
            limits: CompletionLimits::default(),
            reduce: true,
            contract: true,
        }
    }
}

impl PipelineConfig {
    /// Sets the completion mode.
    #[must_use]
    pub fn with_mode(mut self, mode: CompletionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the completion budgets.
    #[must_use]
    pub fn with_limits(mut self, limits: CompletionLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Enables or disables reduction.
    #[must_use]
    pub fn with_reduce(mut self, reduce: bool) -> Self {
        self.reduce = reduce;
        self
    }

    /// Enables or disables contraction.
    #[must_use]
    pub fn with_contract(mut self, contract: bool) -> Self {
        self.contract = contract;
        self
    }
}

/// Reports of every stage that ran.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Completion report.
    pub completion: CompletionReport,
    /// Reduction report, if reduction ran.
    pub reduction: Option<ReductionReport>,
    /// Contraction report, if contraction ran.
    pub contraction: Option<ContractionReport>,
}

// =============================================================================
// Pipeline
// =============================================================================

/// Runs completion, reduction and contraction against one source.
pub struct Pipeline<S> {
    source: S,
    config: PipelineConfig,
    contractor: ClusterContractor,
}

impl<S: QuestSource> Pipeline<S> {
    /// Creates a pipeline with the default configuration.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            config: PipelineConfig::default(),
            contractor: ClusterContractor::new(),
        }
    }

    /// Sets the configuration.
    #[must_use]
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Mutable access to the source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Gives the source back.
    pub fn into_source(self) -> S {
        self.source
    }

    /// Runs every enabled stage on `seed`.
    ///
    /// # Errors
    /// Returns the first stage error. The map is consumed either way.
    pub fn run(&mut self, seed: QuestMap) -> Result<(QuestMap, PipelineReport)> {
        let mut map = seed;
        let report = self.run_in_place(&mut map)?;
        Ok((map, report))
    }

    /// Runs every enabled stage on `map` in place.
    ///
    /// # Errors
    /// Returns the first stage error, leaving `map` as that stage left it.
    pub fn run_in_place(&mut self, map: &mut QuestMap) -> Result<PipelineReport> {
        let seeds = map.len();
        let completion = CompletionController::new(&mut self.source)
            .with_limits(self.config.limits)
            .with_mode(self.config.mode)
            .complete(map)?;
        let reduction = if self.config.reduce {
            Some(TransitiveReducer::new().reduce(map)?)
        } else {
            None
        };
        let contraction = if self.config.contract {
            Some(self.contractor.contract(map)?)
        } else {
            None
        };
        tracing::info!(seeds, size = map.len(), "pipeline finished");
        Ok(PipelineReport {
            completion,
            reduction,
            contraction,
        })
    }

    /// Everything required to start `id`, without inferable edges.
    ///
    /// Seeds the map with `id` alone, runs only the backward closure, then
    /// reduces. Contraction is skipped: the result is a path, not an
    /// overview.
    ///
    /// # Errors
    /// Returns fetch, limit, cycle or structural errors.
    pub fn path_to(&mut self, id: QuestId) -> Result<(QuestMap, PipelineReport)> {
        let mut map = match id {
            QuestId::Achievement(n) => seed_from_achievement(&mut self.source, n)?,
            _ => seed_from_ids(&mut self.source, [id])?,
        };
        let completion = CompletionController::new(&mut self.source)
            .with_limits(self.config.limits)
            .with_mode(CompletionMode::BackwardOnly)
            .complete(&mut map)?;
        let reduction = TransitiveReducer::new().reduce(&mut map)?;
        tracing::info!(quest = %id, size = map.len(), "path computed");
        Ok((
            map,
            PipelineReport {
                completion,
                reduction: Some(reduction),
                contraction: None,
            },
        ))
    }
}

// =============================================================================
// Seeding
// =============================================================================

fn seed_quest<S: QuestSource + ?Sized>(source: &mut S, id: QuestId) -> Result<Quest> {
    let record = source.fetch_quest(id)?;
    Quest::from_record(record)
}

/// Fetches `ids` into a new map.
///
/// # Errors
/// Returns the first fetch or parse error.
pub fn seed_from_ids<S: QuestSource + ?Sized>(
    source: &mut S,
    ids: impl IntoIterator<Item = QuestId>,
) -> Result<QuestMap> {
    let mut map = QuestMap::new();
    for id in ids {
        if !map.contains(id) {
            map.insert(seed_quest(source, id)?);
        }
    }
    Ok(map)
}

/// Builds a seed map from an achievement and the quests it lists.
///
/// # Errors
/// Returns the achievement lookup error, or the first quest fetch error.
pub fn seed_from_achievement<S: QuestSource + ?Sized>(source: &mut S, id: u32) -> Result<QuestMap> {
    let record = source.fetch_achievement(id)?;
    let achievement = Quest::from_achievement(record);
    let requested = achievement.requested_quests();
    let mut map = seed_from_ids(source, requested).map_err(|e| {
        e.with_context(ErrorContext::new().with_quest(achievement.id).with_frame("achievement seed"))
    })?;
    tracing::debug!(achievement = %achievement.id, quests = map.len(), "seeded from achievement");
    map.insert(achievement);
    Ok(map)
}
