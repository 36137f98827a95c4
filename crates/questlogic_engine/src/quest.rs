//! Quests and the raw records they are built from.

use std::collections::BTreeSet;
use std::fmt;

use questlogic_foundation::{ErrorContext, QuestId, Result};
use questlogic_language::{Diagnostic, LogicalGroup, parse};

// =============================================================================
// Raw Records
// =============================================================================

/// A quest as an external source delivers it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawQuestRecord {
    /// Game quest id.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Start condition in the mini-language; empty means "always available".
    #[cfg_attr(feature = "serde", serde(default))]
    pub start_condition: String,
    /// Steps of the quest.
    #[cfg_attr(feature = "serde", serde(default))]
    pub objectives: Vec<Objective>,
}

impl RawQuestRecord {
    /// Creates a record without objectives.
    #[must_use]
    pub fn new(id: u32, name: impl Into<String>, start_condition: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            start_condition: start_condition.into(),
            objectives: Vec::new(),
        }
    }
}

/// An achievement: a named set of quests to finish.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawAchievementRecord {
    /// Game achievement id.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Quests named by the achievement's objectives.
    #[cfg_attr(feature = "serde", serde(default))]
    pub quests: Vec<u32>,
}

/// One step of a quest.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Objective {
    /// Objective id.
    pub id: u32,
    /// Objective type (talk, kill, bring, ...).
    pub type_id: u32,
    /// Type-specific parameters.
    #[cfg_attr(feature = "serde", serde(default))]
    pub parameters: Vec<i64>,
    /// Sub-area where the objective takes place, when known.
    #[cfg_attr(feature = "serde", serde(default))]
    pub sub_area: Option<u32>,
    /// Objective text.
    #[cfg_attr(feature = "serde", serde(default))]
    pub text: String,
}

// =============================================================================
// Quest Kind
// =============================================================================

/// Where a quest in the map came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QuestKind {
    /// An ordinary game quest.
    #[default]
    Standard,
    /// An achievement standing in as a quest.
    Achievement,
    /// A bridge created by contraction for an undetected class cluster.
    Artificial {
        /// The class-dependent quest the bridge was created for.
        target: QuestId,
    },
    /// A representative that replaced a class cluster.
    Substitute,
}

impl QuestKind {
    /// The short tag used in exports and display names.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Standard => "",
            Self::Achievement => "Achievement",
            Self::Artificial { .. } => "artificial",
            Self::Substitute => "substitute",
        }
    }
}

impl fmt::Display for QuestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// =============================================================================
// Quest
// =============================================================================

/// A quest with its parsed start condition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quest {
    /// Unique id within a map.
    pub id: QuestId,
    /// Display name.
    pub name: String,
    /// Start condition.
    pub condition: LogicalGroup,
    /// Origin of this quest.
    pub kind: QuestKind,
    /// Steps of the quest.
    pub objectives: Vec<Objective>,
    /// Tokens skipped while parsing the start condition.
    pub diagnostics: Vec<Diagnostic>,
}

impl Quest {
    /// Creates a standard quest.
    #[must_use]
    pub fn new(id: QuestId, name: impl Into<String>, condition: LogicalGroup) -> Self {
        Self {
            id,
            name: name.into(),
            condition,
            kind: QuestKind::Standard,
            objectives: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Sets the kind.
    #[must_use]
    pub fn with_kind(mut self, kind: QuestKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the objectives.
    #[must_use]
    pub fn with_objectives(mut self, objectives: Vec<Objective>) -> Self {
        self.objectives = objectives;
        self
    }

    /// Builds a quest from a raw record, parsing its start condition.
    ///
    /// Skipped tokens are kept on the quest and logged.
    ///
    /// # Errors
    /// Returns a parse error if the condition is ambiguous or nested too
    /// deeply; the error carries the quest id as context.
    pub fn from_record(record: RawQuestRecord) -> Result<Self> {
        let id = QuestId::Real(record.id);
        let parsed = parse(&record.start_condition).map_err(|e| {
            e.with_context(
                ErrorContext::new()
                    .with_source(record.name.clone())
                    .with_quest(id),
            )
        })?;
        for diagnostic in &parsed.diagnostics {
            tracing::warn!(quest = %id, %diagnostic, "skipped token in start condition");
        }
        Ok(Self {
            id,
            name: record.name,
            condition: parsed.group,
            kind: QuestKind::Standard,
            objectives: record.objectives,
            diagnostics: parsed.diagnostics,
        })
    }

    /// Builds the pseudo quest of an achievement: an AND over its quests.
    #[must_use]
    pub fn from_achievement(record: RawAchievementRecord) -> Self {
        let ids: BTreeSet<QuestId> = record.quests.into_iter().map(QuestId::Real).collect();
        Self::new(
            QuestId::Achievement(record.id),
            record.name,
            LogicalGroup::all_of(ids),
        )
        .with_kind(QuestKind::Achievement)
    }

    /// Quests this one requires: every non-negated quest reference.
    #[must_use]
    pub fn requested_quests(&self) -> BTreeSet<QuestId> {
        self.condition.referenced_quest_ids()
    }

    /// Sub-areas where this quest's objectives take place.
    #[must_use]
    pub fn sub_areas(&self) -> BTreeSet<u32> {
        self.objectives.iter().filter_map(|o| o.sub_area).collect()
    }

    /// Name prefixed with the kind tag, e.g. `substitute: Dungeon`.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.kind {
            QuestKind::Standard => self.name.clone(),
            kind => format!("{kind}: {}", self.name),
        }
    }
}
