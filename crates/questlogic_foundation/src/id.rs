//! Quest identifiers.

use std::fmt;

/// Identifier of a node in the quest graph.
///
/// Ids coming from game content and ids minted by the engine live in
/// separate variants, so a synthetic node can never shadow a real quest no
/// matter how large real ids grow.
///
/// Ordering is `Real < Achievement < Synthetic`, then by number.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QuestId {
    /// A quest supplied by game content.
    Real(u32),
    /// An achievement represented as a pseudo quest.
    Achievement(u32),
    /// A node created by the engine (bridge quests).
    Synthetic(u32),
}

impl QuestId {
    /// Creates a real quest id.
    #[must_use]
    pub const fn real(id: u32) -> Self {
        Self::Real(id)
    }

    /// Returns true if this id was supplied by game content.
    #[must_use]
    pub const fn is_real(self) -> bool {
        matches!(self, Self::Real(_))
    }

    /// Returns true if the engine minted this id.
    #[must_use]
    pub const fn is_synthetic(self) -> bool {
        matches!(self, Self::Synthetic(_))
    }

    /// Returns the numeric part of the id, whatever its namespace.
    #[must_use]
    pub const fn number(self) -> u32 {
        match self {
            Self::Real(n) | Self::Achievement(n) | Self::Synthetic(n) => n,
        }
    }

    /// Parses the textual form produced by `Display`.
    ///
    /// Accepts `42`, `a42` and `s42`.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(rest) = text.strip_prefix('a') {
            rest.parse().ok().map(Self::Achievement)
        } else if let Some(rest) = text.strip_prefix('s') {
            rest.parse().ok().map(Self::Synthetic)
        } else {
            text.parse().ok().map(Self::Real)
        }
    }
}

impl From<u32> for QuestId {
    fn from(id: u32) -> Self {
        Self::Real(id)
    }
}

impl fmt::Debug for QuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real(n) => write!(f, "QuestId({n})"),
            Self::Achievement(n) => write!(f, "QuestId(achievement {n})"),
            Self::Synthetic(n) => write!(f, "QuestId(synthetic {n})"),
        }
    }
}

impl fmt::Display for QuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real(n) => write!(f, "{n}"),
            Self::Achievement(n) => write!(f, "a{n}"),
            Self::Synthetic(n) => write!(f, "s{n}"),
        }
    }
}
