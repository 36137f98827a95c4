//! Leaf predicates of a start condition.

use std::fmt;

use questlogic_foundation::QuestId;

/// The kind of predicate a criterion tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CriterionKind {
    /// `Qf`: a quest must have been completed.
    RequiredQuest,
    /// `PG`: the character belongs to a class (breed).
    Class,
    /// `Pm`: the character stands on a map.
    Position,
    /// `PL`: minimum character level.
    LevelMin,
    /// `Pa`: minimum alignment level.
    AlignLevelMin,
    /// `Ps`: alignment side.
    Align,
}

impl CriterionKind {
    /// All kinds, in code order.
    pub const ALL: [Self; 6] = [
        Self::RequiredQuest,
        Self::Class,
        Self::Position,
        Self::LevelMin,
        Self::AlignLevelMin,
        Self::Align,
    ];

    /// Looks up a kind by its two-letter code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "Qf" => Some(Self::RequiredQuest),
            "PG" => Some(Self::Class),
            "Pm" => Some(Self::Position),
            "PL" => Some(Self::LevelMin),
            "Pa" => Some(Self::AlignLevelMin),
            "Ps" => Some(Self::Align),
            _ => None,
        }
    }

    /// Returns the two-letter code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::RequiredQuest => "Qf",
            Self::Class => "PG",
            Self::Position => "Pm",
            Self::LevelMin => "PL",
            Self::AlignLevelMin => "Pa",
            Self::Align => "Ps",
        }
    }

    /// Returns a human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::RequiredQuest => "Quest",
            Self::Class => "Class",
            Self::Position => "Position",
            Self::LevelMin => "Level min",
            Self::AlignLevelMin => "Minimum alignment level",
            Self::Align => "Alignment",
        }
    }

    /// Minimum kinds compare with `>` rather than `=`.
    #[must_use]
    pub const fn is_threshold(self) -> bool {
        matches!(self, Self::LevelMin | Self::AlignLevelMin)
    }
}

/// The operand of a criterion.
///
/// Required-quest criteria carry a [`QuestId`] so that engine-made nodes can
/// be referenced without squeezing them into the game's numeric range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CriterionValue {
    /// A plain number (class id, map id, level, ...).
    Number(i64),
    /// A quest reference.
    Quest(QuestId),
}

/// A single typed predicate gating quest start.
///
/// Equality and hashing cover kind, value and negation, so criteria can be
/// used as set elements. Criteria are immutable once built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Criterion {
    kind: CriterionKind,
    value: Option<CriterionValue>,
    negated: bool,
}

impl Criterion {
    /// Creates a criterion from a kind and a raw number.
    ///
    /// Numbers for [`CriterionKind::RequiredQuest`] become real quest ids;
    /// returns `None` when such a number is out of range.
    #[must_use]
    pub fn new(kind: CriterionKind, value: Option<i64>, negated: bool) -> Option<Self> {
        let value = match (kind, value) {
            (_, None) => None,
            (CriterionKind::RequiredQuest, Some(n)) => {
                Some(CriterionValue::Quest(QuestId::Real(u32::try_from(n).ok()?)))
            }
            (_, Some(n)) => Some(CriterionValue::Number(n)),
        };
        Some(Self {
            kind,
            value,
            negated,
        })
    }

    /// Creates a non-negated required-quest criterion.
    #[must_use]
    pub const fn required_quest(id: QuestId) -> Self {
        Self {
            kind: CriterionKind::RequiredQuest,
            value: Some(CriterionValue::Quest(id)),
            negated: false,
        }
    }

    /// Creates a negated required-quest criterion.
    #[must_use]
    pub const fn forbidden_quest(id: QuestId) -> Self {
        Self {
            kind: CriterionKind::RequiredQuest,
            value: Some(CriterionValue::Quest(id)),
            negated: true,
        }
    }

    /// Creates a class criterion.
    #[must_use]
    pub const fn class(class_id: i64) -> Self {
        Self {
            kind: CriterionKind::Class,
            value: Some(CriterionValue::Number(class_id)),
            negated: false,
        }
    }

    /// Returns the kind of this criterion.
    #[must_use]
    pub const fn kind(&self) -> CriterionKind {
        self.kind
    }

    /// Returns the operand, if any.
    #[must_use]
    pub const fn value(&self) -> Option<CriterionValue> {
        self.value
    }

    /// Returns true if the predicate is negated (`!`).
    #[must_use]
    pub const fn is_negated(&self) -> bool {
        self.negated
    }

    /// Returns the referenced quest for required-quest criteria.
    #[must_use]
    pub const fn quest_id(&self) -> Option<QuestId> {
        match self.value {
            Some(CriterionValue::Quest(id)) => Some(id),
            _ => None,
        }
    }

    /// Returns the numeric operand for non-quest criteria.
    #[must_use]
    pub const fn number(&self) -> Option<i64> {
        match self.value {
            Some(CriterionValue::Number(n)) => Some(n),
            _ => None,
        }
    }

    /// Returns the quest this criterion makes a hard prerequisite.
    ///
    /// Only non-negated required-quest criteria with a value count.
    #[must_use]
    pub const fn prerequisite(&self) -> Option<QuestId> {
        if self.negated {
            return None;
        }
        match (self.kind, self.value) {
            (CriterionKind::RequiredQuest, Some(CriterionValue::Quest(id))) => Some(id),
            _ => None,
        }
    }

    /// Returns true if this criterion gates on a concrete class.
    #[must_use]
    pub const fn is_class_gate(&self) -> bool {
        matches!(self.kind, CriterionKind::Class) && self.value.is_some()
    }

    /// Returns a copy pointing at another quest.
    #[must_use]
    pub const fn retargeted(self, id: QuestId) -> Self {
        Self {
            value: Some(CriterionValue::Quest(id)),
            ..self
        }
    }

    /// Human-readable description of this criterion.
    #[must_use]
    pub fn describe(&self) -> String {
        let value = match self.value {
            Some(CriterionValue::Number(n)) => n.to_string(),
            Some(CriterionValue::Quest(id)) => id.to_string(),
            None => "?".to_string(),
        };
        let not = if self.negated { "!" } else { "" };
        match self.kind {
            CriterionKind::RequiredQuest => format!("{not}{value}"),
            CriterionKind::LevelMin => format!("Level > {value}"),
            CriterionKind::AlignLevelMin => format!("Alignment level > {value}"),
            kind => format!("{} {not}= {value}", kind.label()),
        }
    }
}

/// Prints the canonical mini-language form.
///
/// A criterion does not remember which symbol it was written with, only
/// whether it was negated, so the symbol is chosen by kind: `>` for the
/// minimum kinds and `=` otherwise. `Pm>3` therefore prints as `Pm=3`, which
/// parses back to the same criterion. Quest references print their id as
/// displayed; only real ids (`Qf=12`) can be read back by the lexer, while
/// achievement and synthetic ids (`Qf=a9`, `Qf=s1`) cannot. The engine never
/// leaves a reference to either in a finished map.
impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = if self.negated {
            '!'
        } else if self.kind.is_threshold() {
            '>'
        } else {
            '='
        };
        write!(f, "{}{symbol}", self.kind.code())?;
        match self.value {
            Some(CriterionValue::Number(n)) => write!(f, "{n}"),
            Some(CriterionValue::Quest(id)) => write!(f, "{id}"),
            None => Ok(()),
        }
    }
}
