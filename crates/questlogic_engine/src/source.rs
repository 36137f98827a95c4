//! The lookups the engine needs from its environment.
//!
//! Where quests come from (a web API, a local database, a test fixture) is
//! not the engine's business. It only needs a [`QuestSource`].

use std::collections::{BTreeMap, BTreeSet};

use questlogic_foundation::{Error, FetchErrorKind, QuestId, Result};
use questlogic_language::parse;

use crate::quest::{RawAchievementRecord, RawQuestRecord};

/// Fetch operations used by completion.
///
/// Methods take `&mut self` so implementations may cache, count, or page.
pub trait QuestSource {
    /// Returns the record of a quest.
    ///
    /// # Errors
    /// Returns a fetch error of kind `NotFound` if the id does not exist.
    fn fetch_quest(&mut self, id: QuestId) -> Result<RawQuestRecord>;

    /// Returns the ids of quests whose start condition requires `id`.
    ///
    /// # Errors
    /// Returns a fetch error if the source cannot be queried.
    fn forward_references(&mut self, id: QuestId) -> Result<BTreeSet<QuestId>>;

    /// Returns the record of an achievement.
    ///
    /// # Errors
    /// The default implementation reports the request as unsupported.
    fn fetch_achievement(&mut self, id: u32) -> Result<RawAchievementRecord> {
        Err(Error::fetch(
            QuestId::Achievement(id),
            FetchErrorKind::Unsupported("achievement lookup".to_string()),
        ))
    }
}

impl<S: QuestSource + ?Sized> QuestSource for &mut S {
    fn fetch_quest(&mut self, id: QuestId) -> Result<RawQuestRecord> {
        (**self).fetch_quest(id)
    }

    fn forward_references(&mut self, id: QuestId) -> Result<BTreeSet<QuestId>> {
        (**self).forward_references(id)
    }

    fn fetch_achievement(&mut self, id: u32) -> Result<RawAchievementRecord> {
        (**self).fetch_achievement(id)
    }
}

/// A source backed by records held in memory.
///
/// Forward references are answered from an index built as records are
/// inserted, so a lookup never rescans every condition.
#[derive(Clone, Debug, Default)]
pub struct InMemorySource {
    quests: BTreeMap<u32, RawQuestRecord>,
    achievements: BTreeMap<u32, RawAchievementRecord>,
    forward: BTreeMap<QuestId, BTreeSet<QuestId>>,
    fetches: usize,
}

impl InMemorySource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a quest record.
    #[must_use]
    pub fn with_quest(mut self, record: RawQuestRecord) -> Self {
        self.insert_quest(record);
        self
    }

    /// Adds an achievement record.
    #[must_use]
    pub fn with_achievement(mut self, record: RawAchievementRecord) -> Self {
        self.insert_achievement(record);
        self
    }

    /// Adds or replaces a quest record.
    pub fn insert_quest(&mut self, record: RawQuestRecord) {
        let id = QuestId::Real(record.id);
        for targets in self.forward.values_mut() {
            targets.remove(&id);
        }
        match parse(&record.start_condition) {
            Ok(parsed) => {
                for required in parsed.referenced_quest_ids() {
                    self.forward.entry(required).or_default().insert(id);
                }
            }
            Err(error) => {
                tracing::warn!(quest = %id, %error, "start condition not indexed");
            }
        }
        self.quests.insert(record.id, record);
    }

    /// Adds or replaces an achievement record.
    pub fn insert_achievement(&mut self, record: RawAchievementRecord) {
        self.achievements.insert(record.id, record);
    }

    /// Number of quest records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.quests.len()
    }

    /// Returns true if no quest records are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }

    /// Number of successful and failed `fetch_quest` calls so far.
    #[must_use]
    pub const fn fetch_count(&self) -> usize {
        self.fetches
    }

    /// Iterates over the quest records in id order.
    pub fn quests(&self) -> impl Iterator<Item = &RawQuestRecord> {
        self.quests.values()
    }

    /// Iterates over the achievement records in id order.
    pub fn achievements(&self) -> impl Iterator<Item = &RawAchievementRecord> {
        self.achievements.values()
    }
}

impl QuestSource for InMemorySource {
    fn fetch_quest(&mut self, id: QuestId) -> Result<RawQuestRecord> {
        self.fetches += 1;
        match id {
            QuestId::Real(n) => self.quests.get(&n).cloned().ok_or_else(|| Error::not_found(id)),
            _ => Err(Error::not_found(id)),
        }
    }

    fn forward_references(&mut self, id: QuestId) -> Result<BTreeSet<QuestId>> {
        Ok(self.forward.get(&id).cloned().unwrap_or_default())
    }

    fn fetch_achievement(&mut self, id: u32) -> Result<RawAchievementRecord> {
        self.achievements
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found(QuestId::Achievement(id)))
    }
}

impl FromIterator<RawQuestRecord> for InMemorySource {
    fn from_iter<I: IntoIterator<Item = RawQuestRecord>>(iter: I) -> Self {
        let mut source = Self::new();
        for record in iter {
            source.insert_quest(record);
        }
        source
    }
}
