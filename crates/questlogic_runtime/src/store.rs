//! A local database of raw records kept in a JSON file.
//!
//! ```json
//! {
//!   "quests": [
//!     { "id": 1, "name": "Arrival", "start_condition": "" },
//!     { "id": 2, "name": "Errand", "start_condition": "Qf=1&PL>10" }
//!   ],
//!   "achievements": [
//!     { "id": 9, "name": "Storyteller", "quests": [1, 2] }
//!   ]
//! }
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use questlogic_engine::{InMemorySource, QuestSource, RawAchievementRecord, RawQuestRecord};
use questlogic_foundation::{Error, ErrorKind, QuestId, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
struct RecordFile {
    #[serde(default)]
    quests: Vec<RawQuestRecord>,
    #[serde(default)]
    achievements: Vec<RawAchievementRecord>,
}

/// Raw records backed by a JSON file, usable as a [`QuestSource`].
#[derive(Clone, Debug, Default)]
pub struct RecordStore {
    source: InMemorySource,
    path: Option<PathBuf>,
}

impl RecordStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a store from JSON text.
    ///
    /// # Errors
    /// Returns a serialization error if the text is not a record file.
    pub fn from_json(text: &str) -> Result<Self> {
        let file: RecordFile = serde_json::from_str(text)
            .map_err(|e| Error::new(ErrorKind::SerializationError(e.to_string())))?;
        let mut source: InMemorySource = file.quests.into_iter().collect();
        for achievement in file.achievements {
            source.insert_achievement(achievement);
        }
        Ok(Self { source, path: None })
    }

    /// Loads a record file.
    ///
    /// # Errors
    /// Returns an I/O error if the file cannot be read, or a serialization
    /// error if it is not a record file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            Error::new(ErrorKind::IoError(format!(
                "failed to read records '{}': {e}",
                path.display()
            )))
        })?;
        let mut store = Self::from_json(&text)?;
        store.path = Some(path.to_path_buf());
        tracing::info!(
            path = %path.display(),
            quests = store.source.len(),
            achievements = store.source.achievements().count(),
            "loaded records"
        );
        Ok(store)
    }

    /// Serializes every record to pretty JSON.
    ///
    /// # Errors
    /// Returns a serialization error if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        let file = RecordFile {
            quests: self.source.quests().cloned().collect(),
            achievements: self.source.achievements().cloned().collect(),
        };
        serde_json::to_string_pretty(&file)
            .map_err(|e| Error::new(ErrorKind::SerializationError(e.to_string())))
    }

    /// Writes every record to `path`.
    ///
    /// # Errors
    /// Returns a serialization or I/O error.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let text = self.to_json()?;
        fs::write(path, text).map_err(|e| {
            Error::new(ErrorKind::IoError(format!(
                "failed to write records '{}': {e}",
                path.display()
            )))
        })
    }

    /// The file this store was loaded from.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Adds or replaces a quest record.
    pub fn insert_quest(&mut self, record: RawQuestRecord) {
        self.source.insert_quest(record);
    }

    /// Adds or replaces an achievement record.
    pub fn insert_achievement(&mut self, record: RawAchievementRecord) {
        self.source.insert_achievement(record);
    }

    /// Number of quest records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.source.len()
    }

    /// Returns true if the store holds no quest records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// The records as an in-memory source.
    #[must_use]
    pub const fn source(&self) -> &InMemorySource {
        &self.source
    }
}

impl QuestSource for RecordStore {
    fn fetch_quest(&mut self, id: QuestId) -> Result<RawQuestRecord> {
        self.source.fetch_quest(id)
    }

    fn forward_references(&mut self, id: QuestId) -> Result<BTreeSet<QuestId>> {
        self.source.forward_references(id)
    }

    fn fetch_achievement(&mut self, id: u32) -> Result<RawAchievementRecord> {
        self.source.fetch_achievement(id)
    }
}
