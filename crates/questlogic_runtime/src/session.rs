//! Session state for the REPL and the CLI.
//!
//! A session owns the record store it fetches from, the quest map being
//! built, and the configuration the stages run with. Quests settled by
//! `:complete` stay settled until the map or the store is replaced.

use std::collections::BTreeSet;
use std::path::Path;

use questlogic_engine::{
    ClusterContractor, CompletionController, CompletionReport, ContractionReport, Pipeline,
    PipelineConfig, PipelineReport, Quest, QuestMap, ReductionReport, TransitiveReducer,
    seed_from_achievement, seed_from_ids,
};
use questlogic_foundation::{QuestId, Result};

use crate::serialize;
use crate::store::RecordStore;

/// Records, the current map, and stage configuration.
#[derive(Debug, Default)]
pub struct Session {
    store: RecordStore,
    map: QuestMap,
    config: PipelineConfig,
    contractor: ClusterContractor,
    /// Quests completion has fully examined; always a subset of the map.
    settled: BTreeSet<QuestId>,
}

impl Session {
    /// Creates a session with no records and an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `store` as the record source.
    #[must_use]
    pub fn with_store(mut self, store: RecordStore) -> Self {
        self.store = store;
        self.settled.clear();
        self
    }

    /// Uses `config` for every stage.
    #[must_use]
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// The record store.
    #[must_use]
    pub const fn store(&self) -> &RecordStore {
        &self.store
    }

    /// The current map.
    #[must_use]
    pub const fn map(&self) -> &QuestMap {
        &self.map
    }

    /// Replaces the current map.
    pub fn set_map(&mut self, map: QuestMap) {
        self.map = map;
        self.settled.clear();
    }

    /// The stage configuration.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Mutable access to the stage configuration.
    ///
    /// Forgets settled quests, since the completion mode may change.
    pub fn config_mut(&mut self) -> &mut PipelineConfig {
        self.settled.clear();
        &mut self.config
    }

    /// Quests `:complete` will not examine again.
    #[must_use]
    pub const fn settled(&self) -> &BTreeSet<QuestId> {
        &self.settled
    }

    /// Looks up a quest in the current map.
    #[must_use]
    pub fn quest(&self, id: QuestId) -> Option<&Quest> {
        self.map.get(id)
    }

    /// Replaces the record store with the contents of a JSON file.
    ///
    /// # Errors
    /// Returns an I/O or serialization error.
    pub fn load_records<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        self.store = RecordStore::load(path)?;
        self.settled.clear();
        Ok(self.store.len())
    }

    /// Adds quests (or achievements, as `a<id>`) to the map.
    ///
    /// Returns the number of quests added.
    ///
    /// # Errors
    /// Returns the first fetch or parse error; quests seeded before it stay.
    pub fn seed(&mut self, ids: &[QuestId]) -> Result<usize> {
        let before = self.map.len();
        for &id in ids {
            if self.map.contains(id) {
                continue;
            }
            let seeded = match id {
                QuestId::Achievement(n) => seed_from_achievement(&mut self.store, n)?,
                _ => seed_from_ids(&mut self.store, [id])?,
            };
            for quest in seeded {
                if !self.map.contains(quest.id) {
                    self.map.insert(quest);
                }
            }
        }
        let added = self.map.len() - before;
        tracing::debug!(added, size = self.map.len(), "seeded");
        Ok(added)
    }

    /// Replaces the map with everything required to start `id`.
    ///
    /// # Errors
    /// Returns fetch, limit, cycle or structural errors; the map is left
    /// unchanged on error.
    pub fn required(&mut self, id: QuestId) -> Result<PipelineReport> {
        let (map, report) = Pipeline::new(&mut self.store)
            .with_config(self.config)
            .path_to(id)?;
        self.set_map(map);
        Ok(report)
    }

    /// Completes the map against the record store.
    ///
    /// Only quests added since the last call are examined.
    ///
    /// # Errors
    /// Returns fetch, limit or cycle errors. Quests settled before the
    /// failure stay settled.
    pub fn complete(&mut self) -> Result<CompletionReport> {
        let mut controller = CompletionController::new(&mut self.store)
            .with_limits(self.config.limits)
            .with_mode(self.config.mode)
            .with_settled(std::mem::take(&mut self.settled));
        let result = controller.complete(&mut self.map);
        self.settled = controller.into_settled();
        result
    }

    /// Removes inferable edges from the map.
    ///
    /// # Errors
    /// Returns a cycle or structural error.
    pub fn reduce(&mut self) -> Result<ReductionReport> {
        TransitiveReducer::new().reduce(&mut self.map)
    }

    /// Contracts class clusters in the map.
    ///
    /// # Errors
    /// Returns a structural error.
    pub fn contract(&mut self) -> Result<ContractionReport> {
        let result = self.contractor.contract(&mut self.map);
        self.forget_missing();
        result
    }

    /// Runs every configured stage on the map.
    ///
    /// # Errors
    /// Returns the first stage error.
    pub fn run(&mut self) -> Result<PipelineReport> {
        let result = Pipeline::new(&mut self.store)
            .with_config(self.config)
            .run_in_place(&mut self.map);
        self.forget_missing();
        result
    }

    /// Saves the map as `MessagePack`.
    ///
    /// # Errors
    /// Returns a serialization or I/O error.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        serialize::save_to_file(&self.map, path)
    }

    /// Replaces the map with one saved earlier.
    ///
    /// # Errors
    /// Returns a serialization or I/O error.
    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        self.set_map(serialize::load_from_file(path)?);
        Ok(self.map.len())
    }

    /// Writes the JSON export of the map.
    ///
    /// # Errors
    /// Returns a serialization or I/O error.
    pub fn export<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        serialize::export_to_file(&self.map, path)
    }

    /// Empties the map.
    pub fn clear(&mut self) {
        self.set_map(QuestMap::new());
    }

    /// Drops settled ids that contraction deleted, so a quest seeded again
    /// later is examined afresh.
    fn forget_missing(&mut self) {
        let map = &self.map;
        self.settled.retain(|&id| map.contains(id));
    }
}
