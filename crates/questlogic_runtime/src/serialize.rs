//! Quest map persistence.
//!
//! The map itself is saved as `MessagePack` with named fields, so files
//! survive field reordering. For downstream tools there is also a JSON
//! export carrying, per quest, the condition as mini-language text and the
//! derived `requested_quests` set.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use questlogic_engine::{Quest, QuestMap};
use questlogic_foundation::{Error, ErrorKind, Result};
use serde::{Deserialize, Serialize};

/// Serializes a map to bytes using `MessagePack` format.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_bytes(map: &QuestMap) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(map).map_err(|e| Error::new(ErrorKind::SerializationError(e.to_string())))
}

/// Deserializes a map from `MessagePack` bytes.
///
/// # Errors
///
/// Returns an error if deserialization fails.
pub fn from_bytes(bytes: &[u8]) -> Result<QuestMap> {
    rmp_serde::from_slice(bytes).map_err(|e| Error::new(ErrorKind::SerializationError(e.to_string())))
}

/// Saves a map to a file using `MessagePack` format.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to,
/// or if serialization fails.
pub fn save_to_file<P: AsRef<Path>>(map: &QuestMap, path: P) -> Result<()> {
    let bytes = to_bytes(map)?;
    write_file(path.as_ref(), &bytes)?;
    tracing::info!(path = %path.as_ref().display(), quests = map.len(), "saved map");
    Ok(())
}

/// Loads a map from a `MessagePack` file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or if deserialization fails.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<QuestMap> {
    let file = File::open(path.as_ref()).map_err(|e| {
        Error::new(ErrorKind::IoError(format!(
            "failed to open file '{}': {e}",
            path.as_ref().display()
        )))
    })?;

    let mut reader = BufReader::new(file);
    let mut bytes = Vec::new();

    reader.read_to_end(&mut bytes).map_err(|e| {
        Error::new(ErrorKind::IoError(format!(
            "failed to read file '{}': {e}",
            path.as_ref().display()
        )))
    })?;

    from_bytes(&bytes)
}

// =============================================================================
// JSON Export
// =============================================================================

/// One quest as downstream renderers and planners see it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedQuest {
    /// Id as displayed (`42`, `a42`, `s42`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Kind tag (empty for standard quests).
    pub kind: String,
    /// Start condition in the mini-language.
    pub condition: String,
    /// Ids of hard prerequisites, ascending.
    pub requested_quests: Vec<String>,
    /// Sub-areas of the quest's objectives.
    pub sub_areas: Vec<u32>,
}

impl From<&Quest> for ExportedQuest {
    fn from(quest: &Quest) -> Self {
        Self {
            id: quest.id.to_string(),
            name: quest.name.clone(),
            kind: quest.kind.tag().to_string(),
            condition: quest.condition.to_string(),
            requested_quests: quest.requested_quests().iter().map(ToString::to_string).collect(),
            sub_areas: quest.sub_areas().into_iter().collect(),
        }
    }
}

/// Builds the export records of a map, in id order.
#[must_use]
pub fn export(map: &QuestMap) -> Vec<ExportedQuest> {
    map.iter().map(ExportedQuest::from).collect()
}

/// Renders the export as pretty JSON.
///
/// # Errors
///
/// Returns an error if JSON encoding fails.
pub fn export_json(map: &QuestMap) -> Result<String> {
    serde_json::to_string_pretty(&export(map))
        .map_err(|e| Error::new(ErrorKind::SerializationError(e.to_string())))
}

/// Writes the JSON export to a file.
///
/// # Errors
///
/// Returns an error if encoding or writing fails.
pub fn export_to_file<P: AsRef<Path>>(map: &QuestMap, path: P) -> Result<()> {
    let text = export_json(map)?;
    write_file(path.as_ref(), text.as_bytes())?;
    tracing::info!(path = %path.as_ref().display(), quests = map.len(), "exported map");
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let file = File::create(path).map_err(|e| {
        Error::new(ErrorKind::IoError(format!(
            "failed to create file '{}': {e}",
            path.display()
        )))
    })?;

    let mut writer = BufWriter::new(file);
    writer.write_all(bytes).map_err(|e| {
        Error::new(ErrorKind::IoError(format!(
            "failed to write to file '{}': {e}",
            path.display()
        )))
    })?;

    writer.flush().map_err(|e| {
        Error::new(ErrorKind::IoError(format!(
            "failed to flush file '{}': {e}",
            path.display()
        )))
    })
}
