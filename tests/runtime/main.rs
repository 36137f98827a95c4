//! Integration tests for Layer 3: Runtime
//!
//! Tests for the record store, sessions, persistence, configuration, and the REPL.

mod config;
mod repl;
mod session;

use std::path::PathBuf;

/// A storyline record file, as a local database would hold it.
pub const RECORDS: &str = r#"{
  "quests": [
    { "id": 1, "name": "Arrival", "start_condition": "" },
    { "id": 2, "name": "Errand", "start_condition": "Qf=1" },
    { "id": 3, "name": "Report", "start_condition": "Qf=1&Qf=2" },
    { "id": 5, "name": "Reunion", "start_condition": "(Qf=10&PG=1)|(Qf=11&PG=2)" },
    { "id": 10, "name": "Trial of steel", "start_condition": "Qf=3" },
    { "id": 11, "name": "Trial of wits", "start_condition": "Qf=3" }
  ],
  "achievements": [
    { "id": 9, "name": "Reunited", "quests": [5] }
  ]
}"#;

/// A path under the system temp directory, unique to one test.
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("questlogic_it_{name}"))
}

/// Writes the storyline records to a temp file.
pub fn records_file(name: &str) -> PathBuf {
    let path = temp_path(name);
    std::fs::write(&path, RECORDS).unwrap();
    path
}
