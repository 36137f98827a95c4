//! Integration tests for sessions, the record store, and persistence

use std::collections::BTreeSet;

use questlogic_engine::{CompletionMode, QuestKind, QuestSource};
use questlogic_foundation::QuestId;
use questlogic_runtime::{RecordStore, Session, from_bytes, to_bytes};

use crate::{RECORDS, records_file, temp_path};

fn r(id: u32) -> QuestId {
    QuestId::Real(id)
}

// =============================================================================
// Record Store
// =============================================================================

#[test]
fn store_answers_fetches_and_forward_references() {
    let mut store = RecordStore::from_json(RECORDS).unwrap();
    assert_eq!(store.len(), 6);
    assert_eq!(store.fetch_quest(r(2)).unwrap().name, "Errand");
    assert_eq!(
        store.forward_references(r(3)).unwrap(),
        BTreeSet::from([r(10), r(11)])
    );
    assert_eq!(store.fetch_achievement(9).unwrap().quests, vec![5]);
    assert!(store.fetch_quest(r(4)).unwrap_err().is_not_found());
}

#[test]
fn store_round_trips_through_file() {
    let path = temp_path("store.json");
    let store = RecordStore::from_json(RECORDS).unwrap();
    store.save(&path).unwrap();

    let loaded = RecordStore::load(&path).unwrap();
    assert_eq!(loaded.len(), store.len());
    assert_eq!(loaded.path(), Some(path.as_path()));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn store_rejects_bad_json() {
    assert!(RecordStore::from_json("{ \"quests\": 7 }").is_err());
    assert!(RecordStore::load("/nonexistent/records.json").is_err());
}

// =============================================================================
// Session
// =============================================================================

#[test]
fn session_overview() {
    let path = records_file("overview.json");
    let mut session = Session::new();
    assert_eq!(session.load_records(&path).unwrap(), 6);

    session.seed(&[r(1)]).unwrap();
    let report = session.run().unwrap();

    assert_eq!(report.reduction.unwrap().removed, vec![(r(3), r(1))]);
    assert_eq!(
        session.map().ids(),
        BTreeSet::from([r(1), r(2), r(3), r(5), r(10)])
    );
    assert_eq!(session.quest(r(10)).unwrap().kind, QuestKind::Substitute);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn session_path_to_achievement() {
    let store = RecordStore::from_json(RECORDS).unwrap();
    let mut session = Session::new().with_store(store);
    session.config_mut().mode = CompletionMode::Full;

    session.required(QuestId::Achievement(9)).unwrap();
    assert!(session.quest(QuestId::Achievement(9)).is_some());
    assert!(session.quest(r(11)).is_some());
    assert!(session.map().validate_closed().is_ok());
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn saved_map_reopens_identically() {
    let store = RecordStore::from_json(RECORDS).unwrap();
    let mut session = Session::new().with_store(store);
    session.seed(&[r(5)]).unwrap();
    session.run().unwrap();
    let map = session.map().clone();

    let path = temp_path("saved.msgpack");
    session.save(&path).unwrap();
    session.clear();
    session.open(&path).unwrap();
    assert_eq!(session.map(), &map);
    assert_eq!(from_bytes(&to_bytes(&map).unwrap()).unwrap(), map);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn export_is_readable_json() {
    let store = RecordStore::from_json(RECORDS).unwrap();
    let mut session = Session::new().with_store(store);
    session.seed(&[r(3)]).unwrap();
    session.complete().unwrap();

    let path = temp_path("export.json");
    session.export(&path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"condition\": \"Qf=1&Qf=2\""));
    assert!(text.contains("\"requested_quests\""));

    let _ = std::fs::remove_file(&path);
}
