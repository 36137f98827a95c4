//! Integration tests for the REPL driven by scripted input

use questlogic_foundation::{QuestId, Result};
use questlogic_runtime::{LineEditor, Outcome, ReadResult, RecordStore, Repl, Session};

use crate::RECORDS;

/// Feeds lines to the REPL, then reports end of input.
struct ScriptedEditor {
    lines: Vec<String>,
    history: Vec<String>,
}

impl ScriptedEditor {
    fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().rev().map(|l| (*l).to_string()).collect(),
            history: Vec::new(),
        }
    }
}

impl LineEditor for ScriptedEditor {
    fn read_line(&mut self, _prompt: &str) -> Result<ReadResult> {
        Ok(self.lines.pop().map_or(ReadResult::Eof, ReadResult::Line))
    }

    fn add_history(&mut self, line: &str) {
        self.history.push(line.to_string());
    }

    fn set_keywords(&mut self, _keywords: Vec<String>) {}
}

fn repl(lines: &[&str]) -> Repl<ScriptedEditor> {
    let store = RecordStore::from_json(RECORDS).unwrap();
    Repl::with_editor(ScriptedEditor::new(lines))
        .with_session(Session::new().with_store(store))
        .without_banner()
}

#[test]
fn scripted_session() {
    let mut repl = repl(&[":seed 1", ":run", "Qf=1|(Qf=2", "&PG=3)", ":quit"]);
    repl.run().unwrap();
    assert_eq!(repl.session().map().len(), 5);
    assert!(repl.session().quest(QuestId::Real(11)).is_none());
}

#[test]
fn errors_do_not_end_the_loop() {
    let mut repl = repl(&[":seed 404", ":frobnicate", "Qf=1&Qf=2|Qf=3", ":seed 2"]);
    repl.run().unwrap();
    assert_eq!(repl.session().map().len(), 1);
}

#[test]
fn required_then_show() {
    let mut repl = repl(&[]);
    let Outcome::Output(text) = repl.eval(":required a9").unwrap() else {
        panic!("expected output");
    };
    assert!(text.starts_with("path to a9:"));

    let Outcome::Output(text) = repl.eval(":show a9").unwrap() else {
        panic!("expected output");
    };
    assert!(text.starts_with("Achievement: Reunited (a9)"));
    assert!(text.contains("requires: 5"));
}
