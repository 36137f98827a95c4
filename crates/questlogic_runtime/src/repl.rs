//! The interactive REPL.
//!
//! Lines starting with `:` are commands. Anything else is parsed as a start
//! condition and shown as a tree with its diagnostics.

use std::fmt::Write as _;
use std::io::{self, Write};

use questlogic_engine::{PipelineReport, Quest};
use questlogic_foundation::{Error, ErrorKind, QuestId, Result};
use questlogic_language::parse;
use questlogic_language::pretty::outline;

use crate::editor::{LineEditor, ReadResult, RustylineEditor};
use crate::session::Session;

/// Every command the REPL understands.
pub const COMMANDS: &[&str] = &[
    ":load", ":seed", ":required", ":complete", ":reduce", ":contract", ":run", ":show", ":list",
    ":save", ":open", ":export", ":clear", ":help", ":quit",
];

/// Returns true once every `(` has been closed.
#[must_use]
pub fn is_complete(input: &str) -> bool {
    let mut depth = 0i32;
    for c in input.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => {}
        }
    }
    depth <= 0
}

/// What evaluating one line produced.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Text to print.
    Output(String),
    /// Nothing to print.
    Silent,
    /// The user asked to leave.
    Quit,
}

/// The interactive REPL.
pub struct Repl<E: LineEditor = RustylineEditor> {
    /// The line editor for input.
    editor: E,

    /// Records, map and configuration.
    session: Session,

    /// Whether to show the welcome banner.
    show_banner: bool,

    /// Primary prompt.
    prompt: String,

    /// Continuation prompt (for unclosed parentheses).
    continuation_prompt: String,
}

impl Repl<RustylineEditor> {
    /// Creates a new REPL with the default rustyline editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails to initialize.
    pub fn new() -> Result<Self> {
        let editor = RustylineEditor::new()?;
        Ok(Self::with_editor(editor))
    }
}

impl<E: LineEditor> Repl<E> {
    /// Creates a new REPL with the given editor.
    pub fn with_editor(editor: E) -> Self {
        Self {
            editor,
            session: Session::new(),
            show_banner: true,
            prompt: "quest> ".to_string(),
            continuation_prompt: ".. ".to_string(),
        }
    }

    /// Sets the session for this REPL.
    #[must_use]
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    /// Disables the welcome banner.
    #[must_use]
    pub const fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Returns a reference to the session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Returns a mutable reference to the session.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Runs the REPL loop.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails fatally.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            self.print_banner();
        }

        loop {
            match self.read_eval_print() {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    self.print_error(&e);
                }
            }
        }

        println!("\nGoodbye!");
        Ok(())
    }

    /// Executes one read-eval-print iteration.
    ///
    /// Returns `Ok(true)` to continue, `Ok(false)` to exit.
    fn read_eval_print(&mut self) -> Result<bool> {
        let Some(input) = self.read_input()? else {
            return Ok(false); // EOF
        };

        if input.trim().is_empty() {
            return Ok(true);
        }

        self.editor.add_history(&input);

        match self.eval(&input) {
            Ok(Outcome::Output(text)) => println!("{text}"),
            Ok(Outcome::Silent) => {}
            Ok(Outcome::Quit) => return Ok(false),
            Err(e) => self.print_error(&e),
        }

        Ok(true)
    }

    /// Reads a line, continuing while parentheses are open.
    fn read_input(&mut self) -> Result<Option<String>> {
        let mut input = String::new();
        let mut first_line = true;

        loop {
            let prompt = if first_line {
                &self.prompt
            } else {
                &self.continuation_prompt
            };

            match self.editor.read_line(prompt)? {
                ReadResult::Line(line) => {
                    if !first_line {
                        input.push(' ');
                    }
                    input.push_str(&line);
                    if is_complete(&input) {
                        return Ok(Some(input));
                    }
                    first_line = false;
                }
                ReadResult::Interrupted => {
                    if !first_line {
                        println!("\nInput cancelled.");
                    }
                    return Ok(Some(String::new()));
                }
                ReadResult::Eof => {
                    if first_line {
                        return Ok(None);
                    }
                    return Err(Error::new(ErrorKind::Internal(
                        "unexpected EOF inside parentheses".to_string(),
                    )));
                }
            }
        }
    }

    /// Evaluates one line of input.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails or its arguments are invalid.
    pub fn eval(&mut self, input: &str) -> Result<Outcome> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(Outcome::Silent);
        }
        let Some(command) = input.strip_prefix(':') else {
            return Self::show_condition(input).map(Outcome::Output);
        };

        let mut words = command.split_whitespace();
        let name = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();
        tracing::debug!(command = name, args = args.len(), "repl command");

        let text = match name {
            "load" => {
                let count = self.session.load_records(single_arg(name, &args)?)?;
                format!("{count} quest records loaded")
            }
            "seed" => {
                let ids = parse_ids(name, &args)?;
                let added = self.session.seed(&ids)?;
                format!("{added} quests seeded, {} in map", self.session.map().len())
            }
            "required" => {
                let id = parse_id(single_arg(name, &args)?)?;
                let report = self.session.required(id)?;
                format!(
                    "path to {id}: {} quests\n{}",
                    self.session.map().len(),
                    format_report(&report)
                )
            }
            "complete" => {
                let report = self.session.complete()?;
                format!(
                    "{} passes, {} added, {} fetches",
                    report.passes, report.added, report.fetches
                )
            }
            "reduce" => {
                let report = self.session.reduce()?;
                let mut text = format!("{} inferable edges removed", report.removed.len());
                for (from, to) in &report.removed {
                    let _ = write!(text, "\n  {from} -> {to}");
                }
                text
            }
            "contract" => {
                let report = self.session.contract()?;
                let mut text = format!(
                    "{} clusters merged, {} quests removed",
                    report.clusters.len(),
                    report.merged_count()
                );
                for cluster in &report.clusters {
                    let _ = write!(
                        text,
                        "\n  {} kept for {}, merged {}",
                        cluster.representative,
                        cluster.root,
                        join_ids(cluster.merged.iter())
                    );
                }
                text
            }
            "run" => format_report(&self.session.run()?),
            "show" => {
                let id = parse_id(single_arg(name, &args)?)?;
                let quest = self
                    .session
                    .quest(id)
                    .ok_or_else(|| Error::not_found(id))?;
                self.describe(quest)
            }
            "list" => self.list(),
            "save" => {
                let path = single_arg(name, &args)?;
                self.session.save(path)?;
                format!("saved {} quests to {path}", self.session.map().len())
            }
            "open" => {
                let path = single_arg(name, &args)?;
                let count = self.session.open(path)?;
                format!("opened {count} quests from {path}")
            }
            "export" => {
                let path = single_arg(name, &args)?;
                self.session.export(path)?;
                format!("exported {} quests to {path}", self.session.map().len())
            }
            "clear" => {
                self.session.clear();
                return Ok(Outcome::Silent);
            }
            "help" => help_text(),
            "quit" | "q" => return Ok(Outcome::Quit),
            other => {
                return Err(Error::new(ErrorKind::Internal(format!(
                    "unknown command ':{other}' (try :help)"
                ))));
            }
        };
        Ok(Outcome::Output(text))
    }

    /// Parses a condition and renders it with its tree and diagnostics.
    fn show_condition(input: &str) -> Result<String> {
        let parsed = parse(input)?;
        let mut text = format!("{}\n{}", parsed.group, outline(&parsed.group));
        let requested = parsed.referenced_quest_ids();
        if !requested.is_empty() {
            let _ = write!(text, "requires: {}", join_ids(requested.iter()));
        }
        for diagnostic in &parsed.diagnostics {
            let _ = write!(text, "\nwarning: {diagnostic}");
        }
        Ok(text.trim_end().to_string())
    }

    fn describe(&self, quest: &Quest) -> String {
        let mut text = format!("{} ({})\n", quest.display_name(), quest.id);
        let _ = writeln!(text, "condition: {}", quest.condition);
        text.push_str(&outline(&quest.condition));
        let _ = writeln!(text, "requires: {}", join_ids(quest.requested_quests().iter()));
        let dependents = self.session.map().dependents(quest.id);
        let _ = writeln!(text, "required by: {}", join_ids(dependents.iter()));
        let sub_areas = quest.sub_areas();
        if !sub_areas.is_empty() {
            let areas: Vec<String> = sub_areas.iter().map(ToString::to_string).collect();
            let _ = writeln!(text, "sub-areas: {}", areas.join(", "));
        }
        for diagnostic in &quest.diagnostics {
            let _ = writeln!(text, "warning: {diagnostic}");
        }
        text.trim_end().to_string()
    }

    fn list(&self) -> String {
        let map = self.session.map();
        if map.is_empty() {
            return "map is empty".to_string();
        }
        let mut text = String::new();
        for quest in map.iter() {
            let _ = writeln!(
                text,
                "{:>8}  {}  <- {}",
                quest.id.to_string(),
                quest.display_name(),
                join_ids(quest.requested_quests().iter())
            );
        }
        text.trim_end().to_string()
    }

    /// Prints an error to stderr.
    #[allow(clippy::unused_self)]
    fn print_error(&self, error: &Error) {
        eprintln!("\x1b[31mError: {error}\x1b[0m");
    }

    /// Prints the welcome banner.
    #[allow(clippy::unused_self)]
    fn print_banner(&self) {
        println!("\x1b[1;36mquestlogic v{}\x1b[0m", env!("CARGO_PKG_VERSION"));
        println!("Type a start condition to inspect it, or :help for commands. Ctrl+D exits.\n");
        let _ = io::stdout().flush();
    }
}

fn single_arg<'a>(command: &str, args: &[&'a str]) -> Result<&'a str> {
    match args {
        [arg] => Ok(arg),
        _ => Err(Error::new(ErrorKind::Internal(format!(
            ":{command} takes exactly one argument"
        )))),
    }
}

fn parse_id(text: &str) -> Result<QuestId> {
    QuestId::parse(text)
        .ok_or_else(|| Error::new(ErrorKind::Internal(format!("not a quest id: {text}"))))
}

fn parse_ids(command: &str, args: &[&str]) -> Result<Vec<QuestId>> {
    if args.is_empty() {
        return Err(Error::new(ErrorKind::Internal(format!(
            ":{command} needs at least one quest id"
        ))));
    }
    args.iter().map(|a| parse_id(a)).collect()
}

fn join_ids<'a>(ids: impl Iterator<Item = &'a QuestId>) -> String {
    let ids: Vec<String> = ids.map(ToString::to_string).collect();
    if ids.is_empty() {
        "-".to_string()
    } else {
        ids.join(", ")
    }
}

fn format_report(report: &PipelineReport) -> String {
    let mut text = format!(
        "completion: {} passes, {} added",
        report.completion.passes, report.completion.added
    );
    if let Some(reduction) = &report.reduction {
        let _ = write!(text, "\nreduction: {} edges removed", reduction.removed.len());
    }
    if let Some(contraction) = &report.contraction {
        let _ = write!(
            text,
            "\ncontraction: {} clusters, {} quests removed",
            contraction.clusters.len(),
            contraction.merged_count()
        );
    }
    text
}

fn help_text() -> String {
    "\
:load FILE        load quest records (JSON)
:seed ID...       add quests to the map (a<ID> for achievements)
:required ID      replace the map with the path to ID
:complete         complete the map against the records
:reduce           remove inferable edges
:contract         merge class variants
:run              complete, reduce and contract as configured
:show ID          show one quest
:list             list the map
:save FILE        save the map (MessagePack)
:open FILE        open a saved map
:export FILE      export the map as JSON
:clear            empty the map
:help             this text
:quit             leave
anything else     parse it as a start condition"
        .to_string()
}
