//! Syntax highlighting for the REPL.

use std::borrow::Cow;

use questlogic_language::CriterionKind;

/// Highlighter for start conditions and REPL commands.
pub struct ConditionHighlighter;

impl ConditionHighlighter {
    /// Creates a new highlighter.
    pub const fn new() -> Self {
        Self
    }

    /// Highlight a line of input.
    #[allow(clippy::unused_self)]
    pub fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.trim_start().starts_with(':') {
            return Self::highlight_command(line);
        }

        let mut result = String::with_capacity(line.len() * 2);
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                // Operators
                '&' | '|' => {
                    result.push_str("\x1b[1m"); // bold
                    result.push(c);
                    result.push_str("\x1b[0m");
                }

                '(' | ')' => {
                    result.push_str("\x1b[2m"); // dim
                    result.push(c);
                    result.push_str("\x1b[0m");
                }

                // Negation
                '!' => {
                    result.push_str("\x1b[31m"); // red
                    result.push(c);
                    result.push_str("\x1b[0m");
                }

                // Numbers
                c if c.is_ascii_digit() => {
                    result.push_str("\x1b[35m"); // magenta
                    result.push(c);
                    while let Some(next) = chars.next_if(char::is_ascii_digit) {
                        result.push(next);
                    }
                    result.push_str("\x1b[0m");
                }

                // Predicate codes
                c if c.is_ascii_alphabetic() => {
                    let mut word = String::new();
                    word.push(c);
                    while let Some(next) = chars.next_if(char::is_ascii_alphabetic) {
                        word.push(next);
                    }

                    let color = match CriterionKind::from_code(&word) {
                        Some(CriterionKind::RequiredQuest) => "\x1b[36m", // cyan
                        Some(CriterionKind::Class) => "\x1b[33m",         // yellow
                        Some(_) => "\x1b[34m",                            // blue
                        None => "\x1b[4m",                                // underline
                    };
                    result.push_str(color);
                    result.push_str(&word);
                    result.push_str("\x1b[0m");
                }

                _ => result.push(c),
            }
        }

        Cow::Owned(result)
    }

    fn highlight_command(line: &str) -> Cow<'_, str> {
        let trimmed = line.trim_start();
        let indent = &line[..line.len() - trimmed.len()];
        let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
        let (command, rest) = trimmed.split_at(end);
        Cow::Owned(format!("{indent}\x1b[32m{command}\x1b[0m{rest}"))
    }
}

impl Default for ConditionHighlighter {
    fn default() -> Self {
        Self::new()
    }
}
