//! Printing condition trees.
//!
//! [`LogicalGroup`] displays in the mini-language itself, so a printed
//! condition over real quest ids parses back to the same tree. Comparison
//! symbols are normalized per kind (see [`Criterion`]'s `Display`).
//! [`outline`] renders an indented, human-readable view for interactive use.
//!
//! # Example
//!
//! ```
//! use questlogic_language::parse;
//!
//! let parsed = parse("Qf=3&(Qf=1|Qf=2)").unwrap();
//! assert_eq!(parsed.group.to_string(), "Qf=3&(Qf=1|Qf=2)");
//! ```

use std::fmt::{self, Write};

use crate::criterion::Criterion;
use crate::group::{Link, LogicalGroup, Node};

enum Piece<'a> {
    Group(&'a LogicalGroup, bool),
    Criterion(&'a Criterion),
    Text(&'static str),
}

impl fmt::Display for LogicalGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![Piece::Group(self, false)];
        while let Some(piece) = stack.pop() {
            match piece {
                Piece::Text(text) => f.write_str(text)?,
                Piece::Criterion(criterion) => write!(f, "{criterion}")?,
                Piece::Group(group, nested) => {
                    let parens = nested && group.len() > 1;
                    let separator = if group.link() == Link::Or { "|" } else { "&" };
                    if parens {
                        stack.push(Piece::Text(")"));
                    }
                    for (i, child) in group.children().iter().enumerate().rev() {
                        stack.push(match child {
                            Node::Criterion(c) => Piece::Criterion(c),
                            Node::Group(g) => Piece::Group(g, nested || group.len() > 1),
                        });
                        if i > 0 {
                            stack.push(Piece::Text(separator));
                        }
                    }
                    if parens {
                        stack.push(Piece::Text("("));
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => write!(f, "AND"),
            Self::Or => write!(f, "OR"),
            Self::None => write!(f, "NONE"),
        }
    }
}

/// Renders a group as an indented outline, one node per line.
///
/// ```
/// use questlogic_language::{parse, pretty::outline};
///
/// let parsed = parse("Qf=1|(Qf=2&PG=3)").unwrap();
/// assert_eq!(outline(&parsed.group), "OR\n  1\n  AND\n    2\n    Class = 3\n");
/// ```
#[must_use]
pub fn outline(group: &LogicalGroup) -> String {
    let mut out = String::new();
    let mut stack: Vec<(&Node, usize)> = Vec::new();
    let _ = writeln!(out, "{}", group.link());
    stack.extend(group.children().iter().rev().map(|n| (n, 1)));
    while let Some((node, depth)) = stack.pop() {
        let indent = "  ".repeat(depth);
        match node {
            Node::Criterion(c) => {
                let _ = writeln!(out, "{indent}{}", c.describe());
            }
            Node::Group(g) => {
                let _ = writeln!(out, "{indent}{}", g.link());
                stack.extend(g.children().iter().rev().map(|n| (n, depth + 1)));
            }
        }
    }
    out
}
