//! Reference extraction from formula expressions.
//!
//! Finds every A1-style token (e.g., `A1`, `b2`) an expression reads. The
//! resulting set drives both cycle detection and the sheet's dependency graph.
//! References inside string literals are ignored.

use regex::Regex;
use std::sync::OnceLock;

use super::position::Position;

/// A single reference token as written in the expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    /// The token exactly as it appears, used as the Rhai variable name.
    pub token: String,
    /// Parsed address; None when the token overflows.
    pub position: Option<Position>,
}

impl Reference {
    /// The referenced position, if it lies inside the grid.
    pub fn valid_position(&self) -> Option<Position> {
        self.position.filter(Position::is_valid)
    }
}

/// Extract all reference tokens from an expression, in order of appearance.
pub fn extract_references(expression: &str) -> Vec<Reference> {
    let expression = strip_string_literals(expression);

    cell_ref_re()
        .find_iter(&expression)
        .map(|m| Reference {
            token: m.as_str().to_string(),
            position: Position::from_a1(m.as_str()),
        })
        .collect()
}

/// Distinct in-bound positions read by `references`, sorted row-major.
pub fn referenced_positions(references: &[Reference]) -> Vec<Position> {
    let mut positions: Vec<Position> = references
        .iter()
        .filter_map(Reference::valid_position)
        .collect();
    positions.sort_unstable();
    positions.dedup();
    positions
}

fn cell_ref_re() -> &'static Regex {
    static CELL_RE: OnceLock<Regex> = OnceLock::new();
    CELL_RE.get_or_init(|| {
        Regex::new(r"\b[A-Za-z]+[0-9]+\b").expect("reference regex must compile")
    })
}

fn strip_string_literals(expression: &str) -> String {
    let mut out = String::with_capacity(expression.len());
    let mut in_string = false;
    let mut escaped = false;

    for ch in expression.chars() {
        if in_string {
            if escaped {
                escaped = false;
                out.push(' ');
            } else if ch == '\\' {
                escaped = true;
                out.push(' ');
            } else if ch == '"' {
                in_string = false;
                out.push('"');
            } else {
                out.push(' ');
            }
        } else {
            if ch == '"' {
                in_string = true;
            }
            out.push(ch);
        }
    }

    out
}
