//! Cell data structures.
//!
//! This module provides the core data types for representing cells:
//! - [`CellContent`] - What the raw input was classified as (empty, text, or formula)
//! - [`Formula`] - A formula expression together with the references it reads
//! - [`Cell`] - Raw input text, classified content, and the cached computed value

use std::cell::OnceCell;

use super::cycle::find_cycle;
use super::eval::CellLookup;
use super::position::Position;
use super::refs::{Reference, extract_references, referenced_positions};
use super::value::CellValue;

/// Leading character that marks the input as a formula.
pub const FORMULA_SIGN: char = '=';
/// Leading character that forces the input to be treated as text.
pub const ESCAPE_SIGN: char = '\'';

/// A formula expression (the input without its leading `=`).
#[derive(Clone, Debug, PartialEq)]
pub struct Formula {
    expression: String,
    references: Vec<Reference>,
    referenced: Vec<Position>,
}

impl Formula {
    /// Extract references from an expression. Syntax is checked lazily at
    /// evaluation time and reported as `#VALUE!`.
    pub fn parse(expression: &str) -> Formula {
        let references = extract_references(expression);
        let referenced = referenced_positions(&references);
        Formula {
            expression: expression.to_string(),
            references,
            referenced,
        }
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Every reference token in order of appearance, including out-of-bound ones.
    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    /// Distinct in-bound positions this formula reads, sorted row-major.
    pub fn referenced_cells(&self) -> &[Position] {
        &self.referenced
    }
}

/// Classified content of a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CellContent {
    Empty,
    /// Literal text, with any leading escape sign removed.
    Text(String),
    Formula(Formula),
}

impl CellContent {
    /// Classify raw input.
    /// - Empty string -> Empty
    /// - `=` followed by anything -> Formula (without the `=`)
    /// - Leading `'` -> Text (without the `'`)
    /// - Otherwise -> Text
    pub fn from_input(text: &str) -> CellContent {
        if text.is_empty() {
            return CellContent::Empty;
        }
        if let Some(expression) = text.strip_prefix(FORMULA_SIGN)
            && !expression.is_empty()
        {
            return CellContent::Formula(Formula::parse(expression));
        }
        let literal = text.strip_prefix(ESCAPE_SIGN).unwrap_or(text);
        CellContent::Text(literal.to_string())
    }
}

/// A cell in the sheet.
///
/// Only formula cells cache anything; text and empty cells compute their
/// value directly from the content.
#[derive(Clone, Debug)]
pub struct Cell {
    text: String,
    content: CellContent,
    cache: OnceCell<CellValue>,
}

impl Cell {
    pub fn empty() -> Cell {
        Cell {
            text: String::new(),
            content: CellContent::Empty,
            cache: OnceCell::new(),
        }
    }

    pub fn new(text: &str) -> Cell {
        let mut cell = Cell::empty();
        cell.set(text);
        cell
    }

    /// Replace the content with `text`. The cache starts out stale.
    pub fn set(&mut self, text: &str) {
        self.clear();
        self.content = CellContent::from_input(text);
        self.text = text.to_string();
    }

    /// Reset to empty content.
    pub fn clear(&mut self) {
        self.text.clear();
        self.content = CellContent::Empty;
        self.cache.take();
    }

    /// The raw input, verbatim.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn content(&self) -> &CellContent {
        &self.content
    }

    pub fn is_formula(&self) -> bool {
        matches!(self.content, CellContent::Formula(_))
    }

    /// Positions this cell's formula reads; empty for non-formulas.
    pub fn referenced_cells(&self) -> &[Position] {
        match &self.content {
            CellContent::Formula(formula) => formula.referenced_cells(),
            _ => &[],
        }
    }

    /// The computed value, evaluating the formula on first read after a change.
    ///
    /// Stale formulas upstream are evaluated first, deepest first, so each
    /// evaluation only reads warm caches no matter how long the chain is.
    pub fn value<L: CellLookup + ?Sized>(&self, lookup: &L) -> CellValue {
        match &self.content {
            CellContent::Empty => CellValue::Text(String::new()),
            CellContent::Text(s) => CellValue::Text(s.clone()),
            CellContent::Formula(formula) => {
                if let Some(value) = self.cache.get() {
                    return value.clone();
                }
                warm_references(formula.referenced_cells(), lookup);
                self.cache
                    .get_or_init(|| lookup.formula_engine().evaluate(formula, lookup))
                    .clone()
            }
        }
    }

    /// Mark the cached value stale.
    pub fn invalidate_cache(&mut self) {
        self.cache.take();
    }

    pub fn is_cache_valid(&self) -> bool {
        !self.is_formula() || self.cache.get().is_some()
    }

    /// Whether evaluating this cell would transitively read `origin`.
    ///
    /// Returns the offending path `origin -> ... -> origin` if so. Other cells'
    /// committed reference sets are taken from `lookup`.
    pub fn is_cyclic_dependent<L: CellLookup + ?Sized>(
        &self,
        origin: Position,
        lookup: &L,
    ) -> Option<Vec<Position>> {
        find_cycle(origin, self.referenced_cells(), |pos| {
            lookup
                .cell_at(pos)
                .map(Cell::referenced_cells)
                .unwrap_or(&[])
        })
    }
}

/// Fill the caches of every stale formula reachable from `start`, in post-order.
///
/// A position is evaluated only after everything it references, so the
/// explicit stack replaces recursion through [`Cell::value`]. Relies on the
/// reference graph being acyclic.
fn warm_references<L: CellLookup + ?Sized>(start: &[Position], lookup: &L) {
    let mut stack: Vec<(Position, bool)> = start.iter().map(|&pos| (pos, false)).collect();
    while let Some((pos, expanded)) = stack.pop() {
        let Some(cell) = lookup.cell_at(pos) else {
            continue;
        };
        let CellContent::Formula(formula) = &cell.content else {
            continue;
        };
        if cell.cache.get().is_some() {
            continue;
        }
        if expanded {
            cell.cache
                .get_or_init(|| lookup.formula_engine().evaluate(formula, lookup));
        } else {
            stack.push((pos, true));
            stack.extend(formula.referenced_cells().iter().map(|&r| (r, false)));
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::empty()
    }
}
