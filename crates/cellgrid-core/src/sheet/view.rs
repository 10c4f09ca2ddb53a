use cellgrid_engine::engine::{Cell, CellValue, Position};

use super::Sheet;

/// Read-only handle to a stored cell.
///
/// Reading the value may evaluate and cache the formula; nothing else about
/// the sheet can change through a view.
#[derive(Clone, Copy, Debug)]
pub struct CellView<'a> {
    pub(crate) sheet: &'a Sheet,
    pub(crate) position: Position,
    pub(crate) cell: &'a Cell,
}

impl<'a> CellView<'a> {
    pub fn position(&self) -> Position {
        self.position
    }

    /// The raw input text, verbatim.
    pub fn text(&self) -> &'a str {
        self.cell.text()
    }

    pub fn value(&self) -> CellValue {
        self.cell.value(self.sheet)
    }

    pub fn referenced_cells(&self) -> &'a [Position] {
        self.cell.referenced_cells()
    }

    pub fn is_formula(&self) -> bool {
        self.cell.is_formula()
    }

    /// False once an upstream change has made the cached value stale.
    pub fn is_cache_valid(&self) -> bool {
        self.cell.is_cache_valid()
    }
}
