//! Printable area tracking.

use cellgrid_engine::engine::{Position, Size};

/// Tight bound `[0, max_row) x [0, max_col)` over all stored cells.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PrintableArea {
    max_row: usize,
    max_col: usize,
    valid: bool,
}

impl PrintableArea {
    pub(crate) fn new() -> Self {
        PrintableArea {
            max_row: 0,
            max_col: 0,
            valid: true,
        }
    }

    /// Grow to cover a newly created cell.
    pub(crate) fn extend(&mut self, pos: Position) {
        self.max_row = self.max_row.max(pos.row + 1);
        self.max_col = self.max_col.max(pos.col + 1);
    }

    /// Whether removing a cell at `pos` could shrink the area.
    pub(crate) fn on_boundary(&self, pos: Position) -> bool {
        pos.row + 1 == self.max_row || pos.col + 1 == self.max_col
    }

    pub(crate) fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Recompute the tight bound from scratch.
    pub(crate) fn recompute(&mut self, positions: impl Iterator<Item = Position>) {
        self.max_row = 0;
        self.max_col = 0;
        for pos in positions {
            self.extend(pos);
        }
        self.valid = true;
    }

    /// The current size, or None while a recompute is pending.
    pub(crate) fn size(&self) -> Option<Size> {
        self.valid.then(|| Size::new(self.max_row, self.max_col))
    }
}
