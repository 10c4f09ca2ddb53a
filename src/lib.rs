//! cellgrid - Consistency core of a spreadsheet.
//!
//! A [`Sheet`] owns a sparse grid of cells, rejects edits that would create a
//! circular reference, keeps cached formula values from going stale, and
//! tracks the printable area.
//!
//! ```ignore
//! use cellgrid::{Position, Sheet};
//!
//! let mut sheet = Sheet::new();
//! sheet.set_cell(Position::from_a1("A1").unwrap(), "5")?;
//! sheet.set_cell(Position::from_a1("B1").unwrap(), "=A1+1")?;
//! ```

pub use cellgrid_core::{CellView, DependencyGraph, Result, Sheet, SheetConfig, SheetError};
pub use cellgrid_engine::engine::{CellValue, FormulaError, Position, Size};
