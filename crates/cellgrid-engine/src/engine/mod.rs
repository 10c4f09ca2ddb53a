//! Cell model API.
//!
//! This module provides everything a sheet needs to know about a single cell:
//!
//! - [`Position`], [`Size`] - Addresses (A1 notation ↔ row/col indices) and extents
//! - [`Cell`], [`CellContent`], [`Formula`] - Cell storage and input classification
//! - [`CellValue`], [`FormulaError`] - Computed values
//! - [`extract_references`] - Parse the references a formula reads
//! - [`FormulaEngine`], [`CellLookup`] - Rhai-backed evaluation
//! - [`find_cycle`] - Circular dependency search
//! - [`format_number`] - Format numbers for display

mod cell;
mod cycle;
mod eval;
mod format;
mod position;
mod refs;
mod value;

pub use cell::{Cell, CellContent, ESCAPE_SIGN, FORMULA_SIGN, Formula};
pub use cycle::find_cycle;
pub use eval::{CellLookup, FormulaEngine};
pub use format::format_number;
pub use position::{Position, Size};
pub use refs::{Reference, extract_references, referenced_positions};
pub use value::{CellValue, FormulaError};
