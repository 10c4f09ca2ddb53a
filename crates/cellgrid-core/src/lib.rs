//! cellgrid-core - Sheet consistency core (storage, dependencies, printable area).

pub mod config;
pub mod error;
pub mod sheet;

pub use config::SheetConfig;
pub use error::{Result, SheetError};
pub use sheet::{CellView, DependencyGraph, Sheet};

pub use cellgrid_engine::engine::{CellValue, FormulaError, Position, Size};
