//! Error types for Cellgrid core.

use thiserror::Error;

/// Errors a sheet operation can fail with.
///
/// Evaluation problems are not errors here; they surface as
/// [`cellgrid_engine::engine::FormulaError`] values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SheetError {
    #[error("Invalid position: {0}")]
    InvalidPosition(String),

    #[error("Circular dependency: {0}")]
    CircularDependency(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SheetError>;
