//! Sheet configuration.
//!
//! Limits are read from TOML, e.g.
//!
//! ```toml
//! max_rows = 1000
//! max_cols = 26
//! ```
//!
//! Missing keys fall back to the hard position bound.

use cellgrid_engine::engine::Position;
use serde::Deserialize;

use crate::error::{Result, SheetError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetConfig {
    /// Number of addressable rows.
    pub max_rows: usize,
    /// Number of addressable columns.
    pub max_cols: usize,
}

impl Default for SheetConfig {
    fn default() -> Self {
        SheetConfig {
            max_rows: Position::MAX_ROWS,
            max_cols: Position::MAX_COLS,
        }
    }
}

impl SheetConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SheetConfig =
            toml::from_str(content).map_err(|e| SheetError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject limits that are zero or exceed the hard position bound.
    pub fn validate(&self) -> Result<()> {
        if self.max_rows == 0 || self.max_rows > Position::MAX_ROWS {
            return Err(SheetError::Config(format!(
                "max_rows must be in 1..={}, got {}",
                Position::MAX_ROWS,
                self.max_rows
            )));
        }
        if self.max_cols == 0 || self.max_cols > Position::MAX_COLS {
            return Err(SheetError::Config(format!(
                "max_cols must be in 1..={}, got {}",
                Position::MAX_COLS,
                self.max_cols
            )));
        }
        Ok(())
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.max_rows && pos.col < self.max_cols
    }
}
