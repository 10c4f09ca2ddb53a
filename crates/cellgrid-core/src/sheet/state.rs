use cellgrid_engine::engine::{Cell, CellLookup, FormulaEngine, Position};

use super::area::PrintableArea;
use super::graph::DependencyGraph;
use super::storage::CellStore;
use crate::config::SheetConfig;
use crate::error::{Result, SheetError};

/// A sheet: sparse cell storage plus the bookkeeping that keeps it consistent.
///
/// The dependency graph and printable area are private; every mutation goes
/// through [`Sheet::set_cell`] or [`Sheet::clear_cell`].
#[derive(Debug)]
pub struct Sheet {
    pub(crate) config: SheetConfig,
    pub(crate) cells: CellStore,
    pub(crate) dependencies: DependencyGraph,
    pub(crate) area: PrintableArea,
    pub(crate) engine: FormulaEngine,
}

impl Sheet {
    /// Create an empty sheet addressing the full position bound.
    pub fn new() -> Self {
        Sheet {
            config: SheetConfig::default(),
            cells: CellStore::default(),
            dependencies: DependencyGraph::default(),
            area: PrintableArea::new(),
            engine: FormulaEngine::new(),
        }
    }

    /// Create an empty sheet with custom limits.
    pub fn with_config(config: SheetConfig) -> Result<Self> {
        config.validate()?;
        Ok(Sheet {
            config,
            ..Sheet::new()
        })
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    pub fn is_valid_position(&self, pos: Position) -> bool {
        pos.is_valid() && self.config.contains(pos)
    }

    pub(crate) fn check_position(&self, pos: Position, operation: &str) -> Result<()> {
        if self.is_valid_position(pos) {
            Ok(())
        } else {
            Err(SheetError::InvalidPosition(format!(
                "{}() at row {}, column {} is outside {}x{}",
                operation, pos.row, pos.col, self.config.max_rows, self.config.max_cols
            )))
        }
    }

    /// Number of stored cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.len() == 0
    }

    /// Cells whose formulas read `pos`, in row-major order.
    pub fn dependents_of(&self, pos: Position) -> Vec<Position> {
        self.dependencies.dependent_cells(pos).collect()
    }

    /// Read-only view of the dependency edges.
    pub fn dependency_graph(&self) -> &DependencyGraph {
        &self.dependencies
    }

    /// Positions the formula stored at `pos` reads; empty if none.
    pub fn references_of(&self, pos: Position) -> Vec<Position> {
        self.cells
            .get(pos)
            .map(|cell| cell.referenced_cells().to_vec())
            .unwrap_or_default()
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}

impl CellLookup for Sheet {
    fn cell_at(&self, pos: Position) -> Option<&Cell> {
        self.cells.get(pos)
    }

    fn formula_engine(&self) -> &FormulaEngine {
        &self.engine
    }

    fn is_valid_position(&self, pos: Position) -> bool {
        Sheet::is_valid_position(self, pos)
    }
}
