use std::collections::HashSet;

use cellgrid_engine::engine::{Cell, Position, Size};
use log::{debug, trace};

use super::{CellView, Sheet};
use crate::error::{Result, SheetError};

fn format_path(path: &[Position]) -> String {
    path.iter()
        .map(Position::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl Sheet {
    /// Set cell contents from input text.
    ///
    /// The candidate is checked for cycles before anything is touched, so a
    /// rejected edit leaves the cell, the dependency graph and all caches as
    /// they were.
    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<()> {
        self.check_position(pos, "set_cell")?;

        if self.cells.get(pos).is_some_and(|cell| cell.text() == text) {
            return Ok(());
        }

        let candidate = Cell::new(text);
        if let Some(path) = candidate.is_cyclic_dependent(pos, &*self) {
            let message = format_path(&path);
            debug!("rejected edit of {}: cycle {}", pos, message);
            return Err(SheetError::CircularDependency(message));
        }

        // Committed from here on.
        let old_references = self.references_of(pos);
        self.dependencies.unlink(pos, &old_references);
        let new_references: Vec<Position> = candidate
            .referenced_cells()
            .iter()
            .copied()
            .filter(|&r| self.is_valid_position(r))
            .collect();
        self.dependencies.link(pos, &new_references);

        let created = self.cells.insert(pos, candidate).is_none();
        if created {
            self.area.extend(pos);
        }
        self.invalidate_dependents(pos);

        debug!(
            "{} {}: {:?}",
            if created { "created" } else { "replaced" },
            pos,
            text
        );
        Ok(())
    }

    /// The cell at `pos`, or None if it was never set or has been cleared.
    pub fn get_cell(&self, pos: Position) -> Result<Option<CellView<'_>>> {
        self.check_position(pos, "get_cell")?;
        Ok(self.cells.get(pos).map(|cell| CellView {
            sheet: self,
            position: pos,
            cell,
        }))
    }

    /// Clear the specified cell. Clearing an absent cell does nothing.
    ///
    /// Formulas reading `pos` keep their edges (they now read an empty cell)
    /// and are marked stale.
    pub fn clear_cell(&mut self, pos: Position) -> Result<()> {
        self.check_position(pos, "clear_cell")?;

        let Some(cell) = self.cells.remove(pos) else {
            return Ok(());
        };
        self.dependencies.unlink(pos, cell.referenced_cells());
        self.invalidate_dependents(pos);

        if self.area.on_boundary(pos) {
            self.area.invalidate();
            self.area.recompute(self.cells.positions());
            trace!("printable area rescanned after clearing {}", pos);
        }

        debug!("cleared {}", pos);
        Ok(())
    }

    /// Size of the tight rectangle anchored at A1 covering every stored cell.
    pub fn printable_size(&self) -> Result<Size> {
        self.area.size().ok_or_else(|| {
            SheetError::InvalidPosition("printable area has not been updated".to_string())
        })
    }

    /// Mark all cells that depend (transitively) on the changed cell as stale.
    ///
    /// Each dependent is visited once even when reachable along several paths.
    fn invalidate_dependents(&mut self, changed: Position) {
        let mut to_process = vec![changed];
        let mut visited = HashSet::new();
        while let Some(pos) = to_process.pop() {
            if !visited.insert(pos) {
                continue;
            }
            for dependent in self.dependencies.dependent_cells(pos) {
                if let Some(cell) = self.cells.get_mut(dependent) {
                    cell.invalidate_cache();
                }
                to_process.push(dependent);
            }
        }
        trace!("invalidated {} cell(s) downstream of {}", visited.len() - 1, changed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellgrid_engine::engine::{CellValue, FormulaError};

    fn pos(name: &str) -> Position {
        Position::from_a1(name).unwrap()
    }

    fn value(sheet: &Sheet, name: &str) -> CellValue {
        sheet.get_cell(pos(name)).unwrap().unwrap().value()
    }

    fn is_stale(sheet: &Sheet, name: &str) -> bool {
        !sheet.get_cell(pos(name)).unwrap().unwrap().is_cache_valid()
    }

    #[test]
    fn test_set_then_get_returns_text() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("B2"), "=A1 + 1").unwrap();
        let cell = sheet.get_cell(pos("B2")).unwrap().unwrap();
        assert_eq!(cell.text(), "=A1 + 1");
        assert_eq!(cell.position(), pos("B2"));
        assert_eq!(cell.referenced_cells(), &[pos("A1")]);
    }

    #[test]
    fn test_invalid_positions_are_rejected() {
        let mut sheet = Sheet::new();
        let outside = Position::new(Position::MAX_ROWS, 0);
        assert!(matches!(
            sheet.set_cell(outside, "1"),
            Err(SheetError::InvalidPosition(_))
        ));
        assert!(matches!(
            sheet.get_cell(outside),
            Err(SheetError::InvalidPosition(_))
        ));
        assert!(matches!(
            sheet.clear_cell(outside),
            Err(SheetError::InvalidPosition(_))
        ));
        assert!(sheet.is_empty());
    }

    #[test]
    fn test_self_reference_is_rejected() {
        let mut sheet = Sheet::new();
        let err = sheet.set_cell(pos("A1"), "=A1").unwrap_err();
        assert_eq!(err, SheetError::CircularDependency("A1 -> A1".to_string()));
        assert!(sheet.get_cell(pos("A1")).unwrap().is_none());
        assert_eq!(sheet.printable_size().unwrap(), Size::new(0, 0));
    }

    #[test]
    fn test_rejected_edit_leaves_graph_and_caches_untouched() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "5").unwrap();
        sheet.set_cell(pos("B1"), "=A1+1").unwrap();
        sheet.set_cell(pos("C1"), "=B1+1").unwrap();
        assert_eq!(value(&sheet, "C1"), CellValue::Number(7.0));

        let err = sheet.set_cell(pos("A1"), "=C1").unwrap_err();
        assert_eq!(
            err,
            SheetError::CircularDependency("A1 -> C1 -> B1 -> A1".to_string())
        );
        assert_eq!(sheet.get_cell(pos("A1")).unwrap().unwrap().text(), "5");
        assert!(sheet.dependents_of(pos("C1")).is_empty());
        assert!(!is_stale(&sheet, "B1"));
        assert!(!is_stale(&sheet, "C1"));
    }

    #[test]
    fn test_edit_invalidates_transitive_dependents() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "1").unwrap();
        sheet.set_cell(pos("B1"), "=A1*10").unwrap();
        sheet.set_cell(pos("C1"), "=B1+1").unwrap();
        assert_eq!(value(&sheet, "C1"), CellValue::Number(11.0));
        assert!(!is_stale(&sheet, "B1"));

        sheet.set_cell(pos("A1"), "2").unwrap();
        assert!(is_stale(&sheet, "B1"));
        assert!(is_stale(&sheet, "C1"));
        assert_eq!(value(&sheet, "C1"), CellValue::Number(21.0));
    }

    #[test]
    fn test_diamond_invalidation() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "1").unwrap();
        sheet.set_cell(pos("B1"), "=A1+1").unwrap();
        sheet.set_cell(pos("C1"), "=A1+2").unwrap();
        sheet.set_cell(pos("D1"), "=B1+C1").unwrap();
        assert_eq!(value(&sheet, "D1"), CellValue::Number(5.0));

        sheet.set_cell(pos("A1"), "10").unwrap();
        assert!(is_stale(&sheet, "D1"));
        assert_eq!(value(&sheet, "D1"), CellValue::Number(23.0));
    }

    #[test]
    fn test_formula_change_drops_old_edges() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "=B1+C1").unwrap();
        assert_eq!(sheet.dependents_of(pos("C1")), vec![pos("A1")]);

        sheet.set_cell(pos("A1"), "=B1").unwrap();
        assert!(sheet.dependents_of(pos("C1")).is_empty());
        assert_eq!(sheet.dependents_of(pos("B1")), vec![pos("A1")]);

        // A later edit of C1 must not touch A1's cache.
        assert_eq!(value(&sheet, "A1"), CellValue::Number(0.0));
        sheet.set_cell(pos("C1"), "3").unwrap();
        assert!(!is_stale(&sheet, "A1"));
    }

    #[test]
    fn test_dependents_survive_edit_of_referenced_cell() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "1").unwrap();
        sheet.set_cell(pos("B1"), "=A1").unwrap();
        sheet.set_cell(pos("A1"), "2").unwrap();
        assert_eq!(value(&sheet, "B1"), CellValue::Number(2.0));

        sheet.set_cell(pos("A1"), "3").unwrap();
        assert!(is_stale(&sheet, "B1"));
        assert_eq!(value(&sheet, "B1"), CellValue::Number(3.0));
    }

    #[test]
    fn test_creating_referenced_cell_invalidates_reader() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("B1"), "=A1+1").unwrap();
        assert_eq!(value(&sheet, "B1"), CellValue::Number(1.0));

        sheet.set_cell(pos("A1"), "4").unwrap();
        assert_eq!(value(&sheet, "B1"), CellValue::Number(5.0));
    }

    #[test]
    fn test_clear_invalidates_reader_and_keeps_edge() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "4").unwrap();
        sheet.set_cell(pos("B1"), "=A1+1").unwrap();
        assert_eq!(value(&sheet, "B1"), CellValue::Number(5.0));

        sheet.clear_cell(pos("A1")).unwrap();
        assert_eq!(sheet.dependents_of(pos("A1")), vec![pos("B1")]);
        assert_eq!(value(&sheet, "B1"), CellValue::Number(1.0));
    }

    #[test]
    fn test_clear_formula_unlinks_its_references() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("B1"), "=A1").unwrap();
        sheet.clear_cell(pos("B1")).unwrap();
        assert!(sheet.dependents_of(pos("A1")).is_empty());

        // A1 = B1 is fine now that B1 no longer reads A1.
        sheet.set_cell(pos("A1"), "=B1").unwrap();
    }

    #[test]
    fn test_clear_absent_cell_is_noop() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "x").unwrap();
        sheet.clear_cell(pos("Z100")).unwrap();
        assert_eq!(sheet.cell_count(), 1);
        assert_eq!(sheet.printable_size().unwrap(), Size::new(1, 1));
    }

    #[test]
    fn test_printable_area_tracks_edits() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "x").unwrap();
        sheet.set_cell(pos("C3"), "y").unwrap();
        assert_eq!(sheet.printable_size().unwrap(), Size::new(3, 3));

        // Interior clear keeps the bound.
        sheet.set_cell(pos("B2"), "z").unwrap();
        sheet.clear_cell(pos("B2")).unwrap();
        assert_eq!(sheet.printable_size().unwrap(), Size::new(3, 3));

        sheet.clear_cell(pos("C3")).unwrap();
        assert_eq!(sheet.printable_size().unwrap(), Size::new(1, 1));

        sheet.clear_cell(pos("A1")).unwrap();
        assert_eq!(sheet.printable_size().unwrap(), Size::new(0, 0));
    }

    #[test]
    fn test_boundary_clear_shrinks_one_axis() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A5"), "tall").unwrap();
        sheet.set_cell(pos("E1"), "wide").unwrap();
        sheet.set_cell(pos("C3"), "mid").unwrap();
        assert_eq!(sheet.printable_size().unwrap(), Size::new(5, 5));

        sheet.clear_cell(pos("E1")).unwrap();
        assert_eq!(sheet.printable_size().unwrap(), Size::new(5, 3));
    }

    #[test]
    fn test_empty_text_still_occupies_area() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("B2"), "").unwrap();
        assert!(sheet.get_cell(pos("B2")).unwrap().is_some());
        assert_eq!(sheet.printable_size().unwrap(), Size::new(2, 2));
    }

    #[test]
    fn test_replacing_cell_does_not_move_area() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("B2"), "1").unwrap();
        sheet.set_cell(pos("B2"), "2").unwrap();
        sheet.set_cell(pos("B2"), "2").unwrap();
        assert_eq!(sheet.cell_count(), 1);
        assert_eq!(sheet.printable_size().unwrap(), Size::new(2, 2));
    }

    #[test]
    fn test_config_limits_positions() {
        let config = crate::SheetConfig {
            max_rows: 10,
            max_cols: 3,
        };
        let mut sheet = Sheet::with_config(config).unwrap();
        sheet.set_cell(pos("C10"), "ok").unwrap();
        assert!(matches!(
            sheet.set_cell(pos("D1"), "no"),
            Err(SheetError::InvalidPosition(_))
        ));
        assert!(matches!(
            sheet.get_cell(pos("A11")),
            Err(SheetError::InvalidPosition(_))
        ));
    }

    #[test]
    fn test_with_config_rejects_invalid_limits() {
        let config = crate::SheetConfig {
            max_rows: 0,
            max_cols: 3,
        };
        assert!(matches!(
            Sheet::with_config(config),
            Err(SheetError::Config(_))
        ));
    }

    #[test]
    fn test_long_chain_cold_read_and_invalidation() {
        let mut sheet = Sheet::new();
        sheet.set_cell(Position::new(0, 0), "1").unwrap();
        for row in 1..5000 {
            let formula = format!("=A{}+1", row);
            sheet.set_cell(Position::new(row, 0), &formula).unwrap();
        }
        assert_eq!(value(&sheet, "A5000"), CellValue::Number(5000.0));
        assert!(!is_stale(&sheet, "A2"));

        sheet.set_cell(Position::new(0, 0), "2").unwrap();
        assert!(is_stale(&sheet, "A5000"));
        assert!(is_stale(&sheet, "A2"));
        assert_eq!(value(&sheet, "A5000"), CellValue::Number(5001.0));
    }

    #[test]
    fn test_reference_outside_config_is_ref_error_without_edge() {
        let config = crate::SheetConfig {
            max_rows: 10,
            max_cols: 3,
        };
        let mut sheet = Sheet::with_config(config).unwrap();
        sheet.set_cell(pos("A1"), "=Z50 + 1").unwrap();
        sheet.set_cell(pos("B1"), "=C10 + A1").unwrap();

        assert_eq!(value(&sheet, "A1"), CellValue::Error(FormulaError::Ref));
        assert_eq!(value(&sheet, "B1"), CellValue::Error(FormulaError::Ref));
        assert!(sheet.dependents_of(pos("Z50")).is_empty());
        assert_eq!(sheet.dependents_of(pos("C10")), vec![pos("B1")]);
        assert_eq!(sheet.dependents_of(pos("A1")), vec![pos("B1")]);
    }

    #[test]
    fn test_dependency_graph_accessor_reflects_edges() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("B1"), "=A1 + A2").unwrap();
        let graph = sheet.dependency_graph();
        assert!(graph.has_dependents(pos("A1")));
        assert!(!graph.has_dependents(pos("B1")));
        assert_eq!(graph.len(), 2);

        sheet.clear_cell(pos("B1")).unwrap();
        assert!(sheet.dependency_graph().is_empty());
    }
}
