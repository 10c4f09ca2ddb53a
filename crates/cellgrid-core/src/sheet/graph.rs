//! Reverse dependency map: cell -> cells that read it.

use std::collections::{BTreeSet, HashMap};

use cellgrid_engine::engine::Position;

/// Dependency edges stored in the reverse direction of references.
///
/// An entry `B -> {A, ...}` means A's formula reads B. Entries are created on
/// the first edge and dropped once their set becomes empty.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    dependents: HashMap<Position, BTreeSet<Position>>,
}

impl DependencyGraph {
    /// Record that `dependent` reads `main`. Idempotent.
    pub fn add_dependent_cell(&mut self, main: Position, dependent: Position) {
        self.dependents.entry(main).or_default().insert(dependent);
    }

    /// Forget a single edge.
    pub fn remove_dependent_cell(&mut self, main: Position, dependent: Position) {
        if let Some(set) = self.dependents.get_mut(&main) {
            set.remove(&dependent);
            if set.is_empty() {
                self.dependents.remove(&main);
            }
        }
    }

    /// Cells currently recorded as reading `pos`, in row-major order.
    pub fn dependent_cells(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        self.dependents.get(&pos).into_iter().flatten().copied()
    }

    pub fn has_dependents(&self, pos: Position) -> bool {
        self.dependents.contains_key(&pos)
    }

    /// Drop the whole entry keyed by `pos`, returning who depended on it.
    ///
    /// Edges where `pos` is itself the dependent are untouched; use
    /// [`DependencyGraph::unlink`] for those.
    pub fn delete_dependencies(&mut self, pos: Position) -> BTreeSet<Position> {
        self.dependents.remove(&pos).unwrap_or_default()
    }

    /// Record that `dependent` reads every position in `references`.
    pub fn link(&mut self, dependent: Position, references: &[Position]) {
        for &main in references {
            self.add_dependent_cell(main, dependent);
        }
    }

    /// Undo [`DependencyGraph::link`] for a reference set that is going away.
    pub fn unlink(&mut self, dependent: Position, references: &[Position]) {
        for &main in references {
            self.remove_dependent_cell(main, dependent);
        }
    }

    /// Number of positions with at least one dependent.
    pub fn len(&self) -> usize {
        self.dependents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependents.is_empty()
    }
}
