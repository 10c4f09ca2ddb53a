//! Arena storage for cells.
//!
//! Cells live in a dense slot vector addressed by a stable index; a map from
//! position to index makes the grid sparse. A vacant slot is an explicit
//! state and is reused by the next insertion.

use std::collections::HashMap;

use cellgrid_engine::engine::{Cell, Position};

#[derive(Debug)]
enum Slot {
    Occupied(Position, Cell),
    Vacant,
}

#[derive(Debug, Default)]
pub(crate) struct CellStore {
    slots: Vec<Slot>,
    free: Vec<usize>,
    index: HashMap<Position, usize>,
}

impl CellStore {
    pub(crate) fn get(&self, pos: Position) -> Option<&Cell> {
        let &idx = self.index.get(&pos)?;
        match &self.slots[idx] {
            Slot::Occupied(_, cell) => Some(cell),
            Slot::Vacant => None,
        }
    }

    pub(crate) fn get_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        let &idx = self.index.get(&pos)?;
        match &mut self.slots[idx] {
            Slot::Occupied(_, cell) => Some(cell),
            Slot::Vacant => None,
        }
    }

    /// Store `cell` at `pos`, returning the cell it replaced.
    pub(crate) fn insert(&mut self, pos: Position, cell: Cell) -> Option<Cell> {
        if let Some(&idx) = self.index.get(&pos) {
            return match std::mem::replace(&mut self.slots[idx], Slot::Occupied(pos, cell)) {
                Slot::Occupied(_, old) => Some(old),
                Slot::Vacant => None,
            };
        }

        let slot = Slot::Occupied(pos, cell);
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = slot;
                idx
            }
            None => {
                self.slots.push(slot);
                self.slots.len() - 1
            }
        };
        self.index.insert(pos, idx);
        None
    }

    pub(crate) fn remove(&mut self, pos: Position) -> Option<Cell> {
        let idx = self.index.remove(&pos)?;
        self.free.push(idx);
        match std::mem::replace(&mut self.slots[idx], Slot::Vacant) {
            Slot::Occupied(_, cell) => Some(cell),
            Slot::Vacant => None,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.index.len()
    }

    /// Positions of all stored cells, in no particular order.
    pub(crate) fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Occupied(pos, _) => Some(*pos),
            Slot::Vacant => None,
        })
    }
}
