//! Circular dependency detection for formula cells.
//!
//! When a formula is entered, we must verify it doesn't create a cycle
//! (e.g., A1 references B1, B1 references C1, C1 references A1).
//! The search runs against the proposed reference set before anything is
//! committed, so a rejected edit never touches the sheet.

use std::collections::{HashMap, HashSet};

use super::position::Position;

/// Search for a path from `start` (the candidate's direct references) back to `origin`.
///
/// `references_of` yields the committed reference set of a position.
/// Returns Some(path) as `origin -> ... -> origin` if a cycle is found.
pub fn find_cycle<'a, F>(
    origin: Position,
    start: &[Position],
    mut references_of: F,
) -> Option<Vec<Position>>
where
    F: FnMut(Position) -> &'a [Position],
{
    let mut visited = HashSet::new();
    let mut parent: HashMap<Position, Position> = HashMap::new();
    let mut stack = Vec::new();

    for &pos in start {
        if pos == origin {
            return Some(vec![origin, origin]);
        }
        if visited.insert(pos) {
            parent.insert(pos, origin);
            stack.push(pos);
        }
    }

    while let Some(current) = stack.pop() {
        for &next in references_of(current) {
            if next == origin {
                return Some(trace_path(origin, current, &parent));
            }
            if visited.insert(next) {
                parent.insert(next, current);
                stack.push(next);
            }
        }
    }

    None
}

fn trace_path(origin: Position, last: Position, parent: &HashMap<Position, Position>) -> Vec<Position> {
    let mut path = vec![origin, last];
    let mut node = last;
    while let Some(&prev) = parent.get(&node) {
        if prev == origin {
            break;
        }
        path.push(prev);
        node = prev;
    }
    path.push(origin);
    path.reverse();
    path
}
