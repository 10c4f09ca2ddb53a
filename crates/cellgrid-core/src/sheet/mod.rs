//! Sheet state and logic.

mod area;
mod graph;
mod ops;
mod print;
mod state;
mod storage;
mod view;

pub use graph::DependencyGraph;
pub use state::Sheet;
pub use view::CellView;
