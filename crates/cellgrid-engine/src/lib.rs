//! cellgrid_engine - Cell model + Rhai formula evaluation.

pub mod engine;
