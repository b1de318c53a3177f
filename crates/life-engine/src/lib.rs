//! Game of Life simulation engine.
//!
//! This crate implements the bounded 2D grid, the B3/S23 transition rule, the
//! double-buffered generation engine and the plain-text grid format.

pub mod grid;
pub mod rule;
pub mod simulation;
pub mod codec;

pub use grid::Grid;
pub use simulation::GameOfLife;
pub use codec::{read_grid, write_grid};
