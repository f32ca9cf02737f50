//! Static placement of scene content.
//!
//! Everything here is a pure function of its parameters: pillar rows and
//! arrays, node rings, matrix cells, and the relative placement helpers
//! scenes use to put labels next to figures or against the frame edges.

mod arrange;
mod grid;
mod matrix;
mod ring;

pub use arrange::{Direction, arrange, next_to, to_corner, to_edge};
pub use grid::{ArraySpec, PillarArray, generate_grid};
pub use matrix::matrix_cells;
pub use ring::regular_polygon;
