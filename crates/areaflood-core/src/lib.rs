//! **areaflood-core**: grid and cell types for cellular-automaton area
//! estimation.
//!
//! A shape is drawn on a square [`Grid`] by painting [`Cell`]s as boundary
//! and marking one start point inside it. The estimator crate floods the
//! grid from that start point; this crate owns the data it floods over:
//! the cell state machine, the von Neumann topology and the shared grid
//! handle.

pub mod cell;
pub mod geom;
pub mod grid;
pub mod shape;

pub use cell::{Cell, CellState};
pub use geom::{Neighborhood, Point, von_neumann};
pub use grid::{Grid, GridConfig, GridError, MAX_SIZE};
pub use shape::{Shape, ShapeError};
