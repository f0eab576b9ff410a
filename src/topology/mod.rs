//! Mesh topology: points, cells and the cell arena.
//!
//! - [`point`]: planar points and relative-epsilon equality
//! - [`cell`]: `CellId` handles and triangular `Cell` values
//! - [`mesh`]: the `Mesh` arena with neighbor slots and elevations

pub mod cell;
pub mod mesh;
pub mod point;

pub use cell::{Cell, CellId};
pub use mesh::Mesh;
pub use point::{Point, about_equal};
