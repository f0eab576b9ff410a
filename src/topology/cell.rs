//! `CellId` and `Cell`: triangular faces stored by value in the mesh arena.
//!
//! A cell is plain data: three vertex positions, three neighbor slots and a
//! write-once elevation. Neighbors are arena indices, never references, so a
//! mesh can be cloned, shared read-only, or replaced wholesale.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::topology::point::Point;

/// Index of a cell inside its [`Mesh`](crate::topology::mesh::Mesh).
///
/// `repr(transparent)` over `u32`; the arena never holds more than
/// `u32::MAX` cells.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct CellId(u32);

impl CellId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        CellId(raw)
    }

    /// Arena position of this cell.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CellId").field(&self.0).finish()
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One triangular face of the mesh.
///
/// `neighbors[i]` is the cell across the side opposite `vertices[i]`, or
/// `None` on the mesh boundary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub vertices: [Point; 3],
    pub neighbors: [Option<CellId>; 3],
    /// Normalized elevation in `[0, 1]`; NaN until the elevation pass runs.
    pub elevation: f64,
}

impl Cell {
    pub fn new(vertices: [Point; 3], neighbors: [Option<CellId>; 3]) -> Self {
        Cell {
            vertices,
            neighbors,
            elevation: f64::NAN,
        }
    }

    /// Arithmetic mean of the three vertices.
    #[inline]
    pub fn centroid(&self) -> Point {
        crate::geometry::centroid(&self.vertices)
    }

    #[inline]
    pub fn has_elevation(&self) -> bool {
        !self.elevation.is_nan()
    }

    /// The two endpoints of the side opposite vertex `slot`.
    #[inline]
    pub fn side(&self, slot: usize) -> (Point, Point) {
        (
            self.vertices[(slot + 1) % 3],
            self.vertices[(slot + 2) % 3],
        )
    }

    /// Slots with no neighbor, i.e. sides on the mesh boundary.
    pub fn boundary_slots(&self) -> impl Iterator<Item = usize> + '_ {
        (0..3).filter(|&i| self.neighbors[i].is_none())
    }
}

#[cfg(test)]
mod layout_tests {
    use super::*;
    use static_assertions::assert_eq_size;

    assert_eq_size!(CellId, u32);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cell() -> Cell {
        Cell::new(
            [
                Point::new(0.0, 0.0),
                Point::new(3.0, 0.0),
                Point::new(0.0, 3.0),
            ],
            [None, Some(CellId::new(4)), None],
        )
    }

    #[test]
    fn new_cell_has_no_elevation() {
        let c = unit_cell();
        assert!(!c.has_elevation());
    }

    #[test]
    fn centroid_is_vertex_mean() {
        assert_eq!(unit_cell().centroid(), Point::new(1.0, 1.0));
    }

    #[test]
    fn side_is_opposite_vertex() {
        let c = unit_cell();
        assert_eq!(c.side(0), (Point::new(3.0, 0.0), Point::new(0.0, 3.0)));
        assert_eq!(c.side(2), (Point::new(0.0, 0.0), Point::new(3.0, 0.0)));
        assert_eq!(c.boundary_slots().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn cell_id_formatting() {
        let id = CellId::new(9);
        assert_eq!(format!("{id}"), "9");
        assert_eq!(format!("{id:?}"), "CellId(9)");
        assert_eq!(id.index(), 9);
    }
}
