//! `Mesh`: the cell arena for one generated point set.
//!
//! The mesh is immutable per generation except for the per-cell elevation,
//! which the elevation pass writes for all cells at once through
//! [`Mesh::set_elevations`]. Neighbor slots follow the opposite-vertex
//! convention: slot `i` names the cell across the side that does not touch
//! vertex `i`.

use hashbrown::HashMap;

use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MapgenError;
use crate::topology::cell::{Cell, CellId};
use crate::topology::point::Point;

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    points: Vec<Point>,
    cells: Vec<Cell>,
}

impl Mesh {
    /// Build a mesh from a point set and triangles given as point indices.
    ///
    /// Neighbor slots are derived by matching sides on their (unordered)
    /// endpoint indices. Triangles that repeat an index and sides shared by
    /// more than two triangles are rejected.
    pub fn from_triangles(
        points: Vec<Point>,
        triangles: &[[usize; 3]],
    ) -> Result<Self, MapgenError> {
        if triangles.len() > u32::MAX as usize {
            return Err(MapgenError::MeshConstruction(format!(
                "{} triangles exceed the cell arena capacity",
                triangles.len()
            )));
        }

        let mut cells = Vec::with_capacity(triangles.len());
        for (cell_idx, tri) in triangles.iter().enumerate() {
            if let Some(k) = (0..3).find(|&k| tri[k] == tri[(k + 1) % 3]) {
                return Err(MapgenError::RepeatedVertex {
                    cell: cell_idx,
                    vertex: tri[k],
                });
            }
            let mut vertices = [Point::default(); 3];
            for (slot, &vidx) in tri.iter().enumerate() {
                vertices[slot] = *points.get(vidx).ok_or(MapgenError::VertexOutOfRange {
                    cell: cell_idx,
                    vertex: vidx,
                })?;
            }
            cells.push(Cell::new(vertices, [None; 3]));
        }

        // side (sorted endpoint indices) -> first (cell, slot) seen
        let mut first_owner: HashMap<(usize, usize), (usize, usize)> =
            HashMap::with_capacity(triangles.len() * 3 / 2 + 1);
        for (cell_idx, tri) in triangles.iter().enumerate() {
            for slot in 0..3 {
                let u = tri[(slot + 1) % 3];
                let v = tri[(slot + 2) % 3];
                let key = (u.min(v), u.max(v));
                match first_owner.get(&key).copied() {
                    None => {
                        first_owner.insert(key, (cell_idx, slot));
                    }
                    Some((other_idx, other_slot)) => {
                        if cells[other_idx].neighbors[other_slot].is_some() {
                            return Err(MapgenError::NonManifoldEdge { a: key.0, b: key.1 });
                        }
                        cells[other_idx].neighbors[other_slot] = Some(CellId::new(cell_idx as u32));
                        cells[cell_idx].neighbors[slot] = Some(CellId::new(other_idx as u32));
                    }
                }
            }
        }

        let mesh = Mesh { points, cells };
        crate::debug_invariants!(mesh.validate_invariants(), "Mesh::from_triangles");
        Ok(mesh)
    }

    /// Wrap externally built cells, checking neighbor consistency.
    pub fn from_cells(points: Vec<Point>, cells: Vec<Cell>) -> Result<Self, MapgenError> {
        let mesh = Mesh { points, cells };
        mesh.validate_invariants()?;
        Ok(mesh)
    }

    /// The generating point set.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id.index())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellId, &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, c)| (CellId::new(i as u32), c))
    }

    /// Every interior side once, as `(lower id, higher id)`.
    pub fn adjacent_pairs(&self) -> impl Iterator<Item = (CellId, CellId)> + '_ {
        self.iter().flat_map(|(id, cell)| {
            cell.neighbors
                .into_iter()
                .flatten()
                .filter(move |&nb| id < nb)
                .map(move |nb| (id, nb))
        })
    }

    /// Write every cell's elevation in one go.
    ///
    /// Fails without touching the mesh unless exactly one value per cell is
    /// given.
    pub fn set_elevations(&mut self, elevations: &[f64]) -> Result<(), MapgenError> {
        if elevations.len() != self.cells.len() {
            return Err(MapgenError::ElevationLengthMismatch {
                expected: self.cells.len(),
                got: elevations.len(),
            });
        }
        for (cell, &e) in self.cells.iter_mut().zip(elevations) {
            cell.elevation = e;
        }
        Ok(())
    }

    pub fn elevations(&self) -> Vec<f64> {
        self.cells.iter().map(|c| c.elevation).collect()
    }

    /// Reset every elevation to NaN.
    pub fn clear_elevations(&mut self) {
        for cell in &mut self.cells {
            cell.elevation = f64::NAN;
        }
    }
}

impl DebugInvariants for Mesh {
    fn validate_invariants(&self) -> Result<(), MapgenError> {
        let n = self.cells.len();
        for (id, cell) in self.iter() {
            for slot in 0..3 {
                let Some(nb) = cell.neighbors[slot] else {
                    continue;
                };
                let mismatch = MapgenError::NeighborMismatch { cell: id, slot };
                if nb.index() >= n || nb == id {
                    return Err(mismatch);
                }
                let other = &self.cells[nb.index()];
                // The neighbor must point back across a side with the same
                // two endpoints.
                let (a0, a1) = cell.side(slot);
                let back = (0..3).find(|&s| {
                    if other.neighbors[s] != Some(id) {
                        return false;
                    }
                    let (b0, b1) = other.side(s);
                    (a0.about_eq(&b0) && a1.about_eq(&b1)) || (a0.about_eq(&b1) && a1.about_eq(&b0))
                });
                if back.is_none() {
                    return Err(mismatch);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_points() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ]
    }

    #[test]
    fn neighbors_follow_opposite_vertex_convention() {
        let mesh = Mesh::from_triangles(square_points(), &[[0, 1, 2], [0, 2, 3]]).unwrap();
        assert_eq!(mesh.len(), 2);
        // side opposite vertex 1 of cell 0 is (2, 0)
        assert_eq!(mesh.cells()[0].neighbors, [None, Some(CellId::new(1)), None]);
        // side opposite vertex 2 of cell 1 is (0, 2)
        assert_eq!(mesh.cells()[1].neighbors, [None, None, Some(CellId::new(0))]);
        assert!(mesh.validate_invariants().is_ok());
    }

    #[test]
    fn repeated_index_is_an_error() {
        assert_eq!(
            Mesh::from_triangles(square_points(), &[[0, 0, 1]]).unwrap_err(),
            MapgenError::RepeatedVertex { cell: 0, vertex: 0 }
        );
        assert_eq!(
            Mesh::from_triangles(square_points(), &[[0, 1, 2], [3, 2, 3]]).unwrap_err(),
            MapgenError::RepeatedVertex { cell: 1, vertex: 3 }
        );
    }

    #[test]
    fn adjacent_pairs_lists_each_side_once() {
        let mesh = Mesh::from_triangles(square_points(), &[[0, 1, 2], [0, 2, 3]]).unwrap();
        let pairs: Vec<_> = mesh.adjacent_pairs().collect();
        assert_eq!(pairs, vec![(CellId::new(0), CellId::new(1))]);
    }

    #[test]
    fn missing_vertex_is_rejected() {
        let err = Mesh::from_triangles(square_points(), &[[0, 1, 7]]).unwrap_err();
        assert_eq!(err, MapgenError::VertexOutOfRange { cell: 0, vertex: 7 });
    }

    #[test]
    fn non_manifold_side_is_rejected() {
        let mut points = square_points();
        points.push(Point::new(2.0, 0.5));
        let err = Mesh::from_triangles(points, &[[0, 1, 2], [0, 2, 3], [0, 2, 4]]).unwrap_err();
        assert_eq!(err, MapgenError::NonManifoldEdge { a: 0, b: 2 });
    }

    #[test]
    fn elevations_are_written_all_or_nothing() {
        let mut mesh = Mesh::from_triangles(square_points(), &[[0, 1, 2], [0, 2, 3]]).unwrap();
        assert!(mesh.set_elevations(&[0.5]).is_err());
        assert!(mesh.cells().iter().all(|c| !c.has_elevation()));
        mesh.set_elevations(&[0.25, 0.75]).unwrap();
        assert_eq!(mesh.elevations(), vec![0.25, 0.75]);
        mesh.clear_elevations();
        assert!(mesh.cells().iter().all(|c| !c.has_elevation()));
    }

    #[test]
    fn from_cells_rejects_one_sided_neighbors() {
        let pts = square_points();
        let a = Cell::new([pts[0], pts[1], pts[2]], [None, Some(CellId::new(1)), None]);
        let b = Cell::new([pts[0], pts[2], pts[3]], [None, None, None]);
        let err = Mesh::from_cells(pts, vec![a, b]).unwrap_err();
        assert_eq!(
            err,
            MapgenError::NeighborMismatch {
                cell: CellId::new(0),
                slot: 1
            }
        );
    }
}
