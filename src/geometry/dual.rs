//! Dual (Voronoi) edges of a triangulation.
//!
//! Every pair of adjacent cells contributes the segment between their
//! circumcenters. Every boundary side contributes a ray from the cell's
//! circumcenter through the side midpoint, pointed away from the mesh and
//! stretched by [`BOUNDARY_RAY_FACTOR`] so it leaves the canvas.

use crate::geometry::{circumcenter, is_left};
use crate::topology::mesh::Mesh;
use crate::topology::point::Point;

/// Length multiplier for rays on boundary sides.
pub const BOUNDARY_RAY_FACTOR: f64 = 100.0;

/// One edge of the dual diagram.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DualEdge {
    pub from: Point,
    pub to: Point,
    /// `true` for rays emitted on mesh boundary sides.
    pub unbounded: bool,
}

/// Collect the dual edges of `mesh`, each interior adjacency once.
pub fn voronoi_edges(mesh: &Mesh) -> Vec<DualEdge> {
    let centers: Vec<Point> = mesh.cells().iter().map(|c| circumcenter(&c.vertices)).collect();
    let mut out = Vec::with_capacity(mesh.len() * 3 / 2 + 1);

    for (id, cell) in mesh.iter() {
        let from = centers[id.index()];
        for slot in 0..3 {
            match cell.neighbors[slot] {
                Some(nb) if id < nb => out.push(DualEdge {
                    from,
                    to: centers[nb.index()],
                    unbounded: false,
                }),
                Some(_) => {}
                None => {
                    let (s0, s1) = cell.side(slot);
                    // Flip when the circumcenter sits on the opposite side of
                    // the boundary edge from the cell interior.
                    let factor = BOUNDARY_RAY_FACTOR
                        * is_left(s0, s1, from)
                        * is_left(s0, s1, cell.centroid());
                    let dir = s0.midpoint(s1) - from;
                    out.push(DualEdge {
                        from,
                        to: from + dir * factor,
                        unbounded: true,
                    });
                }
            }
        }
    }
    out
}
