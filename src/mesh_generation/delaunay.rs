//! Incremental 2D Delaunay triangulation (Bowyer–Watson).
//!
//! Points are inserted in input order into a super-triangle that encloses
//! the bounding box. Each insertion removes every triangle whose circumcircle
//! contains the new point and re-fans the cavity boundary to it. Triangles
//! touching a super-vertex are discarded at the end.

use hashbrown::HashMap;
use itertools::Itertools;

use crate::geometry::{circumcircle, signed_area2};
use crate::mesh_error::MapgenError;
use crate::mesh_generation::MeshProvider;
use crate::topology::mesh::Mesh;
use crate::topology::point::{Point, about_equal};

/// Super-triangle size relative to the bounding box.
const SUPER_SCALE: f64 = 20.0;

/// Built-in [`MeshProvider`].
#[derive(Clone, Copy, Debug, Default)]
pub struct BowyerWatson;

impl MeshProvider for BowyerWatson {
    fn build_mesh(&self, points: &[Point]) -> Result<Mesh, MapgenError> {
        let triangles = triangulate(points)?;
        log::debug!(
            "triangulated {} points into {} cells",
            points.len(),
            triangles.len()
        );
        Mesh::from_triangles(points.to_vec(), &triangles)
    }
}

#[derive(Clone, Copy, Debug)]
struct Tri {
    v: [usize; 3],
    center: Point,
    r2: f64,
}

impl Tri {
    fn new(v: [usize; 3], verts: &[Point]) -> Self {
        let (center, r2) = circumcircle(&[verts[v[0]], verts[v[1]], verts[v[2]]]);
        if center.is_finite() && r2.is_finite() {
            Tri { v, center, r2 }
        } else {
            // Collinear: always treated as bad so the next insertion nearby
            // replaces it.
            Tri {
                v,
                center: verts[v[0]],
                r2: f64::INFINITY,
            }
        }
    }

    #[inline]
    fn circumcircle_contains(&self, p: Point) -> bool {
        (p - self.center).length_squared() < self.r2
    }
}

fn check_input(points: &[Point]) -> Result<(), MapgenError> {
    if points.len() < 3 {
        return Err(MapgenError::TooFewPoints { got: points.len() });
    }
    if let Some(index) = points.iter().position(|p| !p.is_finite()) {
        return Err(MapgenError::NonFinitePoint { index });
    }
    let order = (0..points.len())
        .sorted_by(|&a, &b| {
            points[a]
                .x
                .total_cmp(&points[b].x)
                .then(points[a].y.total_cmp(&points[b].y))
        })
        .collect_vec();
    // Approximate matches need not be sort neighbors; scan the run of
    // points whose x is approximately equal.
    for (k, &a) in order.iter().enumerate() {
        let mut run = order[k + 1..]
            .iter()
            .take_while(|&&b| about_equal(points[a].x, points[b].x));
        if let Some(&b) = run.find(|&&b| points[a].about_eq(&points[b])) {
            return Err(MapgenError::DuplicatePoint {
                first: a.min(b),
                second: a.max(b),
            });
        }
    }
    Ok(())
}

/// Triangulate `points`, returning triangles as point indices.
pub fn triangulate(points: &[Point]) -> Result<Vec<[usize; 3]>, MapgenError> {
    check_input(points)?;
    let n = points.len();

    let (mut lo, mut hi) = (points[0], points[0]);
    for p in points {
        lo = Point::new(lo.x.min(p.x), lo.y.min(p.y));
        hi = Point::new(hi.x.max(p.x), hi.y.max(p.y));
    }
    let delta = (hi.x - lo.x).max(hi.y - lo.y).max(f64::MIN_POSITIVE);
    let mid = lo.midpoint(hi);

    let mut verts = points.to_vec();
    verts.push(Point::new(mid.x - SUPER_SCALE * delta, mid.y - delta));
    verts.push(Point::new(mid.x, mid.y + SUPER_SCALE * delta));
    verts.push(Point::new(mid.x + SUPER_SCALE * delta, mid.y - delta));

    let mut tris = vec![Tri::new([n, n + 1, n + 2], &verts)];
    let mut edge_count: HashMap<(usize, usize), usize> = HashMap::new();

    for i in 0..n {
        let p = verts[i];
        let (bad, good): (Vec<Tri>, Vec<Tri>) =
            tris.into_iter().partition(|t| t.circumcircle_contains(p));
        tris = good;

        // Cavity boundary: sides of bad triangles not shared with another
        // bad triangle.
        edge_count.clear();
        for t in &bad {
            for k in 0..3 {
                let (a, b) = (t.v[k], t.v[(k + 1) % 3]);
                *edge_count.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }
        for t in &bad {
            for k in 0..3 {
                let (a, b) = (t.v[k], t.v[(k + 1) % 3]);
                if edge_count[&(a.min(b), a.max(b))] == 1 {
                    tris.push(Tri::new([a, b, i], &verts));
                }
            }
        }
    }

    let scale = delta * delta;
    let out: Vec<[usize; 3]> = tris
        .into_iter()
        .filter(|t| t.v.iter().all(|&v| v < n))
        .filter(|t| {
            let area = signed_area2(verts[t.v[0]], verts[t.v[1]], verts[t.v[2]]);
            area.abs() > scale * 1e-14
        })
        .map(|t| t.v)
        .collect();

    if out.is_empty() {
        return Err(MapgenError::DegenerateTriangulation);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug_invariants::DebugInvariants;
    use crate::geometry::circumcircle;
    use crate::mesh_generation::random_points;

    #[test]
    fn single_triangle() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(0.0, 3.0),
        ];
        let tris = triangulate(&pts).unwrap();
        assert_eq!(tris.len(), 1);
        let mut v = tris[0];
        v.sort_unstable();
        assert_eq!(v, [0, 1, 2]);
    }

    #[test]
    fn rejects_degenerate_inputs() {
        let two = [Point::new(0.0, 0.0), Point::new(1.0, 0.0)];
        assert_eq!(triangulate(&two), Err(MapgenError::TooFewPoints { got: 2 }));

        let dup = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 0.0),
        ];
        assert_eq!(
            triangulate(&dup),
            Err(MapgenError::DuplicatePoint { first: 0, second: 2 })
        );

        // (1, 6) sorts between the two copies of (1, 5)
        let hidden = [
            Point::new(1.0, 5.0),
            Point::new(1.0, 6.0),
            Point::new(f64::from_bits(1.0f64.to_bits() + 1), 5.0),
            Point::new(3.0, 0.0),
            Point::new(3.0, 9.0),
            Point::new(-2.0, 4.0),
        ];
        assert_eq!(
            triangulate(&hidden),
            Err(MapgenError::DuplicatePoint { first: 0, second: 2 })
        );

        let nan = [
            Point::new(0.0, 0.0),
            Point::new(f64::NAN, 0.0),
            Point::new(0.0, 1.0),
        ];
        assert_eq!(triangulate(&nan), Err(MapgenError::NonFinitePoint { index: 1 }));

        let line = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.0),
            Point::new(3.0, 3.0),
        ];
        assert_eq!(triangulate(&line), Err(MapgenError::DegenerateTriangulation));
    }

    #[test]
    fn random_set_is_delaunay_and_consistent() {
        let pts = random_points(60, 800.0, 600.0, 7).unwrap();
        let mesh = BowyerWatson.build_mesh(&pts).unwrap();
        assert!(!mesh.is_empty());
        assert!(mesh.validate_invariants().is_ok());

        // Empty-circumcircle property, with slack for rounding.
        for cell in mesh.cells() {
            let (c, r2) = circumcircle(&cell.vertices);
            for p in pts.iter().filter(|p| !cell.vertices.contains(*p)) {
                let d2 = (*p - c).length_squared();
                assert!(d2 >= r2 * (1.0 - 1e-9), "point {p:?} inside circumcircle");
            }
        }
    }

    #[test]
    fn every_cell_uses_input_points() {
        let pts = random_points(25, 100.0, 100.0, 3).unwrap();
        let mesh = BowyerWatson.build_mesh(&pts).unwrap();
        for cell in mesh.cells() {
            for v in &cell.vertices {
                assert!(pts.iter().any(|p| p == v));
            }
        }
    }
}
