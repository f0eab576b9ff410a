//! Point-set and mesh generators.
//!
//! The pipeline consumes meshes through the [`MeshProvider`] trait, so the
//! triangulation backend is swappable. [`BowyerWatson`] is the built-in
//! provider; [`grid_mesh`] builds structured triangle grids with known
//! topology for tests and benchmarks.

pub mod delaunay;

pub use delaunay::BowyerWatson;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::mesh_error::MapgenError;
use crate::topology::mesh::Mesh;
use crate::topology::point::Point;

/// Anything that turns a planar point set into a triangle mesh.
pub trait MeshProvider {
    /// Build a mesh over `points`.
    ///
    /// Errors describe why the point set was rejected (too few points,
    /// duplicates, collinear input, ...).
    fn build_mesh(&self, points: &[Point]) -> Result<Mesh, MapgenError>;
}

impl<P: MeshProvider + ?Sized> MeshProvider for &P {
    #[inline]
    fn build_mesh(&self, points: &[Point]) -> Result<Mesh, MapgenError> {
        (**self).build_mesh(points)
    }
}

impl<P: MeshProvider + ?Sized> MeshProvider for Box<P> {
    #[inline]
    fn build_mesh(&self, points: &[Point]) -> Result<Mesh, MapgenError> {
        (**self).build_mesh(points)
    }
}

/// `count` uniform points in `[0, width) × [0, height)`.
///
/// The same `seed` always yields the same point set.
pub fn random_points(
    count: usize,
    width: f64,
    height: f64,
    seed: u64,
) -> Result<Vec<Point>, MapgenError> {
    if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
        return Err(MapgenError::InvalidParameter(format!(
            "canvas must have a positive finite size, got {width}×{height}"
        )));
    }
    let mut rng = SmallRng::seed_from_u64(seed);
    Ok((0..count)
        .map(|_| Point::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height)))
        .collect())
}

/// Structured grid of `nx`×`ny` squares over `[min, max]`, each square split
/// along its `(i, j) -> (i+1, j+1)` diagonal into two triangles.
///
/// Cells are emitted square by square, row-major from `min`; square
/// `(i, j)` owns cells `2 * (j * nx + i)` (below the diagonal) and
/// `2 * (j * nx + i) + 1` (above it).
pub fn grid_mesh(nx: usize, ny: usize, min: Point, max: Point) -> Result<Mesh, MapgenError> {
    if nx == 0 || ny == 0 {
        return Err(MapgenError::InvalidParameter(format!(
            "grid needs at least one square per axis, got {nx}×{ny}"
        )));
    }
    if !(min.is_finite() && max.is_finite() && max.x > min.x && max.y > min.y) {
        return Err(MapgenError::InvalidParameter(format!(
            "grid bounds must be finite and increasing, got {min:?}..{max:?}"
        )));
    }

    let hx = (max.x - min.x) / nx as f64;
    let hy = (max.y - min.y) / ny as f64;
    let mut points = Vec::with_capacity((nx + 1) * (ny + 1));
    for j in 0..=ny {
        for i in 0..=nx {
            points.push(Point::new(min.x + i as f64 * hx, min.y + j as f64 * hy));
        }
    }

    let vid = |i: usize, j: usize| j * (nx + 1) + i;
    let mut triangles = Vec::with_capacity(2 * nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            let (v00, v10, v11, v01) = (vid(i, j), vid(i + 1, j), vid(i + 1, j + 1), vid(i, j + 1));
            triangles.push([v00, v10, v11]);
            triangles.push([v00, v11, v01]);
        }
    }
    Mesh::from_triangles(points, &triangles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug_invariants::DebugInvariants;

    #[test]
    fn random_points_are_seeded_and_in_bounds() {
        let a = random_points(50, 800.0, 600.0, 42).unwrap();
        let b = random_points(50, 800.0, 600.0, 42).unwrap();
        let c = random_points(50, 800.0, 600.0, 43).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(
            a.iter()
                .all(|p| (0.0..800.0).contains(&p.x) && (0.0..600.0).contains(&p.y))
        );
    }

    #[test]
    fn random_points_rejects_empty_canvas() {
        assert!(matches!(
            random_points(3, 0.0, 10.0, 1),
            Err(MapgenError::InvalidParameter(_))
        ));
    }

    #[test]
    fn grid_mesh_counts_and_adjacency() {
        let mesh = grid_mesh(3, 2, Point::new(0.0, 0.0), Point::new(3.0, 2.0)).unwrap();
        assert_eq!(mesh.points().len(), 12);
        assert_eq!(mesh.len(), 12);
        // interior sides: 3*2 diagonals + 2*2 vertical + 3*1 horizontal
        assert_eq!(mesh.adjacent_pairs().count(), 13);
        assert!(mesh.validate_invariants().is_ok());
    }

    #[test]
    fn grid_mesh_rejects_bad_bounds() {
        assert!(grid_mesh(0, 1, Point::new(0.0, 0.0), Point::new(1.0, 1.0)).is_err());
        assert!(grid_mesh(1, 1, Point::new(1.0, 0.0), Point::new(1.0, 1.0)).is_err());
    }
}
