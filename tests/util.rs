#![allow(dead_code)]
use mapgen_core::algs::elevation::{NoiseConfig, NoiseOracle};
use mapgen_core::mesh_generation::grid_mesh;
use mapgen_core::topology::{Mesh, Point};

pub fn p(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// `nx`×`ny` unit squares from the origin.
pub fn grid(nx: usize, ny: usize) -> Mesh {
    grid_mesh(nx, ny, p(0.0, 0.0), p(nx as f64, ny as f64)).unwrap()
}

/// Elevate each cell of `mesh` by `f(centroid)`.
pub fn elevate(mesh: &mut Mesh, f: impl Fn(Point) -> f64) {
    let elevations: Vec<f64> = mesh.cells().iter().map(|c| f(c.centroid())).collect();
    mesh.set_elevations(&elevations).unwrap();
}

/// Two hexagonal rings around the origin: six fan cells (ids 0..6) inside
/// radius 1 and twelve ring cells (ids 6..18) out to radius 2.
pub fn hexagon_island() -> Mesh {
    let ring = |r: f64, k: usize| {
        let a = std::f64::consts::FRAC_PI_3 * k as f64;
        p(r * a.cos(), r * a.sin())
    };
    let mut points = vec![p(0.0, 0.0)];
    points.extend((0..6).map(|k| ring(1.0, k)));
    points.extend((0..6).map(|k| ring(2.0, k)));

    let inner = |k: usize| 1 + k % 6;
    let outer = |k: usize| 7 + k % 6;
    let mut tris = Vec::new();
    for k in 0..6 {
        tris.push([0, inner(k), inner(k + 1)]);
    }
    for k in 0..6 {
        tris.push([inner(k), outer(k), outer(k + 1)]);
        tris.push([inner(k), outer(k + 1), inner(k + 1)]);
    }
    Mesh::from_triangles(points, &tris).unwrap()
}

/// Raw noise `-1 + x / 5`: gray 0 at `x = 0`, white at `x = 10`.
pub struct Ramp;

impl NoiseOracle for Ramp {
    fn configure(_: &NoiseConfig) -> Self {
        Ramp
    }
    fn sample(&self, x: f64, _y: f64) -> f64 {
        x / 5.0 - 1.0
    }
}

/// Always NaN.
pub struct Broken;

impl NoiseOracle for Broken {
    fn configure(_: &NoiseConfig) -> Self {
        Broken
    }
    fn sample(&self, _x: f64, _y: f64) -> f64 {
        f64::NAN
    }
}

/// Assert `got` holds the same points as `want`, in order or reversed.
pub fn assert_polyline(got: &[Point], want: &[Point]) {
    let mut rev = want.to_vec();
    rev.reverse();
    assert!(
        got == want || got == rev.as_slice(),
        "polyline mismatch\n got={:?}\nwant={:?}",
        got,
        want
    );
}
