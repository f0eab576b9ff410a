//! Planar geometry helpers for triangular cells.
//!
//! All routines take vertices by value and never fail; degenerate input
//! (collinear triangles) yields non-finite results the caller must check.

pub mod dual;

use crate::topology::point::Point;

/// Arithmetic mean of the vertices.
#[inline]
pub fn centroid(vertices: &[Point; 3]) -> Point {
    Point::new(
        (vertices[0].x + vertices[1].x + vertices[2].x) / 3.0,
        (vertices[0].y + vertices[1].y + vertices[2].y) / 3.0,
    )
}

/// Twice the signed area; positive for counter-clockwise vertices.
#[inline]
pub fn signed_area2(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// `1` if `c` lies strictly left of the directed line `a -> b`, else `-1`.
#[inline]
pub fn is_left(a: Point, b: Point, c: Point) -> f64 {
    if signed_area2(a, b, c) > 0.0 { 1.0 } else { -1.0 }
}

fn det3(m: &[[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[2][1] * m[1][2])
        - m[0][1] * (m[1][0] * m[2][2] - m[2][0] * m[1][2])
        + m[0][2] * (m[1][0] * m[2][1] - m[2][0] * m[1][1])
}

/// Center of the circle through the three vertices.
///
/// Determinant form: with `a = |x y 1|`, `dx = -|s y 1|`, `dy = |s x 1|`
/// where `s = x² + y²`, the center is `(-dx / 2a, -dy / 2a)`.
pub fn circumcenter(vertices: &[Point; 3]) -> Point {
    let mut m = [[0.0; 3]; 3];
    for (row, p) in m.iter_mut().zip(vertices) {
        *row = [p.x, p.y, 1.0];
    }
    let a = det3(&m);

    for (row, p) in m.iter_mut().zip(vertices) {
        row[0] = p.length_squared();
    }
    let dx = -det3(&m);

    for (row, p) in m.iter_mut().zip(vertices) {
        row[1] = p.x;
    }
    let dy = det3(&m);

    let s = -1.0 / (2.0 * a);
    Point::new(s * dx, s * dy)
}

/// Squared circumradius paired with the circumcenter.
pub fn circumcircle(vertices: &[Point; 3]) -> (Point, f64) {
    let c = circumcenter(vertices);
    let r2 = (vertices[0] - c).length_squared();
    (c, r2)
}
