//! `Point`: a planar coordinate pair and its approximate equality.
//!
//! Mesh vertices are copied by value into every cell that uses them, so the
//! same geometric vertex shows up in several places. Copies made through
//! independent floating-point paths may differ in the last bits, which is why
//! matching goes through [`Point::about_eq`] rather than `==`.
//!
//! This module provides:
//! - A `#[repr(C)]` `Point` that is `Pod`, so point slices can be handed to a
//!   renderer as raw bytes.
//! - [`about_equal`], the relative-epsilon scalar comparison.
//! - A handful of vector operators used by the geometry helpers.

use std::fmt;
use std::ops::{Add, Mul, Sub};

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Relative tolerance used by [`about_equal`].
pub const REL_EPS: f64 = 1e-15;

/// Compare two scalars with a tolerance scaled by the larger magnitude.
///
/// `about_equal(a, a)` holds for every non-NaN `a` and the relation is
/// symmetric. Zero only matches zero.
#[inline]
pub fn about_equal(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    (a - b).abs() <= a.abs().max(b.abs()) * REL_EPS
}

/// A point in the plane.
///
/// The derived `PartialEq` is exact; use [`Point::about_eq`] to match
/// vertices shared between cells.
#[derive(Copy, Clone, Default, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Both coordinates approximately equal.
    #[inline]
    pub fn about_eq(&self, other: &Point) -> bool {
        about_equal(self.x, other.x) && about_equal(self.y, other.y)
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Single-precision copy for render buffers.
    #[inline]
    pub fn to_f32(self) -> [f32; 2] {
        [self.x as f32, self.y as f32]
    }

    #[inline]
    pub fn midpoint(self, other: Point) -> Point {
        Point::new(0.5 * (self.x + other.x), 0.5 * (self.y + other.y))
    }

    #[inline]
    pub fn length_squared(self) -> f64 {
        self.x * self.x + self.y * self.y
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(f64, f64)> for Point {
    #[inline]
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

impl From<[f64; 2]> for Point {
    #[inline]
    fn from([x, y]: [f64; 2]) -> Self {
        Point::new(x, y)
    }
}

impl Add for Point {
    type Output = Point;
    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    #[inline]
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}
