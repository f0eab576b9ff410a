//! Threshold contours over cell elevations (coastlines).
//!
//! Extraction runs in two stages:
//!
//! 1. **Crossing detection.** Every interior side whose two cells fall on
//!    opposite sides of the threshold yields a [`CrossingSegment`] between
//!    the side's two endpoints. The class test is `elevation <= threshold`,
//!    evaluated identically for both cells, so a tie always counts as
//!    "below" and swapping the cells never changes the outcome.
//! 2. **Stitching.** Each segment is split into two [`Stub`]s in a
//!    [`StubArena`]; a stub knows its point and the arena index of its pair.
//!    Chains are grown from a seed segment by repeatedly finding a live stub
//!    at the chain's current end, consuming it with its pair, and extending
//!    the chain by the pair's point.
//!
//! # Junctions
//! Where three or more segments meet at one point the choice of which
//! segment continues a chain is not topologically meaningful. The policy
//! here is fixed: seeds and continuations always take the live stub with the
//! lowest arena index, so the same mesh and threshold always give the same
//! contours.
//!
//! # Closed loops
//! A loop comes out as a chain whose first and last points coincide. No flag
//! is stored; [`Contour::is_closed`] compares the endpoints.

use std::collections::VecDeque;

use crate::mesh_error::MapgenError;
use crate::topology::cell::{Cell, CellId};
use crate::topology::mesh::Mesh;
use crate::topology::point::Point;

/// `true` when `a` and `b` lie on opposite sides of `threshold`.
///
/// Symmetric in `a` and `b`. NaN elevations compare as "above" here, so
/// callers must filter unsampled cells first.
#[inline]
pub fn is_crossing(a: f64, b: f64, threshold: f64) -> bool {
    (a <= threshold) != (b <= threshold)
}

/// A mesh side separating a below-threshold cell from an above-threshold
/// one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CrossingSegment {
    /// Lower-id cell of the pair.
    pub a: CellId,
    /// Higher-id cell of the pair.
    pub b: CellId,
    pub start: Point,
    pub end: Point,
}

/// The two vertices `a` and `b` have in common, in `a`'s vertex order.
///
/// Fails unless exactly two vertices match, which means the cells are not
/// consistent neighbors.
pub fn shared_side(
    a_id: CellId,
    a: &Cell,
    b_id: CellId,
    b: &Cell,
) -> Result<(Point, Point), MapgenError> {
    let mut shared = [Point::default(); 3];
    let mut found = 0;
    for va in &a.vertices {
        if b.vertices.iter().any(|vb| va.about_eq(vb)) {
            if found < shared.len() {
                shared[found] = *va;
            }
            found += 1;
        }
    }
    if found != 2 {
        return Err(MapgenError::SharedVertexMismatch {
            a: a_id,
            b: b_id,
            found,
        });
    }
    Ok((shared[0], shared[1]))
}

/// Every crossing side of `mesh` at `threshold`, ordered by lower cell id
/// then neighbor slot.
///
/// Sides touching a cell without an elevation are skipped.
pub fn crossing_segments(mesh: &Mesh, threshold: f64) -> Result<Vec<CrossingSegment>, MapgenError> {
    let cells = mesh.cells();
    let mut out = Vec::new();
    for (a, b) in mesh.adjacent_pairs() {
        let (ca, cb) = (&cells[a.index()], &cells[b.index()]);
        if !(ca.has_elevation() && cb.has_elevation()) {
            continue;
        }
        if !is_crossing(ca.elevation, cb.elevation, threshold) {
            continue;
        }
        let (start, end) = shared_side(a, ca, b, cb)?;
        out.push(CrossingSegment { a, b, start, end });
    }
    Ok(out)
}

/// One endpoint of a crossing segment, linked to the other endpoint.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Stub {
    pub point: Point,
    /// Arena index of the stub at the segment's other end.
    pub pair: usize,
}

/// Working set of the stitcher.
///
/// Segment `k` occupies slots `2k` and `2k + 1`. Consumed stubs stay in
/// place and are only flagged dead, so indices are stable and the
/// lowest-index tie-break is well defined.
#[derive(Clone, Debug, Default)]
pub struct StubArena {
    stubs: Vec<Stub>,
    live: Vec<bool>,
    remaining: usize,
    cursor: usize,
}

impl StubArena {
    pub fn from_segments(segments: &[CrossingSegment]) -> Self {
        let mut stubs = Vec::with_capacity(segments.len() * 2);
        for seg in segments {
            let id = stubs.len();
            stubs.push(Stub {
                point: seg.start,
                pair: id + 1,
            });
            stubs.push(Stub {
                point: seg.end,
                pair: id,
            });
        }
        let n = stubs.len();
        StubArena {
            stubs,
            live: vec![true; n],
            remaining: n,
            cursor: 0,
        }
    }

    /// Live stubs left. Always even between pair removals.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    #[inline]
    pub fn stub(&self, index: usize) -> Option<&Stub> {
        self.stubs.get(index)
    }

    #[inline]
    pub fn is_live(&self, index: usize) -> bool {
        self.live.get(index).copied().unwrap_or(false)
    }

    /// Lowest live index.
    pub fn first_live(&mut self) -> Option<usize> {
        while self.cursor < self.live.len() && !self.live[self.cursor] {
            self.cursor += 1;
        }
        (self.cursor < self.live.len()).then_some(self.cursor)
    }

    /// Lowest live index whose point matches `p`.
    pub fn find_at(&self, p: Point) -> Option<usize> {
        (self.cursor..self.stubs.len()).find(|&i| self.live[i] && self.stubs[i].point.about_eq(&p))
    }

    /// Consume the live stub at `index` together with its pair; returns
    /// `(stub, pair)`.
    pub fn take_pair(&mut self, index: usize) -> Option<(Stub, Stub)> {
        if !self.is_live(index) {
            return None;
        }
        let stub = self.stubs[index];
        if !self.is_live(stub.pair) {
            return None;
        }
        let pair = self.stubs[stub.pair];
        self.live[index] = false;
        self.live[stub.pair] = false;
        self.remaining -= 2;
        debug_assert_eq!(self.remaining % 2, 0);
        Some((stub, pair))
    }
}

/// A polyline of at least two points.
#[derive(Clone, Debug, PartialEq)]
pub struct Contour {
    points: Vec<Point>,
}

impl Contour {
    /// `None` for fewer than two points.
    pub fn from_points(points: Vec<Point>) -> Option<Self> {
        (points.len() >= 2).then_some(Contour { points })
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// `true` when the contour holds no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn first(&self) -> Point {
        self.points[0]
    }

    #[inline]
    pub fn last(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    /// More than one segment and both ends at the same point.
    pub fn is_closed(&self) -> bool {
        self.points.len() > 2 && self.first().about_eq(&self.last())
    }

    /// Number of segments in the polyline.
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.points.len() - 1
    }

    /// Single-precision copy for render buffers.
    pub fn to_f32(&self) -> Vec<[f32; 2]> {
        self.points.iter().map(|p| p.to_f32()).collect()
    }
}

/// Stitch crossing segments into maximal polylines.
pub fn stitch(segments: &[CrossingSegment]) -> Vec<Contour> {
    let mut arena = StubArena::from_segments(segments);
    let mut contours = Vec::new();

    while let Some(seed) = arena.first_live() {
        let Some((a, b)) = arena.take_pair(seed) else {
            break;
        };
        let mut chain: VecDeque<Point> = VecDeque::from([a.point, b.point]);

        let mut head = a.point;
        while let Some((_, next)) = arena.find_at(head).and_then(|m| arena.take_pair(m)) {
            chain.push_front(next.point);
            head = next.point;
        }

        let mut tail = b.point;
        while let Some((_, next)) = arena.find_at(tail).and_then(|m| arena.take_pair(m)) {
            chain.push_back(next.point);
            tail = next.point;
        }

        contours.extend(Contour::from_points(chain.into()));
    }

    debug_assert!(arena.is_empty());
    log::trace!(
        "stitched {} segments into {} contours",
        segments.len(),
        contours.len()
    );
    contours
}

/// Result of one extraction pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContourSet {
    pub segments: Vec<CrossingSegment>,
    pub contours: Vec<Contour>,
}

impl ContourSet {
    /// Segment endpoints as a flat `[start, end, start, end, ...]` list.
    pub fn segment_points(&self) -> Vec<Point> {
        self.segments.iter().flat_map(|s| [s.start, s.end]).collect()
    }
}

/// Detect crossings on `mesh` at `threshold` and stitch them.
pub fn extract_contours(mesh: &Mesh, threshold: f64) -> Result<ContourSet, MapgenError> {
    let segments = crossing_segments(mesh, threshold)?;
    let contours = stitch(&segments);
    Ok(ContourSet { segments, contours })
}
