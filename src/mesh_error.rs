//! MapgenError: Unified error type for mapgen-core public APIs
//!
//! Every fallible operation in the crate returns this error so a host can
//! report failures without the pipeline ever panicking past its boundary.

use thiserror::Error;

use crate::topology::cell::CellId;

/// Unified error type for mapgen-core operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MapgenError {
    /// The mesh provider rejected the point set.
    #[error("Mesh construction failed: {0}")]
    MeshConstruction(String),
    /// A triangulation needs at least three points.
    #[error("Mesh construction failed: need at least 3 points, got {got}")]
    TooFewPoints { got: usize },
    /// A point carried a NaN or infinite coordinate.
    #[error("Mesh construction failed: point {index} has a non-finite coordinate")]
    NonFinitePoint { index: usize },
    /// Two input points coincide (under approximate equality).
    #[error("Mesh construction failed: points {first} and {second} coincide")]
    DuplicatePoint { first: usize, second: usize },
    /// All points are collinear, so no triangle could be formed.
    #[error("Mesh construction failed: point set is degenerate (no triangles)")]
    DegenerateTriangulation,
    /// A triangle referenced a vertex index outside the point set.
    #[error("Topology error: cell {cell} references missing vertex {vertex}")]
    VertexOutOfRange { cell: usize, vertex: usize },
    /// A triangle names the same vertex index more than once.
    #[error("Topology error: cell {cell} repeats vertex {vertex}")]
    RepeatedVertex { cell: usize, vertex: usize },
    /// An edge is shared by more than two triangles.
    #[error("Topology error: edge ({a}, {b}) is shared by more than two cells")]
    NonManifoldEdge { a: usize, b: usize },
    /// A neighbor slot points at a cell that does not point back, or whose
    /// shared edge does not match.
    #[error("Topology error: neighbor slot {slot} of cell {cell} is inconsistent")]
    NeighborMismatch { cell: CellId, slot: usize },
    /// Crossing-edge vertex search did not find exactly two shared points.
    #[error("Topology error: cells {a} and {b} share {found} vertices, expected 2")]
    SharedVertexMismatch { a: CellId, b: CellId, found: usize },
    /// The noise oracle returned NaN or an infinite value.
    #[error("Noise oracle returned a non-finite value at ({x}, {y})")]
    NonFiniteSample { x: f64, y: f64 },
    /// Elevation write did not cover every cell.
    #[error("Elevation length mismatch: expected {expected}, got {got}")]
    ElevationLengthMismatch { expected: usize, got: usize },
    /// A derived buffer's length disagrees with the mesh cell count.
    #[error("Buffer `{buffer}` length mismatch: expected {expected}, got {got}")]
    BufferLengthMismatch {
        buffer: &'static str,
        expected: usize,
        got: usize,
    },
    /// A parameter failed its basic shape check.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl MapgenError {
    /// Whether the error came from building a mesh out of a point set.
    ///
    /// These are the failures after which the pipeline keeps its previous
    /// generation untouched.
    pub fn is_mesh_construction(&self) -> bool {
        matches!(
            self,
            MapgenError::MeshConstruction(_)
                | MapgenError::TooFewPoints { .. }
                | MapgenError::NonFinitePoint { .. }
                | MapgenError::DuplicatePoint { .. }
                | MapgenError::DegenerateTriangulation
                | MapgenError::VertexOutOfRange { .. }
                | MapgenError::RepeatedVertex { .. }
                | MapgenError::NonManifoldEdge { .. }
        )
    }
}
