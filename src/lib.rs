#![cfg_attr(docsrs, feature(doc_cfg))]
//! # mapgen-core
//!
//! mapgen-core turns a random planar point set into a procedural height map
//! and extracts its coastlines. A Delaunay triangulation of the points is
//! sampled with fractal noise at each cell centroid; wherever two adjacent
//! cells straddle the water level their shared side becomes a coast segment,
//! and the segments are stitched into polylines.
//!
//! ## Features
//! - Triangle meshes with reciprocal neighbor slots and per-cell elevation
//! - Swappable triangulation ([`mesh_generation::MeshProvider`]) and noise
//!   ([`algs::elevation::NoiseOracle`]) backends
//! - Contour extraction with deterministic stitching at junctions
//! - Dirty-flag recompute pipeline publishing immutable buffer snapshots
//! - Parallel elevation sampling behind the `rayon` feature
//!
//! ## Determinism
//!
//! Point sets, the cell palette and the noise field are all seeded from
//! configuration, so the same [`pipeline::MapgenConfig`] always yields the
//! same buffers. Contour stitching resolves ties by lowest stub index rather
//! than by iteration order of any hash container.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! mapgen-core = "0.3"
//! # Optional features:
//! # features = ["strict-invariants"]
//! ```

pub mod algs;
pub mod data;
pub mod debug_invariants;
pub mod geometry;
pub mod mesh_error;
pub mod mesh_generation;
pub mod pipeline;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::contour::{Contour, ContourSet, CrossingSegment, extract_contours};
    pub use crate::algs::elevation::{ElevationSampler, NoiseConfig, NoiseOracle, PerlinOracle};
    pub use crate::data::buffers::DerivedBuffers;
    pub use crate::data::color::Color;
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::mesh_error::MapgenError;
    pub use crate::mesh_generation::{BowyerWatson, MeshProvider, random_points};
    pub use crate::pipeline::{
        DirtyFlag, DirtyFlags, DirtyTracker, Frame, MapgenConfig, Pipeline, RecomputeReport,
        RenderOptions,
    };
    pub use crate::topology::{Cell, CellId, Mesh, Point};
}
