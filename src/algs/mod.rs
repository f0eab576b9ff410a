//! Algorithms over a built mesh.
//!
//! - [`elevation`]: noise sampling into per-cell elevations and rasters
//! - [`contour`]: threshold crossing detection and polyline stitching

pub mod contour;
pub mod elevation;

pub use contour::{Contour, ContourSet, CrossingSegment, extract_contours};
pub use elevation::{ElevationSampler, NoiseConfig, NoiseOracle, PerlinOracle};
