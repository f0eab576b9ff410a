//! In-memory parameters for the pipeline and the renderer.

use serde::{Deserialize, Serialize};

use crate::algs::elevation::NoiseConfig;
use crate::mesh_error::MapgenError;

/// Inputs that shape one map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapgenConfig {
    /// Points drawn per regeneration.
    pub point_count: usize,
    /// Seed for the point set.
    pub point_seed: u64,
    /// Canvas width; also the noise raster width.
    pub width: usize,
    /// Canvas height; also the noise raster height.
    pub height: usize,
    pub noise: NoiseConfig,
    /// Elevation threshold; cells at or below it are water.
    pub water_level: f64,
}

impl Default for MapgenConfig {
    fn default() -> Self {
        Self {
            point_count: 15,
            point_seed: 42,
            width: 800,
            height: 600,
            noise: NoiseConfig::default(),
            water_level: 0.5,
        }
    }
}

impl MapgenConfig {
    /// Shape checks only; ranges are left to the caller.
    pub fn validate(&self) -> Result<(), MapgenError> {
        self.noise.validate()?;
        if !self.water_level.is_finite() {
            return Err(MapgenError::InvalidParameter(format!(
                "water level must be finite, got {}",
                self.water_level
            )));
        }
        Ok(())
    }
}

/// Which overlays a renderer should draw. The pipeline never reads these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub show_vertices: bool,
    pub show_centroids: bool,
    /// Fill cells with the random palette.
    pub fill_polygons: bool,
    /// Stroke cell outlines.
    pub show_outline: bool,
    /// Draw the per-pixel noise raster.
    pub show_noise_texture: bool,
    /// Fill cells with their elevation gray.
    pub fill_noise_polygons: bool,
    /// Pass elevation fills through the water table.
    pub filter_elevation: bool,
    /// Draw raw crossing segments.
    pub show_coast_segments: bool,
    /// Draw stitched contours.
    pub show_coast_paths: bool,
    pub show_voronoi: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_vertices: false,
            show_centroids: false,
            fill_polygons: false,
            show_outline: true,
            show_noise_texture: false,
            fill_noise_polygons: true,
            filter_elevation: false,
            show_coast_segments: false,
            show_coast_paths: false,
            show_voronoi: false,
        }
    }
}
