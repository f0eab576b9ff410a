//! Elevation sampling: one noise sample per cell centroid, plus an optional
//! per-pixel raster at the same normalization.
//!
//! Raw oracle output in roughly `[-1, 1]` is mapped to `[0, 1]` with
//! `clamp((v + 1) / 2, 0, 1)`. Samples are independent, so with the `rayon`
//! feature they run in parallel; the result is collected in full before it
//! is written to the mesh, so no reader ever sees a partially sampled mesh.

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::mesh_error::MapgenError;
use crate::topology::mesh::Mesh;
use crate::topology::point::Point;

/// Parameters of the noise field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub seed: u32,
    pub frequency: f64,
    pub octave_count: usize,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            frequency: 0.008,
            octave_count: 4,
        }
    }
}

impl NoiseConfig {
    /// Shape check only: finite frequency and at least one octave.
    pub fn validate(&self) -> Result<(), MapgenError> {
        if !self.frequency.is_finite() {
            return Err(MapgenError::InvalidParameter(format!(
                "noise frequency must be finite, got {}",
                self.frequency
            )));
        }
        if self.octave_count == 0 {
            return Err(MapgenError::InvalidParameter(
                "noise octave count must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// A deterministic scalar field over the plane.
///
/// Implementations must be pure: the same configuration and coordinates
/// always give the same value.
pub trait NoiseOracle: Sync {
    /// Build the oracle for one noise configuration.
    fn configure(config: &NoiseConfig) -> Self
    where
        Self: Sized;

    /// Raw sample, nominally in `[-1, 1]`.
    fn sample(&self, x: f64, y: f64) -> f64;
}

/// Fractal Perlin noise (persistence 0.5, lacunarity 2).
#[derive(Clone, Debug)]
pub struct PerlinOracle {
    fbm: Fbm<Perlin>,
}

impl NoiseOracle for PerlinOracle {
    fn configure(config: &NoiseConfig) -> Self {
        let fbm = Fbm::<Perlin>::new(config.seed)
            .set_octaves(config.octave_count)
            .set_frequency(config.frequency)
            .set_persistence(0.5)
            .set_lacunarity(2.0);
        PerlinOracle { fbm }
    }

    #[inline]
    fn sample(&self, x: f64, y: f64) -> f64 {
        self.fbm.get([x, y])
    }
}

/// Map a raw sample to `[0, 1]`. NaN stays NaN.
#[inline]
pub fn normalize(raw: f64) -> f64 {
    ((raw + 1.0) / 2.0).clamp(0.0, 1.0)
}

/// Quantize a normalized elevation to the nearest gray level.
#[inline]
pub fn to_gray(elevation: f64) -> u8 {
    (elevation.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Row-major Gray8 raster of the normalized noise.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NoiseImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl NoiseImage {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }
}

/// Samples a [`NoiseOracle`] over mesh cells and pixels.
#[derive(Clone, Debug)]
pub struct ElevationSampler<N> {
    oracle: N,
}

impl<N: NoiseOracle> ElevationSampler<N> {
    pub fn new(oracle: N) -> Self {
        Self { oracle }
    }

    /// Configure the oracle from `config` after a shape check.
    pub fn from_config(config: &NoiseConfig) -> Result<Self, MapgenError> {
        config.validate()?;
        Ok(Self::new(N::configure(config)))
    }

    #[inline]
    pub fn oracle(&self) -> &N {
        &self.oracle
    }

    /// Normalized elevation at `p`.
    pub fn elevation_at(&self, p: Point) -> Result<f64, MapgenError> {
        let raw = self.oracle.sample(p.x, p.y);
        if !raw.is_finite() {
            return Err(MapgenError::NonFiniteSample { x: p.x, y: p.y });
        }
        Ok(normalize(raw))
    }

    /// Normalized elevation at every cell centroid, in cell order.
    pub fn sample_cells(&self, mesh: &Mesh) -> Result<Vec<f64>, MapgenError> {
        let centroids: Vec<Point> = mesh.cells().iter().map(|c| c.centroid()).collect();

        #[cfg(feature = "rayon")]
        let results: Vec<Result<f64, MapgenError>> = centroids
            .par_iter()
            .map(|&p| self.elevation_at(p))
            .collect();
        #[cfg(not(feature = "rayon"))]
        let results: Vec<Result<f64, MapgenError>> =
            centroids.iter().map(|&p| self.elevation_at(p)).collect();

        results.into_iter().collect()
    }

    /// Sample every cell and write the elevations into `mesh`.
    ///
    /// On error the mesh keeps its previous elevations.
    pub fn apply(&self, mesh: &mut Mesh) -> Result<(), MapgenError> {
        let elevations = self.sample_cells(mesh)?;
        mesh.set_elevations(&elevations)
    }

    /// Gray8 raster with one sample per pixel at integer coordinates.
    ///
    /// Non-finite samples rasterize as 0; the raster is a display aid and
    /// never feeds contour extraction.
    pub fn rasterize(&self, width: usize, height: usize) -> NoiseImage {
        let n = width * height;
        let pixel = |i: usize| {
            let (x, y) = ((i % width) as f64, (i / width) as f64);
            let e = normalize(self.oracle.sample(x, y));
            if e.is_nan() { 0 } else { to_gray(e) }
        };

        #[cfg(feature = "rayon")]
        let pixels: Vec<u8> = (0..n).into_par_iter().map(pixel).collect();
        #[cfg(not(feature = "rayon"))]
        let pixels: Vec<u8> = (0..n).map(pixel).collect();

        NoiseImage {
            width,
            height,
            pixels,
        }
    }
}
