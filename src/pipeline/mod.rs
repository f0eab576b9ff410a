//! Recompute driver: keeps derived buffers in step with their inputs.
//!
//! Setters record what went stale in a [`DirtyTracker`]. [`Pipeline::recompute`]
//! then runs every stale category in dependency order
//!
//! ```text
//! Vertices -> Mesh -> ElevationNoise -> WaterLevel
//! ```
//!
//! into a staged copy of the current [`DerivedBuffers`] and publishes the
//! copy as a new `Arc` snapshot only once every pass has succeeded. A reader
//! holding a snapshot therefore sees one complete frame, never a mix of two.
//! On failure the published snapshot is left as it was and the flags the
//! pass had cleared are set again.
//!
//! # Example
//! ```rust
//! use mapgen_core::pipeline::{MapgenConfig, Pipeline};
//!
//! let config = MapgenConfig { point_count: 40, width: 64, height: 48, ..Default::default() };
//! let mut pipeline = Pipeline::with_config(config)?;
//! pipeline.regenerate()?;
//! let report = pipeline.recompute()?;
//! assert_eq!(report.cell_count, pipeline.snapshot().cell_count);
//! # Ok::<(), mapgen_core::mesh_error::MapgenError>(())
//! ```

pub mod dirty;
pub mod params;

pub use dirty::{DirtyFlag, DirtyFlags, DirtyTracker};
pub use params::{MapgenConfig, RenderOptions};

use std::marker::PhantomData;
use std::sync::Arc;

use crate::algs::contour::{ContourSet, extract_contours};
use crate::algs::elevation::{ElevationSampler, NoiseConfig, NoiseOracle, PerlinOracle};
use crate::data::buffers::DerivedBuffers;
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MapgenError;
use crate::mesh_generation::{BowyerWatson, MeshProvider, random_points};
use crate::topology::mesh::Mesh;
use crate::topology::point::Point;

/// What one [`Pipeline::recompute`] call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecomputeReport {
    /// Categories rebuilt, in the order they ran.
    pub ran: DirtyFlags,
    /// Generation of the published snapshot.
    pub generation: u64,
    pub cell_count: usize,
    pub contour_count: usize,
}

/// One renderer frame: a buffer snapshot and the overlay switches.
#[derive(Clone, Debug)]
pub struct Frame {
    pub buffers: Arc<DerivedBuffers>,
    pub options: RenderOptions,
}

/// Owns the mesh for the current point set and its derived buffers.
pub struct Pipeline<P = BowyerWatson, N = PerlinOracle> {
    provider: P,
    config: MapgenConfig,
    render: RenderOptions,
    tracker: DirtyTracker,
    mesh: Option<Mesh>,
    buffers: Arc<DerivedBuffers>,
    _noise: PhantomData<fn() -> N>,
}

impl Pipeline<BowyerWatson, PerlinOracle> {
    /// Built-in triangulation and Perlin noise.
    pub fn with_config(config: MapgenConfig) -> Result<Self, MapgenError> {
        Pipeline::new(BowyerWatson, config)
    }
}

impl<P, N> Pipeline<P, N>
where
    P: MeshProvider,
    N: NoiseOracle,
{
    pub fn new(provider: P, config: MapgenConfig) -> Result<Self, MapgenError> {
        config.validate()?;
        Ok(Pipeline {
            provider,
            config,
            render: RenderOptions::default(),
            tracker: DirtyTracker::new(),
            mesh: None,
            buffers: Arc::new(DerivedBuffers::default()),
            _noise: PhantomData,
        })
    }

    #[inline]
    pub fn config(&self) -> &MapgenConfig {
        &self.config
    }

    #[inline]
    pub fn tracker(&self) -> &DirtyTracker {
        &self.tracker
    }

    #[inline]
    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    /// The latest complete buffers.
    #[inline]
    pub fn snapshot(&self) -> Arc<DerivedBuffers> {
        Arc::clone(&self.buffers)
    }

    pub fn frame(&self) -> Frame {
        Frame {
            buffers: self.snapshot(),
            options: self.render,
        }
    }

    #[inline]
    pub fn render_options(&self) -> &RenderOptions {
        &self.render
    }

    /// Overlay switches only affect drawing, so nothing goes stale.
    pub fn set_render_options(&mut self, options: RenderOptions) {
        self.render = options;
    }

    /// Takes effect at the next [`regenerate`](Self::regenerate).
    pub fn set_point_count(&mut self, count: usize) {
        self.config.point_count = count;
    }

    /// Takes effect at the next [`regenerate`](Self::regenerate).
    pub fn set_point_seed(&mut self, seed: u64) {
        self.config.point_seed = seed;
    }

    /// Takes effect at the next [`regenerate`](Self::regenerate).
    pub fn set_canvas(&mut self, width: usize, height: usize) {
        self.config.width = width;
        self.config.height = height;
    }

    pub fn set_noise(&mut self, noise: NoiseConfig) -> Result<(), MapgenError> {
        noise.validate()?;
        self.config.noise = noise;
        self.tracker.set_dirty(DirtyFlag::ElevationNoise);
        Ok(())
    }

    pub fn set_water_level(&mut self, water_level: f64) -> Result<(), MapgenError> {
        if !water_level.is_finite() {
            return Err(MapgenError::InvalidParameter(format!(
                "water level must be finite, got {water_level}"
            )));
        }
        self.config.water_level = water_level;
        self.tracker.set_dirty(DirtyFlag::WaterLevel);
        Ok(())
    }

    /// Draw a fresh point set from the configured count, seed and canvas and
    /// build its mesh.
    pub fn regenerate(&mut self) -> Result<(), MapgenError> {
        let points = random_points(
            self.config.point_count,
            self.config.width as f64,
            self.config.height as f64,
            self.config.point_seed,
        )?;
        self.set_points(points)
    }

    /// Replace the point set.
    ///
    /// If the provider rejects the points the previous mesh and snapshot
    /// stay in place and the provider's error is returned.
    pub fn set_points(&mut self, points: Vec<Point>) -> Result<(), MapgenError> {
        let mesh = match self.provider.build_mesh(&points) {
            Ok(mesh) => mesh,
            Err(e) => {
                log::warn!("rejected point set of {} points: {e}", points.len());
                return Err(e);
            }
        };
        log::info!(
            "new mesh generation: {} points, {} cells",
            points.len(),
            mesh.len()
        );
        self.mesh = Some(mesh);
        self.tracker.set_all(
            [
                DirtyFlag::Vertices,
                DirtyFlag::Mesh,
                DirtyFlag::ElevationNoise,
            ]
            .into_iter()
            .collect(),
        );
        Ok(())
    }

    /// Rebuild every stale category and publish the result.
    pub fn recompute(&mut self) -> Result<RecomputeReport, MapgenError> {
        if self.tracker.pending().is_empty() {
            return Ok(self.report(DirtyFlags::EMPTY));
        }

        let mut staged = (*self.buffers).clone();
        let mut cleared = DirtyFlags::EMPTY;
        match self.run_passes(&mut staged, &mut cleared) {
            Ok(()) => {
                staged.generation += 1;
                self.buffers = Arc::new(staged);
                log::debug!(
                    "published generation {} after {cleared:?}",
                    self.buffers.generation
                );
                Ok(self.report(cleared))
            }
            Err(e) => {
                log::warn!("recompute failed, keeping generation {}: {e}", self.buffers.generation);
                self.tracker.set_all(cleared);
                Err(e)
            }
        }
    }

    fn report(&self, ran: DirtyFlags) -> RecomputeReport {
        RecomputeReport {
            ran,
            generation: self.buffers.generation,
            cell_count: self.buffers.cell_count,
            contour_count: self.buffers.contours.len(),
        }
    }

    fn run_passes(
        &mut self,
        staged: &mut DerivedBuffers,
        cleared: &mut DirtyFlags,
    ) -> Result<(), MapgenError> {
        if self.tracker.is_dirty_clear(DirtyFlag::Vertices) {
            cleared.insert(DirtyFlag::Vertices);
            log::debug!("rebuilding vertex buffer");
            match &self.mesh {
                Some(mesh) => staged.rebuild_points(mesh.points()),
                None => staged.points.clear(),
            }
        }

        if self.tracker.is_dirty_clear(DirtyFlag::Mesh) {
            cleared.insert(DirtyFlag::Mesh);
            log::debug!("rebuilding mesh buffers");
            match &self.mesh {
                Some(mesh) => staged.rebuild_mesh(mesh),
                None => staged.clear(),
            }
        }

        if self.tracker.is_dirty_clear(DirtyFlag::ElevationNoise) {
            cleared.insert(DirtyFlag::ElevationNoise);
            log::debug!("sampling elevation with {:?}", self.config.noise);
            let sampler = ElevationSampler::<N>::from_config(&self.config.noise)?;
            if let Some(mesh) = self.mesh.as_mut() {
                sampler.apply(mesh)?;
            }
            let image = sampler.rasterize(self.config.width, self.config.height);
            match &self.mesh {
                Some(mesh) => staged.rebuild_elevation(mesh, image),
                None => staged.noise_image = Arc::new(image),
            }
            // contours depend on elevation
            self.tracker.set_dirty(DirtyFlag::WaterLevel);
        }

        if self.tracker.is_dirty_clear(DirtyFlag::WaterLevel) {
            cleared.insert(DirtyFlag::WaterLevel);
            let water_level = self.config.water_level;
            let set = match &self.mesh {
                Some(mesh) => extract_contours(mesh, water_level)?,
                None => ContourSet::default(),
            };
            log::debug!(
                "water level {water_level}: {} crossing segments, {} contours",
                set.segments.len(),
                set.contours.len()
            );
            staged.rebuild_contours(set, water_level);
        }

        staged.validate_invariants()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh_generation::grid_mesh;

    /// Left half low, right half high on a 10-wide canvas.
    struct Split;

    impl NoiseOracle for Split {
        fn configure(_: &NoiseConfig) -> Self {
            Split
        }
        fn sample(&self, x: f64, _y: f64) -> f64 {
            if x < 5.0 { -0.6 } else { 0.6 }
        }
    }

    /// Hands out a fixed grid regardless of the points.
    struct FixedGrid;

    impl MeshProvider for FixedGrid {
        fn build_mesh(&self, points: &[Point]) -> Result<Mesh, MapgenError> {
            if points.len() < 3 {
                return Err(MapgenError::TooFewPoints { got: points.len() });
            }
            grid_mesh(4, 2, Point::new(0.0, 0.0), Point::new(10.0, 5.0))
        }
    }

    fn config() -> MapgenConfig {
        MapgenConfig {
            point_count: 5,
            width: 10,
            height: 5,
            ..MapgenConfig::default()
        }
    }

    #[test]
    fn first_recompute_runs_every_category() {
        let mut p: Pipeline<FixedGrid, Split> = Pipeline::new(FixedGrid, config()).unwrap();
        p.regenerate().unwrap();
        let report = p.recompute().unwrap();
        assert_eq!(report.ran, DirtyFlags::ALL);
        assert_eq!(report.generation, 1);
        assert_eq!(report.cell_count, 16);
        assert_eq!(report.contour_count, 1);
        assert!(p.tracker().pending().is_empty());

        let snap = p.snapshot();
        assert_eq!(snap.noise_image.pixels.len(), 50);
        assert_eq!(snap.noise_colors.len(), 48);
    }

    #[test]
    fn water_level_only_reruns_contours() {
        let mut p: Pipeline<FixedGrid, Split> = Pipeline::new(FixedGrid, config()).unwrap();
        p.regenerate().unwrap();
        p.recompute().unwrap();

        let before = p.snapshot();

        p.set_water_level(0.95).unwrap();
        let report = p.recompute().unwrap();
        assert_eq!(report.ran, DirtyFlags::from(DirtyFlag::WaterLevel));
        assert_eq!(report.contour_count, 0);
        // the raster is shared, not copied
        assert!(Arc::ptr_eq(&before.noise_image, &p.snapshot().noise_image));
    }

    #[test]
    fn noise_change_cascades_into_contours() {
        let mut p: Pipeline<FixedGrid, Split> = Pipeline::new(FixedGrid, config()).unwrap();
        p.regenerate().unwrap();
        p.recompute().unwrap();

        p.set_noise(NoiseConfig {
            seed: 7,
            ..NoiseConfig::default()
        })
        .unwrap();
        let report = p.recompute().unwrap();
        let expected: DirtyFlags = [DirtyFlag::ElevationNoise, DirtyFlag::WaterLevel]
            .into_iter()
            .collect();
        assert_eq!(report.ran, expected);
    }

    #[test]
    fn clean_recompute_publishes_nothing() {
        let mut p: Pipeline<FixedGrid, Split> = Pipeline::new(FixedGrid, config()).unwrap();
        p.regenerate().unwrap();
        p.recompute().unwrap();
        let before = p.snapshot();
        let report = p.recompute().unwrap();
        assert!(report.ran.is_empty());
        assert!(Arc::ptr_eq(&before, &p.snapshot()));
    }

    #[test]
    fn rejected_points_keep_previous_state() {
        let mut p: Pipeline<FixedGrid, Split> = Pipeline::new(FixedGrid, config()).unwrap();
        p.regenerate().unwrap();
        p.recompute().unwrap();
        let before = p.snapshot();

        let err = p.set_points(vec![Point::new(0.0, 0.0)]).unwrap_err();
        assert!(err.is_mesh_construction());
        assert!(p.tracker().pending().is_empty());
        assert_eq!(p.mesh().map(Mesh::len), Some(16));
        assert!(Arc::ptr_eq(&before, &p.snapshot()));
    }

    #[test]
    fn bad_parameters_are_refused() {
        let mut p: Pipeline<FixedGrid, Split> = Pipeline::new(FixedGrid, config()).unwrap();
        assert!(p.set_water_level(f64::NAN).is_err());
        assert!(
            p.set_noise(NoiseConfig {
                octave_count: 0,
                ..NoiseConfig::default()
            })
            .is_err()
        );
        assert!(p.tracker().pending().is_empty());
    }

    #[test]
    fn render_options_travel_with_frame() {
        let mut p: Pipeline<FixedGrid, Split> = Pipeline::new(FixedGrid, config()).unwrap();
        let opts = RenderOptions {
            show_coast_paths: true,
            ..RenderOptions::default()
        };
        p.set_render_options(opts);
        assert!(p.tracker().pending().is_empty());
        assert_eq!(p.frame().options, opts);
    }
}
