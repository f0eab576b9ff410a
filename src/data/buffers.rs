//! Render-ready buffers derived from the mesh.
//!
//! Each category is rebuilt wholesale from its inputs; nothing is patched in
//! place. Per-cell buffers hold three entries per cell in the cell's vertex
//! order so a renderer can draw them as a plain triangle list.

use std::sync::Arc;

use crate::algs::contour::{Contour, ContourSet};
use crate::algs::elevation::{NoiseImage, to_gray};
use crate::data::color::{Color, PALETTE_SEED, cell_palette, water_table};
use crate::debug_invariants::{DebugInvariants, ensure_len};
use crate::geometry::dual::voronoi_edges;
use crate::mesh_error::MapgenError;
use crate::topology::mesh::Mesh;
use crate::topology::point::Point;

/// One complete frame of derived data.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DerivedBuffers {
    /// Cells covered by the per-cell buffers.
    pub cell_count: usize,
    /// The generating point set.
    pub points: Vec<[f32; 2]>,
    /// Triangle list, three vertices per cell.
    pub triangle_vertices: Vec<[f32; 2]>,
    /// Random pastel fill, three entries per cell.
    pub cell_colors: Vec<Color>,
    /// One centroid per cell.
    pub centroids: Vec<[f32; 2]>,
    /// Dual diagram as a line list (`[from, to, from, to, ...]`).
    pub voronoi_edges: Vec<[f32; 2]>,
    /// Grayscale elevation, three entries per cell; empty before the first
    /// elevation pass.
    pub noise_colors: Vec<Color>,
    /// Per-pixel noise raster, shared between snapshots until the next
    /// elevation pass replaces it.
    pub noise_image: Arc<NoiseImage>,
    /// Raw crossing segments as a line list.
    pub coast_segments: Vec<[f32; 2]>,
    /// Stitched coastlines.
    pub contours: Vec<Contour>,
    /// Gray level → black/white lookup at the current water level; empty
    /// before the first contour pass.
    pub water_table: Vec<u8>,
    /// Bumped every time the pipeline publishes a new snapshot.
    pub generation: u64,
}

fn to_f32(points: impl IntoIterator<Item = Point>) -> Vec<[f32; 2]> {
    points.into_iter().map(Point::to_f32).collect()
}

impl DerivedBuffers {
    /// Raw point overlay.
    pub fn rebuild_points(&mut self, points: &[Point]) {
        self.points = to_f32(points.iter().copied());
    }

    /// Triangle list, palette, centroids and dual edges.
    ///
    /// Elevation-derived buffers belong to the previous mesh and are
    /// dropped.
    pub fn rebuild_mesh(&mut self, mesh: &Mesh) {
        self.cell_count = mesh.len();
        self.triangle_vertices = to_f32(mesh.cells().iter().flat_map(|c| c.vertices));
        self.cell_colors = cell_palette(mesh.len(), PALETTE_SEED);
        self.centroids = to_f32(mesh.cells().iter().map(|c| c.centroid()));
        self.voronoi_edges = to_f32(voronoi_edges(mesh).into_iter().flat_map(|e| [e.from, e.to]));
        self.noise_colors.clear();
        self.coast_segments.clear();
        self.contours.clear();
    }

    /// Grayscale cell fill from the mesh's elevations plus the raster.
    pub fn rebuild_elevation(&mut self, mesh: &Mesh, image: NoiseImage) {
        self.noise_colors = mesh
            .cells()
            .iter()
            .flat_map(|c| {
                let level = if c.has_elevation() { to_gray(c.elevation) } else { 0 };
                [Color::gray(level); 3]
            })
            .collect();
        self.noise_image = Arc::new(image);
    }

    /// Coastline overlays for `water_level`.
    pub fn rebuild_contours(&mut self, set: ContourSet, water_level: f64) {
        self.coast_segments = to_f32(set.segment_points());
        self.contours = set.contours;
        self.water_table = water_table(water_level);
    }

    /// Drop everything derived from a mesh, keeping the generation counter.
    pub fn clear(&mut self) {
        let generation = self.generation;
        *self = DerivedBuffers {
            generation,
            ..DerivedBuffers::default()
        };
    }

    /// Triangle vertices as raw bytes (`f32` x/y pairs).
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangle_vertices)
    }

    /// Cell palette as raw RGBA bytes.
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.cell_colors)
    }

    /// Elevation fill as raw RGBA bytes.
    pub fn noise_color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.noise_colors)
    }
}

impl DebugInvariants for DerivedBuffers {
    fn validate_invariants(&self) -> Result<(), MapgenError> {
        let n = self.cell_count;
        ensure_len("triangle_vertices", n, 3, self.triangle_vertices.len())?;
        ensure_len("cell_colors", n, 3, self.cell_colors.len())?;
        ensure_len("centroids", n, 1, self.centroids.len())?;
        if !self.noise_colors.is_empty() {
            ensure_len("noise_colors", n, 3, self.noise_colors.len())?;
        }
        if self.coast_segments.len() % 2 != 0 {
            return Err(MapgenError::BufferLengthMismatch {
                buffer: "coast_segments",
                expected: self.coast_segments.len() + 1,
                got: self.coast_segments.len(),
            });
        }
        let image = &self.noise_image;
        if image.pixels.len() != image.width * image.height {
            return Err(MapgenError::BufferLengthMismatch {
                buffer: "noise_image",
                expected: image.width * image.height,
                got: image.pixels.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::contour::extract_contours;
    use crate::mesh_generation::grid_mesh;

    fn mesh() -> Mesh {
        let mut m = grid_mesh(2, 1, Point::new(0.0, 0.0), Point::new(2.0, 1.0)).unwrap();
        m.set_elevations(&[0.1, 0.1, 0.9, 0.9]).unwrap();
        m
    }

    #[test]
    fn mesh_buffers_have_three_entries_per_cell() {
        let m = mesh();
        let mut buf = DerivedBuffers::default();
        buf.rebuild_points(m.points());
        buf.rebuild_mesh(&m);
        assert_eq!(buf.points.len(), 6);
        assert_eq!(buf.triangle_vertices.len(), 12);
        assert_eq!(buf.cell_colors.len(), 12);
        assert_eq!(buf.centroids.len(), 4);
        assert_eq!(buf.vertex_bytes().len(), 12 * 8);
        assert_eq!(buf.color_bytes().len(), 12 * 4);
        assert!(buf.validate_invariants().is_ok());
        // vertex order follows the cell
        assert_eq!(buf.triangle_vertices[0..3], [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]);
    }

    #[test]
    fn elevation_and_contour_buffers() {
        let m = mesh();
        let mut buf = DerivedBuffers::default();
        buf.rebuild_mesh(&m);
        buf.rebuild_elevation(&m, NoiseImage::default());
        assert_eq!(buf.noise_colors[0], Color::gray(to_gray(0.1)));
        assert_eq!(buf.noise_colors[11], Color::gray(to_gray(0.9)));

        let set = extract_contours(&m, 0.5).unwrap();
        buf.rebuild_contours(set, 0.5);
        assert_eq!(buf.coast_segments.len(), 2);
        assert_eq!(buf.contours.len(), 1);
        assert_eq!(buf.water_table.len(), 256);
        assert!(buf.validate_invariants().is_ok());
    }

    #[test]
    fn length_mismatch_is_reported() {
        let mut buf = DerivedBuffers::default();
        buf.rebuild_mesh(&mesh());
        buf.centroids.pop();
        assert_eq!(
            buf.validate_invariants(),
            Err(MapgenError::BufferLengthMismatch {
                buffer: "centroids",
                expected: 4,
                got: 3
            })
        );
    }

    #[test]
    fn clear_keeps_generation() {
        let mut buf = DerivedBuffers::default();
        buf.rebuild_mesh(&mesh());
        buf.generation = 7;
        buf.clear();
        assert_eq!(buf.cell_count, 0);
        assert!(buf.triangle_vertices.is_empty());
        assert_eq!(buf.generation, 7);
    }
}
