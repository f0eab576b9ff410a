//! Colors for render buffers.
//!
//! `Color` is four bytes in RGBA order and `Pod`, so a `[Color]` slice can be
//! uploaded as-is.

use bytemuck::{Pod, Zeroable};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Seed for the per-cell pastel palette.
pub const PALETTE_SEED: u64 = 42;

/// 8-bit RGBA color.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Pod, Zeroable,
)]
#[repr(C)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    #[inline]
    pub const fn gray(level: u8) -> Self {
        Color::rgb(level, level, level)
    }

    /// Hue in degrees, saturation and lightness in percent.
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let s = (saturation / 100.0).clamp(0.0, 1.0);
        let l = (lightness / 100.0).clamp(0.0, 1.0);

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = l - c / 2.0;
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let to_u8 = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Color::rgb(to_u8(r), to_u8(g), to_u8(b))
    }
}

/// One random pastel color per cell, repeated for the cell's three
/// vertices.
pub fn cell_palette(cells: usize, seed: u64) -> Vec<Color> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut out = Vec::with_capacity(cells * 3);
    for _ in 0..cells {
        let c = Color::from_hsl(rng.gen_range(0..360) as f32, 75.0, 75.0);
        out.extend([c; 3]);
    }
    out
}

/// Lookup table mapping a gray level to black (water) or white.
///
/// Level `g` is water when `g / 255 <= water_level`, the same test contour
/// extraction applies to elevations. Gray levels are rounded elevations, so
/// a cell within half a level (`1 / 510`) of the water level may be drawn on
/// the other side of its coastline.
pub fn water_table(water_level: f64) -> Vec<u8> {
    (0..=255u8)
        .map(|level| {
            if f64::from(level) / 255.0 <= water_level {
                0
            } else {
                255
            }
        })
        .collect()
}
