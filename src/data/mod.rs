//! Render-side data: colors and the derived buffer snapshot.

pub mod buffers;
pub mod color;

pub use buffers::DerivedBuffers;
pub use color::{Color, PALETTE_SEED, cell_palette, water_table};
