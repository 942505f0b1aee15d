//! Image-driven terrain: raster sampling, height extraction, palettes, and heightmap export.
//!
//! The pipeline is `bytes -> SampledImage -> HeightField`, after which heights are
//! turned into colors by the palette engine or written back out as 8-bit heightmaps.

mod async_load;
mod error;
mod export;
mod height;
mod sampler;

pub mod palette;

pub use async_load::{DecodedImage, ImageLoader, LoadTicket};
pub use error::TerrainError;
pub use export::{encode_heightmap_png, heightmap_luma, heightmap_rgba, write_heightmap_png, write_heightmap_tiff};
pub use height::{HeightField, HeightFieldId, HeightMode, Probe, extract_heights, probe};
pub use palette::{GEOGRAPHIC_COLORS, PaletteId, PaletteStop, contour_shade, geographic_color, resolve_color, sample_gradient};
pub use sampler::{DEFAULT_MAX_DIMENSION, SampledImage, sample_image, target_dimensions};
