//! 8-bit heightmap export (PNG and TIFF).

use std::io::Cursor;
use std::path::Path;

use image::{GrayImage, ImageFormat, Luma, Rgba, RgbaImage};

use crate::error::TerrainError;
use crate::height::HeightField;

fn quantize(h: f32) -> u8 {
    (h.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Grayscale RGBA image of the field: each height replicated across R, G, B with opaque alpha.
pub fn heightmap_rgba(field: &HeightField) -> RgbaImage {
    RgbaImage::from_fn(field.width(), field.height(), |x, y| {
        let v = quantize(field.get(x, y));
        Rgba([v, v, v, 255])
    })
}

/// Single-channel image of the field.
pub fn heightmap_luma(field: &HeightField) -> GrayImage {
    GrayImage::from_fn(field.width(), field.height(), |x, y| {
        Luma([quantize(field.get(x, y))])
    })
}

/// Encode the field as PNG bytes in memory.
pub fn encode_heightmap_png(field: &HeightField) -> Result<Vec<u8>, TerrainError> {
    let mut bytes = Vec::new();
    heightmap_rgba(field)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(TerrainError::Export)?;
    Ok(bytes)
}

/// Write the field to `path` as an RGBA PNG.
pub fn write_heightmap_png(field: &HeightField, path: &Path) -> Result<(), TerrainError> {
    heightmap_rgba(field)
        .save_with_format(path, ImageFormat::Png)
        .map_err(TerrainError::Export)?;
    tracing::info!(path = %path.display(), "wrote heightmap PNG");
    Ok(())
}

/// Write the field to `path` as a single-channel 8-bit TIFF.
pub fn write_heightmap_tiff(field: &HeightField, path: &Path) -> Result<(), TerrainError> {
    heightmap_luma(field)
        .save_with_format(path, ImageFormat::Tiff)
        .map_err(TerrainError::Export)?;
    tracing::info!(path = %path.display(), "wrote heightmap TIFF");
    Ok(())
}
