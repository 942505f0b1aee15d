//! Raster decoding and downsampling to a bounded working resolution.

use image::imageops::FilterType;
use tracing::debug;

use crate::error::TerrainError;

/// Largest width or height kept after sampling. Bigger images are resampled down.
pub const DEFAULT_MAX_DIMENSION: u32 = 1024;

/// A decoded image stored as row-major RGBA8 pixels.
///
/// Only built through [`sample_image`] or the checked constructors, so the
/// buffer always holds exactly `width * height * 4` bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampledImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl SampledImage {
    /// Wrap an existing RGBA8 buffer.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::EmptyImage`] for zero dimensions and
    /// [`TerrainError::ImageSize`] if the buffer length is not `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, TerrainError> {
        if width == 0 || height == 0 {
            return Err(TerrainError::EmptyImage);
        }
        if pixels.len() != width as usize * height as usize * 4 {
            return Err(TerrainError::ImageSize {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build an opaque image from RGB triples, one per pixel in row-major order.
    pub fn from_rgb_pixels(
        width: u32,
        height: u32,
        rgb: &[[u8; 3]],
    ) -> Result<Self, TerrainError> {
        let pixels = rgb
            .iter()
            .flat_map(|&[r, g, b]| [r, g, b, 255])
            .collect();
        Self::from_rgba(width, height, pixels)
    }

    /// Returns the RGBA value at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Row-major RGBA8 bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// View the buffer as an `image` crate RGBA image (used as the passthrough texture).
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }
}

/// Compute the working size for an image so that `max(width, height) <= max_dim`.
///
/// Aspect ratio is preserved; images already within bounds are returned unchanged.
/// Each axis is at least one pixel.
pub fn target_dimensions(width: u32, height: u32, max_dim: u32) -> (u32, u32) {
    let largest = width.max(height);
    if largest <= max_dim {
        return (width, height);
    }
    let scale = max_dim as f64 / largest as f64;
    let w = ((width as f64 * scale).round() as u32).clamp(1, max_dim);
    let h = ((height as f64 * scale).round() as u32).clamp(1, max_dim);
    (w, h)
}

/// Decode encoded image bytes and resample them to at most `max_dim` on the long edge.
///
/// # Errors
///
/// Returns [`TerrainError::ImageDecode`] if the bytes are not a supported image,
/// or [`TerrainError::EmptyImage`] if the decoded image has no pixels.
pub fn sample_image(bytes: &[u8], max_dim: u32) -> Result<SampledImage, TerrainError> {
    let decoded = image::load_from_memory(bytes).map_err(TerrainError::ImageDecode)?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(TerrainError::EmptyImage);
    }

    let (tw, th) = target_dimensions(width, height, max_dim.max(1));
    let resized = if (tw, th) != (width, height) {
        debug!(width, height, tw, th, "resampling image");
        image::imageops::resize(&rgba, tw, th, FilterType::Lanczos3)
    } else {
        rgba
    };

    Ok(SampledImage {
        width: tw,
        height: th,
        pixels: resized.into_raw(),
    })
}
