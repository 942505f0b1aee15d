//! Scalar height extraction from sampled pixels, and nearest-pixel probing.

use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::TerrainError;
use crate::sampler::SampledImage;

/// Rec. 709 luma weights.
const LUMA_R: f32 = 0.2126;
const LUMA_G: f32 = 0.7152;
const LUMA_B: f32 = 0.0722;

static NEXT_FIELD_ID: AtomicU64 = AtomicU64::new(1);

/// How a pixel's channels are reduced to a single height value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HeightMode {
    /// Perceptual luminance (Rec. 709 weights).
    #[default]
    Luminance,
    /// Alias of [`HeightMode::Luminance`].
    GrayscaleLum,
    /// Red channel only.
    Red,
    /// Green channel only.
    Green,
    /// Blue channel only.
    Blue,
    /// Brightest of the three channels.
    #[serde(rename = "maxRGB")]
    MaxRgb,
    /// Darkest of the three channels.
    #[serde(rename = "minRGB")]
    MinRgb,
}

impl HeightMode {
    /// Every mode, in display order.
    pub const ALL: [HeightMode; 7] = [
        HeightMode::Luminance,
        HeightMode::GrayscaleLum,
        HeightMode::Red,
        HeightMode::Green,
        HeightMode::Blue,
        HeightMode::MaxRgb,
        HeightMode::MinRgb,
    ];

    /// Stable name used in config files and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            HeightMode::Luminance => "luminance",
            HeightMode::GrayscaleLum => "grayscaleLum",
            HeightMode::Red => "red",
            HeightMode::Green => "green",
            HeightMode::Blue => "blue",
            HeightMode::MaxRgb => "maxRGB",
            HeightMode::MinRgb => "minRGB",
        }
    }

    /// Reduce one pixel to a raw value in `[0, 255]`.
    pub fn raw_value(self, r: u8, g: u8, b: u8) -> f32 {
        let (r, g, b) = (r as f32, g as f32, b as f32);
        match self {
            HeightMode::Luminance | HeightMode::GrayscaleLum => LUMA_R * r + LUMA_G * g + LUMA_B * b,
            HeightMode::Red => r,
            HeightMode::Green => g,
            HeightMode::Blue => b,
            HeightMode::MaxRgb => r.max(g).max(b),
            HeightMode::MinRgb => r.min(g).min(b),
        }
    }
}

/// Unknown names fall back to luminance.
impl FromStr for HeightMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mode = HeightMode::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .unwrap_or(HeightMode::Luminance);
        Ok(mode)
    }
}

impl std::fmt::Display for HeightMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Process-unique identity of a height field. Two fields never share an id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeightFieldId(pub u64);

impl HeightFieldId {
    fn next() -> Self {
        Self(NEXT_FIELD_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A normalized grid of heights, one per source pixel, every value in `[0, 1]`.
///
/// Immutable once built; a new image or extraction mode produces a new field
/// with a new [`HeightFieldId`].
#[derive(Clone, Debug)]
pub struct HeightField {
    id: HeightFieldId,
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl HeightField {
    /// Build a field from row-major values. Values are clamped into `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::FieldSize`] if `values.len() != width * height`
    /// or either dimension is zero.
    pub fn new(width: u32, height: u32, mut values: Vec<f32>) -> Result<Self, TerrainError> {
        if width == 0 || height == 0 || values.len() != width as usize * height as usize {
            return Err(TerrainError::FieldSize {
                width,
                height,
                len: values.len(),
            });
        }
        for v in &mut values {
            *v = v.clamp(0.0, 1.0);
        }
        Ok(Self {
            id: HeightFieldId::next(),
            width,
            height,
            values,
        })
    }

    /// A field where every sample equals `value`. Used for the undisplaced default sphere.
    pub fn flat(width: u32, height: u32, value: f32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            id: HeightFieldId::next(),
            width,
            height,
            values: vec![value.clamp(0.0, 1.0); width as usize * height as usize],
        }
    }

    /// Identity used as part of the mesh cache key.
    pub fn id(&self) -> HeightFieldId {
        self.id
    }

    /// Width in samples.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in samples.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major values.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Height at pixel `(x, y)`; coordinates are clamped to the grid.
    pub fn get(&self, x: u32, y: u32) -> f32 {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        self.values[y as usize * self.width as usize + x as usize]
    }

    /// Map a sphere UV to the nearest pixel.
    ///
    /// `v` runs bottom-to-top on the sphere while image rows run top-to-bottom,
    /// so the vertical axis is flipped.
    pub fn uv_to_pixel(&self, u: f32, v: f32) -> (u32, u32) {
        let u = u.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);
        let x = (u * (self.width - 1) as f32).round() as u32;
        let y = ((1.0 - v) * (self.height - 1) as f32).round() as u32;
        (x, y)
    }

    /// Nearest-neighbor height at a sphere UV.
    pub fn sample_uv(&self, u: f32, v: f32) -> f32 {
        let (x, y) = self.uv_to_pixel(u, v);
        self.get(x, y)
    }
}

/// Reduce every pixel to a height in `[0, 1]` using `mode`.
///
/// Each output depends only on its own pixel.
pub fn extract_heights(image: &SampledImage, mode: HeightMode) -> HeightField {
    let (width, height) = image.dimensions();
    let values = image
        .pixels()
        .chunks_exact(4)
        .map(|px| (mode.raw_value(px[0], px[1], px[2]) / 255.0).clamp(0.0, 1.0))
        .collect();
    HeightField {
        id: HeightFieldId::next(),
        width,
        height,
        values,
    }
}

/// Result of a pointer probe on the globe surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Probe {
    /// Source pixel column.
    pub pixel_x: u32,
    /// Source pixel row.
    pub pixel_y: u32,
    /// Normalized height at that pixel.
    pub height: f32,
}

/// Resolve a surface UV to its source pixel and height, using the mesh's sampling rule.
pub fn probe(field: &HeightField, u: f32, v: f32) -> Probe {
    let (pixel_x, pixel_y) = field.uv_to_pixel(u, v);
    Probe {
        pixel_x,
        pixel_y,
        height: field.get(pixel_x, pixel_y),
    }
}
