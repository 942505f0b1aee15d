//! Height-to-color palettes.
//!
//! Gradient palettes interpolate linearly between fixed stops. The geographic
//! palette is a sea-level-relative step function. The image palette colors
//! nothing and leaves the mesh to be textured with the source image.
//! Contour banding is applied on top of any of them.

mod geographic;
mod tables;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use geographic::{GEOGRAPHIC_COLORS, geographic_color};

/// Shade multiplier applied to odd contour bands.
pub const CONTOUR_DARKEN: f32 = 0.88;

/// Allowed range for the number of contour bands.
pub const CONTOUR_STEPS_RANGE: (u32, u32) = (6, 64);

/// A control point on a gradient: position `t` in `[0, 1]` and a linear RGB color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaletteStop {
    /// Position along the gradient.
    pub t: f32,
    /// Color at this position, each channel in `[0, 1]`.
    pub rgb: [f32; 3],
}

/// Every shading mode a body can use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaletteId {
    Grayscale,
    Viridis,
    Inferno,
    Magma,
    Plasma,
    Turbo,
    Coolwarm,
    Rainbow,
    Ocean,
    Desert,
    Forest,
    #[default]
    Terrain,
    Ice,
    Geographic,
    /// Texture the globe with the source image instead of coloring vertices.
    Image,
}

impl PaletteId {
    /// All palettes, in display order.
    pub const ALL: [PaletteId; 15] = [
        PaletteId::Grayscale,
        PaletteId::Viridis,
        PaletteId::Inferno,
        PaletteId::Magma,
        PaletteId::Plasma,
        PaletteId::Turbo,
        PaletteId::Coolwarm,
        PaletteId::Rainbow,
        PaletteId::Ocean,
        PaletteId::Desert,
        PaletteId::Forest,
        PaletteId::Terrain,
        PaletteId::Ice,
        PaletteId::Geographic,
        PaletteId::Image,
    ];

    /// Stable name used in config files and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            PaletteId::Grayscale => "grayscale",
            PaletteId::Viridis => "viridis",
            PaletteId::Inferno => "inferno",
            PaletteId::Magma => "magma",
            PaletteId::Plasma => "plasma",
            PaletteId::Turbo => "turbo",
            PaletteId::Coolwarm => "coolwarm",
            PaletteId::Rainbow => "rainbow",
            PaletteId::Ocean => "ocean",
            PaletteId::Desert => "desert",
            PaletteId::Forest => "forest",
            PaletteId::Terrain => "terrain",
            PaletteId::Ice => "ice",
            PaletteId::Geographic => "geographic",
            PaletteId::Image => "image",
        }
    }

    /// Stop table for gradient palettes; `None` for geographic and image.
    pub fn stops(self) -> Option<&'static [PaletteStop]> {
        let table: &'static [PaletteStop] = match self {
            PaletteId::Grayscale => &tables::GRAYSCALE,
            PaletteId::Viridis => &tables::VIRIDIS,
            PaletteId::Inferno => &tables::INFERNO,
            PaletteId::Magma => &tables::MAGMA,
            PaletteId::Plasma => &tables::PLASMA,
            PaletteId::Turbo => &tables::TURBO,
            PaletteId::Coolwarm => &tables::COOLWARM,
            PaletteId::Rainbow => &tables::RAINBOW,
            PaletteId::Ocean => &tables::OCEAN,
            PaletteId::Desert => &tables::DESERT,
            PaletteId::Forest => &tables::FOREST,
            PaletteId::Terrain => &tables::TERRAIN,
            PaletteId::Ice => &tables::ICE,
            PaletteId::Geographic | PaletteId::Image => return None,
        };
        Some(table)
    }

    /// Returns `true` when the mesh should carry per-vertex colors.
    pub fn colors_vertices(self) -> bool {
        self != PaletteId::Image
    }

    /// `n` evenly spaced colors across `[0, 1]`, using `sea_level` for the geographic palette.
    pub fn preview(self, n: usize, sea_level: f32) -> Vec<[f32; 3]> {
        let denom = n.saturating_sub(1).max(1) as f32;
        (0..n)
            .filter_map(|i| resolve_color(self, i as f32 / denom, sea_level, None))
            .collect()
    }
}

impl FromStr for PaletteId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaletteId::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown palette '{s}'"))
    }
}

impl std::fmt::Display for PaletteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Linearly interpolate a stop table at `h`, clamping outside the first and last stops.
pub fn sample_gradient(stops: &[PaletteStop], h: f32) -> [f32; 3] {
    let Some(first) = stops.first() else {
        return [0.0; 3];
    };
    let h = h.clamp(0.0, 1.0);
    if h <= first.t {
        return first.rgb;
    }
    for pair in stops.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if h < hi.t {
            let span = hi.t - lo.t;
            let f = if span > 0.0 { (h - lo.t) / span } else { 0.0 };
            return [
                lo.rgb[0] + (hi.rgb[0] - lo.rgb[0]) * f,
                lo.rgb[1] + (hi.rgb[1] - lo.rgb[1]) * f,
                lo.rgb[2] + (hi.rgb[2] - lo.rgb[2]) * f,
            ];
        }
    }
    stops[stops.len() - 1].rgb
}

/// Shade factor for contour banding: `0.88` on odd bands, `1.0` on even ones.
pub fn contour_shade(h: f32, steps: u32) -> f32 {
    let band = (h * steps as f32).floor() as i64;
    if band.rem_euclid(2) == 1 {
        CONTOUR_DARKEN
    } else {
        1.0
    }
}

/// Resolve the final vertex color for height `h`.
///
/// `contours` carries the band count when contour banding is enabled. Returns
/// `None` for [`PaletteId::Image`], which is textured rather than vertex-colored.
pub fn resolve_color(
    palette: PaletteId,
    h: f32,
    sea_level: f32,
    contours: Option<u32>,
) -> Option<[f32; 3]> {
    let base = match palette {
        PaletteId::Image => return None,
        PaletteId::Geographic => geographic_color(h, sea_level),
        gradient => sample_gradient(gradient.stops()?, h),
    };
    let shade = contours.map_or(1.0, |steps| contour_shade(h, steps));
    Some([base[0] * shade, base[1] * shade, base[2] * shade])
}
