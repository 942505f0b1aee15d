//! Per-body configuration records and partial patches.

use serde::{Deserialize, Serialize};
use terraglobe_mesh::{MeshParams, normalized_height_scale};
use terraglobe_orbit::{OrbitCurve, OrbitParams};
use terraglobe_terrain::palette::CONTOUR_STEPS_RANGE;
use terraglobe_terrain::{HeightMode, PaletteId};

/// Stable identifier of a body within a scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u64);

impl std::fmt::Display for BodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Shape of the displaced globe.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Body radius in scene units.
    pub radius: f32,
    /// Raw height-scale slider value; see [`normalized_height_scale`].
    pub height_scale: f32,
    pub height_mode: HeightMode,
    pub wireframe: bool,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            radius: 1.0,
            height_scale: 5.0,
            height_mode: HeightMode::Luminance,
            wireframe: false,
        }
    }
}

/// Vertex coloring controls.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingConfig {
    pub palette: PaletteId,
    /// Sea level in `[0, 1]`.
    pub sea_level: f32,
    pub show_contours: bool,
    /// Contour band count, kept within `[6, 64]`.
    pub contour_steps: u32,
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            palette: PaletteId::Terrain,
            sea_level: 0.3,
            show_contours: false,
            contour_steps: 16,
        }
    }
}

/// Which curve a body follows and how.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub enabled: bool,
    pub curve: OrbitCurve,
    pub params: OrbitParams,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            curve: OrbitCurve::Circle,
            params: OrbitParams::default(),
        }
    }
}

/// Trail drawing controls.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    pub enabled: bool,
    /// Maximum number of retained points, at least 1.
    pub length: usize,
    pub width: f32,
    pub color: [f32; 3],
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            length: 200,
            width: 1.0,
            color: [0.55, 0.75, 1.0],
        }
    }
}

/// Full configuration of one body. Replaced wholesale on every update.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodyConfig {
    pub id: BodyId,
    pub name: String,
    pub is_central: bool,
    /// Label of the source image, if one was loaded.
    pub image: Option<String>,
    pub geometry: GeometryConfig,
    pub shading: ShadingConfig,
    /// Whether the translucent sea sphere is drawn.
    pub show_sea: bool,
    pub orbit: OrbitConfig,
    pub trail: TrailConfig,
}

impl BodyConfig {
    /// A body with default settings.
    pub fn new(id: BodyId, name: impl Into<String>, is_central: bool) -> Self {
        Self {
            id,
            name: name.into(),
            is_central,
            image: None,
            geometry: GeometryConfig::default(),
            shading: ShadingConfig::default(),
            show_sea: false,
            orbit: OrbitConfig {
                enabled: !is_central,
                ..Default::default()
            },
            trail: TrailConfig::default(),
        }
    }

    /// Mesh inputs derived from this body's settings.
    pub fn mesh_params(&self) -> MeshParams {
        MeshParams {
            height_scale: normalized_height_scale(self.geometry.height_scale, self.geometry.radius),
            sea_level: self.shading.sea_level,
            palette: self.shading.palette,
            contours: self
                .shading
                .show_contours
                .then_some(self.shading.contour_steps),
        }
    }

    /// Pull every bounded field back into range.
    pub fn clamped(mut self) -> Self {
        let (lo, hi) = CONTOUR_STEPS_RANGE;
        self.shading.sea_level = self.shading.sea_level.clamp(0.0, 1.0);
        self.shading.contour_steps = self.shading.contour_steps.clamp(lo, hi);
        self.trail.length = self.trail.length.max(1);
        if self.geometry.radius.is_nan() || self.geometry.radius <= 0.0 {
            self.geometry.radius = 1.0;
        }
        self
    }
}

/// A partial update: every `Some` field overwrites the matching body field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BodyPatch {
    pub name: Option<String>,
    pub is_central: Option<bool>,
    /// `Some(None)` clears the image label.
    pub image: Option<Option<String>>,
    pub radius: Option<f32>,
    pub height_scale: Option<f32>,
    pub height_mode: Option<HeightMode>,
    pub wireframe: Option<bool>,
    pub palette: Option<PaletteId>,
    pub sea_level: Option<f32>,
    pub show_contours: Option<bool>,
    pub contour_steps: Option<u32>,
    pub show_sea: Option<bool>,
    pub orbit_enabled: Option<bool>,
    pub curve: Option<OrbitCurve>,
    pub orbit: Option<OrbitParams>,
    pub trail_enabled: Option<bool>,
    pub trail_length: Option<usize>,
    pub trail_width: Option<f32>,
    pub trail_color: Option<[f32; 3]>,
}

impl BodyPatch {
    /// Build the record that results from applying this patch to `base`.
    pub fn apply(&self, base: &BodyConfig) -> BodyConfig {
        let mut next = base.clone();
        if let Some(name) = &self.name {
            next.name = name.clone();
        }
        if let Some(v) = self.is_central {
            next.is_central = v;
        }
        if let Some(image) = &self.image {
            next.image = image.clone();
        }
        if let Some(v) = self.radius {
            next.geometry.radius = v;
        }
        if let Some(v) = self.height_scale {
            next.geometry.height_scale = v;
        }
        if let Some(v) = self.height_mode {
            next.geometry.height_mode = v;
        }
        if let Some(v) = self.wireframe {
            next.geometry.wireframe = v;
        }
        if let Some(v) = self.palette {
            next.shading.palette = v;
        }
        if let Some(v) = self.sea_level {
            next.shading.sea_level = v;
        }
        if let Some(v) = self.show_contours {
            next.shading.show_contours = v;
        }
        if let Some(v) = self.contour_steps {
            next.shading.contour_steps = v;
        }
        if let Some(v) = self.show_sea {
            next.show_sea = v;
        }
        if let Some(v) = self.orbit_enabled {
            next.orbit.enabled = v;
        }
        if let Some(v) = self.curve {
            next.orbit.curve = v;
        }
        if let Some(v) = self.orbit {
            next.orbit.params = v;
        }
        if let Some(v) = self.trail_enabled {
            next.trail.enabled = v;
        }
        if let Some(v) = self.trail_length {
            next.trail.length = v;
        }
        if let Some(v) = self.trail_width {
            next.trail.width = v;
        }
        if let Some(v) = self.trail_color {
            next.trail.color = v;
        }
        next.clamped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_central_body_does_not_orbit() {
        let central = BodyConfig::new(BodyId(1), "Sun", true);
        assert!(!central.orbit.enabled);
        let moon = BodyConfig::new(BodyId(2), "Moon", false);
        assert!(moon.orbit.enabled);
        assert!(moon.trail.enabled);
    }

    #[test]
    fn test_patch_clamps_bounded_fields() {
        let base = BodyConfig::new(BodyId(1), "A", true);
        let next = BodyPatch {
            sea_level: Some(1.7),
            contour_steps: Some(2),
            trail_length: Some(0),
            ..Default::default()
        }
        .apply(&base);
        assert_eq!(next.shading.sea_level, 1.0);
        assert_eq!(next.shading.contour_steps, 6);
        assert_eq!(next.trail.length, 1);

        let next = BodyPatch {
            contour_steps: Some(500),
            ..Default::default()
        }
        .apply(&base);
        assert_eq!(next.shading.contour_steps, 64);
    }

    #[test]
    fn test_patch_leaves_base_untouched() {
        let base = BodyConfig::new(BodyId(1), "A", false);
        let next = BodyPatch {
            palette: Some(PaletteId::Viridis),
            image: Some(Some("mars.png".into())),
            ..Default::default()
        }
        .apply(&base);
        assert_eq!(base.shading.palette, PaletteId::Terrain);
        assert_eq!(base.image, None);
        assert_eq!(next.shading.palette, PaletteId::Viridis);
        assert_eq!(next.image.as_deref(), Some("mars.png"));
        assert_eq!(next.geometry, base.geometry);
    }

    #[test]
    fn test_mesh_params_normalize_height_scale() {
        let mut body = BodyConfig::new(BodyId(1), "A", true);
        body.geometry.height_scale = 10.0;
        body.geometry.radius = 2.0;
        body.shading.show_contours = true;
        let params = body.mesh_params();
        assert!((params.height_scale - 0.1).abs() < 1e-6);
        assert_eq!(params.contours, Some(16));
    }

    #[test]
    fn test_body_config_ron_roundtrip() {
        let body = BodyConfig::new(BodyId(3), "Io", false);
        let text = ron::to_string(&body).unwrap();
        let back: BodyConfig = ron::from_str(&text).unwrap();
        assert_eq!(back, body);
    }
}
