//! Named display presets persisted as a RON list.

use std::path::Path;

use serde::{Deserialize, Serialize};
use terraglobe_terrain::{HeightMode, PaletteId};

use crate::config::{DisplayConfig, ViewPreset, read_ron, write_ron};
use crate::error::ConfigError;

const PRESETS_FILE: &str = "presets.ron";

/// A named snapshot of display parameters.
///
/// Every field but the name is optional: loading a preset only overwrites the
/// fields it carries.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Preset {
    pub name: String,
    pub height_scale: Option<f32>,
    pub height_mode: Option<HeightMode>,
    pub wireframe: Option<bool>,
    pub view: Option<ViewPreset>,
    pub palette: Option<PaletteId>,
    pub sea_level: Option<f32>,
    pub show_contours: Option<bool>,
    pub contour_steps: Option<u32>,
    pub sun_azimuth: Option<f32>,
    pub sun_elevation: Option<f32>,
}

impl Preset {
    /// Capture every display field under `name`.
    pub fn capture(name: impl Into<String>, display: &DisplayConfig) -> Self {
        Self {
            name: name.into(),
            height_scale: Some(display.height_scale),
            height_mode: Some(display.height_mode),
            wireframe: Some(display.wireframe),
            view: Some(display.view),
            palette: Some(display.palette),
            sea_level: Some(display.sea_level),
            show_contours: Some(display.show_contours),
            contour_steps: Some(display.contour_steps),
            sun_azimuth: Some(display.sun_azimuth),
            sun_elevation: Some(display.sun_elevation),
        }
    }

    /// Write the fields this preset carries onto `display`, leaving the rest untouched.
    pub fn apply_to(&self, display: &mut DisplayConfig) {
        if let Some(v) = self.height_scale {
            display.height_scale = v;
        }
        if let Some(v) = self.height_mode {
            display.height_mode = v;
        }
        if let Some(v) = self.wireframe {
            display.wireframe = v;
        }
        if let Some(v) = self.view {
            display.view = v;
        }
        if let Some(v) = self.palette {
            display.palette = v;
        }
        if let Some(v) = self.sea_level {
            display.sea_level = v;
        }
        if let Some(v) = self.show_contours {
            display.show_contours = v;
        }
        if let Some(v) = self.contour_steps {
            display.contour_steps = v;
        }
        if let Some(v) = self.sun_azimuth {
            display.sun_azimuth = v;
        }
        if let Some(v) = self.sun_elevation {
            display.sun_elevation = v;
        }
    }
}

/// The list of saved presets.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PresetStore {
    presets: Vec<Preset>,
}

impl PresetStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `presets.ron` from `dir`; a missing file yields an empty store.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(PRESETS_FILE);
        if !path.exists() {
            return Ok(Self::new());
        }
        let presets: Vec<Preset> = read_ron(&path)?;
        log::debug!("{} presets in {}", presets.len(), path.display());
        Ok(Self { presets })
    }

    /// Write the store to `dir/presets.ron`.
    pub fn save(&self, dir: &Path) -> Result<(), ConfigError> {
        write_ron(&dir.join(PRESETS_FILE), &self.presets)
    }

    /// Insert `preset`, replacing any existing preset with the same name.
    pub fn upsert(&mut self, preset: Preset) {
        match self.presets.iter_mut().find(|p| p.name == preset.name) {
            Some(existing) => *existing = preset,
            None => self.presets.push(preset),
        }
    }

    /// Remove the preset called `name`. Returns whether one was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.presets.len();
        self.presets.retain(|p| p.name != name);
        self.presets.len() != before
    }

    /// Look up a preset by name.
    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.name == name)
    }

    /// Preset names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.iter().map(|p| p.name.as_str())
    }

    /// Number of presets.
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Returns `true` if there are no presets.
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}
