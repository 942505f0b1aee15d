//! Settings sections, their defaults, and RON persistence.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use terraglobe_terrain::{DEFAULT_MAX_DIMENSION, HeightMode, PaletteId};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Everything persisted in `config.ron`. Missing sections and fields fall
/// back to their defaults; unknown ones are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub image: ImageConfig,
    pub animation: AnimationConfig,
    pub debug: DebugConfig,
}

/// Camera framing presets offered by the viewer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewPreset {
    #[default]
    Perspective,
    Top,
    Front,
    Side,
}

/// Global display parameters. These are also what a [`crate::Preset`] captures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Raw height-scale slider value (divided by 50 and the body radius before use).
    pub height_scale: f32,
    /// Pixel-to-height reduction.
    pub height_mode: HeightMode,
    /// Draw the globe as wireframe.
    pub wireframe: bool,
    /// Camera framing.
    pub view: ViewPreset,
    /// Vertex color palette.
    pub palette: PaletteId,
    /// Sea level in `[0, 1]`.
    pub sea_level: f32,
    /// Enable contour banding.
    pub show_contours: bool,
    /// Number of contour bands, `6..=64`.
    pub contour_steps: u32,
    /// Sun azimuth in degrees.
    pub sun_azimuth: f32,
    /// Sun elevation in degrees.
    pub sun_elevation: f32,
}

/// How source images are decoded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImageConfig {
    /// Longest edge kept after downsampling.
    pub max_dimension: u32,
    /// Number of background decode threads.
    pub decode_threads: usize,
}

/// Clock settings for orbit animation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    /// Multiplier applied to every tick's delta time.
    pub time_scale: f64,
    /// Default trail length for new bodies.
    pub trail_length: usize,
    /// Fixed tick length used by headless simulation, in seconds.
    pub fixed_dt: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            height_scale: 5.0,
            height_mode: HeightMode::Luminance,
            wireframe: false,
            view: ViewPreset::Perspective,
            palette: PaletteId::Terrain,
            sea_level: 0.3,
            show_contours: false,
            contour_steps: 16,
            sun_azimuth: 45.0,
            sun_elevation: 30.0,
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
            decode_threads: 1,
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            trail_length: 200,
            fixed_dt: 1.0 / 60.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Platform config directory for terraglobe, falling back to the working directory.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("terraglobe"))
        .unwrap_or_else(|| PathBuf::from(".terraglobe"))
}

fn pretty() -> ron::ser::PrettyConfig {
    ron::ser::PrettyConfig::new()
        .depth_limit(3)
        .separate_tuple_members(true)
        .enumerate_arrays(false)
}

/// Parse the RON file at `path`.
pub(crate) fn read_ron<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&text).map_err(|source| ConfigError::ParseError {
        path: path.to_path_buf(),
        source,
    })
}

/// Pretty-print `value` as RON into `path`, creating parent directories.
pub(crate) fn write_ron<T: Serialize>(path: &Path, value: &T) -> Result<(), ConfigError> {
    let text = ron::ser::to_string_pretty(value, pretty())?;
    let write_err = |source| ConfigError::WriteError {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, text).map_err(write_err)
}

impl Config {
    /// Read `config.ron` from `config_dir`, writing the defaults there first if
    /// the file does not exist yet.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(CONFIG_FILE);
        if !path.exists() {
            let config = Config::default();
            write_ron(&path, &config)?;
            log::info!("Wrote default settings to {}", path.display());
            return Ok(config);
        }
        let config = read_ron(&path)?;
        log::info!("Settings loaded from {}", path.display());
        Ok(config)
    }

    /// Write this config to `config_dir/config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        write_ron(&config_dir.join(CONFIG_FILE), self)
    }

    /// Re-read `config.ron`; `Some` only when it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let fresh: Config = read_ron(&config_dir.join(CONFIG_FILE))?;
        if fresh == *self {
            return Ok(None);
        }
        log::info!("Settings changed on disk");
        Ok(Some(fresh))
    }
}
