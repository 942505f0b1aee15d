//! Command-line overrides for configuration values.

use std::path::PathBuf;

use clap::Args;
use terraglobe_terrain::palette::CONTOUR_STEPS_RANGE;
use terraglobe_terrain::{HeightMode, PaletteId};

use crate::Config;

/// Display and runtime overrides shared by every terraglobe command.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Args, Debug, Default, Clone)]
pub struct CliArgs {
    /// Vertex color palette (e.g. terrain, viridis, geographic, image).
    #[arg(long)]
    pub palette: Option<PaletteId>,

    /// Pixel-to-height reduction (luminance, red, green, blue, maxRGB, minRGB).
    #[arg(long)]
    pub height_mode: Option<HeightMode>,

    /// Raw height-scale slider value.
    #[arg(long)]
    pub height_scale: Option<f32>,

    /// Sea level in [0, 1].
    #[arg(long)]
    pub sea_level: Option<f32>,

    /// Enable contour banding with this many bands.
    #[arg(long)]
    pub contours: Option<u32>,

    /// Longest image edge kept after downsampling.
    #[arg(long)]
    pub max_dimension: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Overwrite loaded settings with whatever was given on the command line.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(p) = args.palette {
            self.display.palette = p;
        }
        if let Some(m) = args.height_mode {
            self.display.height_mode = m;
        }
        if let Some(s) = args.height_scale {
            self.display.height_scale = s;
        }
        if let Some(s) = args.sea_level {
            self.display.sea_level = s.clamp(0.0, 1.0);
        }
        if let Some(steps) = args.contours {
            let (lo, hi) = CONTOUR_STEPS_RANGE;
            self.display.show_contours = true;
            self.display.contour_steps = steps.clamp(lo, hi);
        }
        if let Some(d) = args.max_dimension {
            self.image.max_dimension = d;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_loaded_values() {
        let mut config = Config::default();
        let args = CliArgs {
            palette: Some(PaletteId::Plasma),
            sea_level: Some(1.5),
            contours: Some(24),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.display.palette, PaletteId::Plasma);
        assert_eq!(config.display.sea_level, 1.0);
        assert!(config.display.show_contours);
        assert_eq!(config.display.contour_steps, 24);
        // Untouched settings keep their loaded values.
        assert_eq!(config.display.height_mode, HeightMode::Luminance);
        assert_eq!(config.image.max_dimension, 1024);
    }

    #[test]
    fn test_contour_steps_clamped() {
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs {
            contours: Some(200),
            ..Default::default()
        });
        assert_eq!(config.display.contour_steps, 64);
    }

    #[test]
    fn test_empty_args_change_nothing() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }
}
