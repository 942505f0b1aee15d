//! terraglobe: turn an image into a displaced globe and animate bodies around it.
//!
//! Headless front end for the scene core. Every command loads `config.ron`
//! from the config directory, applies command-line overrides and initializes
//! logging before it runs.
//!
//! Run with: `cargo run -p terraglobe-app -- globe earth.png --out earth.obj`

mod clock;
mod commands;
mod error;
mod obj;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use terraglobe_config::{CliArgs, Config, default_config_dir};
use terraglobe_orbit::OrbitCurve;
use tracing::{error, info};

use crate::error::AppError;

/// CLI arguments for the terraglobe binary.
#[derive(Parser, Debug)]
#[command(name = "terraglobe", version, about = "Image-displaced globes with orbiting bodies")]
struct Cli {
    #[command(flatten)]
    overrides: CliArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the globe for an image and write the scene as Wavefront OBJ.
    Globe {
        /// Source image.
        image: PathBuf,
        /// Output OBJ path.
        #[arg(long, default_value = "globe.obj")]
        out: PathBuf,
        /// Number of orbiting bodies to add.
        #[arg(long, default_value_t = 0)]
        moons: u32,
        /// Seconds of animation to simulate before writing.
        #[arg(long, default_value_t = 0.0)]
        seconds: f64,
    },
    /// Export the height field of an image as PNG or TIFF (by extension).
    Heightmap {
        image: PathBuf,
        #[arg(long, default_value = "heightmap.png")]
        out: PathBuf,
    },
    /// Height under a surface UV coordinate.
    Probe {
        image: PathBuf,
        u: f32,
        v: f32,
    },
    /// Simulate one orbiting body and print its trail.
    Orbit {
        /// Curve family (circle, ellipse, inclinedEllipse, lissajous, rose,
        /// lemniscate, trefoil, figure8Knot, epicycloid).
        #[arg(long, default_value = "circle")]
        curve: OrbitCurve,
        #[arg(long, default_value_t = 3.0)]
        radius: f64,
        #[arg(long, default_value_t = 0.5)]
        speed: f64,
        /// Seconds of animation to simulate.
        #[arg(long, default_value_t = 2.0)]
        seconds: f64,
        /// Frame time fed to the fixed-step clock.
        #[arg(long, default_value_t = 1.0 / 30.0)]
        frame: f64,
    },
    /// List palettes with a color preview.
    Palettes {
        #[arg(long, default_value_t = 6)]
        samples: usize,
    },
    /// Manage saved display presets.
    Preset {
        #[command(subcommand)]
        action: PresetAction,
    },
}

#[derive(Subcommand, Debug)]
enum PresetAction {
    /// List saved presets.
    List,
    /// Save the current display settings under a name.
    Save { name: String },
    /// Print a saved preset.
    Show { name: String },
    /// Delete a saved preset.
    Delete { name: String },
}

fn main() {
    let cli = Cli::parse();
    let config_dir = cli.overrides.config.clone().unwrap_or_else(default_config_dir);

    let mut config = match Config::load_or_create(&config_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config from {}: {e}", config_dir.display());
            Config::default()
        }
    };
    config.apply_cli_overrides(&cli.overrides);

    let log_dir = config_dir.join("logs");
    if let Err(e) = terraglobe_log::init_logging(
        Some(&log_dir),
        cfg!(debug_assertions),
        Some(&config),
    ) {
        eprintln!("Logging unavailable: {e}");
    }
    info!("terraglobe {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli.command, &config, &config_dir) {
        report(&e);
        std::process::exit(1);
    }
}

fn run(command: Command, config: &Config, config_dir: &std::path::Path) -> Result<(), AppError> {
    match command {
        Command::Globe {
            image,
            out,
            moons,
            seconds,
        } => commands::globe(config, &image, &out, moons, seconds),
        Command::Heightmap { image, out } => commands::heightmap(config, &image, &out),
        Command::Probe { image, u, v } => commands::probe(config, &image, u, v),
        Command::Orbit {
            curve,
            radius,
            speed,
            seconds,
            frame,
        } => commands::orbit(config, curve, radius, speed, seconds, frame),
        Command::Palettes { samples } => {
            commands::palettes(config, samples);
            Ok(())
        }
        Command::Preset { action } => match action {
            PresetAction::List => commands::preset_list(config_dir),
            PresetAction::Save { name } => commands::preset_save(config, config_dir, &name),
            PresetAction::Show { name } => commands::preset_show(config_dir, &name),
            PresetAction::Delete { name } => commands::preset_delete(config_dir, &name),
        },
    }
}

fn report(e: &AppError) {
    error!("{e}");
    let mut source = std::error::Error::source(e);
    while let Some(cause) = source {
        error!("  caused by: {cause}");
        source = cause.source();
    }
}
