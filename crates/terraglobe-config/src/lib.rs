//! Configuration for terraglobe.
//!
//! Settings persist to disk as RON, accept CLI overrides via clap, and survive
//! missing or unknown fields. Named display presets live in a separate RON list.

mod cli;
mod config;
mod error;
mod preset;

pub use cli::CliArgs;
pub use config::{
    AnimationConfig, Config, DebugConfig, DisplayConfig, ImageConfig, ViewPreset,
    default_config_dir,
};
pub use error::ConfigError;
pub use preset::{Preset, PresetStore};
