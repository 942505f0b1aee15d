use std::path::PathBuf;

use terraglobe_config::ConfigError;
use terraglobe_scene::SceneError;
use thiserror::Error;

/// Anything a command can fail with.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error("configuration error")]
    Config(#[from] ConfigError),

    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write texture {}", path.display())]
    Texture {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("timed out decoding {}", .0.display())]
    DecodeTimeout(PathBuf),

    #[error("no preset named '{0}'")]
    UnknownPreset(String),
}
