use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading or writing RON settings files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {}", path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not valid RON for the expected type.
    #[error("{} is not valid settings RON", path.display())]
    ParseError {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("settings could not be encoded as RON")]
    SerializeError(#[from] ron::Error),
}
