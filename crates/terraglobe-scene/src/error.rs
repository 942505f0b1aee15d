use terraglobe_terrain::TerrainError;
use thiserror::Error;

use crate::body::BodyId;

/// Failures surfaced by scene operations.
///
/// Every variant is local to one body or one call; none leaves other bodies
/// in a modified state.
#[derive(Debug, Error)]
pub enum SceneError {
    /// The image for `body` could not be decoded. Its previous terrain is kept.
    #[error("failed to decode image for body {body}")]
    ImageDecode {
        body: BodyId,
        #[source]
        source: TerrainError,
    },

    /// The drawing surface is gone.
    #[error("render context unavailable: {0}")]
    RenderContext(String),

    /// An export was requested before any height field was computed.
    #[error("body {body} has no height field to export")]
    ExportPrecondition { body: BodyId },

    #[error("unknown body {0}")]
    UnknownBody(BodyId),

    #[error("cannot remove the last body")]
    LastBody,

    /// The background loader queue is full.
    #[error("image loader is busy, request for body {body} was not queued")]
    LoaderBusy { body: BodyId },

    #[error("heightmap export failed")]
    Export(#[source] TerrainError),
}
