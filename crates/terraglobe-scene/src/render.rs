//! The seam between scene state and whatever draws it.

use std::sync::Arc;

use glam::DVec3;
use terraglobe_mesh::MeshGeometry;
use terraglobe_terrain::SampledImage;

use crate::body::BodyId;
use crate::error::SceneError;

/// A consumer of scene output: a GPU renderer, a file writer, a test recorder.
///
/// Implementations report an unusable surface as [`SceneError::RenderContext`].
pub trait RenderSurface {
    /// Receive the current mesh of `body`. The same `Arc` is handed out until
    /// the body's mesh inputs change.
    fn upload_mesh(&mut self, body: BodyId, mesh: Arc<MeshGeometry>) -> Result<(), SceneError>;

    /// Receive the texture for a mesh that has no vertex colors. Sent right
    /// after [`RenderSurface::upload_mesh`], only when the body has an image.
    fn upload_texture(&mut self, body: BodyId, image: Arc<SampledImage>) -> Result<(), SceneError>;

    /// Place `body` at `position` with the given radius.
    fn place_body(&mut self, body: BodyId, position: DVec3, radius: f32) -> Result<(), SceneError>;

    /// Draw the trail of `body`, oldest point first.
    fn draw_trail(&mut self, body: BodyId, points: &[DVec3]) -> Result<(), SceneError>;
}
