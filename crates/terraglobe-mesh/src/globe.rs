//! Height-displaced globe mesh built from a height field and palette settings.

use glam::Vec3;
use terraglobe_terrain::{HeightField, PaletteId, resolve_color};
use tracing::debug;

use crate::normals::compute_smooth_normals;
use crate::sphere::{generate_uv_sphere, tessellation};

/// Raw height-scale slider units per unit of displacement.
const HEIGHT_SCALE_DIVISOR: f32 = 50.0;

/// Inputs besides the height field that shape the mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshParams {
    /// Displacement multiplier, already normalized (see [`normalized_height_scale`]).
    pub height_scale: f32,
    /// Sea level in `[0, 1]`, used by the geographic palette.
    pub sea_level: f32,
    /// Palette used for vertex colors.
    pub palette: PaletteId,
    /// Contour band count when contour banding is on.
    pub contours: Option<u32>,
}

impl Default for MeshParams {
    fn default() -> Self {
        Self {
            height_scale: normalized_height_scale(5.0, 1.0),
            sea_level: 0.3,
            palette: PaletteId::Terrain,
            contours: None,
        }
    }
}

/// Convert a raw height-scale slider value into the displacement multiplier for a
/// body of the given radius.
pub fn normalized_height_scale(raw: f32, body_radius: f32) -> f32 {
    let radius = if body_radius > 0.0 { body_radius } else { 1.0 };
    raw / HEIGHT_SCALE_DIVISOR / radius
}

/// Radius of a displaced vertex: `h = 0.5` stays on the unit sphere.
pub fn displaced_radius(h: f32, height_scale: f32) -> f32 {
    1.0 + (h - 0.5) * 2.0 * height_scale
}

/// Renderer-ready globe geometry. Never mutated after construction.
#[derive(Clone, Debug)]
pub struct MeshGeometry {
    /// Displaced vertex positions.
    pub positions: Vec<[f32; 3]>,
    /// Smooth normals recomputed from the displaced positions.
    pub normals: Vec<[f32; 3]>,
    /// Per-vertex UV; used for the image texture in passthrough mode.
    pub uvs: Vec<[f32; 2]>,
    /// Per-vertex colors, or `None` when the globe is textured with the source image.
    pub colors: Option<Vec<[f32; 3]>>,
    /// Triangle indices.
    pub indices: Vec<u32>,
    /// Horizontal segment count.
    pub width_segments: u32,
    /// Vertical segment count.
    pub height_segments: u32,
}

impl MeshGeometry {
    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns `true` when the renderer should texture the mesh instead of using vertex colors.
    pub fn uses_texture(&self) -> bool {
        self.colors.is_none()
    }

    /// Position buffer as bytes for GPU upload.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Normal buffer as bytes for GPU upload.
    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    /// Index buffer as bytes for GPU upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Build the displaced globe for `field`.
///
/// 1. Tessellate a unit UV sphere from the field's dimensions.
/// 2. Sample each vertex's height at its nearest pixel.
/// 3. Push the vertex to `displaced_radius(h)` along its direction.
/// 4. Color it through the palette, with contour banding if enabled.
/// 5. Recompute smooth normals from the final positions.
pub fn build_globe_mesh(field: &HeightField, params: &MeshParams) -> MeshGeometry {
    let (ws, hs) = tessellation(field.width(), field.height());
    let sphere = generate_uv_sphere(ws, hs);
    let vertex_count = sphere.directions.len();

    let mut displaced: Vec<Vec3> = Vec::with_capacity(vertex_count);
    let mut colors = params
        .palette
        .colors_vertices()
        .then(|| Vec::with_capacity(vertex_count));

    for (dir, uv) in sphere.directions.iter().zip(&sphere.uvs) {
        let h = field.sample_uv(uv[0], uv[1]);
        displaced.push(*dir * displaced_radius(h, params.height_scale));

        if let Some(colors) = colors.as_mut()
            && let Some(color) = resolve_color(params.palette, h, params.sea_level, params.contours)
        {
            colors.push(color);
        }
    }

    let normals = compute_smooth_normals(&displaced, &sphere.indices);
    debug!(
        width_segments = ws,
        height_segments = hs,
        vertices = vertex_count,
        palette = %params.palette,
        "built globe mesh"
    );

    MeshGeometry {
        positions: displaced.iter().map(|p| p.to_array()).collect(),
        normals: normals.iter().map(|n| n.to_array()).collect(),
        uvs: sphere.uvs,
        colors,
        indices: sphere.indices,
        width_segments: ws,
        height_segments: hs,
    }
}
