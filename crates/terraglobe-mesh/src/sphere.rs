//! Unit UV-sphere generation with image-driven tessellation.

use glam::Vec3;

/// Fewest horizontal segments a globe is built with.
pub const MIN_WIDTH_SEGMENTS: u32 = 8;
/// Fewest vertical segments a globe is built with.
pub const MIN_HEIGHT_SEGMENTS: u32 = 6;
/// Most segments along either axis, regardless of image size.
pub const MAX_SEGMENTS: u32 = 256;

/// Segment counts for an image of `width x height` pixels: one segment per pixel gap,
/// bounded so vertex count stays fixed for large images.
pub fn tessellation(width: u32, height: u32) -> (u32, u32) {
    let ws = width.saturating_sub(1).clamp(MIN_WIDTH_SEGMENTS, MAX_SEGMENTS);
    let hs = height.saturating_sub(1).clamp(MIN_HEIGHT_SEGMENTS, MAX_SEGMENTS);
    (ws, hs)
}

/// A unit sphere laid out as a `(width_segments + 1) x (height_segments + 1)` vertex grid.
pub struct UvSphere {
    /// Unit-length vertex directions.
    pub directions: Vec<Vec3>,
    /// Per-vertex UV; `v = 1` at the north pole.
    pub uvs: Vec<[f32; 2]>,
    /// Triangle indices. Degenerate pole triangles are omitted.
    pub indices: Vec<u32>,
    /// Horizontal segment count.
    pub width_segments: u32,
    /// Vertical segment count.
    pub height_segments: u32,
}

/// Generate a unit UV sphere.
///
/// Row 0 is the north pole (`+Y`). Each row runs a full turn around `Y`, with
/// the first and last column coincident to carry the texture seam.
pub fn generate_uv_sphere(width_segments: u32, height_segments: u32) -> UvSphere {
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);
    let cols = ws + 1;
    let vertex_count = (cols * (hs + 1)) as usize;

    let mut directions = Vec::with_capacity(vertex_count);
    let mut uvs = Vec::with_capacity(vertex_count);

    for iy in 0..=hs {
        let v = iy as f32 / hs as f32;
        let theta = v * std::f32::consts::PI;
        let (sin_t, cos_t) = theta.sin_cos();
        for ix in 0..=ws {
            let u = ix as f32 / ws as f32;
            let phi = u * std::f32::consts::TAU;
            let (sin_p, cos_p) = phi.sin_cos();
            directions.push(Vec3::new(-cos_p * sin_t, cos_t, sin_p * sin_t));
            uvs.push([u, 1.0 - v]);
        }
    }

    let mut indices = Vec::with_capacity((ws * hs * 6) as usize);
    for iy in 0..hs {
        for ix in 0..ws {
            let a = iy * cols + ix + 1;
            let b = iy * cols + ix;
            let c = (iy + 1) * cols + ix;
            let d = (iy + 1) * cols + ix + 1;
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != hs - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    UvSphere {
        directions,
        uvs,
        indices,
        width_segments: ws,
        height_segments: hs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tessellation_bounds() {
        for (w, h) in [(1, 1), (2, 3), (9, 7), (100, 50), (1024, 512), (5000, 4000), (0, 0)] {
            let (ws, hs) = tessellation(w, h);
            assert!((8..=256).contains(&ws), "{w}x{h} -> ws {ws}");
            assert!((6..=256).contains(&hs), "{w}x{h} -> hs {hs}");
        }
        assert_eq!(tessellation(65, 33), (64, 32));
        assert_eq!(tessellation(1024, 512), (256, 256));
        assert_eq!(tessellation(2, 2), (8, 6));
    }

    #[test]
    fn test_vertices_on_unit_sphere() {
        let sphere = generate_uv_sphere(16, 8);
        for dir in &sphere.directions {
            assert!((dir.length() - 1.0).abs() < 1e-5, "length {}", dir.length());
        }
    }

    #[test]
    fn test_vertex_and_triangle_counts() {
        let sphere = generate_uv_sphere(16, 8);
        assert_eq!(sphere.directions.len(), 17 * 9);
        assert_eq!(sphere.uvs.len(), sphere.directions.len());
        // Two triangles per quad, minus one per quad on each pole row.
        assert_eq!(sphere.indices.len() / 3, 16 * 8 * 2 - 2 * 16);
    }

    #[test]
    fn test_indices_valid() {
        let sphere = generate_uv_sphere(12, 6);
        let n = sphere.directions.len() as u32;
        assert!(sphere.indices.iter().all(|&i| i < n));
    }

    #[test]
    fn test_poles_and_uvs() {
        let sphere = generate_uv_sphere(8, 6);
        assert!((sphere.directions[0].y - 1.0).abs() < 1e-6);
        assert!((sphere.directions.last().unwrap().y + 1.0).abs() < 1e-6);
        assert_eq!(sphere.uvs[0], [0.0, 1.0]);
        assert_eq!(*sphere.uvs.last().unwrap(), [1.0, 0.0]);
    }
}
