//! Smooth vertex normals from final (displaced) positions.

use glam::Vec3;

/// Area-weighted smooth normals for an indexed triangle list.
///
/// Each face normal (unnormalized cross product, so larger faces weigh more) is
/// added to its three vertices. Vertices touched by no face with area, such as
/// the unused pole seam vertex, fall back to their normalized position.
pub fn compute_smooth_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut accum = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        accum[a] += face;
        accum[b] += face;
        accum[c] += face;
    }

    accum
        .into_iter()
        .zip(positions)
        .map(|(n, p)| {
            n.try_normalize()
                .or_else(|| p.try_normalize())
                .unwrap_or(Vec3::Y)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sphere::generate_uv_sphere;

    #[test]
    fn test_sphere_normals_point_outward() {
        let sphere = generate_uv_sphere(32, 16);
        let normals = compute_smooth_normals(&sphere.directions, &sphere.indices);
        for (n, p) in normals.iter().zip(&sphere.directions) {
            assert!((n.length() - 1.0).abs() < 1e-4);
            assert!(n.dot(*p) > 0.9, "normal {n} not aligned with {p}");
        }
    }

    #[test]
    fn test_isolated_vertex_falls_back_to_position() {
        let positions = [Vec3::new(0.0, 0.0, 2.0)];
        let normals = compute_smooth_normals(&positions, &[]);
        assert_eq!(normals[0], Vec3::Z);
    }
}
