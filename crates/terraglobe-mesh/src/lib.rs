//! Displaced-sphere mesh synthesis: UV sphere tessellation, height displacement,
//! per-vertex palette colors, smooth normals, and a keyed mesh cache.

pub mod cache;
pub mod globe;
pub mod normals;
pub mod sphere;

pub use cache::{MeshCache, MeshKey};
pub use globe::{MeshGeometry, MeshParams, build_globe_mesh, displaced_radius, normalized_height_scale};
pub use normals::compute_smooth_normals;
pub use sphere::{MAX_SEGMENTS, MIN_HEIGHT_SEGMENTS, MIN_WIDTH_SEGMENTS, UvSphere, generate_uv_sphere, tessellation};
