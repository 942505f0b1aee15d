//! Memoized globe meshes keyed on every input that affects the geometry.

use std::sync::Arc;

use terraglobe_terrain::{HeightField, HeightFieldId, PaletteId};
use tracing::trace;

use crate::globe::{MeshGeometry, MeshParams, build_globe_mesh};

/// Everything a globe mesh depends on. Floats are compared by bit pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshKey {
    /// Identity of the source height field.
    pub field: HeightFieldId,
    /// `f32::to_bits` of the normalized height scale.
    pub height_scale_bits: u32,
    /// `f32::to_bits` of the sea level.
    pub sea_level_bits: u32,
    /// Palette used for vertex colors.
    pub palette: PaletteId,
    /// Whether contour banding is on.
    pub show_contours: bool,
    /// Band count; only meaningful when `show_contours` is set.
    pub contour_steps: u32,
}

impl MeshKey {
    /// Key for building `field` with `params`.
    pub fn new(field: &HeightField, params: &MeshParams) -> Self {
        Self {
            field: field.id(),
            height_scale_bits: params.height_scale.to_bits(),
            sea_level_bits: params.sea_level.to_bits(),
            palette: params.palette,
            show_contours: params.contours.is_some(),
            contour_steps: params.contours.unwrap_or(0),
        }
    }
}

/// Holds the most recent mesh and rebuilds only when its key changes.
///
/// The mesh is shared as an `Arc`, so a consumer holding the previous mesh keeps a
/// complete, valid geometry until it pulls the replacement.
#[derive(Default)]
pub struct MeshCache {
    entry: Option<(MeshKey, Arc<MeshGeometry>)>,
    hits: u64,
    misses: u64,
}

impl MeshCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached mesh for `(field, params)`, building it on a key change.
    pub fn get_or_build(&mut self, field: &HeightField, params: &MeshParams) -> Arc<MeshGeometry> {
        let key = MeshKey::new(field, params);
        if let Some((cached_key, mesh)) = &self.entry
            && *cached_key == key
        {
            self.hits += 1;
            return Arc::clone(mesh);
        }

        self.misses += 1;
        trace!(?key, "mesh cache miss");
        let mesh = Arc::new(build_globe_mesh(field, params));
        self.entry = Some((key, Arc::clone(&mesh)));
        mesh
    }

    /// Key of the cached mesh, if any.
    pub fn key(&self) -> Option<MeshKey> {
        self.entry.as_ref().map(|(k, _)| *k)
    }

    /// Drop the cached mesh.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Number of lookups served from the cache.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Number of lookups that rebuilt the mesh.
    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_inputs_hit() {
        let field = HeightField::flat(20, 10, 0.4);
        let params = MeshParams::default();
        let mut cache = MeshCache::new();

        let a = cache.get_or_build(&field, &params);
        let b = cache.get_or_build(&field, &params);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!((cache.hits(), cache.misses()), (1, 1));
    }

    #[test]
    fn test_any_key_change_misses() {
        let field = HeightField::flat(20, 10, 0.4);
        let base = MeshParams::default();
        let mut cache = MeshCache::new();
        cache.get_or_build(&field, &base);

        let variants = [
            MeshParams {
                height_scale: base.height_scale * 2.0,
                ..base
            },
            MeshParams {
                sea_level: 0.9,
                ..base
            },
            MeshParams {
                palette: PaletteId::Ice,
                ..base
            },
            MeshParams {
                contours: Some(12),
                ..base
            },
            MeshParams {
                contours: Some(13),
                ..base
            },
        ];
        for (i, params) in variants.iter().enumerate() {
            cache.get_or_build(&field, params);
            assert_eq!(cache.misses(), i as u64 + 2);
        }

        let other_field = HeightField::flat(20, 10, 0.4);
        cache.get_or_build(&other_field, &variants[4]);
        assert_eq!(cache.misses(), 7);
        assert_eq!(cache.hits(), 0);
    }

    #[test]
    fn test_old_mesh_survives_rebuild() {
        let field = HeightField::flat(20, 10, 0.4);
        let mut cache = MeshCache::new();
        let old = cache.get_or_build(&field, &MeshParams::default());
        let new = cache.get_or_build(
            &field,
            &MeshParams {
                palette: PaletteId::Magma,
                ..Default::default()
            },
        );
        assert!(!Arc::ptr_eq(&old, &new));
        assert_eq!(old.vertex_count(), new.vertex_count());
    }

    #[test]
    fn test_invalidate_forces_rebuild() {
        let field = HeightField::flat(20, 10, 0.4);
        let mut cache = MeshCache::new();
        cache.get_or_build(&field, &MeshParams::default());
        cache.invalidate();
        assert!(cache.key().is_none());
        cache.get_or_build(&field, &MeshParams::default());
        assert_eq!(cache.misses(), 2);
    }
}
