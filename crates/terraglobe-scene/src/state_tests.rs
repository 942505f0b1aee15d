//! Scenario tests for scene state transitions.

use std::sync::Arc;
use std::time::Duration;

use glam::DVec3;
use terraglobe_config::{Preset, ViewPreset};
use terraglobe_mesh::MeshGeometry;
use terraglobe_orbit::{OrbitCurve, OrbitParams, orbit_position};
use terraglobe_terrain::{
    DecodedImage, HeightField, HeightMode, ImageLoader, PaletteId, SampledImage,
    encode_heightmap_png,
};

use crate::{BodyId, BodyPatch, LoadOutcome, RenderSurface, SceneError, SceneState};

fn checker_png() -> Vec<u8> {
    let field = HeightField::new(2, 2, vec![0.0, 1.0, 0.0, 1.0]).unwrap();
    encode_heightmap_png(&field).unwrap()
}

fn circle(radius: f64, speed: f64) -> OrbitParams {
    OrbitParams {
        radius_x: radius,
        speed,
        phase: 0.0,
        ..Default::default()
    }
}

#[test]
fn test_new_scene_has_one_central_body() {
    let scene = SceneState::new();
    assert_eq!(scene.body_count(), 1);
    let central = scene.central();
    assert_eq!(scene.selected(), central);
    assert!(scene.body(central).unwrap().is_central);
    assert_eq!(scene.body_position(central), Some(DVec3::ZERO));
}

#[test]
fn test_five_ticks_keep_last_three_positions() {
    let mut scene = SceneState::new();
    let moon = scene.add_body("Moon");
    scene
        .update_body(
            moon,
            &BodyPatch {
                trail_length: Some(3),
                curve: Some(OrbitCurve::Circle),
                orbit: Some(circle(2.0, 1.0)),
                ..Default::default()
            },
        )
        .unwrap();

    for _ in 0..5 {
        scene.tick(0.1);
    }

    let trail = scene.trail(moon).unwrap().to_vec();
    assert_eq!(trail.len(), 3);
    let params = circle(2.0, 1.0);
    for (i, tick) in [3, 4, 5].into_iter().enumerate() {
        let expected = orbit_position(0.1 * tick as f64, OrbitCurve::Circle, &params);
        assert!((trail[i] - expected).length() < 1e-9, "tick {tick}");
    }
    assert!((scene.body_position(moon).unwrap() - trail[2]).length() < 1e-12);
}

#[test]
fn test_central_and_disabled_bodies_do_not_accumulate() {
    let mut scene = SceneState::new();
    let central = scene.central();
    let moon = scene.add_body("Moon");
    scene.tick(0.5);
    scene.tick(0.5);
    assert!(scene.trail(central).unwrap().is_empty());
    assert_eq!(scene.trail(moon).unwrap().len(), 2);

    scene
        .update_body(
            moon,
            &BodyPatch {
                orbit_enabled: Some(false),
                ..Default::default()
            },
        )
        .unwrap();
    let frozen = scene.body_position(moon).unwrap();
    scene.tick(0.5);
    assert_eq!(scene.trail(moon).unwrap().len(), 2);
    assert_eq!(scene.body_position(moon).unwrap(), frozen);
}

#[test]
fn test_disabled_trail_freezes_but_body_moves() {
    let mut scene = SceneState::new();
    let moon = scene.add_body("Moon");
    scene.tick(0.25);
    scene
        .update_body(
            moon,
            &BodyPatch {
                trail_enabled: Some(false),
                ..Default::default()
            },
        )
        .unwrap();
    let before = scene.body_position(moon).unwrap();
    scene.tick(0.25);
    assert_eq!(scene.trail(moon).unwrap().len(), 1);
    assert_ne!(scene.body_position(moon).unwrap(), before);
}

#[test]
fn test_time_scale_multiplies_dt() {
    let mut scene = SceneState::new();
    let moon = scene.add_body("Moon");
    scene.set_time_scale(2.0);
    scene.tick(0.5);
    let body = scene.body(moon).unwrap();
    let expected = orbit_position(1.0, body.orbit.curve, &body.orbit.params);
    assert!((scene.body_position(moon).unwrap() - expected).length() < 1e-12);
}

#[test]
fn test_removing_last_body_fails() {
    let mut scene = SceneState::new();
    let only = scene.central();
    assert!(matches!(scene.remove_body(only), Err(SceneError::LastBody)));
    assert_eq!(scene.body_count(), 1);
}

#[test]
fn test_removing_central_promotes_first_remaining() {
    let mut scene = SceneState::new();
    let central = scene.central();
    let a = scene.add_body("A");
    let b = scene.add_body("B");
    scene.tick(1.0);

    scene.remove_body(central).unwrap();
    assert_eq!(scene.central(), a);
    assert!(scene.body(a).unwrap().is_central);
    assert!(!scene.body(b).unwrap().is_central);
    assert_eq!(scene.body_position(a), Some(DVec3::ZERO));
    assert!(scene.trail(a).unwrap().is_empty());
    assert_eq!(scene.selected(), a);
}

#[test]
fn test_set_central_demotes_others() {
    let mut scene = SceneState::new();
    let old = scene.central();
    let moon = scene.add_body("Moon");
    scene
        .update_body(
            moon,
            &BodyPatch {
                is_central: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(scene.central(), moon);
    assert!(!scene.body(old).unwrap().is_central);
    assert_eq!(scene.bodies().filter(|b| b.is_central).count(), 1);

    let kept = scene
        .update_body(
            moon,
            &BodyPatch {
                is_central: Some(false),
                ..Default::default()
            },
        )
        .unwrap();
    assert!(kept.is_central);

    scene.set_central(old).unwrap();
    assert_eq!(scene.central(), old);
}

#[test]
fn test_update_is_copy_on_write() {
    let mut scene = SceneState::new();
    let id = scene.central();
    let before = scene.body(id).unwrap();
    let after = scene
        .update_body(
            id,
            &BodyPatch {
                palette: Some(PaletteId::Inferno),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(before.shading.palette, PaletteId::Terrain);
    assert_eq!(after.shading.palette, PaletteId::Inferno);
    assert!(!Arc::ptr_eq(&before, &after));
}

#[test]
fn test_unknown_body_is_reported() {
    let mut scene = SceneState::new();
    let ghost = BodyId(999);
    assert!(matches!(
        scene.update_body(ghost, &BodyPatch::default()),
        Err(SceneError::UnknownBody(id)) if id == ghost
    ));
    assert!(matches!(scene.select(ghost), Err(SceneError::UnknownBody(_))));
    assert!(scene.body_position(ghost).is_none());
}

#[test]
fn test_checker_image_gives_expected_heights() {
    let mut scene = SceneState::new();
    let id = scene.central();
    let outcome = scene.load_image_bytes(id, &checker_png()).unwrap();
    assert_eq!(outcome, LoadOutcome::Applied);

    let field = scene.height_field(id).unwrap();
    assert_eq!((field.width(), field.height()), (2, 2));
    for (got, want) in field.values().iter().zip([0.0f32, 1.0, 0.0, 1.0]) {
        assert!((got - want).abs() < 1e-5);
    }
}

#[test]
fn test_stale_decode_discarded() {
    let mut scene = SceneState::new();
    let id = scene.central();
    let first = scene.begin_image_load(id).unwrap();
    let second = scene.begin_image_load(id).unwrap();

    let late = DecodedImage {
        ticket: first,
        result: SampledImage::from_rgba(1, 1, vec![255, 255, 255, 255]),
        decode_time_us: 0,
    };
    assert_eq!(scene.apply_decoded(late).unwrap(), LoadOutcome::Stale);
    assert!(scene.height_field(id).is_none());

    let current = DecodedImage {
        ticket: second,
        result: SampledImage::from_rgba(1, 1, vec![0, 0, 0, 255]),
        decode_time_us: 0,
    };
    assert_eq!(scene.apply_decoded(current).unwrap(), LoadOutcome::Applied);
    assert_eq!(scene.height_field(id).unwrap().values(), &[0.0f32]);
}

#[test]
fn test_height_mode_change_supersedes_inflight_decode() {
    let mut scene = SceneState::new();
    let id = scene.central();
    let ticket = scene.begin_image_load(id).unwrap();
    scene
        .update_body(
            id,
            &BodyPatch {
                height_mode: Some(HeightMode::Red),
                ..Default::default()
            },
        )
        .unwrap();

    let decoded = DecodedImage {
        ticket,
        result: SampledImage::from_rgba(1, 1, vec![255, 0, 0, 255]),
        decode_time_us: 0,
    };
    assert_eq!(scene.apply_decoded(decoded).unwrap(), LoadOutcome::Stale);
    assert!(scene.height_field(id).is_none());
}

#[test]
fn test_height_mode_change_skips_queued_decode() {
    let mut scene = SceneState::new();
    let id = scene.central();
    let loader = ImageLoader::with_defaults();
    let ticket = scene.submit_image(id, checker_png(), &loader).unwrap();
    assert_eq!(loader.latest_generation(id.0), Some(ticket.generation));

    scene
        .update_body(
            id,
            &BodyPatch {
                height_mode: Some(HeightMode::Red),
                ..Default::default()
            },
        )
        .unwrap();
    scene.sync_loader(&loader);
    assert_eq!(loader.latest_generation(id.0), Some(ticket.generation + 1));
    assert_eq!(scene.generation(id), Some(ticket.generation + 1));
}

#[test]
fn test_removed_body_is_forgotten_by_loader() {
    let mut scene = SceneState::new();
    let moon = scene.add_body("Moon");
    let loader = ImageLoader::with_defaults();
    scene.submit_image(moon, checker_png(), &loader).unwrap();
    scene.remove_body(moon).unwrap();

    scene.sync_loader(&loader);
    assert_eq!(loader.latest_generation(moon.0), None);
}

#[test]
fn test_height_mode_change_reextracts() {
    let mut scene = SceneState::new();
    let id = scene.central();
    let ticket = scene.begin_image_load(id).unwrap();
    scene
        .apply_decoded(DecodedImage {
            ticket,
            result: SampledImage::from_rgba(1, 1, vec![255, 0, 0, 255]),
            decode_time_us: 0,
        })
        .unwrap();
    let lum = scene.height_field(id).unwrap();
    assert!((lum.values()[0] - 0.2126).abs() < 1e-4);

    scene
        .update_body(
            id,
            &BodyPatch {
                height_mode: Some(HeightMode::Red),
                ..Default::default()
            },
        )
        .unwrap();
    let red = scene.height_field(id).unwrap();
    assert_eq!(red.values(), &[1.0f32]);
    assert_ne!(red.id(), lum.id());
}

#[test]
fn test_decode_failure_keeps_previous_terrain() {
    let mut scene = SceneState::new();
    let id = scene.central();
    let other = scene.add_body("Moon");
    scene.load_image_bytes(id, &checker_png()).unwrap();
    scene.load_image_bytes(other, &checker_png()).unwrap();
    let before = scene.height_field(id).unwrap().id();

    let err = scene.load_image_bytes(id, b"definitely not an image").unwrap_err();
    assert!(matches!(err, SceneError::ImageDecode { body, .. } if body == id));
    assert_eq!(scene.height_field(id).unwrap().id(), before);
    assert!(scene.height_field(other).is_some());
}

#[test]
fn test_background_loader_applies_latest() {
    let mut scene = SceneState::new();
    let id = scene.central();
    let loader = ImageLoader::with_defaults();
    scene.submit_image(id, checker_png(), &loader).unwrap();

    let mut applied = Vec::new();
    for _ in 0..500 {
        let summary = scene.poll_loader(&loader);
        assert!(summary.failed.is_empty());
        applied.extend(summary.applied);
        if !applied.is_empty() {
            break;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(applied, vec![id]);
    assert!(scene.height_field(id).is_some());
}

#[test]
fn test_mesh_cache_hit_and_miss() {
    let mut scene = SceneState::new();
    let id = scene.central();

    let first = scene.mesh_for(id).unwrap();
    let again = scene.mesh_for(id).unwrap();
    assert!(Arc::ptr_eq(&first, &again));
    let cache = scene.mesh_cache(id).unwrap();
    assert_eq!((cache.hits(), cache.misses()), (1, 1));

    scene
        .update_body(
            id,
            &BodyPatch {
                sea_level: Some(0.6),
                ..Default::default()
            },
        )
        .unwrap();
    let rebuilt = scene.mesh_for(id).unwrap();
    assert!(!Arc::ptr_eq(&first, &rebuilt));
    assert_eq!(scene.mesh_cache(id).unwrap().misses(), 2);
    // The old mesh stays whole for whoever still holds it.
    assert_eq!(first.vertex_count(), rebuilt.vertex_count());

    scene
        .update_body(
            id,
            &BodyPatch {
                wireframe: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
    let same = scene.mesh_for(id).unwrap();
    assert!(Arc::ptr_eq(&rebuilt, &same));
}

#[test]
fn test_default_sphere_is_undisplaced() {
    let mut scene = SceneState::new();
    let mesh = scene.mesh_for(scene.central()).unwrap();
    for p in &mesh.positions {
        let r = DVec3::new(p[0] as f64, p[1] as f64, p[2] as f64).length();
        assert!((r - 1.0).abs() < 1e-5);
    }
}

#[test]
fn test_probe_uses_mesh_sampling() {
    let mut scene = SceneState::new();
    let id = scene.central();
    assert!(scene.probe(id, 0.5, 0.5).is_none());

    scene.load_image_bytes(id, &checker_png()).unwrap();
    let top_left = scene.probe(id, 0.0, 1.0).unwrap();
    assert_eq!((top_left.pixel_x, top_left.pixel_y), (0, 0));
    assert!(top_left.height < 1e-5);
    let top_right = scene.probe(id, 1.0, 1.0).unwrap();
    assert_eq!((top_right.pixel_x, top_right.pixel_y), (1, 0));
    assert!((top_right.height - 1.0).abs() < 1e-5);
}

#[test]
fn test_export_requires_height_field() {
    let dir = tempfile::tempdir().unwrap();
    let mut scene = SceneState::new();
    let id = scene.central();
    let png = dir.path().join("height.png");

    assert!(matches!(
        scene.export_heightmap_png(id, &png),
        Err(SceneError::ExportPrecondition { body }) if body == id
    ));
    assert!(!png.exists());

    scene.load_image_bytes(id, &checker_png()).unwrap();
    scene.export_heightmap_png(id, &png).unwrap();
    let tif = dir.path().join("height.tif");
    scene.export_heightmap_tiff(id, &tif).unwrap();
    assert!(png.exists());
    assert!(tif.exists());
}

#[test]
fn test_preset_leaves_absent_fields_untouched() {
    let mut scene = SceneState::new();
    let id = scene.central();
    scene
        .update_body(
            id,
            &BodyPatch {
                wireframe: Some(true),
                sea_level: Some(0.45),
                ..Default::default()
            },
        )
        .unwrap();

    let preset = Preset {
        name: "ocean".into(),
        palette: Some(PaletteId::Ocean),
        view: Some(ViewPreset::Top),
        ..Default::default()
    };
    let body = scene.apply_preset(&preset).unwrap();
    assert_eq!(body.shading.palette, PaletteId::Ocean);
    assert!(body.geometry.wireframe);
    assert_eq!(body.shading.sea_level, 0.45);
    assert_eq!(scene.display().view, ViewPreset::Top);
    assert_eq!(scene.display().sun_azimuth, 45.0);
}

#[test]
fn test_capture_and_restore_preset() {
    let mut scene = SceneState::new();
    let id = scene.central();
    scene
        .update_body(
            id,
            &BodyPatch {
                palette: Some(PaletteId::Magma),
                show_contours: Some(true),
                contour_steps: Some(12),
                ..Default::default()
            },
        )
        .unwrap();
    let saved = scene.capture_preset("magma bands");
    assert_eq!(saved.contour_steps, Some(12));

    scene
        .update_body(
            id,
            &BodyPatch {
                palette: Some(PaletteId::Ice),
                show_contours: Some(false),
                ..Default::default()
            },
        )
        .unwrap();
    let restored = scene.apply_preset(&saved).unwrap();
    assert_eq!(restored.shading.palette, PaletteId::Magma);
    assert!(restored.shading.show_contours);
    assert_eq!(restored.shading.contour_steps, 12);
}

#[derive(Default)]
struct Recorder {
    uploads: Vec<BodyId>,
    textures: Vec<(BodyId, (u32, u32))>,
    placements: Vec<(BodyId, DVec3)>,
    trails: Vec<(BodyId, usize)>,
}

impl RenderSurface for Recorder {
    fn upload_mesh(&mut self, body: BodyId, _mesh: Arc<MeshGeometry>) -> Result<(), SceneError> {
        self.uploads.push(body);
        Ok(())
    }

    fn upload_texture(&mut self, body: BodyId, image: Arc<SampledImage>) -> Result<(), SceneError> {
        self.textures.push((body, image.dimensions()));
        Ok(())
    }

    fn place_body(&mut self, body: BodyId, position: DVec3, _radius: f32) -> Result<(), SceneError> {
        self.placements.push((body, position));
        Ok(())
    }

    fn draw_trail(&mut self, body: BodyId, points: &[DVec3]) -> Result<(), SceneError> {
        self.trails.push((body, points.len()));
        Ok(())
    }
}

struct LostSurface;

impl RenderSurface for LostSurface {
    fn upload_mesh(&mut self, _: BodyId, _: Arc<MeshGeometry>) -> Result<(), SceneError> {
        Err(SceneError::RenderContext("surface lost".into()))
    }

    fn upload_texture(&mut self, _: BodyId, _: Arc<SampledImage>) -> Result<(), SceneError> {
        Ok(())
    }

    fn place_body(&mut self, _: BodyId, _: DVec3, _: f32) -> Result<(), SceneError> {
        Ok(())
    }

    fn draw_trail(&mut self, _: BodyId, _: &[DVec3]) -> Result<(), SceneError> {
        Ok(())
    }
}

#[test]
fn test_publish_hands_everything_to_surface() {
    let mut scene = SceneState::new();
    let central = scene.central();
    let moon = scene.add_body("Moon");
    scene.tick(0.1);
    scene.tick(0.1);

    let mut recorder = Recorder::default();
    scene.publish(&mut recorder).unwrap();
    assert_eq!(recorder.uploads, vec![central, moon]);
    assert_eq!(recorder.placements[0], (central, DVec3::ZERO));
    assert_eq!(recorder.trails, vec![(moon, 2)]);
    assert!(recorder.textures.is_empty());
}

#[test]
fn test_image_palette_publishes_texture() {
    let mut scene = SceneState::new();
    let id = scene.central();
    let bare = scene.add_body("Moon");
    scene.load_image_bytes(id, &checker_png()).unwrap();

    let mut colored = Recorder::default();
    scene.publish(&mut colored).unwrap();
    assert!(colored.textures.is_empty());

    let image_palette = BodyPatch {
        palette: Some(PaletteId::Image),
        ..Default::default()
    };
    scene.update_body(id, &image_palette).unwrap();
    scene.update_body(bare, &image_palette).unwrap();
    let mut textured = Recorder::default();
    scene.publish(&mut textured).unwrap();
    assert_eq!(textured.textures, vec![(id, (2, 2))]);
    assert_eq!(textured.uploads, vec![id, bare]);
}

#[test]
fn test_publish_reports_lost_surface() {
    let mut scene = SceneState::new();
    assert!(matches!(
        scene.publish(&mut LostSurface),
        Err(SceneError::RenderContext(_))
    ));
}
