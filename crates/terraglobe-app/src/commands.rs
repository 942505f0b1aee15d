//! Subcommand implementations.

use std::path::Path;
use std::time::Duration;

use terraglobe_config::{Config, PresetStore};
use terraglobe_orbit::{OrbitCurve, OrbitParams};
use terraglobe_scene::{BodyId, BodyPatch, LoadOutcome, SceneState};
use terraglobe_terrain::{ImageLoader, PaletteId};
use tracing::{debug, info};

use crate::clock::FixedStep;
use crate::error::AppError;
use crate::obj::ObjSurface;

const DECODE_TIMEOUT: Duration = Duration::from_secs(30);

/// Radius of bodies added around the central globe.
const MOON_RADIUS: f32 = 0.25;

/// A scene whose central body carries the terrain of `image`.
fn load_scene(config: &Config, image: &Path) -> Result<(SceneState, BodyId), AppError> {
    let bytes = std::fs::read(image).map_err(|source| AppError::Read {
        path: image.to_path_buf(),
        source,
    })?;

    let mut scene = SceneState::from_config(config);
    let id = scene.central();
    let loader = ImageLoader::new(config.image.decode_threads, 4);
    let ticket = scene.submit_image(id, bytes, &loader)?;
    debug!(?ticket, pending = loader.in_flight_count(), "waiting for decode");

    loop {
        let Some(decoded) = loader.recv_timeout(DECODE_TIMEOUT) else {
            return Err(AppError::DecodeTimeout(image.to_path_buf()));
        };
        if scene.apply_decoded(decoded)? == LoadOutcome::Applied {
            break;
        }
    }

    let label = image
        .file_name()
        .map(|n| n.to_string_lossy().into_owned());
    scene.update_body(
        id,
        &BodyPatch {
            image: Some(label),
            ..Default::default()
        },
    )?;
    Ok((scene, id))
}

/// Advance `scene` by `seconds` of animation on the configured fixed step.
fn simulate(scene: &mut SceneState, dt: f64, frame: f64, seconds: f64) -> FixedStep {
    let mut clock = FixedStep::new(dt);
    let frame = frame.max(1e-3);
    while clock.total_sim_time() + 1e-9 < seconds {
        clock.advance(frame, |dt| scene.tick(dt));
    }
    clock
}

pub fn globe(
    config: &Config,
    image: &Path,
    out: &Path,
    moons: u32,
    seconds: f64,
) -> Result<(), AppError> {
    let (mut scene, central) = load_scene(config, image)?;

    for i in 0..moons as usize {
        let id = scene.add_body(format!("Moon {}", i + 1));
        let base = OrbitParams::default();
        scene.update_body(
            id,
            &BodyPatch {
                radius: Some(MOON_RADIUS),
                curve: Some(OrbitCurve::ALL[i % OrbitCurve::ALL.len()]),
                orbit: Some(OrbitParams {
                    radius_x: base.radius_x + i as f64 * 0.75,
                    phase: i as f64 * 0.9,
                    ..base
                }),
                ..Default::default()
            },
        )?;
    }

    let dt = config.animation.fixed_dt;
    let clock = simulate(&mut scene, dt, dt, seconds);

    let mut surface = ObjSurface::new();
    scene.publish(&mut surface)?;
    surface.save(out)?;

    let mesh = scene.mesh_for(central)?;
    info!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        segments = %format!("{}x{}", mesh.width_segments, mesh.height_segments),
        steps = clock.step_count(),
        "globe written to {}",
        out.display()
    );
    println!(
        "{}: {} vertices, {} triangles, {} bodies",
        out.display(),
        mesh.vertex_count(),
        mesh.triangle_count(),
        scene.body_count()
    );
    Ok(())
}

pub fn heightmap(config: &Config, image: &Path, out: &Path) -> Result<(), AppError> {
    let (scene, id) = load_scene(config, image)?;
    let tiff = out
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("tif") || e.eq_ignore_ascii_case("tiff"));
    if tiff {
        scene.export_heightmap_tiff(id, out)?;
    } else {
        scene.export_heightmap_png(id, out)?;
    }
    println!("{}", out.display());
    Ok(())
}

pub fn probe(config: &Config, image: &Path, u: f32, v: f32) -> Result<(), AppError> {
    let (scene, id) = load_scene(config, image)?;
    match scene.probe(id, u, v) {
        Some(p) => println!(
            "uv ({u:.3}, {v:.3}) -> pixel ({}, {}) height {:.4}",
            p.pixel_x, p.pixel_y, p.height
        ),
        None => println!("no height field"),
    }
    Ok(())
}

pub fn orbit(
    config: &Config,
    curve: OrbitCurve,
    radius: f64,
    speed: f64,
    seconds: f64,
    frame: f64,
) -> Result<(), AppError> {
    let mut scene = SceneState::from_config(config);
    let id = scene.add_body("Probe");
    scene.update_body(
        id,
        &BodyPatch {
            curve: Some(curve),
            orbit: Some(OrbitParams {
                radius_x: radius,
                radius_y: radius * 2.0 / 3.0,
                speed,
                ..Default::default()
            }),
            ..Default::default()
        },
    )?;

    let clock = simulate(&mut scene, config.animation.fixed_dt, frame, seconds);
    match OrbitCurve::period(speed) {
        Some(period) => println!("{curve}: period {period:.3}s"),
        None => println!("{curve}: stationary"),
    }
    println!(
        "{} steps, {:.3}s simulated",
        clock.step_count(),
        clock.total_sim_time()
    );
    if let Some(trail) = scene.trail(id) {
        for (i, p) in trail.iter().enumerate() {
            println!("{i:5} {:9.4} {:9.4} {:9.4}", p.x, p.y, p.z);
        }
    }
    Ok(())
}

pub fn palettes(config: &Config, samples: usize) {
    let sea_level = config.display.sea_level;
    for palette in PaletteId::ALL {
        let preview = palette.preview(samples, sea_level);
        if preview.is_empty() {
            println!("{:<12} (source image texture)", palette.name());
            continue;
        }
        let swatches: Vec<String> = preview.iter().map(|c| hex(*c)).collect();
        println!("{:<12} {}", palette.name(), swatches.join(" "));
    }
}

fn hex([r, g, b]: [f32; 3]) -> String {
    let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("#{:02x}{:02x}{:02x}", q(r), q(g), q(b))
}

pub fn preset_list(config_dir: &Path) -> Result<(), AppError> {
    let store = PresetStore::load(config_dir)?;
    if store.is_empty() {
        println!("no presets saved");
    }
    for name in store.names() {
        println!("{name}");
    }
    Ok(())
}

pub fn preset_save(config: &Config, config_dir: &Path, name: &str) -> Result<(), AppError> {
    let scene = SceneState::from_config(config);
    let mut store = PresetStore::load(config_dir)?;
    store.upsert(scene.capture_preset(name));
    store.save(config_dir)?;
    info!(preset = name, "preset saved");
    Ok(())
}

pub fn preset_show(config_dir: &Path, name: &str) -> Result<(), AppError> {
    let store = PresetStore::load(config_dir)?;
    let preset = store
        .get(name)
        .ok_or_else(|| AppError::UnknownPreset(name.to_string()))?;
    println!("{preset:#?}");
    Ok(())
}

pub fn preset_delete(config_dir: &Path, name: &str) -> Result<(), AppError> {
    let mut store = PresetStore::load(config_dir)?;
    if !store.remove(name) {
        return Err(AppError::UnknownPreset(name.to_string()));
    }
    store.save(config_dir)?;
    info!(preset = name, "preset deleted");
    Ok(())
}
