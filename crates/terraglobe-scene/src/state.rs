//! Application state: bodies, their derived terrain, orbits and trails.
//!
//! Bodies are stored as `Arc<BodyConfig>` and replaced wholesale on every
//! update, so a record handed out earlier never changes under its holder.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use glam::DVec3;
use terraglobe_config::{Config, DisplayConfig, Preset, ViewPreset};
use terraglobe_mesh::{MeshCache, MeshGeometry};
use terraglobe_orbit::{TrailBuffer, orbit_position};
use terraglobe_terrain::{
    DecodedImage, HeightField, ImageLoader, LoadTicket, Probe, SampledImage, extract_heights,
    probe, sample_image, write_heightmap_png, write_heightmap_tiff,
};
use tracing::{debug, info, warn};

use crate::body::{BodyConfig, BodyId, BodyPatch};
use crate::error::SceneError;
use crate::render::RenderSurface;

/// Size of the flat field meshed before a body has an image: 64 x 32 segments.
const DEFAULT_FIELD_SIZE: (u32, u32) = (65, 33);

/// Scene-wide view settings that do not belong to any body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplaySettings {
    pub view: ViewPreset,
    /// Sun azimuth in degrees.
    pub sun_azimuth: f32,
    /// Sun elevation in degrees.
    pub sun_elevation: f32,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            view: ViewPreset::Perspective,
            sun_azimuth: 45.0,
            sun_elevation: 30.0,
        }
    }
}

/// What happened to a finished decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The body's height field was replaced.
    Applied,
    /// A newer request superseded this one, or the body is gone. Nothing changed.
    Stale,
}

/// Results of one [`SceneState::poll_loader`] pass.
#[derive(Debug, Default)]
pub struct PollSummary {
    pub applied: Vec<BodyId>,
    pub stale: usize,
    pub failed: Vec<SceneError>,
    /// Requests still queued or decoding after the pass.
    pub pending: u64,
}

struct BodyState {
    config: Arc<BodyConfig>,
    image: Option<Arc<SampledImage>>,
    field: Option<Arc<HeightField>>,
    generation: u64,
    mesh: MeshCache,
    trail: TrailBuffer,
    elapsed: f64,
}

impl BodyState {
    fn new(config: BodyConfig) -> Self {
        let trail = TrailBuffer::new(config.trail.length);
        Self {
            config: Arc::new(config),
            image: None,
            field: None,
            generation: 0,
            mesh: MeshCache::new(),
            trail,
            elapsed: 0.0,
        }
    }

    fn position(&self) -> DVec3 {
        if self.config.is_central {
            return DVec3::ZERO;
        }
        orbit_position(
            self.elapsed,
            self.config.orbit.curve,
            &self.config.orbit.params,
        )
    }
}

/// Everything the viewer knows: bodies, per-body runtime and global display settings.
///
/// There is always at least one body and exactly one of them is central.
pub struct SceneState {
    bodies: Vec<BodyState>,
    next_id: u64,
    selected: BodyId,
    display: DisplaySettings,
    template: DisplayConfig,
    trail_length: usize,
    default_field: Arc<HeightField>,
    max_dimension: u32,
    time_scale: f64,
    /// Removed bodies whose loader bookkeeping has not been dropped yet.
    orphaned: Vec<BodyId>,
}

impl SceneState {
    /// A scene with one central body and default settings.
    pub fn new() -> Self {
        Self::from_config(&Config::default())
    }

    /// A scene with one central body whose settings come from `config`.
    pub fn from_config(config: &Config) -> Self {
        let (w, h) = DEFAULT_FIELD_SIZE;
        let mut scene = Self {
            bodies: Vec::new(),
            next_id: 1,
            selected: BodyId(1),
            display: DisplaySettings {
                view: config.display.view,
                sun_azimuth: config.display.sun_azimuth,
                sun_elevation: config.display.sun_elevation,
            },
            template: config.display.clone(),
            trail_length: config.animation.trail_length,
            default_field: Arc::new(HeightField::flat(w, h, 0.5)),
            max_dimension: config.image.max_dimension,
            time_scale: config.animation.time_scale,
            orphaned: Vec::new(),
        };
        let id = scene.allocate_id();
        let central = scene.default_body(id, "Central", true);
        scene.bodies.push(BodyState::new(central));
        scene.selected = id;
        scene
    }

    fn allocate_id(&mut self) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    fn default_body(&self, id: BodyId, name: &str, is_central: bool) -> BodyConfig {
        let mut body = BodyConfig::new(id, name, is_central);
        body.geometry.height_scale = self.template.height_scale;
        body.geometry.height_mode = self.template.height_mode;
        body.geometry.wireframe = self.template.wireframe;
        body.shading.palette = self.template.palette;
        body.shading.sea_level = self.template.sea_level;
        body.shading.show_contours = self.template.show_contours;
        body.shading.contour_steps = self.template.contour_steps;
        body.trail.length = self.trail_length;
        body.clamped()
    }

    fn index(&self, id: BodyId) -> Result<usize, SceneError> {
        self.bodies
            .iter()
            .position(|b| b.config.id == id)
            .ok_or(SceneError::UnknownBody(id))
    }

    fn selected_state(&self) -> &BodyState {
        let idx = self.index(self.selected).unwrap_or(0);
        &self.bodies[idx]
    }

    /// Add an orbiting body with default settings.
    pub fn add_body(&mut self, name: impl Into<String>) -> BodyId {
        let id = self.allocate_id();
        let name = name.into();
        let body = self.default_body(id, &name, false);
        self.bodies.push(BodyState::new(body));
        info!(body = %id, %name, "body added");
        id
    }

    /// Remove a body, returning its last configuration.
    ///
    /// # Errors
    ///
    /// [`SceneError::LastBody`] if it is the only body left. Removing the
    /// central body makes the first remaining body central.
    pub fn remove_body(&mut self, id: BodyId) -> Result<Arc<BodyConfig>, SceneError> {
        let idx = self.index(id)?;
        if self.bodies.len() == 1 {
            return Err(SceneError::LastBody);
        }
        let removed = self.bodies.remove(idx);
        if removed.config.is_central {
            self.make_central(0);
        }
        if self.selected == id {
            self.selected = self.bodies[0].config.id;
        }
        if removed.generation > 0 {
            self.orphaned.push(id);
        }
        info!(body = %id, "body removed");
        Ok(removed.config)
    }

    /// Replace body `id` with `patch` applied to it and return the new record.
    ///
    /// A height-mode change re-extracts heights from the stored image and
    /// supersedes any decode still in flight; a loader learns of it on the next
    /// [`SceneState::sync_loader`]. Setting `is_central` moves the
    /// central role to this body; clearing it on the central body is ignored.
    pub fn update_body(
        &mut self,
        id: BodyId,
        patch: &BodyPatch,
    ) -> Result<Arc<BodyConfig>, SceneError> {
        let idx = self.index(id)?;
        let old = Arc::clone(&self.bodies[idx].config);
        let mut next = patch.apply(&old);

        if old.is_central && !next.is_central {
            warn!(body = %id, "central body cannot be demoted; set another body central instead");
        }
        let becomes_central = next.is_central && !old.is_central;
        next.is_central = old.is_central;

        let body = &mut self.bodies[idx];
        if next.geometry.height_mode != old.geometry.height_mode {
            body.generation += 1;
            if let Some(image) = &body.image {
                body.field = Some(Arc::new(extract_heights(image, next.geometry.height_mode)));
            }
            debug!(body = %id, mode = %next.geometry.height_mode, generation = body.generation, "height mode changed");
        }
        if next.trail.length != old.trail.length {
            body.trail.set_capacity(next.trail.length);
        }
        body.config = Arc::new(next);

        if becomes_central {
            self.make_central(idx);
        }
        Ok(Arc::clone(&self.bodies[idx].config))
    }

    /// Make body `id` the central body.
    pub fn set_central(&mut self, id: BodyId) -> Result<(), SceneError> {
        let idx = self.index(id)?;
        self.make_central(idx);
        Ok(())
    }

    fn make_central(&mut self, idx: usize) {
        for (i, body) in self.bodies.iter_mut().enumerate() {
            let central = i == idx;
            if body.config.is_central == central {
                continue;
            }
            let mut next = (*body.config).clone();
            next.is_central = central;
            if central {
                body.trail.clear();
                body.elapsed = 0.0;
                info!(body = %next.id, "body is now central");
            }
            body.config = Arc::new(next);
        }
    }

    /// Select the body that presets and panels act on.
    pub fn select(&mut self, id: BodyId) -> Result<(), SceneError> {
        self.index(id)?;
        self.selected = id;
        Ok(())
    }

    pub fn selected(&self) -> BodyId {
        self.selected
    }

    pub fn central(&self) -> BodyId {
        self.bodies
            .iter()
            .find(|b| b.config.is_central)
            .map_or(self.bodies[0].config.id, |b| b.config.id)
    }

    pub fn body(&self, id: BodyId) -> Option<Arc<BodyConfig>> {
        self.index(id)
            .ok()
            .map(|idx| Arc::clone(&self.bodies[idx].config))
    }

    /// All bodies in insertion order.
    pub fn bodies(&self) -> impl Iterator<Item = &Arc<BodyConfig>> {
        self.bodies.iter().map(|b| &b.config)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn display(&self) -> DisplaySettings {
        self.display
    }

    pub fn set_display(&mut self, display: DisplaySettings) {
        self.display = display;
    }

    /// Multiplier applied to every tick's delta time.
    pub fn set_time_scale(&mut self, time_scale: f64) {
        self.time_scale = time_scale;
    }

    pub fn height_field(&self, id: BodyId) -> Option<Arc<HeightField>> {
        let idx = self.index(id).ok()?;
        self.bodies[idx].field.clone()
    }

    pub fn sampled_image(&self, id: BodyId) -> Option<Arc<SampledImage>> {
        let idx = self.index(id).ok()?;
        self.bodies[idx].image.clone()
    }

    pub fn trail(&self, id: BodyId) -> Option<&TrailBuffer> {
        let idx = self.index(id).ok()?;
        Some(&self.bodies[idx].trail)
    }

    pub fn mesh_cache(&self, id: BodyId) -> Option<&MeshCache> {
        let idx = self.index(id).ok()?;
        Some(&self.bodies[idx].mesh)
    }

    /// Current load generation of a body.
    pub fn generation(&self, id: BodyId) -> Option<u64> {
        let idx = self.index(id).ok()?;
        Some(self.bodies[idx].generation)
    }

    /// Start a new image load for `id`, superseding any earlier one.
    pub fn begin_image_load(&mut self, id: BodyId) -> Result<LoadTicket, SceneError> {
        let idx = self.index(id)?;
        let body = &mut self.bodies[idx];
        body.generation += 1;
        Ok(LoadTicket {
            owner: id.0,
            generation: body.generation,
        })
    }

    /// Start a load and queue `bytes` on `loader`.
    pub fn submit_image(
        &mut self,
        id: BodyId,
        bytes: Vec<u8>,
        loader: &ImageLoader,
    ) -> Result<LoadTicket, SceneError> {
        self.sync_loader(loader);
        let ticket = self.begin_image_load(id)?;
        loader
            .submit(ticket, bytes, self.max_dimension)
            .map_err(|_| SceneError::LoaderBusy { body: id })?;
        debug!(body = %id, generation = ticket.generation, "image load queued");
        Ok(ticket)
    }

    /// Apply a finished decode if it is still the latest request of its body.
    ///
    /// # Errors
    ///
    /// [`SceneError::ImageDecode`] if the current request failed to decode. The
    /// body keeps its previous image and height field.
    pub fn apply_decoded(&mut self, decoded: DecodedImage) -> Result<LoadOutcome, SceneError> {
        let id = BodyId(decoded.ticket.owner);
        let Ok(idx) = self.index(id) else {
            debug!(body = %id, "decode finished for a removed body");
            return Ok(LoadOutcome::Stale);
        };
        let body = &mut self.bodies[idx];
        if decoded.ticket.generation != body.generation {
            debug!(
                body = %id,
                generation = decoded.ticket.generation,
                current = body.generation,
                "discarding stale decode"
            );
            return Ok(LoadOutcome::Stale);
        }

        let image = decoded.result.map_err(|source| {
            warn!(body = %id, "image decode failed: {source}");
            SceneError::ImageDecode { body: id, source }
        })?;
        let field = extract_heights(&image, body.config.geometry.height_mode);
        info!(
            body = %id,
            width = field.width(),
            height = field.height(),
            decode_us = decoded.decode_time_us,
            "terrain updated"
        );
        body.image = Some(Arc::new(image));
        body.field = Some(Arc::new(field));
        Ok(LoadOutcome::Applied)
    }

    /// Decode `bytes` on the calling thread and apply them to `id`.
    pub fn load_image_bytes(&mut self, id: BodyId, bytes: &[u8]) -> Result<LoadOutcome, SceneError> {
        let ticket = self.begin_image_load(id)?;
        let start = Instant::now();
        let result = sample_image(bytes, self.max_dimension);
        self.apply_decoded(DecodedImage {
            ticket,
            result,
            decode_time_us: start.elapsed().as_micros() as u64,
        })
    }

    /// Tell `loader` about generations it has not seen: queued requests
    /// superseded by a height-mode change are skipped, and removed bodies are
    /// forgotten.
    pub fn sync_loader(&mut self, loader: &ImageLoader) {
        for id in self.orphaned.drain(..) {
            loader.forget(id.0);
        }
        for body in &self.bodies {
            loader.supersede(body.config.id.0, body.generation);
        }
    }

    /// Apply every decode `loader` has finished. Call once per frame.
    pub fn poll_loader(&mut self, loader: &ImageLoader) -> PollSummary {
        self.sync_loader(loader);
        let mut summary = PollSummary::default();
        for decoded in loader.drain_results() {
            let body = BodyId(decoded.ticket.owner);
            match self.apply_decoded(decoded) {
                Ok(LoadOutcome::Applied) => summary.applied.push(body),
                Ok(LoadOutcome::Stale) => summary.stale += 1,
                Err(e) => summary.failed.push(e),
            }
        }
        summary.pending = loader.in_flight_count();
        summary
    }

    /// Advance every orbiting body by `dt` seconds and extend its trail.
    ///
    /// Central bodies and bodies with orbiting off do not move; their trails
    /// stay as they were.
    pub fn tick(&mut self, dt: f64) {
        let dt = dt * self.time_scale;
        for body in &mut self.bodies {
            if body.config.is_central || !body.config.orbit.enabled {
                continue;
            }
            body.elapsed += dt;
            let position = body.position();
            if body.config.trail.enabled {
                body.trail.push(position);
            }
        }
    }

    /// World position of `id`: the central body sits at the origin, the rest
    /// at their orbit position around it.
    pub fn body_position(&self, id: BodyId) -> Option<DVec3> {
        let idx = self.index(id).ok()?;
        Some(self.bodies[idx].position())
    }

    /// The mesh for `id`, rebuilt only when its inputs changed since the last pull.
    pub fn mesh_for(&mut self, id: BodyId) -> Result<Arc<MeshGeometry>, SceneError> {
        let idx = self.index(id)?;
        let body = &mut self.bodies[idx];
        let field = body.field.as_ref().unwrap_or(&self.default_field);
        let params = body.config.mesh_params();
        Ok(body.mesh.get_or_build(field, &params))
    }

    /// Source pixel and height under `(u, v)` on body `id`, if it has a height field.
    pub fn probe(&self, id: BodyId, u: f32, v: f32) -> Option<Probe> {
        let idx = self.index(id).ok()?;
        self.bodies[idx].field.as_ref().map(|f| probe(f, u, v))
    }

    fn export_field(&self, id: BodyId) -> Result<Arc<HeightField>, SceneError> {
        let idx = self.index(id)?;
        self.bodies[idx]
            .field
            .clone()
            .ok_or(SceneError::ExportPrecondition { body: id })
    }

    /// Write the height field of `id` as an RGBA PNG.
    pub fn export_heightmap_png(&self, id: BodyId, path: &Path) -> Result<(), SceneError> {
        let field = self.export_field(id)?;
        write_heightmap_png(&field, path).map_err(SceneError::Export)?;
        info!(body = %id, path = %path.display(), "heightmap exported");
        Ok(())
    }

    /// Write the height field of `id` as an 8-bit grayscale TIFF.
    pub fn export_heightmap_tiff(&self, id: BodyId, path: &Path) -> Result<(), SceneError> {
        let field = self.export_field(id)?;
        write_heightmap_tiff(&field, path).map_err(SceneError::Export)?;
        info!(body = %id, path = %path.display(), "heightmap exported");
        Ok(())
    }

    /// Display parameters of the selected body plus the scene view settings.
    pub fn display_config(&self) -> DisplayConfig {
        let body = &self.selected_state().config;
        DisplayConfig {
            height_scale: body.geometry.height_scale,
            height_mode: body.geometry.height_mode,
            wireframe: body.geometry.wireframe,
            view: self.display.view,
            palette: body.shading.palette,
            sea_level: body.shading.sea_level,
            show_contours: body.shading.show_contours,
            contour_steps: body.shading.contour_steps,
            sun_azimuth: self.display.sun_azimuth,
            sun_elevation: self.display.sun_elevation,
        }
    }

    /// Apply the fields `preset` carries to the selected body and view settings.
    pub fn apply_preset(&mut self, preset: &Preset) -> Result<Arc<BodyConfig>, SceneError> {
        let mut display = self.display_config();
        preset.apply_to(&mut display);
        self.set_display(DisplaySettings {
            view: display.view,
            sun_azimuth: display.sun_azimuth,
            sun_elevation: display.sun_elevation,
        });
        let patch = BodyPatch {
            height_scale: Some(display.height_scale),
            height_mode: Some(display.height_mode),
            wireframe: Some(display.wireframe),
            palette: Some(display.palette),
            sea_level: Some(display.sea_level),
            show_contours: Some(display.show_contours),
            contour_steps: Some(display.contour_steps),
            ..Default::default()
        };
        info!(preset = %preset.name, body = %self.selected, "preset applied");
        self.update_body(self.selected, &patch)
    }

    /// Capture the current display parameters as a preset called `name`.
    pub fn capture_preset(&self, name: impl Into<String>) -> Preset {
        Preset::capture(name, &self.display_config())
    }

    /// Hand every body's mesh, placement and trail to `surface`.
    ///
    /// Meshes without vertex colors come with the body's resampled source image
    /// as their texture.
    pub fn publish(&mut self, surface: &mut dyn RenderSurface) -> Result<(), SceneError> {
        for idx in 0..self.bodies.len() {
            let id = self.bodies[idx].config.id;
            let mesh = self.mesh_for(id)?;
            let textured = mesh.uses_texture();
            surface.upload_mesh(id, mesh)?;

            let body = &self.bodies[idx];
            if textured {
                if let Some(image) = &body.image {
                    surface.upload_texture(id, Arc::clone(image))?;
                }
            }
            surface.place_body(id, body.position(), body.config.geometry.radius)?;
            if !body.config.is_central && body.config.trail.enabled && !body.trail.is_empty() {
                surface.draw_trail(id, &body.trail.to_vec())?;
            }
        }
        Ok(())
    }
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new()
    }
}
