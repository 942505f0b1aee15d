//! Wavefront OBJ output for published scenes.

use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use glam::{DVec3, Vec3};
use image::RgbaImage;
use terraglobe_mesh::MeshGeometry;
use terraglobe_scene::{BodyId, RenderSurface, SceneError};
use terraglobe_terrain::SampledImage;
use tracing::debug;

use crate::error::AppError;

/// Collects published bodies and writes them as one OBJ file.
///
/// Each body becomes an object group with its mesh scaled by the body radius
/// and moved to its position. Vertex colors are written as the common
/// `v x y z r g b` extension. Textured bodies get a material whose `map_Kd`
/// is a PNG written next to the OBJ. Trails become polylines.
pub struct ObjSurface {
    meshes: Vec<(BodyId, Arc<MeshGeometry>)>,
    textures: Vec<(BodyId, RgbaImage)>,
    out: String,
    /// 1-based index of the next `v` line.
    next_vertex: usize,
    /// 1-based index of the next `vt`/`vn` pair; trails write neither.
    next_attribute: usize,
}

impl ObjSurface {
    pub fn new() -> Self {
        Self {
            meshes: Vec::new(),
            textures: Vec::new(),
            out: String::from("# terraglobe scene\n"),
            next_vertex: 1,
            next_attribute: 1,
        }
    }

    /// The OBJ text written so far.
    pub fn as_str(&self) -> &str {
        &self.out
    }

    /// Bodies that received a texture, in upload order.
    pub fn textured_bodies(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.textures.iter().map(|(id, _)| *id)
    }

    /// Write the collected scene to `path`.
    ///
    /// With textures present, `<stem>.mtl` and one `<stem>_body_<id>.png` per
    /// textured body are written alongside.
    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        if self.textures.is_empty() {
            return write_file(path, &self.out);
        }

        let stem = path
            .file_stem()
            .map_or_else(|| "scene".to_string(), |s| s.to_string_lossy().into_owned());
        let mtl_name = format!("{stem}.mtl");
        let mut mtl = String::new();
        for (body, texture) in &self.textures {
            let png_name = format!("{stem}_body_{}.png", body.0);
            let png_path = path.with_file_name(&png_name);
            texture
                .save_with_format(&png_path, image::ImageFormat::Png)
                .map_err(|source| AppError::Texture {
                    path: png_path.clone(),
                    source,
                })?;
            debug!(body = %body, path = %png_path.display(), "texture written");
            mtl.push_str(&format!(
                "newmtl body_{}\nKd 1 1 1\nmap_Kd {png_name}\n\n",
                body.0
            ));
        }
        let mtl_path = path.with_file_name(&mtl_name);
        write_file(&mtl_path, &mtl)?;
        write_file(path, &format!("mtllib {mtl_name}\n{}", self.out))
    }

    fn write_body(
        &mut self,
        body: BodyId,
        mesh: &MeshGeometry,
        position: DVec3,
        radius: f32,
    ) -> std::fmt::Result {
        let offset = position.as_vec3();
        writeln!(self.out, "o body_{}", body.0)?;
        if self.textures.iter().any(|(id, _)| *id == body) {
            writeln!(self.out, "usemtl body_{}", body.0)?;
        }
        for (i, p) in mesh.positions.iter().enumerate() {
            let v = Vec3::from_array(*p) * radius + offset;
            match mesh.colors.as_ref().and_then(|c| c.get(i)) {
                Some([r, g, b]) => {
                    writeln!(self.out, "v {} {} {} {r:.4} {g:.4} {b:.4}", v.x, v.y, v.z)?
                }
                None => writeln!(self.out, "v {} {} {}", v.x, v.y, v.z)?,
            }
        }
        for [u, v] in &mesh.uvs {
            writeln!(self.out, "vt {u} {v}")?;
        }
        for [x, y, z] in &mesh.normals {
            writeln!(self.out, "vn {x} {y} {z}")?;
        }
        let (base, attr) = (self.next_vertex, self.next_attribute);
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize + base);
            let [ta, tb, tc] = [tri[0], tri[1], tri[2]].map(|i| i as usize + attr);
            writeln!(self.out, "f {a}/{ta}/{ta} {b}/{tb}/{tb} {c}/{tc}/{tc}")?;
        }
        self.next_vertex += mesh.positions.len();
        self.next_attribute += mesh.positions.len();
        Ok(())
    }

    fn write_trail(&mut self, body: BodyId, points: &[DVec3]) -> std::fmt::Result {
        if points.len() < 2 {
            return Ok(());
        }
        writeln!(self.out, "o trail_{}", body.0)?;
        for p in points {
            writeln!(self.out, "v {} {} {}", p.x, p.y, p.z)?;
        }
        let base = self.next_vertex;
        write!(self.out, "l")?;
        for i in 0..points.len() {
            write!(self.out, " {}", base + i)?;
        }
        writeln!(self.out)?;
        self.next_vertex += points.len();
        Ok(())
    }
}

impl Default for ObjSurface {
    fn default() -> Self {
        Self::new()
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), AppError> {
    std::fs::write(path, contents).map_err(|source| AppError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn context_error(e: std::fmt::Error) -> SceneError {
    SceneError::RenderContext(format!("OBJ buffer write failed: {e}"))
}

impl RenderSurface for ObjSurface {
    fn upload_mesh(&mut self, body: BodyId, mesh: Arc<MeshGeometry>) -> Result<(), SceneError> {
        self.meshes.retain(|(id, _)| *id != body);
        self.meshes.push((body, mesh));
        Ok(())
    }

    fn upload_texture(&mut self, body: BodyId, image: Arc<SampledImage>) -> Result<(), SceneError> {
        let Some(texture) = image.to_rgba_image() else {
            return Err(SceneError::RenderContext(format!(
                "texture for body {body} has an inconsistent buffer"
            )));
        };
        self.textures.retain(|(id, _)| *id != body);
        self.textures.push((body, texture));
        Ok(())
    }

    fn place_body(&mut self, body: BodyId, position: DVec3, radius: f32) -> Result<(), SceneError> {
        let Some(mesh) = self
            .meshes
            .iter()
            .find(|(id, _)| *id == body)
            .map(|(_, m)| Arc::clone(m))
        else {
            return Err(SceneError::RenderContext(format!(
                "body {body} placed before its mesh was uploaded"
            )));
        };
        self.write_body(body, &mesh, position, radius)
            .map_err(context_error)
    }

    fn draw_trail(&mut self, body: BodyId, points: &[DVec3]) -> Result<(), SceneError> {
        self.write_trail(body, points).map_err(context_error)
    }
}
