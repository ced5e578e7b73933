//! # Export
//!
//! Converts a [`PolyMesh`] into flat-shaded triangle buffers for a host
//! renderer.
//!
//! Every face gets its own copy of its corners so that normals and colors
//! stay per-face. Positions are narrowed to `f32` here and nowhere else.
//!
//! ## Example
//!
//! ```rust
//! use polymesh::export::{export, ColorMethod};
//! use polymesh::PolyMesh;
//! use glam::DVec3;
//!
//! let quad = PolyMesh::new(
//!     vec![DVec3::ZERO, DVec3::X, DVec3::new(1.0, 0.0, -1.0), DVec3::NEG_Z],
//!     vec![vec![0, 1, 2, 3]],
//! )
//! .unwrap();
//! let render = export(&quad, ColorMethod::ByRole);
//! assert_eq!(render.triangles.len(), 2);
//! assert_eq!(render.positions.len(), 4);
//! ```

mod triangulate;

pub use triangulate::triangulate_loop;

use crate::mesh::{parse_color_tag, PolyMesh, Roles};
use config::constants::DEFAULT_COLOR;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How faces are colored on export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColorMethod {
    /// First `#RRGGBB` tag of the face, else the default color.
    #[default]
    ByTags,
    /// A fixed color per [`Roles`] value.
    ByRole,
    /// A palette entry per side count.
    BySides,
    /// The face normal mapped from `[-1, 1]` into `[0, 1]`.
    ByFaceDirection,
}

/// Triangle buffers ready for upload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderMesh {
    /// One position per face corner.
    pub positions: Vec<[f32; 3]>,
    /// Face normal repeated on each corner.
    pub normals: Vec<[f32; 3]>,
    /// Face color repeated on each corner.
    pub colors: Vec<[f32; 4]>,
    /// Triangles indexing `positions`.
    pub triangles: Vec<[u32; 3]>,
    /// Source face of each triangle.
    pub triangle_faces: Vec<u32>,
    /// Tags of each source face, sorted.
    pub face_tags: Vec<Vec<String>>,
}

impl RenderMesh {
    /// Number of corner vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

const ROLE_COLORS: [[f32; 4]; 5] = [
    [0.55, 0.55, 0.55, 1.0],
    [0.95, 0.75, 0.25, 1.0],
    [0.25, 0.6, 0.95, 1.0],
    [0.9, 0.3, 0.35, 1.0],
    [0.45, 0.85, 0.45, 1.0],
];

const SIDE_COLORS: [[f32; 4]; 8] = [
    [0.95, 0.35, 0.3, 1.0],
    [0.95, 0.7, 0.25, 1.0],
    [0.9, 0.9, 0.35, 1.0],
    [0.4, 0.85, 0.4, 1.0],
    [0.3, 0.75, 0.9, 1.0],
    [0.35, 0.45, 0.95, 1.0],
    [0.7, 0.4, 0.9, 1.0],
    [0.9, 0.45, 0.7, 1.0],
];

fn role_color(role: Roles) -> [f32; 4] {
    let i = match role {
        Roles::Ignored => 0,
        Roles::Existing => 1,
        Roles::New => 2,
        Roles::NewAlt => 3,
        Roles::ExistingAlt => 4,
    };
    ROLE_COLORS[i]
}

fn face_color(mesh: &PolyMesh, face: usize, normal: DVec3, method: ColorMethod) -> [f32; 4] {
    match method {
        ColorMethod::ByTags => mesh.face_tags()[face]
            .iter()
            .find_map(|tag| parse_color_tag(tag))
            .map_or(DEFAULT_COLOR, |[r, g, b]| [r, g, b, 1.0]),
        ColorMethod::ByRole => role_color(mesh.face_roles()[face]),
        ColorMethod::BySides => {
            let sides = mesh.face(face).len();
            SIDE_COLORS[sides.saturating_sub(3) % SIDE_COLORS.len()]
        }
        ColorMethod::ByFaceDirection => {
            let c = normal * 0.5 + DVec3::splat(0.5);
            [c.x as f32, c.y as f32, c.z as f32, 1.0]
        }
    }
}

/// Triangulates and colors `mesh`.
pub fn export(mesh: &PolyMesh, method: ColorMethod) -> RenderMesh {
    let mut out = RenderMesh::default();
    for f in 0..mesh.face_count() {
        let face = mesh.face(f);
        let points: Vec<DVec3> = face.iter().map(|&v| mesh.vertices()[v]).collect();
        let normal = mesh.face_normal(f);
        let color = face_color(mesh, f, normal, method);
        let base = out.positions.len() as u32;
        let n = [normal.x as f32, normal.y as f32, normal.z as f32];
        for p in &points {
            out.positions.push([p.x as f32, p.y as f32, p.z as f32]);
            out.normals.push(n);
            out.colors.push(color);
        }
        for [a, b, c] in triangulate_loop(&points, normal) {
            out.triangles
                .push([base + a as u32, base + b as u32, base + c as u32]);
            out.triangle_faces.push(f as u32);
        }
        out.face_tags
            .push(mesh.face_tags()[f].iter().cloned().collect());
    }
    debug!(
        faces = mesh.face_count(),
        triangles = out.triangles.len(),
        "exported mesh"
    );
    out
}

#[cfg(test)]
mod tests;
