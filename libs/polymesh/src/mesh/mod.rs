//! # PolyMesh
//!
//! Polygon mesh with ordered face loops, per-face tags and per-element roles.
//! Half-edge adjacency is derived on demand (see [`topology`]).
//!
//! All geometry is `f64`. Conversion to `f32` only happens in
//! [`crate::export`] at the host boundary.

pub(crate) mod builder;
mod merge;
pub mod topology;

use crate::error::{PolyError, PolyResult};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

pub use topology::{Edge, Fan, HalfEdge, Topology};

// =============================================================================
// ROLES AND COUNTS
// =============================================================================

/// Provenance of a face or vertex relative to the operator that produced it.
///
/// Face selections can target roles, so a later operator may act only on the
/// faces a previous operator created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Roles {
    /// Carried through an operator without being touched.
    Ignored,
    /// Derived from an element of the input mesh.
    #[default]
    Existing,
    /// Created from an input vertex (vertex figures, apexes).
    New,
    /// Created from an input edge.
    NewAlt,
    /// Secondary piece derived from an input element.
    ExistingAlt,
}

/// Vertex, edge and face counts of a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vef {
    /// Number of vertices.
    pub vertices: usize,
    /// Number of undirected edges.
    pub edges: usize,
    /// Number of faces.
    pub faces: usize,
}

impl Vef {
    /// Creates a count triple.
    pub fn new(vertices: usize, edges: usize, faces: usize) -> Self {
        Self {
            vertices,
            edges,
            faces,
        }
    }
}

impl fmt::Display for Vef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V={} E={} F={}", self.vertices, self.edges, self.faces)
    }
}

// =============================================================================
// POLYMESH
// =============================================================================

/// A polyhedral mesh: vertex positions plus ordered face loops.
///
/// Faces are wound counter-clockwise when seen from outside, so the Newell
/// normal points outward.
///
/// # Example
///
/// ```rust
/// use polymesh::PolyMesh;
/// use glam::DVec3;
///
/// let square = PolyMesh::new(
///     vec![
///         DVec3::new(0.0, 0.0, 0.0),
///         DVec3::new(1.0, 0.0, 0.0),
///         DVec3::new(1.0, 0.0, -1.0),
///         DVec3::new(0.0, 0.0, -1.0),
///     ],
///     vec![vec![0, 1, 2, 3]],
/// )
/// .unwrap();
/// assert_eq!(square.edge_count(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawPolyMesh")]
pub struct PolyMesh {
    vertices: Vec<DVec3>,
    faces: Vec<Vec<usize>>,
    face_roles: Vec<Roles>,
    vertex_roles: Vec<Roles>,
    face_tags: Vec<BTreeSet<String>>,
}

/// Wire form of [`PolyMesh`]; roles and tags may be omitted.
#[derive(Deserialize)]
struct RawPolyMesh {
    vertices: Vec<DVec3>,
    faces: Vec<Vec<usize>>,
    #[serde(default)]
    face_roles: Option<Vec<Roles>>,
    #[serde(default)]
    vertex_roles: Option<Vec<Roles>>,
    #[serde(default)]
    face_tags: Option<Vec<BTreeSet<String>>>,
}

impl TryFrom<RawPolyMesh> for PolyMesh {
    type Error = PolyError;

    fn try_from(raw: RawPolyMesh) -> PolyResult<Self> {
        let (faces, vertices) = (raw.faces.len(), raw.vertices.len());
        Self::from_parts(
            raw.vertices,
            raw.faces,
            raw.face_roles.unwrap_or_else(|| vec![Roles::Existing; faces]),
            raw.vertex_roles.unwrap_or_else(|| vec![Roles::Existing; vertices]),
            raw.face_tags.unwrap_or_else(|| vec![BTreeSet::new(); faces]),
        )
    }
}

impl PolyMesh {
    /// Creates a mesh from raw positions and face loops.
    ///
    /// # Errors
    ///
    /// `InvalidMesh` when a face has fewer than 3 vertices or references a
    /// vertex that does not exist.
    pub fn new(vertices: Vec<DVec3>, faces: Vec<Vec<usize>>) -> PolyResult<Self> {
        let face_count = faces.len();
        let vertex_count = vertices.len();
        Self::from_parts(
            vertices,
            faces,
            vec![Roles::Existing; face_count],
            vec![Roles::Existing; vertex_count],
            vec![BTreeSet::new(); face_count],
        )
    }

    /// Creates a mesh with explicit roles and tags.
    ///
    /// # Errors
    ///
    /// `InvalidMesh` when attribute lengths disagree with the element counts
    /// or a face is malformed.
    pub fn from_parts(
        vertices: Vec<DVec3>,
        faces: Vec<Vec<usize>>,
        face_roles: Vec<Roles>,
        vertex_roles: Vec<Roles>,
        face_tags: Vec<BTreeSet<String>>,
    ) -> PolyResult<Self> {
        if face_roles.len() != faces.len() || face_tags.len() != faces.len() {
            return Err(PolyError::invalid_mesh(format!(
                "{} faces but {} face roles and {} tag sets",
                faces.len(),
                face_roles.len(),
                face_tags.len()
            )));
        }
        if vertex_roles.len() != vertices.len() {
            return Err(PolyError::invalid_mesh(format!(
                "{} vertices but {} vertex roles",
                vertices.len(),
                vertex_roles.len()
            )));
        }
        let mesh = Self {
            vertices,
            faces,
            face_roles,
            vertex_roles,
            face_tags,
        };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Assembles a mesh whose invariants the caller already guarantees.
    pub(crate) fn from_parts_unchecked(
        vertices: Vec<DVec3>,
        faces: Vec<Vec<usize>>,
        face_roles: Vec<Roles>,
        vertex_roles: Vec<Roles>,
        face_tags: Vec<BTreeSet<String>>,
    ) -> Self {
        Self {
            vertices,
            faces,
            face_roles,
            vertex_roles,
            face_tags,
        }
    }

    /// Checks that every face has at least 3 vertices and valid indices.
    pub fn validate(&self) -> PolyResult<()> {
        for (fi, face) in self.faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(PolyError::invalid_mesh(format!(
                    "face {fi} has {} vertices",
                    face.len()
                )));
            }
            if let Some(&bad) = face.iter().find(|&&v| v >= self.vertices.len()) {
                return Err(PolyError::invalid_mesh(format!(
                    "face {fi} references vertex {bad} of {}",
                    self.vertices.len()
                )));
            }
        }
        Ok(())
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Returns the vertex positions.
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Returns the face loops.
    #[inline]
    pub fn faces(&self) -> &[Vec<usize>] {
        &self.faces
    }

    /// Returns the loop of one face.
    #[inline]
    pub fn face(&self, index: usize) -> &[usize] {
        &self.faces[index]
    }

    /// Returns the face roles.
    #[inline]
    pub fn face_roles(&self) -> &[Roles] {
        &self.face_roles
    }

    /// Returns the vertex roles.
    #[inline]
    pub fn vertex_roles(&self) -> &[Roles] {
        &self.vertex_roles
    }

    /// Returns the per-face tag sets.
    #[inline]
    pub fn face_tags(&self) -> &[BTreeSet<String>] {
        &self.face_tags
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of faces.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Returns true if the mesh has no faces.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Number of distinct undirected edges used by the face loops.
    pub fn edge_count(&self) -> usize {
        let mut edges = HashSet::new();
        for face in &self.faces {
            for (i, &a) in face.iter().enumerate() {
                let b = face[(i + 1) % face.len()];
                edges.insert((a.min(b), a.max(b)));
            }
        }
        edges.len()
    }

    /// Vertex, edge and face counts.
    pub fn counts(&self) -> Vef {
        Vef::new(self.vertex_count(), self.edge_count(), self.face_count())
    }

    /// `V - E + F`; 2 for closed genus-0 meshes.
    pub fn euler_characteristic(&self) -> i64 {
        self.vertex_count() as i64 - self.edge_count() as i64 + self.face_count() as i64
    }

    /// Derives the half-edge structure.
    pub fn topology(&self) -> Topology {
        Topology::build(&self.faces, self.vertices.len())
    }

    /// True when every half-edge has a twin.
    pub fn is_closed(&self) -> bool {
        self.topology().is_closed()
    }

    // =========================================================================
    // GEOMETRY
    // =========================================================================

    /// Average of the face's vertex positions.
    pub fn face_centroid(&self, face: usize) -> DVec3 {
        let loop_ = &self.faces[face];
        let sum: DVec3 = loop_.iter().map(|&v| self.vertices[v]).sum();
        sum / loop_.len() as f64
    }

    /// Unnormalized Newell normal; its length is twice the face area.
    fn newell(&self, face: usize) -> DVec3 {
        let loop_ = &self.faces[face];
        let mut n = DVec3::ZERO;
        for (i, &a) in loop_.iter().enumerate() {
            let b = loop_[(i + 1) % loop_.len()];
            n += self.vertices[a].cross(self.vertices[b]);
        }
        n
    }

    /// Unit outward normal of a face, or zero for degenerate faces.
    pub fn face_normal(&self, face: usize) -> DVec3 {
        self.newell(face).normalize_or_zero()
    }

    /// Area of a (possibly non-planar) face.
    pub fn face_area(&self, face: usize) -> f64 {
        self.newell(face).length() * 0.5
    }

    /// Mean distance from the face centroid to its vertices.
    pub fn face_radius(&self, face: usize) -> f64 {
        let c = self.face_centroid(face);
        let loop_ = &self.faces[face];
        loop_
            .iter()
            .map(|&v| self.vertices[v].distance(c))
            .sum::<f64>()
            / loop_.len() as f64
    }

    /// Faces incident to each vertex, in face order.
    pub fn vertex_faces(&self) -> Vec<Vec<usize>> {
        let mut incident = vec![Vec::new(); self.vertices.len()];
        for (fi, face) in self.faces.iter().enumerate() {
            for &v in face {
                incident[v].push(fi);
            }
        }
        incident
    }

    /// Area-weighted vertex normals.
    pub fn vertex_normals(&self) -> Vec<DVec3> {
        let mut normals = vec![DVec3::ZERO; self.vertices.len()];
        for fi in 0..self.faces.len() {
            let n = self.newell(fi);
            for &v in &self.faces[fi] {
                normals[v] += n;
            }
        }
        normals.into_iter().map(DVec3::normalize_or_zero).collect()
    }

    /// Average of all vertex positions.
    pub fn center(&self) -> DVec3 {
        if self.vertices.is_empty() {
            return DVec3::ZERO;
        }
        self.vertices.iter().copied().sum::<DVec3>() / self.vertices.len() as f64
    }

    /// Returns the axis-aligned bounding box `(min, max)`.
    pub fn bounding_box(&self) -> Option<(DVec3, DVec3)> {
        let first = *self.vertices.first()?;
        Some(
            self.vertices
                .iter()
                .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p))),
        )
    }

    // =========================================================================
    // TAGS AND ROLES
    // =========================================================================

    /// Replaces every face's tags with a single `#RRGGBB` color tag.
    pub fn init_tags(&mut self, rgb: [f32; 3]) {
        let tag = color_tag(rgb);
        for tags in &mut self.face_tags {
            tags.clear();
            tags.insert(tag.clone());
        }
    }

    /// Replaces the tag set of every face.
    ///
    /// # Errors
    ///
    /// `InvalidMesh` when the number of tag sets differs from the face count.
    pub fn set_face_tags(&mut self, tags: Vec<BTreeSet<String>>) -> PolyResult<()> {
        if tags.len() != self.faces.len() {
            return Err(PolyError::invalid_mesh(format!(
                "{} tag sets for {} faces",
                tags.len(),
                self.faces.len()
            )));
        }
        self.face_tags = tags;
        Ok(())
    }

    /// Adds `tag` to each face where `mask` is true.
    pub fn add_tag(&mut self, mask: &[bool], tag: &str) {
        for (tags, _) in self.face_tags.iter_mut().zip(mask).filter(|(_, m)| **m) {
            tags.insert(tag.to_string());
        }
    }

    /// Sets every face and vertex role.
    pub fn set_all_roles(&mut self, role: Roles) {
        self.face_roles.iter_mut().for_each(|r| *r = role);
        self.vertex_roles.iter_mut().for_each(|r| *r = role);
    }

    // =========================================================================
    // DERIVED MESHES
    // =========================================================================

    /// Same topology with new positions.
    pub fn with_positions(&self, vertices: Vec<DVec3>) -> Self {
        debug_assert_eq!(vertices.len(), self.vertices.len());
        Self {
            vertices,
            ..self.clone()
        }
    }

    /// Applies `f` to every vertex position.
    pub fn transformed(&self, f: impl Fn(DVec3) -> DVec3) -> Self {
        self.with_positions(self.vertices.iter().map(|&p| f(p)).collect())
    }

    /// Reverses every face loop, flipping all normals.
    pub fn flipped(&self) -> Self {
        let mut out = self.clone();
        for face in &mut out.faces {
            face.reverse();
        }
        out
    }

    /// Appends another mesh's vertices and faces to this one.
    pub fn append(&mut self, other: &PolyMesh) {
        let offset = self.vertices.len();
        self.vertices.extend_from_slice(&other.vertices);
        self.vertex_roles.extend_from_slice(&other.vertex_roles);
        self.faces.extend(
            other
                .faces
                .iter()
                .map(|f| f.iter().map(|&v| v + offset).collect::<Vec<_>>()),
        );
        self.face_roles.extend_from_slice(&other.face_roles);
        self.face_tags.extend(other.face_tags.iter().cloned());
    }

    /// Keeps the faces where `keep` is true and drops orphaned vertices.
    pub fn retain_faces(&self, keep: &[bool]) -> Self {
        let mut faces = Vec::new();
        let mut face_roles = Vec::new();
        let mut face_tags = Vec::new();
        for (fi, face) in self.faces.iter().enumerate() {
            if keep.get(fi).copied().unwrap_or(false) {
                faces.push(face.clone());
                face_roles.push(self.face_roles[fi]);
                face_tags.push(self.face_tags[fi].clone());
            }
        }
        Self::from_parts_unchecked(
            self.vertices.clone(),
            faces,
            face_roles,
            self.vertex_roles.clone(),
            face_tags,
        )
        .without_unused_vertices()
    }

    /// Drops vertices no face references and renumbers the rest.
    pub fn without_unused_vertices(self) -> Self {
        let mut remap = vec![usize::MAX; self.vertices.len()];
        for face in &self.faces {
            for &v in face {
                remap[v] = 0;
            }
        }
        let mut vertices = Vec::new();
        let mut vertex_roles = Vec::new();
        for (v, slot) in remap.iter_mut().enumerate() {
            if *slot == 0 {
                *slot = vertices.len();
                vertices.push(self.vertices[v]);
                vertex_roles.push(self.vertex_roles[v]);
            }
        }
        let faces = self
            .faces
            .iter()
            .map(|f| f.iter().map(|&v| remap[v]).collect())
            .collect();
        Self::from_parts_unchecked(
            vertices,
            faces,
            self.face_roles,
            vertex_roles,
            self.face_tags,
        )
    }
}

/// Formats an RGB triple in `[0, 1]` as a `#RRGGBB` tag.
///
/// # Example
///
/// ```rust
/// use polymesh::mesh::color_tag;
/// assert_eq!(color_tag([1.0, 0.0, 0.5]), "#FF0080");
/// ```
pub fn color_tag(rgb: [f32; 3]) -> String {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "#{:02X}{:02X}{:02X}",
        channel(rgb[0]),
        channel(rgb[1]),
        channel(rgb[2])
    )
}

/// Parses a `#RRGGBB` tag back into an RGB triple.
pub fn parse_color_tag(tag: &str) -> Option<[f32; 3]> {
    let hex = tag.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .ok()
            .map(|c| f32::from(c) / 255.0)
    };
    Some([channel(0)?, channel(2)?, channel(4)?])
}

#[cfg(test)]
mod tests;
