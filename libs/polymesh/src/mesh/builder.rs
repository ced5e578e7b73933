//! Keyed mesh assembly used by the topological operators.
//!
//! Output vertices are identified by a [`Key`] naming the input element they
//! come from. Asking for the same key twice returns the same index, so faces
//! built independently share vertices without a weld pass. Indices are handed
//! out in first-request order, which keeps operator output deterministic.

use super::{PolyMesh, Roles};
use glam::DVec3;
use std::collections::{BTreeSet, HashMap};

/// Identity of an output vertex in terms of input elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Key {
    /// Input vertex.
    V(usize),
    /// Input face (center, apex or dual vertex).
    F(usize),
    /// Undirected input edge, stored as `(min, max)`.
    E(usize, usize),
    /// Input half-edge.
    H(usize),
    /// Second point derived from an input half-edge.
    H2(usize),
    /// Point on edge `a-b` nearer to `a`.
    Dir(usize, usize),
    /// Corner of face `f` at vertex `v`.
    Corner(usize, usize),
    /// Corner of face `f` at vertex `v`, pulled toward vertex `w`.
    CornerDir(usize, usize, usize),
    /// `k`-th interior point on edge `(a, b)` counted from `a`.
    EdgeDiv(usize, usize, usize),
    /// Vertex of a copied layer: `(layer, vertex)`.
    Layer(usize, usize),
    /// Ring `layer` of a stacked face: `(face, vertex, layer)`.
    Ring(usize, usize, usize),
}

impl Key {
    /// Undirected edge key.
    pub(crate) fn edge(a: usize, b: usize) -> Self {
        Key::E(a.min(b), a.max(b))
    }
}

/// Accumulates vertices and faces for a new [`PolyMesh`].
#[derive(Debug, Default)]
pub(crate) struct MeshBuilder {
    index: HashMap<Key, usize>,
    vertices: Vec<DVec3>,
    vertex_roles: Vec<Roles>,
    faces: Vec<Vec<usize>>,
    face_roles: Vec<Roles>,
    face_tags: Vec<BTreeSet<String>>,
}

impl MeshBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the index for `key`, creating the vertex on first request.
    pub(crate) fn vertex(
        &mut self,
        key: Key,
        role: Roles,
        position: impl FnOnce() -> DVec3,
    ) -> usize {
        if let Some(&i) = self.index.get(&key) {
            return i;
        }
        let i = self.vertices.len();
        self.vertices.push(position());
        self.vertex_roles.push(role);
        self.index.insert(key, i);
        i
    }

    /// Index of an existing key.
    pub(crate) fn get(&self, key: Key) -> Option<usize> {
        self.index.get(&key).copied()
    }

    /// Adds a vertex with no key.
    pub(crate) fn push_vertex(&mut self, position: DVec3, role: Roles) -> usize {
        self.vertices.push(position);
        self.vertex_roles.push(role);
        self.vertices.len() - 1
    }

    /// Adds a face, dropping repeated consecutive indices.
    ///
    /// Faces that collapse below three vertices are skipped.
    pub(crate) fn face(&mut self, mut loop_: Vec<usize>, role: Roles, tags: &BTreeSet<String>) {
        loop_.dedup();
        while loop_.len() > 1 && loop_.first() == loop_.last() {
            loop_.pop();
        }
        if loop_.len() < 3 {
            return;
        }
        self.faces.push(loop_);
        self.face_roles.push(role);
        self.face_tags.push(tags.clone());
    }

    /// Position of an already created vertex.
    pub(crate) fn position(&self, index: usize) -> DVec3 {
        self.vertices[index]
    }

    pub(crate) fn build(self) -> PolyMesh {
        PolyMesh::from_parts_unchecked(
            self.vertices,
            self.faces,
            self.face_roles,
            self.vertex_roles,
            self.face_tags,
        )
    }
}
