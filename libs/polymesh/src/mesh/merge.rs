//! Face merging: coplanar clean-up and selection-driven merges.

use super::{PolyMesh, Topology};
use std::collections::HashMap;

impl PolyMesh {
    /// Merges edge-adjacent faces that lie in the same plane.
    ///
    /// Groups whose outline is not a single loop are left unmerged. Vertices
    /// that end up straight in every face using them are removed.
    pub fn merge_coplanar_faces(&self, tolerance: f64) -> PolyMesh {
        self.merge_coplanar_where(|_| true, tolerance)
    }

    /// Like [`PolyMesh::merge_coplanar_faces`], restricted to faces where
    /// `selected` holds.
    pub(crate) fn merge_coplanar_where(
        &self,
        selected: impl Fn(usize) -> bool,
        tolerance: f64,
    ) -> PolyMesh {
        let normals: Vec<_> = (0..self.face_count()).map(|f| self.face_normal(f)).collect();
        let offsets: Vec<f64> = (0..self.face_count())
            .map(|f| normals[f].dot(self.face_centroid(f)))
            .collect();
        self.merge_adjacent(
            |f, g| {
                selected(f)
                    && selected(g)
                    && 1.0 - normals[f].dot(normals[g]) < tolerance
                    && (offsets[f] - offsets[g]).abs() < tolerance.sqrt()
            },
            tolerance,
        )
    }

    /// Merges every group of edge-connected faces where `can_join(f, g)`
    /// holds across the shared edge.
    fn merge_adjacent(
        &self,
        can_join: impl Fn(usize, usize) -> bool,
        tolerance: f64,
    ) -> PolyMesh {
        let topo = self.topology();
        let mut parent: Vec<usize> = (0..self.face_count()).collect();
        fn find(parent: &mut [usize], mut x: usize) -> usize {
            while parent[x] != x {
                parent[x] = parent[parent[x]];
                x = parent[x];
            }
            x
        }
        for edge in topo.edges() {
            let Some(t) = edge.twin else { continue };
            let f = topo.half_edge(edge.half_edge).face;
            let g = topo.half_edge(t).face;
            if f == g || !can_join(f, g) {
                continue;
            }
            let (rf, rg) = (find(&mut parent, f), find(&mut parent, g));
            if rf != rg {
                parent[rf.max(rg)] = rf.min(rg);
            }
        }

        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut group_of_root: HashMap<usize, usize> = HashMap::new();
        for f in 0..self.face_count() {
            let root = find(&mut parent, f);
            let gi = *group_of_root.entry(root).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[gi].push(f);
        }

        let mut faces = Vec::with_capacity(groups.len());
        let mut face_roles = Vec::with_capacity(groups.len());
        let mut face_tags = Vec::with_capacity(groups.len());
        for group in &groups {
            let merged = if group.len() > 1 {
                outline(&topo, group, &member_mask(group, self.face_count()))
            } else {
                None
            };
            match merged {
                Some(loop_) => {
                    faces.push(loop_);
                    face_roles.push(self.face_roles[group[0]]);
                    face_tags.push(self.face_tags[group[0]].clone());
                }
                None => {
                    for &f in group {
                        faces.push(self.faces[f].clone());
                        face_roles.push(self.face_roles[f]);
                        face_tags.push(self.face_tags[f].clone());
                    }
                }
            }
        }

        let merged = PolyMesh::from_parts_unchecked(
            self.vertices.clone(),
            faces,
            face_roles,
            self.vertex_roles.clone(),
            face_tags,
        );
        merged.without_straight_vertices(tolerance)
    }

    /// Removes vertices that are straight (180 degrees) in every face using them.
    fn without_straight_vertices(&self, tolerance: f64) -> PolyMesh {
        let mut corner = vec![false; self.vertex_count()];
        for face in &self.faces {
            let n = face.len();
            for k in 0..n {
                let p = self.vertices[face[(k + n - 1) % n]];
                let v = self.vertices[face[k]];
                let q = self.vertices[face[(k + 1) % n]];
                let u = (v - p).normalize_or_zero();
                let w = (q - v).normalize_or_zero();
                if u.cross(w).length() > tolerance.sqrt() || u.dot(w) < 0.0 {
                    corner[face[k]] = true;
                }
            }
        }
        let mut out = self.clone();
        for face in &mut out.faces {
            let kept: Vec<usize> = face.iter().copied().filter(|&v| corner[v]).collect();
            if kept.len() >= 3 {
                *face = kept;
            }
        }
        out.without_unused_vertices()
    }
}

fn member_mask(group: &[usize], face_count: usize) -> Vec<bool> {
    let mut member = vec![false; face_count];
    for &f in group {
        member[f] = true;
    }
    member
}

/// Chains the group's outer half-edges into one loop.
fn outline(topo: &Topology, group: &[usize], member: &[bool]) -> Option<Vec<usize>> {
    let mut next_from: HashMap<usize, usize> = HashMap::new();
    let mut count = 0;
    for &f in group {
        for h in topo.face_half_edges(f) {
            let he = topo.half_edge(h);
            let inner = he
                .twin
                .is_some_and(|t| member[topo.half_edge(t).face]);
            if !inner {
                if next_from.insert(he.from, h).is_some() {
                    // Pinched outline: a vertex is visited twice.
                    return None;
                }
                count += 1;
            }
        }
    }
    let (&start_vertex, _) = next_from.iter().min_by_key(|(v, _)| **v)?;
    let mut loop_ = Vec::with_capacity(count);
    let mut v = start_vertex;
    loop {
        loop_.push(v);
        let h = *next_from.get(&v)?;
        v = topo.half_edge(h).to;
        if v == start_vertex || loop_.len() > count {
            break;
        }
    }
    (loop_.len() == count && loop_.len() >= 3).then_some(loop_)
}
