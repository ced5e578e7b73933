//! # Vertex Operators
//!
//! Moves, removals and welding of vertices. The selection is evaluated over
//! vertices; unselected vertices keep their positions.

use super::Invocation;
use crate::error::{PolyError, PolyResult};
use crate::mesh::builder::{Key, MeshBuilder};
use crate::mesh::PolyMesh;
use crate::registry::Operator;
use config::constants::{EPSILON, VERTEX_MERGE_EPSILON};
use glam::{DQuat, DVec3};
use std::collections::HashMap;
use tracing::debug;

pub(super) fn apply(mesh: &PolyMesh, inv: &Invocation) -> PolyResult<PolyMesh> {
    use Operator::*;
    let mask = inv.vertex_mask(mesh);
    let amounts = inv.amounts(mesh.vertex_count());
    let center = mesh.center();
    let out = match inv.op {
        VertexScale => move_selected(mesh, &mask, |v, p| center + (p - center) * (1.0 + amounts[v])),
        VertexRotate => move_selected(mesh, &mask, |v, p| {
            let q = DQuat::from_rotation_y((amounts[v] * 90.0).to_radians());
            center + q * (p - center)
        }),
        VertexFlex => {
            let normals = mesh.vertex_normals();
            move_selected(mesh, &mask, |v, p| p + normals[v] * amounts[v])
        }
        VertexStellate => {
            let hubs = face_hubs(mesh);
            move_selected(mesh, &mask, |v, p| p + (p - hubs[v]) * amounts[v])
        }
        VertexRemove => drop_vertices(mesh, &mask),
        VertexKeep => {
            let removed: Vec<bool> = mask.iter().map(|&m| !m).collect();
            drop_vertices(mesh, &removed)
        }
        Weld => weld(mesh, inv.amount),
        other => {
            return Err(PolyError::invalid_for_mesh(other, "not a vertex operator"));
        }
    };
    Ok(out)
}

fn move_selected(mesh: &PolyMesh, mask: &[bool], mv: impl Fn(usize, DVec3) -> DVec3) -> PolyMesh {
    let positions = mesh
        .vertices()
        .iter()
        .enumerate()
        .map(|(v, &p)| if mask[v] { mv(v, p) } else { p })
        .collect();
    mesh.with_positions(positions)
}

/// Mean centroid of the faces around each vertex; isolated vertices map to
/// themselves.
fn face_hubs(mesh: &PolyMesh) -> Vec<DVec3> {
    let centroids: Vec<DVec3> = (0..mesh.face_count()).map(|f| mesh.face_centroid(f)).collect();
    mesh.vertex_faces()
        .iter()
        .enumerate()
        .map(|(v, faces)| {
            if faces.is_empty() {
                mesh.vertices()[v]
            } else {
                faces.iter().map(|&f| centroids[f]).sum::<DVec3>() / faces.len() as f64
            }
        })
        .collect()
}

/// Removes the marked vertices from every face loop. Faces left with fewer
/// than three vertices disappear.
fn drop_vertices(mesh: &PolyMesh, removed: &[bool]) -> PolyMesh {
    let mut b = MeshBuilder::new();
    for f in 0..mesh.face_count() {
        let loop_ = mesh
            .face(f)
            .iter()
            .filter(|&&v| !removed[v])
            .map(|&v| b.vertex(Key::V(v), mesh.vertex_roles()[v], || mesh.vertices()[v]))
            .collect();
        b.face(loop_, mesh.face_roles()[f], &mesh.face_tags()[f]);
    }
    b.build().without_unused_vertices()
}

// =============================================================================
// WELD
// =============================================================================

/// Merges vertices closer than `distance` and drops faces that collapse.
///
/// Candidates are found through a uniform grid with cell size `distance`;
/// each merged cluster takes the position of its lowest-indexed vertex.
pub(crate) fn weld(mesh: &PolyMesh, distance: f64) -> PolyMesh {
    let distance = distance.max(VERTEX_MERGE_EPSILON);
    let cell = |p: DVec3| -> (i64, i64, i64) {
        let c = (p / distance).floor();
        (c.x as i64, c.y as i64, c.z as i64)
    };

    let mut grid: HashMap<(i64, i64, i64), Vec<usize>> = HashMap::new();
    for (v, &p) in mesh.vertices().iter().enumerate() {
        grid.entry(cell(p)).or_default().push(v);
    }

    let mut parent: Vec<usize> = (0..mesh.vertex_count()).collect();
    fn find(parent: &mut [usize], mut x: usize) -> usize {
        while parent[x] != x {
            parent[x] = parent[parent[x]];
            x = parent[x];
        }
        x
    }
    for (v, &p) in mesh.vertices().iter().enumerate() {
        let (cx, cy, cz) = cell(p);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(bucket) = grid.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    for &w in bucket.iter().filter(|&&w| w > v) {
                        if p.distance(mesh.vertices()[w]) <= distance + EPSILON {
                            let (rv, rw) = (find(&mut parent, v), find(&mut parent, w));
                            if rv != rw {
                                parent[rv.max(rw)] = rv.min(rw);
                            }
                        }
                    }
                }
            }
        }
    }

    let mut b = MeshBuilder::new();
    for f in 0..mesh.face_count() {
        let loop_ = mesh
            .face(f)
            .iter()
            .map(|&v| {
                let root = find(&mut parent, v);
                b.vertex(Key::V(root), mesh.vertex_roles()[root], || mesh.vertices()[root])
            })
            .collect();
        b.face(loop_, mesh.face_roles()[f], &mesh.face_tags()[f]);
    }
    let out = b.build();
    debug!(
        before = mesh.vertex_count(),
        after = out.vertex_count(),
        "welded vertices"
    );
    out
}
