//! # Compositional Operators
//!
//! Operators that append transformed copies of the mesh, its dual or the
//! stashed mesh.

use super::{conway, Invocation};
use crate::error::{PolyError, PolyResult};
use crate::mesh::PolyMesh;
use crate::registry::Operator;
use config::constants::{approx_zero, EPSILON};
use glam::{DQuat, DVec3};
use tracing::{debug, warn};

pub(super) fn apply(
    mesh: &PolyMesh,
    inv: &Invocation,
    stash: &mut Option<PolyMesh>,
) -> PolyResult<PolyMesh> {
    use Operator::*;
    let (a, a2) = (inv.amount, inv.amount2);
    let out = match inv.op {
        AddDual => add_dual(mesh, a)?,
        AddCopyX => add_copy(mesh, &inv.face_mask(mesh), DVec3::X, a),
        AddCopyY => add_copy(mesh, &inv.face_mask(mesh), DVec3::Y, a),
        AddCopyZ => add_copy(mesh, &inv.face_mask(mesh), DVec3::Z, a),
        AddMirrorX => add_mirror(mesh, &inv.face_mask(mesh), DVec3::X, a),
        AddMirrorY => add_mirror(mesh, &inv.face_mask(mesh), DVec3::Y, a),
        AddMirrorZ => add_mirror(mesh, &inv.face_mask(mesh), DVec3::Z, a),
        Stash => {
            let saved = mesh.retain_faces(&inv.face_mask(mesh));
            debug!(faces = saved.face_count(), "stashed mesh");
            *stash = Some(saved);
            mesh.clone()
        }
        Unstash => match stash {
            Some(saved) => {
                let mut out = mesh.clone();
                out.append(&saved.transformed(|p| p + DVec3::new(a2, a, 0.0)));
                out
            }
            None => empty_stash(mesh),
        },
        UnstashToFaces => match stash {
            Some(saved) => {
                let mask = inv.face_mask(mesh);
                let targets = (0..mesh.face_count()).filter(|&f| mask[f]).map(|f| Target {
                    position: mesh.face_centroid(f),
                    normal: mesh.face_normal(f),
                    radius: mesh.face_radius(f),
                });
                place_copies(mesh, saved, targets, a, a2)
            }
            None => empty_stash(mesh),
        },
        UnstashToVerts => match stash {
            Some(saved) => {
                let mask = inv.vertex_mask(mesh);
                let normals = mesh.vertex_normals();
                let reach = vertex_reach(mesh);
                let targets = (0..mesh.vertex_count()).filter(|&v| mask[v]).map(|v| Target {
                    position: mesh.vertices()[v],
                    normal: normals[v],
                    radius: reach[v],
                });
                place_copies(mesh, saved, targets, a, a2)
            }
            None => empty_stash(mesh),
        },
        other => {
            return Err(PolyError::invalid_for_mesh(other, "not a compositional operator"));
        }
    };
    Ok(out)
}

fn empty_stash(mesh: &PolyMesh) -> PolyMesh {
    warn!("stash is empty, mesh unchanged");
    mesh.clone()
}

/// Appends the dual, scaled by `scale` about the mesh centre.
fn add_dual(mesh: &PolyMesh, scale: f64) -> PolyResult<PolyMesh> {
    let center = mesh.center();
    let dual = conway::dual(mesh, Operator::AddDual)?;
    let mut out = mesh.clone();
    out.append(&dual.transformed(|p| center + (p - center) * scale));
    Ok(out)
}

/// Appends the selected faces shifted by `amount` bounding-box extents.
fn add_copy(mesh: &PolyMesh, mask: &[bool], axis: DVec3, amount: f64) -> PolyMesh {
    let extent = mesh
        .bounding_box()
        .map_or(DVec3::ZERO, |(lo, hi)| hi - lo);
    let offset = axis * extent * amount;
    let mut out = mesh.clone();
    out.append(&mesh.retain_faces(mask).transformed(|p| p + offset));
    out
}

/// Appends the selected faces reflected across the plane `axis · p = amount`.
fn add_mirror(mesh: &PolyMesh, mask: &[bool], axis: DVec3, amount: f64) -> PolyMesh {
    let reflected = mesh
        .retain_faces(mask)
        .transformed(|p| p - axis * (2.0 * (axis.dot(p) - amount)))
        .flipped();
    let mut out = mesh.clone();
    out.append(&reflected);
    out
}

/// Where and how large a placed stash copy should be.
struct Target {
    position: DVec3,
    normal: DVec3,
    radius: f64,
}

/// Half the mean length of the edges around each vertex.
fn vertex_reach(mesh: &PolyMesh) -> Vec<f64> {
    let topo = mesh.topology();
    (0..mesh.vertex_count())
        .map(|v| {
            let p = mesh.vertices()[v];
            let neighbors = topo.neighbors(v);
            if neighbors.is_empty() {
                return 0.0;
            }
            let total: f64 = neighbors.iter().map(|&w| p.distance(mesh.vertices()[w])).sum();
            total / neighbors.len() as f64 * 0.5
        })
        .collect()
}

/// Appends one copy of `stash` per target.
///
/// Each copy is recentred, scaled so its mean radius is
/// `target.radius · (1 + scale)`, turned so +Y follows the target normal and
/// moved `offset` along it.
fn place_copies(
    mesh: &PolyMesh,
    stash: &PolyMesh,
    targets: impl Iterator<Item = Target>,
    offset: f64,
    scale: f64,
) -> PolyMesh {
    let center = stash.center();
    let stash_radius = if stash.vertex_count() == 0 {
        0.0
    } else {
        stash.vertices().iter().map(|p| p.distance(center)).sum::<f64>()
            / stash.vertex_count() as f64
    };
    let mut out = mesh.clone();
    let mut placed = 0usize;
    for target in targets {
        let factor = if approx_zero(stash_radius) {
            1.0
        } else {
            target.radius * (1.0 + scale) / stash_radius
        };
        let q = if target.normal.length_squared() < EPSILON {
            DQuat::IDENTITY
        } else {
            DQuat::from_rotation_arc(DVec3::Y, target.normal)
        };
        let origin = target.position + target.normal * offset;
        out.append(&stash.transformed(|p| origin + q * ((p - center) * factor)));
        placed += 1;
    }
    debug!(copies = placed, "placed stash copies");
    out
}
