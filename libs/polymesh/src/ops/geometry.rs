//! # Geometric Operators
//!
//! Position-only transforms. Topology is untouched except for ConvexHull,
//! which rebuilds the mesh from its vertex cloud.

use super::Invocation;
use crate::config::KernelConfig;
use crate::error::{PolyError, PolyResult};
use crate::hull::convex_hull;
use crate::mesh::PolyMesh;
use crate::registry::Operator;
use config::constants::EPSILON;
use glam::{DQuat, DVec3};
use rayon::prelude::*;
use tracing::{debug, trace, warn};

pub(super) fn apply(mesh: &PolyMesh, inv: &Invocation, config: &KernelConfig) -> PolyResult<PolyMesh> {
    use Operator::*;
    let a = inv.amount;
    let center = mesh.center();
    let out = match inv.op {
        Canonicalize => canonicalize(mesh, config),
        Spherize => {
            let mask = inv.vertex_mask(mesh);
            toward_mean_radius(mesh, &mask, a, |p| p - center)
        }
        Cylinderize => {
            let mask = inv.vertex_mask(mesh);
            toward_mean_radius(mesh, &mask, a, |p| {
                let d = p - center;
                DVec3::new(d.x, 0.0, d.z)
            })
        }
        Stretch => mesh.transformed(|p| DVec3::new(p.x, center.y + (p.y - center.y) * a, p.z)),
        Recenter => mesh.transformed(|p| p - center),
        SitLevel => sit_level(mesh, a),
        Hinge => {
            let q = DQuat::from_rotation_z(a.to_radians());
            mesh.transformed(|p| if p.x > 0.0 { q * p } else { p })
        }
        ConvexHull => match convex_hull(mesh.vertices()) {
            Some(hull) => hull,
            None => {
                warn!(vertices = mesh.vertex_count(), "convex hull is degenerate, mesh unchanged");
                mesh.clone()
            }
        },
        other => {
            return Err(PolyError::invalid_for_mesh(other, "not a geometric operator"));
        }
    };
    Ok(out)
}

/// Moves each selected vertex toward the mean radius along `radial(p)`.
///
/// `amount = 1` lands exactly on the mean radius, `0` leaves it in place.
fn toward_mean_radius(
    mesh: &PolyMesh,
    mask: &[bool],
    amount: f64,
    radial: impl Fn(DVec3) -> DVec3 + Sync,
) -> PolyMesh {
    if mesh.vertex_count() == 0 {
        return mesh.clone();
    }
    let mean = mesh.vertices().iter().map(|&p| radial(p).length()).sum::<f64>()
        / mesh.vertex_count() as f64;
    let positions = mesh
        .vertices()
        .par_iter()
        .zip(mask.par_iter())
        .map(|(&p, &selected)| {
            let r = radial(p);
            if !selected || r.length_squared() < EPSILON {
                return p;
            }
            let target = p - r + r.normalize() * mean;
            p.lerp(target, amount)
        })
        .collect();
    mesh.with_positions(positions)
}

/// Turns face `floor(amount · (F - 1))` to face straight down and rests the
/// mesh on `y = 0`.
fn sit_level(mesh: &PolyMesh, amount: f64) -> PolyMesh {
    if mesh.face_count() == 0 {
        return mesh.clone();
    }
    let last = mesh.face_count() - 1;
    let face = ((amount.clamp(0.0, 1.0) * last as f64).floor() as usize).min(last);
    let normal = mesh.face_normal(face);
    let q = if normal.length_squared() < EPSILON {
        DQuat::IDENTITY
    } else {
        DQuat::from_rotation_arc(normal, DVec3::NEG_Y)
    };
    let rotated = mesh.transformed(|p| q * p);
    let floor = rotated
        .vertices()
        .iter()
        .map(|p| p.y)
        .fold(f64::INFINITY, f64::min);
    rotated.transformed(|p| p - DVec3::Y * floor)
}

// =============================================================================
// CANONICALIZE
// =============================================================================

/// Relaxes the mesh toward canonical form: edges tangent to the unit
/// sphere, edge tangent points centred on the origin and planar faces.
///
/// Stops after `config.canonicalize_iterations` passes or once no vertex
/// moves more than `config.tolerance`.
fn canonicalize(mesh: &PolyMesh, config: &KernelConfig) -> PolyMesh {
    let edges = mesh.topology().edges();
    let incident = mesh.vertex_faces();
    let mut current = mesh.clone();

    for iteration in 0..config.canonicalize_iterations {
        let before = current.vertices().to_vec();

        // Tangentify and recentre.
        let mut shift = vec![DVec3::ZERO; before.len()];
        let mut tangent_sum = DVec3::ZERO;
        let mut tangent_count = 0usize;
        for e in &edges {
            let (a, b) = (before[e.a], before[e.b]);
            let d = b - a;
            let len2 = d.length_squared();
            if len2 < EPSILON {
                continue;
            }
            let t = a - d * (a.dot(d) / len2);
            let push = t * ((1.0 - t.length()) * 0.5);
            shift[e.a] += push;
            shift[e.b] += push;
            tangent_sum += t;
            tangent_count += 1;
        }
        let centre = tangent_sum / tangent_count.max(1) as f64;
        let staged = current.with_positions(
            before
                .iter()
                .zip(&shift)
                .map(|(&p, &s)| p + s - centre)
                .collect(),
        );

        // Planarize: average projection onto each incident face plane.
        let planes: Vec<(DVec3, DVec3)> = (0..staged.face_count())
            .map(|f| (staged.face_normal(f), staged.face_centroid(f)))
            .collect();
        let planar: Vec<DVec3> = (0..staged.vertex_count())
            .into_par_iter()
            .map(|v| {
                let p = staged.vertices()[v];
                let faces = &incident[v];
                if faces.is_empty() {
                    return p;
                }
                faces
                    .iter()
                    .map(|&f| {
                        let (n, c) = planes[f];
                        p - n * n.dot(p - c)
                    })
                    .sum::<DVec3>()
                    / faces.len() as f64
            })
            .collect();

        let change = before
            .iter()
            .zip(&planar)
            .map(|(a, b)| a.distance(*b))
            .fold(0.0, f64::max);
        current = current.with_positions(planar);
        trace!(iteration, change, "canonicalize pass");
        if change < config.tolerance {
            debug!(iterations = iteration + 1, "canonicalize converged");
            return current;
        }
    }
    warn!(
        iterations = config.canonicalize_iterations,
        "canonicalize did not converge"
    );
    current
}
