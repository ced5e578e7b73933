//! # Face Operators
//!
//! Face-level surgery: splitting, extruding, moving, removing and bridging
//! faces. Selected faces are transformed; the rest pass through with role
//! `Ignored` unless the operator removes or keeps by selection.

use super::conway;
use super::Invocation;
use crate::error::{PolyError, PolyResult};
use crate::mesh::builder::{Key, MeshBuilder};
use crate::mesh::{PolyMesh, Roles};
use crate::registry::Operator;
use config::constants::{
    approx_equal, approx_zero, COPLANAR_TOLERANCE, EPSILON, STACK_MAX_LAYERS, STACK_MIN_SCALE,
};
use glam::{DQuat, DVec3};
use std::collections::BTreeSet;
use tracing::debug;

pub(super) fn apply(mesh: &PolyMesh, inv: &Invocation) -> PolyResult<PolyMesh> {
    use Operator::*;
    let mask = inv.face_mask(mesh);
    let amounts = inv.amounts(mesh.face_count());
    let (a, a2) = (inv.amount, inv.amount2);
    let out = match inv.op {
        SplitFaces => split_faces(mesh, &mask),
        Gable => gable(mesh, &mask, &amounts, a2),
        FaceOffset => detach_faces(mesh, &mask, |frame, f, p| p + frame.normal * amounts[f]),
        Extrude => extrude(mesh, &mask, &amounts),
        Shell => shell(mesh, a),
        Skeleton => skeleton(mesh, &mask, a),
        Segment => {
            let keep = by_range(mesh, &mask, a, a2, Axis::Height, true);
            mesh.retain_faces(&keep)
        }
        FaceScale => detach_faces(mesh, &mask, |frame, f, p| {
            frame.centroid + (p - frame.centroid) * (1.0 + amounts[f])
        }),
        FaceRotate => detach_faces(mesh, &mask, |frame, f, p| {
            frame.rotate(frame.normal, amounts[f], p)
        }),
        FaceRotateX => detach_faces(mesh, &mask, |frame, f, p| {
            frame.rotate(frame.tangent, amounts[f], p)
        }),
        FaceRotateY => detach_faces(mesh, &mask, |frame, f, p| {
            frame.rotate(frame.bitangent, amounts[f], p)
        }),
        FaceSlide => detach_faces(mesh, &mask, |frame, f, p| {
            p + frame.tangent * amounts[f] + frame.bitangent * a2
        }),
        FaceRemove => mesh.retain_faces(&invert(&mask)),
        FaceKeep => mesh.retain_faces(&mask),
        FaceRemoveX => remove_by(mesh, a, a2, Axis::X),
        FaceRemoveY => remove_by(mesh, a, a2, Axis::Y),
        FaceRemoveZ => remove_by(mesh, a, a2, Axis::Z),
        FaceRemoveDistance => remove_by(mesh, a, a2, Axis::Distance),
        FaceRemovePolar => remove_by(mesh, a, a2, Axis::Polar),
        FillHoles => fill_holes(mesh),
        ExtendBoundaries => extend_boundaries(mesh, a, a2),
        ConnectFaces => connect_faces(mesh, a, a2),
        FaceMerge => mesh.merge_coplanar_where(|f| mask[f], COPLANAR_TOLERANCE),
        Layer => layer(mesh, &mask, &amounts, a2),
        Stack => stack(mesh, &mask, a, a2),
        TagFaces => {
            let mut out = mesh.clone();
            if let Some(tag) = inv.tag {
                out.add_tag(&mask, tag);
            }
            out
        }
        other => {
            return Err(PolyError::invalid_for_mesh(other, "not a face operator"));
        }
    };
    Ok(out)
}

fn invert(mask: &[bool]) -> Vec<bool> {
    mask.iter().map(|&m| !m).collect()
}

// =============================================================================
// FACE FRAMES
// =============================================================================

/// Local frame of a face: centroid, unit normal and two in-plane axes.
///
/// The tangent points from the centroid to the first vertex.
#[derive(Debug, Clone, Copy)]
struct Frame {
    centroid: DVec3,
    normal: DVec3,
    tangent: DVec3,
    bitangent: DVec3,
}

impl Frame {
    fn of(mesh: &PolyMesh, f: usize) -> Self {
        let centroid = mesh.face_centroid(f);
        let normal = mesh.face_normal(f);
        let first = mesh.vertices()[mesh.face(f)[0]];
        let tangent = (first - centroid).normalize_or_zero();
        Self {
            centroid,
            normal,
            tangent,
            bitangent: normal.cross(tangent),
        }
    }

    /// Rotates `p` by `degrees` about `axis` through the centroid.
    fn rotate(&self, axis: DVec3, degrees: f64, p: DVec3) -> DVec3 {
        if axis.length_squared() < EPSILON {
            return p;
        }
        let q = DQuat::from_axis_angle(axis.normalize(), degrees.to_radians());
        self.centroid + q * (p - self.centroid)
    }
}

/// Re-emits each selected face on its own vertices, moved by `mv`.
///
/// Unselected faces keep their shared vertices.
fn detach_faces(
    mesh: &PolyMesh,
    mask: &[bool],
    mv: impl Fn(&Frame, usize, DVec3) -> DVec3,
) -> PolyMesh {
    let mut b = MeshBuilder::new();
    for f in 0..mesh.face_count() {
        let tags = &mesh.face_tags()[f];
        if !mask[f] {
            let loop_ = mesh
                .face(f)
                .iter()
                .map(|&v| b.vertex(Key::V(v), Roles::Ignored, || mesh.vertices()[v]))
                .collect();
            b.face(loop_, Roles::Ignored, tags);
            continue;
        }
        let frame = Frame::of(mesh, f);
        let loop_ = mesh
            .face(f)
            .iter()
            .map(|&v| {
                b.vertex(Key::Corner(f, v), Roles::Existing, || {
                    mv(&frame, f, mesh.vertices()[v])
                })
            })
            .collect();
        b.face(loop_, Roles::Existing, tags);
    }
    b.build()
}

/// Starts a builder holding every input vertex at its own index.
fn builder_with_vertices(mesh: &PolyMesh) -> MeshBuilder {
    let mut b = MeshBuilder::new();
    for (v, &p) in mesh.vertices().iter().enumerate() {
        b.vertex(Key::V(v), Roles::Existing, || p);
    }
    b
}

fn pass_through(b: &mut MeshBuilder, mesh: &PolyMesh, f: usize) {
    b.face(mesh.face(f).to_vec(), Roles::Ignored, &mesh.face_tags()[f]);
}

// =============================================================================
// SPLITTING AND EXTRUSION
// =============================================================================

/// Splits selected faces with four or more sides along `v0 – v[n/2]`.
fn split_faces(mesh: &PolyMesh, mask: &[bool]) -> PolyMesh {
    let mut b = builder_with_vertices(mesh);
    for f in 0..mesh.face_count() {
        let face = mesh.face(f);
        let tags = &mesh.face_tags()[f];
        if !mask[f] {
            pass_through(&mut b, mesh, f);
        } else if face.len() < 4 {
            b.face(face.to_vec(), Roles::Existing, tags);
        } else {
            let k = face.len() / 2;
            b.face(face[..=k].to_vec(), Roles::Existing, tags);
            let mut rest = face[k..].to_vec();
            rest.push(face[0]);
            b.face(rest, Roles::New, tags);
        }
    }
    b.build()
}

/// Replaces each selected face by a gabled roof.
///
/// The ridge runs between points pulled in from edge 0 and edge `n/2`.
fn gable(mesh: &PolyMesh, mask: &[bool], amounts: &[f64], lift: f64) -> PolyMesh {
    let topo = mesh.topology();
    let mut b = builder_with_vertices(mesh);
    for f in 0..mesh.face_count() {
        if !mask[f] {
            pass_through(&mut b, mesh, f);
            continue;
        }
        let face = mesh.face(f);
        let tags = &mesh.face_tags()[f];
        let n = face.len();
        let k = n / 2;
        let frame = Frame::of(mesh, f);
        let first = topo.face_half_edges(f).start;
        let ridge = |b: &mut MeshBuilder, edge: usize| {
            let (p, q) = (face[edge], face[(edge + 1) % n]);
            b.vertex(Key::H(first + edge), Roles::New, || {
                let mid = mesh.vertices()[p].lerp(mesh.vertices()[q], 0.5);
                mid.lerp(frame.centroid, amounts[f]) + frame.normal * lift
            })
        };
        let r0 = ridge(&mut b, 0);
        let r1 = ridge(&mut b, k);

        b.face(vec![face[0], face[1], r0], Roles::New, tags);
        let mut side: Vec<usize> = face[1..=k].to_vec();
        side.extend([r1, r0]);
        b.face(side, Roles::Existing, tags);
        b.face(vec![face[k], face[(k + 1) % n], r1], Roles::New, tags);
        let mut other: Vec<usize> = (k + 1..n).map(|i| face[i]).collect();
        other.extend([face[0], r0, r1]);
        b.face(other, Roles::Existing, tags);
    }
    b.build()
}

/// Pushes each selected face out along its normal, adding side walls.
fn extrude(mesh: &PolyMesh, mask: &[bool], amounts: &[f64]) -> PolyMesh {
    let mut b = builder_with_vertices(mesh);
    for f in 0..mesh.face_count() {
        if !mask[f] {
            pass_through(&mut b, mesh, f);
            continue;
        }
        let face = mesh.face(f);
        let tags = &mesh.face_tags()[f];
        let offset = mesh.face_normal(f) * amounts[f];
        let top: Vec<usize> = face
            .iter()
            .map(|&v| b.vertex(Key::Corner(f, v), Roles::Existing, || mesh.vertices()[v] + offset))
            .collect();
        let n = face.len();
        for k in 0..n {
            let (i, j) = (k, (k + 1) % n);
            b.face(vec![face[i], face[j], top[j], top[i]], Roles::NewAlt, tags);
        }
        b.face(top, Roles::Existing, tags);
    }
    b.build()
}

/// Thickens the surface inward by `amount` along vertex normals.
///
/// Open boundaries are bridged between the outer and inner skins.
fn shell(mesh: &PolyMesh, amount: f64) -> PolyMesh {
    let normals = mesh.vertex_normals();
    let mut b = builder_with_vertices(mesh);
    for f in 0..mesh.face_count() {
        b.face(mesh.face(f).to_vec(), mesh.face_roles()[f], &mesh.face_tags()[f]);
    }
    let inner = |b: &mut MeshBuilder, v: usize| {
        b.vertex(Key::Layer(1, v), Roles::New, || mesh.vertices()[v] - normals[v] * amount)
    };
    for f in 0..mesh.face_count() {
        let loop_ = mesh.face(f).iter().rev().map(|&v| inner(&mut b, v)).collect();
        b.face(loop_, Roles::New, &mesh.face_tags()[f]);
    }
    let topo = mesh.topology();
    for he in topo.half_edges().iter().filter(|he| he.twin.is_none()) {
        let quad = vec![he.to, he.from, inner(&mut b, he.from), inner(&mut b, he.to)];
        b.face(quad, Roles::NewAlt, &mesh.face_tags()[he.face]);
    }
    b.build()
}

/// Lofts the selection, drops the inset faces and shells what is left.
fn skeleton(mesh: &PolyMesh, mask: &[bool], amount: f64) -> PolyMesh {
    let lofted = conway::loft(mesh, mask, &vec![amount; mesh.face_count()], 0.0);
    let frame: Vec<bool> = lofted
        .face_roles()
        .iter()
        .map(|&r| r != Roles::Existing)
        .collect();
    shell(&lofted.retain_faces(&frame), amount)
}

// =============================================================================
// REMOVAL BY POSITION
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum Axis {
    X,
    Y,
    Z,
    /// Centroid height mapped to `[0, 1]` over the bounding box.
    Height,
    /// Distance from the mesh centre over the largest such distance.
    Distance,
    /// Degrees of `atan2(z, x)`.
    Polar,
}

/// Marks selected faces whose measure along `axis` lies in
/// `[min(lo, hi), max(lo, hi)]`; unselected faces are always kept when
/// `keep_inside`, always removed otherwise.
fn by_range(
    mesh: &PolyMesh,
    mask: &[bool],
    lo: f64,
    hi: f64,
    axis: Axis,
    keep_inside: bool,
) -> Vec<bool> {
    let (lo, hi) = (lo.min(hi), lo.max(hi));
    let (min, max) = mesh.bounding_box().unwrap_or((DVec3::ZERO, DVec3::ZERO));
    let center = mesh.center();
    let centroids: Vec<DVec3> = (0..mesh.face_count()).map(|f| mesh.face_centroid(f)).collect();
    let max_distance = centroids
        .iter()
        .map(|c| c.distance(center))
        .fold(0.0_f64, f64::max);
    let signed = |value: f64, lo: f64, hi: f64| {
        if approx_equal(hi, lo) {
            0.0
        } else {
            2.0 * (value - lo) / (hi - lo) - 1.0
        }
    };

    centroids
        .iter()
        .enumerate()
        .map(|(f, c)| {
            if !mask[f] {
                return keep_inside;
            }
            let measure = match axis {
                Axis::X => signed(c.x, min.x, max.x),
                Axis::Y => signed(c.y, min.y, max.y),
                Axis::Z => signed(c.z, min.z, max.z),
                Axis::Height => (signed(c.y, min.y, max.y) + 1.0) * 0.5,
                Axis::Distance if approx_zero(max_distance) => 0.0,
                Axis::Distance => c.distance(center) / max_distance,
                Axis::Polar => c.z.atan2(c.x).to_degrees(),
            };
            let inside = (lo..=hi).contains(&measure);
            inside == keep_inside
        })
        .collect()
}

fn remove_by(mesh: &PolyMesh, lo: f64, hi: f64, axis: Axis) -> PolyMesh {
    let all = vec![true; mesh.face_count()];
    let keep = by_range(mesh, &all, lo, hi, axis, false);
    mesh.retain_faces(&keep)
}

// =============================================================================
// BOUNDARIES
// =============================================================================

/// Closes every boundary loop with a new face.
fn fill_holes(mesh: &PolyMesh) -> PolyMesh {
    let loops = mesh.topology().boundary_loops();
    debug!(holes = loops.len(), "filling holes");
    let mut b = builder_with_vertices(mesh);
    for f in 0..mesh.face_count() {
        b.face(mesh.face(f).to_vec(), mesh.face_roles()[f], &mesh.face_tags()[f]);
    }
    for mut loop_ in loops {
        loop_.reverse();
        b.face(loop_, Roles::New, &BTreeSet::new());
    }
    b.build()
}

/// Grows a strip of quads outward from every boundary edge.
///
/// `tilt_degrees` rotates the growth direction toward the surface normal.
fn extend_boundaries(mesh: &PolyMesh, amount: f64, tilt_degrees: f64) -> PolyMesh {
    let topo = mesh.topology();
    let normals: Vec<DVec3> = (0..mesh.face_count()).map(|f| mesh.face_normal(f)).collect();
    let mut out_dir = vec![DVec3::ZERO; mesh.vertex_count()];
    let mut up = vec![DVec3::ZERO; mesh.vertex_count()];
    for he in topo.half_edges().iter().filter(|he| he.twin.is_none()) {
        let edge = mesh.vertices()[he.to] - mesh.vertices()[he.from];
        let out = edge.cross(normals[he.face]).normalize_or_zero();
        for v in [he.from, he.to] {
            out_dir[v] += out;
            up[v] += normals[he.face];
        }
    }

    let mut b = builder_with_vertices(mesh);
    for f in 0..mesh.face_count() {
        b.face(mesh.face(f).to_vec(), mesh.face_roles()[f], &mesh.face_tags()[f]);
    }
    let grown = |b: &mut MeshBuilder, v: usize| {
        b.vertex(Key::Layer(1, v), Roles::New, || {
            let d = out_dir[v].normalize_or_zero();
            let axis = d.cross(up[v].normalize_or_zero());
            let d = if axis.length_squared() < EPSILON {
                d
            } else {
                DQuat::from_axis_angle(axis.normalize(), tilt_degrees.to_radians()) * d
            };
            mesh.vertices()[v] + d * amount
        })
    };
    for he in topo.half_edges().iter().filter(|he| he.twin.is_none()) {
        let quad = vec![he.to, he.from, grown(&mut b, he.from), grown(&mut b, he.to)];
        b.face(quad, Roles::NewAlt, &mesh.face_tags()[he.face]);
    }
    b.build()
}

/// Bridges pairs of facing faces with equal side counts.
///
/// `tolerance` loosens how exactly the normals must oppose; `max_fraction`
/// limits the gap to that fraction of the bounding-box diagonal (0 means no
/// limit).
fn connect_faces(mesh: &PolyMesh, tolerance: f64, max_fraction: f64) -> PolyMesh {
    let count = mesh.face_count();
    let centroids: Vec<DVec3> = (0..count).map(|f| mesh.face_centroid(f)).collect();
    let normals: Vec<DVec3> = (0..count).map(|f| mesh.face_normal(f)).collect();
    let diagonal = mesh
        .bounding_box()
        .map_or(0.0, |(lo, hi)| lo.distance(hi));
    let limit = if max_fraction > 0.0 {
        diagonal * max_fraction
    } else {
        f64::INFINITY
    };

    let mut partner: Vec<Option<usize>> = vec![None; count];
    for f in 0..count {
        if partner[f].is_some() {
            continue;
        }
        let best = (f + 1..count)
            .filter(|&g| partner[g].is_none() && mesh.face(g).len() == mesh.face(f).len())
            .filter(|&g| normals[f].dot(normals[g]) < -1.0 + tolerance + EPSILON)
            .filter(|&g| (centroids[g] - centroids[f]).dot(normals[f]) > EPSILON)
            .map(|g| (g, centroids[f].distance(centroids[g])))
            .filter(|&(_, d)| d <= limit)
            .min_by(|x, y| x.1.total_cmp(&y.1));
        if let Some((g, _)) = best {
            partner[f] = Some(g);
            partner[g] = Some(f);
        }
    }

    let mut b = builder_with_vertices(mesh);
    for f in 0..count {
        match partner[f] {
            None => b.face(mesh.face(f).to_vec(), mesh.face_roles()[f], &mesh.face_tags()[f]),
            Some(g) if f < g => bridge(&mut b, mesh, f, g),
            Some(_) => {}
        }
    }
    b.build()
}

/// Replaces faces `f` and `g` with a tube of quads.
fn bridge(b: &mut MeshBuilder, mesh: &PolyMesh, f: usize, g: usize) {
    let (fa, fb) = (mesh.face(f), mesh.face(g));
    let n = fa.len();
    let pos = |v: usize| mesh.vertices()[v];
    // `g` runs the other way round; pair a[k] with fb[(o - k) mod n].
    let paired = |o: usize, k: usize| fb[(o + n - k % n) % n];
    let offset = (0..n)
        .min_by(|&x, &y| {
            let cost = |o: usize| -> f64 {
                (0..n).map(|k| pos(fa[k]).distance(pos(paired(o, k)))).sum()
            };
            cost(x).total_cmp(&cost(y))
        })
        .unwrap_or(0);
    let tags = &mesh.face_tags()[f];
    for k in 0..n {
        let k1 = (k + 1) % n;
        let quad = vec![fa[k], fa[k1], paired(offset, k1), paired(offset, k)];
        b.face(quad, Roles::NewAlt, tags);
    }
}

// =============================================================================
// LAYERS
// =============================================================================

/// Appends a scaled, offset copy of each selected face.
fn layer(mesh: &PolyMesh, mask: &[bool], amounts: &[f64], scale: f64) -> PolyMesh {
    let mut b = builder_with_vertices(mesh);
    for f in 0..mesh.face_count() {
        b.face(mesh.face(f).to_vec(), mesh.face_roles()[f], &mesh.face_tags()[f]);
    }
    for f in (0..mesh.face_count()).filter(|&f| mask[f]) {
        let frame = Frame::of(mesh, f);
        let loop_ = mesh
            .face(f)
            .iter()
            .map(|&v| {
                let p = frame.centroid
                    + (mesh.vertices()[v] - frame.centroid) * (1.0 + scale)
                    + frame.normal * amounts[f];
                b.push_vertex(p, Roles::New)
            })
            .collect();
        b.face(loop_, Roles::New, &mesh.face_tags()[f]);
    }
    b.build()
}

/// Stacks shrinking rings on each selected face.
///
/// Ring `l` is scaled by `ratio^l` about the centroid and raised by the sum
/// of `step · ratio^i` for `i ≤ l`. Rings stop below [`STACK_MIN_SCALE`] or
/// at [`STACK_MAX_LAYERS`]; there is always at least one.
fn stack(mesh: &PolyMesh, mask: &[bool], step: f64, ratio: f64) -> PolyMesh {
    let mut rings = vec![(1.0, 0.0)];
    let mut height = 0.0;
    for l in 1..=STACK_MAX_LAYERS {
        let scale = ratio.powi(l as i32);
        if l > 1 && scale.abs() < STACK_MIN_SCALE {
            break;
        }
        height += step * scale;
        rings.push((scale, height));
    }

    let mut b = builder_with_vertices(mesh);
    for f in 0..mesh.face_count() {
        if !mask[f] {
            pass_through(&mut b, mesh, f);
            continue;
        }
        let frame = Frame::of(mesh, f);
        let face = mesh.face(f);
        let tags = &mesh.face_tags()[f];
        let mut below = face.to_vec();
        for (l, &(scale, height)) in rings.iter().enumerate().skip(1) {
            let ring: Vec<usize> = face
                .iter()
                .map(|&v| {
                    b.vertex(Key::Ring(f, v, l), Roles::New, || {
                        frame.centroid
                            + (mesh.vertices()[v] - frame.centroid) * scale
                            + frame.normal * height
                    })
                })
                .collect();
            let n = face.len();
            for k in 0..n {
                let k1 = (k + 1) % n;
                b.face(vec![below[k], below[k1], ring[k1], ring[k]], Roles::NewAlt, tags);
            }
            below = ring;
        }
        b.face(below, Roles::Existing, tags);
    }
    b.build()
}
