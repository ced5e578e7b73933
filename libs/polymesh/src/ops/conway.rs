//! Conway-notation operators.
//!
//! Every operator here is a pure rewrite through [`MeshBuilder`]: output
//! vertices are keyed by the input element they come from, so faces built
//! independently share vertices. Unless noted, an operator that keeps the
//! input vertices inserts them first, so input vertex `i` stays index `i`.
//!
//! Notation used below for a half-edge `h = a→b` in face `f` whose twin lies
//! in face `g`: `O` is the centre of `f`, `m(a,b)` the edge midpoint.

use super::Invocation;
use crate::error::{PolyError, PolyResult};
use crate::mesh::builder::{Key, MeshBuilder};
use crate::mesh::{HalfEdge, PolyMesh, Roles, Topology};
use crate::registry::Operator;
use glam::DVec3;
use std::collections::BTreeSet;

// =============================================================================
// SOURCE MESH VIEW
// =============================================================================

/// Input mesh plus the derived data every operator needs.
pub(super) struct Source<'m> {
    pub(super) mesh: &'m PolyMesh,
    pub(super) topo: Topology,
    centroids: Vec<DVec3>,
    normals: Vec<DVec3>,
}

impl<'m> Source<'m> {
    pub(super) fn new(mesh: &'m PolyMesh) -> Self {
        let faces = 0..mesh.face_count();
        Self {
            mesh,
            topo: mesh.topology(),
            centroids: faces.clone().map(|f| mesh.face_centroid(f)).collect(),
            normals: faces.map(|f| mesh.face_normal(f)).collect(),
        }
    }

    fn face_count(&self) -> usize {
        self.mesh.face_count()
    }

    fn pos(&self, v: usize) -> DVec3 {
        self.mesh.vertices()[v]
    }

    fn he(&self, h: usize) -> &HalfEdge {
        self.topo.half_edge(h)
    }

    fn tags(&self, f: usize) -> &BTreeSet<String> {
        &self.mesh.face_tags()[f]
    }

    fn centroid(&self, f: usize) -> DVec3 {
        self.centroids[f]
    }

    fn lifted(&self, f: usize, lift: f64) -> DVec3 {
        self.centroids[f] + self.normals[f] * lift
    }

    fn mid(&self, a: usize, b: usize) -> DVec3 {
        self.pos(a).lerp(self.pos(b), 0.5)
    }

    /// Average normal of the faces on either side of `h`.
    fn edge_normal(&self, h: usize) -> DVec3 {
        let he = self.he(h);
        let mut n = self.normals[he.face];
        if let Some(t) = he.twin {
            n += self.normals[self.he(t).face];
        }
        n.normalize_or_zero()
    }

    fn require_closed(&self, op: Operator) -> PolyResult<()> {
        if self.topo.is_closed() {
            Ok(())
        } else {
            Err(PolyError::invalid_for_mesh(op, "mesh has open boundary edges"))
        }
    }

    /// Inserts every input vertex under `Key::V`, preserving indices.
    fn keep_vertices(&self, b: &mut MeshBuilder) {
        for (v, &p) in self.mesh.vertices().iter().enumerate() {
            b.vertex(Key::V(v), Roles::Existing, || p);
        }
    }

    /// Copies face `f` unchanged. Requires [`Source::keep_vertices`].
    fn pass_through(&self, b: &mut MeshBuilder, f: usize) {
        b.face(self.mesh.face(f).to_vec(), Roles::Ignored, self.tags(f));
    }

    /// Tags of the first face around a fan.
    fn fan_tags(&self, fan: &[usize]) -> &BTreeSet<String> {
        self.tags(fan.first().map_or(0, |&h| self.he(h).face))
    }
}

// -----------------------------------------------------------------------------
// Shared vertex constructors
// -----------------------------------------------------------------------------

fn center(b: &mut MeshBuilder, src: &Source, f: usize, lift: f64) -> usize {
    b.vertex(Key::F(f), Roles::New, || src.lifted(f, lift))
}

fn midpoint(b: &mut MeshBuilder, src: &Source, a: usize, c: usize) -> usize {
    b.vertex(Key::edge(a, c), Roles::NewAlt, || src.mid(a, c))
}

/// Point on edge `a-toward` at fraction `t` from `a`.
fn cut(b: &mut MeshBuilder, src: &Source, a: usize, toward: usize, t: f64) -> usize {
    b.vertex(Key::Dir(a, toward), Roles::NewAlt, || {
        src.pos(a) + (src.pos(toward) - src.pos(a)) * t
    })
}

/// Corner of face `f` at `v`, moved toward the centre by `t` and lifted.
fn corner_inset(b: &mut MeshBuilder, src: &Source, f: usize, v: usize, t: f64, lift: f64) -> usize {
    b.vertex(Key::Corner(f, v), Roles::Existing, || {
        src.pos(v).lerp(src.centroid(f), t) + src.normals[f] * lift
    })
}

/// Midpoint of half-edge `h`, moved toward its face centre by `t` and lifted.
fn edge_inset(b: &mut MeshBuilder, src: &Source, h: usize, t: f64, lift: f64) -> usize {
    let he = *src.he(h);
    b.vertex(Key::H(h), Roles::NewAlt, || {
        src.mid(he.from, he.to).lerp(src.centroid(he.face), t) + src.normals[he.face] * lift
    })
}

// =============================================================================
// DISPATCH
// =============================================================================

pub(super) fn apply(mesh: &PolyMesh, inv: &Invocation) -> PolyResult<PolyMesh> {
    use Operator::*;
    let faces = mesh.face_count();
    let (a, a2) = (inv.amount, inv.amount2);
    let out = match inv.op {
        Identity => mesh.clone(),
        Kis => kis(mesh, &inv.face_mask(mesh), &inv.amounts(faces)),
        Dual => dual(mesh, Dual)?,
        Ambo => ambo(mesh),
        Zip => zip(mesh, &inv.face_mask(mesh), &inv.amounts(faces)),
        Expand => expand(mesh, a),
        Bevel => bevel(mesh, &inv.amounts(faces), a2),
        Join => join(mesh, a),
        Needle => needle(mesh, &inv.face_mask(mesh), &inv.amounts(faces)),
        Ortho => ortho(mesh, &inv.amounts(faces)),
        Meta => meta(mesh, &inv.amounts(faces), a2),
        Truncate => truncate(mesh, &inv.vertex_mask(mesh), &inv.amounts(mesh.vertex_count())),
        Gyro => gyro(mesh, a, a2),
        // Snub's amount spans (0, 1); gyro's edge cut spans (0, 1/2).
        Snub => dual(&gyro(mesh, a * 2.0 / 3.0, 0.0), Snub)?,
        Subdivide => subdivide(mesh, a),
        Loft => loft(mesh, &inv.face_mask(mesh), &inv.amounts(faces), a2),
        Chamfer => chamfer(mesh, a),
        Quinto => quinto(mesh, &inv.amounts(faces), a2),
        Lace => lace(mesh, &inv.face_mask(mesh), &inv.amounts(faces), a2),
        JoinedLace => joined_lace(mesh, &inv.amounts(faces), a2, false),
        OppositeLace => opposite_lace(mesh, &inv.amounts(faces), a2),
        JoinKisKis => joined_lace(mesh, &vec![a; faces], a2, true),
        Stake => stake(mesh, &inv.face_mask(mesh), a),
        JoinStake => join_stake(mesh, a),
        Medial => medial(mesh, a, a2, false),
        EdgeMedial => medial(mesh, a, a2, true),
        Propeller => propeller(mesh, a),
        Whirl => whirl(mesh, a),
        Volute => dual(&whirl(mesh, a), Volute)?,
        Exalt => {
            let once = needle(mesh, &inv.face_mask(mesh), &inv.amounts(faces));
            needle(&once, &touched(&once), &inv.amounts(once.face_count()))
        }
        Yank => {
            let once = zip(mesh, &inv.face_mask(mesh), &inv.amounts(faces));
            zip(&once, &touched(&once), &inv.amounts(once.face_count()))
        }
        Cross => cross(mesh, &inv.amounts(faces)),
        Squall => squall(mesh, a, true),
        JoinSquall => squall(mesh, a, false),
        other => {
            return Err(PolyError::invalid_for_mesh(
                other,
                "not a Conway operator",
            ))
        }
    };
    Ok(out)
}

// =============================================================================
// PYRAMIDS AND DUALS
// =============================================================================

/// Raises a pyramid over each selected face: triangles `[a, b, apex]`.
pub(super) fn kis(mesh: &PolyMesh, mask: &[bool], amounts: &[f64]) -> PolyMesh {
    let src = Source::new(mesh);
    let mut b = MeshBuilder::new();
    src.keep_vertices(&mut b);
    for f in 0..src.face_count() {
        if !mask[f] {
            src.pass_through(&mut b, f);
            continue;
        }
        let apex = center(&mut b, &src, f, amounts[f]);
        for h in src.topo.face_half_edges(f) {
            let he = src.he(h);
            b.face(vec![he.from, he.to, apex], Roles::Existing, src.tags(f));
        }
    }
    b.build()
}

/// Face centres become vertices; each vertex fan becomes a face.
///
/// Dual vertex `i` is the centroid of input face `i`.
pub(super) fn dual(mesh: &PolyMesh, op: Operator) -> PolyResult<PolyMesh> {
    let src = Source::new(mesh);
    src.require_closed(op)?;
    let mut b = MeshBuilder::new();
    for f in 0..src.face_count() {
        b.vertex(Key::F(f), Roles::Existing, || src.centroid(f));
    }
    for v in 0..mesh.vertex_count() {
        let fan = src.topo.vertex_fan(v);
        let loop_ = fan.half_edges.iter().map(|&h| src.he(h).face).collect();
        b.face(loop_, Roles::New, src.fan_tags(&fan.half_edges));
    }
    Ok(b.build())
}

/// Edge midpoints become vertices; faces shrink and vertices become faces.
fn ambo(mesh: &PolyMesh) -> PolyMesh {
    let src = Source::new(mesh);
    let mut b = MeshBuilder::new();
    for f in 0..src.face_count() {
        let loop_ = src
            .topo
            .face_half_edges(f)
            .map(|h| {
                let he = *src.he(h);
                midpoint(&mut b, &src, he.from, he.to)
            })
            .collect();
        b.face(loop_, Roles::Existing, src.tags(f));
    }
    vertex_figures(&mut b, &src, |b, src, v, h| {
        vec![midpoint(b, src, v, src.he(h).to)]
    });
    b.build()
}

/// Emits one face per closed vertex fan, concatenating `points` per fan
/// half-edge.
fn vertex_figures(
    b: &mut MeshBuilder,
    src: &Source,
    mut points: impl FnMut(&mut MeshBuilder, &Source, usize, usize) -> Vec<usize>,
) {
    for v in 0..src.mesh.vertex_count() {
        let fan = src.topo.vertex_fan(v);
        if !fan.closed {
            continue;
        }
        let loop_ = fan
            .half_edges
            .iter()
            .flat_map(|&h| points(b, src, v, h))
            .collect();
        b.face(loop_, Roles::New, src.fan_tags(&fan.half_edges));
    }
}

/// Dual of kis: one vertex per half-edge, pulled toward its face centre.
///
/// Unselected faces collapse to their centre, which takes the place of the
/// face's corner pair in every vertex figure around it. Figures that meet no
/// selected face keep role `Ignored`.
fn zip(mesh: &PolyMesh, mask: &[bool], amounts: &[f64]) -> PolyMesh {
    let src = Source::new(mesh);
    let mut b = MeshBuilder::new();
    let point = |b: &mut MeshBuilder, h: usize| {
        let f = src.he(h).face;
        edge_inset(b, &src, h, amounts[f], 0.0)
    };
    for f in (0..src.face_count()).filter(|&f| mask[f]) {
        let loop_ = src.topo.face_half_edges(f).map(|h| point(&mut b, h)).collect();
        b.face(loop_, Roles::Existing, src.tags(f));
    }
    for v in 0..mesh.vertex_count() {
        let fan = src.topo.vertex_fan(v);
        if !fan.closed {
            continue;
        }
        let mut touched = false;
        let mut loop_ = Vec::with_capacity(fan.half_edges.len() * 2);
        for &h in &fan.half_edges {
            let f = src.he(h).face;
            if mask[f] {
                touched = true;
                loop_.push(point(&mut b, h));
                loop_.push(point(&mut b, src.he(h).prev));
            } else {
                loop_.push(center(&mut b, &src, f, 0.0));
            }
        }
        let role = if touched { Roles::New } else { Roles::Ignored };
        b.face(loop_, role, src.fan_tags(&fan.half_edges));
    }
    b.build()
}

/// Clips each selected vertex at fraction `amount` along its edges.
pub(super) fn truncate(mesh: &PolyMesh, mask: &[bool], amounts: &[f64]) -> PolyMesh {
    let src = Source::new(mesh);
    let mut b = MeshBuilder::new();
    for f in 0..src.face_count() {
        let face = mesh.face(f);
        let n = face.len();
        let mut loop_ = Vec::with_capacity(n * 2);
        for k in 0..n {
            let a = face[k];
            if mask[a] {
                loop_.push(cut(&mut b, &src, a, face[(k + n - 1) % n], amounts[a]));
                loop_.push(cut(&mut b, &src, a, face[(k + 1) % n], amounts[a]));
            } else {
                loop_.push(b.vertex(Key::V(a), Roles::Existing, || src.pos(a)));
            }
        }
        b.face(loop_, Roles::Existing, src.tags(f));
    }
    for v in (0..mesh.vertex_count()).filter(|&v| mask[v]) {
        let fan = src.topo.vertex_fan(v);
        if !fan.closed {
            continue;
        }
        let loop_ = fan
            .half_edges
            .iter()
            .map(|&h| cut(&mut b, &src, v, src.he(h).to, amounts[v]))
            .collect();
        b.face(loop_, Roles::New, src.fan_tags(&fan.half_edges));
    }
    b.build()
}

// =============================================================================
// EXPANSIONS
// =============================================================================

fn expand(mesh: &PolyMesh, amount: f64) -> PolyMesh {
    let src = Source::new(mesh);
    let mut b = MeshBuilder::new();
    for f in 0..src.face_count() {
        let loop_ = mesh
            .face(f)
            .iter()
            .map(|&v| corner_inset(&mut b, &src, f, v, amount, 0.0))
            .collect();
        b.face(loop_, Roles::Existing, src.tags(f));
    }
    vertex_figures(&mut b, &src, |b, src, v, h| {
        vec![corner_inset(b, src, src.he(h).face, v, amount, 0.0)]
    });
    for edge in src.topo.edges() {
        let Some(t) = edge.twin else { continue };
        let (f, g) = (src.he(edge.half_edge).face, src.he(t).face);
        let (a, c) = (edge.a, edge.b);
        let quad = vec![
            corner_inset(&mut b, &src, f, c, amount, 0.0),
            corner_inset(&mut b, &src, f, a, amount, 0.0),
            corner_inset(&mut b, &src, g, a, amount, 0.0),
            corner_inset(&mut b, &src, g, c, amount, 0.0),
        ];
        b.face(quad, Roles::NewAlt, src.tags(f));
    }
    b.build()
}

/// Truncated ambo: every corner splits into two points along its edges.
fn bevel(mesh: &PolyMesh, amounts: &[f64], inset: f64) -> PolyMesh {
    let src = Source::new(mesh);
    let mut b = MeshBuilder::new();
    let point = |b: &mut MeshBuilder, f: usize, a: usize, toward: usize| {
        b.vertex(Key::CornerDir(f, a, toward), Roles::Existing, || {
            src.pos(a).lerp(src.centroid(f), inset) + (src.pos(toward) - src.pos(a)) * amounts[f]
        })
    };
    for f in 0..src.face_count() {
        let face = mesh.face(f);
        let n = face.len();
        let mut loop_ = Vec::with_capacity(n * 2);
        for k in 0..n {
            let a = face[k];
            loop_.push(point(&mut b, f, a, face[(k + n - 1) % n]));
            loop_.push(point(&mut b, f, a, face[(k + 1) % n]));
        }
        b.face(loop_, Roles::Existing, src.tags(f));
    }
    vertex_figures(&mut b, &src, |b, src, v, h| {
        let he = src.he(h);
        let w = src.he(he.prev).from;
        vec![point(b, he.face, v, he.to), point(b, he.face, v, w)]
    });
    for edge in src.topo.edges() {
        let Some(t) = edge.twin else { continue };
        let (f, g) = (src.he(edge.half_edge).face, src.he(t).face);
        let (a, c) = (edge.a, edge.b);
        let quad = vec![
            point(&mut b, f, c, a),
            point(&mut b, f, a, c),
            point(&mut b, g, a, c),
            point(&mut b, g, c, a),
        ];
        b.face(quad, Roles::NewAlt, src.tags(f));
    }
    b.build()
}

// =============================================================================
// EDGE-CENTRED OPERATORS
// =============================================================================

/// Dual of ambo: one rhombus `[a, O_g, b, O_f]` per edge.
fn join(mesh: &PolyMesh, amount: f64) -> PolyMesh {
    let src = Source::new(mesh);
    let mut b = MeshBuilder::new();
    src.keep_vertices(&mut b);
    for edge in src.topo.edges() {
        let f = src.he(edge.half_edge).face;
        let of = center(&mut b, &src, f, amount);
        let loop_ = match edge.twin {
            Some(t) => {
                let og = center(&mut b, &src, src.he(t).face, amount);
                vec![edge.a, og, edge.b, of]
            }
            None => vec![edge.a, edge.b, of],
        };
        b.face(loop_, Roles::NewAlt, src.tags(f));
    }
    b.build()
}

/// Dual of truncate: one triangle `[a, O_g, O_f]` per half-edge.
///
/// Only edges between two selected faces are flipped; a selected face next
/// to an unselected one keeps that edge, as kis would.
fn needle(mesh: &PolyMesh, mask: &[bool], amounts: &[f64]) -> PolyMesh {
    let src = Source::new(mesh);
    let mut b = MeshBuilder::new();
    src.keep_vertices(&mut b);
    for f in 0..src.face_count() {
        if !mask[f] {
            src.pass_through(&mut b, f);
            continue;
        }
        let of = center(&mut b, &src, f, amounts[f]);
        for h in src.topo.face_half_edges(f) {
            let he = *src.he(h);
            let across = he.twin.map(|t| src.he(t).face).filter(|&g| mask[g]);
            let loop_ = match across {
                Some(g) => vec![he.from, center(&mut b, &src, g, amounts[g]), of],
                None => vec![he.from, he.to, of],
            };
            b.face(loop_, Roles::NewAlt, src.tags(f));
        }
    }
    b.build()
}

/// Faces an earlier pass of the same operator touched.
fn touched(mesh: &PolyMesh) -> Vec<bool> {
    mesh.face_roles().iter().map(|&r| r != Roles::Ignored).collect()
}

/// Join of join: one quad `[a, m(a,n), O, m(p,a)]` per corner.
fn ortho(mesh: &PolyMesh, amounts: &[f64]) -> PolyMesh {
    let src = Source::new(mesh);
    let mut b = MeshBuilder::new();
    src.keep_vertices(&mut b);
    for f in 0..src.face_count() {
        let o = center(&mut b, &src, f, amounts[f]);
        for h in src.topo.face_half_edges(f) {
            let he = *src.he(h);
            let p = src.he(he.prev).from;
            let next = midpoint(&mut b, &src, he.from, he.to);
            let prev = midpoint(&mut b, &src, p, he.from);
            b.face(vec![he.from, next, o, prev], Roles::Existing, src.tags(f));
        }
    }
    b.build()
}

/// Kis of join: triangles `[a, m, O]` and `[m, b, O]` per half-edge.
///
/// `lift` pushes the edge points along the averaged edge normal.
fn meta(mesh: &PolyMesh, amounts: &[f64], lift: f64) -> PolyMesh {
    let src = Source::new(mesh);
    let mut b = MeshBuilder::new();
    src.keep_vertices(&mut b);
    for f in 0..src.face_count() {
        let o = center(&mut b, &src, f, amounts[f]);
        for h in src.topo.face_half_edges(f) {
            let he = *src.he(h);
            let m = b.vertex(Key::edge(he.from, he.to), Roles::NewAlt, || {
                src.mid(he.from, he.to) + src.edge_normal(h) * lift
            });
            b.face(vec![he.from, m, o], Roles::Existing, src.tags(f));
            b.face(vec![m, he.to, o], Roles::Existing, src.tags(f));
        }
    }
    b.build()
}

/// Ambo vertex figures plus one triangle `[m(p,a), m(a,n), O]` per corner.
fn subdivide(mesh: &PolyMesh, amount: f64) -> PolyMesh {
    let src = Source::new(mesh);
    let mut b = MeshBuilder::new();
    vertex_figures(&mut b, &src, |b, src, v, h| {
        vec![midpoint(b, src, v, src.he(h).to)]
    });
    for f in 0..src.face_count() {
        let o = center(&mut b, &src, f, amount);
        for h in src.topo.face_half_edges(f) {
            let he = *src.he(h);
            let p = src.he(he.prev).from;
            let prev = midpoint(&mut b, &src, p, he.from);
            let next = midpoint(&mut b, &src, he.from, he.to);
            b.face(vec![prev, next, o], Roles::Existing, src.tags(f));
        }
    }
    b.build()
}

// =============================================================================
// TWISTED OPERATORS
// =============================================================================

/// One pentagon `[P(p,a), P(a,p), a, P(a,n), O]` per corner.
pub(super) fn gyro(mesh: &PolyMesh, amount: f64, lift: f64) -> PolyMesh {
    let src = Source::new(mesh);
    let mut b = MeshBuilder::new();
    src.keep_vertices(&mut b);
    for f in 0..src.face_count() {
        let o = center(&mut b, &src, f, lift);
        for h in src.topo.face_half_edges(f) {
            let he = *src.he(h);
            let (a, n) = (he.from, he.to);
            let p = src.he(he.prev).from;
            let loop_ = vec![
                cut(&mut b, &src, p, a, amount),
                cut(&mut b, &src, a, p, amount),
                a,
                cut(&mut b, &src, a, n, amount),
                o,
            ];
            b.face(loop_, Roles::Existing, src.tags(f));
        }
    }
    b.build()
}

/// Inner face of near points plus one quad per half-edge.
fn propeller(mesh: &PolyMesh, amount: f64) -> PolyMesh {
    let src = Source::new(mesh);
    let mut b = MeshBuilder::new();
    src.keep_vertices(&mut b);
    for f in 0..src.face_count() {
        let inner = src
            .topo
            .face_half_edges(f)
            .map(|h| {
                let he = *src.he(h);
                cut(&mut b, &src, he.from, he.to, amount)
            })
            .collect();
        b.face(inner, Roles::Existing, src.tags(f));
        for h in src.topo.face_half_edges(f) {
            let he = *src.he(h);
            let c = src.he(he.next).to;
            let quad = vec![
                cut(&mut b, &src, he.from, he.to, amount),
                cut(&mut b, &src, he.to, he.from, amount),
                he.to,
                cut(&mut b, &src, he.to, c, amount),
            ];
            b.face(quad, Roles::NewAlt, src.tags(f));
        }
    }
    b.build()
}

/// Hexagon per half-edge around a rotated inner face.
fn whirl(mesh: &PolyMesh, amount: f64) -> PolyMesh {
    let src = Source::new(mesh);
    let mut b = MeshBuilder::new();
    src.keep_vertices(&mut b);
    let inner = |b: &mut MeshBuilder, h: usize| {
        let he = *src.he(h);
        let p = cut(b, &src, he.from, he.to, amount);
        let near = b.position(p);
        b.vertex(Key::H(h), Roles::New, || near.lerp(src.centroid(he.face), 0.5))
    };
    for f in 0..src.face_count() {
        let loop_ = src.topo.face_half_edges(f).map(|h| inner(&mut b, h)).collect();
        b.face(loop_, Roles::Existing, src.tags(f));
        for h in src.topo.face_half_edges(f) {
            let he = *src.he(h);
            let c = src.he(he.next).to;
            let hex = vec![
                cut(&mut b, &src, he.from, he.to, amount),
                cut(&mut b, &src, he.to, he.from, amount),
                he.to,
                cut(&mut b, &src, he.to, c, amount),
                inner(&mut b, he.next),
                inner(&mut b, h),
            ];
            b.face(hex, Roles::NewAlt, src.tags(f));
        }
    }
    b.build()
}

// =============================================================================
// INSET FAMILIES
// =============================================================================

/// Inset each selected face and bridge it with side quads.
pub(super) fn loft(mesh: &PolyMesh, mask: &[bool], amounts: &[f64], lift: f64) -> PolyMesh {
    let src = Source::new(mesh);
    let mut b = MeshBuilder::new();
    src.keep_vertices(&mut b);
    for f in 0..src.face_count() {
        if !mask[f] {
            src.pass_through(&mut b, f);
            continue;
        }
        let t = amounts[f];
        for h in src.topo.face_half_edges(f) {
            let he = *src.he(h);
            let ib = corner_inset(&mut b, &src, f, he.to, t, lift);
            let ia = corner_inset(&mut b, &src, f, he.from, t, lift);
            b.face(vec![he.from, he.to, ib, ia], Roles::NewAlt, src.tags(f));
        }
        let inner = mesh
            .face(f)
            .iter()
            .map(|&v| corner_inset(&mut b, &src, f, v, t, lift))
            .collect();
        b.face(inner, Roles::Existing, src.tags(f));
    }
    b.build()
}

/// Original vertices stay; edges widen into hexagons between inset faces.
fn chamfer(mesh: &PolyMesh, amount: f64) -> PolyMesh {
    let src = Source::new(mesh);
    let mut b = MeshBuilder::new();
    src.keep_vertices(&mut b);
    for f in 0..src.face_count() {
        let inner = mesh
            .face(f)
            .iter()
            .map(|&v| corner_inset(&mut b, &src, f, v, amount, 0.0))
            .collect();
        b.face(inner, Roles::Existing, src.tags(f));
    }
    for edge in src.topo.edges() {
        let f = src.he(edge.half_edge).face;
        let (a, c) = (edge.a, edge.b);
        let mut loop_ = vec![
            corner_inset(&mut b, &src, f, c, amount, 0.0),
            corner_inset(&mut b, &src, f, a, amount, 0.0),
            a,
        ];
        if let Some(t) = edge.twin {
            let g = src.he(t).face;
            loop_.push(corner_inset(&mut b, &src, g, a, amount, 0.0));
            loop_.push(corner_inset(&mut b, &src, g, c, amount, 0.0));
        }
        loop_.push(c);
        b.face(loop_, Roles::NewAlt, src.tags(f));
    }
    b.build()
}

/// Pentagon per corner around an inner face of edge insets.
fn quinto(mesh: &PolyMesh, amounts: &[f64], lift: f64) -> PolyMesh {
    let src = Source::new(mesh);
    let mut b = MeshBuilder::new();
    src.keep_vertices(&mut b);
    for f in 0..src.face_count() {
        let t = amounts[f];
        let inner = src
            .topo
            .face_half_edges(f)
            .map(|h| edge_inset(&mut b, &src, h, t, lift))
            .collect();
        b.face(inner, Roles::Existing, src.tags(f));
        for h in src.topo.face_half_edges(f) {
            let he = *src.he(h);
            let p = src.he(he.prev).from;
            let loop_ = vec![
                he.from,
                midpoint(&mut b, &src, he.from, he.to),
                edge_inset(&mut b, &src, h, t, lift),
                edge_inset(&mut b, &src, he.prev, t, lift),
                midpoint(&mut b, &src, p, he.from),
            ];
            b.face(loop_, Roles::New, src.tags(f));
        }
    }
    b.build()
}

/// Inner face plus two triangles per half-edge.
fn lace(mesh: &PolyMesh, mask: &[bool], amounts: &[f64], lift: f64) -> PolyMesh {
    let src = Source::new(mesh);
    let mut b = MeshBuilder::new();
    src.keep_vertices(&mut b);
    for f in 0..src.face_count() {
        if !mask[f] {
            src.pass_through(&mut b, f);
            continue;
        }
        let t = amounts[f];
        let inner = src
            .topo
            .face_half_edges(f)
            .map(|h| edge_inset(&mut b, &src, h, t, lift))
            .collect();
        b.face(inner, Roles::Existing, src.tags(f));
        for h in src.topo.face_half_edges(f) {
            let he = *src.he(h);
            let ih = edge_inset(&mut b, &src, h, t, lift);
            let inext = edge_inset(&mut b, &src, he.next, t, lift);
            b.face(vec![he.from, he.to, ih], Roles::NewAlt, src.tags(f));
            b.face(vec![he.to, inext, ih], Roles::New, src.tags(f));
        }
    }
    b.build()
}

/// Loft with each side quad split along `a–I(f,b)`.
fn opposite_lace(mesh: &PolyMesh, amounts: &[f64], lift: f64) -> PolyMesh {
    let src = Source::new(mesh);
    let mut b = MeshBuilder::new();
    src.keep_vertices(&mut b);
    for f in 0..src.face_count() {
        let t = amounts[f];
        for h in src.topo.face_half_edges(f) {
            let he = *src.he(h);
            let ib = corner_inset(&mut b, &src, f, he.to, t, lift);
            let ia = corner_inset(&mut b, &src, f, he.from, t, lift);
            b.face(vec![he.from, he.to, ib], Roles::NewAlt, src.tags(f));
            b.face(vec![he.from, ib, ia], Roles::New, src.tags(f));
        }
        let inner = mesh
            .face(f)
            .iter()
            .map(|&v| corner_inset(&mut b, &src, f, v, t, lift))
            .collect();
        b.face(inner, Roles::Existing, src.tags(f));
    }
    b.build()
}

/// Lace whose edge triangles are joined across edges into quads.
///
/// With `kis_inner` the inner face is replaced by a fan to its centre.
fn joined_lace(mesh: &PolyMesh, amounts: &[f64], lift: f64, kis_inner: bool) -> PolyMesh {
    let src = Source::new(mesh);
    let mut b = MeshBuilder::new();
    src.keep_vertices(&mut b);
    for f in 0..src.face_count() {
        let t = amounts[f];
        let inner: Vec<usize> = src
            .topo
            .face_half_edges(f)
            .map(|h| edge_inset(&mut b, &src, h, t, lift))
            .collect();
        if kis_inner {
            let o = center(&mut b, &src, f, lift);
            for k in 0..inner.len() {
                let loop_ = vec![inner[k], inner[(k + 1) % inner.len()], o];
                b.face(loop_, Roles::Existing, src.tags(f));
            }
        } else {
            b.face(inner, Roles::Existing, src.tags(f));
        }
        for h in src.topo.face_half_edges(f) {
            let he = *src.he(h);
            let ih = edge_inset(&mut b, &src, h, t, lift);
            let inext = edge_inset(&mut b, &src, he.next, t, lift);
            b.face(vec![he.to, inext, ih], Roles::New, src.tags(f));
        }
    }
    for edge in src.topo.edges() {
        let h = edge.half_edge;
        let f = src.he(h).face;
        let ih = edge_inset(&mut b, &src, h, amounts[f], lift);
        let loop_ = match edge.twin {
            Some(t) => {
                let g = src.he(t).face;
                let it = edge_inset(&mut b, &src, t, amounts[g], lift);
                vec![edge.a, it, edge.b, ih]
            }
            None => vec![edge.a, edge.b, ih],
        };
        b.face(loop_, Roles::NewAlt, src.tags(f));
    }
    b.build()
}

/// Loft quads around a fan to the face centre.
fn stake(mesh: &PolyMesh, mask: &[bool], amount: f64) -> PolyMesh {
    let src = Source::new(mesh);
    let mut b = MeshBuilder::new();
    src.keep_vertices(&mut b);
    for f in 0..src.face_count() {
        if !mask[f] {
            src.pass_through(&mut b, f);
            continue;
        }
        let o = center(&mut b, &src, f, 0.0);
        for h in src.topo.face_half_edges(f) {
            let he = *src.he(h);
            let ib = corner_inset(&mut b, &src, f, he.to, amount, 0.0);
            let ia = corner_inset(&mut b, &src, f, he.from, amount, 0.0);
            b.face(vec![he.from, he.to, ib, ia], Roles::NewAlt, src.tags(f));
            b.face(vec![ia, ib, o], Roles::Existing, src.tags(f));
        }
    }
    b.build()
}

/// Chamfer hexagons around a fan to each face centre.
fn join_stake(mesh: &PolyMesh, amount: f64) -> PolyMesh {
    let src = Source::new(mesh);
    let mut b = MeshBuilder::new();
    src.keep_vertices(&mut b);
    for f in 0..src.face_count() {
        let o = center(&mut b, &src, f, 0.0);
        for h in src.topo.face_half_edges(f) {
            let he = *src.he(h);
            let ia = corner_inset(&mut b, &src, f, he.from, amount, 0.0);
            let ib = corner_inset(&mut b, &src, f, he.to, amount, 0.0);
            b.face(vec![ia, ib, o], Roles::Existing, src.tags(f));
        }
    }
    for edge in src.topo.edges() {
        let f = src.he(edge.half_edge).face;
        let (a, c) = (edge.a, edge.b);
        let mut loop_ = vec![a];
        if let Some(t) = edge.twin {
            let g = src.he(t).face;
            loop_.push(corner_inset(&mut b, &src, g, a, amount, 0.0));
            loop_.push(corner_inset(&mut b, &src, g, c, amount, 0.0));
        }
        loop_.push(c);
        loop_.push(corner_inset(&mut b, &src, f, c, amount, 0.0));
        loop_.push(corner_inset(&mut b, &src, f, a, amount, 0.0));
        b.face(loop_, Roles::NewAlt, src.tags(f));
    }
    b.build()
}

/// Divides each edge into `round(amount) + 1` segments and fans each face
/// to its centre.
///
/// Medial keeps a quad at every corner; EdgeMedial fans every segment.
fn medial(mesh: &PolyMesh, amount: f64, lift: f64, every_segment: bool) -> PolyMesh {
    let divisions = amount.round().max(1.0) as usize;
    let src = Source::new(mesh);
    let mut b = MeshBuilder::new();
    src.keep_vertices(&mut b);

    // j-th interior point from `a` on edge a-c, 1-based.
    let point = |b: &mut MeshBuilder, a: usize, c: usize, j: usize| {
        let (lo, hi) = (a.min(c), a.max(c));
        let k = if a == lo { j } else { divisions + 1 - j };
        b.vertex(Key::EdgeDiv(lo, hi, k), Roles::NewAlt, || {
            src.pos(lo).lerp(src.pos(hi), k as f64 / (divisions + 1) as f64)
        })
    };

    for f in 0..src.face_count() {
        let o = center(&mut b, &src, f, lift);
        for h in src.topo.face_half_edges(f) {
            let he = *src.he(h);
            let (a, c) = (he.from, he.to);
            let mut chain = Vec::with_capacity(divisions + 2);
            if every_segment {
                chain.push(a);
            } else {
                let p = src.he(he.prev).from;
                let corner = vec![point(&mut b, a, p, 1), a, point(&mut b, a, c, 1), o];
                b.face(corner, Roles::New, src.tags(f));
            }
            chain.extend((1..=divisions).map(|j| point(&mut b, a, c, j)));
            if every_segment {
                chain.push(c);
            }
            for pair in chain.windows(2) {
                b.face(vec![pair[0], pair[1], o], Roles::Existing, src.tags(f));
            }
        }
    }
    b.build()
}

// =============================================================================
// CROSS AND SQUALL
// =============================================================================

/// Two triangles per half-edge plus one quad per corner.
fn cross(mesh: &PolyMesh, amounts: &[f64]) -> PolyMesh {
    let src = Source::new(mesh);
    let mut b = MeshBuilder::new();
    src.keep_vertices(&mut b);
    for f in 0..src.face_count() {
        let t = amounts[f];
        let o = center(&mut b, &src, f, 0.0);
        for h in src.topo.face_half_edges(f) {
            let he = *src.he(h);
            let m = midpoint(&mut b, &src, he.from, he.to);
            let ih = edge_inset(&mut b, &src, h, t, 0.0);
            let inext = edge_inset(&mut b, &src, he.next, t, 0.0);
            b.face(vec![he.from, m, ih], Roles::NewAlt, src.tags(f));
            b.face(vec![m, he.to, ih], Roles::NewAlt, src.tags(f));
            b.face(vec![he.to, inext, o, ih], Roles::Existing, src.tags(f));
        }
    }
    b.build()
}

/// Inner face, corner quads and vertex figures.
///
/// Squall fans each vertex figure to the original vertex; JoinSquall keeps
/// it as one polygon.
fn squall(mesh: &PolyMesh, amount: f64, fan_to_vertex: bool) -> PolyMesh {
    let src = Source::new(mesh);
    let mut b = MeshBuilder::new();
    for f in 0..src.face_count() {
        let inner = src
            .topo
            .face_half_edges(f)
            .map(|h| edge_inset(&mut b, &src, h, amount, 0.0))
            .collect();
        b.face(inner, Roles::Existing, src.tags(f));
        for h in src.topo.face_half_edges(f) {
            let he = *src.he(h);
            let c = src.he(he.next).to;
            let quad = vec![
                midpoint(&mut b, &src, he.from, he.to),
                midpoint(&mut b, &src, he.to, c),
                edge_inset(&mut b, &src, he.next, amount, 0.0),
                edge_inset(&mut b, &src, h, amount, 0.0),
            ];
            b.face(quad, Roles::New, src.tags(f));
        }
    }
    if fan_to_vertex {
        for v in 0..mesh.vertex_count() {
            let fan = src.topo.vertex_fan(v);
            for &h in &fan.half_edges {
                let he = *src.he(h);
                let w = src.he(he.prev).from;
                let centre = b.vertex(Key::V(v), Roles::Existing, || src.pos(v));
                let loop_ = vec![
                    centre,
                    midpoint(&mut b, &src, v, he.to),
                    midpoint(&mut b, &src, v, w),
                ];
                b.face(loop_, Roles::New, src.tags(he.face));
            }
        }
    } else {
        vertex_figures(&mut b, &src, |b, src, v, h| {
            vec![midpoint(b, src, v, src.he(h).to)]
        });
    }
    b.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetra() -> PolyMesh {
        PolyMesh::new(
            vec![
                DVec3::new(1.0, 1.0, 1.0),
                DVec3::new(1.0, -1.0, -1.0),
                DVec3::new(-1.0, 1.0, -1.0),
                DVec3::new(-1.0, -1.0, 1.0),
            ],
            vec![vec![0, 1, 2], vec![0, 2, 3], vec![0, 3, 1], vec![1, 3, 2]],
        )
        .unwrap()
    }

    #[test]
    fn test_tetra_is_outward() {
        let t = tetra();
        for f in 0..4 {
            assert!(t.face_normal(f).dot(t.face_centroid(f)) > 0.0);
        }
    }

    #[test]
    fn test_dual_keeps_face_order_as_vertices() {
        let t = tetra();
        let d = dual(&t, Operator::Dual).unwrap();
        for f in 0..4 {
            assert_eq!(d.vertices()[f], t.face_centroid(f));
        }
    }

    #[test]
    fn test_edge_inset_and_corner_inset_differ() {
        let t = tetra();
        let src = Source::new(&t);
        let mut b = MeshBuilder::new();
        let e = edge_inset(&mut b, &src, 0, 0.5, 0.0);
        let c = corner_inset(&mut b, &src, 0, 0, 0.5, 0.0);
        assert_ne!(e, c);
        assert_ne!(b.position(e), b.position(c));
    }

    #[test]
    fn test_medial_one_division_matches_ortho_counts() {
        let t = tetra();
        let m = medial(&t, 1.0, 0.0, false);
        let o = ortho(&t, &[0.0; 4]);
        assert_eq!(m.counts(), o.counts());
    }
}
