//! # Convex Hull
//!
//! QuickHull over `DVec3` point sets, returning a [`PolyMesh`] whose
//! coplanar triangles are merged into convex polygons.
//!
//! ## Algorithm
//!
//! 1. Deduplicate points on a quantized grid
//! 2. Build the initial tetrahedron from extreme points
//! 3. Assign outside points to faces
//! 4. Repeatedly take the farthest outside point, delete the faces it sees
//!    and cone the horizon to it
//! 5. Merge coplanar triangles
//!
//! ## References
//!
//! - [QuickHull Paper](https://www.cise.ufl.edu/~ungor/courses/fall06/papers/QuickHull.pdf)

use crate::mesh::{PolyMesh, Roles};
use config::constants::{COPLANAR_TOLERANCE, HULL_EPSILON, QUANTIZE_SCALE};
use glam::DVec3;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

// =============================================================================
// PUBLIC API
// =============================================================================

/// Computes the convex hull of `points`.
///
/// Returns `None` when fewer than four distinct points remain or all of them
/// are coplanar.
///
/// ## Example
///
/// ```rust
/// use polymesh::hull::convex_hull;
/// use glam::DVec3;
///
/// let mut points = Vec::new();
/// for x in [-1.0, 1.0] {
///     for y in [-1.0, 1.0] {
///         for z in [-1.0, 1.0] {
///             points.push(DVec3::new(x, y, z));
///         }
///     }
/// }
/// let hull = convex_hull(&points).unwrap();
/// assert_eq!(hull.face_count(), 6);
/// ```
pub fn convex_hull(points: &[DVec3]) -> Option<PolyMesh> {
    let mut unique = Vec::with_capacity(points.len());
    let mut seen = HashSet::new();
    for &p in points {
        let q = (p * QUANTIZE_SCALE).round();
        if seen.insert((q.x as i64, q.y as i64, q.z as i64)) {
            unique.push(p);
        }
    }
    if unique.len() < 4 {
        return None;
    }

    let scale = unique.iter().map(|p| p.abs().max_element()).fold(1.0, f64::max);
    let mut hull = Hull::new(&unique, HULL_EPSILON * scale);
    hull.build_initial_tetrahedron()?;
    hull.assign_points_to_faces();
    hull.expand();
    let triangles = hull.to_mesh();
    debug!(
        points = unique.len(),
        triangles = triangles.face_count(),
        "convex hull"
    );
    Some(triangles.merge_coplanar_faces(COPLANAR_TOLERANCE))
}

// =============================================================================
// HULL STRUCTURE
// =============================================================================

/// Hull under construction.
struct Hull<'a> {
    points: &'a [DVec3],
    faces: Vec<HullFace>,
    in_hull: Vec<bool>,
    epsilon: f64,
}

struct HullFace {
    verts: [usize; 3],
    /// Outward unit normal.
    normal: DVec3,
    /// Plane offset along `normal`.
    d: f64,
    outside: Vec<usize>,
    active: bool,
}

impl HullFace {
    fn distance(&self, p: DVec3) -> f64 {
        self.normal.dot(p) - self.d
    }

    fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.verts;
        [(a, b), (b, c), (c, a)]
    }
}

impl<'a> Hull<'a> {
    fn new(points: &'a [DVec3], epsilon: f64) -> Self {
        Self {
            points,
            faces: Vec::new(),
            in_hull: vec![false; points.len()],
            epsilon,
        }
    }

    /// Returns `None` if the points are degenerate (collinear or coplanar).
    fn build_initial_tetrahedron(&mut self) -> Option<()> {
        let pts = self.points;
        let mut extremes = [0usize; 6];
        for (i, p) in pts.iter().enumerate() {
            for axis in 0..3 {
                if p[axis] < pts[extremes[axis * 2]][axis] {
                    extremes[axis * 2] = i;
                }
                if p[axis] > pts[extremes[axis * 2 + 1]][axis] {
                    extremes[axis * 2 + 1] = i;
                }
            }
        }

        let (mut p0, mut p1, mut best) = (0, 0, 0.0);
        for (i, &a) in extremes.iter().enumerate() {
            for &b in &extremes[i + 1..] {
                let dist = pts[a].distance_squared(pts[b]);
                if dist > best {
                    (p0, p1, best) = (a, b, dist);
                }
            }
        }
        if best < self.epsilon {
            return None;
        }

        let axis = pts[p1] - pts[p0];
        let p2 = farthest(pts, |p| axis.cross(p - pts[p0]).length_squared())
            .filter(|&(_, d)| d > self.epsilon)?
            .0;
        let plane = axis.cross(pts[p2] - pts[p0]);
        let (p3, _) = farthest(pts, |p| (p - pts[p0]).dot(plane).abs())
            .filter(|&(_, d)| d > self.epsilon)?;

        for p in [p0, p1, p2, p3] {
            self.in_hull[p] = true;
        }
        if (pts[p3] - pts[p0]).dot(plane) > 0.0 {
            self.add_face(p0, p2, p1);
            self.add_face(p0, p1, p3);
            self.add_face(p1, p2, p3);
            self.add_face(p2, p0, p3);
        } else {
            self.add_face(p0, p1, p2);
            self.add_face(p0, p3, p1);
            self.add_face(p1, p3, p2);
            self.add_face(p2, p3, p0);
        }
        Some(())
    }

    fn add_face(&mut self, v0: usize, v1: usize, v2: usize) {
        let [p0, p1, p2] = [v0, v1, v2].map(|v| self.points[v]);
        let normal = (p1 - p0).cross(p2 - p0).normalize_or_zero();
        self.faces.push(HullFace {
            verts: [v0, v1, v2],
            normal,
            d: normal.dot(p0),
            outside: Vec::new(),
            active: true,
        });
    }

    fn assign_points_to_faces(&mut self) {
        for i in 0..self.points.len() {
            if !self.in_hull[i] {
                self.assign_point(i);
            }
        }
    }

    /// Adds point `i` to the outside set of the first active face that sees it.
    fn assign_point(&mut self, i: usize) {
        let p = self.points[i];
        let epsilon = self.epsilon;
        if let Some(face) = self
            .faces
            .iter_mut()
            .find(|f| f.active && f.distance(p) > epsilon)
        {
            face.outside.push(i);
        }
    }

    fn expand(&mut self) {
        let points = self.points;
        loop {
            let best = self
                .faces
                .iter()
                .filter(|f| f.active)
                .flat_map(|f| f.outside.iter().map(move |&i| (i, f.distance(points[i]))))
                .max_by(|a, b| a.1.total_cmp(&b.1));
            match best {
                Some((i, _)) => self.add_point(i),
                None => break,
            }
        }
    }

    fn add_point(&mut self, i: usize) {
        let p = self.points[i];
        let visible: Vec<usize> = (0..self.faces.len())
            .filter(|&f| self.faces[f].active && self.faces[f].distance(p) > self.epsilon)
            .collect();
        if visible.is_empty() {
            // Numerically on the hull; drop it from every outside set.
            for face in &mut self.faces {
                face.outside.retain(|&o| o != i);
            }
            return;
        }

        // An edge of a visible face is on the horizon when its reverse is not
        // also an edge of a visible face.
        let visible_edges: HashSet<(usize, usize)> = visible
            .iter()
            .flat_map(|&f| self.faces[f].edges())
            .collect();
        let horizon: Vec<(usize, usize)> = visible
            .iter()
            .flat_map(|&f| self.faces[f].edges())
            .filter(|&(a, b)| !visible_edges.contains(&(b, a)))
            .collect();

        let mut orphans = Vec::new();
        for &f in &visible {
            let face = &mut self.faces[f];
            face.active = false;
            orphans.append(&mut face.outside);
        }
        self.in_hull[i] = true;

        for (a, b) in horizon {
            self.add_face(a, b, i);
        }
        for o in orphans {
            if !self.in_hull[o] {
                self.assign_point(o);
            }
        }
    }

    /// Emits active triangles on shared, renumbered vertices.
    fn to_mesh(&self) -> PolyMesh {
        let mut remap: HashMap<usize, usize> = HashMap::new();
        let mut vertices = Vec::new();
        let mut faces = Vec::new();
        for face in self.faces.iter().filter(|f| f.active) {
            let loop_ = face
                .verts
                .iter()
                .map(|&v| {
                    *remap.entry(v).or_insert_with(|| {
                        vertices.push(self.points[v]);
                        vertices.len() - 1
                    })
                })
                .collect();
            faces.push(loop_);
        }
        let face_count = faces.len();
        let vertex_count = vertices.len();
        PolyMesh::from_parts_unchecked(
            vertices,
            faces,
            vec![Roles::Existing; face_count],
            vec![Roles::Existing; vertex_count],
            vec![BTreeSet::new(); face_count],
        )
    }
}

/// Index and score of the point maximizing `score`.
fn farthest(points: &[DVec3], score: impl Fn(DVec3) -> f64) -> Option<(usize, f64)> {
    points
        .iter()
        .enumerate()
        .map(|(i, &p)| (i, score(p)))
        .max_by(|a, b| a.1.total_cmp(&b.1))
}
