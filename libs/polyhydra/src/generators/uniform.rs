//! # Uniform Polyhedra
//!
//! Convex uniform solids come from the Wythoff kaleidoscope:
//!
//! 1. The symbol `p q r` fixes a spherical Schwarz triangle with angles
//!    `π/p`, `π/q`, `π/r`; its sides are the three mirrors.
//! 2. The bar position picks the generator point: on the corner (`p|q r`),
//!    on an edge (`p q|r`), in the interior (`p q r|`) or, for snubs
//!    (`|p q r`), the point whose three rotation images are equidistant.
//! 3. The generator's orbit under the reflection group (rotation group for
//!    snubs) gives the vertices, and the convex hull gives the faces.
//!
//! The four Kepler–Poinsot stars are not convex, so they are assembled
//! directly from icosahedral vertex sets.
//!
//! Solids are returned on the unit sphere.

use super::normalize;
use config::constants::{approx_zero, EPSILON};
use glam::{DMat2, DMat3, DVec2, DVec3};
use polymesh::hull::convex_hull;
use polymesh::{PolyError, PolyMesh, PolyResult};
use std::collections::{HashSet, VecDeque};
use std::f64::consts::PI;
use tracing::{debug, warn};

named_enum! {
    /// Filters for [`names`].
    pub enum UniformCategory as "uniform category" {
        /// Every named solid.
        All,
        /// The five regular convex solids.
        Platonic,
        /// Prisms and antiprisms.
        Prismatic,
        /// The thirteen Archimedean solids.
        Archimedean,
        /// The four regular star polyhedra.
        KeplerPoinsot,
        /// Platonic, Archimedean and prismatic solids.
        Convex,
        /// Kepler–Poinsot solids.
        Star,
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Family {
    Platonic,
    Archimedean,
    Prismatic,
    KeplerPoinsot,
}

impl UniformCategory {
    fn contains(self, family: Family) -> bool {
        match self {
            Self::All => true,
            Self::Platonic => family == Family::Platonic,
            Self::Prismatic => family == Family::Prismatic,
            Self::Archimedean => family == Family::Archimedean,
            Self::KeplerPoinsot | Self::Star => family == Family::KeplerPoinsot,
            Self::Convex => family != Family::KeplerPoinsot,
        }
    }
}

use Family::{Archimedean as Ar, KeplerPoinsot as Kp, Platonic as Pl, Prismatic as Pr};

const SOLIDS: &[(&str, &str, Family)] = &[
    ("tetrahedron", "3|2 3", Pl),
    ("octahedron", "4|2 3", Pl),
    ("cube", "3|2 4", Pl),
    ("icosahedron", "5|2 3", Pl),
    ("dodecahedron", "3|2 5", Pl),
    ("truncated tetrahedron", "2 3|3", Ar),
    ("cuboctahedron", "2|3 4", Ar),
    ("truncated cube", "2 3|4", Ar),
    ("truncated octahedron", "2 4|3", Ar),
    ("rhombicuboctahedron", "3 4|2", Ar),
    ("truncated cuboctahedron", "2 3 4|", Ar),
    ("snub cube", "|2 3 4", Ar),
    ("icosidodecahedron", "2|3 5", Ar),
    ("truncated dodecahedron", "2 3|5", Ar),
    ("truncated icosahedron", "2 5|3", Ar),
    ("rhombicosidodecahedron", "3 5|2", Ar),
    ("truncated icosidodecahedron", "2 3 5|", Ar),
    ("snub dodecahedron", "|2 3 5", Ar),
    ("triangular prism", "2 3|2", Pr),
    ("pentagonal prism", "2 5|2", Pr),
    ("hexagonal prism", "2 6|2", Pr),
    ("heptagonal prism", "2 7|2", Pr),
    ("octagonal prism", "2 8|2", Pr),
    ("enneagonal prism", "2 9|2", Pr),
    ("decagonal prism", "2 10|2", Pr),
    ("dodecagonal prism", "2 12|2", Pr),
    ("square antiprism", "|2 2 4", Pr),
    ("pentagonal antiprism", "|2 2 5", Pr),
    ("hexagonal antiprism", "|2 2 6", Pr),
    ("heptagonal antiprism", "|2 2 7", Pr),
    ("octagonal antiprism", "|2 2 8", Pr),
    ("enneagonal antiprism", "|2 2 9", Pr),
    ("decagonal antiprism", "|2 2 10", Pr),
    ("dodecagonal antiprism", "|2 2 12", Pr),
    ("great dodecahedron", "5/2|2 5", Kp),
    ("small stellated dodecahedron", "5|2 5/2", Kp),
    ("great stellated dodecahedron", "3|2 5/2", Kp),
    ("great icosahedron", "5/2|2 3", Kp),
];

/// Largest orbit accepted before a symbol is treated as degenerate.
const MAX_ORBIT: usize = 240;

/// Names in `category`, in table order.
///
/// ```rust
/// use polyhydra::generators::uniform::names;
/// use polyhydra::generators::UniformCategory;
///
/// assert_eq!(names(UniformCategory::Platonic).len(), 5);
/// assert_eq!(names(UniformCategory::Star).len(), 4);
/// ```
pub fn names(category: UniformCategory) -> Vec<&'static str> {
    SOLIDS
        .iter()
        .filter(|(_, _, family)| category.contains(*family))
        .map(|(name, _, _)| *name)
        .collect()
}

/// Builds a uniform polyhedron from a name or a Wythoff symbol.
///
/// # Errors
///
/// `UnrecognizedTypeName` for unknown names and malformed symbols,
/// `DegenerateParameters` for symbols whose triangle does not tile the
/// sphere.
pub fn build(name: &str) -> PolyResult<PolyMesh> {
    let key = normalize(name);
    let entry = SOLIDS
        .iter()
        .find(|(n, symbol, _)| normalize(n) == key || normalize(symbol) == key);
    match entry {
        Some((solid, _, Family::KeplerPoinsot)) => star(solid),
        Some((_, symbol, _)) => wythoff(&Symbol::parse(symbol)?),
        None if name.contains('|') => wythoff(&Symbol::parse(name)?),
        None => Err(PolyError::unrecognized("uniform", name)),
    }
}

// =============================================================================
// WYTHOFF CONSTRUCTION
// =============================================================================

/// Parsed Wythoff symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Symbol {
    /// Triangle angles are `π / orders[i]`.
    orders: [u32; 3],
    /// How many numbers stand left of the bar; 0 is a snub.
    bar: usize,
}

impl Symbol {
    fn parse(text: &str) -> PolyResult<Self> {
        let malformed = || PolyError::unrecognized("uniform", text);
        let (left, right) = text.split_once('|').ok_or_else(malformed)?;
        let parse = |part: &str| -> PolyResult<Vec<u32>> {
            part.split_whitespace()
                .map(|n| n.parse::<u32>().map_err(|_| malformed()))
                .collect()
        };
        let left = parse(left)?;
        let right = parse(right)?;
        let bar = left.len();
        let numbers: Vec<u32> = left.into_iter().chain(right).collect();
        let orders: [u32; 3] = numbers.try_into().map_err(|_| malformed())?;

        if orders.iter().any(|&n| n < 2) {
            return Err(PolyError::degenerate(format!(
                "Wythoff orders must be at least 2 in '{text}'"
            )));
        }
        let excess: f64 = orders.iter().map(|&n| 1.0 / f64::from(n)).sum();
        if excess <= 1.0 + EPSILON {
            return Err(PolyError::degenerate(format!(
                "'{text}' does not describe a spherical tiling"
            )));
        }
        Ok(Self { orders, bar })
    }
}

/// The three mirrors of a Schwarz triangle as inward unit normals.
struct Kaleidoscope {
    normals: [DVec3; 3],
}

impl Kaleidoscope {
    fn new(orders: [u32; 3]) -> Self {
        let [a, b, c] = orders.map(|n| PI / f64::from(n));
        // Side opposite the first angle, by the spherical law of cosines.
        let side = |x: f64, y: f64, z: f64| {
            ((x.cos() + y.cos() * z.cos()) / (y.sin() * z.sin()))
                .clamp(-1.0, 1.0)
                .acos()
        };
        let side_b = side(b, c, a);
        let side_c = side(c, a, b);

        let pa = DVec3::Y;
        let pb = DVec3::new(side_c.sin(), side_c.cos(), 0.0);
        let pc = DVec3::new(side_b.sin() * a.cos(), side_b.cos(), side_b.sin() * a.sin());

        let inward = |n: DVec3, toward: DVec3| {
            let n = n.normalize();
            if n.dot(toward) < 0.0 {
                -n
            } else {
                n
            }
        };
        Self {
            normals: [
                inward(pb.cross(pc), pa),
                inward(pc.cross(pa), pb),
                inward(pa.cross(pb), pc),
            ],
        }
    }

    fn reflection(&self, mirror: usize) -> DMat3 {
        let n = self.normals[mirror];
        DMat3::from_cols(
            DVec3::X - 2.0 * n.x * n,
            DVec3::Y - 2.0 * n.y * n,
            DVec3::Z - 2.0 * n.z * n,
        )
    }

    /// Rotations about the three triangle corners.
    fn rotations(&self) -> [DMat3; 3] {
        let [ra, rb, rc] = [0, 1, 2].map(|m| self.reflection(m));
        [rb * rc, rc * ra, ra * rb]
    }

    /// Unit point whose distance to each mirror is proportional to
    /// `targets`.
    fn point(&self, targets: DVec3) -> Option<DVec3> {
        let [na, nb, nc] = self.normals;
        let rows = DMat3::from_cols(na, nb, nc).transpose();
        if approx_zero(rows.determinant()) {
            return None;
        }
        Some((rows.inverse() * targets).normalize())
    }
}

/// Generator for a snub: its images under the three corner rotations are
/// pairwise equidistant. Solved by Newton iteration in the tangent plane of
/// the incenter.
fn snub_point(kaleidoscope: &Kaleidoscope) -> Option<DVec3> {
    let rotations = kaleidoscope.rotations();
    let start = kaleidoscope.point(DVec3::ONE)?;
    let e1 = start.any_orthonormal_vector();
    let e2 = start.cross(e1);
    let at = |uv: DVec2| (start + uv.x * e1 + uv.y * e2).normalize();
    let residual = |uv: DVec2| {
        let g = at(uv);
        let [da, db, dc] = rotations.map(|r| g.distance(r * g));
        DVec2::new(da - db, db - dc)
    };

    const STEP: f64 = 1e-7;
    let mut uv = DVec2::ZERO;
    for _ in 0..100 {
        let r = residual(uv);
        if r.length() < 1e-13 {
            break;
        }
        let jacobian = DMat2::from_cols(
            (residual(uv + DVec2::X * STEP) - r) / STEP,
            (residual(uv + DVec2::Y * STEP) - r) / STEP,
        );
        if approx_zero(jacobian.determinant()) {
            break;
        }
        uv -= jacobian.inverse() * r;
    }
    if residual(uv).length() > 1e-8 {
        warn!("snub generator did not converge");
    }
    Some(at(uv))
}

fn orbit(seed: DVec3, generators: &[DMat3]) -> PolyResult<Vec<DVec3>> {
    let key = |p: DVec3| {
        let q = (p * 1e8).round();
        (q.x as i64, q.y as i64, q.z as i64)
    };
    let mut seen = HashSet::from([key(seed)]);
    let mut points = vec![seed];
    let mut queue = VecDeque::from([seed]);
    while let Some(p) = queue.pop_front() {
        for g in generators {
            let image = *g * p;
            if seen.insert(key(image)) {
                if points.len() >= MAX_ORBIT {
                    return Err(PolyError::degenerate("Wythoff orbit does not close"));
                }
                points.push(image);
                queue.push_back(image);
            }
        }
    }
    Ok(points)
}

fn wythoff(symbol: &Symbol) -> PolyResult<PolyMesh> {
    let kaleidoscope = Kaleidoscope::new(symbol.orders);
    let singular = || PolyError::degenerate("Schwarz triangle is singular");

    let (seed, generators) = if symbol.bar == 0 {
        let seed = snub_point(&kaleidoscope).ok_or_else(singular)?;
        let [ra, rb, _] = kaleidoscope.rotations();
        (seed, vec![ra, rb])
    } else {
        // Mirrors named left of the bar are the ones the generator sits off.
        let targets = match symbol.bar {
            1 => DVec3::X,
            2 => DVec3::new(1.0, 1.0, 0.0),
            _ => DVec3::ONE,
        };
        let seed = kaleidoscope.point(targets).ok_or_else(singular)?;
        let reflections = [0, 1, 2].map(|m| kaleidoscope.reflection(m));
        (seed, reflections.to_vec())
    };

    let points = orbit(seed, &generators)?;
    debug!(
        orders = ?symbol.orders,
        bar = symbol.bar,
        vertices = points.len(),
        "wythoff orbit"
    );
    convex_hull(&points).ok_or_else(|| PolyError::degenerate("Wythoff orbit is flat"))
}

// =============================================================================
// KEPLER–POINSOT
// =============================================================================

const PHI: f64 = 1.618_033_988_749_895;

/// Cyclic permutations of `(0, ±a, ±b)`.
fn cyclic(a: f64, b: f64) -> Vec<DVec3> {
    let mut points = Vec::with_capacity(12);
    for sa in [1.0, -1.0] {
        for sb in [1.0, -1.0] {
            let (x, y) = (sa * a, sb * b);
            points.push(DVec3::new(0.0, x, y));
            points.push(DVec3::new(x, y, 0.0));
            points.push(DVec3::new(y, 0.0, x));
        }
    }
    points
}

fn icosahedron_vertices() -> Vec<DVec3> {
    cyclic(1.0, PHI)
}

fn dodecahedron_vertices() -> Vec<DVec3> {
    let mut points = cyclic(1.0 / PHI, PHI);
    for x in [1.0, -1.0] {
        for y in [1.0, -1.0] {
            for z in [1.0, -1.0] {
                points.push(DVec3::new(x, y, z));
            }
        }
    }
    points
}

/// Sorts `ring` counter-clockwise seen from `axis`.
fn sort_around(points: &[DVec3], mut ring: Vec<usize>, axis: DVec3) -> Vec<usize> {
    let u = axis.any_orthonormal_vector();
    let w = axis.normalize().cross(u);
    let angle = |i: &usize| points[*i].dot(w).atan2(points[*i].dot(u));
    ring.sort_by(|a, b| angle(a).total_cmp(&angle(b)));
    ring
}

fn pentagram(ring: &[usize]) -> Vec<usize> {
    [0, 2, 4, 1, 3].iter().filter_map(|&i| ring.get(i).copied()).collect()
}

fn near(a: DVec3, b: DVec3, distance: f64) -> bool {
    (a.distance(b) - distance).abs() < 1e-6
}

/// Vertex rings around each icosahedron vertex.
fn icosahedral_rings(points: &[DVec3]) -> Vec<Vec<usize>> {
    points
        .iter()
        .map(|&v| {
            let ring = (0..points.len())
                .filter(|&i| near(points[i], v, 2.0))
                .collect();
            sort_around(points, ring, v)
        })
        .collect()
}

fn star(name: &str) -> PolyResult<PolyMesh> {
    let (vertices, faces) = match name {
        "great dodecahedron" => {
            let points = icosahedron_vertices();
            let faces = icosahedral_rings(&points);
            (points, faces)
        }
        "small stellated dodecahedron" => {
            let points = icosahedron_vertices();
            let faces = icosahedral_rings(&points).iter().map(|r| pentagram(r)).collect();
            (points, faces)
        }
        "great icosahedron" => {
            let points = icosahedron_vertices();
            let long = 2.0 * PHI;
            let mut faces = Vec::new();
            for i in 0..points.len() {
                for j in i + 1..points.len() {
                    for k in j + 1..points.len() {
                        let (a, b, c) = (points[i], points[j], points[k]);
                        if near(a, b, long) && near(b, c, long) && near(a, c, long) {
                            let outward = (b - a).cross(c - a).dot(a + b + c) > 0.0;
                            faces.push(if outward { vec![i, j, k] } else { vec![i, k, j] });
                        }
                    }
                }
            }
            (points, faces)
        }
        _ => {
            // Great stellated dodecahedron: one pentagram per face axis of
            // the dodecahedron, through its second layer of vertices.
            let points = dodecahedron_vertices();
            let faces = cyclic(PHI, 1.0)
                .into_iter()
                .map(|axis| {
                    let mut order: Vec<usize> = (0..points.len()).collect();
                    order.sort_by(|&a, &b| points[b].dot(axis).total_cmp(&points[a].dot(axis)));
                    let ring = sort_around(&points, order[5..10].to_vec(), axis);
                    pentagram(&ring)
                })
                .collect();
            (points, faces)
        }
    };
    let radius = vertices.first().map_or(1.0, |p| p.length());
    let mesh = PolyMesh::new(vertices, faces)?;
    Ok(mesh.transformed(|p| p / radius))
}
