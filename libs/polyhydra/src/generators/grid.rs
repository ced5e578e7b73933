//! # Grids
//!
//! The eleven Archimedean tilings with unit edges, repeated over an
//! `x × y` patch of lattice cells and optionally wrapped onto a surface.
//!
//! Each tiling is a motif: two lattice vectors and the counter-clockwise
//! polygons of one cell. Tilings whose first lattice vector is horizontal
//! are laid out in rectangular rows, so wrapping around a cylinder closes
//! seamlessly.

use super::WeldedMesh;
use config::constants::{approx_zero, EPSILON};
use glam::{DVec2, DVec3};
use polymesh::{PolyError, PolyMesh, PolyResult};
use std::collections::{HashMap, HashSet};
use std::f64::consts::{PI, TAU};

named_enum! {
    /// Archimedean tilings by vertex configuration.
    #[allow(non_camel_case_types)]
    pub enum GridType as "grid" {
        /// Squares.
        K_4_4_4_4,
        /// Triangles.
        K_3_3_3_3_3_3,
        /// Hexagons.
        K_6_6_6,
        /// Trihexagonal.
        K_3_6_3_6,
        /// Elongated triangular.
        K_3_3_3_4_4,
        /// Snub square.
        K_3_3_4_3_4,
        /// Snub hexagonal.
        K_3_3_3_3_6,
        /// Rhombitrihexagonal.
        K_3_4_6_4,
        /// Truncated square.
        K_4_8_8,
        /// Truncated hexagonal.
        K_3_12_12,
        /// Truncated trihexagonal.
        K_4_6_12,
    }
}

named_enum! {
    /// Surface a grid is wrapped onto.
    #[derive(Default)]
    pub enum GridShape as "grid shape" {
        /// Flat patch in the XZ plane.
        #[default]
        Plane,
        /// Rows wrapped around the Y axis.
        Cylinder,
        /// Cylinder narrowing to an apex.
        Cone,
        /// Latitude/longitude sphere.
        Sphere,
        /// Flat disk, rows becoming rings.
        Polar,
        /// Both directions wrapped.
        Torus,
    }
}

impl GridType {
    /// Parses host spellings such as `"K_4_8_8"`, `"k488"` or `"4,8,8"`.
    ///
    /// ```rust
    /// use polyhydra::generators::GridType;
    ///
    /// assert_eq!(GridType::parse("4,8,8").unwrap(), GridType::K_4_8_8);
    /// assert!(GridType::parse("5,5,5").is_err());
    /// ```
    pub fn parse(name: &str) -> PolyResult<Self> {
        name.parse()
            .or_else(|_| format!("K{name}").parse())
            .map_err(|_: PolyError| PolyError::unrecognized("grid", name))
    }

    fn motif(self) -> Motif {
        let s3 = 3f64.sqrt();
        let b = s3 / 2.0;
        let p = DVec2::new;
        let hexagon: Vec<DVec2> = (0..6u32).map(|k| e(60.0 * f64::from(k), 1.0)).collect();
        // Dodecagon shared by the 3.12.12 and 4.6.12 tilings.
        let r12 = 0.5 / (PI / 12.0).sin();
        let a12 = r12 * (PI / 12.0).cos();
        let dodecagon: Vec<DVec2> = (0..12u32).map(|k| e(15.0 + 30.0 * f64::from(k), r12)).collect();

        match self {
            Self::K_4_4_4_4 => Motif::new(
                p(1.0, 0.0),
                p(0.0, 1.0),
                vec![vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)]],
            ),
            Self::K_3_3_3_3_3_3 => Motif::new(
                p(1.0, 0.0),
                p(0.5, b),
                vec![
                    vec![p(0.0, 0.0), p(1.0, 0.0), p(0.5, b)],
                    vec![p(1.0, 0.0), p(1.5, b), p(0.5, b)],
                ],
            ),
            Self::K_6_6_6 => Motif::new(
                p(s3, 0.0),
                p(b, 1.5),
                vec![(0..6u32).map(|k| e(30.0 + 60.0 * f64::from(k), 1.0)).collect()],
            ),
            Self::K_3_6_3_6 => Motif::new(
                p(2.0, 0.0),
                p(1.0, s3),
                vec![
                    hexagon,
                    vec![p(1.0, 0.0), p(1.5, b), p(0.5, b)],
                    vec![p(1.5, b), p(2.5, b), p(2.0, s3)],
                ],
            ),
            Self::K_3_3_3_4_4 => Motif::new(
                p(1.0, 0.0),
                p(0.5, 1.0 + b),
                vec![
                    vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)],
                    vec![p(0.0, 1.0), p(1.0, 1.0), p(0.5, 1.0 + b)],
                    vec![p(1.0, 1.0), p(1.5, 1.0 + b), p(0.5, 1.0 + b)],
                ],
            ),
            Self::K_3_3_4_3_4 => Motif::new(
                p(1.0 + b, 0.5),
                p(-0.5, 1.0 + b),
                vec![
                    vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)],
                    vec![p(1.0, 0.0), p(1.5, -b), p(1.5 + b, 0.5 - b), p(1.0 + b, 0.5)],
                    vec![p(0.0, 0.0), p(0.5, -b), p(1.0, 0.0)],
                    vec![p(1.0, 0.0), p(1.0 + b, 0.5), p(1.0, 1.0)],
                    vec![p(1.0, 1.0), p(0.5, 1.0 + b), p(0.0, 1.0)],
                    vec![p(0.0, 1.0), p(-b, 0.5), p(0.0, 0.0)],
                ],
            ),
            Self::K_3_3_3_3_6 => {
                let mut polygons: Vec<Vec<DVec2>> = (0..6)
                    .map(|k| {
                        let (h0, h1) = (hexagon[k], hexagon[(k + 1) % 6]);
                        vec![h1, h0, h0 + h1]
                    })
                    .collect();
                polygons.push(vec![p(1.0, 0.0), p(2.0, 0.0), p(1.5, b)]);
                polygons.push(vec![p(0.5, b), p(1.0, s3), p(0.0, s3)]);
                polygons.push(hexagon);
                Motif::new(p(2.5, -b), p(2.0, s3), polygons)
            }
            Self::K_3_4_6_4 => {
                let normal = |k: usize| e(30.0 + 60.0 * k as f64, 1.0);
                let mut polygons: Vec<Vec<DVec2>> = (0..3)
                    .map(|k| {
                        let (h0, h1, n) = (hexagon[k], hexagon[k + 1], normal(k));
                        vec![h1, h0, h0 + n, h1 + n]
                    })
                    .collect();
                for k in 0..2 {
                    let h = hexagon[k];
                    polygons.push(vec![h, h + normal((k + 5) % 6), h + normal(k)]);
                }
                polygons.push(hexagon);
                let length = 1.0 + s3;
                Motif::new(e(30.0, length), e(90.0, length), polygons)
            }
            Self::K_4_8_8 => {
                let r8 = 0.5 / (PI / 8.0).sin();
                let period = 1.0 + 2f64.sqrt();
                let c = DVec2::splat(period / 2.0);
                let s = 2f64.sqrt() / 2.0;
                Motif::new(
                    p(period, 0.0),
                    p(0.0, period),
                    vec![
                        (0..8u32).map(|k| e(22.5 + 45.0 * f64::from(k), r8)).collect(),
                        vec![c + p(0.0, -s), c + p(s, 0.0), c + p(0.0, s), c + p(-s, 0.0)],
                    ],
                )
            }
            Self::K_3_12_12 => {
                let mut polygons = vec![dodecagon];
                for d in [30.0, 90.0] {
                    polygons.push(vec![
                        e(d + 15.0, r12),
                        e(d - 15.0, r12),
                        e(d, a12 + b),
                    ]);
                }
                let length = 2.0 + s3;
                Motif::new(e(0.0, length), e(60.0, length), polygons)
            }
            Self::K_4_6_12 => {
                let mut polygons = vec![dodecagon];
                for d in [0.0, 60.0, 120.0] {
                    let (a, c) = (e(d + 15.0, r12), e(d - 15.0, r12));
                    let n = e(d, 1.0);
                    polygons.push(vec![a, c, c + n, a + n]);
                }
                for d in [30.0, 90.0] {
                    let center = e(d, a12 + b);
                    polygons.push((0..6u32).map(|j| center + e(60.0 * f64::from(j), 1.0)).collect());
                }
                let length = 3.0 + s3;
                Motif::new(e(0.0, length), e(60.0, length), polygons)
            }
        }
    }
}

/// Unit vector at `degrees`, scaled by `length`.
fn e(degrees: f64, length: f64) -> DVec2 {
    DVec2::from_angle(degrees.to_radians()) * length
}

struct Motif {
    u: DVec2,
    v: DVec2,
    polygons: Vec<Vec<DVec2>>,
}

impl Motif {
    fn new(u: DVec2, v: DVec2, polygons: Vec<Vec<DVec2>>) -> Self {
        Self { u, v, polygons }
    }

    /// Rows repeat along a horizontal `u`.
    fn has_rows(&self) -> bool {
        approx_zero(self.u.y)
    }

    fn patch(&self, x: usize, y: usize) -> Vec<Vec<DVec2>> {
        let mut polygons = Vec::with_capacity(x * y * self.polygons.len());
        for j in 0..y {
            let row = j as f64;
            let shift = if self.has_rows() {
                (row * self.v.x / self.u.x).floor()
            } else {
                0.0
            };
            for i in 0..x {
                let origin = (i as f64 - shift) * self.u + row * self.v;
                polygons.extend(
                    self.polygons
                        .iter()
                        .map(|polygon| polygon.iter().map(|&q| q + origin).collect()),
                );
            }
        }
        polygons
    }
}

/// Torus tube radius relative to the ring radius.
const TORUS_TUBE: f64 = 0.35;

/// Builds an `x × y` patch of `grid` wrapped onto `shape`, centred on the
/// origin.
///
/// # Errors
///
/// `DegenerateParameters` when `x` or `y` is 0, or when the wrap collapses
/// cells onto each other (too few columns or rows to go around). A torus must
/// also close up, which needs a row tiling and a row count that realigns
/// the rows.
pub fn build(grid: GridType, shape: GridShape, x: usize, y: usize) -> PolyResult<PolyMesh> {
    if x == 0 || y == 0 {
        return Err(PolyError::degenerate(format!(
            "grid needs at least one cell each way, got {x}×{y}"
        )));
    }
    let motif = grid.motif();
    let polygons = motif.patch(x, y);

    let mut min = DVec2::splat(f64::INFINITY);
    let mut max = DVec2::splat(f64::NEG_INFINITY);
    for q in polygons.iter().flatten() {
        min = min.min(*q);
        max = max.max(*q);
    }
    let (start, width) = if motif.has_rows() {
        (0.0, x as f64 * motif.u.x)
    } else {
        (min.x, max.x - min.x)
    };
    let height = (max.y - min.y).max(EPSILON);
    let ring = width / TAU;
    // The tube closes after `y` lattice rows, not at the ragged bounding box.
    let period = if motif.has_rows() {
        y as f64 * motif.v.y
    } else {
        height
    };

    let place = |q: DVec2| -> DVec3 {
        let s = (q.x - start) / width;
        let t = (q.y - min.y) / height;
        let theta = TAU * s;
        let around = |radius: f64, y: f64| {
            DVec3::new(radius * theta.cos(), y, -radius * theta.sin())
        };
        match shape {
            GridShape::Plane => DVec3::new(q.x, 0.0, -q.y),
            GridShape::Cylinder => around(ring, t * height),
            GridShape::Cone => around(ring * (1.0 - t), t * height),
            GridShape::Polar => around(ring * (1.0 - t), 0.0),
            GridShape::Sphere => {
                let phi = PI * t;
                around(phi.sin(), -phi.cos())
            }
            GridShape::Torus => {
                let phi = TAU * (q.y - min.y) / period;
                around(1.0 + TORUS_TUBE * phi.cos(), TORUS_TUBE * phi.sin())
            }
        }
    };

    let mut mesh = WeldedMesh::default();
    for polygon in &polygons {
        mesh.face(polygon.iter().map(|&q| place(q)));
    }
    let built = mesh.build()?;
    check_wrap(&built, shape, x, y)?;
    let center = built.center();
    Ok(built.transformed(|p| p - center))
}

/// Rejects welded grids whose cells landed on each other: no faces left, a
/// face visiting a corner twice, or an edge used twice in one direction or
/// by more than two faces. Tori must come out closed with `V - E + F = 0`.
fn check_wrap(mesh: &PolyMesh, shape: GridShape, x: usize, y: usize) -> PolyResult<()> {
    let collapsed = || {
        PolyError::degenerate(format!("{x}×{y} grid collapses when wrapped onto a {shape}"))
    };
    if mesh.is_empty() {
        return Err(collapsed());
    }
    let mut directed = HashSet::new();
    let mut shared: HashMap<(usize, usize), usize> = HashMap::new();
    for face in mesh.faces() {
        let corners: HashSet<usize> = face.iter().copied().collect();
        if corners.len() != face.len() {
            return Err(collapsed());
        }
        for (i, &a) in face.iter().enumerate() {
            let b = face[(i + 1) % face.len()];
            let uses = shared.entry((a.min(b), a.max(b))).or_insert(0);
            *uses += 1;
            if *uses > 2 || !directed.insert((a, b)) {
                return Err(collapsed());
            }
        }
    }
    if shape == GridShape::Torus {
        let used: HashSet<usize> = mesh.faces().iter().flatten().copied().collect();
        let euler = used.len() as i64 - shared.len() as i64 + mesh.face_count() as i64;
        if euler != 0 || shared.values().any(|&uses| uses != 2) {
            return Err(PolyError::degenerate(format!(
                "{x}×{y} grid does not close into a torus"
            )));
        }
    }
    Ok(())
}
