//! # Radial Solids
//!
//! Solids made of a bottom cap, an optional prism or antiprism band and a
//! top cap stacked around a regular ring. With unit edges the pyramids
//! (n ≤ 5), cupolae (n ≤ 5) and the pentagonal rotunda come out with
//! regular faces; other side counts stay valid but irregular.
//!
//! Rings lie in horizontal planes and grow upward along +Y. Bottom caps are
//! top caps mirrored in the ring plane.

use super::{polar, WeldedMesh};
use config::constants::{EPSILON, MIN_POLYGON_SIDES};
use glam::DVec3;
use polymesh::{PolyError, PolyMesh, PolyResult};
use std::f64::consts::{PI, TAU};

named_enum! {
    /// The radial solid families.
    pub enum RadialPolyType as "radial solid" {
        /// n-gonal prism.
        Prism,
        /// n-gonal antiprism.
        Antiprism,
        /// Pyramid over an n-gon.
        Pyramid,
        /// Pyramid on a prism.
        ElongatedPyramid,
        /// Pyramid on an antiprism.
        GyroelongatedPyramid,
        /// Two pyramids base to base.
        Dipyramid,
        /// Two pyramids separated by a prism.
        ElongatedDipyramid,
        /// Two pyramids separated by an antiprism.
        GyroelongatedDipyramid,
        /// Cupola over a 2n-gon.
        Cupola,
        /// Cupola on a prism.
        ElongatedCupola,
        /// Cupola on an antiprism.
        GyroelongatedCupola,
        /// Two cupolae base to base, squares facing squares.
        OrthoBicupola,
        /// Two cupolae base to base, squares facing triangles.
        GyroBicupola,
        /// Ortho bicupola split by a prism.
        ElongatedOrthoBicupola,
        /// Gyro bicupola split by a prism.
        ElongatedGyroBicupola,
        /// Two cupolae split by an antiprism.
        GyroelongatedBicupola,
        /// Rotunda over a 2n-gon.
        Rotunda,
        /// Rotunda on a prism.
        ElongatedRotunda,
        /// Rotunda on an antiprism.
        GyroelongatedRotunda,
        /// Two rotundae split by an antiprism.
        GyroelongatedBirotunda,
    }
}

/// What closes one end of a radial solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Cap {
    Flat,
    Pyramid,
    Cupola,
    Rotunda,
}

impl Cap {
    /// Ring size per base side.
    fn ring_factor(self) -> usize {
        match self {
            Cap::Flat | Cap::Pyramid => 1,
            Cap::Cupola | Cap::Rotunda => 2,
        }
    }
}

/// Band between the two caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Band {
    None,
    Prism,
    Antiprism,
}

/// Full description of a radial solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Layout {
    pub(crate) bottom: Cap,
    pub(crate) band: Band,
    pub(crate) top: Cap,
    /// Rotates the top cap one ring step against the bottom cap.
    pub(crate) gyro: bool,
}

impl Layout {
    pub(crate) const fn new(bottom: Cap, band: Band, top: Cap, gyro: bool) -> Self {
        Self {
            bottom,
            band,
            top,
            gyro,
        }
    }
}

impl RadialPolyType {
    pub(crate) fn layout(self) -> Layout {
        use Band as B;
        use Cap as C;
        use RadialPolyType::*;
        match self {
            Prism => Layout::new(C::Flat, B::Prism, C::Flat, false),
            Antiprism => Layout::new(C::Flat, B::Antiprism, C::Flat, false),
            Pyramid => Layout::new(C::Flat, B::None, C::Pyramid, false),
            ElongatedPyramid => Layout::new(C::Flat, B::Prism, C::Pyramid, false),
            GyroelongatedPyramid => Layout::new(C::Flat, B::Antiprism, C::Pyramid, false),
            Dipyramid => Layout::new(C::Pyramid, B::None, C::Pyramid, false),
            ElongatedDipyramid => Layout::new(C::Pyramid, B::Prism, C::Pyramid, false),
            GyroelongatedDipyramid => Layout::new(C::Pyramid, B::Antiprism, C::Pyramid, false),
            Cupola => Layout::new(C::Flat, B::None, C::Cupola, false),
            ElongatedCupola => Layout::new(C::Flat, B::Prism, C::Cupola, false),
            GyroelongatedCupola => Layout::new(C::Flat, B::Antiprism, C::Cupola, false),
            OrthoBicupola => Layout::new(C::Cupola, B::None, C::Cupola, false),
            GyroBicupola => Layout::new(C::Cupola, B::None, C::Cupola, true),
            ElongatedOrthoBicupola => Layout::new(C::Cupola, B::Prism, C::Cupola, false),
            ElongatedGyroBicupola => Layout::new(C::Cupola, B::Prism, C::Cupola, true),
            GyroelongatedBicupola => Layout::new(C::Cupola, B::Antiprism, C::Cupola, false),
            Rotunda => Layout::new(C::Flat, B::None, C::Rotunda, false),
            ElongatedRotunda => Layout::new(C::Flat, B::Prism, C::Rotunda, false),
            GyroelongatedRotunda => Layout::new(C::Flat, B::Antiprism, C::Rotunda, false),
            GyroelongatedBirotunda => Layout::new(C::Rotunda, B::Antiprism, C::Rotunda, false),
        }
    }
}

/// Builds a radial solid with unit edges, centred on the origin.
///
/// # Errors
///
/// `DegenerateParameters` when `sides < 3`.
///
/// # Example
///
/// ```rust
/// use polyhydra::generators::radial::build;
/// use polyhydra::generators::RadialPolyType;
///
/// let cupola = build(RadialPolyType::Cupola, 3).unwrap();
/// assert_eq!(cupola.vertex_count(), 9);
/// assert_eq!(cupola.face_count(), 8);
/// ```
pub fn build(kind: RadialPolyType, sides: usize) -> PolyResult<PolyMesh> {
    if sides < MIN_POLYGON_SIDES {
        return Err(PolyError::degenerate(format!(
            "{kind} needs at least {MIN_POLYGON_SIDES} sides, got {sides}"
        )));
    }
    build_layout(kind.layout(), sides)
}

/// Builds any layout; cupola layouts also accept `sides == 2`.
pub(crate) fn build_layout(layout: Layout, sides: usize) -> PolyResult<PolyMesh> {
    let factor = layout.bottom.ring_factor().max(layout.top.ring_factor());
    let m = sides * factor;
    if m < 3 {
        return Err(PolyError::degenerate(format!(
            "radial ring needs at least 3 vertices, got {m}"
        )));
    }
    let radius = ring_radius(m);
    let step = TAU / m as f64;
    let mut mesh = WeldedMesh::default();

    let bottom: Vec<DVec3> = (0..m).map(|j| polar(radius, j as f64 * step, 0.0)).collect();
    let (top, top_start) = match layout.band {
        Band::None => (bottom.clone(), 0.0),
        Band::Prism => {
            let top: Vec<DVec3> = bottom.iter().map(|p| *p + DVec3::Y).collect();
            for j in 0..m {
                let k = (j + 1) % m;
                mesh.face([bottom[j], bottom[k], top[k], top[j]]);
            }
            (top, 0.0)
        }
        Band::Antiprism => {
            let chord = 2.0 * radius * (step / 4.0).sin();
            let height = (1.0 - chord * chord).max(0.0).sqrt();
            let top: Vec<DVec3> = (0..m)
                .map(|j| polar(radius, (j as f64 + 0.5) * step, height))
                .collect();
            for j in 0..m {
                let k = (j + 1) % m;
                mesh.face([bottom[j], bottom[k], top[j]]);
                mesh.face([bottom[k], top[k], top[j]]);
            }
            (top, 0.5 * step)
        }
    };

    let top_phase = usize::from(layout.gyro);
    cap(
        &mut mesh,
        Frame::new(&bottom, radius, 0.0, -1.0),
        layout.bottom,
        0,
    );
    cap(
        &mut mesh,
        Frame::new(&top, radius, top_start, 1.0),
        layout.top,
        top_phase,
    );

    let built = mesh.build()?;
    let center = built.center();
    Ok(built.transformed(|p| p - center))
}

/// Circumradius of a regular unit-edge polygon.
pub(crate) fn ring_radius(sides: usize) -> f64 {
    0.5 / (PI / sides as f64).sin()
}

/// Ring a cap is built on, with the direction it grows in.
struct Frame<'a> {
    ring: &'a [DVec3],
    radius: f64,
    start: f64,
    y: f64,
    dir: f64,
}

impl<'a> Frame<'a> {
    fn new(ring: &'a [DVec3], radius: f64, start: f64, dir: f64) -> Self {
        let y = ring.first().map_or(0.0, |p| p.y);
        Self {
            ring,
            radius,
            start,
            y,
            dir,
        }
    }

    fn len(&self) -> usize {
        self.ring.len()
    }

    /// Ring vertex `j`, wrapping.
    fn at(&self, j: usize) -> DVec3 {
        self.ring[j % self.ring.len()]
    }

    /// Point at ring position `t` (fractional ring index), `radius` out and
    /// `height` above the ring in the growth direction.
    fn point(&self, radius: f64, t: f64, height: f64) -> DVec3 {
        let step = TAU / self.len() as f64;
        polar(radius, self.start + t * step, self.y + self.dir * height)
    }

    /// Emits a face given in upward orientation.
    fn emit(&self, mesh: &mut WeldedMesh, mut face: Vec<DVec3>) {
        if self.dir < 0.0 {
            face.reverse();
        }
        mesh.face(face);
    }
}

/// Height used when a regular cap cannot close with unit edges.
const FLAT_CAP_HEIGHT: f64 = 0.5;

fn cap(mesh: &mut WeldedMesh, frame: Frame<'_>, kind: Cap, phase: usize) {
    let m = frame.len();
    match kind {
        Cap::Flat => frame.emit(mesh, frame.ring.to_vec()),
        Cap::Pyramid => {
            let h2 = 1.0 - frame.radius * frame.radius;
            let height = if h2 > EPSILON { h2.sqrt() } else { FLAT_CAP_HEIGHT };
            let apex = frame.point(0.0, 0.0, height);
            for j in 0..m {
                frame.emit(mesh, vec![frame.at(j), frame.at(j + 1), apex]);
            }
        }
        Cap::Cupola => {
            let n = m / 2;
            let top_radius = ring_radius(n.max(2));
            let inset = frame.radius * (PI / m as f64).cos() - top_radius * (PI / n as f64).cos();
            let h2 = 1.0 - inset * inset;
            let height = if h2 > EPSILON { h2.sqrt() } else { FLAT_CAP_HEIGHT };
            let p = phase as f64;
            let tops: Vec<DVec3> = (0..n)
                .map(|i| frame.point(top_radius, 2.0 * i as f64 + 1.5 + p, height))
                .collect();
            for i in 0..n {
                let e = 2 * i + phase;
                let prev = tops[(i + n - 1) % n];
                frame.emit(mesh, vec![frame.at(e), frame.at(e + 1), tops[i], prev]);
                frame.emit(mesh, vec![frame.at(e + 1), frame.at(e + 2), tops[i]]);
            }
            frame.emit(mesh, tops);
        }
        Cap::Rotunda => {
            let n = m / 2;
            let sphere = frame.radius;
            let top_radius = ring_radius(n);
            let top_height = (sphere * sphere - top_radius * top_radius).max(0.0).sqrt();
            // Middle vertices sit on the same sphere, one unit from the top ring.
            let a = top_radius * (PI / n as f64).cos();
            let b = top_height;
            let c = (sphere * sphere - 0.5) / sphere;
            let rho = a.hypot(b).max(EPSILON);
            let beta = b.atan2(a) - (c / rho).clamp(-1.0, 1.0).acos();
            let (mid_radius, mid_height) = (sphere * beta.cos(), sphere * beta.sin());

            let p = phase as f64;
            let tops: Vec<DVec3> = (0..n)
                .map(|i| frame.point(top_radius, 2.0 * i as f64 + 0.5 + p, top_height))
                .collect();
            let mids: Vec<DVec3> = (0..n)
                .map(|i| frame.point(mid_radius, 2.0 * i as f64 + 1.5 + p, mid_height))
                .collect();
            for i in 0..n {
                let e = 2 * i + phase;
                let prev = (i + n - 1) % n;
                let next = (i + 1) % n;
                frame.emit(
                    mesh,
                    vec![frame.at(e), frame.at(e + 1), mids[i], tops[i], mids[prev]],
                );
                frame.emit(mesh, vec![frame.at(e + 1), frame.at(e + 2), mids[i]]);
                frame.emit(mesh, vec![mids[i], tops[next], tops[i]]);
            }
            frame.emit(mesh, tops);
        }
    }
}
