//! # Various Solids
//!
//! Subdivided boxes and latitude/longitude spheres.

use super::{polar, WeldedMesh};
use config::constants::MIN_POLYGON_SIDES;
use glam::DVec3;
use polymesh::{PolyError, PolyMesh, PolyResult};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

named_enum! {
    /// Primitive solids with resolution parameters.
    pub enum VariousSolidType as "various solid" {
        /// Unit cube with `x × y × z` segments.
        Box,
        /// Sphere with `x` longitudes and `y` latitude bands.
        UvSphere,
        /// Upper half sphere with `x` longitudes, `y` bands and a flat base.
        UvHemisphere,
    }
}

/// Builds `kind`; `z` is only read by `Box`.
///
/// # Errors
///
/// `DegenerateParameters` when a resolution is below the solid's minimum.
///
/// # Example
///
/// ```rust
/// use polyhydra::generators::various::build;
/// use polyhydra::generators::VariousSolidType;
///
/// let sphere = build(VariousSolidType::UvSphere, 8, 4, 0).unwrap();
/// assert_eq!(sphere.vertex_count(), 8 * 3 + 2);
/// assert_eq!(sphere.face_count(), 8 * 4);
/// ```
pub fn build(kind: VariousSolidType, x: usize, y: usize, z: usize) -> PolyResult<PolyMesh> {
    match kind {
        VariousSolidType::Box => subdivided_box([x, y, z]),
        VariousSolidType::UvSphere => uv_sphere(x, y, false),
        VariousSolidType::UvHemisphere => uv_sphere(x, y, true),
    }
}

fn subdivided_box(segments: [usize; 3]) -> PolyResult<PolyMesh> {
    if segments.contains(&0) {
        return Err(PolyError::degenerate(format!(
            "box needs at least one segment per axis, got {segments:?}"
        )));
    }
    let point = |cell: [usize; 3]| {
        DVec3::from_array(
            [0, 1, 2].map(|axis| cell[axis] as f64 / segments[axis] as f64 - 0.5),
        )
    };

    let mut mesh = WeldedMesh::default();
    for a in 0..3 {
        let (b, c) = ((a + 1) % 3, (a + 2) % 3);
        for max_side in [false, true] {
            for i in 0..segments[b] {
                for j in 0..segments[c] {
                    let corner = |di: usize, dj: usize| {
                        let mut cell = [0; 3];
                        cell[a] = if max_side { segments[a] } else { 0 };
                        cell[b] = i + di;
                        cell[c] = j + dj;
                        point(cell)
                    };
                    let mut quad = vec![corner(0, 0), corner(1, 0), corner(1, 1), corner(0, 1)];
                    if !max_side {
                        quad.reverse();
                    }
                    mesh.face(quad);
                }
            }
        }
    }
    mesh.build()
}

fn uv_sphere(longitudes: usize, bands: usize, hemisphere: bool) -> PolyResult<PolyMesh> {
    let min_bands = if hemisphere { 1 } else { 2 };
    if longitudes < MIN_POLYGON_SIDES || bands < min_bands {
        return Err(PolyError::degenerate(format!(
            "uv sphere needs at least {MIN_POLYGON_SIDES} longitudes and {min_bands} bands, \
             got {longitudes}×{bands}"
        )));
    }
    // Polar angle from the bottom pole.
    let (start, span) = if hemisphere { (FRAC_PI_2, FRAC_PI_2) } else { (0.0, PI) };
    let point = |i: usize, j: usize| {
        let phi = start + span * j as f64 / bands as f64;
        polar(phi.sin(), TAU * i as f64 / longitudes as f64, -phi.cos())
    };

    let mut mesh = WeldedMesh::default();
    for j in 0..bands {
        for i in 0..longitudes {
            let k = i + 1;
            mesh.face([point(i, j), point(k, j), point(k, j + 1), point(i, j + 1)]);
        }
    }
    if hemisphere {
        mesh.face((0..longitudes).rev().map(|i| point(i, 0)));
    }
    mesh.build()
}
