//! # Waterman Polyhedra
//!
//! Convex hulls of the face-centred cubic lattice points (integer points
//! with an even coordinate sum) that lie within `sqrt(2 · root)` of one of
//! five fixed centers.

use config::constants::MAX_WATERMAN_ROOT;
use glam::DVec3;
use polymesh::hull::convex_hull;
use polymesh::{PolyError, PolyMesh, PolyResult};
use tracing::debug;

const CENTERS: [DVec3; 5] = [
    DVec3::ZERO,
    DVec3::new(0.5, 0.5, 0.0),
    DVec3::new(1.0 / 3.0, 1.0 / 3.0, 2.0 / 3.0),
    DVec3::new(0.5, 0.5, 0.5),
    DVec3::new(1.0, 0.0, 0.0),
];

/// Builds the Waterman polyhedron of `root` around center `c`, centred on
/// the origin and scaled to unit circumradius.
///
/// # Errors
///
/// `DegenerateParameters` when `root` is 0, above `MAX_WATERMAN_ROOT`, or
/// too small to enclose a solid around the chosen center;
/// `UnrecognizedTypeName` when `c > 4`.
///
/// # Example
///
/// ```rust
/// use polyhydra::generators::waterman::build;
///
/// // Root 1 around the origin is the cuboctahedron.
/// let mesh = build(1, 0).unwrap();
/// assert_eq!(mesh.vertex_count(), 12);
/// assert_eq!(mesh.face_count(), 14);
/// ```
pub fn build(root: u32, c: u32) -> PolyResult<PolyMesh> {
    if root == 0 || root > MAX_WATERMAN_ROOT {
        return Err(PolyError::degenerate(format!(
            "Waterman root must be in 1..={MAX_WATERMAN_ROOT}, got {root}"
        )));
    }
    let center = usize::try_from(c)
        .ok()
        .and_then(|i| CENTERS.get(i).copied())
        .ok_or_else(|| PolyError::unrecognized("waterman center", c.to_string()))?;

    let limit = 2.0 * f64::from(root);
    let reach = limit.sqrt().ceil() as i64 + 1;
    let mut points = Vec::new();
    for x in -reach..=reach {
        for y in -reach..=reach {
            for z in -reach..=reach {
                if (x + y + z).rem_euclid(2) != 0 {
                    continue;
                }
                let p = DVec3::new(x as f64, y as f64, z as f64);
                if p.distance_squared(center) <= limit + 1e-9 {
                    points.push(p - center);
                }
            }
        }
    }
    debug!(root, c, points = points.len(), "waterman lattice points");

    let hull = convex_hull(&points).ok_or_else(|| {
        PolyError::degenerate(format!("Waterman root {root} around center {c} is flat"))
    })?;
    let radius = hull
        .vertices()
        .iter()
        .map(|p| p.length())
        .fold(0.0, f64::max);
    Ok(hull.transformed(|p| p / radius))
}
