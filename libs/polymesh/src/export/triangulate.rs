//! Polygon triangulation for export.
//!
//! Convex loops are fanned from their first corner. Anything else goes
//! through ear clipping in the face plane, falling back to a fan for the
//! remainder if no ear can be found.

use config::constants::EPSILON;
use glam::{DVec2, DVec3};
use robust::{orient2d, Coord};

/// Triangulates one face loop.
///
/// Returns triangles as indices into `points`, wound the same way as the
/// loop.
pub fn triangulate_loop(points: &[DVec3], normal: DVec3) -> Vec<[usize; 3]> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }
    if n == 3 {
        return vec![[0, 1, 2]];
    }
    let flat = project(points, normal);
    if is_convex(&flat) {
        return fan(0..n);
    }
    ear_clip(&flat)
}

fn fan(corners: impl IntoIterator<Item = usize>) -> Vec<[usize; 3]> {
    let corners: Vec<usize> = corners.into_iter().collect();
    corners
        .windows(2)
        .skip(1)
        .map(|w| [corners[0], w[0], w[1]])
        .collect()
}

/// Drops the loop into 2D so that its winding is counter-clockwise.
fn project(points: &[DVec3], normal: DVec3) -> Vec<DVec2> {
    let normal = if normal.length_squared() < EPSILON {
        DVec3::Y
    } else {
        normal.normalize()
    };
    let u = normal.any_orthonormal_vector();
    let v = normal.cross(u);
    points.iter().map(|p| DVec2::new(p.dot(u), p.dot(v))).collect()
}

fn orient(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    orient2d(
        Coord { x: a.x, y: a.y },
        Coord { x: b.x, y: b.y },
        Coord { x: c.x, y: c.y },
    )
}

fn is_convex(flat: &[DVec2]) -> bool {
    let n = flat.len();
    (0..n).all(|i| orient(flat[i], flat[(i + 1) % n], flat[(i + 2) % n]) >= 0.0)
}

fn inside_triangle(p: DVec2, a: DVec2, b: DVec2, c: DVec2) -> bool {
    orient(a, b, p) >= 0.0 && orient(b, c, p) >= 0.0 && orient(c, a, p) >= 0.0
}

fn ear_clip(flat: &[DVec2]) -> Vec<[usize; 3]> {
    let mut remaining: Vec<usize> = (0..flat.len()).collect();
    let mut triangles = Vec::with_capacity(flat.len() - 2);

    while remaining.len() > 3 {
        let m = remaining.len();
        let ear = (0..m).find(|&i| {
            let (a, b, c) = (
                remaining[(i + m - 1) % m],
                remaining[i],
                remaining[(i + 1) % m],
            );
            if orient(flat[a], flat[b], flat[c]) <= 0.0 {
                return false;
            }
            !remaining
                .iter()
                .filter(|&&p| p != a && p != b && p != c)
                .any(|&p| {
                    flat[p] != flat[a]
                        && flat[p] != flat[b]
                        && flat[p] != flat[c]
                        && inside_triangle(flat[p], flat[a], flat[b], flat[c])
                })
        });
        let Some(i) = ear else {
            // Self-intersecting or degenerate: fan whatever is left.
            triangles.extend(fan(remaining));
            return triangles;
        };
        triangles.push([
            remaining[(i + m - 1) % m],
            remaining[i],
            remaining[(i + 1) % m],
        ]);
        remaining.remove(i);
    }
    triangles.push([remaining[0], remaining[1], remaining[2]]);
    triangles
}
