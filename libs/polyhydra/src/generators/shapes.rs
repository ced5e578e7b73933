//! # Shapes
//!
//! Single flat faces in the XZ plane facing +Y: regular polygons with unit
//! edges and letter outlines drawn on a 3 × 3 unit grid.

use super::radial::ring_radius;
use super::polar;
use config::constants::MIN_POLYGON_SIDES;
use glam::DVec3;
use polymesh::{PolyError, PolyMesh, PolyResult};
use std::f64::consts::TAU;

named_enum! {
    /// Flat outlines.
    pub enum ShapeType as "shape" {
        /// Regular polygon.
        Polygon,
        /// L outline.
        LShape,
        /// L outline with the long arm on the right.
        LAltShape,
        /// C outline.
        CShape,
        /// H outline.
        HShape,
    }
}

impl ShapeType {
    /// Outline on the 3 × 3 grid, counter-clockwise.
    fn outline(self) -> &'static [(f64, f64)] {
        match self {
            Self::Polygon => &[],
            Self::LShape => &[(0.0, 0.0), (3.0, 0.0), (3.0, 1.0), (1.0, 1.0), (1.0, 3.0), (0.0, 3.0)],
            Self::LAltShape => {
                &[(0.0, 0.0), (3.0, 0.0), (3.0, 3.0), (2.0, 3.0), (2.0, 1.0), (0.0, 1.0)]
            }
            Self::CShape => &[
                (0.0, 0.0),
                (3.0, 0.0),
                (3.0, 1.0),
                (1.0, 1.0),
                (1.0, 2.0),
                (3.0, 2.0),
                (3.0, 3.0),
                (0.0, 3.0),
            ],
            Self::HShape => &[
                (0.0, 0.0),
                (1.0, 0.0),
                (1.0, 1.0),
                (2.0, 1.0),
                (2.0, 0.0),
                (3.0, 0.0),
                (3.0, 3.0),
                (2.0, 3.0),
                (2.0, 2.0),
                (1.0, 2.0),
                (1.0, 3.0),
                (0.0, 3.0),
            ],
        }
    }
}

/// Builds a one-face mesh; `sides` is only read by `Polygon`.
///
/// # Errors
///
/// `DegenerateParameters` for a polygon with fewer than 3 sides.
pub fn build(kind: ShapeType, sides: usize) -> PolyResult<PolyMesh> {
    let points: Vec<DVec3> = if kind == ShapeType::Polygon {
        if sides < MIN_POLYGON_SIDES {
            return Err(PolyError::degenerate(format!(
                "polygon needs at least {MIN_POLYGON_SIDES} sides, got {sides}"
            )));
        }
        let radius = ring_radius(sides);
        (0..sides)
            .map(|i| polar(radius, TAU * i as f64 / sides as f64, 0.0))
            .collect()
    } else {
        kind.outline()
            .iter()
            .map(|&(x, y)| DVec3::new(x / 3.0 - 0.5, 0.0, 0.5 - y / 3.0))
            .collect()
    };
    let face = (0..points.len()).collect();
    PolyMesh::new(points, vec![face])
}
