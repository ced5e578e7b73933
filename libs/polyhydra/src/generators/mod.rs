//! # Generators
//!
//! Pure builders for base polyhedra. Each family takes typed parameters and
//! returns a fresh [`PolyMesh`]; nothing depends on previously applied
//! operators.
//!
//! ## Families
//!
//! - **uniform**: Platonic, Archimedean and prismatic solids by Wythoff
//!   construction, plus the Kepler–Poinsot star polyhedra
//! - **radial**: prisms, pyramids, cupolae, rotundae and their elongations
//! - **johnson**: the Johnson solids J1–J48 built from radial layouts
//! - **waterman**: convex hulls of FCC lattice points inside a sphere
//! - **grid**: Archimedean tilings mapped onto simple shapes
//! - **various**: subdivided box and UV spheres
//! - **shapes**: single flat faces (polygons and letter outlines)
//! - **notation**: Conway notation strings such as `"tkC"`
//!
//! ## Example
//!
//! ```rust
//! use polyhydra::generators::{build, GeneratorSpec, GridShape, GridType};
//!
//! let grid = build(&GeneratorSpec::Grid {
//!     grid: GridType::K_4_4_4_4,
//!     shape: GridShape::Plane,
//!     x: 4,
//!     y: 4,
//! })
//! .unwrap();
//! assert_eq!(grid.face_count(), 16);
//! assert_eq!(grid.vertex_count(), 25);
//! ```

/// Declares a fieldless enum with `ALL`, `name()`, `Display` and a
/// spelling-tolerant `FromStr` that fails with `UnrecognizedTypeName`.
macro_rules! named_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident as $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $($(#[$vmeta])* $variant,)*
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)*];

            /// Canonical name.
            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant),)*
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }

        impl std::str::FromStr for $name {
            type Err = polymesh::PolyError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = $crate::generators::normalize(s);
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| $crate::generators::normalize(v.name()) == wanted)
                    .ok_or_else(|| polymesh::PolyError::unrecognized($kind, s))
            }
        }
    };
}

pub mod grid;
pub mod johnson;
pub mod notation;
pub mod radial;
pub mod shapes;
pub mod uniform;
pub mod various;
pub mod waterman;

pub use grid::{GridShape, GridType};
pub use radial::RadialPolyType;
pub use shapes::ShapeType;
pub use uniform::UniformCategory;
pub use various::VariousSolidType;

use config::constants::QUANTIZE_SCALE;
use glam::DVec3;
use polymesh::{PolyMesh, PolyResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

// =============================================================================
// GENERATOR SPECS
// =============================================================================

/// Generator family of an [`crate::EditableModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeneratorType {
    /// Raw vertices and faces supplied by the host.
    GeometryData,
    /// Archimedean tiling on a shape.
    Grid,
    /// Single flat faces.
    Shapes,
    /// Radially symmetric solids.
    Radial,
    /// Waterman polyhedra.
    Waterman,
    /// Johnson solids.
    Johnson,
    /// Conway notation string.
    ConwayString,
    /// Uniform polyhedra.
    Uniform,
    /// Box and UV spheres.
    Various,
}

impl fmt::Display for GeneratorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Typed parameters for one generator call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "generator", rename_all = "snake_case")]
pub enum GeneratorSpec {
    /// Uniform polyhedron by name or Wythoff symbol.
    Uniform {
        /// Name such as `"truncated cube"` or a symbol such as `"2 3|4"`.
        name: String,
    },
    /// Johnson solid by number (`"J27"`) or name.
    Johnson {
        /// Number or name.
        name: String,
    },
    /// Radial solid family with a side count.
    Radial {
        /// Family.
        kind: RadialPolyType,
        /// Sides of the base polygon.
        sides: usize,
    },
    /// Waterman polyhedron.
    Waterman {
        /// Squared radius divided by two.
        root: u32,
        /// Center index, `0..=4`.
        c: u32,
    },
    /// Tiling of `x × y` cells mapped onto a shape.
    Grid {
        /// Tiling.
        grid: GridType,
        /// Target surface.
        shape: GridShape,
        /// Cells along the first lattice vector.
        x: usize,
        /// Cells along the second lattice vector.
        y: usize,
    },
    /// Box or UV sphere.
    Various {
        /// Solid.
        kind: VariousSolidType,
        /// First resolution parameter.
        x: usize,
        /// Second resolution parameter.
        y: usize,
        /// Third resolution parameter (box only).
        z: usize,
    },
    /// Flat single-face shape.
    Shapes {
        /// Outline.
        kind: ShapeType,
        /// Sides (polygon only).
        sides: usize,
    },
    /// Conway notation string.
    ConwayString {
        /// Notation such as `"tkC"`.
        notation: String,
    },
    /// Raw geometry.
    GeometryData {
        /// Vertex positions.
        vertices: Vec<DVec3>,
        /// Face loops.
        faces: Vec<Vec<usize>>,
    },
}

impl GeneratorSpec {
    /// Family this spec belongs to.
    pub fn generator_type(&self) -> GeneratorType {
        match self {
            Self::Uniform { .. } => GeneratorType::Uniform,
            Self::Johnson { .. } => GeneratorType::Johnson,
            Self::Radial { .. } => GeneratorType::Radial,
            Self::Waterman { .. } => GeneratorType::Waterman,
            Self::Grid { .. } => GeneratorType::Grid,
            Self::Various { .. } => GeneratorType::Various,
            Self::Shapes { .. } => GeneratorType::Shapes,
            Self::ConwayString { .. } => GeneratorType::ConwayString,
            Self::GeometryData { .. } => GeneratorType::GeometryData,
        }
    }
}

/// Builds the base mesh described by `spec`.
///
/// # Errors
///
/// `UnrecognizedTypeName` for unknown names, `DegenerateParameters` for
/// resolution parameters below the family minimum and `InvalidMesh` for raw
/// geometry that references missing vertices.
pub fn build(spec: &GeneratorSpec) -> PolyResult<PolyMesh> {
    let mesh = match spec {
        GeneratorSpec::Uniform { name } => uniform::build(name)?,
        GeneratorSpec::Johnson { name } => johnson::build(name)?,
        GeneratorSpec::Radial { kind, sides } => radial::build(*kind, *sides)?,
        GeneratorSpec::Waterman { root, c } => waterman::build(*root, *c)?,
        GeneratorSpec::Grid { grid, shape, x, y } => grid::build(*grid, *shape, *x, *y)?,
        GeneratorSpec::Various { kind, x, y, z } => various::build(*kind, *x, *y, *z)?,
        GeneratorSpec::Shapes { kind, sides } => shapes::build(*kind, *sides)?,
        GeneratorSpec::ConwayString { notation } => notation::build(notation)?,
        GeneratorSpec::GeometryData { vertices, faces } => {
            PolyMesh::new(vertices.clone(), faces.clone())?
        }
    };
    debug!(
        generator = %spec.generator_type(),
        counts = %mesh.counts(),
        "built base mesh"
    );
    Ok(mesh)
}

// =============================================================================
// SHARED HELPERS
// =============================================================================

/// Lower-cases and strips separators (`_`, `-`, `,`, whitespace) so host names match
/// regardless of spelling style.
pub(crate) fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '_' | '-' | ',' | ' ' | '\t'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Point on a horizontal circle; increasing `angle` runs counter-clockwise
/// seen from +Y.
pub(crate) fn polar(radius: f64, angle: f64, y: f64) -> DVec3 {
    DVec3::new(radius * angle.cos(), y, -radius * angle.sin())
}

/// Collects faces over positions that are welded on the fly.
///
/// Positions closer than `1 / QUANTIZE_SCALE` share one vertex.
#[derive(Default)]
pub(crate) struct WeldedMesh {
    vertices: Vec<DVec3>,
    faces: Vec<Vec<usize>>,
    lookup: HashMap<(i64, i64, i64), usize>,
}

impl WeldedMesh {
    pub(crate) fn vertex(&mut self, p: DVec3) -> usize {
        let q = (p * QUANTIZE_SCALE).round();
        let key = (q.x as i64, q.y as i64, q.z as i64);
        if let Some(&v) = self.lookup.get(&key) {
            return v;
        }
        self.vertices.push(p);
        self.lookup.insert(key, self.vertices.len() - 1);
        self.vertices.len() - 1
    }

    /// Adds a face; repeated corners are collapsed and faces left with fewer
    /// than three corners are dropped.
    pub(crate) fn face(&mut self, corners: impl IntoIterator<Item = DVec3>) {
        let mut loop_: Vec<usize> = Vec::new();
        for p in corners {
            let v = self.vertex(p);
            if loop_.last() != Some(&v) {
                loop_.push(v);
            }
        }
        if loop_.len() > 1 && loop_.first() == loop_.last() {
            loop_.pop();
        }
        if loop_.len() >= 3 {
            self.faces.push(loop_);
        }
    }

    pub(crate) fn build(self) -> PolyResult<PolyMesh> {
        PolyMesh::new(self.vertices, self.faces)
    }
}

#[cfg(test)]
mod tests;
