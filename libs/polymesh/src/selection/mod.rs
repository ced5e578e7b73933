//! # Face Selection
//!
//! Predicates restricting which elements an operator transforms. The same
//! [`FaceSelection`] is evaluated over faces by face operators and over
//! vertices by vertex-centred operators:
//!
//! | Criterion   | Face                  | Vertex                         |
//! |-------------|-----------------------|--------------------------------|
//! | sides       | loop length           | valence                        |
//! | direction   | face normal           | vertex normal                  |
//! | role        | face role             | vertex role                    |
//! | index       | face index            | vertex index                   |
//! | inner/outer | touches the boundary  | lies on the boundary           |
//! | position    | centroid              | position                       |
//! | area        | face area             | mean area of incident faces    |

use crate::mesh::{PolyMesh, Roles};
use config::constants::{approx_zero, DEFAULT_SEED, EPSILON, STRAIGHT_FACING_DOT};
use glam::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::PolyError;
use crate::registry::normalize_name;

macro_rules! selections {
    ($($name:ident),* $(,)?) => {
        /// Predicate over faces (or vertices) of a mesh.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        #[allow(missing_docs)]
        pub enum FaceSelection {
            #[default]
            $($name,)*
        }

        impl FaceSelection {
            /// Every selection in declaration order.
            pub const ALL: &'static [FaceSelection] = &[$(FaceSelection::$name,)*];

            /// Canonical name.
            pub fn name(self) -> &'static str {
                match self {
                    $(FaceSelection::$name => stringify!($name),)*
                }
            }
        }
    };
}

selections! {
    All,
    ThreeSided, FourSided, FiveSided, SixSided, SevenSided, EightSided, NineSided,
    TenSided, ElevenSided, TwelveSided, PSided, QSided, EvenSided, OddSided,
    FacingUp, FacingStraightUp, FacingDown, FacingStraightDown, FacingForward,
    FacingBackward, FacingStraightForward, FacingStraightBackward, FacingLevel,
    FacingCenter, FacingIn, FacingOut,
    Ignored, Existing, New, NewAlt, AllNew,
    Odd, Even, OnlyFirst, ExceptFirst, OnlyLast, ExceptLast, Random,
    Inner, Outer,
    TopHalf,
    Smaller, Larger,
    None,
}

impl fmt::Display for FaceSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FaceSelection {
    type Err = PolyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_name(s);
        FaceSelection::ALL
            .iter()
            .copied()
            .find(|sel| normalize_name(sel.name()) == wanted)
            .ok_or_else(|| PolyError::unrecognized("face selection", s))
    }
}

// =============================================================================
// ELEMENT FEATURES
// =============================================================================

/// Per-element values the predicates look at.
#[derive(Debug, Clone, Copy)]
struct Element {
    sides: usize,
    normal: DVec3,
    position: DVec3,
    role: Roles,
    boundary: bool,
    area: f64,
}

fn face_elements(mesh: &PolyMesh) -> Vec<Element> {
    let topo = mesh.topology();
    (0..mesh.face_count())
        .map(|f| Element {
            sides: mesh.face(f).len(),
            normal: mesh.face_normal(f),
            position: mesh.face_centroid(f),
            role: mesh.face_roles()[f],
            boundary: topo
                .face_half_edges(f)
                .any(|h| topo.half_edge(h).twin.is_none()),
            area: mesh.face_area(f),
        })
        .collect()
}

fn vertex_elements(mesh: &PolyMesh) -> Vec<Element> {
    let topo = mesh.topology();
    let normals = mesh.vertex_normals();
    let incident = mesh.vertex_faces();
    let areas: Vec<f64> = (0..mesh.face_count()).map(|f| mesh.face_area(f)).collect();
    (0..mesh.vertex_count())
        .map(|v| {
            let faces = &incident[v];
            let area = if faces.is_empty() {
                0.0
            } else {
                faces.iter().map(|&f| areas[f]).sum::<f64>() / faces.len() as f64
            };
            Element {
                sides: topo.neighbors(v).len(),
                normal: normals[v],
                position: mesh.vertices()[v],
                role: mesh.vertex_roles()[v],
                boundary: topo.is_boundary_vertex(v),
                area,
            }
        })
        .collect()
}

// =============================================================================
// SELECTION
// =============================================================================

/// Evaluates `selection` over the faces of `mesh`.
///
/// # Example
///
/// ```rust
/// use polymesh::selection::{select_faces, FaceSelection};
/// use polymesh::PolyMesh;
/// use glam::DVec3;
///
/// let tri = PolyMesh::new(vec![DVec3::ZERO, DVec3::X, DVec3::Z], vec![vec![0, 2, 1]]).unwrap();
/// assert_eq!(select_faces(&tri, FaceSelection::ThreeSided, None), vec![true]);
/// ```
pub fn select_faces(mesh: &PolyMesh, selection: FaceSelection, seed: Option<u64>) -> Vec<bool> {
    select(&face_elements(mesh), mesh.center(), selection, seed)
}

/// Evaluates `selection` over the vertices of `mesh`.
pub fn select_vertices(
    mesh: &PolyMesh,
    selection: FaceSelection,
    seed: Option<u64>,
) -> Vec<bool> {
    select(&vertex_elements(mesh), mesh.center(), selection, seed)
}

fn select(
    elements: &[Element],
    center: DVec3,
    selection: FaceSelection,
    seed: Option<u64>,
) -> Vec<bool> {
    use FaceSelection as S;
    let count = elements.len();
    match selection {
        S::All => return vec![true; count],
        S::None => return vec![false; count],
        S::Random => {
            let mut rng = StdRng::seed_from_u64(seed.unwrap_or(DEFAULT_SEED));
            return (0..count).map(|_| rng.random_bool(0.5)).collect();
        }
        _ => {}
    }

    let common_sides = most_common_sides(elements);
    let mean_area = if count == 0 {
        0.0
    } else {
        elements.iter().map(|e| e.area).sum::<f64>() / count as f64
    };

    elements
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let n = e.normal;
            let outward = e.position - center;
            match selection {
                S::ThreeSided => e.sides == 3,
                S::FourSided => e.sides == 4,
                S::FiveSided => e.sides == 5,
                S::SixSided => e.sides == 6,
                S::SevenSided => e.sides == 7,
                S::EightSided => e.sides == 8,
                S::NineSided => e.sides == 9,
                S::TenSided => e.sides == 10,
                S::ElevenSided => e.sides == 11,
                S::TwelveSided => e.sides == 12,
                S::PSided => Some(e.sides) == common_sides,
                S::QSided => Some(e.sides) != common_sides,
                S::EvenSided => e.sides % 2 == 0,
                S::OddSided => e.sides % 2 == 1,
                S::FacingUp => n.y > EPSILON,
                S::FacingStraightUp => n.y > STRAIGHT_FACING_DOT,
                S::FacingDown => n.y < -EPSILON,
                S::FacingStraightDown => n.y < -STRAIGHT_FACING_DOT,
                S::FacingForward => n.z > EPSILON,
                S::FacingBackward => n.z < -EPSILON,
                S::FacingStraightForward => n.z > STRAIGHT_FACING_DOT,
                S::FacingStraightBackward => n.z < -STRAIGHT_FACING_DOT,
                S::FacingLevel => approx_zero(n.y),
                S::FacingCenter => n.dot(outward.normalize_or_zero()).abs() > STRAIGHT_FACING_DOT,
                S::FacingIn => n.dot(outward) < 0.0,
                S::FacingOut => n.dot(outward) > 0.0,
                S::Ignored => e.role == Roles::Ignored,
                S::Existing => e.role == Roles::Existing,
                S::New => e.role == Roles::New,
                S::NewAlt => e.role == Roles::NewAlt,
                S::AllNew => matches!(e.role, Roles::New | Roles::NewAlt),
                S::Odd => i % 2 == 1,
                S::Even => i % 2 == 0,
                S::OnlyFirst => i == 0,
                S::ExceptFirst => i != 0,
                S::OnlyLast => i + 1 == count,
                S::ExceptLast => i + 1 != count,
                S::Inner => !e.boundary,
                S::Outer => e.boundary,
                S::TopHalf => e.position.y > center.y,
                S::Smaller => e.area < mean_area,
                S::Larger => e.area > mean_area,
                S::All => true,
                S::None | S::Random => false,
            }
        })
        .collect()
}

/// Most frequent side count; ties go to the smaller count.
fn most_common_sides(elements: &[Element]) -> Option<usize> {
    let mut histogram: BTreeMap<usize, usize> = BTreeMap::new();
    for e in elements {
        *histogram.entry(e.sides).or_default() += 1;
    }
    histogram
        .into_iter()
        .fold(None, |best: Option<(usize, usize)>, (sides, n)| match best {
            Some((_, m)) if m >= n => best,
            _ => Some((sides, n)),
        })
        .map(|(sides, _)| sides)
}

#[cfg(test)]
mod tests;
