//! # Operator Registry
//!
//! Static metadata for every operator: amount ranges, whether a face
//! selection or randomization applies, and the 3×3 matrix predicting output
//! vertex/edge/face counts from input counts.
//!
//! ## Lookup
//!
//! [`Operator`] is a closed enum; string names only exist at the host
//! boundary through [`std::str::FromStr`] and [`std::fmt::Display`].
//!
//! ```rust
//! use polymesh::registry::{config_by_name, Operator};
//!
//! let kis = config_by_name("kis").unwrap();
//! assert!(kis.uses_faces);
//! assert_eq!(Operator::Kis.config().amount_default, 0.1);
//! ```
//!
//! ## Count prediction
//!
//! `v' = m00·V + m01·E + m02·F` and likewise for `e'` and `f'`. Predictions
//! are advisory: filtered applications, and the Medial family for more than
//! one subdivision, may disagree with the executor.

use crate::error::{PolyError, PolyResult};
use crate::mesh::{PolyMesh, Vef};
use crate::selection::FaceSelection;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// OPERATOR ENUM
// =============================================================================

macro_rules! operators {
    ($($kind:ident => [$($name:ident),* $(,)?]),* $(,)?) => {
        /// Every operator the executor understands.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[allow(missing_docs)]
        pub enum Operator {
            $($($name,)*)*
        }

        impl Operator {
            /// All operators in registry order.
            pub const ALL: &'static [Operator] = &[$($(Operator::$name,)*)*];

            /// Canonical name, as used in recipes and host calls.
            pub fn name(self) -> &'static str {
                match self {
                    $($(Operator::$name => stringify!($name),)*)*
                }
            }

            /// Broad family the operator belongs to.
            pub fn kind(self) -> OperatorKind {
                match self {
                    $($(Operator::$name => OperatorKind::$kind,)*)*
                }
            }
        }
    };
}

operators! {
    Conway => [
        Identity, Kis, Dual, Ambo, Zip, Expand, Bevel, Join, Needle, Ortho, Meta,
        Truncate, Gyro, Snub, Subdivide, Loft, Chamfer, Quinto, Lace, JoinedLace,
        OppositeLace, JoinKisKis, Stake, JoinStake, Medial, EdgeMedial, Propeller,
        Whirl, Volute, Exalt, Yank, Cross, Squall, JoinSquall,
    ],
    Face => [
        SplitFaces, Gable, FaceOffset, Extrude, Shell, Skeleton, Segment, FaceScale,
        FaceRotate, FaceRotateX, FaceRotateY, FaceSlide, FaceRemove, FaceRemoveX,
        FaceRemoveY, FaceRemoveZ, FaceRemoveDistance, FaceRemovePolar, FillHoles,
        ExtendBoundaries, ConnectFaces, FaceMerge, FaceKeep, Layer, Stack, TagFaces,
    ],
    Vertex => [
        VertexScale, VertexRotate, VertexFlex, VertexStellate, VertexRemove,
        VertexKeep, Weld,
    ],
    Geometric => [
        Canonicalize, Spherize, Cylinderize, Stretch, Recenter, SitLevel, Hinge,
        ConvexHull,
    ],
    Compositional => [
        AddDual, AddCopyX, AddCopyY, AddCopyZ, AddMirrorX, AddMirrorY, AddMirrorZ,
        Stash, Unstash, UnstashToFaces, UnstashToVerts,
    ],
}

/// Operator families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    /// Topological rewrites from Conway notation.
    Conway,
    /// Face-level surgery.
    Face,
    /// Vertex moves and removals.
    Vertex,
    /// Position-only transforms.
    Geometric,
    /// Operators that combine meshes or use the stash.
    Compositional,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lower-cases and strips `_`, `-` and whitespace.
pub(crate) fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '_' | '-') && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for Operator {
    type Err = PolyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_name(s);
        Operator::ALL
            .iter()
            .copied()
            .find(|op| normalize_name(op.name()) == wanted)
            .ok_or_else(|| PolyError::unknown_operator(s))
    }
}

// =============================================================================
// OPERATOR CONFIG
// =============================================================================

/// Integer matrix mapping `(V, E, F)` to predicted output counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountMatrix(pub [[u64; 3]; 3]);

impl CountMatrix {
    /// Applies the matrix with overflow checks.
    pub fn apply(&self, input: Vef) -> Option<Vef> {
        let x = [
            input.vertices as u64,
            input.edges as u64,
            input.faces as u64,
        ];
        let row = |r: &[u64; 3]| -> Option<usize> {
            let mut sum: u64 = 0;
            for (m, n) in r.iter().zip(x) {
                sum = sum.checked_add(m.checked_mul(n)?)?;
            }
            usize::try_from(sum).ok()
        };
        Some(Vef::new(row(&self.0[0])?, row(&self.0[1])?, row(&self.0[2])?))
    }
}

/// Static descriptor of one operator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpConfig {
    /// Whether `amount` has any effect.
    pub uses_amount: bool,
    /// Value used when the caller leaves `amount` unset.
    pub amount_default: f64,
    /// Lower bound of the full range.
    pub amount_min: f64,
    /// Upper bound of the full range.
    pub amount_max: f64,
    /// Lower bound of the non-degenerate range.
    pub amount_safe_min: f64,
    /// Upper bound of the non-degenerate range.
    pub amount_safe_max: f64,
    /// Whether `amount2` has any effect.
    pub uses_amount2: bool,
    /// Value used when the caller leaves `amount2` unset.
    pub amount2_default: f64,
    /// Lower bound of the full `amount2` range.
    pub amount2_min: f64,
    /// Upper bound of the full `amount2` range.
    pub amount2_max: f64,
    /// Lower bound of the non-degenerate `amount2` range.
    pub amount2_safe_min: f64,
    /// Upper bound of the non-degenerate `amount2` range.
    pub amount2_safe_max: f64,
    /// Whether a face selection restricts the operator.
    pub uses_faces: bool,
    /// Whether per-element randomized amounts are supported.
    pub uses_randomize: bool,
    /// Selection hosts should offer by default.
    pub face_selection: FaceSelection,
    /// Count prediction, if the operator has one.
    pub matrix: Option<CountMatrix>,
}

impl OpConfig {
    /// Baseline every entry overrides.
    pub const DEFAULT: OpConfig = OpConfig {
        uses_amount: true,
        amount_default: 0.0,
        amount_min: -20.0,
        amount_max: 20.0,
        amount_safe_min: -10.0,
        amount_safe_max: 0.999,
        uses_amount2: false,
        amount2_default: 0.0,
        amount2_min: -20.0,
        amount2_max: 20.0,
        amount2_safe_min: -10.0,
        amount2_safe_max: 0.999,
        uses_faces: false,
        uses_randomize: false,
        face_selection: FaceSelection::All,
        matrix: None,
    };

    /// Clamps `amount` to the safe or full range.
    pub fn clamp_amount(&self, value: f64, safe: bool) -> f64 {
        let (lo, hi) = if safe {
            (self.amount_safe_min, self.amount_safe_max)
        } else {
            (self.amount_min, self.amount_max)
        };
        clamp_range(value, lo, hi)
    }

    /// Clamps `amount2` to the safe or full range.
    pub fn clamp_amount2(&self, value: f64, safe: bool) -> f64 {
        let (lo, hi) = if safe {
            (self.amount2_safe_min, self.amount2_safe_max)
        } else {
            (self.amount2_min, self.amount2_max)
        };
        clamp_range(value, lo, hi)
    }
}

/// Clamp that tolerates inverted bounds.
fn clamp_range(value: f64, a: f64, b: f64) -> f64 {
    value.max(a.min(b)).min(a.max(b))
}

const fn m(rows: [[u64; 3]; 3]) -> Option<CountMatrix> {
    Some(CountMatrix(rows))
}

impl Operator {
    /// Static descriptor for this operator.
    #[inline]
    pub fn config(self) -> &'static OpConfig {
        &CONFIGS[self as usize]
    }
}

/// Descriptor table indexed by operator discriminant.
static CONFIGS: [OpConfig; Operator::ALL.len()] = {
    let mut table = [OpConfig::DEFAULT; Operator::ALL.len()];
    let mut i = 0;
    while i < table.len() {
        table[i] = describe(Operator::ALL[i]);
        i += 1;
    }
    table
};

const fn describe(op: Operator) -> OpConfig {
    use Operator::*;
    const D: OpConfig = OpConfig::DEFAULT;
    match op {
        Identity => OpConfig {
            uses_amount: false,
            matrix: m([[1, 0, 0], [0, 1, 0], [0, 0, 1]]),
            ..D
        },
        Kis => OpConfig {
            uses_faces: true,
            amount_default: 0.1,
            amount_min: -6.0,
            amount_max: 6.0,
            amount_safe_min: -0.5,
            amount_safe_max: 0.999,
            uses_randomize: true,
            matrix: m([[1, 0, 1], [0, 3, 0], [0, 2, 0]]),
            ..D
        },
        Dual => OpConfig {
            uses_amount: false,
            matrix: m([[0, 0, 1], [0, 1, 0], [1, 0, 0]]),
            ..D
        },
        Ambo => OpConfig {
            uses_amount: false,
            matrix: m([[0, 1, 0], [0, 2, 0], [1, 0, 1]]),
            ..D
        },
        Zip => OpConfig {
            amount_default: 0.5,
            amount_min: -2.0,
            amount_max: 2.0,
            amount_safe_min: 0.0001,
            amount_safe_max: 0.999,
            uses_randomize: true,
            matrix: m([[0, 2, 0], [0, 3, 0], [1, 0, 1]]),
            ..D
        },
        Expand => OpConfig {
            amount_default: 0.5,
            amount_min: -4.0,
            amount_max: 4.0,
            amount_safe_min: 0.001,
            amount_safe_max: 0.999,
            matrix: m([[0, 2, 0], [0, 4, 0], [1, 1, 1]]),
            ..D
        },
        Bevel => OpConfig {
            amount_default: 0.25,
            amount_min: -6.0,
            amount_max: 6.0,
            amount_safe_min: 0.001,
            amount_safe_max: 0.4999,
            uses_amount2: true,
            amount2_default: 0.25,
            amount2_min: -6.0,
            amount2_max: 6.0,
            amount2_safe_min: 0.001,
            amount2_safe_max: 0.4999,
            uses_randomize: true,
            matrix: m([[0, 4, 0], [0, 6, 0], [1, 1, 1]]),
            ..D
        },
        Join => OpConfig {
            amount_default: 0.5,
            amount_min: -1.0,
            amount_max: 2.0,
            amount_safe_min: -0.5,
            amount_safe_max: 0.999,
            matrix: m([[1, 0, 1], [0, 2, 0], [0, 1, 0]]),
            ..D
        },
        Needle => OpConfig {
            amount_default: 0.0,
            amount_min: -6.0,
            amount_max: 6.0,
            amount_safe_min: -0.5,
            amount_safe_max: 0.5,
            uses_randomize: true,
            matrix: m([[1, 0, 1], [0, 3, 0], [0, 2, 0]]),
            ..D
        },
        Ortho => OpConfig {
            amount_default: 0.1,
            amount_min: -6.0,
            amount_max: 6.0,
            amount_safe_min: -0.5,
            amount_safe_max: 0.999,
            uses_randomize: true,
            matrix: m([[1, 1, 1], [0, 4, 0], [0, 2, 0]]),
            ..D
        },
        Meta => OpConfig {
            amount_default: 0.0,
            amount_min: -6.0,
            amount_max: 6.0,
            amount_safe_min: -0.333,
            amount_safe_max: 0.666,
            uses_amount2: true,
            amount2_default: 0.0,
            amount2_min: -3.0,
            amount2_max: 3.0,
            amount2_safe_min: -0.5,
            amount2_safe_max: 0.99,
            uses_randomize: true,
            matrix: m([[1, 1, 1], [0, 6, 0], [0, 4, 0]]),
            ..D
        },
        Truncate => OpConfig {
            uses_faces: true,
            amount_default: 0.3,
            amount_min: -6.0,
            amount_max: 6.0,
            amount_safe_min: 0.001,
            amount_safe_max: 0.499,
            uses_randomize: true,
            matrix: m([[0, 2, 0], [0, 3, 0], [1, 0, 1]]),
            ..D
        },
        Gyro => OpConfig {
            amount_default: 0.33,
            amount_min: -0.5,
            amount_max: 0.5,
            amount_safe_min: 0.001,
            amount_safe_max: 0.499,
            uses_amount2: true,
            amount2_min: -3.0,
            amount2_max: 3.0,
            amount2_safe_min: -0.5,
            amount2_safe_max: 1.0,
            matrix: m([[1, 2, 1], [0, 5, 0], [0, 2, 0]]),
            ..D
        },
        Snub => OpConfig {
            amount_default: 0.5,
            amount_min: -1.0,
            amount_max: 1.0,
            amount_safe_min: 0.001,
            amount_safe_max: 0.999,
            matrix: m([[0, 2, 0], [0, 5, 0], [1, 2, 1]]),
            ..D
        },
        Subdivide => OpConfig {
            amount_default: 0.0,
            amount_min: -3.0,
            amount_max: 3.0,
            amount_safe_min: -0.5,
            amount_safe_max: 1.0,
            matrix: m([[0, 1, 1], [0, 4, 0], [1, 2, 0]]),
            ..D
        },
        Loft => OpConfig {
            uses_faces: true,
            amount_default: 0.5,
            amount_min: -4.0,
            amount_max: 4.0,
            amount_safe_min: 0.001,
            amount_safe_max: 0.999,
            uses_amount2: true,
            amount2_min: -3.0,
            amount2_max: 3.0,
            amount2_safe_min: -1.0,
            amount2_safe_max: 1.0,
            uses_randomize: true,
            matrix: m([[1, 2, 0], [0, 5, 0], [0, 2, 1]]),
            ..D
        },
        Chamfer => OpConfig {
            amount_default: 0.5,
            amount_min: -4.0,
            amount_max: 4.0,
            amount_safe_min: 0.001,
            amount_safe_max: 0.999,
            matrix: m([[1, 2, 0], [0, 4, 0], [0, 1, 1]]),
            ..D
        },
        Quinto => OpConfig {
            amount_default: 0.5,
            amount_min: -4.0,
            amount_max: 4.0,
            amount_safe_min: 0.001,
            amount_safe_max: 0.999,
            uses_amount2: true,
            amount2_min: -3.0,
            amount2_max: 3.0,
            amount2_safe_min: -0.5,
            amount2_safe_max: 1.0,
            uses_randomize: true,
            matrix: m([[1, 3, 0], [0, 6, 0], [0, 2, 1]]),
            ..D
        },
        Lace => OpConfig {
            uses_faces: true,
            amount_default: 0.5,
            amount_min: -4.0,
            amount_max: 4.0,
            amount_safe_min: 0.001,
            amount_safe_max: 0.999,
            uses_amount2: true,
            amount2_min: -3.0,
            amount2_max: 3.0,
            amount2_safe_min: -0.5,
            amount2_safe_max: 1.0,
            uses_randomize: true,
            matrix: m([[1, 2, 0], [0, 7, 0], [0, 4, 1]]),
            ..D
        },
        JoinedLace => OpConfig {
            amount_default: 0.5,
            amount_min: -4.0,
            amount_max: 4.0,
            amount_safe_min: 0.001,
            amount_safe_max: 0.999,
            uses_amount2: true,
            amount2_min: -3.0,
            amount2_max: 3.0,
            amount2_safe_min: -0.5,
            amount2_safe_max: 1.0,
            uses_randomize: true,
            matrix: m([[1, 2, 0], [0, 6, 0], [0, 3, 1]]),
            ..D
        },
        OppositeLace => OpConfig {
            amount_default: 0.5,
            amount_min: -4.0,
            amount_max: 4.0,
            amount_safe_min: 0.001,
            amount_safe_max: 0.999,
            uses_amount2: true,
            amount2_min: -3.0,
            amount2_max: 3.0,
            amount2_safe_min: -0.5,
            amount2_safe_max: 1.0,
            uses_randomize: true,
            matrix: m([[1, 2, 0], [0, 7, 0], [0, 4, 1]]),
            ..D
        },
        JoinKisKis => OpConfig {
            amount_default: 0.5,
            amount_min: -4.0,
            amount_max: 4.0,
            amount_safe_min: 0.001,
            amount_safe_max: 0.999,
            uses_amount2: true,
            amount2_min: -3.0,
            amount2_max: 3.0,
            amount2_safe_min: -0.5,
            amount2_safe_max: 1.0,
            matrix: m([[1, 2, 1], [0, 8, 0], [0, 5, 0]]),
            ..D
        },
        Stake => OpConfig {
            uses_faces: true,
            amount_default: 0.5,
            amount_min: -4.0,
            amount_max: 4.0,
            amount_safe_min: 0.001,
            amount_safe_max: 0.999,
            matrix: m([[1, 2, 1], [0, 7, 0], [0, 4, 0]]),
            ..D
        },
        JoinStake => OpConfig {
            amount_default: 0.5,
            amount_min: -4.0,
            amount_max: 4.0,
            amount_safe_min: 0.001,
            amount_safe_max: 0.999,
            matrix: m([[1, 2, 1], [0, 6, 0], [0, 3, 0]]),
            ..D
        },
        Medial => OpConfig {
            amount_default: 2.0,
            amount_min: 2.0,
            amount_max: 8.0,
            amount_safe_min: 1.0,
            amount_safe_max: 6.0,
            uses_amount2: true,
            amount2_min: -3.0,
            amount2_max: 3.0,
            amount2_safe_min: -0.5,
            amount2_safe_max: 1.0,
            matrix: m([[1, 2, 1], [0, 7, 0], [0, 4, 0]]),
            ..D
        },
        EdgeMedial => OpConfig {
            amount_default: 2.0,
            amount_min: 2.0,
            amount_max: 8.0,
            amount_safe_min: 1.0,
            amount_safe_max: 6.0,
            uses_amount2: true,
            amount2_min: -3.0,
            amount2_max: 3.0,
            amount2_safe_min: -0.5,
            amount2_safe_max: 1.0,
            matrix: m([[1, 2, 1], [0, 9, 0], [0, 6, 0]]),
            ..D
        },
        Propeller => OpConfig {
            amount_default: 0.25,
            amount_min: -4.0,
            amount_max: 4.0,
            amount_safe_min: 0.0,
            amount_safe_max: 0.5,
            matrix: m([[1, 2, 0], [0, 5, 0], [0, 2, 1]]),
            ..D
        },
        Whirl => OpConfig {
            amount_default: 0.25,
            amount_min: -4.0,
            amount_max: 4.0,
            amount_safe_min: 0.001,
            amount_safe_max: 0.5,
            matrix: m([[1, 4, 0], [0, 7, 0], [0, 2, 1]]),
            ..D
        },
        Volute => OpConfig {
            amount_default: 0.33,
            amount_min: -4.0,
            amount_max: 4.0,
            amount_safe_min: 0.001,
            amount_safe_max: 0.999,
            matrix: m([[0, 2, 1], [0, 7, 0], [1, 4, 0]]),
            ..D
        },
        Exalt => OpConfig {
            uses_faces: true,
            amount_default: 0.1,
            amount_min: -6.0,
            amount_max: 6.0,
            amount_safe_min: 0.001,
            amount_safe_max: 0.999,
            uses_randomize: true,
            matrix: m([[1, 2, 1], [0, 9, 0], [0, 6, 0]]),
            ..D
        },
        Yank => OpConfig {
            uses_faces: true,
            amount_default: 0.33,
            amount_min: -6.0,
            amount_max: 6.0,
            amount_safe_min: 0.001,
            amount_safe_max: 0.999,
            uses_randomize: true,
            matrix: m([[0, 6, 0], [0, 9, 0], [1, 2, 1]]),
            ..D
        },
        Cross => OpConfig {
            amount_default: 0.5,
            amount_min: -1.0,
            amount_max: 1.0,
            amount_safe_min: -1.0,
            amount_safe_max: 0.999,
            uses_randomize: true,
            matrix: m([[1, 3, 1], [0, 10, 0], [0, 6, 0]]),
            ..D
        },
        Squall => OpConfig {
            amount_default: 0.5,
            amount_min: -4.0,
            amount_max: 4.0,
            amount_safe_min: 0.001,
            amount_safe_max: 0.999,
            matrix: m([[1, 3, 0], [0, 8, 0], [0, 4, 1]]),
            ..D
        },
        JoinSquall => OpConfig {
            amount_default: 0.5,
            amount_min: -4.0,
            amount_max: 4.0,
            amount_safe_min: 0.001,
            amount_safe_max: 0.999,
            matrix: m([[0, 3, 0], [0, 6, 0], [1, 2, 1]]),
            ..D
        },

        // Face operators
        SplitFaces => OpConfig {
            uses_faces: true,
            uses_amount: false,
            ..D
        },
        Gable => OpConfig {
            uses_faces: true,
            amount_default: 0.5,
            amount_min: -4.0,
            amount_max: 4.0,
            amount_safe_min: 0.001,
            amount_safe_max: 0.999,
            uses_amount2: true,
            amount2_min: -3.0,
            amount2_max: 3.0,
            amount2_safe_min: -0.5,
            amount2_safe_max: 1.0,
            uses_randomize: true,
            ..D
        },
        FaceOffset => OpConfig {
            uses_faces: true,
            amount_default: 0.1,
            amount_min: -6.0,
            amount_max: 6.0,
            amount_safe_min: -1.0,
            amount_safe_max: 0.999,
            uses_randomize: true,
            ..D
        },
        Extrude => OpConfig {
            uses_faces: true,
            amount_default: 0.1,
            amount_min: -12.0,
            amount_max: 12.0,
            amount_safe_min: -6.0,
            amount_safe_max: 6.0,
            uses_randomize: true,
            ..D
        },
        Shell => OpConfig {
            amount_default: 0.1,
            amount_min: -6.0,
            amount_max: 6.0,
            amount_safe_min: 0.001,
            amount_safe_max: 0.999,
            ..D
        },
        Skeleton => OpConfig {
            uses_faces: true,
            amount_default: 0.1,
            amount_min: -6.0,
            amount_max: 6.0,
            amount_safe_min: 0.001,
            amount_safe_max: 0.999,
            ..D
        },
        Segment => OpConfig {
            uses_faces: true,
            amount_default: 0.5,
            amount_min: -3.0,
            amount_max: 3.0,
            amount_safe_min: 0.0,
            amount_safe_max: 1.0,
            uses_amount2: true,
            amount2_min: -3.0,
            amount2_max: 3.0,
            amount2_safe_min: 1.0,
            amount2_safe_max: 3.0,
            ..D
        },
        FaceScale => OpConfig {
            uses_faces: true,
            amount_default: -0.5,
            amount_min: -6.0,
            amount_max: 6.0,
            amount_safe_min: -1.0,
            amount_safe_max: 0.0,
            uses_randomize: true,
            ..D
        },
        // Degrees.
        FaceRotate | FaceRotateX | FaceRotateY => OpConfig {
            uses_faces: true,
            amount_default: 45.0,
            amount_min: -180.0,
            amount_max: 180.0,
            amount_safe_min: -180.0,
            amount_safe_max: 180.0,
            uses_randomize: true,
            ..D
        },
        FaceSlide => OpConfig {
            uses_faces: true,
            amount_default: 0.5,
            amount_min: -4.0,
            amount_max: 4.0,
            amount_safe_min: -1.0,
            amount_safe_max: 1.0,
            uses_amount2: true,
            amount2_min: -4.0,
            amount2_max: 4.0,
            amount2_safe_min: -2.0,
            amount2_safe_max: 2.0,
            uses_randomize: true,
            ..D
        },
        FaceRemove | FaceMerge | FaceKeep => OpConfig {
            uses_faces: true,
            uses_amount: false,
            ..D
        },
        FaceRemoveX | FaceRemoveY | FaceRemoveZ | FaceRemoveDistance => OpConfig {
            amount_default: 0.5,
            amount_min: -1.0,
            amount_max: 1.0,
            amount_safe_min: -1.0,
            amount_safe_max: 1.0,
            uses_amount2: true,
            amount2_min: -1.0,
            amount2_max: 1.0,
            amount2_safe_min: -1.0,
            amount2_safe_max: 1.0,
            ..D
        },
        FaceRemovePolar => OpConfig {
            amount_default: 0.5,
            amount_min: -360.0,
            amount_max: 360.0,
            amount_safe_min: -360.0,
            amount_safe_max: 360.0,
            uses_amount2: true,
            amount2_min: -360.0,
            amount2_max: 360.0,
            amount2_safe_min: -360.0,
            amount2_safe_max: 360.0,
            ..D
        },
        FillHoles => OpConfig {
            uses_amount: false,
            ..D
        },
        ExtendBoundaries => OpConfig {
            amount_default: 0.5,
            amount_min: -4.0,
            amount_max: 4.0,
            amount_safe_min: -1.0,
            amount_safe_max: 1.0,
            uses_amount2: true,
            amount2_min: -180.0,
            amount2_max: 180.0,
            amount2_safe_min: -100.0,
            amount2_safe_max: 100.0,
            ..D
        },
        ConnectFaces => OpConfig {
            amount_default: 0.0,
            amount_min: 0.0,
            amount_max: 1.0,
            amount_safe_min: 0.0,
            amount_safe_max: 1.0,
            uses_amount2: true,
            amount2_min: 0.0,
            amount2_max: 1.0,
            amount2_safe_min: 0.0,
            amount2_safe_max: 1.0,
            ..D
        },
        Layer => OpConfig {
            uses_faces: true,
            amount_default: 0.1,
            amount_min: -2.0,
            amount_max: 2.0,
            amount_safe_min: -2.0,
            amount_safe_max: 2.0,
            uses_amount2: true,
            amount2_min: -3.0,
            amount2_max: 3.0,
            amount2_safe_min: -1.0,
            amount2_safe_max: 1.0,
            uses_randomize: true,
            ..D
        },
        Stack => OpConfig {
            uses_faces: true,
            amount_default: 0.5,
            amount_min: -2.0,
            amount_max: 2.0,
            amount_safe_min: -2.0,
            amount_safe_max: 2.0,
            uses_amount2: true,
            amount2_default: 0.8,
            amount2_min: 0.1,
            amount2_max: 0.9,
            amount2_safe_min: 0.01,
            amount2_safe_max: 0.99,
            ..D
        },
        TagFaces => OpConfig {
            uses_faces: true,
            ..D
        },

        // Vertex operators
        VertexScale => OpConfig {
            uses_faces: true,
            amount_default: 0.5,
            amount_min: -6.0,
            amount_max: 6.0,
            amount_safe_min: -1.0,
            amount_safe_max: 0.999,
            uses_randomize: true,
            ..D
        },
        VertexRotate => OpConfig {
            uses_faces: true,
            amount_default: 0.5,
            amount_min: -4.0,
            amount_max: 4.0,
            amount_safe_min: -1.0,
            amount_safe_max: 1.0,
            uses_randomize: true,
            ..D
        },
        VertexFlex => OpConfig {
            uses_faces: true,
            amount_default: 0.1,
            amount_min: -6.0,
            amount_max: 6.0,
            amount_safe_min: -1.0,
            amount_safe_max: 0.999,
            uses_randomize: true,
            ..D
        },
        VertexStellate => OpConfig {
            uses_faces: true,
            amount_default: -0.5,
            amount_min: -6.0,
            amount_max: 6.0,
            amount_safe_min: -1.0,
            amount_safe_max: 0.0,
            uses_randomize: true,
            ..D
        },
        VertexRemove | VertexKeep => OpConfig {
            uses_faces: true,
            uses_amount: false,
            ..D
        },
        Weld => OpConfig {
            amount_default: 0.001,
            amount_min: 0.0,
            amount_max: 0.25,
            amount_safe_min: 0.001,
            amount_safe_max: 0.1,
            ..D
        },

        // Geometric operators
        Canonicalize | Recenter => OpConfig {
            uses_amount: false,
            ..D
        },
        ConvexHull => OpConfig {
            uses_faces: false,
            uses_amount: false,
            ..D
        },
        Spherize | Cylinderize => OpConfig {
            uses_faces: true,
            amount_default: 1.0,
            amount_min: -2.0,
            amount_max: 2.0,
            amount_safe_min: -2.0,
            amount_safe_max: 2.0,
            ..D
        },
        Stretch => OpConfig {
            amount_default: 1.0,
            amount_min: -6.0,
            amount_max: 6.0,
            amount_safe_min: -3.0,
            amount_safe_max: 3.0,
            ..D
        },
        SitLevel => OpConfig {
            amount_default: 0.0,
            amount_min: 0.0,
            amount_max: 1.0,
            amount_safe_min: 0.0,
            amount_safe_max: 1.0,
            ..D
        },
        Hinge => OpConfig {
            amount_default: 15.0,
            amount_min: -180.0,
            amount_max: 180.0,
            amount_safe_min: 0.0,
            amount_safe_max: 180.0,
            ..D
        },

        // Compositional operators
        AddDual => OpConfig {
            amount_default: 1.0,
            amount_min: -6.0,
            amount_max: 6.0,
            amount_safe_min: -2.0,
            amount_safe_max: 2.0,
            ..D
        },
        AddCopyX | AddCopyY | AddCopyZ | AddMirrorX | AddMirrorY | AddMirrorZ => OpConfig {
            uses_faces: true,
            amount_default: 0.0,
            amount_min: -6.0,
            amount_max: 6.0,
            amount_safe_min: -2.0,
            amount_safe_max: 2.0,
            ..D
        },
        Stash => OpConfig {
            uses_faces: true,
            uses_amount: false,
            ..D
        },
        Unstash => OpConfig {
            uses_faces: true,
            amount_default: 0.0,
            amount_min: -6.0,
            amount_max: 6.0,
            amount_safe_min: -2.0,
            amount_safe_max: 2.0,
            uses_amount2: true,
            amount2_min: -6.0,
            amount2_max: 6.0,
            amount2_safe_min: -2.0,
            amount2_safe_max: 2.0,
            ..D
        },
        UnstashToFaces | UnstashToVerts => OpConfig {
            uses_faces: true,
            amount_default: 0.0,
            amount_min: -6.0,
            amount_max: 6.0,
            amount_safe_min: -2.0,
            amount_safe_max: 2.0,
            uses_amount2: true,
            amount2_min: -3.0,
            amount2_max: 3.0,
            amount2_safe_min: -1.0,
            amount2_safe_max: 1.0,
            ..D
        },
    }
}

// =============================================================================
// LOOKUP AND PREDICTION
// =============================================================================

/// Returns the descriptor for an operator.
#[inline]
pub fn config(op: Operator) -> &'static OpConfig {
    op.config()
}

/// Looks up a descriptor by host-supplied name.
///
/// # Errors
///
/// `UnknownOperator` when the name does not resolve.
pub fn config_by_name(name: &str) -> PolyResult<&'static OpConfig> {
    Ok(name.parse::<Operator>()?.config())
}

/// Predicts the output counts of applying `op` to `mesh`.
///
/// Returns `Ok(None)` for operators that carry no count matrix.
///
/// # Errors
///
/// `NumericOverflow` when a predicted count does not fit.
pub fn predict_counts(mesh: &PolyMesh, op: Operator) -> PolyResult<Option<Vef>> {
    predict_from(mesh.counts(), op)
}

/// Same as [`predict_counts`] but starting from known counts.
///
/// # Errors
///
/// `NumericOverflow` when a predicted count does not fit.
pub fn predict_from(counts: Vef, op: Operator) -> PolyResult<Option<Vef>> {
    match op.config().matrix {
        None => Ok(None),
        Some(matrix) => matrix
            .apply(counts)
            .map(Some)
            .ok_or(PolyError::NumericOverflow { operator: op }),
    }
}

#[cfg(test)]
mod tests;
