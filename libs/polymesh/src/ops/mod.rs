//! # Operator Executor
//!
//! Applies one [`Operator`] to a [`PolyMesh`] and returns a new mesh.
//!
//! ## Parameters
//!
//! Missing (or non-finite) amounts take the registry default; the result is
//! clamped to the operator's full range. When the operator supports
//! randomization and a seed is supplied, each element gets `amount × U(0, 1)`
//! drawn in element order from a seeded `StdRng`.
//!
//! ## Selection
//!
//! Operators whose config sets `uses_faces` honour the face selection;
//! unselected faces pass through with role `Ignored`. Vertex-centred
//! operators evaluate the same predicate over vertices. Nothing selected
//! returns the input unchanged.
//!
//! ```rust
//! use polymesh::{apply, Operator, OpParams, PolyMesh};
//! use glam::DVec3;
//!
//! let tri = PolyMesh::new(vec![DVec3::ZERO, DVec3::Z, DVec3::X], vec![vec![0, 1, 2]]).unwrap();
//! let kis = apply(&tri, Operator::Kis, &OpParams::default()).unwrap();
//! assert_eq!(kis.face_count(), 3);
//! ```

mod combine;
mod conway;
mod faces;
mod geometry;
mod vertices;

use crate::config::KernelConfig;
use crate::error::{PolyError, PolyResult};
use crate::mesh::PolyMesh;
use crate::registry::{OpConfig, Operator, OperatorKind};
use crate::selection::{select_faces, select_vertices, FaceSelection};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// =============================================================================
// PARAMETERS
// =============================================================================

/// Host-supplied parameters for one operator application.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OpParams {
    /// Primary amount; `None` uses the registry default.
    #[serde(default)]
    pub amount: Option<f64>,
    /// Secondary amount; `None` uses the registry default.
    #[serde(default)]
    pub amount2: Option<f64>,
    /// Which faces (or vertices) the operator acts on.
    #[serde(default)]
    pub face_selection: FaceSelection,
    /// Seed for randomized amounts and the `Random` selection.
    #[serde(default)]
    pub randomize_seed: Option<u64>,
    /// Tag added by `TagFaces`.
    #[serde(default)]
    pub tag: Option<String>,
}

impl OpParams {
    /// Parameters with only `amount` set.
    pub fn amount(amount: f64) -> Self {
        Self {
            amount: Some(amount),
            ..Self::default()
        }
    }

    /// Sets `amount2`.
    pub fn with_amount2(mut self, amount2: f64) -> Self {
        self.amount2 = Some(amount2);
        self
    }

    /// Sets the face selection.
    pub fn with_selection(mut self, selection: FaceSelection) -> Self {
        self.face_selection = selection;
        self
    }

    /// Sets the randomization seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.randomize_seed = Some(seed);
        self
    }

    /// Sets the tag used by `TagFaces`.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

/// State carried across a pipeline of operator calls.
#[derive(Debug, Clone, Default)]
pub struct OpContext {
    /// Tolerances and iteration caps for relaxation operators.
    pub config: KernelConfig,
    stash: Option<PolyMesh>,
}

impl OpContext {
    /// Creates a context with the given kernel config and an empty stash.
    pub fn new(config: KernelConfig) -> Self {
        Self {
            config,
            stash: None,
        }
    }

    /// Mesh saved by the last `Stash`.
    pub fn stash(&self) -> Option<&PolyMesh> {
        self.stash.as_ref()
    }
}

// =============================================================================
// RESOLVED INVOCATION
// =============================================================================

/// Parameters after defaults are applied.
#[derive(Debug, Clone)]
pub(crate) struct Invocation<'a> {
    pub(crate) op: Operator,
    pub(crate) amount: f64,
    pub(crate) amount2: f64,
    pub(crate) selection: FaceSelection,
    pub(crate) seed: Option<u64>,
    pub(crate) tag: Option<&'a str>,
}

impl<'a> Invocation<'a> {
    fn resolve(op: Operator, params: &'a OpParams) -> PolyResult<Self> {
        let cfg = op.config();
        let pick = |value: Option<f64>, default: f64| value.filter(|v| v.is_finite()).unwrap_or(default);
        let amount = pick(params.amount, cfg.amount_default);
        let amount2 = pick(params.amount2, cfg.amount2_default);
        if amount != cfg.clamp_amount(amount, false) || amount2 != cfg.clamp_amount2(amount2, false) {
            warn!(operator = %op, amount, amount2, "amount clamped to the operator's full range");
        }
        if params.randomize_seed.is_some()
            && !cfg.uses_randomize
            && params.face_selection != FaceSelection::Random
        {
            warn!(operator = %op, "randomize seed ignored by non-randomizable operator");
        }
        if op == Operator::TagFaces && params.tag.as_deref().map_or(true, str::is_empty) {
            return Err(PolyError::MissingParameter {
                operator: op,
                name: "tag",
            });
        }
        Ok(Self {
            op,
            amount: cfg.clamp_amount(amount, false),
            amount2: cfg.clamp_amount2(amount2, false),
            selection: if cfg.uses_faces {
                params.face_selection
            } else {
                FaceSelection::All
            },
            seed: params.randomize_seed,
            tag: params.tag.as_deref(),
        })
    }

    /// Copy of this invocation for a different operator with the same amounts.
    pub(crate) fn with_op(&self, op: Operator) -> Self {
        Self { op, ..self.clone() }
    }

    pub(crate) fn config(&self) -> &'static OpConfig {
        self.op.config()
    }

    /// Faces the operator acts on.
    pub(crate) fn face_mask(&self, mesh: &PolyMesh) -> Vec<bool> {
        select_faces(mesh, self.selection, self.seed)
    }

    /// Vertices the operator acts on.
    pub(crate) fn vertex_mask(&self, mesh: &PolyMesh) -> Vec<bool> {
        select_vertices(mesh, self.selection, self.seed)
    }

    /// Per-element primary amounts, randomized when a seed is set.
    pub(crate) fn amounts(&self, count: usize) -> Vec<f64> {
        match self.seed {
            Some(seed) if self.config().uses_randomize => {
                let mut rng = StdRng::seed_from_u64(seed);
                (0..count)
                    .map(|_| self.amount * rng.random::<f64>())
                    .collect()
            }
            _ => vec![self.amount; count],
        }
    }
}

/// Operators whose selection is evaluated over vertices instead of faces.
fn selects_vertices(op: Operator) -> bool {
    use Operator::*;
    matches!(
        op,
        Truncate
            | VertexScale
            | VertexRotate
            | VertexFlex
            | VertexStellate
            | VertexRemove
            | VertexKeep
            | Spherize
            | Cylinderize
            | UnstashToVerts
    )
}

// =============================================================================
// ENTRY POINTS
// =============================================================================

/// Applies `op` to `mesh` with a fresh [`OpContext`].
///
/// # Errors
///
/// - `InvalidOperatorForMesh` when a structural precondition fails
/// - `MissingParameter` when a required parameter is absent
pub fn apply(mesh: &PolyMesh, op: Operator, params: &OpParams) -> PolyResult<PolyMesh> {
    apply_with(mesh, op, params, &mut OpContext::default())
}

/// Applies `op` to `mesh`, reading and writing pipeline state in `ctx`.
///
/// # Errors
///
/// Same as [`apply`].
pub fn apply_with(
    mesh: &PolyMesh,
    op: Operator,
    params: &OpParams,
    ctx: &mut OpContext,
) -> PolyResult<PolyMesh> {
    let inv = Invocation::resolve(op, params)?;
    debug!(
        operator = %op,
        amount = inv.amount,
        amount2 = inv.amount2,
        selection = %inv.selection,
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "applying operator"
    );

    if inv.config().uses_faces && inv.selection != FaceSelection::All {
        let any = if selects_vertices(op) {
            inv.vertex_mask(mesh).contains(&true)
        } else {
            inv.face_mask(mesh).contains(&true)
        };
        if !any {
            debug!(operator = %op, "empty selection, mesh unchanged");
            return Ok(mesh.clone());
        }
    }

    let out = match op.kind() {
        OperatorKind::Conway => conway::apply(mesh, &inv),
        OperatorKind::Face => faces::apply(mesh, &inv),
        OperatorKind::Vertex => vertices::apply(mesh, &inv),
        OperatorKind::Geometric => geometry::apply(mesh, &inv, &ctx.config),
        OperatorKind::Compositional => combine::apply(mesh, &inv, &mut ctx.stash),
    }?;

    debug!(
        operator = %op,
        vertices = out.vertex_count(),
        faces = out.face_count(),
        "operator applied"
    );
    Ok(out)
}

#[cfg(test)]
mod tests;
