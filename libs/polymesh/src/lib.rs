//! # PolyMesh
//!
//! Polyhedron mesh kernel: a polygon mesh with derived half-edge topology,
//! a static registry of Conway-style operators and an executor that applies
//! them.
//!
//! ## Architecture
//!
//! ```text
//! PolyMesh + OpParams
//!       ↓
//! registry (OpConfig, count matrices) → ops::apply
//!       ↓
//! PolyMesh → export (triangles, colors)
//! ```
//!
//! ## Modules
//!
//! - **mesh**: `PolyMesh`, roles, tags, half-edge topology, coplanar merge
//! - **selection**: `FaceSelection` predicates over faces and vertices
//! - **registry**: `Operator`, `OpConfig`, count prediction
//! - **ops**: the executor and every operator family
//! - **hull**: QuickHull producing merged convex polygons
//! - **export**: triangulation and face colors for a host renderer
//!
//! ## Usage
//!
//! ```rust
//! use polymesh::{apply, predict_counts, Operator, OpParams, PolyMesh};
//! use glam::DVec3;
//!
//! let tetra = PolyMesh::new(
//!     vec![
//!         DVec3::new(1.0, 1.0, 1.0),
//!         DVec3::new(1.0, -1.0, -1.0),
//!         DVec3::new(-1.0, 1.0, -1.0),
//!         DVec3::new(-1.0, -1.0, 1.0),
//!     ],
//!     vec![vec![0, 1, 2], vec![0, 3, 1], vec![0, 2, 3], vec![1, 3, 2]],
//! )
//! .unwrap();
//!
//! let predicted = predict_counts(&tetra, Operator::Ambo).unwrap();
//! let ambo = apply(&tetra, Operator::Ambo, &OpParams::default()).unwrap();
//! assert_eq!(Some(ambo.counts()), predicted);
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod hull;
pub mod mesh;
pub mod ops;
pub mod registry;
pub mod selection;

pub use error::{PolyError, PolyResult};
pub use export::{export, ColorMethod, RenderMesh};
pub use mesh::{PolyMesh, Roles, Vef};
pub use ops::{apply, apply_with, OpContext, OpParams};
pub use registry::{predict_counts, OpConfig, Operator, OperatorKind};
pub use selection::FaceSelection;
