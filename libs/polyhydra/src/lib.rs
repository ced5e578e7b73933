//! # Polyhydra
//!
//! Procedural polyhedra on top of the [`polymesh`] kernel: generator
//! families for base solids and tilings, and [`EditableModel`], a base mesh
//! plus a replayable list of operator steps.
//!
//! ## Architecture
//!
//! ```text
//! GeneratorSpec → generators::build → PolyMesh
//!                                        ↓
//! Recipe (steps) → polymesh::apply_with → PolyMesh → export
//! ```
//!
//! ## Modules
//!
//! - **generators**: uniform, Johnson, radial, Waterman, grid, various,
//!   shapes and Conway-notation builders
//! - **recipe**: `Recipe`, `RecipeStep` and `EditableModel`
//! - **error**: `RecipeError` for replay and JSON failures

pub mod error;
pub mod generators;
pub mod recipe;

pub use error::{RecipeError, RecipeResult};
pub use generators::{build, GeneratorSpec, GeneratorType};
pub use recipe::{EditableModel, Recipe, RecipeStep};
