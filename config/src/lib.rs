//! # Config Crate
//!
//! Centralized configuration constants for the PolyMesh kernel.
//! All tolerances, iteration budgets and defaults shared by the mesh
//! operators and the generators are defined here.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{EPSILON, CANONICALIZE_ITERATIONS};
//!
//! // Use EPSILON for floating-point comparisons
//! let value: f64 = 0.00000000001; // 1e-11, smaller than EPSILON (1e-10)
//! assert!(value.abs() < EPSILON);
//!
//! // Iterative relaxation is always capped
//! assert!(CANONICALIZE_ITERATIONS > 0);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Deterministic**: Seeds and iteration caps are fixed values
//! - **Well-Documented**: Every constant has clear documentation

pub mod constants;

#[cfg(test)]
mod tests;
