//! # Configuration Constants
//!
//! Centralized constants for the PolyMesh kernel. Precision tolerances,
//! iteration budgets for the relaxation operators and the defaults used when
//! a host leaves a parameter unset are defined here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Relaxation**: Iteration caps for canonicalization
//! - **Operators**: Defaults for seeded and stacked operators
//! - **Color**: Default face color

use std::fmt;

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Distance under which two generated vertices are considered the same point.
///
/// Generators that stitch cells or rings together weld on this distance.
///
/// # Example
///
/// ```rust
/// use config::constants::VERTEX_MERGE_EPSILON;
///
/// let a = [0.0_f64, 0.0, 0.0];
/// let b = [1e-9_f64, 0.0, 0.0];
/// let d = ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)).sqrt();
/// assert!(d < VERTEX_MERGE_EPSILON);
/// ```
pub const VERTEX_MERGE_EPSILON: f64 = 1e-8;

/// Scale applied to coordinates before quantizing them into hash keys.
///
/// # Example
///
/// ```rust
/// use config::constants::QUANTIZE_SCALE;
///
/// let key = (0.5_f64 * QUANTIZE_SCALE).round() as i64;
/// assert_eq!(key, 500_000);
/// ```
pub const QUANTIZE_SCALE: f64 = 1e6;

/// Tolerance on normal alignment when merging coplanar faces.
///
/// Two faces are coplanar when `1 - dot(n0, n1)` and their plane offsets
/// differ by less than this value.
///
/// # Example
///
/// ```rust
/// use config::constants::COPLANAR_TOLERANCE;
///
/// let dot: f64 = 0.9999999;
/// assert!(1.0 - dot < COPLANAR_TOLERANCE);
/// ```
pub const COPLANAR_TOLERANCE: f64 = 1e-6;

/// Distance a point must lie above a hull face plane to count as outside.
///
/// # Example
///
/// ```rust
/// use config::constants::{HULL_EPSILON, EPSILON};
/// assert!(HULL_EPSILON > EPSILON);
/// ```
pub const HULL_EPSILON: f64 = 1e-9;

/// Dot product above which a normal counts as pointing "straight" along an axis.
///
/// # Example
///
/// ```rust
/// use config::constants::STRAIGHT_FACING_DOT;
/// assert!(STRAIGHT_FACING_DOT < 1.0);
/// ```
pub const STRAIGHT_FACING_DOT: f64 = 0.999;

// =============================================================================
// RELAXATION CONSTANTS
// =============================================================================

/// Maximum number of relaxation passes for canonicalization.
///
/// Exact canonical form has no closed solution for general polyhedra, so the
/// iteration is always capped.
///
/// # Example
///
/// ```rust
/// use config::constants::CANONICALIZE_ITERATIONS;
///
/// let mut passes = 0;
/// while passes < CANONICALIZE_ITERATIONS {
///     passes += 1;
/// }
/// assert_eq!(passes, CANONICALIZE_ITERATIONS);
/// ```
pub const CANONICALIZE_ITERATIONS: usize = 200;

/// Largest per-pass vertex displacement at which canonicalization stops early.
///
/// # Example
///
/// ```rust
/// use config::constants::CANONICALIZE_TOLERANCE;
/// assert!(CANONICALIZE_TOLERANCE > 0.0);
/// ```
pub const CANONICALIZE_TOLERANCE: f64 = 1e-8;

// =============================================================================
// OPERATOR CONSTANTS
// =============================================================================

/// Seed used by seeded selections when the caller supplies none.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_SEED;
///
/// let seed: Option<u64> = None;
/// assert_eq!(seed.unwrap_or(DEFAULT_SEED), DEFAULT_SEED);
/// ```
pub const DEFAULT_SEED: u64 = 0;

/// Relative face size at which the Stack operator stops adding layers.
///
/// # Example
///
/// ```rust
/// use config::constants::STACK_MIN_SCALE;
///
/// let mut scale = 1.0;
/// let mut layers = 0;
/// while scale > STACK_MIN_SCALE {
///     scale *= 0.5;
///     layers += 1;
/// }
/// assert_eq!(layers, 4);
/// ```
pub const STACK_MIN_SCALE: f64 = 0.1;

/// Hard cap on Stack layers regardless of the shrink ratio.
pub const STACK_MAX_LAYERS: usize = 32;

/// Upper bound on the Waterman root so lattice enumeration stays bounded.
///
/// # Example
///
/// ```rust
/// use config::constants::MAX_WATERMAN_ROOT;
/// assert!(MAX_WATERMAN_ROOT >= 100);
/// ```
pub const MAX_WATERMAN_ROOT: u32 = 2000;

/// Smallest number of sides a polygon, ring or prism may have.
pub const MIN_POLYGON_SIDES: usize = 3;

// =============================================================================
// COLOR CONSTANTS
// =============================================================================

/// Default color when a face carries no color tag (light gray).
///
/// RGBA values in range [0.0, 1.0].
pub const DEFAULT_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 1.0];

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Checks if two f64 values are approximately equal within EPSILON.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_equal;
///
/// assert!(approx_equal(1.0, 1.0 + 1e-11));
/// assert!(!approx_equal(1.0, 1.1));
/// ```
#[inline]
pub fn approx_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Checks if a f64 value is approximately zero within EPSILON.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_zero;
///
/// assert!(approx_zero(1e-11));
/// assert!(!approx_zero(0.1));
/// ```
#[inline]
pub fn approx_zero(value: f64) -> bool {
    value.abs() < EPSILON
}

// =============================================================================
// GLOBAL CONFIG
// =============================================================================

/// Immutable snapshot of global configuration settings that can be shared
/// between crates.
///
/// # Examples
/// ```
/// use config::constants::GlobalConfig;
/// let config = GlobalConfig::default();
/// assert!(config.tolerance > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalConfig {
    /// Numeric tolerance propagated into geometry kernels.
    pub tolerance: f64,
    /// Iteration cap for relaxation operators.
    pub canonicalize_iterations: usize,
}

impl GlobalConfig {
    /// Builds a configuration enforcing strict validation of the supplied
    /// tolerance and iteration cap.
    ///
    /// # Examples
    /// ```
    /// use config::constants::GlobalConfig;
    /// let cfg = GlobalConfig::new(1.0e-6, 50).expect("valid config");
    /// assert_eq!(cfg.canonicalize_iterations, 50);
    /// ```
    pub fn new(tolerance: f64, canonicalize_iterations: usize) -> Result<Self, ConfigError> {
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(ConfigError::InvalidTolerance(tolerance));
        }
        if canonicalize_iterations == 0 {
            return Err(ConfigError::InvalidIterations(canonicalize_iterations));
        }
        Ok(Self {
            tolerance,
            canonicalize_iterations,
        })
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            tolerance: CANONICALIZE_TOLERANCE,
            canonicalize_iterations: CANONICALIZE_ITERATIONS,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Raised when tolerance is zero, negative or not finite.
    InvalidTolerance(f64),
    /// Raised when the iteration cap is zero.
    InvalidIterations(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTolerance(value) => {
                write!(f, "tolerance must be positive and finite: {value}")
            }
            ConfigError::InvalidIterations(value) => {
                write!(f, "canonicalize_iterations must be >= 1: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
