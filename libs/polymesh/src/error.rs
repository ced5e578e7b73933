//! # Error Types
//!
//! Error taxonomy shared by the operator executor and the generators.
//!
//! ## Error Policy
//!
//! - Builders and operators fail fast; a partially built mesh is never returned
//! - Degenerate but structurally valid output (zero-area faces, coincident
//!   vertices) is NOT an error
//! - Errors carry the operator or type name that failed

use crate::registry::Operator;
use thiserror::Error;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised by the PolyMesh kernel.
///
/// ## Example
///
/// ```rust
/// use polymesh::{Operator, PolyError};
///
/// let err = "NotAnOperator".parse::<Operator>().unwrap_err();
/// assert!(matches!(err, PolyError::UnknownOperator { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolyError {
    /// The operator name does not resolve in the registry.
    #[error("Unknown operator: {name}")]
    UnknownOperator {
        /// Name as supplied by the host
        name: String,
    },

    /// A symbolic generator key does not resolve in its lookup table.
    #[error("Unrecognized {kind} type name: {name}")]
    UnrecognizedTypeName {
        /// Lookup table that was searched (grid, uniform, johnson, ...)
        kind: &'static str,
        /// Name as supplied by the host
        name: String,
    },

    /// Integer resolution parameters are too small to form a valid mesh.
    #[error("Degenerate parameters: {message}")]
    DegenerateParameters {
        /// Which parameter was out of range
        message: String,
    },

    /// The operator's structural precondition does not hold for this mesh.
    #[error("Operator {operator} cannot be applied: {message}")]
    InvalidOperatorForMesh {
        /// Operator that was rejected
        operator: Operator,
        /// Unmet precondition
        message: String,
    },

    /// Count prediction overflowed for pathologically large inputs.
    #[error("Numeric overflow predicting counts for {operator}")]
    NumericOverflow {
        /// Operator whose matrix overflowed
        operator: Operator,
    },

    /// A required operator parameter was not supplied.
    #[error("Operator {operator} requires parameter '{name}'")]
    MissingParameter {
        /// Operator that needs the parameter
        operator: Operator,
        /// Parameter name
        name: &'static str,
    },

    /// Raw mesh data references missing vertices or has undersized faces.
    #[error("Invalid mesh: {message}")]
    InvalidMesh {
        /// What was wrong with the input
        message: String,
    },
}

/// Result type alias for kernel operations.
pub type PolyResult<T> = Result<T, PolyError>;

// =============================================================================
// CONSTRUCTORS
// =============================================================================

impl PolyError {
    /// Creates an unknown operator error.
    pub fn unknown_operator(name: impl Into<String>) -> Self {
        Self::UnknownOperator { name: name.into() }
    }

    /// Creates an unrecognized type name error.
    pub fn unrecognized(kind: &'static str, name: impl Into<String>) -> Self {
        Self::UnrecognizedTypeName {
            kind,
            name: name.into(),
        }
    }

    /// Creates a degenerate parameters error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::DegenerateParameters {
            message: message.into(),
        }
    }

    /// Creates an invalid-operator-for-mesh error.
    pub fn invalid_for_mesh(operator: Operator, message: impl Into<String>) -> Self {
        Self::InvalidOperatorForMesh {
            operator,
            message: message.into(),
        }
    }

    /// Creates an invalid mesh error.
    pub fn invalid_mesh(message: impl Into<String>) -> Self {
        Self::InvalidMesh {
            message: message.into(),
        }
    }
}
