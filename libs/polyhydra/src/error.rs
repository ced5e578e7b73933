//! # Recipe Errors
//!
//! Failures while building, replaying or (de)serializing an
//! [`crate::EditableModel`].

use polymesh::PolyError;
use thiserror::Error;

/// Errors raised by recipe replay and persistence.
#[derive(Debug, Error)]
pub enum RecipeError {
    /// The generator or one of the recorded steps failed.
    #[error(transparent)]
    Poly(#[from] PolyError),

    /// The recipe JSON could not be read or written.
    #[error("Recipe JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for recipe operations.
pub type RecipeResult<T> = Result<T, RecipeError>;
