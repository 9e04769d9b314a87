//! Unified error type for model building.
//!
//! Structural problems abort a build and surface here; recoverable issues
//! (dropped rows, clamped values) travel through [`crate::diagnostics`]
//! instead.

use thiserror::Error;

/// Fatal errors raised while assembling a network model.
#[derive(Error, Debug)]
pub enum ModelError {
    /// A timestamp could not be parsed with the day-first convention.
    #[error("Timestamp error: {0}")]
    Timestamp(String),

    /// The input relations are structurally malformed (e.g. duplicate
    /// demand records for the same bus and snapshot).
    #[error("Structural error: {0}")]
    Structure(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using ModelError.
pub type ModelResult<T> = Result<T, ModelError>;

impl From<String> for ModelError {
    fn from(s: String) -> Self {
        ModelError::Other(s)
    }
}

impl From<&str> for ModelError {
    fn from(s: &str) -> Self {
        ModelError::Other(s.to_string())
    }
}
