//! Error types for coordinate system construction and transforms.

use thiserror::Error;

/// Result type alias using CrsError.
pub type CrsResult<T> = Result<T, CrsError>;

/// Errors raised while building coordinate systems or projections.
///
/// Lookup misses are not errors; they surface as `None` from the registry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CrsError {
    // === Construction Errors ===
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unsupported projection: {0}")]
    UnsupportedProjection(String),

    // === Transform Errors ===
    #[error("Unit mismatch: {0}")]
    UnitMismatch(String),

    #[error("Datum mismatch: '{source_datum}' -> '{target_datum}' requires a datum shift")]
    DatumMismatch {
        source_datum: String,
        target_datum: String,
    },

    #[error("Unsupported transform: {0}")]
    UnsupportedTransform(String),
}

impl CrsError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        CrsError::InvalidArgument(msg.into())
    }

    /// A projection method needs a parameter the coordinate system does not supply.
    pub fn missing_parameter(method: &str, parameter: &str) -> Self {
        CrsError::InvalidArgument(format!(
            "method '{}' requires parameter '{}'",
            method, parameter
        ))
    }

    pub fn unsupported_projection(method: impl Into<String>) -> Self {
        CrsError::UnsupportedProjection(method.into())
    }
}
