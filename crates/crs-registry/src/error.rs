//! Error types for registry operations.

use crs_common::CrsError;
use epsg_catalog::CatalogError;
use thiserror::Error;

/// Errors returned by the registry.
///
/// Lookup misses are not errors: `get_by_id` and `get_by_name` return `None`.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// An operation needed a coordinate system that is not registered.
    #[error("Unknown coordinate system id {0}")]
    UnknownId(i32),

    /// The catalog source could not be opened.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Construction or transform error from the model or projection layer.
    #[error(transparent)]
    Crs(#[from] CrsError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
