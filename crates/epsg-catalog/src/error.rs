//! Error types for the catalog decoder.

use thiserror::Error;

/// Errors raised while decoding a catalog table.
///
/// A table that fails to decode is left empty; the error is logged by the
/// loader and never aborts the other tables.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Table {table} ends in the middle of a record")]
    Truncated { table: String },

    #[error("Table {table}: {field} references unknown id {id}")]
    UnresolvedReference {
        table: String,
        field: &'static str,
        id: i32,
    },

    #[error("Table {table}: {reason}")]
    InvalidRecord { table: String, reason: String },

    #[error("Table resource not found: {0}")]
    MissingTable(String),

    #[error("Catalog source not usable: {0}")]
    InvalidSource(String),
}

impl CatalogError {
    pub fn invalid_record(table: &str, reason: impl Into<String>) -> Self {
        CatalogError::InvalidRecord {
            table: table.to_string(),
            reason: reason.into(),
        }
    }

    pub fn unresolved(table: &str, field: &'static str, id: i32) -> Self {
        CatalogError::UnresolvedReference {
            table: table.to_string(),
            field,
            id,
        }
    }
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
