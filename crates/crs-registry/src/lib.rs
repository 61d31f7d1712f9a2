//! Coordinate system registry.
//!
//! Publishes every system of an EPSG catalog by id and name, resolves
//! systems built elsewhere (parsed from text, read from file headers,
//! assembled by hand) to their registered equivalents, and synthesizes ids
//! for the ones with no equivalent.
//!
//! ```ignore
//! use crs_registry::{Registry, RegistryConfig};
//!
//! let registry = Registry::open(RegistryConfig::from_env())?;
//! let (x, y) = registry.transform_point(4326, 3857, -123.0, 49.0)?;
//! ```

pub mod config;
pub mod error;
pub mod registry;

pub use config::RegistryConfig;
pub use error::{RegistryError, Result};
pub use registry::{Registry, DEFAULT_ALIASES};
