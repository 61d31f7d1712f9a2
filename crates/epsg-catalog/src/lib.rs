//! Decoder for the binary coordinate system catalogs.
//!
//! The EPSG catalog is a family of headerless big-endian tables that refer to
//! each other by integer id (see [`tables`]). The ESRI catalog adds its own
//! definitions plus a digest index used to match definitions without an id
//! back to a catalogued system (see [`esri`]).
//!
//! Loading never fails as a whole: each table decodes all-or-nothing and a
//! bad table is logged and left empty.

pub mod error;
pub mod esri;
pub mod reader;
pub mod source;
mod systems;
pub mod tables;

pub use error::{CatalogError, Result};
pub use esri::EsriCatalog;
pub use reader::RecordReader;
pub use source::{DirectorySource, MemorySource, ResourceSource};
pub use tables::{table_file, table_names, CoordinateSystemType, EpsgCatalog};
