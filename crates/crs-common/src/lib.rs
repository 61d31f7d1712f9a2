//! Common coordinate reference system model shared by the catalog, the
//! registry and the projection library.

pub mod area;
pub mod authority;
pub mod axis;
pub mod crs;
pub mod datum;
pub mod digest;
pub mod ellipsoid;
pub mod error;
pub mod method;
pub mod parameter;
pub mod unit;

pub use area::Area;
pub use authority::Authority;
pub use axis::Axis;
pub use crs::{
    CompoundCrs, CoordinateSystem, CoordinateSystemKind, CrsHeader, EngineeringCrs, GeocentricCrs,
    GeographicCrs, ProjectedCrs, VerticalCrs,
};
pub use datum::{Datum, DatumKind, PrimeMeridian};
pub use digest::Md5Digest;
pub use ellipsoid::Ellipsoid;
pub use error::{CrsError, CrsResult};
pub use method::{CoordinateOperation, CoordinateOperationMethod};
pub use parameter::{ParameterName, ParameterValue, ParameterValues};
pub use unit::{UnitKind, UnitOfMeasure};

/// First identifier handed out to coordinate systems synthesized at runtime.
///
/// Identifiers below this value always come from a catalog; identifiers at or
/// above it are allocated in-process and are not stable across restarts.
pub const FIRST_SYNTHESIZED_ID: i32 = 2_000_000;
