//! Map projections and point transforms between coordinate systems.
//!
//! Each projection binds to one projected coordinate system, pre-computes its
//! constants and exposes a forward and an inverse point operation through
//! [`CoordinateProjection`]. [`CoordinatesOperation`] chains them into
//! transforms between whole coordinate systems.

pub mod albers;
pub mod factory;
pub mod geocentric;
pub mod lambert;
pub mod math;
pub mod mercator;
pub mod operation;
pub mod transverse_mercator;
pub mod transverse_mercator_jhs;
pub mod transverse_mercator_thomas;

pub use albers::AlbersEqualArea;
pub use factory::{CoordinateProjection, Projection, ProjectionKind, TransverseMercatorVariant};
pub use geocentric::GeocentricConversion;
pub use lambert::{LambertConformal, LambertVariant};
pub use mercator::{Mercator, MercatorVariant};
pub use operation::CoordinatesOperation;
pub use transverse_mercator::TransverseMercator;
pub use transverse_mercator_jhs::TransverseMercatorJhs;
pub use transverse_mercator_thomas::TransverseMercatorThomas;
