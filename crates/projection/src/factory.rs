//! Projection selection and binding to a projected coordinate system.
//!
//! [`Projection::new`] matches the normalized method name of a
//! [`ProjectedCrs`] against the implemented methods, reads the parameters the
//! method needs and pre-computes its constants. Missing required parameters
//! fail with `InvalidArgument`; unknown methods with `UnsupportedProjection`.

use crate::albers::AlbersEqualArea;
use crate::lambert::LambertConformal;
use crate::mercator::Mercator;
use crate::transverse_mercator::TransverseMercator;
use crate::transverse_mercator_jhs::TransverseMercatorJhs;
use crate::transverse_mercator_thomas::TransverseMercatorThomas;
use crs_common::method::method_names;
use crs_common::parameter::names;
use crs_common::{CrsError, CrsResult, ProjectedCrs, UnitOfMeasure};
use std::sync::Arc;
use tracing::debug;

/// Forward and inverse point operation of a map projection.
///
/// Angles are radians. Distances are whatever the implementor documents:
/// the individual projections work in metres, [`Projection`] in the linear
/// unit of its coordinate system.
pub trait CoordinateProjection {
    /// Geographic `(lon, lat)` to projected `(x, y)`.
    fn project(&self, lon: f64, lat: f64) -> (f64, f64);

    /// Projected `(x, y)` to geographic `(lon, lat)`.
    fn inverse(&self, x: f64, y: f64) -> (f64, f64);
}

/// Formulation used for `Transverse_Mercator`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransverseMercatorVariant {
    /// Snyder's USGS series; accurate to about 3° from the central meridian.
    #[default]
    Usgs,
    /// Thomas (Redfearn) series.
    Thomas,
    /// JHS formulation of the Krüger series.
    Jhs,
}

#[derive(Debug, Clone)]
pub enum ProjectionKind {
    AlbersEqualArea(AlbersEqualArea),
    LambertConformal(LambertConformal),
    Mercator(Mercator),
    TransverseMercator(TransverseMercator),
    TransverseMercatorThomas(TransverseMercatorThomas),
    TransverseMercatorJhs(TransverseMercatorJhs),
}

impl ProjectionKind {
    fn as_projection(&self) -> &dyn CoordinateProjection {
        match self {
            ProjectionKind::AlbersEqualArea(p) => p,
            ProjectionKind::LambertConformal(p) => p,
            ProjectionKind::Mercator(p) => p,
            ProjectionKind::TransverseMercator(p) => p,
            ProjectionKind::TransverseMercatorThomas(p) => p,
            ProjectionKind::TransverseMercatorJhs(p) => p,
        }
    }
}

/// A projection bound to one projected coordinate system.
#[derive(Debug, Clone)]
pub struct Projection {
    kind: ProjectionKind,
    linear_unit: Arc<UnitOfMeasure>,
}

impl Projection {
    pub fn new(crs: &ProjectedCrs) -> CrsResult<Self> {
        Self::with_variant(crs, TransverseMercatorVariant::default())
    }

    /// Like [`Projection::new`], choosing the Transverse Mercator formulation.
    pub fn with_variant(crs: &ProjectedCrs, variant: TransverseMercatorVariant) -> CrsResult<Self> {
        let method = crs.method.normalized_name();
        let params = ParameterReader { crs, method };
        let ellipsoid = crs.ellipsoid();

        let kind = match method {
            method_names::ALBERS_EQUAL_AREA => ProjectionKind::AlbersEqualArea(AlbersEqualArea::new(
                ellipsoid,
                params.angle(names::LATITUDE_OF_ORIGIN)?,
                params.angle(names::CENTRAL_MERIDIAN)?,
                params.angle(names::STANDARD_PARALLEL_1)?,
                params.angle(names::STANDARD_PARALLEL_2)?,
                params.length_or(names::FALSE_EASTING, 0.0),
                params.length_or(names::FALSE_NORTHING, 0.0),
            )),
            method_names::LAMBERT_CONIC_CONFORMAL_1SP => {
                ProjectionKind::LambertConformal(LambertConformal::one_parallel(
                    ellipsoid,
                    params.angle(names::LATITUDE_OF_ORIGIN)?,
                    params.angle(names::CENTRAL_MERIDIAN)?,
                    params.scale(names::SCALE_FACTOR)?,
                    params.length_or(names::FALSE_EASTING, 0.0),
                    params.length_or(names::FALSE_NORTHING, 0.0),
                ))
            }
            method_names::LAMBERT_CONIC_CONFORMAL_2SP
            | method_names::LAMBERT_CONIC_CONFORMAL_2SP_BELGIUM => {
                let build = if method == method_names::LAMBERT_CONIC_CONFORMAL_2SP {
                    LambertConformal::two_parallel
                } else {
                    LambertConformal::belgium
                };
                ProjectionKind::LambertConformal(build(
                    ellipsoid,
                    params.angle(names::LATITUDE_OF_ORIGIN)?,
                    params.angle(names::CENTRAL_MERIDIAN)?,
                    params.angle(names::STANDARD_PARALLEL_1)?,
                    params.angle(names::STANDARD_PARALLEL_2)?,
                    params.length_or(names::FALSE_EASTING, 0.0),
                    params.length_or(names::FALSE_NORTHING, 0.0),
                ))
            }
            method_names::MERCATOR_1SP => ProjectionKind::Mercator(Mercator::one_parallel(
                ellipsoid,
                params.angle(names::CENTRAL_MERIDIAN)?,
                params.scale_or(names::SCALE_FACTOR, 1.0),
                params.length_or(names::FALSE_EASTING, 0.0),
                params.length_or(names::FALSE_NORTHING, 0.0),
            )),
            method_names::MERCATOR_2SP => ProjectionKind::Mercator(Mercator::two_parallel(
                ellipsoid,
                params.angle(names::CENTRAL_MERIDIAN)?,
                params.angle(names::STANDARD_PARALLEL_1)?,
                params.length_or(names::FALSE_EASTING, 0.0),
                params.length_or(names::FALSE_NORTHING, 0.0),
            )),
            method_names::MERCATOR_1SP_SPHERICAL => ProjectionKind::Mercator(Mercator::spherical(
                ellipsoid,
                params.angle(names::CENTRAL_MERIDIAN)?,
                params.scale_or(names::SCALE_FACTOR, 1.0),
                params.length_or(names::FALSE_EASTING, 0.0),
                params.length_or(names::FALSE_NORTHING, 0.0),
            )),
            method_names::POPULAR_VISUALISATION_PSEUDO_MERCATOR => {
                ProjectionKind::Mercator(Mercator::pseudo_mercator(
                    ellipsoid,
                    params.angle(names::CENTRAL_MERIDIAN)?,
                    params.length_or(names::FALSE_EASTING, 0.0),
                    params.length_or(names::FALSE_NORTHING, 0.0),
                ))
            }
            method_names::TRANSVERSE_MERCATOR | method_names::TRANSVERSE_MERCATOR_SOUTH_ORIENTATED => {
                let lat0 = params.angle_or(names::LATITUDE_OF_ORIGIN, 0.0);
                let lon0 = params.angle(names::CENTRAL_MERIDIAN)?;
                let k0 = params.scale(names::SCALE_FACTOR)?;
                let fe = params.length_or(names::FALSE_EASTING, 0.0);
                let fn_ = params.length_or(names::FALSE_NORTHING, 0.0);
                if method == method_names::TRANSVERSE_MERCATOR_SOUTH_ORIENTATED {
                    // Only the USGS form carries the westing/southing axes.
                    ProjectionKind::TransverseMercator(
                        TransverseMercator::new(ellipsoid, lat0, lon0, k0, fe, fn_).south_orientated(),
                    )
                } else {
                    match variant {
                        TransverseMercatorVariant::Usgs => ProjectionKind::TransverseMercator(
                            TransverseMercator::new(ellipsoid, lat0, lon0, k0, fe, fn_),
                        ),
                        TransverseMercatorVariant::Thomas => ProjectionKind::TransverseMercatorThomas(
                            TransverseMercatorThomas::new(ellipsoid, lat0, lon0, k0, fe, fn_),
                        ),
                        TransverseMercatorVariant::Jhs => ProjectionKind::TransverseMercatorJhs(
                            TransverseMercatorJhs::new(ellipsoid, lat0, lon0, k0, fe, fn_),
                        ),
                    }
                }
            }
            _ => return Err(CrsError::unsupported_projection(crs.method.name.clone())),
        };

        debug!(crs = crs.header.id, method = %method, "bound projection");
        Ok(Self {
            kind,
            linear_unit: crs.linear_unit.clone(),
        })
    }

    pub fn kind(&self) -> &ProjectionKind {
        &self.kind
    }

    pub fn linear_unit(&self) -> &Arc<UnitOfMeasure> {
        &self.linear_unit
    }

    /// Forward projection from degrees, for callers that do not work in radians.
    pub fn project_degrees(&self, lon: f64, lat: f64) -> (f64, f64) {
        self.project(lon.to_radians(), lat.to_radians())
    }

    /// Inverse projection to degrees.
    pub fn inverse_degrees(&self, x: f64, y: f64) -> (f64, f64) {
        let (lon, lat) = self.inverse(x, y);
        (lon.to_degrees(), lat.to_degrees())
    }
}

impl CoordinateProjection for Projection {
    /// Output is in the coordinate system's linear unit.
    fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (x, y) = self.kind.as_projection().project(lon, lat);
        (self.linear_unit.from_base(x), self.linear_unit.from_base(y))
    }

    /// Input is in the coordinate system's linear unit.
    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        self.kind
            .as_projection()
            .inverse(self.linear_unit.to_base(x), self.linear_unit.to_base(y))
    }
}

/// Reads method parameters in radians, metres and plain scale factors.
struct ParameterReader<'a> {
    crs: &'a ProjectedCrs,
    method: &'a str,
}

impl ParameterReader<'_> {
    fn missing(&self, name: &str) -> CrsError {
        CrsError::missing_parameter(self.method, name)
    }

    fn angle(&self, name: &str) -> CrsResult<f64> {
        self.crs
            .parameter(name)
            .and_then(|v| v.to_radians())
            .ok_or_else(|| self.missing(name))
    }

    fn angle_or(&self, name: &str, default: f64) -> f64 {
        self.crs
            .parameter(name)
            .and_then(|v| v.to_radians())
            .unwrap_or(default)
    }

    fn length_or(&self, name: &str, default: f64) -> f64 {
        self.crs
            .parameter(name)
            .and_then(|v| v.to_metres(&self.crs.linear_unit))
            .unwrap_or(default)
    }

    fn scale(&self, name: &str) -> CrsResult<f64> {
        self.crs
            .parameter(name)
            .and_then(|v| v.to_scalar())
            .ok_or_else(|| self.missing(name))
    }

    fn scale_or(&self, name: &str, default: f64) -> f64 {
        self.crs
            .parameter(name)
            .and_then(|v| v.to_scalar())
            .unwrap_or(default)
    }
}
