//! Point transforms between two coordinate systems on the same geodetic datum.
//!
//! Every transform goes through geodetic longitude/latitude in radians,
//! relative to Greenwich, plus an ellipsoidal height:
//!
//! ```text
//! source ──to_geodetic──▶ (λ, φ, h) ──from_geodetic──▶ target
//! ```
//!
//! Geographic coordinates are `(lon, lat)` in the system's angular unit,
//! projected coordinates `(x, y)` in its linear unit and geocentric
//! coordinates `(X, Y, Z)` in its linear unit. A compound system transforms
//! through its horizontal part and passes the height through.

use crate::factory::{CoordinateProjection, Projection};
use crate::geocentric::GeocentricConversion;
use crs_common::{CoordinateSystem, CrsError, CrsResult, Datum, Ellipsoid, UnitOfMeasure};
use nalgebra::Vector3;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Endpoint {
    Geographic {
        unit: Arc<UnitOfMeasure>,
        /// Prime meridian offset (radians)
        meridian: f64,
    },
    Projected {
        projection: Box<Projection>,
        meridian: f64,
    },
    Geocentric {
        ellipsoid: Arc<Ellipsoid>,
        unit: Arc<UnitOfMeasure>,
    },
}

impl Endpoint {
    fn new(crs: &CoordinateSystem) -> CrsResult<Self> {
        match crs {
            CoordinateSystem::Geographic(g) => Ok(Endpoint::Geographic {
                unit: g.angular_unit.clone(),
                meridian: g.prime_meridian().longitude_radians(),
            }),
            CoordinateSystem::Projected(p) => Ok(Endpoint::Projected {
                projection: Box::new(Projection::new(p)?),
                meridian: p.base.prime_meridian().longitude_radians(),
            }),
            CoordinateSystem::Geocentric(g) => Ok(Endpoint::Geocentric {
                ellipsoid: g.ellipsoid().clone(),
                unit: g.linear_unit.clone(),
            }),
            CoordinateSystem::Compound(c) => Endpoint::new(&c.horizontal),
            other => Err(CrsError::UnsupportedTransform(format!(
                "{} system '{}' has no geodetic position",
                other.kind(),
                other.name()
            ))),
        }
    }

    fn is_geocentric(&self) -> bool {
        matches!(self, Endpoint::Geocentric { .. })
    }

    fn to_geodetic(&self, p: &Vector3<f64>) -> (f64, f64, f64) {
        match self {
            Endpoint::Geographic { unit, meridian } => {
                (unit.to_radians(p.x) + meridian, unit.to_radians(p.y), p.z)
            }
            Endpoint::Projected {
                projection,
                meridian,
            } => {
                let (lon, lat) = projection.inverse(p.x, p.y);
                (lon + meridian, lat, p.z)
            }
            Endpoint::Geocentric { ellipsoid, unit } => {
                let metres = Vector3::new(unit.to_base(p.x), unit.to_base(p.y), unit.to_base(p.z));
                ellipsoid.geocentric_to_geodetic(&metres)
            }
        }
    }

    fn from_geodetic(&self, lon: f64, lat: f64, height: f64) -> Vector3<f64> {
        match self {
            Endpoint::Geographic { unit, meridian } => {
                Vector3::new(unit.from_radians(lon - meridian), unit.from_radians(lat), height)
            }
            Endpoint::Projected {
                projection,
                meridian,
            } => {
                let (x, y) = projection.project(lon - meridian, lat);
                Vector3::new(x, y, height)
            }
            Endpoint::Geocentric { ellipsoid, unit } => {
                let p = ellipsoid.geodetic_to_geocentric(lon, lat, height);
                Vector3::new(unit.from_base(p.x), unit.from_base(p.y), unit.from_base(p.z))
            }
        }
    }
}

/// A transform between two coordinate systems sharing a geodetic datum.
#[derive(Debug, Clone)]
pub struct CoordinatesOperation {
    source: Endpoint,
    target: Endpoint,
}

impl CoordinatesOperation {
    /// Fails with `DatumMismatch` when the geodetic datums differ, since no
    /// datum shift is applied, and with `UnsupportedTransform` for vertical
    /// or engineering systems.
    pub fn new(source: &CoordinateSystem, target: &CoordinateSystem) -> CrsResult<Self> {
        let source_endpoint = Endpoint::new(source)?;
        let target_endpoint = Endpoint::new(target)?;
        check_datums(source.geodetic_datum(), target.geodetic_datum())?;
        Ok(Self {
            source: source_endpoint,
            target: target_endpoint,
        })
    }

    /// Horizontal transform; heights are taken as zero.
    pub fn transform(&self, x: f64, y: f64) -> CrsResult<(f64, f64)> {
        if self.source.is_geocentric() || self.target.is_geocentric() {
            return Err(CrsError::UnsupportedTransform(
                "geocentric coordinates need transform_3d".to_string(),
            ));
        }
        let p = self.transform_3d(&Vector3::new(x, y, 0.0));
        Ok((p.x, p.y))
    }

    pub fn transform_3d(&self, point: &Vector3<f64>) -> Vector3<f64> {
        let (lon, lat, height) = self.source.to_geodetic(point);
        self.target.from_geodetic(lon, lat, height)
    }

    /// Transform a batch of points in place.
    pub fn transform_all(&self, points: &mut [(f64, f64)]) -> CrsResult<()> {
        for point in points.iter_mut() {
            *point = self.transform(point.0, point.1)?;
        }
        Ok(())
    }
}

fn check_datums(source: Option<&Arc<Datum>>, target: Option<&Arc<Datum>>) -> CrsResult<()> {
    match (source, target) {
        (Some(s), Some(t)) if s != t => Err(CrsError::DatumMismatch {
            source_datum: s.name.clone(),
            target_datum: t.name.clone(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crs_common::{
        CoordinateOperationMethod, CrsHeader, GeocentricCrs, GeographicCrs, ParameterValue,
        ParameterValues, PrimeMeridian, ProjectedCrs,
    };

    fn datum(name: &str, meridian: PrimeMeridian) -> Arc<Datum> {
        Arc::new(Datum::geodetic(name, Arc::new(Ellipsoid::grs80()), Arc::new(meridian)))
    }

    fn geographic(datum: Arc<Datum>, unit: UnitOfMeasure) -> GeographicCrs {
        GeographicCrs::new(CrsHeader::anonymous("geo"), datum, Arc::new(unit)).unwrap()
    }

    fn utm10(base: GeographicCrs) -> CoordinateSystem {
        let params = ParameterValues::new()
            .with("central_meridian", ParameterValue::decimal("-123"))
            .with("scale_factor", ParameterValue::decimal("0.9996"))
            .with("false_easting", ParameterValue::decimal("500000"));
        ProjectedCrs::new(
            CrsHeader::anonymous("utm"),
            Arc::new(base),
            Arc::new(CoordinateOperationMethod::new(9807, "Transverse Mercator")),
            params,
            Arc::new(UnitOfMeasure::metre()),
        )
        .unwrap()
        .into()
    }

    #[test]
    fn test_geographic_to_projected_and_back() {
        let nad83 = datum("NAD83", PrimeMeridian::greenwich());
        let geo: CoordinateSystem = geographic(nad83.clone(), UnitOfMeasure::degree()).into();
        let utm = utm10(geographic(nad83, UnitOfMeasure::degree()));

        let forward = CoordinatesOperation::new(&geo, &utm).unwrap();
        let (x, y) = forward.transform(-123.0, 49.0).unwrap();
        assert!((x - 500_000.0).abs() < 1e-6);
        assert!((y - 5_427_455.78).abs() < 0.01);

        let back = CoordinatesOperation::new(&utm, &geo).unwrap();
        let (lon, lat) = back.transform(x, y).unwrap();
        assert!((lon + 123.0).abs() < 1e-9 && (lat - 49.0).abs() < 1e-9);
    }

    #[test]
    fn test_angular_unit_and_prime_meridian() {
        let paris = datum("NTF Paris", PrimeMeridian::new("Paris", 2.33722917));
        let grad = UnitOfMeasure::derived(Arc::new(UnitOfMeasure::radian()), "grad", std::f64::consts::PI / 200.0);
        let in_grads: CoordinateSystem = geographic(paris.clone(), grad).into();
        let in_degrees: CoordinateSystem = geographic(paris, UnitOfMeasure::degree()).into();

        let op = CoordinatesOperation::new(&in_grads, &in_degrees).unwrap();
        let (lon, lat) = op.transform(100.0, 50.0).unwrap();
        assert!((lon - 90.0).abs() < 1e-9, "lon {}", lon);
        assert!((lat - 45.0).abs() < 1e-9, "lat {}", lat);
    }

    #[test]
    fn test_datum_mismatch() {
        let a: CoordinateSystem = geographic(datum("NAD83", PrimeMeridian::greenwich()), UnitOfMeasure::degree()).into();
        let b: CoordinateSystem = geographic(datum("NAD27", PrimeMeridian::greenwich()), UnitOfMeasure::degree()).into();
        let err = CoordinatesOperation::new(&a, &b).unwrap_err();
        assert!(matches!(err, CrsError::DatumMismatch { .. }), "{:?}", err);
    }

    #[test]
    fn test_geocentric_requires_3d() {
        let wgs = datum("WGS 84", PrimeMeridian::greenwich());
        let geo: CoordinateSystem = geographic(wgs.clone(), UnitOfMeasure::degree()).into();
        let ecef: CoordinateSystem =
            GeocentricCrs::new(CrsHeader::anonymous("ecef"), wgs, Arc::new(UnitOfMeasure::metre()))
                .unwrap()
                .into();

        let op = CoordinatesOperation::new(&geo, &ecef).unwrap();
        assert!(op.transform(0.0, 0.0).is_err());
        let p = op.transform_3d(&Vector3::new(0.0, 0.0, 0.0));
        assert!((p.x - 6_378_137.0).abs() < 1e-6);

        let back = CoordinatesOperation::new(&ecef, &geo).unwrap();
        let q = back.transform_3d(&Vector3::new(6_378_137.0 + 10.0, 0.0, 0.0));
        assert!(q.x.abs() < 1e-12 && q.y.abs() < 1e-12);
        assert!((q.z - 10.0).abs() < 1e-6);
    }
}
