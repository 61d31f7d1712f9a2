//! Mercator projections.
//!
//! Covers the ellipsoidal variants A (1SP, EPSG 9804) and B (2SP, EPSG 9805),
//! the spherical 1SP form (EPSG 9841) and Popular Visualisation Pseudo
//! Mercator (EPSG 1024), which applies the spherical equations to the
//! semi-major axis of an ellipsoidal datum.

use crate::factory::CoordinateProjection;
use crate::math::{adjust_lon, msfn, phi2, tsfn};
use crs_common::Ellipsoid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MercatorVariant {
    OneParallel,
    TwoParallel,
    Spherical,
    PseudoMercator,
}

#[derive(Debug, Clone)]
pub struct Mercator {
    pub variant: MercatorVariant,
    /// Eccentricity used by the equations; zero for the spherical forms
    pub e: f64,
    /// Central meridian (radians)
    pub lon0: f64,
    /// False easting (metres)
    pub false_easting: f64,
    /// False northing (metres)
    pub false_northing: f64,
    /// `a * k0`
    ak0: f64,
}

impl Mercator {
    /// Variant A: scale factor at the equator.
    pub fn one_parallel(
        ellipsoid: &Ellipsoid,
        lon0: f64,
        k0: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        Self {
            variant: MercatorVariant::OneParallel,
            e: ellipsoid.eccentricity(),
            lon0,
            false_easting,
            false_northing,
            ak0: ellipsoid.semi_major_axis() * k0,
        }
    }

    /// Variant B: the scale factor is derived from the standard parallel `lat1`.
    pub fn two_parallel(
        ellipsoid: &Ellipsoid,
        lon0: f64,
        lat1: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let k0 = msfn(ellipsoid.eccentricity_squared(), lat1);
        Self {
            variant: MercatorVariant::TwoParallel,
            ..Self::one_parallel(ellipsoid, lon0, k0, false_easting, false_northing)
        }
    }

    /// Spherical form on a sphere of radius `a`.
    pub fn spherical(
        ellipsoid: &Ellipsoid,
        lon0: f64,
        k0: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        Self {
            variant: MercatorVariant::Spherical,
            e: 0.0,
            ..Self::one_parallel(ellipsoid, lon0, k0, false_easting, false_northing)
        }
    }

    /// Web Mercator: spherical equations on the ellipsoid's semi-major axis.
    pub fn pseudo_mercator(
        ellipsoid: &Ellipsoid,
        lon0: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        Self {
            variant: MercatorVariant::PseudoMercator,
            e: 0.0,
            ..Self::one_parallel(ellipsoid, lon0, 1.0, false_easting, false_northing)
        }
    }
}

impl CoordinateProjection for Mercator {
    /// Latitudes of ±90° map to infinite northings.
    #[inline]
    fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        (
            self.false_easting + self.ak0 * adjust_lon(lon - self.lon0),
            self.false_northing - self.ak0 * tsfn(self.e, lat).ln(),
        )
    }

    #[inline]
    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let t = (-(y - self.false_northing) / self.ak0).exp();
        let lat = phi2(self.e, t);
        let lon = adjust_lon((x - self.false_easting) / self.ak0 + self.lon0);
        (lon, lat)
    }
}
