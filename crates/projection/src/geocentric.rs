//! Geodetic ↔ geocentric (earth-centred, earth-fixed) conversion.

use crate::math::{CONVERGENCE, MAX_ITERATIONS};
use crs_common::Ellipsoid;
use nalgebra::Vector3;

/// Conversion between geodetic coordinates and ECEF cartesian coordinates.
pub trait GeocentricConversion {
    /// Longitude and latitude in radians, height in metres above the ellipsoid.
    fn geodetic_to_geocentric(&self, lon: f64, lat: f64, height: f64) -> Vector3<f64>;

    /// Returns `(lon, lat, height)`; latitude is iterated to convergence and
    /// the last estimate is kept when the iteration cap is reached.
    fn geocentric_to_geodetic(&self, point: &Vector3<f64>) -> (f64, f64, f64);
}

impl GeocentricConversion for Ellipsoid {
    fn geodetic_to_geocentric(&self, lon: f64, lat: f64, height: f64) -> Vector3<f64> {
        let e2 = self.eccentricity_squared();
        let n = self.prime_vertical_radius(lat);
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lon, cos_lon) = lon.sin_cos();
        Vector3::new(
            (n + height) * cos_lat * cos_lon,
            (n + height) * cos_lat * sin_lon,
            (n * (1.0 - e2) + height) * sin_lat,
        )
    }

    fn geocentric_to_geodetic(&self, point: &Vector3<f64>) -> (f64, f64, f64) {
        let a = self.semi_major_axis();
        let e2 = self.eccentricity_squared();
        let (x, y, z) = (point.x, point.y, point.z);
        let p = x.hypot(y);
        let lon = y.atan2(x);

        let mut lat = z.atan2(p * (1.0 - e2));
        for _ in 0..MAX_ITERATIONS {
            let n = self.prime_vertical_radius(lat);
            let next = (z + e2 * n * lat.sin()).atan2(p);
            let delta = next - lat;
            lat = next;
            if delta.abs() <= CONVERGENCE {
                break;
            }
        }

        let (sin_lat, cos_lat) = lat.sin_cos();
        let height = p * cos_lat + z * sin_lat - a * (1.0 - e2 * sin_lat * sin_lat).sqrt();
        (lon, lat, height)
    }
}
