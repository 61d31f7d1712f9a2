//! Albers Equal Area conic projection (EPSG method 9822).
//!
//! Equal-area cone secant at two standard parallels, used for province- and
//! state-wide statistics mapping (e.g. BC Albers, EPSG:3005).
//!
//! Reference: Snyder, Map Projections: A Working Manual, pp. 101-102.

use crate::factory::CoordinateProjection;
use crate::math::{adjust_lon, msfn, qsfn, CONVERGENCE, MAX_ITERATIONS};
use crs_common::Ellipsoid;
use std::f64::consts::FRAC_PI_2;

#[derive(Debug, Clone)]
pub struct AlbersEqualArea {
    /// Semi-major axis (metres)
    pub a: f64,
    /// First eccentricity
    pub e: f64,
    /// Eccentricity squared
    pub e2: f64,
    /// Longitude of false origin (radians)
    pub lon0: f64,
    /// False easting (metres)
    pub false_easting: f64,
    /// False northing (metres)
    pub false_northing: f64,
    /// Cone constant
    n: f64,
    /// Snyder's C
    c: f64,
    /// Radius at the latitude of false origin
    rho0: f64,
    /// `q` at the pole, bounding the inverse
    qp: f64,
}

impl AlbersEqualArea {
    /// # Arguments
    /// * `lat0` - Latitude of false origin (radians)
    /// * `lon0` - Longitude of false origin (radians)
    /// * `lat1`, `lat2` - Standard parallels (radians)
    /// * `false_easting`, `false_northing` - Offsets (metres)
    pub fn new(
        ellipsoid: &Ellipsoid,
        lat0: f64,
        lon0: f64,
        lat1: f64,
        lat2: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let a = ellipsoid.semi_major_axis();
        let e = ellipsoid.eccentricity();
        let e2 = ellipsoid.eccentricity_squared();

        let m1 = msfn(e2, lat1);
        let q1 = qsfn(e, lat1);
        let n = if (lat1 - lat2).abs() > 1e-10 {
            let m2 = msfn(e2, lat2);
            let q2 = qsfn(e, lat2);
            (m1 * m1 - m2 * m2) / (q2 - q1)
        } else {
            lat1.sin()
        };
        let c = m1 * m1 + n * q1;
        let rho0 = a * (c - n * qsfn(e, lat0)).sqrt() / n;

        Self {
            a,
            e,
            e2,
            lon0,
            false_easting,
            false_northing,
            n,
            c,
            rho0,
            qp: qsfn(e, FRAC_PI_2),
        }
    }

    fn rho(&self, lat: f64) -> f64 {
        self.a * (self.c - self.n * qsfn(self.e, lat)).max(0.0).sqrt() / self.n
    }

    /// Latitude from `q` (Snyder 3-16), iterated to convergence.
    fn latitude_from_q(&self, q: f64) -> f64 {
        if (self.qp - q.abs()).abs() < 1e-12 || q.abs() > self.qp {
            return FRAC_PI_2.copysign(q);
        }
        let mut phi = (q / 2.0).clamp(-1.0, 1.0).asin();
        if self.e < 1e-7 {
            return phi;
        }
        for _ in 0..MAX_ITERATIONS {
            let sin_phi = phi.sin();
            let es = self.e * sin_phi;
            let one_minus = 1.0 - es * es;
            let delta = one_minus * one_minus / (2.0 * phi.cos())
                * (q / (1.0 - self.e2) - sin_phi / one_minus
                    + (1.0 / (2.0 * self.e)) * ((1.0 - es) / (1.0 + es)).ln());
            phi += delta;
            if delta.abs() <= CONVERGENCE {
                break;
            }
        }
        phi
    }
}

impl CoordinateProjection for AlbersEqualArea {
    fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let rho = self.rho(lat);
        let theta = self.n * adjust_lon(lon - self.lon0);
        (
            self.false_easting + rho * theta.sin(),
            self.false_northing + self.rho0 - rho * theta.cos(),
        )
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let dx = x - self.false_easting;
        let dy = self.rho0 - (y - self.false_northing);
        let (rho, theta) = if self.n >= 0.0 {
            (dx.hypot(dy), dx.atan2(dy))
        } else {
            (-dx.hypot(dy), (-dx).atan2(-dy))
        };
        let ratio = rho * self.n / self.a;
        let q = (self.c - ratio * ratio) / self.n;
        let lat = self.latitude_from_q(q);
        (adjust_lon(theta / self.n + self.lon0), lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bc_albers() -> AlbersEqualArea {
        AlbersEqualArea::new(
            &Ellipsoid::grs80(),
            45.0_f64.to_radians(),
            (-126.0_f64).to_radians(),
            50.0_f64.to_radians(),
            58.5_f64.to_radians(),
            1_000_000.0,
            0.0,
        )
    }

    #[test]
    fn test_bc_albers_forward() {
        let proj = bc_albers();
        let (x, y) = proj.project((-123.0_f64).to_radians(), 49.0_f64.to_radians());
        assert!((x - 1_219_731.7709).abs() < 1e-3, "x = {}", x);
        assert!((y - 447_290.4989).abs() < 1e-3, "y = {}", y);
    }

    #[test]
    fn test_origin_maps_to_false_origin() {
        let proj = bc_albers();
        let (x, y) = proj.project((-126.0_f64).to_radians(), 45.0_f64.to_radians());
        assert!((x - 1_000_000.0).abs() < 1e-6);
        assert!(y.abs() < 1e-6);
    }

    #[test]
    fn test_roundtrip() {
        let proj = bc_albers();
        for (lon, lat) in [(-130.0_f64, 58.0_f64), (-115.0, 49.5), (-126.0, 60.0), (-139.0, 48.3)] {
            let (x, y) = proj.project(lon.to_radians(), lat.to_radians());
            let (lon2, lat2) = proj.inverse(x, y);
            assert!((lon2.to_degrees() - lon).abs() < 1e-9, "lon {} -> {}", lon, lon2.to_degrees());
            assert!((lat2.to_degrees() - lat).abs() < 1e-9, "lat {} -> {}", lat, lat2.to_degrees());
        }
    }
}
