//! Transverse Mercator, USGS series formulation (EPSG methods 9807 and 9808).
//!
//! Forward equations are Snyder 8-9 to 8-11. The inverse solves for the
//! footpoint latitude by Newton iteration on the meridian arc, then applies
//! Snyder 8-17 and 8-18.
//!
//! The South Orientated form (9808) measures westing and southing from the
//! false origin instead of easting and northing.

use crate::factory::CoordinateProjection;
use crate::math::{adjust_lon, footpoint_latitude, mlfn};
use crs_common::Ellipsoid;
use std::f64::consts::FRAC_PI_2;

#[derive(Debug, Clone)]
pub struct TransverseMercator {
    /// Semi-major axis (metres)
    pub a: f64,
    /// Eccentricity squared
    pub e2: f64,
    /// Second eccentricity squared
    pub ep2: f64,
    /// Longitude of natural origin (radians)
    pub lon0: f64,
    /// Scale factor at natural origin
    pub k0: f64,
    /// False easting (metres)
    pub false_easting: f64,
    /// False northing (metres)
    pub false_northing: f64,
    /// Axes point west and south
    pub south_orientated: bool,
    /// Meridian distance to the latitude of origin
    m0: f64,
}

impl TransverseMercator {
    /// # Arguments
    /// * `lat0` - Latitude of natural origin (radians)
    /// * `lon0` - Longitude of natural origin (radians)
    /// * `k0` - Scale factor at natural origin
    pub fn new(
        ellipsoid: &Ellipsoid,
        lat0: f64,
        lon0: f64,
        k0: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let a = ellipsoid.semi_major_axis();
        let e2 = ellipsoid.eccentricity_squared();
        Self {
            a,
            e2,
            ep2: e2 / (1.0 - e2),
            lon0,
            k0,
            false_easting,
            false_northing,
            south_orientated: false,
            m0: a * mlfn(e2, lat0),
        }
    }

    pub fn south_orientated(mut self) -> Self {
        self.south_orientated = true;
        self
    }

    /// UTM zone on the given ellipsoid; `zone` is 1-60.
    pub fn utm(ellipsoid: &Ellipsoid, zone: u8, north: bool) -> Self {
        let lon0 = (f64::from(zone) * 6.0 - 183.0).to_radians();
        let false_northing = if north { 0.0 } else { 10_000_000.0 };
        Self::new(ellipsoid, 0.0, lon0, 0.9996, 500_000.0, false_northing)
    }

    fn meridian_arc(&self, phi: f64) -> f64 {
        self.a * mlfn(self.e2, phi)
    }
}

impl CoordinateProjection for TransverseMercator {
    fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (sin_phi, cos_phi) = lat.sin_cos();
        let tan_phi = lat.tan();
        let t = tan_phi * tan_phi;
        let c = self.ep2 * cos_phi * cos_phi;
        let a = adjust_lon(lon - self.lon0) * cos_phi;
        let n = self.a / (1.0 - self.e2 * sin_phi * sin_phi).sqrt();
        let m = self.meridian_arc(lat);

        let a2 = a * a;
        let x = self.k0
            * n
            * (a + (1.0 - t + c) * a * a2 / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * self.ep2) * a * a2 * a2 / 120.0);
        let y = self.k0
            * (m - self.m0
                + n * tan_phi
                    * (a2 / 2.0
                        + (5.0 - t + 9.0 * c + 4.0 * c * c) * a2 * a2 / 24.0
                        + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * self.ep2) * a2 * a2 * a2
                            / 720.0));

        if self.south_orientated {
            (self.false_easting - x, self.false_northing - y)
        } else {
            (self.false_easting + x, self.false_northing + y)
        }
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let (x, y) = if self.south_orientated {
            (self.false_easting - x, self.false_northing - y)
        } else {
            (x - self.false_easting, y - self.false_northing)
        };

        let m = self.m0 + y / self.k0;
        let phi1 = footpoint_latitude(m, self.a, self.e2, |p| self.meridian_arc(p));
        if phi1.abs() >= FRAC_PI_2 {
            return (self.lon0, FRAC_PI_2.copysign(phi1));
        }

        let (sin_phi, cos_phi) = phi1.sin_cos();
        let tan_phi = phi1.tan();
        let t = tan_phi * tan_phi;
        let c = self.ep2 * cos_phi * cos_phi;
        let con = 1.0 - self.e2 * sin_phi * sin_phi;
        let n = self.a / con.sqrt();
        let r = self.a * (1.0 - self.e2) / con.powf(1.5);
        let d = x / (n * self.k0);
        let d2 = d * d;

        let lat = phi1
            - (n * tan_phi / r)
                * (d2 / 2.0
                    - (5.0 + 3.0 * t + 10.0 * c - 4.0 * c * c - 9.0 * self.ep2) * d2 * d2 / 24.0
                    + (61.0 + 90.0 * t + 298.0 * c + 45.0 * t * t - 252.0 * self.ep2 - 3.0 * c * c)
                        * d2
                        * d2
                        * d2
                        / 720.0);
        let lon = self.lon0
            + (d - (1.0 + 2.0 * t + c) * d * d2 / 6.0
                + (5.0 - 2.0 * c + 28.0 * t - 3.0 * c * c + 8.0 * self.ep2 + 24.0 * t * t)
                    * d
                    * d2
                    * d2
                    / 120.0)
                / cos_phi;
        (adjust_lon(lon), lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dms(d: f64, m: f64, s: f64) -> f64 {
        (d.abs() + m / 60.0 + s / 3600.0).copysign(d).to_radians()
    }

    #[test]
    fn test_utm_zone_10_central_meridian() {
        let proj = TransverseMercator::utm(&Ellipsoid::grs80(), 10, true);
        let (x, y) = proj.project((-123.0_f64).to_radians(), 49.0_f64.to_radians());
        assert!((x - 500_000.0).abs() < 1e-6, "easting {}", x);
        assert!((y - 5_427_455.78).abs() < 0.01, "northing {}", y);
    }

    #[test]
    fn test_british_national_grid() {
        let airy = Ellipsoid::from_inverse_flattening("Airy 1830", 6_377_563.396, 299.3249646);
        let proj = TransverseMercator::new(
            &airy,
            49.0_f64.to_radians(),
            (-2.0_f64).to_radians(),
            0.9996012717,
            400_000.0,
            -100_000.0,
        );
        let (x, y) = proj.project(dms(0.0, 30.0, 0.0), dms(50.0, 30.0, 0.0));
        assert!((x - 577_274.99).abs() < 0.01, "easting {}", x);
        assert!((y - 69_740.50).abs() < 0.01, "northing {}", y);
    }

    #[test]
    fn test_south_orientated_lo29() {
        let proj =
            TransverseMercator::new(&Ellipsoid::wgs84(), 0.0, 29.0_f64.to_radians(), 1.0, 0.0, 0.0)
                .south_orientated();
        let (w, s) = proj.project(dms(28.0, 16.0, 57.479), dms(-25.0, 43.0, 55.302));
        assert!((w - 71_984.49).abs() < 0.05, "westing {}", w);
        assert!((s - 2_847_342.74).abs() < 0.05, "southing {}", s);

        let (lon, lat) = proj.inverse(w, s);
        assert!((lon - dms(28.0, 16.0, 57.479)).abs() < 1e-11);
        assert!((lat - dms(-25.0, 43.0, 55.302)).abs() < 1e-11);
    }

    #[test]
    fn test_roundtrip_off_meridian() {
        let proj = TransverseMercator::utm(&Ellipsoid::grs80(), 10, true);
        for (lon, lat) in [(-120.0_f64, 60.0_f64), (-126.0, 35.0), (-123.0, 0.0), (-121.5, 75.0)] {
            let (x, y) = proj.project(lon.to_radians(), lat.to_radians());
            let (lon2, lat2) = proj.inverse(x, y);
            assert!((lon2.to_degrees() - lon).abs() < 1e-7, "lon {} -> {}", lon, lon2.to_degrees());
            assert!((lat2.to_degrees() - lat).abs() < 1e-7, "lat {} -> {}", lat, lat2.to_degrees());
        }
    }
}
