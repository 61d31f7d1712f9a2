//! Lambert Conformal Conic projection.
//!
//! Three EPSG formulations share one set of equations:
//! - 1SP (method 9801): a single parallel of origin with a scale factor
//! - 2SP (method 9802): a cone secant at two standard parallels
//! - 2SP Belgium (method 9803): 2SP with a 29.2985" rotation of the grid
//!
//! Reference: IOGP Guidance Note 7-2, section 3.2.1.

use crate::factory::CoordinateProjection;
use crate::math::{adjust_lon, msfn, phi2, tsfn};
use crs_common::Ellipsoid;
use std::f64::consts::FRAC_PI_2;

/// Rotation applied by the Belgian 1972 variant, in arc-seconds.
const BELGIUM_ROTATION_ARCSEC: f64 = 29.2985;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LambertVariant {
    OneParallel,
    TwoParallel,
    Belgium,
}

/// Lambert Conformal Conic projection parameters.
#[derive(Debug, Clone)]
pub struct LambertConformal {
    pub variant: LambertVariant,
    /// Semi-major axis (metres)
    pub a: f64,
    /// First eccentricity
    pub e: f64,
    /// Central meridian (radians)
    pub lon0: f64,
    /// False easting (metres)
    pub false_easting: f64,
    /// False northing (metres)
    pub false_northing: f64,
    /// Cone constant (n)
    n: f64,
    /// `a * F`, scaled by k0 for the 1SP form
    af: f64,
    /// Rho at the latitude of origin
    rho0: f64,
    /// Grid rotation (radians), zero except for Belgium
    rotation: f64,
}

impl LambertConformal {
    /// One standard parallel, which is also the latitude of natural origin.
    ///
    /// # Arguments
    /// * `lat0` - Latitude of natural origin (radians)
    /// * `lon0` - Longitude of natural origin (radians)
    /// * `k0` - Scale factor at natural origin
    pub fn one_parallel(
        ellipsoid: &Ellipsoid,
        lat0: f64,
        lon0: f64,
        k0: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let a = ellipsoid.semi_major_axis();
        let e = ellipsoid.eccentricity();
        let e2 = ellipsoid.eccentricity_squared();

        let n = lat0.sin();
        let t0 = tsfn(e, lat0);
        let f = msfn(e2, lat0) / (n * t0.powf(n));
        let af = a * f * k0;

        Self {
            variant: LambertVariant::OneParallel,
            a,
            e,
            lon0,
            false_easting,
            false_northing,
            n,
            af,
            rho0: af * t0.powf(n),
            rotation: 0.0,
        }
    }

    /// Two standard parallels; falls back to the tangent cone when they coincide.
    ///
    /// # Arguments
    /// * `lat0` - Latitude of false origin (radians)
    /// * `lon0` - Longitude of false origin (radians)
    /// * `lat1`, `lat2` - Standard parallels (radians)
    #[allow(clippy::too_many_arguments)]
    pub fn two_parallel(
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
        let t1 = tsfn(e, lat1);
        let n = if (lat1 - lat2).abs() > 1e-10 {
            let m2 = msfn(e2, lat2);
            let t2 = tsfn(e, lat2);
            (m1.ln() - m2.ln()) / (t1.ln() - t2.ln())
        } else {
            lat1.sin()
        };
        let f = m1 / (n * t1.powf(n));
        let af = a * f;

        Self {
            variant: LambertVariant::TwoParallel,
            a,
            e,
            lon0,
            false_easting,
            false_northing,
            n,
            af,
            rho0: af * tsfn(e, lat0).powf(n),
            rotation: 0.0,
        }
    }

    /// Belgian 1972 variant of the two parallel form.
    #[allow(clippy::too_many_arguments)]
    pub fn belgium(
        ellipsoid: &Ellipsoid,
        lat0: f64,
        lon0: f64,
        lat1: f64,
        lat2: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        Self {
            variant: LambertVariant::Belgium,
            rotation: (BELGIUM_ROTATION_ARCSEC / 3600.0).to_radians(),
            ..Self::two_parallel(ellipsoid, lat0, lon0, lat1, lat2, false_easting, false_northing)
        }
    }

    /// Cone constant.
    pub fn cone_constant(&self) -> f64 {
        self.n
    }
}

impl CoordinateProjection for LambertConformal {
    fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let rho = if (lat.abs() - FRAC_PI_2).abs() < 1e-12 && lat * self.n > 0.0 {
            0.0
        } else {
            self.af * tsfn(self.e, lat).powf(self.n)
        };
        let theta = self.n * adjust_lon(lon - self.lon0) - self.rotation;
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

        let lat = if rho == 0.0 {
            FRAC_PI_2.copysign(self.n)
        } else {
            let t = (rho / self.af).powf(1.0 / self.n);
            phi2(self.e, t)
        };
        let lon = adjust_lon((theta + self.rotation) / self.n + self.lon0);
        (lon, lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const US_SURVEY_FOOT: f64 = 1200.0 / 3937.0;

    fn clarke_1866() -> Ellipsoid {
        Ellipsoid::from_inverse_flattening("Clarke 1866", 6_378_206.4, 294.9786982)
    }

    fn dms(d: f64, m: f64, s: f64) -> f64 {
        (d.abs() + m / 60.0 + s / 3600.0).copysign(d).to_radians()
    }

    #[test]
    fn test_texas_south_central_2sp() {
        let proj = LambertConformal::two_parallel(
            &clarke_1866(),
            dms(27.0, 50.0, 0.0),
            (-99.0_f64).to_radians(),
            dms(28.0, 23.0, 0.0),
            dms(30.0, 17.0, 0.0),
            2_000_000.0 * US_SURVEY_FOOT,
            0.0,
        );
        let (x, y) = proj.project((-96.0_f64).to_radians(), dms(28.0, 30.0, 0.0));
        assert!((x / US_SURVEY_FOOT - 2_963_503.91).abs() < 0.01, "easting {}", x / US_SURVEY_FOOT);
        assert!((y / US_SURVEY_FOOT - 254_759.80).abs() < 0.01, "northing {}", y / US_SURVEY_FOOT);

        let (lon, lat) = proj.inverse(x, y);
        assert!((lon.to_degrees() + 96.0).abs() < 1e-9);
        assert!((lat - dms(28.0, 30.0, 0.0)).abs() < 1e-11);
    }

    #[test]
    fn test_jamaica_1sp() {
        let proj = LambertConformal::one_parallel(
            &clarke_1866(),
            18.0_f64.to_radians(),
            (-77.0_f64).to_radians(),
            1.0,
            250_000.0,
            150_000.0,
        );
        let (x, y) = proj.project(dms(-76.0, 56.0, 37.26), dms(17.0, 55.0, 55.80));
        assert!((x - 255_966.58).abs() < 0.01, "easting {}", x);
        assert!((y - 142_493.51).abs() < 0.01, "northing {}", y);
    }

    #[test]
    fn test_belgium_rotation() {
        let intl = Ellipsoid::from_inverse_flattening("International 1924", 6_378_388.0, 297.0);
        let proj = LambertConformal::belgium(
            &intl,
            90.0_f64.to_radians(),
            dms(4.0, 21.0, 24.983),
            dms(49.0, 50.0, 0.00204),
            dms(51.0, 10.0, 0.00204),
            150_000.013,
            5_400_088.438,
        );
        let (x, y) = proj.project(dms(5.0, 48.0, 26.533), dms(50.0, 40.0, 46.461));
        assert!((x - 251_763.20).abs() < 0.1, "easting {}", x);
        assert!((y - 153_034.13).abs() < 0.1, "northing {}", y);

        let (lon, lat) = proj.inverse(x, y);
        assert!((lon - dms(5.0, 48.0, 26.533)).abs() < 1e-11);
        assert!((lat - dms(50.0, 40.0, 46.461)).abs() < 1e-11);
    }

    #[test]
    fn test_southern_cone_roundtrip() {
        let proj = LambertConformal::two_parallel(
            &Ellipsoid::wgs84(),
            (-32.0_f64).to_radians(),
            135.0_f64.to_radians(),
            (-28.0_f64).to_radians(),
            (-36.0_f64).to_radians(),
            0.0,
            0.0,
        );
        assert!(proj.cone_constant() < 0.0);
        for (lon, lat) in [(130.0_f64, -25.0_f64), (140.0, -40.0), (135.0, -32.0)] {
            let (x, y) = proj.project(lon.to_radians(), lat.to_radians());
            let (lon2, lat2) = proj.inverse(x, y);
            assert!((lon2.to_degrees() - lon).abs() < 1e-9, "lon {}", lon2.to_degrees());
            assert!((lat2.to_degrees() - lat).abs() < 1e-9, "lat {}", lat2.to_degrees());
        }
    }
}
