//! Reference ellipsoid.

use crate::authority::Authority;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

const VINCENTY_MAX_ITERATIONS: usize = 100;
const VINCENTY_TOLERANCE: f64 = 1e-12;

struct Geodesic {
    distance: f64,
    /// Radians, unnormalized.
    azimuth: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ellipsoid {
    pub name: String,
    semi_major_axis: f64,
    semi_minor_axis: f64,
    /// Zero for a sphere.
    inverse_flattening: f64,
    eccentricity_squared: f64,
    eccentricity: f64,
    pub authority: Option<Authority>,
    pub deprecated: bool,
}

impl Ellipsoid {
    /// Build from the semi-major axis plus either the semi-minor axis or the
    /// inverse flattening. A missing (NaN) value is derived from the other;
    /// an infinite or zero inverse flattening means a sphere.
    pub fn new(
        name: impl Into<String>,
        semi_major_axis: f64,
        semi_minor_axis: f64,
        inverse_flattening: f64,
    ) -> Self {
        let a = semi_major_axis;
        let mut b = semi_minor_axis;
        let mut inv_f = inverse_flattening;

        if !inv_f.is_finite() || inv_f == 0.0 {
            if b.is_finite() && b != a {
                inv_f = a / (a - b);
            } else {
                inv_f = 0.0;
                b = a;
            }
        }
        if !b.is_finite() {
            b = if inv_f == 0.0 { a } else { a - a / inv_f };
        }

        let f = if inv_f == 0.0 { 0.0 } else { 1.0 / inv_f };
        let e2 = 2.0 * f - f * f;

        Self {
            name: name.into(),
            semi_major_axis: a,
            semi_minor_axis: b,
            inverse_flattening: inv_f,
            eccentricity_squared: e2,
            eccentricity: e2.sqrt(),
            authority: None,
            deprecated: false,
        }
    }

    pub fn from_inverse_flattening(name: impl Into<String>, a: f64, inverse_flattening: f64) -> Self {
        Self::new(name, a, f64::NAN, inverse_flattening)
    }

    pub fn sphere(name: impl Into<String>, radius: f64) -> Self {
        Self::new(name, radius, radius, 0.0)
    }

    pub fn wgs84() -> Self {
        Self::from_inverse_flattening("WGS 84", 6_378_137.0, 298.257223563)
            .with_authority(Authority::epsg(7030))
    }

    pub fn grs80() -> Self {
        Self::from_inverse_flattening("GRS 1980", 6_378_137.0, 298.257222101)
            .with_authority(Authority::epsg(7019))
    }

    pub fn with_authority(mut self, authority: Authority) -> Self {
        self.authority = Some(authority);
        self
    }

    pub fn with_deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    pub fn semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    pub fn semi_minor_axis(&self) -> f64 {
        self.semi_minor_axis
    }

    pub fn inverse_flattening(&self) -> f64 {
        self.inverse_flattening
    }

    pub fn flattening(&self) -> f64 {
        if self.inverse_flattening == 0.0 {
            0.0
        } else {
            1.0 / self.inverse_flattening
        }
    }

    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    pub fn eccentricity_squared(&self) -> f64 {
        self.eccentricity_squared
    }

    pub fn is_sphere(&self) -> bool {
        self.inverse_flattening == 0.0
    }

    /// Radius of curvature in the prime vertical at latitude `phi` (radians).
    pub fn prime_vertical_radius(&self, phi: f64) -> f64 {
        let s = phi.sin();
        self.semi_major_axis / (1.0 - self.eccentricity_squared * s * s).sqrt()
    }

    /// Radius of curvature in the meridian at latitude `phi` (radians).
    pub fn meridian_radius(&self, phi: f64) -> f64 {
        let s = phi.sin();
        let w = 1.0 - self.eccentricity_squared * s * s;
        self.semi_major_axis * (1.0 - self.eccentricity_squared) / w.powf(1.5)
    }

    /// Distance from the centre to the surface at geodetic latitude `phi` (radians).
    pub fn geocentric_radius(&self, phi: f64) -> f64 {
        let (a, b) = (self.semi_major_axis, self.semi_minor_axis);
        let (s, c) = phi.sin_cos();
        (a * a * c).hypot(b * b * s) / (a * c).hypot(b * s)
    }

    /// Radius of curvature at latitude `phi` in the direction of `azimuth`
    /// (both radians), by Euler's formula.
    pub fn radius(&self, phi: f64, azimuth: f64) -> f64 {
        let n = self.prime_vertical_radius(phi);
        let m = self.meridian_radius(phi);
        let (s, c) = azimuth.sin_cos();
        n * m / (n * c * c + m * s * s)
    }

    /// Geodesic distance in metres between two points given in degrees.
    ///
    /// `None` when the iteration fails to converge, which only happens for
    /// nearly antipodal points.
    pub fn distance_metres(&self, lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> Option<f64> {
        self.inverse_geodesic(lon1.to_radians(), lat1.to_radians(), lon2.to_radians(), lat2.to_radians())
            .map(|g| g.distance)
    }

    /// Initial azimuth in degrees clockwise from north, in `[0, 360)`, of
    /// the geodesic from the first point to the second.
    pub fn azimuth(&self, lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> Option<f64> {
        self.inverse_geodesic(lon1.to_radians(), lat1.to_radians(), lon2.to_radians(), lat2.to_radians())
            .map(|g| g.azimuth.to_degrees().rem_euclid(360.0))
    }

    /// Vincenty's inverse formula. Coincident points give a zero distance
    /// and azimuth.
    fn inverse_geodesic(&self, lambda1: f64, phi1: f64, lambda2: f64, phi2: f64) -> Option<Geodesic> {
        let f = self.flattening();
        let a = self.semi_major_axis;
        let b = self.semi_minor_axis;

        let l = lambda2 - lambda1;
        let reduced = |phi: f64| {
            let tan_u = (1.0 - f) * phi.tan();
            let cos_u = 1.0 / (1.0 + tan_u * tan_u).sqrt();
            (tan_u * cos_u, cos_u)
        };
        let (sin_u1, cos_u1) = reduced(phi1);
        let (sin_u2, cos_u2) = reduced(phi2);

        let mut lambda = l;
        let mut converged = false;
        let mut terms = (0.0, 0.0, 0.0, 0.0, 0.0);
        for _ in 0..VINCENTY_MAX_ITERATIONS {
            let (sin_lambda, cos_lambda) = lambda.sin_cos();
            let sin_sigma = (cos_u2 * sin_lambda)
                .hypot(cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda);
            if sin_sigma == 0.0 {
                return Some(Geodesic {
                    distance: 0.0,
                    azimuth: 0.0,
                });
            }
            let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
            let sigma = sin_sigma.atan2(cos_sigma);
            let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
            let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
            // Zero on an equatorial line.
            let cos_2sigma_m = if cos_sq_alpha == 0.0 {
                0.0
            } else {
                cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
            };
            let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
            let previous = lambda;
            lambda = l
                + (1.0 - c)
                    * f
                    * sin_alpha
                    * (sigma
                        + c * sin_sigma
                            * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));
            terms = (sin_sigma, cos_sigma, sigma, cos_sq_alpha, cos_2sigma_m);
            if (lambda - previous).abs() <= VINCENTY_TOLERANCE {
                converged = true;
                break;
            }
        }
        if !converged {
            return None;
        }

        let (sin_sigma, cos_sigma, sigma, cos_sq_alpha, cos_2sigma_m) = terms;
        let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
        let big_a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
        let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
        let c2 = cos_2sigma_m * cos_2sigma_m;
        let delta_sigma = big_b
            * sin_sigma
            * (cos_2sigma_m
                + big_b / 4.0
                    * (cos_sigma * (-1.0 + 2.0 * c2)
                        - big_b / 6.0 * cos_2sigma_m * (-3.0 + 4.0 * sin_sigma * sin_sigma) * (-3.0 + 4.0 * c2)));

        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        Some(Geodesic {
            distance: b * big_a * (sigma - delta_sigma),
            azimuth: (cos_u2 * sin_lambda).atan2(cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda),
        })
    }

    /// Discretised fields used for both equality and hashing, so the two agree.
    pub(crate) fn fingerprint(&self) -> (i64, i64) {
        (
            (10.0 * self.semi_major_axis).floor() as i64,
            (1e6 * self.inverse_flattening).round() as i64,
        )
    }

    pub fn is_same(&self, other: &Ellipsoid) -> bool {
        self.fingerprint() == other.fingerprint()
    }
}

impl PartialEq for Ellipsoid {
    fn eq(&self, other: &Self) -> bool {
        self.is_same(other)
    }
}

impl Hash for Ellipsoid {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fingerprint().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_semi_minor_from_inverse_flattening() {
        let wgs84 = Ellipsoid::wgs84();
        assert!((wgs84.semi_minor_axis() - 6_356_752.314245).abs() < 1e-5);
        assert!((wgs84.eccentricity_squared() - 0.00669437999014).abs() < 1e-13);
    }

    #[test]
    fn test_derive_inverse_flattening_from_semi_minor() {
        let clarke = Ellipsoid::new("Clarke 1866", 6_378_206.4, 6_356_583.8, f64::NAN);
        assert!((clarke.inverse_flattening() - 294.9786982).abs() < 1e-6);
        assert!(!clarke.is_sphere());
    }

    #[test]
    fn test_sphere() {
        let sphere = Ellipsoid::new("sphere", 6_371_007.0, 6_371_007.0, f64::NAN);
        assert!(sphere.is_sphere());
        assert_eq!(sphere.eccentricity(), 0.0);
        assert_eq!(sphere, Ellipsoid::sphere("other name", 6_371_007.0));
    }

    fn dms(degrees: f64, minutes: f64, seconds: f64) -> f64 {
        degrees.signum() * (degrees.abs() + minutes / 60.0 + seconds / 3600.0)
    }

    #[test]
    fn test_vincenty_flinders_peak_to_buninyong() {
        let grs80 = Ellipsoid::grs80();
        let (lon1, lat1) = (dms(144.0, 25.0, 29.52440), dms(-37.0, 57.0, 3.72030));
        let (lon2, lat2) = (dms(143.0, 55.0, 35.38390), dms(-37.0, 39.0, 10.15610));

        let distance = grs80.distance_metres(lon1, lat1, lon2, lat2).unwrap();
        assert!((distance - 54_972.271).abs() < 1e-3, "distance {}", distance);

        let forward = grs80.azimuth(lon1, lat1, lon2, lat2).unwrap();
        assert!((forward - dms(306.0, 52.0, 5.37)).abs() < 1e-5, "azimuth {}", forward);
        let reverse = grs80.azimuth(lon2, lat2, lon1, lat1).unwrap();
        assert!((reverse - dms(127.0, 10.0, 25.07)).abs() < 1e-5, "azimuth {}", reverse);
    }

    #[test]
    fn test_vincenty_coincident_and_equatorial() {
        let wgs84 = Ellipsoid::wgs84();
        assert_eq!(wgs84.distance_metres(10.0, 45.0, 10.0, 45.0), Some(0.0));
        assert_eq!(wgs84.azimuth(10.0, 45.0, 10.0, 45.0), Some(0.0));

        let degree = wgs84.distance_metres(0.0, 0.0, 1.0, 0.0).unwrap();
        assert!((degree - 111_319.490_793).abs() < 1e-3);
        assert!((wgs84.azimuth(0.0, 0.0, 1.0, 0.0).unwrap() - 90.0).abs() < 1e-9);
        assert!(wgs84.azimuth(0.0, 0.0, 0.0, 1.0).unwrap().abs() < 1e-9);
    }

    #[test]
    fn test_vincenty_on_sphere() {
        let sphere = Ellipsoid::sphere("sphere", 6_371_000.0);
        let quarter = sphere.distance_metres(0.0, 0.0, 90.0, 0.0).unwrap();
        assert!((quarter - 6_371_000.0 * std::f64::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_radii_of_curvature() {
        let wgs84 = Ellipsoid::wgs84();
        let a = wgs84.semi_major_axis();
        let b = wgs84.semi_minor_axis();
        assert!((wgs84.geocentric_radius(0.0) - a).abs() < 1e-6);
        assert!((wgs84.geocentric_radius(std::f64::consts::FRAC_PI_2) - b).abs() < 1e-6);
        assert!((wgs84.meridian_radius(0.0) - a * (1.0 - wgs84.eccentricity_squared())).abs() < 1e-6);

        let phi = 45f64.to_radians();
        assert!((wgs84.radius(phi, 0.0) - wgs84.meridian_radius(phi)).abs() < 1e-6);
        let east = wgs84.radius(phi, std::f64::consts::FRAC_PI_2);
        assert!((east - wgs84.prime_vertical_radius(phi)).abs() < 1e-6);
    }

    #[test]
    fn test_equality_uses_axis_and_flattening() {
        let a = Ellipsoid::grs80();
        let b = Ellipsoid::from_inverse_flattening("GRS80 copy", 6_378_137.0, 298.257222101);
        assert_eq!(a, b);
        assert_ne!(a, Ellipsoid::wgs84());
    }
}
