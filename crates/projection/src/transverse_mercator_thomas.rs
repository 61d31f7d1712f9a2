//! Transverse Mercator, Thomas (Redfearn) series.
//!
//! Higher order in both eccentricity and longitude difference than the USGS
//! form. The meridian arc carries terms to e⁸ and the inverse solves the
//! footpoint latitude by Newton iteration.

use crate::factory::CoordinateProjection;
use crate::math::{adjust_lon, footpoint_latitude};
use crs_common::Ellipsoid;

#[derive(Debug, Clone)]
pub struct TransverseMercatorThomas {
    /// Semi-major axis (metres)
    pub a: f64,
    /// Eccentricity squared
    pub e2: f64,
    /// Longitude of natural origin (radians)
    pub lon0: f64,
    /// Scale factor at natural origin
    pub k0: f64,
    pub false_easting: f64,
    pub false_northing: f64,
    /// Meridian arc coefficients A0, A2, A4, A6, A8
    arc: [f64; 5],
    m0: f64,
}

impl TransverseMercatorThomas {
    pub fn new(
        ellipsoid: &Ellipsoid,
        lat0: f64,
        lon0: f64,
        k0: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let e2 = ellipsoid.eccentricity_squared();
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        let e8 = e6 * e2;
        let arc = [
            1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0 - 175.0 * e8 / 16384.0,
            3.0 / 8.0 * (e2 + e4 / 4.0 + 15.0 * e6 / 128.0 - 455.0 * e8 / 4096.0),
            15.0 / 256.0 * (e4 + 3.0 * e6 / 4.0 - 77.0 * e8 / 128.0),
            35.0 / 3072.0 * (e6 - 41.0 * e8 / 32.0),
            -315.0 * e8 / 131072.0,
        ];
        let mut proj = Self {
            a: ellipsoid.semi_major_axis(),
            e2,
            lon0,
            k0,
            false_easting,
            false_northing,
            arc,
            m0: 0.0,
        };
        proj.m0 = proj.meridian_arc(lat0);
        proj
    }

    fn meridian_arc(&self, phi: f64) -> f64 {
        let [a0, a2, a4, a6, a8] = self.arc;
        self.a
            * (a0 * phi - a2 * (2.0 * phi).sin() + a4 * (4.0 * phi).sin() - a6 * (6.0 * phi).sin()
                + a8 * (8.0 * phi).sin())
    }

    /// Prime vertical and meridian radii at `phi`.
    fn radii(&self, phi: f64) -> (f64, f64) {
        let s = phi.sin();
        let con = 1.0 - self.e2 * s * s;
        let nu = self.a / con.sqrt();
        let rho = self.a * (1.0 - self.e2) / con.powf(1.5);
        (nu, rho)
    }
}

impl CoordinateProjection for TransverseMercatorThomas {
    fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (sin_phi, cos_phi) = lat.sin_cos();
        let t2 = lat.tan().powi(2);
        let (nu, rho) = self.radii(lat);
        let psi = nu / rho;
        let w = adjust_lon(lon - self.lon0);
        let w2 = w * w;

        let e1 = w2 / 6.0 * cos_phi.powi(2) * (psi - t2);
        let e2 = w2.powi(2) / 120.0
            * cos_phi.powi(4)
            * (4.0 * psi.powi(3) * (1.0 - 6.0 * t2) + psi.powi(2) * (1.0 + 8.0 * t2)
                - psi * 2.0 * t2
                + t2.powi(2));
        let e3 = w2.powi(3) / 5040.0 * cos_phi.powi(6) * (61.0 - 479.0 * t2 + 179.0 * t2.powi(2) - t2.powi(3));
        let easting = self.false_easting + self.k0 * nu * w * cos_phi * (1.0 + e1 + e2 + e3);

        let base = nu * sin_phi;
        let n1 = w2 / 2.0 * base * cos_phi;
        let n2 = w2.powi(2) / 24.0 * base * cos_phi.powi(3) * (4.0 * psi.powi(2) + psi - t2);
        let n3 = w2.powi(3) / 720.0
            * base
            * cos_phi.powi(5)
            * (8.0 * psi.powi(4) * (11.0 - 24.0 * t2) - 28.0 * psi.powi(3) * (1.0 - 6.0 * t2)
                + psi.powi(2) * (1.0 - 32.0 * t2)
                - psi * 2.0 * t2
                + t2.powi(2));
        let n4 = w2.powi(4) / 40320.0
            * base
            * cos_phi.powi(7)
            * (1385.0 - 3111.0 * t2 + 543.0 * t2.powi(2) - t2.powi(3));
        let northing =
            self.false_northing + self.k0 * (self.meridian_arc(lat) - self.m0 + n1 + n2 + n3 + n4);

        (easting, northing)
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let arc = (y - self.false_northing) / self.k0 + self.m0;
        let phi = footpoint_latitude(arc, self.a, self.e2, |p| self.meridian_arc(p));

        let cos_phi = phi.cos();
        let t = phi.tan();
        let t2 = t * t;
        let (nu, rho) = self.radii(phi);
        let psi = nu / rho;
        let de = x - self.false_easting;
        let q = de / (self.k0 * nu);
        let k = t / (self.k0 * rho) * de;

        let l1 = k * q / 2.0;
        let l2 = k * q.powi(3) / 24.0 * (-4.0 * psi.powi(2) + 9.0 * psi * (1.0 - t2) + 12.0 * t2);
        let l3 = k * q.powi(5) / 720.0
            * (8.0 * psi.powi(4) * (11.0 - 24.0 * t2) - 12.0 * psi.powi(3) * (21.0 - 71.0 * t2)
                + 15.0 * psi.powi(2) * (15.0 - 98.0 * t2 + 15.0 * t2.powi(2))
                + 180.0 * psi * (5.0 * t2 - 3.0 * t2.powi(2))
                + 360.0 * t2.powi(2));
        let l4 = k * q.powi(7) / 40320.0
            * (1385.0 + 3633.0 * t2 + 4095.0 * t2.powi(2) + 1575.0 * t2.powi(3));
        let lat = phi - l1 + l2 - l3 + l4;

        let sec = 1.0 / cos_phi;
        let g1 = q * sec;
        let g2 = q.powi(3) / 6.0 * sec * (psi + 2.0 * t2);
        let g3 = q.powi(5) / 120.0
            * sec
            * (-4.0 * psi.powi(3) * (1.0 - 6.0 * t2) + psi.powi(2) * (9.0 - 68.0 * t2)
                + 72.0 * psi * t2
                + 24.0 * t2.powi(2));
        let g4 = q.powi(7) / 5040.0 * sec * (61.0 + 662.0 * t2 + 1320.0 * t2.powi(2) + 720.0 * t2.powi(3));
        let lon = adjust_lon(self.lon0 + g1 - g2 + g3 - g4);

        (lon, lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_british_national_grid() {
        let airy = Ellipsoid::from_inverse_flattening("Airy 1830", 6_377_563.396, 299.3249646);
        let proj = TransverseMercatorThomas::new(
            &airy,
            49.0_f64.to_radians(),
            (-2.0_f64).to_radians(),
            0.9996012717,
            400_000.0,
            -100_000.0,
        );
        let (x, y) = proj.project(0.5_f64.to_radians(), 50.5_f64.to_radians());
        assert!((x - 577_274.99).abs() < 0.01, "easting {}", x);
        assert!((y - 69_740.50).abs() < 0.01, "northing {}", y);
    }

    #[test]
    fn test_roundtrip_wide_zone() {
        let proj = TransverseMercatorThomas::new(&Ellipsoid::grs80(), 0.0, (-123.0_f64).to_radians(), 0.9996, 500_000.0, 0.0);
        for (lon, lat) in [(-117.0_f64, 45.0_f64), (-129.0, -40.0), (-120.0, 60.0)] {
            let (x, y) = proj.project(lon.to_radians(), lat.to_radians());
            let (lon2, lat2) = proj.inverse(x, y);
            assert!((lon2.to_degrees() - lon).abs() < 1e-8, "lon {}", lon2.to_degrees());
            assert!((lat2.to_degrees() - lat).abs() < 1e-8, "lat {}", lat2.to_degrees());
        }
    }
}
