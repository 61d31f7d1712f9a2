//! Ellipsoidal helper functions shared by the conic and cylindrical projections.
//!
//! Naming follows the classic USGS projection library: `msfn`, `tsfn`,
//! `qsfn` and `phi2`.

use std::f64::consts::FRAC_PI_2;

/// Upper bound on solver iterations for every inverse in this crate.
pub const MAX_ITERATIONS: usize = 1000;

/// Latitude change (radians) below which an iteration is considered converged.
pub const CONVERGENCE: f64 = 1e-11;

/// `cos(phi) / sqrt(1 - e² sin²(phi))`.
#[inline]
pub fn msfn(e2: f64, phi: f64) -> f64 {
    let s = phi.sin();
    phi.cos() / (1.0 - e2 * s * s).sqrt()
}

/// Conformal latitude function `t` (Snyder 15-9).
#[inline]
pub fn tsfn(e: f64, phi: f64) -> f64 {
    let es = e * phi.sin();
    (std::f64::consts::FRAC_PI_4 - phi / 2.0).tan() / ((1.0 - es) / (1.0 + es)).powf(e / 2.0)
}

/// Authalic function `q` (Snyder 3-12).
#[inline]
pub fn qsfn(e: f64, phi: f64) -> f64 {
    let s = phi.sin();
    if e < 1e-7 {
        return 2.0 * s;
    }
    let es = e * s;
    (1.0 - e * e) * (s / (1.0 - es * es) - (1.0 / (2.0 * e)) * ((1.0 - es) / (1.0 + es)).ln())
}

/// Latitude from the conformal `t` value (Snyder 7-9), by fixed-point iteration.
///
/// Returns the last estimate when the iteration cap is reached.
pub fn phi2(e: f64, ts: f64) -> f64 {
    let half_e = e / 2.0;
    let mut phi = FRAC_PI_2 - 2.0 * ts.atan();
    for _ in 0..MAX_ITERATIONS {
        let con = e * phi.sin();
        let delta = FRAC_PI_2 - 2.0 * (ts * ((1.0 - con) / (1.0 + con)).powf(half_e)).atan() - phi;
        phi += delta;
        if delta.abs() <= CONVERGENCE {
            break;
        }
    }
    phi
}

/// Meridian distance on the unit ellipsoid (Snyder 3-21), third order in e².
#[inline]
pub fn mlfn(e2: f64, phi: f64) -> f64 {
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    (1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
        - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
        + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
        - (35.0 * e6 / 3072.0) * (6.0 * phi).sin()
}

/// Radius of curvature in the meridian at `phi`, for semi-major axis `a`.
#[inline]
pub fn meridian_radius(a: f64, e2: f64, phi: f64) -> f64 {
    let s = phi.sin();
    a * (1.0 - e2) / (1.0 - e2 * s * s).powf(1.5)
}

/// Invert a meridian arc function by Newton iteration, starting from `arc / a`.
pub fn footpoint_latitude(arc: f64, a: f64, e2: f64, meridian_arc: impl Fn(f64) -> f64) -> f64 {
    let mut phi = arc / a;
    for _ in 0..MAX_ITERATIONS {
        let delta = (arc - meridian_arc(phi)) / meridian_radius(a, e2, phi);
        phi += delta;
        if delta.abs() <= CONVERGENCE {
            break;
        }
    }
    phi
}

/// Wrap a longitude difference into `[-π, π]`.
#[inline]
pub fn adjust_lon(lon: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    if lon.abs() <= PI {
        lon
    } else {
        lon - TAU * ((lon + PI) / TAU).floor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WGS84_E2: f64 = 0.006694379990141317;

    #[test]
    fn test_phi2_inverts_tsfn() {
        let e = WGS84_E2.sqrt();
        for deg in [-80.0_f64, -45.0, 0.0, 12.5, 60.0, 89.0] {
            let phi = deg.to_radians();
            let back = phi2(e, tsfn(e, phi));
            assert!((back - phi).abs() < 1e-12, "phi2 failed at {}: {}", deg, back.to_degrees());
        }
    }

    #[test]
    fn test_qsfn_sphere() {
        assert!((qsfn(0.0, 0.5) - 2.0 * 0.5_f64.sin()).abs() < 1e-15);
    }

    #[test]
    fn test_footpoint_inverts_mlfn() {
        let a = 6_378_137.0;
        let phi = 49.0_f64.to_radians();
        let arc = a * mlfn(WGS84_E2, phi);
        let back = footpoint_latitude(arc, a, WGS84_E2, |p| a * mlfn(WGS84_E2, p));
        assert!((back - phi).abs() < 1e-12);
    }

    #[test]
    fn test_footpoint_stops_at_iteration_cap() {
        use std::cell::Cell;

        // Jumps between 0 and 1 forever: each step overshoots by the full arc.
        let calls = Cell::new(0usize);
        let oscillating = |p: f64| {
            calls.set(calls.get() + 1);
            if p <= 0.0 {
                -1.0
            } else {
                1.0
            }
        };
        let phi = footpoint_latitude(0.0, 1.0, 0.0, oscillating);
        assert_eq!(calls.get(), MAX_ITERATIONS);
        assert!(phi.is_finite());
        assert_eq!(phi, 0.0);
    }

    #[test]
    fn test_adjust_lon() {
        use std::f64::consts::PI;
        assert!((adjust_lon(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-12);
        assert!((adjust_lon(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-12);
        assert_eq!(adjust_lon(0.25), 0.25);
    }
}
