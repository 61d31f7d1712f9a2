//! Shared test utilities for the geodesy-crs workspace.
//!
//! This crate provides common testing infrastructure including:
//! - A big-endian record writer for binary catalog tables
//! - Builders for EPSG and ESRI catalogs, written to temporary directories
//! - A standard catalog fixture used across crates
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then build a catalog in your tests:
//!
//! ```ignore
//! use test_utils::standard_catalog;
//!
//! let dir = standard_catalog().into_temp_dir()?;
//! ```

pub mod catalog;
pub mod fixtures;
pub mod paths;
pub mod writer;

// Re-export commonly used items at the crate root
pub use catalog::{CatalogBuilder, CrsRow, EsriBuilder};
pub use fixtures::{ids, standard_catalog, standard_esri};
pub use paths::*;
pub use writer::TableWriter;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if !(diff <= epsilon) {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Approximate equality of `(x, y)` pairs, such as projected coordinates.
#[macro_export]
macro_rules! assert_coords_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let (x1, y1): (f64, f64) = $left;
        let (x2, y2): (f64, f64) = $right;
        $crate::assert_approx_eq!(x1, x2, $epsilon);
        $crate::assert_approx_eq!(y1, y2, $epsilon);
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_assert_approx_eq_passes() {
        assert_approx_eq!(1.0001, 1.0, 0.001);
        assert_approx_eq!(0.0, 0.0, 0.0001);
        assert_approx_eq!(-5.5, -5.500001, 0.0001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq!(1.1, 1.0, 0.001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_rejects_nan() {
        assert_approx_eq!(f64::NAN, 1.0, 0.001);
    }

    #[test]
    fn test_assert_coords_approx_eq_passes() {
        assert_coords_approx_eq!((500_000.0001, 5_427_455.78), (500_000.0, 5_427_455.7801), 0.001);
    }
}
