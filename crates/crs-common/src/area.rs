//! Area of validity.
//!
//! Extents are stored in degrees. Longitudes are wrapped into [-180, 180] so a
//! range that crosses the antimeridian always appears as `min_x > max_x`.

use crate::authority::Authority;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub name: String,
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub authority: Option<Authority>,
    pub deprecated: bool,
}

/// Wrap a longitude into [-180, 180], keeping 180 itself.
fn wrap_longitude(lon: f64) -> f64 {
    if !lon.is_finite() || (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
        if wrapped == -180.0 && lon > 0.0 {
            180.0
        } else {
            wrapped
        }
    }
}

impl Area {
    pub fn new(name: impl Into<String>, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            name: name.into(),
            min_x: wrap_longitude(min_x),
            min_y,
            max_x: wrap_longitude(max_x),
            max_y,
            authority: None,
            deprecated: false,
        }
    }

    /// The whole world.
    pub fn world() -> Self {
        Self::new("World", -180.0, -90.0, 180.0, 90.0)
    }

    pub fn with_authority(mut self, authority: Authority) -> Self {
        self.authority = Some(authority);
        self
    }

    pub fn with_deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    pub fn crosses_antimeridian(&self) -> bool {
        self.min_x > self.max_x
    }

    /// West edge shifted so that `continuous_min_x()..max_x` is increasing.
    pub fn continuous_min_x(&self) -> f64 {
        if self.crosses_antimeridian() {
            self.min_x - 360.0
        } else {
            self.min_x
        }
    }

    /// Longitude span in degrees.
    pub fn width(&self) -> f64 {
        self.max_x - self.continuous_min_x()
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Check whether a lon/lat point (degrees) lies inside the area.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        if lat < self.min_y || lat > self.max_y {
            return false;
        }
        let lon = wrap_longitude(lon);
        if self.crosses_antimeridian() {
            lon >= self.min_x || lon <= self.max_x
        } else {
            lon >= self.min_x && lon <= self.max_x
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_wraps_out_of_range_longitudes() {
        let area = Area::new("Pacific", 160.0, -10.0, 190.0, 10.0);
        assert_eq!(area.min_x, 160.0);
        assert_eq!(area.max_x, -170.0);
        assert!(area.crosses_antimeridian());
        assert!((area.width() - 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_area_contains_across_antimeridian() {
        let fiji = Area::new("Fiji", 176.81, -20.67, -178.42, -12.42);
        assert!(fiji.crosses_antimeridian());
        assert!(fiji.contains(178.0, -17.0));
        assert!(fiji.contains(-179.0, -17.0));
        assert!(!fiji.contains(0.0, -17.0));
        assert!((fiji.continuous_min_x() - (-183.19)).abs() < 1e-9);
    }

    #[test]
    fn test_area_contains_plain() {
        let world = Area::world();
        assert!(!world.crosses_antimeridian());
        assert!(world.contains(-123.0, 49.0));
        assert!(world.contains(180.0, 90.0));
        assert!(!Area::new("BC", -139.04, 48.25, -114.08, 60.01).contains(-100.0, 50.0));
    }
}
