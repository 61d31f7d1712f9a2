//! Coordinate system axes.

use crate::unit::UnitOfMeasure;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Axis {
    pub name: String,
    /// Direction such as `north`, `east`, `up`, `west`.
    pub orientation: String,
    pub abbreviation: String,
    pub unit: Option<Arc<UnitOfMeasure>>,
}

impl Axis {
    pub fn new(
        name: impl Into<String>,
        orientation: impl Into<String>,
        abbreviation: impl Into<String>,
        unit: Option<Arc<UnitOfMeasure>>,
    ) -> Self {
        Self {
            name: name.into(),
            orientation: orientation.into(),
            abbreviation: abbreviation.into(),
            unit,
        }
    }

    /// Latitude/longitude axes in the given angular unit, latitude first.
    pub fn geographic_pair(unit: Arc<UnitOfMeasure>) -> Vec<Axis> {
        vec![
            Axis::new("Geodetic latitude", "north", "Lat", Some(unit.clone())),
            Axis::new("Geodetic longitude", "east", "Lon", Some(unit)),
        ]
    }

    /// Easting/northing axes in the given linear unit.
    pub fn projected_pair(unit: Arc<UnitOfMeasure>) -> Vec<Axis> {
        vec![
            Axis::new("Easting", "east", "E", Some(unit.clone())),
            Axis::new("Northing", "north", "N", Some(unit)),
        ]
    }
}

impl PartialEq for Axis {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
            && self.orientation.eq_ignore_ascii_case(&other.orientation)
            && match (&self.unit, &other.unit) {
                (Some(a), Some(b)) => a == b,
                (None, None) => true,
                _ => false,
            }
    }
}
