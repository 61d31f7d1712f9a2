//! Units of measure.
//!
//! Every unit stores a multiplicative factor to its base unit. Units may chain
//! (US survey foot -> foot -> metre); conversion walks the chain. Angular
//! units bottom out in radians, linear units in metres.
//!
//! The sexagesimal DMS unit (packed `DDD.MMSSsss`) is not a linear scale of
//! radians and is handled separately.

use crate::authority::Authority;
use crate::error::{CrsError, CrsResult};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Relative tolerance when comparing conversion factors.
const FACTOR_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitKind {
    Scale,
    Linear,
    Angular,
    Time,
}

impl UnitKind {
    /// Decode the catalog's unit type byte.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(UnitKind::Scale),
            1 => Some(UnitKind::Linear),
            2 => Some(UnitKind::Angular),
            3 => Some(UnitKind::Time),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            UnitKind::Scale => 0,
            UnitKind::Linear => 1,
            UnitKind::Angular => 2,
            UnitKind::Time => 3,
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnitKind::Scale => "scale",
            UnitKind::Linear => "linear",
            UnitKind::Angular => "angular",
            UnitKind::Time => "time",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone)]
pub struct UnitOfMeasure {
    pub name: String,
    pub kind: UnitKind,
    base: Option<Arc<UnitOfMeasure>>,
    factor: f64,
    sexagesimal: bool,
    pub authority: Option<Authority>,
    pub deprecated: bool,
}

impl UnitOfMeasure {
    /// A unit expressed directly against the base unit of its kind.
    pub fn new(kind: UnitKind, name: impl Into<String>, factor: f64) -> Self {
        Self {
            name: name.into(),
            kind,
            base: None,
            factor,
            sexagesimal: false,
            authority: None,
            deprecated: false,
        }
    }

    /// A unit defined relative to another unit of the same kind.
    pub fn derived(base: Arc<UnitOfMeasure>, name: impl Into<String>, factor: f64) -> Self {
        Self {
            name: name.into(),
            kind: base.kind,
            base: Some(base),
            factor,
            sexagesimal: false,
            authority: None,
            deprecated: false,
        }
    }

    /// Packed sexagesimal degrees (`DDD.MMSSsss`).
    pub fn sexagesimal_dms(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: UnitKind::Angular,
            base: None,
            factor: PI / 180.0,
            sexagesimal: true,
            authority: None,
            deprecated: false,
        }
    }

    pub fn metre() -> Self {
        Self::new(UnitKind::Linear, "metre", 1.0).with_authority(Authority::epsg(9001))
    }

    pub fn foot() -> Self {
        Self::new(UnitKind::Linear, "foot", 0.3048).with_authority(Authority::epsg(9002))
    }

    pub fn us_survey_foot() -> Self {
        Self::new(UnitKind::Linear, "US survey foot", 12.0 / 39.37)
            .with_authority(Authority::epsg(9003))
    }

    pub fn radian() -> Self {
        Self::new(UnitKind::Angular, "radian", 1.0).with_authority(Authority::epsg(9101))
    }

    pub fn degree() -> Self {
        Self::new(UnitKind::Angular, "degree", PI / 180.0).with_authority(Authority::epsg(9102))
    }

    pub fn unity() -> Self {
        Self::new(UnitKind::Scale, "unity", 1.0).with_authority(Authority::epsg(9201))
    }

    pub fn with_authority(mut self, authority: Authority) -> Self {
        self.authority = Some(authority);
        self
    }

    pub fn with_deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    pub fn base(&self) -> Option<&Arc<UnitOfMeasure>> {
        self.base.as_ref()
    }

    /// Factor relative to the immediate base unit.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn is_sexagesimal(&self) -> bool {
        self.sexagesimal
    }

    /// Factor to the root unit of this kind (metre, radian, unity, second).
    pub fn base_factor(&self) -> f64 {
        match &self.base {
            Some(base) => self.factor * base.base_factor(),
            None => self.factor,
        }
    }

    pub fn to_base(&self, value: f64) -> f64 {
        if self.sexagesimal {
            return dms_to_degrees(value).to_radians();
        }
        let value = value * self.factor;
        match &self.base {
            Some(base) => base.to_base(value),
            None => value,
        }
    }

    pub fn from_base(&self, value: f64) -> f64 {
        if self.sexagesimal {
            return degrees_to_dms(value.to_degrees());
        }
        let value = match &self.base {
            Some(base) => base.from_base(value),
            None => value,
        };
        value / self.factor
    }

    /// Angular value in this unit to decimal degrees.
    pub fn to_degrees(&self, value: f64) -> f64 {
        if self.sexagesimal {
            dms_to_degrees(value)
        } else {
            self.to_base(value).to_degrees()
        }
    }

    /// Angular value in this unit to radians.
    pub fn to_radians(&self, value: f64) -> f64 {
        self.to_base(value)
    }

    pub fn from_degrees(&self, degrees: f64) -> f64 {
        if self.sexagesimal {
            degrees_to_dms(degrees)
        } else {
            self.from_base(degrees.to_radians())
        }
    }

    pub fn from_radians(&self, radians: f64) -> f64 {
        self.from_base(radians)
    }

    /// Convert a value in this unit to `target`, which must be of the same kind.
    pub fn convert(&self, value: f64, target: &UnitOfMeasure) -> CrsResult<f64> {
        if self.kind != target.kind {
            return Err(CrsError::UnitMismatch(format!(
                "cannot convert {} unit '{}' to {} unit '{}'",
                self.kind, self.name, target.kind, target.name
            )));
        }
        Ok(target.from_base(self.to_base(value)))
    }

    /// Structural comparison: kind and effective factor, ignoring the name.
    pub fn is_equivalent(&self, other: &UnitOfMeasure) -> bool {
        if self.kind != other.kind || self.sexagesimal != other.sexagesimal {
            return false;
        }
        let a = self.base_factor();
        let b = other.base_factor();
        (a - b).abs() <= FACTOR_TOLERANCE * a.abs().max(b.abs())
    }
}

impl PartialEq for UnitOfMeasure {
    fn eq(&self, other: &Self) -> bool {
        self.is_equivalent(other)
    }
}

impl Hash for UnitOfMeasure {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.sexagesimal.hash(state);
    }
}

impl fmt::Display for UnitOfMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Decode packed `DDD.MMSSsss` into decimal degrees.
pub fn dms_to_degrees(value: f64) -> f64 {
    let sign = if value < 0.0 { -1.0 } else { 1.0 };
    let value = value.abs();
    let degrees = value.trunc();
    let rest = (value - degrees) * 100.0;
    let minutes = (rest + 1e-8).trunc();
    let seconds = ((rest - minutes) * 100.0).max(0.0);
    sign * (degrees + minutes / 60.0 + seconds / 3600.0)
}

/// Encode decimal degrees as packed `DDD.MMSSsss`.
pub fn degrees_to_dms(degrees: f64) -> f64 {
    let sign = if degrees < 0.0 { -1.0 } else { 1.0 };
    let value = degrees.abs();
    let mut whole = value.trunc();
    let total_minutes = (value - whole) * 60.0;
    let mut minutes = (total_minutes + 1e-9).trunc();
    let seconds = ((total_minutes - minutes) * 60.0).max(0.0);
    if minutes >= 60.0 {
        minutes -= 60.0;
        whole += 1.0;
    }
    sign * (whole + minutes / 100.0 + seconds / 10_000.0)
}
