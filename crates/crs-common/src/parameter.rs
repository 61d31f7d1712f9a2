//! Projection parameters keyed by normalized names.
//!
//! Names are lower-cased and underscore-joined, and historical synonyms
//! (EPSG vs ESRI naming) collapse onto one canonical name so lookups do not
//! depend on which catalog a definition came from.

use crate::unit::{UnitKind, UnitOfMeasure};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub mod names {
    pub const CENTRAL_MERIDIAN: &str = "central_meridian";
    pub const LATITUDE_OF_ORIGIN: &str = "latitude_of_origin";
    pub const STANDARD_PARALLEL_1: &str = "standard_parallel_1";
    pub const STANDARD_PARALLEL_2: &str = "standard_parallel_2";
    pub const SCALE_FACTOR: &str = "scale_factor";
    pub const FALSE_EASTING: &str = "false_easting";
    pub const FALSE_NORTHING: &str = "false_northing";
    pub const AZIMUTH: &str = "azimuth";
}

const SYNONYMS: &[(&str, &str)] = &[
    ("longitude_of_natural_origin", names::CENTRAL_MERIDIAN),
    ("longitude_of_false_origin", names::CENTRAL_MERIDIAN),
    ("longitude_of_center", names::CENTRAL_MERIDIAN),
    ("longitude_of_centre", names::CENTRAL_MERIDIAN),
    ("longitude_of_origin", names::CENTRAL_MERIDIAN),
    ("latitude_of_natural_origin", names::LATITUDE_OF_ORIGIN),
    ("latitude_of_false_origin", names::LATITUDE_OF_ORIGIN),
    ("latitude_of_center", names::LATITUDE_OF_ORIGIN),
    ("latitude_of_centre", names::LATITUDE_OF_ORIGIN),
    ("latitude_of_1st_standard_parallel", names::STANDARD_PARALLEL_1),
    ("latitude_of_2nd_standard_parallel", names::STANDARD_PARALLEL_2),
    ("scale_factor_at_natural_origin", names::SCALE_FACTOR),
    ("easting_at_false_origin", names::FALSE_EASTING),
    ("northing_at_false_origin", names::FALSE_NORTHING),
];

const ANGULAR: &[&str] = &[
    names::CENTRAL_MERIDIAN,
    names::LATITUDE_OF_ORIGIN,
    names::STANDARD_PARALLEL_1,
    names::STANDARD_PARALLEL_2,
    names::AZIMUTH,
];

const LINEAR: &[&str] = &[names::FALSE_EASTING, names::FALSE_NORTHING];

/// Absolute/relative tolerance when comparing numeric parameter values.
fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9_f64.max(1e-12 * a.abs().max(b.abs()))
}

fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.trim().chars() {
        if c.is_whitespace() || c == '_' {
            if !out.ends_with('_') {
                out.push('_');
            }
        } else if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        }
    }
    out.trim_matches('_').to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParameterName(String);

impl ParameterName {
    pub fn new(raw: &str) -> Self {
        let normalized = normalize(raw);
        let canonical = SYNONYMS
            .iter()
            .find(|(alias, _)| *alias == normalized)
            .map(|(_, canonical)| canonical.to_string())
            .unwrap_or(normalized);
        Self(canonical)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_angular(&self) -> bool {
        ANGULAR.contains(&self.0.as_str())
    }

    pub fn is_linear(&self) -> bool {
        LINEAR.contains(&self.0.as_str())
    }
}

impl fmt::Display for ParameterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ParameterName {
    fn from(raw: &str) -> Self {
        ParameterName::new(raw)
    }
}

#[derive(Debug, Clone)]
pub enum ParameterValue {
    /// Catalog value with its unit of measure.
    Number {
        value: f64,
        unit: Option<Arc<UnitOfMeasure>>,
    },
    /// A file reference or other non-numeric value.
    Text(String),
    /// Decimal literal as written in a textual definition; angles are degrees
    /// and lengths are in the coordinate system's linear unit.
    Decimal(String),
}

/// Parameter value reduced to degrees, metres or a plain scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalValue {
    Number(f64),
    Text(String),
}

impl ParameterValue {
    pub fn number(value: f64, unit: Option<Arc<UnitOfMeasure>>) -> Self {
        ParameterValue::Number { value, unit }
    }

    pub fn decimal(value: impl Into<String>) -> Self {
        ParameterValue::Decimal(value.into())
    }

    /// Raw numeric value, without unit conversion.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParameterValue::Number { value, .. } => Some(*value),
            ParameterValue::Decimal(text) => text.trim().parse().ok(),
            ParameterValue::Text(_) => None,
        }
    }

    fn unit_of_kind(&self, kind: UnitKind) -> Option<&Arc<UnitOfMeasure>> {
        match self {
            ParameterValue::Number {
                unit: Some(unit), ..
            } if unit.kind == kind => Some(unit),
            _ => None,
        }
    }

    /// Angle in radians. Values without an angular unit are taken as degrees.
    pub fn to_radians(&self) -> Option<f64> {
        let value = self.as_f64()?;
        Some(match self.unit_of_kind(UnitKind::Angular) {
            Some(unit) => unit.to_radians(value),
            None => value.to_radians(),
        })
    }

    pub fn to_degrees(&self) -> Option<f64> {
        self.to_radians().map(f64::to_degrees)
    }

    /// Length in metres. Values without a linear unit are taken to be in `default_unit`.
    pub fn to_metres(&self, default_unit: &UnitOfMeasure) -> Option<f64> {
        let value = self.as_f64()?;
        Some(match self.unit_of_kind(UnitKind::Linear) {
            Some(unit) => unit.to_base(value),
            None => default_unit.to_base(value),
        })
    }

    pub fn to_scalar(&self) -> Option<f64> {
        let value = self.as_f64()?;
        Some(match self.unit_of_kind(UnitKind::Scale) {
            Some(unit) => unit.to_base(value),
            None => value,
        })
    }

    pub fn canonical(&self, name: &ParameterName, linear_unit: &UnitOfMeasure) -> CanonicalValue {
        let number = if name.is_angular() {
            self.to_degrees()
        } else if name.is_linear() {
            self.to_metres(linear_unit)
        } else {
            self.to_scalar()
        };
        match (number, self) {
            (Some(n), _) => CanonicalValue::Number(n),
            (None, ParameterValue::Text(text)) | (None, ParameterValue::Decimal(text)) => {
                CanonicalValue::Text(text.clone())
            }
            (None, ParameterValue::Number { value, .. }) => CanonicalValue::Number(*value),
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Number {
                value,
                unit: Some(unit),
            } => write!(f, "{} {}", value, unit.name),
            ParameterValue::Number { value, unit: None } => write!(f, "{}", value),
            ParameterValue::Text(text) | ParameterValue::Decimal(text) => write!(f, "{}", text),
        }
    }
}

/// Insertion-ordered parameter map. Comparison is order independent.
#[derive(Debug, Clone, Default)]
pub struct ParameterValues {
    entries: Vec<(ParameterName, ParameterValue)>,
}

impl ParameterValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value, keeping the original position on replace.
    pub fn insert(&mut self, name: ParameterName, value: ParameterValue) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn with(mut self, name: &str, value: ParameterValue) -> Self {
        self.insert(ParameterName::new(name), value);
        self
    }

    /// Look up by any synonymous spelling.
    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.get_name(&ParameterName::new(name))
    }

    pub fn get_name(&self, name: &ParameterName) -> Option<&ParameterValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParameterName, &ParameterValue)> {
        self.entries.iter().map(|(n, v)| (n, v))
    }

    /// Values reduced to canonical units, sorted by name.
    pub fn canonical(&self, linear_unit: &UnitOfMeasure) -> Vec<(&ParameterName, CanonicalValue)> {
        let mut values: Vec<_> = self
            .entries
            .iter()
            .map(|(n, v)| (n, v.canonical(n, linear_unit)))
            .collect();
        values.sort_by(|a, b| a.0.cmp(b.0));
        values
    }

    /// Structural comparison after unit normalization.
    pub fn is_equivalent(
        &self,
        linear_unit: &UnitOfMeasure,
        other: &ParameterValues,
        other_linear_unit: &UnitOfMeasure,
    ) -> bool {
        let ours = self.canonical(linear_unit);
        let theirs = other.canonical(other_linear_unit);
        ours.len() == theirs.len()
            && ours
                .iter()
                .zip(theirs.iter())
                .all(|((n1, v1), (n2, v2))| {
                    n1 == n2
                        && match (v1, v2) {
                            (CanonicalValue::Number(a), CanonicalValue::Number(b)) => {
                                approx_eq(*a, *b)
                            }
                            (CanonicalValue::Text(a), CanonicalValue::Text(b)) => a == b,
                            _ => false,
                        }
                })
    }
}

impl FromIterator<(ParameterName, ParameterValue)> for ParameterValues {
    fn from_iter<I: IntoIterator<Item = (ParameterName, ParameterValue)>>(iter: I) -> Self {
        let mut values = ParameterValues::new();
        for (name, value) in iter {
            values.insert(name, value);
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_normalization() {
        assert_eq!(ParameterName::new("False easting").as_str(), "false_easting");
        assert_eq!(ParameterName::new("False_Easting").as_str(), "false_easting");
        assert_eq!(ParameterName::new("  Scale  factor ").as_str(), "scale_factor");
    }

    #[test]
    fn test_synonyms_collapse() {
        assert_eq!(
            ParameterName::new("Longitude of natural origin"),
            ParameterName::new("Central_Meridian")
        );
        assert_eq!(
            ParameterName::new("Latitude of 1st standard parallel").as_str(),
            names::STANDARD_PARALLEL_1
        );
        assert_eq!(
            ParameterName::new("Easting at false origin").as_str(),
            names::FALSE_EASTING
        );
        assert_eq!(ParameterName::new("Azimuth").as_str(), names::AZIMUTH);
    }

    #[test]
    fn test_lookup_tolerates_synonyms() {
        let degree = Arc::new(UnitOfMeasure::degree());
        let values = ParameterValues::new().with(
            "Longitude of natural origin",
            ParameterValue::number(-123.0, Some(degree)),
        );
        let value = values.get("central_meridian").unwrap();
        assert!((value.to_degrees().unwrap() + 123.0).abs() < 1e-12);
        assert!(values.contains("Longitude_Of_Origin"));
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut values = ParameterValues::new()
            .with("false_easting", ParameterValue::decimal("1"))
            .with("false_northing", ParameterValue::decimal("2"));
        values.insert(ParameterName::new("False Easting"), ParameterValue::decimal("3"));
        let names: Vec<_> = values.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["false_easting", "false_northing"]);
        assert_eq!(values.get("false_easting").unwrap().as_f64(), Some(3.0));
    }

    #[test]
    fn test_equivalence_across_units_and_order() {
        let degree = Arc::new(UnitOfMeasure::degree());
        let metre = Arc::new(UnitOfMeasure::metre());
        let epsg = ParameterValues::new()
            .with(
                "Longitude of natural origin",
                ParameterValue::number(-123.0, Some(degree)),
            )
            .with("False easting", ParameterValue::number(500000.0, Some(metre)));
        let esri = ParameterValues::new()
            .with("False_Easting", ParameterValue::decimal("500000.0"))
            .with("Central_Meridian", ParameterValue::decimal("-123.0"));
        let m = UnitOfMeasure::metre();
        assert!(epsg.is_equivalent(&m, &esri, &m));

        let shifted = ParameterValues::new()
            .with("False_Easting", ParameterValue::decimal("500000.0"))
            .with("Central_Meridian", ParameterValue::decimal("-129.0"));
        assert!(!epsg.is_equivalent(&m, &shifted, &m));
    }

    #[test]
    fn test_decimal_lengths_use_default_unit() {
        let value = ParameterValue::decimal("2000000");
        let metres = value.to_metres(&UnitOfMeasure::us_survey_foot()).unwrap();
        assert!((metres - 609601.2192).abs() < 1e-4);
        assert_eq!(ParameterValue::Text("grid.gsb".into()).as_f64(), None);
    }
}
