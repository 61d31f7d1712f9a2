//! Coordinate reference system entities.
//!
//! A [`CoordinateSystem`] is a cheap-to-clone handle over one of six
//! immutable variants. Two systems are *equivalent* when their structural
//! content matches; identifier, name, authority, area and deprecation are
//! metadata and never take part in the comparison. Equivalent systems always
//! produce the same [`CoordinateSystem::structural_hash`].

use crate::area::Area;
use crate::authority::Authority;
use crate::axis::Axis;
use crate::datum::{Datum, PrimeMeridian};
use crate::ellipsoid::Ellipsoid;
use crate::error::{CrsError, CrsResult};
use crate::method::{CoordinateOperation, CoordinateOperationMethod};
use crate::parameter::{ParameterValue, ParameterValues};
use crate::unit::{UnitKind, UnitOfMeasure};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CoordinateSystemKind {
    Geographic,
    Projected,
    Vertical,
    Compound,
    Geocentric,
    Engineering,
}

impl CoordinateSystemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoordinateSystemKind::Geographic => "Geographic",
            CoordinateSystemKind::Projected => "Projected",
            CoordinateSystemKind::Vertical => "Vertical",
            CoordinateSystemKind::Compound => "Compound",
            CoordinateSystemKind::Geocentric => "Geocentric",
            CoordinateSystemKind::Engineering => "Engineering",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        [
            CoordinateSystemKind::Geographic,
            CoordinateSystemKind::Projected,
            CoordinateSystemKind::Vertical,
            CoordinateSystemKind::Compound,
            CoordinateSystemKind::Geocentric,
            CoordinateSystemKind::Engineering,
        ]
        .into_iter()
        .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for CoordinateSystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Metadata shared by every variant. Not part of structural equality.
#[derive(Debug, Clone, Default)]
pub struct CrsHeader {
    /// Zero or negative means unassigned.
    pub id: i32,
    pub name: String,
    pub authority: Option<Authority>,
    pub area: Option<Arc<Area>>,
    pub deprecated: bool,
}

impl CrsHeader {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Default::default()
        }
    }

    /// Header for a catalog entry: EPSG authority derived from the id.
    pub fn epsg(id: i32, name: impl Into<String>) -> Self {
        Self::new(id, name).with_authority(Authority::epsg(id))
    }

    /// Header without an identifier.
    pub fn anonymous(name: impl Into<String>) -> Self {
        Self::new(0, name)
    }

    pub fn with_authority(mut self, authority: Authority) -> Self {
        self.authority = Some(authority);
        self
    }

    pub fn with_area(mut self, area: Option<Arc<Area>>) -> Self {
        self.area = area;
        self
    }

    pub fn with_deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }
}

// ============================================================================
// Variants
// ============================================================================

#[derive(Debug, Clone)]
pub struct GeographicCrs {
    pub header: CrsHeader,
    pub datum: Arc<Datum>,
    pub angular_unit: Arc<UnitOfMeasure>,
    pub axes: Vec<Axis>,
    /// Set when the system is derived from another one.
    pub source: Option<CoordinateSystem>,
    pub operation: Option<Arc<CoordinateOperation>>,
    pub three_dimensional: bool,
    ellipsoid: Arc<Ellipsoid>,
    prime_meridian: Arc<PrimeMeridian>,
}

impl GeographicCrs {
    pub fn new(
        header: CrsHeader,
        datum: Arc<Datum>,
        angular_unit: Arc<UnitOfMeasure>,
    ) -> CrsResult<Self> {
        let (ellipsoid, prime_meridian) = match (datum.ellipsoid(), datum.prime_meridian()) {
            (Some(e), Some(pm)) => (e.clone(), pm.clone()),
            _ => {
                return Err(CrsError::invalid_argument(format!(
                    "geographic system '{}' needs a geodetic datum, got '{}'",
                    header.name, datum.name
                )))
            }
        };
        if angular_unit.kind != UnitKind::Angular {
            return Err(CrsError::invalid_argument(format!(
                "geographic system '{}' needs an angular unit, got '{}'",
                header.name, angular_unit.name
            )));
        }
        Ok(Self {
            header,
            axes: Axis::geographic_pair(angular_unit.clone()),
            datum,
            angular_unit,
            source: None,
            operation: None,
            three_dimensional: false,
            ellipsoid,
            prime_meridian,
        })
    }

    pub fn with_axes(mut self, axes: Vec<Axis>) -> Self {
        self.axes = axes;
        self
    }

    pub fn with_source(
        mut self,
        source: Option<CoordinateSystem>,
        operation: Option<Arc<CoordinateOperation>>,
    ) -> Self {
        self.source = source;
        self.operation = operation;
        self
    }

    pub fn with_three_dimensional(mut self, three_dimensional: bool) -> Self {
        self.three_dimensional = three_dimensional;
        self
    }

    pub fn ellipsoid(&self) -> &Arc<Ellipsoid> {
        &self.ellipsoid
    }

    pub fn prime_meridian(&self) -> &Arc<PrimeMeridian> {
        &self.prime_meridian
    }

    pub fn is_equivalent(&self, other: &GeographicCrs) -> bool {
        self.datum == other.datum
            && self.angular_unit == other.angular_unit
            && same_orientations(&self.axes, &other.axes)
    }

    fn hash_structure<H: Hasher>(&self, state: &mut H) {
        self.datum.hash(state);
        self.angular_unit.hash(state);
        hash_orientations(&self.axes, state);
    }
}

#[derive(Debug, Clone)]
pub struct ProjectedCrs {
    pub header: CrsHeader,
    pub base: Arc<GeographicCrs>,
    pub method: Arc<CoordinateOperationMethod>,
    pub parameters: ParameterValues,
    pub linear_unit: Arc<UnitOfMeasure>,
    pub axes: Vec<Axis>,
}

impl ProjectedCrs {
    pub fn new(
        header: CrsHeader,
        base: Arc<GeographicCrs>,
        method: Arc<CoordinateOperationMethod>,
        parameters: ParameterValues,
        linear_unit: Arc<UnitOfMeasure>,
    ) -> CrsResult<Self> {
        if linear_unit.kind != UnitKind::Linear {
            return Err(CrsError::invalid_argument(format!(
                "projected system '{}' needs a linear unit, got '{}'",
                header.name, linear_unit.name
            )));
        }
        Ok(Self {
            header,
            base,
            method,
            parameters,
            axes: Axis::projected_pair(linear_unit.clone()),
            linear_unit,
        })
    }

    pub fn with_axes(mut self, axes: Vec<Axis>) -> Self {
        self.axes = axes;
        self
    }

    pub fn ellipsoid(&self) -> &Arc<Ellipsoid> {
        self.base.ellipsoid()
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterValue> {
        self.parameters.get(name)
    }

    pub fn is_equivalent(&self, other: &ProjectedCrs) -> bool {
        self.base.is_equivalent(&other.base)
            && *self.method == *other.method
            && *self.linear_unit == *other.linear_unit
            && same_orientations(&self.axes, &other.axes)
            && self
                .parameters
                .is_equivalent(&self.linear_unit, &other.parameters, &other.linear_unit)
    }

    fn hash_structure<H: Hasher>(&self, state: &mut H) {
        self.base.hash_structure(state);
        self.method.hash(state);
        self.linear_unit.hash(state);
        hash_orientations(&self.axes, state);
        let mut names: Vec<_> = self.parameters.iter().map(|(n, _)| n).collect();
        names.sort();
        names.hash(state);
    }
}

#[derive(Debug, Clone)]
pub struct VerticalCrs {
    pub header: CrsHeader,
    pub datum: Arc<Datum>,
    pub linear_unit: Arc<UnitOfMeasure>,
    pub axes: Vec<Axis>,
    pub parameters: ParameterValues,
}

impl VerticalCrs {
    pub fn new(
        header: CrsHeader,
        datum: Arc<Datum>,
        linear_unit: Arc<UnitOfMeasure>,
    ) -> CrsResult<Self> {
        if !datum.is_vertical() {
            return Err(CrsError::invalid_argument(format!(
                "vertical system '{}' needs a vertical datum, got '{}'",
                header.name, datum.name
            )));
        }
        Ok(Self {
            header,
            axes: vec![Axis::new(
                "Gravity-related height",
                "up",
                "H",
                Some(linear_unit.clone()),
            )],
            datum,
            linear_unit,
            parameters: ParameterValues::new(),
        })
    }

    pub fn with_axes(mut self, axes: Vec<Axis>) -> Self {
        self.axes = axes;
        self
    }

    pub fn with_parameters(mut self, parameters: ParameterValues) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn is_equivalent(&self, other: &VerticalCrs) -> bool {
        self.datum == other.datum
            && self.linear_unit == other.linear_unit
            && same_orientations(&self.axes, &other.axes)
    }

    fn hash_structure<H: Hasher>(&self, state: &mut H) {
        self.datum.hash(state);
        self.linear_unit.hash(state);
        hash_orientations(&self.axes, state);
    }
}

#[derive(Debug, Clone)]
pub struct CompoundCrs {
    pub header: CrsHeader,
    /// Geographic or projected.
    pub horizontal: CoordinateSystem,
    pub vertical: Arc<VerticalCrs>,
}

impl CompoundCrs {
    pub fn new(
        header: CrsHeader,
        horizontal: CoordinateSystem,
        vertical: CoordinateSystem,
    ) -> CrsResult<Self> {
        if !horizontal.is_horizontal() {
            return Err(CrsError::invalid_argument(format!(
                "'{}' is a {} system, not a horizontal one",
                horizontal.name(),
                horizontal.kind()
            )));
        }
        let vertical = match vertical {
            CoordinateSystem::Vertical(v) => v,
            other => {
                return Err(CrsError::invalid_argument(format!(
                    "'{}' is a {} system, not a vertical one",
                    other.name(),
                    other.kind()
                )))
            }
        };
        Ok(Self {
            header,
            horizontal,
            vertical,
        })
    }

    /// Header named `horizontal + vertical`, as used for synthesized compounds.
    pub fn default_name(horizontal: &CoordinateSystem, vertical: &CoordinateSystem) -> String {
        format!("{} + {}", horizontal.name(), vertical.name())
    }
}

#[derive(Debug, Clone)]
pub struct GeocentricCrs {
    pub header: CrsHeader,
    pub datum: Arc<Datum>,
    pub linear_unit: Arc<UnitOfMeasure>,
    pub axes: Vec<Axis>,
    ellipsoid: Arc<Ellipsoid>,
}

impl GeocentricCrs {
    pub fn new(
        header: CrsHeader,
        datum: Arc<Datum>,
        linear_unit: Arc<UnitOfMeasure>,
    ) -> CrsResult<Self> {
        let ellipsoid = datum.ellipsoid().cloned().ok_or_else(|| {
            CrsError::invalid_argument(format!(
                "geocentric system '{}' needs a geodetic datum, got '{}'",
                header.name, datum.name
            ))
        })?;
        let axes = ["X", "Y", "Z"]
            .iter()
            .map(|n| {
                Axis::new(
                    format!("Geocentric {}", n),
                    format!("geocentric{}", n),
                    *n,
                    Some(linear_unit.clone()),
                )
            })
            .collect();
        Ok(Self {
            header,
            datum,
            linear_unit,
            axes,
            ellipsoid,
        })
    }

    pub fn with_axes(mut self, axes: Vec<Axis>) -> Self {
        self.axes = axes;
        self
    }

    pub fn ellipsoid(&self) -> &Arc<Ellipsoid> {
        &self.ellipsoid
    }
}

#[derive(Debug, Clone)]
pub struct EngineeringCrs {
    pub header: CrsHeader,
    pub datum: Arc<Datum>,
    pub axes: Vec<Axis>,
}

impl EngineeringCrs {
    pub fn new(header: CrsHeader, datum: Arc<Datum>, axes: Vec<Axis>) -> CrsResult<Self> {
        if !datum.is_engineering() {
            return Err(CrsError::invalid_argument(format!(
                "engineering system '{}' needs an engineering datum, got '{}'",
                header.name, datum.name
            )));
        }
        Ok(Self {
            header,
            datum,
            axes,
        })
    }
}

// ============================================================================
// Handle
// ============================================================================

#[derive(Debug, Clone)]
pub enum CoordinateSystem {
    Geographic(Arc<GeographicCrs>),
    Projected(Arc<ProjectedCrs>),
    Vertical(Arc<VerticalCrs>),
    Compound(Arc<CompoundCrs>),
    Geocentric(Arc<GeocentricCrs>),
    Engineering(Arc<EngineeringCrs>),
}

impl CoordinateSystem {
    pub fn header(&self) -> &CrsHeader {
        match self {
            CoordinateSystem::Geographic(c) => &c.header,
            CoordinateSystem::Projected(c) => &c.header,
            CoordinateSystem::Vertical(c) => &c.header,
            CoordinateSystem::Compound(c) => &c.header,
            CoordinateSystem::Geocentric(c) => &c.header,
            CoordinateSystem::Engineering(c) => &c.header,
        }
    }

    pub fn id(&self) -> i32 {
        self.header().id
    }

    pub fn name(&self) -> &str {
        &self.header().name
    }

    pub fn authority(&self) -> Option<&Authority> {
        self.header().authority.as_ref()
    }

    pub fn area(&self) -> Option<&Arc<Area>> {
        self.header().area.as_ref()
    }

    pub fn is_deprecated(&self) -> bool {
        self.header().deprecated
    }

    pub fn kind(&self) -> CoordinateSystemKind {
        match self {
            CoordinateSystem::Geographic(_) => CoordinateSystemKind::Geographic,
            CoordinateSystem::Projected(_) => CoordinateSystemKind::Projected,
            CoordinateSystem::Vertical(_) => CoordinateSystemKind::Vertical,
            CoordinateSystem::Compound(_) => CoordinateSystemKind::Compound,
            CoordinateSystem::Geocentric(_) => CoordinateSystemKind::Geocentric,
            CoordinateSystem::Engineering(_) => CoordinateSystemKind::Engineering,
        }
    }

    /// Axes of the system; a compound system lists horizontal then vertical axes.
    pub fn axes(&self) -> Vec<Axis> {
        match self {
            CoordinateSystem::Geographic(c) => c.axes.clone(),
            CoordinateSystem::Projected(c) => c.axes.clone(),
            CoordinateSystem::Vertical(c) => c.axes.clone(),
            CoordinateSystem::Compound(c) => {
                let mut axes = c.horizontal.axes();
                axes.extend(c.vertical.axes.iter().cloned());
                axes
            }
            CoordinateSystem::Geocentric(c) => c.axes.clone(),
            CoordinateSystem::Engineering(c) => c.axes.clone(),
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(
            self,
            CoordinateSystem::Geographic(_) | CoordinateSystem::Projected(_)
        )
    }

    pub fn as_geographic(&self) -> Option<&Arc<GeographicCrs>> {
        match self {
            CoordinateSystem::Geographic(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_projected(&self) -> Option<&Arc<ProjectedCrs>> {
        match self {
            CoordinateSystem::Projected(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_vertical(&self) -> Option<&Arc<VerticalCrs>> {
        match self {
            CoordinateSystem::Vertical(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Arc<CompoundCrs>> {
        match self {
            CoordinateSystem::Compound(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_geocentric(&self) -> Option<&Arc<GeocentricCrs>> {
        match self {
            CoordinateSystem::Geocentric(c) => Some(c),
            _ => None,
        }
    }

    /// Geodetic datum of the system, looking through projections and compounds.
    pub fn geodetic_datum(&self) -> Option<&Arc<Datum>> {
        match self {
            CoordinateSystem::Geographic(c) => Some(&c.datum),
            CoordinateSystem::Projected(c) => Some(&c.base.datum),
            CoordinateSystem::Geocentric(c) => Some(&c.datum),
            CoordinateSystem::Compound(c) => c.horizontal.geodetic_datum(),
            _ => None,
        }
    }

    /// True when both handles point at the same published instance.
    pub fn ptr_eq(&self, other: &CoordinateSystem) -> bool {
        match (self, other) {
            (CoordinateSystem::Geographic(a), CoordinateSystem::Geographic(b)) => Arc::ptr_eq(a, b),
            (CoordinateSystem::Projected(a), CoordinateSystem::Projected(b)) => Arc::ptr_eq(a, b),
            (CoordinateSystem::Vertical(a), CoordinateSystem::Vertical(b)) => Arc::ptr_eq(a, b),
            (CoordinateSystem::Compound(a), CoordinateSystem::Compound(b)) => Arc::ptr_eq(a, b),
            (CoordinateSystem::Geocentric(a), CoordinateSystem::Geocentric(b)) => Arc::ptr_eq(a, b),
            (CoordinateSystem::Engineering(a), CoordinateSystem::Engineering(b)) => {
                Arc::ptr_eq(a, b)
            }
            _ => false,
        }
    }

    /// A copy carrying the same structure under a new header.
    pub fn with_header(&self, header: CrsHeader) -> CoordinateSystem {
        match self {
            CoordinateSystem::Geographic(c) => GeographicCrs {
                header,
                ..(**c).clone()
            }
            .into(),
            CoordinateSystem::Projected(c) => ProjectedCrs {
                header,
                ..(**c).clone()
            }
            .into(),
            CoordinateSystem::Vertical(c) => VerticalCrs {
                header,
                ..(**c).clone()
            }
            .into(),
            CoordinateSystem::Compound(c) => CompoundCrs {
                header,
                ..(**c).clone()
            }
            .into(),
            CoordinateSystem::Geocentric(c) => GeocentricCrs {
                header,
                ..(**c).clone()
            }
            .into(),
            CoordinateSystem::Engineering(c) => EngineeringCrs {
                header,
                ..(**c).clone()
            }
            .into(),
        }
    }

    /// Structural equivalence, ignoring id, name, authority, area and deprecation.
    pub fn is_equivalent(&self, other: &CoordinateSystem) -> bool {
        match (self, other) {
            (CoordinateSystem::Geographic(a), CoordinateSystem::Geographic(b)) => {
                a.is_equivalent(b)
            }
            (CoordinateSystem::Projected(a), CoordinateSystem::Projected(b)) => a.is_equivalent(b),
            (CoordinateSystem::Vertical(a), CoordinateSystem::Vertical(b)) => a.is_equivalent(b),
            (CoordinateSystem::Compound(a), CoordinateSystem::Compound(b)) => {
                a.horizontal.is_equivalent(&b.horizontal) && a.vertical.is_equivalent(&b.vertical)
            }
            (CoordinateSystem::Geocentric(a), CoordinateSystem::Geocentric(b)) => {
                a.datum == b.datum
                    && a.linear_unit == b.linear_unit
                    && same_orientations(&a.axes, &b.axes)
            }
            (CoordinateSystem::Engineering(a), CoordinateSystem::Engineering(b)) => {
                a.datum == b.datum && a.axes == b.axes
            }
            _ => false,
        }
    }

    /// Deterministic hash over the same fields `is_equivalent` compares.
    pub fn structural_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash_structure(&mut hasher);
        hasher.finish()
    }

    fn hash_structure<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        match self {
            CoordinateSystem::Geographic(c) => c.hash_structure(state),
            CoordinateSystem::Projected(c) => c.hash_structure(state),
            CoordinateSystem::Vertical(c) => c.hash_structure(state),
            CoordinateSystem::Compound(c) => {
                c.horizontal.hash_structure(state);
                c.vertical.hash_structure(state);
            }
            CoordinateSystem::Geocentric(c) => {
                c.datum.hash(state);
                c.linear_unit.hash(state);
                hash_orientations(&c.axes, state);
            }
            CoordinateSystem::Engineering(c) => {
                c.datum.hash(state);
                hash_orientations(&c.axes, state);
            }
        }
    }

    /// JSON summary for tooling output.
    pub fn to_json(&self) -> serde_json::Value {
        let header = self.header();
        let axes: Vec<_> = self
            .axes()
            .iter()
            .map(|a| {
                json!({
                    "name": a.name,
                    "orientation": a.orientation,
                    "unit": a.unit.as_ref().map(|u| u.name.clone()),
                })
            })
            .collect();
        let mut value = json!({
            "id": header.id,
            "name": header.name,
            "kind": self.kind(),
            "authority": header.authority.as_ref().map(|a| a.to_string()),
            "deprecated": header.deprecated,
            "area": header.area.as_deref(),
            "axes": axes,
        });
        match self {
            CoordinateSystem::Geographic(c) => {
                value["datum"] = json!(c.datum.name);
                value["ellipsoid"] = json!(c.ellipsoid().name);
                value["prime_meridian"] = json!(c.prime_meridian().name);
                value["unit"] = json!(c.angular_unit.name);
            }
            CoordinateSystem::Projected(c) => {
                value["base"] = json!({ "id": c.base.header.id, "name": c.base.header.name });
                value["method"] = json!(c.method.name);
                value["unit"] = json!(c.linear_unit.name);
                let parameters: serde_json::Map<String, serde_json::Value> = c
                    .parameters
                    .iter()
                    .map(|(n, v)| (n.to_string(), json!(v.to_string())))
                    .collect();
                value["parameters"] = serde_json::Value::Object(parameters);
            }
            CoordinateSystem::Vertical(c) => {
                value["datum"] = json!(c.datum.name);
                value["unit"] = json!(c.linear_unit.name);
            }
            CoordinateSystem::Compound(c) => {
                value["horizontal"] = json!(c.horizontal.id());
                value["vertical"] = json!(c.vertical.header.id);
            }
            CoordinateSystem::Geocentric(c) => {
                value["datum"] = json!(c.datum.name);
                value["unit"] = json!(c.linear_unit.name);
            }
            CoordinateSystem::Engineering(c) => {
                value["datum"] = json!(c.datum.name);
            }
        }
        value
    }
}

/// Axis order and direction, compared ignoring case. Axis names and
/// abbreviations are labels and do not count.
fn same_orientations(a: &[Axis], b: &[Axis]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(a, b)| a.orientation.eq_ignore_ascii_case(&b.orientation))
}

fn hash_orientations<H: Hasher>(axes: &[Axis], state: &mut H) {
    axes.len().hash(state);
    for axis in axes {
        axis.orientation.to_ascii_lowercase().hash(state);
    }
}

impl PartialEq for CoordinateSystem {
    fn eq(&self, other: &Self) -> bool {
        self.is_equivalent(other)
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.authority() {
            Some(authority) => write!(f, "{} {}", authority, self.name()),
            None if self.id() > 0 => write!(f, "#{} {}", self.id(), self.name()),
            None => write!(f, "{}", self.name()),
        }
    }
}

macro_rules! impl_from_variant {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for CoordinateSystem {
            fn from(value: $ty) -> Self {
                CoordinateSystem::$variant(Arc::new(value))
            }
        }

        impl From<Arc<$ty>> for CoordinateSystem {
            fn from(value: Arc<$ty>) -> Self {
                CoordinateSystem::$variant(value)
            }
        }
    };
}

impl_from_variant!(GeographicCrs, Geographic);
impl_from_variant!(ProjectedCrs, Projected);
impl_from_variant!(VerticalCrs, Vertical);
impl_from_variant!(CompoundCrs, Compound);
impl_from_variant!(GeocentricCrs, Geocentric);
impl_from_variant!(EngineeringCrs, Engineering);
