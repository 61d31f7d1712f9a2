//! Coordinate operation methods and operations.

use crate::area::Area;
use crate::parameter::{names, ParameterName, ParameterValues};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Canonical normalized method names for the supported projections.
pub mod method_names {
    pub const ALBERS_EQUAL_AREA: &str = "Albers_Equal_Area";
    pub const TRANSVERSE_MERCATOR: &str = "Transverse_Mercator";
    pub const TRANSVERSE_MERCATOR_SOUTH_ORIENTATED: &str = "Transverse_Mercator_South_Orientated";
    pub const MERCATOR_1SP: &str = "Mercator_1SP";
    pub const MERCATOR_2SP: &str = "Mercator_2SP";
    pub const MERCATOR_1SP_SPHERICAL: &str = "Mercator_1SP_Spherical";
    pub const POPULAR_VISUALISATION_PSEUDO_MERCATOR: &str =
        "Popular_Visualisation_Pseudo_Mercator";
    pub const LAMBERT_CONIC_CONFORMAL_1SP: &str = "Lambert_Conic_Conformal_1SP";
    pub const LAMBERT_CONIC_CONFORMAL_2SP: &str = "Lambert_Conic_Conformal_2SP";
    pub const LAMBERT_CONIC_CONFORMAL_2SP_BELGIUM: &str = "Lambert_Conic_Conformal_2SP_Belgium";
}

use method_names::*;

const ALIASES: &[(&str, &str)] = &[
    ("Albers", ALBERS_EQUAL_AREA),
    ("Albers_Conic_Equal_Area", ALBERS_EQUAL_AREA),
    ("Albers_Equal_Area_Conic", ALBERS_EQUAL_AREA),
    ("Gauss_Kruger", TRANSVERSE_MERCATOR),
    ("Mercator", MERCATOR_1SP),
    ("Mercator_variant_A", MERCATOR_1SP),
    ("Mercator_variant_B", MERCATOR_2SP),
    ("Mercator_Auxiliary_Sphere", POPULAR_VISUALISATION_PSEUDO_MERCATOR),
    ("Lambert_Conformal_Conic", LAMBERT_CONIC_CONFORMAL_2SP),
    ("Lambert_Conformal_Conic_1SP", LAMBERT_CONIC_CONFORMAL_1SP),
    ("Lambert_Conformal_Conic_2SP", LAMBERT_CONIC_CONFORMAL_2SP),
    ("Lambert_Conformal_Conic_2SP_Belgium", LAMBERT_CONIC_CONFORMAL_2SP_BELGIUM),
];

/// Spaces become underscores, anything other than ASCII alphanumerics and
/// underscores is dropped, then well-known aliases are applied.
pub fn normalize_method_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c == ' ' {
            normalized.push('_');
        } else if c.is_ascii_alphanumeric() || c == '_' {
            normalized.push(c);
        }
    }
    ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(&normalized))
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(normalized)
}

#[derive(Debug, Clone)]
pub struct CoordinateOperationMethod {
    pub id: i32,
    pub name: String,
    normalized_name: String,
    /// The method may be applied in the reverse direction.
    pub reverse: bool,
    pub deprecated: bool,
    parameter_names: Vec<ParameterName>,
    sign_reversal: Vec<bool>,
}

impl CoordinateOperationMethod {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id,
            normalized_name: normalize_method_name(&name),
            name,
            reverse: false,
            deprecated: false,
            parameter_names: Vec::new(),
            sign_reversal: Vec::new(),
        }
    }

    /// Method named in an ESRI definition. ESRI uses one name for both
    /// Lambert variants and both Mercator variants; the parameters decide.
    pub fn esri(name: &str, parameters: &ParameterValues) -> Self {
        let mut method = Self::new(0, name);
        let raw = name.trim().replace(' ', "_");
        if raw.eq_ignore_ascii_case("Lambert_Conformal_Conic") {
            method.normalized_name = if parameters.contains(names::STANDARD_PARALLEL_2) {
                LAMBERT_CONIC_CONFORMAL_2SP.to_string()
            } else {
                LAMBERT_CONIC_CONFORMAL_1SP.to_string()
            };
        } else if raw.eq_ignore_ascii_case("Mercator") {
            method.normalized_name = if parameters.contains(names::STANDARD_PARALLEL_1) {
                MERCATOR_2SP.to_string()
            } else {
                MERCATOR_1SP.to_string()
            };
        }
        method
    }

    pub fn with_flags(mut self, reverse: bool, deprecated: bool) -> Self {
        self.reverse = reverse;
        self.deprecated = deprecated;
        self
    }

    /// Expected parameters in order, each with its sign-reversal flag.
    pub fn with_parameters(mut self, parameters: Vec<(ParameterName, bool)>) -> Self {
        let (parameter_names, sign_reversal): (Vec<_>, Vec<_>) = parameters.into_iter().unzip();
        self.parameter_names = parameter_names;
        self.sign_reversal = sign_reversal;
        self
    }

    pub fn normalized_name(&self) -> &str {
        &self.normalized_name
    }

    pub fn parameter_names(&self) -> &[ParameterName] {
        &self.parameter_names
    }

    /// Whether the parameter is applied with its sign flipped in the reverse direction.
    pub fn is_sign_reversed(&self, name: &ParameterName) -> bool {
        self.parameter_names
            .iter()
            .position(|n| n == name)
            .and_then(|i| self.sign_reversal.get(i).copied())
            .unwrap_or(false)
    }
}

impl PartialEq for CoordinateOperationMethod {
    fn eq(&self, other: &Self) -> bool {
        self.normalized_name == other.normalized_name
    }
}

impl Hash for CoordinateOperationMethod {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized_name.hash(state);
    }
}

/// A method bound to concrete parameter values.
#[derive(Debug, Clone)]
pub struct CoordinateOperation {
    pub id: i32,
    pub name: String,
    pub method: Arc<CoordinateOperationMethod>,
    /// Catalog operation type code.
    pub operation_type: u8,
    pub source_crs_id: i32,
    pub target_crs_id: i32,
    pub version: Option<String>,
    pub variant: i32,
    pub area: Option<Arc<Area>>,
    /// Accuracy estimate in metres; NaN when unknown.
    pub accuracy: f64,
    pub parameters: ParameterValues,
    pub deprecated: bool,
}

impl CoordinateOperation {
    pub fn conversion(
        id: i32,
        name: impl Into<String>,
        method: Arc<CoordinateOperationMethod>,
        parameters: ParameterValues,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            method,
            operation_type: 0,
            source_crs_id: 0,
            target_crs_id: 0,
            version: None,
            variant: 0,
            area: None,
            accuracy: f64::NAN,
            parameters,
            deprecated: false,
        }
    }
}
