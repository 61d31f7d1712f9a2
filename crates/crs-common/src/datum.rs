//! Datums and prime meridians.

use crate::area::Area;
use crate::authority::Authority;
use crate::ellipsoid::Ellipsoid;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Longitude tolerance (degrees) for prime meridian equality.
const MERIDIAN_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone)]
pub struct PrimeMeridian {
    pub name: String,
    /// Offset from Greenwich in degrees.
    pub longitude: f64,
    pub authority: Option<Authority>,
    pub deprecated: bool,
}

impl PrimeMeridian {
    pub fn new(name: impl Into<String>, longitude: f64) -> Self {
        Self {
            name: name.into(),
            longitude,
            authority: None,
            deprecated: false,
        }
    }

    pub fn greenwich() -> Self {
        Self::new("Greenwich", 0.0).with_authority(Authority::epsg(8901))
    }

    pub fn with_authority(mut self, authority: Authority) -> Self {
        self.authority = Some(authority);
        self
    }

    pub fn longitude_radians(&self) -> f64 {
        self.longitude.to_radians()
    }
}

impl PartialEq for PrimeMeridian {
    fn eq(&self, other: &Self) -> bool {
        (self.longitude - other.longitude).abs() < MERIDIAN_TOLERANCE
    }
}

impl Hash for PrimeMeridian {
    fn hash<H: Hasher>(&self, state: &mut H) {
        ((self.longitude * 1e6).round() as i64).hash(state);
    }
}

#[derive(Debug, Clone)]
pub enum DatumKind {
    Geodetic {
        ellipsoid: Arc<Ellipsoid>,
        prime_meridian: Arc<PrimeMeridian>,
    },
    Vertical,
    Engineering,
}

#[derive(Debug, Clone)]
pub struct Datum {
    pub name: String,
    pub kind: DatumKind,
    pub area: Option<Arc<Area>>,
    pub authority: Option<Authority>,
    pub deprecated: bool,
}

impl Datum {
    pub fn geodetic(
        name: impl Into<String>,
        ellipsoid: Arc<Ellipsoid>,
        prime_meridian: Arc<PrimeMeridian>,
    ) -> Self {
        Self::with_kind(
            name,
            DatumKind::Geodetic {
                ellipsoid,
                prime_meridian,
            },
        )
    }

    pub fn vertical(name: impl Into<String>) -> Self {
        Self::with_kind(name, DatumKind::Vertical)
    }

    pub fn engineering(name: impl Into<String>) -> Self {
        Self::with_kind(name, DatumKind::Engineering)
    }

    fn with_kind(name: impl Into<String>, kind: DatumKind) -> Self {
        Self {
            name: name.into(),
            kind,
            area: None,
            authority: None,
            deprecated: false,
        }
    }

    pub fn with_area(mut self, area: Option<Arc<Area>>) -> Self {
        self.area = area;
        self
    }

    pub fn with_authority(mut self, authority: Authority) -> Self {
        self.authority = Some(authority);
        self
    }

    pub fn with_deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    pub fn ellipsoid(&self) -> Option<&Arc<Ellipsoid>> {
        match &self.kind {
            DatumKind::Geodetic { ellipsoid, .. } => Some(ellipsoid),
            _ => None,
        }
    }

    pub fn prime_meridian(&self) -> Option<&Arc<PrimeMeridian>> {
        match &self.kind {
            DatumKind::Geodetic { prime_meridian, .. } => Some(prime_meridian),
            _ => None,
        }
    }

    pub fn is_geodetic(&self) -> bool {
        matches!(self.kind, DatumKind::Geodetic { .. })
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self.kind, DatumKind::Vertical)
    }

    pub fn is_engineering(&self) -> bool {
        matches!(self.kind, DatumKind::Engineering)
    }

    /// Name reduced to lower-case alphanumerics, with the ESRI `D_` prefix removed.
    pub fn normalized_name(&self) -> String {
        normalize_datum_name(&self.name)
    }
}

pub fn normalize_datum_name(name: &str) -> String {
    let trimmed = name
        .strip_prefix("D_")
        .or_else(|| name.strip_prefix("d_"))
        .unwrap_or(name);
    trimmed
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl PartialEq for Datum {
    fn eq(&self, other: &Self) -> bool {
        if self.normalized_name() != other.normalized_name() {
            return false;
        }
        match (&self.kind, &other.kind) {
            (
                DatumKind::Geodetic {
                    ellipsoid: e1,
                    prime_meridian: p1,
                },
                DatumKind::Geodetic {
                    ellipsoid: e2,
                    prime_meridian: p2,
                },
            ) => e1 == e2 && p1 == p2,
            (DatumKind::Vertical, DatumKind::Vertical) => true,
            (DatumKind::Engineering, DatumKind::Engineering) => true,
            _ => false,
        }
    }
}

impl Hash for Datum {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized_name().hash(state);
        match &self.kind {
            DatumKind::Geodetic {
                ellipsoid,
                prime_meridian,
            } => {
                0u8.hash(state);
                ellipsoid.hash(state);
                prime_meridian.hash(state);
            }
            DatumKind::Vertical => 1u8.hash(state),
            DatumKind::Engineering => 2u8.hash(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wgs84(name: &str) -> Datum {
        Datum::geodetic(
            name,
            Arc::new(Ellipsoid::wgs84()),
            Arc::new(PrimeMeridian::greenwich()),
        )
    }

    #[test]
    fn test_normalized_name() {
        assert_eq!(normalize_datum_name("D_North_American_1983"), "northamerican1983");
        assert_eq!(normalize_datum_name("North American 1983"), "northamerican1983");
    }

    #[test]
    fn test_geodetic_equality() {
        assert_eq!(wgs84("World Geodetic System 1984"), wgs84("World_Geodetic_System_1984"));
        assert_ne!(wgs84("World Geodetic System 1984"), wgs84("D_WGS_1984"));

        let paris = Datum::geodetic(
            "World Geodetic System 1984",
            Arc::new(Ellipsoid::wgs84()),
            Arc::new(PrimeMeridian::new("Paris", 2.33722917)),
        );
        assert_ne!(wgs84("World Geodetic System 1984"), paris);
    }

    #[test]
    fn test_kind_mismatch_is_not_equal() {
        assert_ne!(Datum::vertical("Test"), Datum::engineering("Test"));
        assert!(Datum::vertical("NAVD88").ellipsoid().is_none());
    }
}
