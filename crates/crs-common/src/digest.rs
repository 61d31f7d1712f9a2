//! MD5 fingerprints of coordinate systems.
//!
//! The digest covers only the numeric structure of a system (ellipsoid,
//! prime meridian, units, method and parameters), never names, so a system
//! read from an ESRI definition digests the same as its EPSG counterpart.
//! Values are rounded to fixed precision and written as big-endian `i64`.

use crate::crs::{CoordinateSystem, GeographicCrs, ProjectedCrs, VerticalCrs};
use crate::parameter::CanonicalValue;

pub type Md5Digest = [u8; 16];

struct DigestWriter {
    context: md5::Context,
}

impl DigestWriter {
    fn new() -> Self {
        Self {
            context: md5::Context::new(),
        }
    }

    fn int(&mut self, value: i64) {
        self.context.consume(value.to_be_bytes());
    }

    fn scaled(&mut self, value: f64, scale: f64) {
        self.int((value * scale).round() as i64);
    }

    fn text(&mut self, value: &str) {
        self.context.consume(value.as_bytes());
    }

    fn finish(self) -> Md5Digest {
        self.context.compute().0
    }
}

impl CoordinateSystem {
    /// Digest for geographic, projected and vertical systems; `None` otherwise.
    pub fn md5_digest(&self) -> Option<Md5Digest> {
        let mut writer = DigestWriter::new();
        match self {
            CoordinateSystem::Geographic(c) => write_geographic(&mut writer, c),
            CoordinateSystem::Projected(c) => write_projected(&mut writer, c),
            CoordinateSystem::Vertical(c) => write_vertical(&mut writer, c),
            _ => return None,
        }
        Some(writer.finish())
    }
}

fn write_geographic(writer: &mut DigestWriter, crs: &GeographicCrs) {
    let (major, inverse_flattening) = crs.ellipsoid().fingerprint();
    writer.int(major);
    writer.int(inverse_flattening);
    writer.scaled(crs.prime_meridian().longitude, 1e6);
    writer.scaled(crs.angular_unit.base_factor(), 1e12);
}

fn write_projected(writer: &mut DigestWriter, crs: &ProjectedCrs) {
    write_geographic(writer, &crs.base);
    writer.text(crs.method.normalized_name());
    writer.scaled(crs.linear_unit.base_factor(), 1e9);
    for (name, value) in crs.parameters.canonical(&crs.linear_unit) {
        writer.text(name.as_str());
        match value {
            CanonicalValue::Number(n) => writer.scaled(n, 1e6),
            CanonicalValue::Text(t) => writer.text(&t),
        }
    }
}

fn write_vertical(writer: &mut DigestWriter, crs: &VerticalCrs) {
    writer.text(&crs.datum.normalized_name());
    writer.scaled(crs.linear_unit.base_factor(), 1e9);
}

#[cfg(test)]
mod tests {
    use crate::crs::{CrsHeader, GeographicCrs};
    use crate::datum::{Datum, PrimeMeridian};
    use crate::ellipsoid::Ellipsoid;
    use crate::unit::UnitOfMeasure;
    use crate::CoordinateSystem;
    use std::sync::Arc;

    fn geographic(datum_name: &str, ellipsoid: Ellipsoid, meridian: PrimeMeridian) -> CoordinateSystem {
        let datum = Datum::geodetic(datum_name, Arc::new(ellipsoid), Arc::new(meridian));
        GeographicCrs::new(
            CrsHeader::anonymous(datum_name),
            Arc::new(datum),
            Arc::new(UnitOfMeasure::degree()),
        )
        .unwrap()
        .into()
    }

    #[test]
    fn test_digest_ignores_names() {
        let epsg = geographic("World Geodetic System 1984", Ellipsoid::wgs84(), PrimeMeridian::greenwich());
        let esri = geographic(
            "D_WGS_1984",
            Ellipsoid::from_inverse_flattening("WGS_1984", 6378137.0, 298.257223563),
            PrimeMeridian::new("Greenwich", 0.0),
        );
        assert_ne!(epsg, esri);
        assert_eq!(epsg.md5_digest(), esri.md5_digest());
    }

    #[test]
    fn test_digest_detects_structure() {
        let wgs = geographic("x", Ellipsoid::wgs84(), PrimeMeridian::greenwich());
        let grs = geographic("x", Ellipsoid::grs80(), PrimeMeridian::greenwich());
        let paris = geographic("x", Ellipsoid::wgs84(), PrimeMeridian::new("Paris", 2.33722917));
        assert_ne!(wgs.md5_digest(), grs.md5_digest());
        assert_ne!(wgs.md5_digest(), paris.md5_digest());
    }
}
