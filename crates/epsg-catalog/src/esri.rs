//! ESRI coordinate system definitions and the digest index.
//!
//! The digest index maps the md5 fingerprint of a system's numeric structure
//! to the ids of every catalogued system with that structure. It is how a
//! definition that arrives without an id (or with a foreign one) is matched
//! back to a catalogued system.
//!
//! | File               | Record                                                        |
//! |--------------------|---------------------------------------------------------------|
//! | `<Kind>.digest`    | 16-byte digest, `i16` count, `count` × `i32` id                |
//! | `Geographic.cs`    | id, name, datum, spheroid, a, 1/f, meridian, longitude, unit, factor |
//! | `Projected.cs`     | id, name, geographic id, projection, parameters, unit, factor |
//! | `Vertical.cs`      | id, name, datum, parameters, unit, factor                     |
//!
//! Parameters are a `u8` count followed by name/value string pairs.

use crate::error::{CatalogError, Result};
use crate::reader::RecordReader;
use crate::source::ResourceSource;
use crate::tables::TableLoader;
use crs_common::{
    Authority, CoordinateOperationMethod, CoordinateSystem, CoordinateSystemKind, CrsHeader, Datum,
    Ellipsoid, GeographicCrs, Md5Digest, ParameterName, ParameterValue, ParameterValues,
    PrimeMeridian, ProjectedCrs, UnitKind, UnitOfMeasure, VerticalCrs, FIRST_SYNTHESIZED_ID,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{info, warn};

pub const GEOGRAPHIC_FILE: &str = "Geographic.cs";
pub const PROJECTED_FILE: &str = "Projected.cs";
pub const VERTICAL_FILE: &str = "Vertical.cs";

/// Digest index file for a kind of system, if that kind is indexed.
pub fn digest_file(kind: CoordinateSystemKind) -> Option<String> {
    match kind {
        CoordinateSystemKind::Geographic
        | CoordinateSystemKind::Projected
        | CoordinateSystemKind::Vertical => Some(format!("{}.digest", kind)),
        _ => None,
    }
}

type DigestIndex = HashMap<Md5Digest, Vec<i32>>;

/// ESRI definitions and digest index, decoded eagerly.
#[derive(Debug, Default)]
pub struct EsriCatalog {
    digests: HashMap<CoordinateSystemKind, DigestIndex>,
    systems: BTreeMap<i32, CoordinateSystem>,
    failed_tables: Vec<String>,
}

impl EsriCatalog {
    /// A catalog with no definitions; every digest lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn load(source: &dyn ResourceSource) -> Self {
        let mut loader = TableLoader {
            source,
            failed: Vec::new(),
        };

        let mut digests = HashMap::new();
        for kind in [
            CoordinateSystemKind::Geographic,
            CoordinateSystemKind::Projected,
            CoordinateSystemKind::Vertical,
        ] {
            if let Some(file) = digest_file(kind) {
                let index = loader.resource(&file, &file, decode_digests);
                digests.insert(kind, index);
            }
        }

        let mut units = UnitCache::default();
        let geographic =
            loader.resource(GEOGRAPHIC_FILE, GEOGRAPHIC_FILE, |r| decode_geographic(r, &mut units));
        let projected = loader.resource(PROJECTED_FILE, PROJECTED_FILE, |r| {
            decode_projected(r, &geographic, &mut units)
        });
        let vertical =
            loader.resource(VERTICAL_FILE, VERTICAL_FILE, |r| decode_vertical(r, &mut units));

        let mut systems = BTreeMap::new();
        systems.extend(geographic.into_iter().map(|(id, crs)| (id, crs.into())));
        systems.extend(projected);
        systems.extend(vertical);

        let catalog = Self {
            digests,
            systems,
            failed_tables: loader.failed,
        };
        info!(
            source = %source.describe(),
            systems = catalog.systems.len(),
            digests = catalog.digests.values().map(HashMap::len).sum::<usize>(),
            failed_tables = catalog.failed_tables.len(),
            "Loaded ESRI catalog"
        );
        catalog
    }

    /// Candidate ids recorded for a digest, in file order.
    pub fn ids_for_digest(&self, kind: CoordinateSystemKind, digest: &Md5Digest) -> &[i32] {
        self.digests
            .get(&kind)
            .and_then(|index| index.get(digest))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// An ESRI definition. Ids in the synthesized range are never catalogued.
    pub fn get(&self, id: i32) -> Option<&CoordinateSystem> {
        if id >= FIRST_SYNTHESIZED_ID {
            return None;
        }
        self.systems.get(&id)
    }

    /// Pick the catalogued id for `candidate` through the digest index.
    ///
    /// When several ids share the digest, the first whose system (found
    /// through `lookup`) has the candidate's name ignoring case wins, then the
    /// first structurally equivalent one, then simply the first id.
    pub fn id_for(
        &self,
        candidate: &CoordinateSystem,
        lookup: impl Fn(i32) -> Option<CoordinateSystem>,
    ) -> Option<i32> {
        let digest = candidate.md5_digest()?;
        match self.ids_for_digest(candidate.kind(), &digest) {
            [] => None,
            [id] => Some(*id),
            ids => {
                let mut found = Vec::new();
                for &id in ids {
                    if let Some(system) = lookup(id) {
                        if system.name().eq_ignore_ascii_case(candidate.name()) {
                            return Some(id);
                        }
                        found.push((id, system));
                    }
                }
                found
                    .iter()
                    .find(|(_, system)| system.is_equivalent(candidate))
                    .map(|(id, _)| *id)
                    .or_else(|| ids.first().copied())
            }
        }
    }

    pub fn systems(&self) -> impl Iterator<Item = &CoordinateSystem> {
        self.systems.values()
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty() && self.digests.values().all(HashMap::is_empty)
    }

    pub fn failed_tables(&self) -> &[String] {
        &self.failed_tables
    }
}

// ============================================================================
// Decoding
// ============================================================================

fn decode_digests(r: &mut RecordReader) -> Result<DigestIndex> {
    let mut index: DigestIndex = HashMap::new();
    while !r.is_at_end() {
        let digest = r.read_bytes::<16>()?;
        let count = r.read_i16()?;
        let mut ids = Vec::with_capacity(count.max(0) as usize);
        for _ in 0..count {
            ids.push(r.read_i32()?);
        }
        index.entry(digest).or_default().extend(ids);
    }
    Ok(index)
}

/// ESRI units are identified by name only; the first definition of a name wins.
#[derive(Default)]
struct UnitCache {
    units: HashMap<(UnitKind, String), Arc<UnitOfMeasure>>,
}

impl UnitCache {
    fn get(&mut self, kind: UnitKind, name: String, factor: f64) -> Arc<UnitOfMeasure> {
        self.units
            .entry((kind, name))
            .or_insert_with_key(|(kind, name)| {
                Arc::new(UnitOfMeasure::new(*kind, name.clone(), factor))
            })
            .clone()
    }
}

fn header(id: i32, name: String) -> CrsHeader {
    CrsHeader::new(id, name).with_authority(Authority::esri(id))
}

fn read_parameters(r: &mut RecordReader) -> Result<ParameterValues> {
    let count = r.read_u8()?;
    let mut parameters = ParameterValues::new();
    for _ in 0..count {
        let name = r.read_text()?;
        let value = r.read_text()?;
        parameters.insert(ParameterName::new(&name), ParameterValue::decimal(value));
    }
    Ok(parameters)
}

fn decode_geographic(
    r: &mut RecordReader,
    units: &mut UnitCache,
) -> Result<HashMap<i32, Arc<GeographicCrs>>> {
    let mut systems = HashMap::new();
    while !r.is_at_end() {
        let id = r.read_i32()?;
        let name = r.read_text()?;
        let datum_name = r.read_text()?;
        let spheroid_name = r.read_text()?;
        let semi_major_axis = r.read_f64()?;
        let inverse_flattening = r.read_f64()?;
        let meridian_name = r.read_text()?;
        let longitude = r.read_f64()?;
        let unit_name = r.read_text()?;
        let factor = r.read_f64()?;

        let ellipsoid =
            Ellipsoid::from_inverse_flattening(spheroid_name, semi_major_axis, inverse_flattening);
        let datum = Datum::geodetic(
            datum_name,
            Arc::new(ellipsoid),
            Arc::new(PrimeMeridian::new(meridian_name, longitude)),
        );
        let unit = units.get(UnitKind::Angular, unit_name, factor);
        match GeographicCrs::new(header(id, name), Arc::new(datum), unit) {
            Ok(crs) => {
                systems.insert(id, Arc::new(crs));
            }
            Err(e) => warn!(table = r.table(), id, error = %e, "Skipping ESRI definition"),
        }
    }
    Ok(systems)
}

fn decode_projected(
    r: &mut RecordReader,
    geographic: &HashMap<i32, Arc<GeographicCrs>>,
    units: &mut UnitCache,
) -> Result<BTreeMap<i32, CoordinateSystem>> {
    let mut systems = BTreeMap::new();
    while !r.is_at_end() {
        let id = r.read_i32()?;
        let name = r.read_text()?;
        let geographic_id = r.read_i32()?;
        let projection = r.read_text()?;
        let parameters = read_parameters(r)?;
        let unit_name = r.read_text()?;
        let factor = r.read_f64()?;

        let base = geographic
            .get(&geographic_id)
            .cloned()
            .ok_or_else(|| CatalogError::unresolved(r.table(), "geographic system", geographic_id))?;
        let method = CoordinateOperationMethod::esri(&projection, &parameters);
        let unit = units.get(UnitKind::Linear, unit_name, factor);
        match ProjectedCrs::new(header(id, name), base, Arc::new(method), parameters, unit) {
            Ok(crs) => {
                systems.insert(id, crs.into());
            }
            Err(e) => warn!(table = r.table(), id, error = %e, "Skipping ESRI definition"),
        }
    }
    Ok(systems)
}

fn decode_vertical(
    r: &mut RecordReader,
    units: &mut UnitCache,
) -> Result<BTreeMap<i32, CoordinateSystem>> {
    let mut systems = BTreeMap::new();
    while !r.is_at_end() {
        let id = r.read_i32()?;
        let name = r.read_text()?;
        let datum_name = r.read_text()?;
        let parameters = read_parameters(r)?;
        let unit_name = r.read_text()?;
        let factor = r.read_f64()?;

        let datum = Arc::new(Datum::vertical(datum_name));
        let unit = units.get(UnitKind::Linear, unit_name, factor);
        match VerticalCrs::new(header(id, name), datum, unit) {
            Ok(crs) => {
                systems.insert(id, crs.with_parameters(parameters).into());
            }
            Err(e) => warn!(table = r.table(), id, error = %e, "Skipping ESRI definition"),
        }
    }
    Ok(systems)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    fn string(out: &mut Vec<u8>, s: &str) {
        out.extend_from_slice(&(s.len() as i32).to_be_bytes());
        out.extend_from_slice(s.as_bytes());
    }

    fn geographic_record(out: &mut Vec<u8>, id: i32, name: &str) {
        out.extend_from_slice(&id.to_be_bytes());
        string(out, name);
        string(out, "D_WGS_1984");
        string(out, "WGS_1984");
        out.extend_from_slice(&6378137.0f64.to_be_bytes());
        out.extend_from_slice(&298.257223563f64.to_be_bytes());
        string(out, "Greenwich");
        out.extend_from_slice(&0.0f64.to_be_bytes());
        string(out, "Degree");
        out.extend_from_slice(&(std::f64::consts::PI / 180.0).to_be_bytes());
    }

    fn digest_record(out: &mut Vec<u8>, digest: &Md5Digest, ids: &[i32]) {
        out.extend_from_slice(digest);
        out.extend_from_slice(&(ids.len() as i16).to_be_bytes());
        for id in ids {
            out.extend_from_slice(&id.to_be_bytes());
        }
    }

    fn catalog_with(ids: &[i32], names: &[(i32, &str)]) -> (EsriCatalog, CoordinateSystem) {
        let mut cs = Vec::new();
        for (id, name) in names {
            geographic_record(&mut cs, *id, name);
        }
        let sample = {
            let source = MemorySource::new().with(GEOGRAPHIC_FILE, cs.clone());
            EsriCatalog::load(&source).systems().next().cloned().unwrap()
        };
        let mut digest = Vec::new();
        digest_record(&mut digest, &sample.md5_digest().unwrap(), ids);
        let source = MemorySource::new()
            .with(GEOGRAPHIC_FILE, cs)
            .with("Geographic.digest", digest);
        (EsriCatalog::load(&source), sample)
    }

    #[test]
    fn test_loads_geographic_definition() {
        let (catalog, _) = catalog_with(&[4326], &[(4326, "GCS_WGS_1984")]);
        let crs = catalog.get(4326).unwrap();
        assert_eq!(crs.name(), "GCS_WGS_1984");
        assert_eq!(crs.authority(), Some(&Authority::esri(4326)));
        assert!(crs.as_geographic().unwrap().angular_unit.is_equivalent(&UnitOfMeasure::degree()));
        // Projected.cs and Vertical.cs are absent.
        assert!(catalog.failed_tables().contains(&PROJECTED_FILE.to_string()));
    }

    #[test]
    fn test_single_digest_id() {
        let (catalog, sample) = catalog_with(&[4326], &[(4326, "GCS_WGS_1984")]);
        let anonymous = sample.with_header(CrsHeader::anonymous("whatever"));
        assert_eq!(catalog.id_for(&anonymous, |id| catalog.get(id).cloned()), Some(4326));
    }

    #[test]
    fn test_digest_tie_break_prefers_name_then_first() {
        let (catalog, sample) =
            catalog_with(&[104000, 4326], &[(104000, "GCS_Other"), (4326, "GCS_WGS_1984")]);
        let named = sample.with_header(CrsHeader::anonymous("gcs_wgs_1984"));
        assert_eq!(catalog.id_for(&named, |id| catalog.get(id).cloned()), Some(4326));

        // Both candidates are equivalent, so the first in file order wins.
        let unnamed = sample.with_header(CrsHeader::anonymous("unnamed"));
        assert_eq!(catalog.id_for(&unnamed, |id| catalog.get(id).cloned()), Some(104000));

        // Nothing resolves: fall back to the first id.
        assert_eq!(catalog.id_for(&unnamed, |_| None), Some(104000));
    }

    #[test]
    fn test_synthesized_range_never_looked_up() {
        let (catalog, _) = catalog_with(&[2_000_001], &[(2_000_001, "GCS_Local")]);
        assert!(catalog.get(2_000_001).is_none());
    }

    #[test]
    fn test_truncated_digest_file() {
        let mut digest = Vec::new();
        digest_record(&mut digest, &[1u8; 16], &[4326, 4269]);
        digest.truncate(digest.len() - 2);
        let source = MemorySource::new().with("Geographic.digest", digest);
        let catalog = EsriCatalog::load(&source);
        assert!(catalog.ids_for_digest(CoordinateSystemKind::Geographic, &[1u8; 16]).is_empty());
        assert!(catalog.failed_tables().contains(&"Geographic.digest".to_string()));
    }
}
