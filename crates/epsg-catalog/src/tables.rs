//! EPSG catalog tables.
//!
//! Tables are decoded leaf first, each one only referencing tables that are
//! already complete:
//!
//! ```text
//! unitOfMeasure → coordinateAxisName → coordinateAxis → area → primeMeridian
//!   → ellipsoid → datum → coordOperationParam → coordOperationParamUsage
//!   → coordOperationMethod → coordOperationParamValue → coordOperation
//!   → coordinateSystem → coordinateReferenceSystem
//! ```
//!
//! A table decodes all-or-nothing. When a resource is missing, truncated or
//! references an id that was never loaded, the failure is logged and that
//! table stays empty; every other table is unaffected.

use crate::error::{CatalogError, Result};
use crate::reader::RecordReader;
use crate::source::ResourceSource;
use crate::systems::decode_coordinate_systems;
use crs_common::{
    Area, Authority, Axis, CoordinateOperation, CoordinateOperationMethod, CoordinateSystem, Datum,
    Ellipsoid, ParameterName, ParameterValue, ParameterValues, PrimeMeridian, UnitKind,
    UnitOfMeasure,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Resource names, without the `.bin` extension.
pub mod table_names {
    pub const UNIT_OF_MEASURE: &str = "unitOfMeasure";
    pub const AXIS_NAME: &str = "coordinateAxisName";
    pub const AXIS: &str = "coordinateAxis";
    pub const AREA: &str = "area";
    pub const PRIME_MERIDIAN: &str = "primeMeridian";
    pub const ELLIPSOID: &str = "ellipsoid";
    pub const DATUM: &str = "datum";
    pub const PARAMETER: &str = "coordOperationParam";
    pub const PARAMETER_USAGE: &str = "coordOperationParamUsage";
    pub const METHOD: &str = "coordOperationMethod";
    pub const PARAMETER_VALUE: &str = "coordOperationParamValue";
    pub const OPERATION: &str = "coordOperation";
    pub const COORDINATE_SYSTEM: &str = "coordinateSystem";
    pub const COORDINATE_REFERENCE_SYSTEM: &str = "coordinateReferenceSystem";

    /// Every table in load order.
    pub const ALL: &[&str] = &[
        UNIT_OF_MEASURE,
        AXIS_NAME,
        AXIS,
        AREA,
        PRIME_MERIDIAN,
        ELLIPSOID,
        DATUM,
        PARAMETER,
        PARAMETER_USAGE,
        METHOD,
        PARAMETER_VALUE,
        OPERATION,
        COORDINATE_SYSTEM,
        COORDINATE_REFERENCE_SYSTEM,
    ];
}

/// File name of a table resource.
pub fn table_file(name: &str) -> String {
    format!("{}.bin", name)
}

/// EPSG code of the packed sexagesimal `DDD.MMSSsss` unit.
pub const SEXAGESIMAL_DMS_UNIT: i32 = 9110;

// ============================================================================
// Catalog
// ============================================================================

/// Coordinate system type descriptor (the axis set shared by many CRSs).
#[derive(Debug, Clone)]
pub struct CoordinateSystemType {
    pub id: i32,
    pub type_code: u8,
    pub deprecated: bool,
}

/// Every entity decoded from one set of EPSG tables.
#[derive(Debug, Default)]
pub struct EpsgCatalog {
    units: HashMap<i32, Arc<UnitOfMeasure>>,
    axis_names: HashMap<i32, String>,
    axes: HashMap<i32, Vec<Axis>>,
    areas: HashMap<i32, Arc<Area>>,
    prime_meridians: HashMap<i32, Arc<PrimeMeridian>>,
    ellipsoids: HashMap<i32, Arc<Ellipsoid>>,
    datums: HashMap<i32, Arc<Datum>>,
    parameter_names: HashMap<i32, ParameterName>,
    methods: HashMap<i32, Arc<CoordinateOperationMethod>>,
    operations: HashMap<i32, Arc<CoordinateOperation>>,
    coordinate_system_types: HashMap<i32, CoordinateSystemType>,
    coordinate_systems: BTreeMap<i32, CoordinateSystem>,
    failed_tables: Vec<String>,
}

impl EpsgCatalog {
    /// Decode every table from `source`. Never fails: problem tables are
    /// logged, left empty and listed in [`failed_tables`](Self::failed_tables).
    pub fn load(source: &dyn ResourceSource) -> Self {
        use table_names::*;

        let started = Instant::now();
        let mut loader = TableLoader {
            source,
            failed: Vec::new(),
        };

        let units = loader.table(UNIT_OF_MEASURE, decode_units);
        let axis_names = loader.table(AXIS_NAME, decode_axis_names);
        let axes = loader.table(AXIS, |r| decode_axes(r, &axis_names, &units));
        let areas = loader.table(AREA, decode_areas);
        let prime_meridians = loader.table(PRIME_MERIDIAN, |r| decode_prime_meridians(r, &units));
        let ellipsoids = loader.table(ELLIPSOID, |r| decode_ellipsoids(r, &units));
        let datums = loader.table(DATUM, |r| {
            decode_datums(r, &ellipsoids, &prime_meridians, &areas)
        });
        let parameter_names = loader.table(PARAMETER, decode_parameter_names);
        let usage = loader.table(PARAMETER_USAGE, |r| decode_parameter_usage(r, &parameter_names));
        let methods = loader.table(METHOD, |r| decode_methods(r, &usage));
        let values = loader.table(PARAMETER_VALUE, |r| {
            decode_parameter_values(r, &methods, &parameter_names, &units)
        });
        let operations = loader.table(OPERATION, |r| {
            decode_operations(r, &methods, &areas, values)
        });
        let coordinate_system_types = loader.table(COORDINATE_SYSTEM, decode_coordinate_system_types);
        let coordinate_systems = loader.table(COORDINATE_REFERENCE_SYSTEM, |r| {
            decode_coordinate_systems(r, &areas, &coordinate_system_types, &datums, &operations, &axes)
        });

        let catalog = Self {
            units,
            axis_names,
            axes,
            areas,
            prime_meridians,
            ellipsoids,
            datums,
            parameter_names,
            methods,
            operations,
            coordinate_system_types,
            coordinate_systems,
            failed_tables: loader.failed,
        };

        info!(
            source = %source.describe(),
            coordinate_systems = catalog.coordinate_systems.len(),
            datums = catalog.datums.len(),
            failed_tables = catalog.failed_tables.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Loaded EPSG catalog"
        );
        catalog
    }

    pub fn unit(&self, id: i32) -> Option<&Arc<UnitOfMeasure>> {
        self.units.get(&id)
    }

    /// Case-insensitive unit lookup; the lowest id wins on duplicate names.
    pub fn unit_by_name(&self, name: &str) -> Option<&Arc<UnitOfMeasure>> {
        self.units
            .iter()
            .filter(|(_, unit)| unit.name.eq_ignore_ascii_case(name))
            .min_by_key(|(id, _)| **id)
            .map(|(_, unit)| unit)
    }

    pub fn axis_name(&self, id: i32) -> Option<&str> {
        self.axis_names.get(&id).map(String::as_str)
    }

    /// Axes of a coordinate system type, in file order.
    pub fn axes(&self, coordinate_system_type: i32) -> Option<&[Axis]> {
        self.axes.get(&coordinate_system_type).map(Vec::as_slice)
    }

    pub fn area(&self, id: i32) -> Option<&Arc<Area>> {
        self.areas.get(&id)
    }

    pub fn prime_meridian(&self, id: i32) -> Option<&Arc<PrimeMeridian>> {
        self.prime_meridians.get(&id)
    }

    pub fn ellipsoid(&self, id: i32) -> Option<&Arc<Ellipsoid>> {
        self.ellipsoids.get(&id)
    }

    pub fn datum(&self, id: i32) -> Option<&Arc<Datum>> {
        self.datums.get(&id)
    }

    pub fn parameter_name(&self, id: i32) -> Option<&ParameterName> {
        self.parameter_names.get(&id)
    }

    pub fn method(&self, id: i32) -> Option<&Arc<CoordinateOperationMethod>> {
        self.methods.get(&id)
    }

    pub fn operation(&self, id: i32) -> Option<&Arc<CoordinateOperation>> {
        self.operations.get(&id)
    }

    pub fn coordinate_system_type(&self, id: i32) -> Option<&CoordinateSystemType> {
        self.coordinate_system_types.get(&id)
    }

    pub fn coordinate_system(&self, id: i32) -> Option<&CoordinateSystem> {
        self.coordinate_systems.get(&id)
    }

    /// All coordinate reference systems, ordered by id.
    pub fn coordinate_systems(&self) -> impl Iterator<Item = &CoordinateSystem> {
        self.coordinate_systems.values()
    }

    pub fn len(&self) -> usize {
        self.coordinate_systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinate_systems.is_empty()
    }

    /// Tables that were missing or failed to decode, in load order.
    pub fn failed_tables(&self) -> &[String] {
        &self.failed_tables
    }
}

// ============================================================================
// Loader
// ============================================================================

pub(crate) trait Decoded: Default {
    fn records(&self) -> usize;
}

impl<K, V> Decoded for HashMap<K, V> {
    fn records(&self) -> usize {
        self.len()
    }
}

impl<K, V> Decoded for BTreeMap<K, V> {
    fn records(&self) -> usize {
        self.len()
    }
}

pub(crate) struct TableLoader<'a> {
    pub(crate) source: &'a dyn ResourceSource,
    pub(crate) failed: Vec<String>,
}

impl TableLoader<'_> {
    fn table<T: Decoded>(
        &mut self,
        name: &str,
        decode: impl FnOnce(&mut RecordReader) -> Result<T>,
    ) -> T {
        self.resource(name, &table_file(name), decode)
    }

    /// Decode one resource, logging and returning an empty table on failure.
    pub(crate) fn resource<T: Decoded>(
        &mut self,
        name: &str,
        file: &str,
        decode: impl FnOnce(&mut RecordReader) -> Result<T>,
    ) -> T {
        let data = match self.source.open(file) {
            Ok(data) => data,
            Err(CatalogError::MissingTable(file)) => {
                warn!(table = name, file = %file, source = %self.source.describe(), "Catalog table missing");
                self.failed.push(name.to_string());
                return T::default();
            }
            Err(e) => {
                error!(table = name, error = %e, "Failed to read catalog table");
                self.failed.push(name.to_string());
                return T::default();
            }
        };

        let bytes = data.len();
        let mut reader = RecordReader::new(name, data);
        match decode(&mut reader) {
            Ok(table) => {
                let replaced = reader.replaced_strings();
                if replaced > 0 {
                    warn!(table = name, replaced, "Catalog table has strings with invalid UTF-8");
                }
                debug!(table = name, bytes, records = table.records(), "Decoded catalog table");
                table
            }
            Err(e) => {
                error!(table = name, error = %e, "Failed to decode catalog table, leaving it empty");
                self.failed.push(name.to_string());
                T::default()
            }
        }
    }
}

// ============================================================================
// Units
// ============================================================================

struct UnitRecord {
    kind: u8,
    base_id: i32,
    deprecated: bool,
    factor: f64,
    name: String,
}

/// Factor from the catalog's B and C columns.
pub fn conversion_factor(b: f64, c: f64) -> f64 {
    match (b.is_finite(), c.is_finite()) {
        (true, true) => b / c,
        (true, false) => b,
        _ => c,
    }
}

fn decode_units(r: &mut RecordReader) -> Result<HashMap<i32, Arc<UnitOfMeasure>>> {
    let mut order = Vec::new();
    let mut records = HashMap::new();
    while !r.is_at_end() {
        let id = r.read_i32()?;
        let kind = r.read_u8()?;
        let base_id = r.read_i32()?;
        let deprecated = r.read_bool()?;
        let b = r.read_f64()?;
        let c = r.read_f64()?;
        let name = r.read_text()?;
        order.push(id);
        records.insert(
            id,
            UnitRecord {
                kind,
                base_id,
                deprecated,
                factor: conversion_factor(b, c),
                name,
            },
        );
    }

    // Base units may appear after the units derived from them.
    let mut units = HashMap::with_capacity(records.len());
    let mut visiting = HashSet::new();
    for id in order {
        build_unit(r.table(), id, &records, &mut units, &mut visiting)?;
    }
    Ok(units)
}

fn build_unit(
    table: &str,
    id: i32,
    records: &HashMap<i32, UnitRecord>,
    built: &mut HashMap<i32, Arc<UnitOfMeasure>>,
    visiting: &mut HashSet<i32>,
) -> Result<Arc<UnitOfMeasure>> {
    if let Some(unit) = built.get(&id) {
        return Ok(unit.clone());
    }
    let record = records
        .get(&id)
        .ok_or_else(|| CatalogError::unresolved(table, "base unit", id))?;
    if !visiting.insert(id) {
        return Err(CatalogError::invalid_record(
            table,
            format!("unit {} has a cyclic base unit chain", id),
        ));
    }
    let kind = UnitKind::from_code(record.kind).ok_or_else(|| {
        CatalogError::invalid_record(table, format!("unit {} has unknown type {}", id, record.kind))
    })?;

    let unit = if id == SEXAGESIMAL_DMS_UNIT {
        UnitOfMeasure::sexagesimal_dms(record.name.clone())
    } else if record.base_id == 0 || record.base_id == id {
        let factor = if record.factor.is_finite() {
            record.factor
        } else {
            1.0
        };
        UnitOfMeasure::new(kind, record.name.clone(), factor)
    } else {
        let base = build_unit(table, record.base_id, records, built, visiting)?;
        UnitOfMeasure::derived(base, record.name.clone(), record.factor)
    };
    visiting.remove(&id);

    let unit = Arc::new(
        unit.with_authority(Authority::epsg(id))
            .with_deprecated(record.deprecated),
    );
    built.insert(id, unit.clone());
    Ok(unit)
}

// ============================================================================
// Axes and areas
// ============================================================================

fn decode_axis_names(r: &mut RecordReader) -> Result<HashMap<i32, String>> {
    let mut names = HashMap::new();
    while !r.is_at_end() {
        let code = r.read_i32()?;
        let name = r.read_text()?;
        names.insert(code, name);
    }
    Ok(names)
}

fn decode_axes(
    r: &mut RecordReader,
    axis_names: &HashMap<i32, String>,
    units: &HashMap<i32, Arc<UnitOfMeasure>>,
) -> Result<HashMap<i32, Vec<Axis>>> {
    let mut axes: HashMap<i32, Vec<Axis>> = HashMap::new();
    while !r.is_at_end() {
        let coordinate_system_type = r.read_i32()?;
        let name = r.read_ref("axis name", axis_names)?.unwrap_or_default();
        let orientation = r.read_text()?;
        let abbreviation = r.read_char()?;
        let unit = r.read_ref("unit", units)?;
        axes.entry(coordinate_system_type).or_default().push(Axis::new(
            name,
            orientation,
            abbreviation.to_string(),
            unit,
        ));
    }
    Ok(axes)
}

fn decode_areas(r: &mut RecordReader) -> Result<HashMap<i32, Arc<Area>>> {
    let mut areas = HashMap::new();
    while !r.is_at_end() {
        let code = r.read_i32()?;
        let name = r.read_text()?;
        let min_x = r.read_f64()?;
        let min_y = r.read_f64()?;
        let max_x = r.read_f64()?;
        let max_y = r.read_f64()?;
        let deprecated = r.read_bool()?;
        let area = Area::new(name, min_x, min_y, max_x, max_y)
            .with_authority(Authority::epsg(code))
            .with_deprecated(deprecated);
        areas.insert(code, Arc::new(area));
    }
    Ok(areas)
}

// ============================================================================
// Geodetic primitives
// ============================================================================

fn decode_prime_meridians(
    r: &mut RecordReader,
    units: &HashMap<i32, Arc<UnitOfMeasure>>,
) -> Result<HashMap<i32, Arc<PrimeMeridian>>> {
    let mut meridians = HashMap::new();
    while !r.is_at_end() {
        let id = r.read_i32()?;
        let name = r.read_text()?;
        let unit = r.read_ref("unit", units)?;
        let longitude = r.read_f64()?;
        let degrees = match unit {
            Some(unit) => unit.to_degrees(longitude),
            None => longitude,
        };
        let meridian = PrimeMeridian::new(name, degrees).with_authority(Authority::epsg(id));
        meridians.insert(id, Arc::new(meridian));
    }
    Ok(meridians)
}

fn decode_ellipsoids(
    r: &mut RecordReader,
    units: &HashMap<i32, Arc<UnitOfMeasure>>,
) -> Result<HashMap<i32, Arc<Ellipsoid>>> {
    let mut ellipsoids = HashMap::new();
    while !r.is_at_end() {
        let id = r.read_i32()?;
        let name = r.read_text()?;
        let unit_id = r.read_i32()?;
        let unit = r.resolve("unit", unit_id, units)?;
        let semi_minor = r.read_f64()?;
        let semi_major = r.read_f64()?;
        let inverse_flattening = r.read_f64()?;
        let _shape = r.read_u8()?;
        let deprecated = r.read_bool()?;

        let to_metres = |v: f64| match &unit {
            Some(unit) => unit.to_base(v),
            None => v,
        };
        let ellipsoid = Ellipsoid::new(
            name,
            to_metres(semi_major),
            to_metres(semi_minor),
            inverse_flattening,
        )
        .with_authority(Authority::epsg(id))
        .with_deprecated(deprecated);
        ellipsoids.insert(id, Arc::new(ellipsoid));
    }
    Ok(ellipsoids)
}

fn decode_datums(
    r: &mut RecordReader,
    ellipsoids: &HashMap<i32, Arc<Ellipsoid>>,
    prime_meridians: &HashMap<i32, Arc<PrimeMeridian>>,
    areas: &HashMap<i32, Arc<Area>>,
) -> Result<HashMap<i32, Arc<Datum>>> {
    let mut datums = HashMap::new();
    while !r.is_at_end() {
        let id = r.read_i32()?;
        let name = r.read_text()?;
        let datum_type = r.read_u8()?;
        let ellipsoid = r.read_ref("ellipsoid", ellipsoids)?;
        let prime_meridian = r.read_ref("prime meridian", prime_meridians)?;
        let area = r.read_ref("area", areas)?;
        let deprecated = r.read_bool()?;

        let datum = match datum_type {
            0 => {
                let ellipsoid = ellipsoid.ok_or_else(|| {
                    CatalogError::invalid_record(
                        r.table(),
                        format!("geodetic datum {} has no ellipsoid", id),
                    )
                })?;
                let prime_meridian =
                    prime_meridian.unwrap_or_else(|| Arc::new(PrimeMeridian::greenwich()));
                Datum::geodetic(name, ellipsoid, prime_meridian)
            }
            1 => Datum::vertical(name),
            2 => Datum::engineering(name),
            other => {
                return Err(CatalogError::invalid_record(
                    r.table(),
                    format!("datum {} has unknown type {}", id, other),
                ))
            }
        };
        let datum = datum
            .with_area(area)
            .with_authority(Authority::epsg(id))
            .with_deprecated(deprecated);
        datums.insert(id, Arc::new(datum));
    }
    Ok(datums)
}

// ============================================================================
// Operations
// ============================================================================

fn decode_parameter_names(r: &mut RecordReader) -> Result<HashMap<i32, ParameterName>> {
    let mut names = HashMap::new();
    while !r.is_at_end() {
        let id = r.read_i32()?;
        let name = r.read_text()?;
        let _ = r.read_bool()?;
        names.insert(id, ParameterName::new(&name));
    }
    Ok(names)
}

type ParameterUsage = HashMap<i32, Vec<(ParameterName, bool)>>;

fn decode_parameter_usage(
    r: &mut RecordReader,
    parameter_names: &HashMap<i32, ParameterName>,
) -> Result<ParameterUsage> {
    let mut by_method: HashMap<i32, Vec<(i32, ParameterName, bool)>> = HashMap::new();
    while !r.is_at_end() {
        let method_id = r.read_i32()?;
        let name = r.read_ref("parameter", parameter_names)?;
        let sort_order = r.read_i32()?;
        let sign_reversal = r.read_u8()? == 1;
        if let Some(name) = name {
            by_method
                .entry(method_id)
                .or_default()
                .push((sort_order, name, sign_reversal));
        }
    }

    Ok(by_method
        .into_iter()
        .map(|(method_id, mut parameters)| {
            parameters.sort_by_key(|(order, _, _)| *order);
            let ordered = parameters
                .into_iter()
                .map(|(_, name, reversal)| (name, reversal))
                .collect();
            (method_id, ordered)
        })
        .collect())
}

fn decode_methods(
    r: &mut RecordReader,
    usage: &ParameterUsage,
) -> Result<HashMap<i32, Arc<CoordinateOperationMethod>>> {
    let mut methods = HashMap::new();
    while !r.is_at_end() {
        let id = r.read_i32()?;
        let name = r.read_text()?;
        let reverse = r.read_bool()?;
        let deprecated = r.read_bool()?;
        let method = CoordinateOperationMethod::new(id, name)
            .with_flags(reverse, deprecated)
            .with_parameters(usage.get(&id).cloned().unwrap_or_default());
        methods.insert(id, Arc::new(method));
    }
    Ok(methods)
}

fn decode_parameter_values(
    r: &mut RecordReader,
    methods: &HashMap<i32, Arc<CoordinateOperationMethod>>,
    parameter_names: &HashMap<i32, ParameterName>,
    units: &HashMap<i32, Arc<UnitOfMeasure>>,
) -> Result<HashMap<i32, ParameterValues>> {
    let mut by_operation: HashMap<i32, (Option<Arc<CoordinateOperationMethod>>, Vec<_>)> =
        HashMap::new();
    while !r.is_at_end() {
        let operation_id = r.read_i32()?;
        let method = r.read_ref("method", methods)?;
        let name = r.read_ref("parameter", parameter_names)?;
        let value = r.read_f64()?;
        let file_ref = r.read_string()?;
        let unit = r.read_ref("unit", units)?;

        let value = match (value.is_finite(), file_ref) {
            (true, Some(file)) => {
                return Err(CatalogError::invalid_record(
                    r.table(),
                    format!(
                        "operation {} has both a value and the file reference '{}'",
                        operation_id, file
                    ),
                ))
            }
            (true, None) => ParameterValue::number(value, unit),
            (false, Some(file)) => ParameterValue::Text(file),
            (false, None) => continue,
        };
        let Some(name) = name else { continue };

        let entry = by_operation.entry(operation_id).or_insert((None, Vec::new()));
        if entry.0.is_none() {
            entry.0 = method;
        }
        entry.1.push((name, value));
    }

    Ok(by_operation
        .into_iter()
        .map(|(operation_id, (method, mut values))| {
            // Method order first; anything the method does not declare keeps file order.
            if let Some(method) = &method {
                let position = |name: &ParameterName| {
                    method
                        .parameter_names()
                        .iter()
                        .position(|n| n == name)
                        .unwrap_or(usize::MAX)
                };
                values.sort_by_key(|(name, _)| position(name));
            }
            let mut parameters = ParameterValues::new();
            for (name, value) in values {
                parameters.insert(name, value);
            }
            (operation_id, parameters)
        })
        .collect())
}

fn decode_operations(
    r: &mut RecordReader,
    methods: &HashMap<i32, Arc<CoordinateOperationMethod>>,
    areas: &HashMap<i32, Arc<Area>>,
    mut values: HashMap<i32, ParameterValues>,
) -> Result<HashMap<i32, Arc<CoordinateOperation>>> {
    let mut operations = HashMap::new();
    while !r.is_at_end() {
        let id = r.read_i32()?;
        let method = r.read_ref("method", methods)?;
        let name = r.read_text()?;
        let operation_type = r.read_u8()?;
        let source_crs_id = r.read_i32()?;
        let target_crs_id = r.read_i32()?;
        let version = r.read_string()?;
        let variant = r.read_i32()?;
        let area = r.read_ref("area", areas)?;
        let accuracy = r.read_f64()?;
        let deprecated = r.read_bool()?;

        // Concatenated operations carry no method of their own.
        let Some(method) = method else {
            debug!(table = r.table(), id, "Skipping operation without a method");
            continue;
        };
        let parameters = values.remove(&id).unwrap_or_default();
        let operation = CoordinateOperation {
            operation_type,
            source_crs_id,
            target_crs_id,
            version,
            variant,
            area,
            accuracy,
            deprecated,
            ..CoordinateOperation::conversion(id, name, method, parameters)
        };
        operations.insert(id, Arc::new(operation));
    }
    Ok(operations)
}

fn decode_coordinate_system_types(
    r: &mut RecordReader,
) -> Result<HashMap<i32, CoordinateSystemType>> {
    let mut types = HashMap::new();
    while !r.is_at_end() {
        let id = r.read_i32()?;
        let type_code = r.read_u8()?;
        let deprecated = r.read_bool()?;
        types.insert(
            id,
            CoordinateSystemType {
                id,
                type_code,
                deprecated,
            },
        );
    }
    Ok(types)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_conversion_factor_columns() {
        assert_eq!(conversion_factor(0.3048, 1.0), 0.3048);
        assert_eq!(conversion_factor(12.0, 39.37), 12.0 / 39.37);
        assert_eq!(conversion_factor(2.0, f64::NAN), 2.0);
        assert_eq!(conversion_factor(f64::NAN, 4.0), 4.0);
        assert!(conversion_factor(f64::NAN, f64::NAN).is_nan());
    }

    fn unit_record(out: &mut Vec<u8>, id: i32, kind: u8, base: i32, b: f64, c: f64, name: &str) {
        out.extend_from_slice(&id.to_be_bytes());
        out.push(kind);
        out.extend_from_slice(&base.to_be_bytes());
        out.push(0);
        out.extend_from_slice(&b.to_be_bytes());
        out.extend_from_slice(&c.to_be_bytes());
        out.extend_from_slice(&(name.len() as i32).to_be_bytes());
        out.extend_from_slice(name.as_bytes());
    }

    #[test]
    fn test_units_resolve_forward_base_references() {
        let mut data = Vec::new();
        unit_record(&mut data, 9003, 1, 9001, 12.0, 39.37, "US survey foot");
        unit_record(&mut data, 9001, 1, 9001, 1.0, 1.0, "metre");
        unit_record(&mut data, 9110, 2, 9101, f64::NAN, f64::NAN, "sexagesimal DMS");
        unit_record(&mut data, 9101, 2, 9101, 1.0, 1.0, "radian");

        let mut reader = RecordReader::new("unitOfMeasure", Bytes::from(data));
        let units = decode_units(&mut reader).unwrap();
        assert_eq!(units.len(), 4);
        let foot = &units[&9003];
        assert!((foot.to_base(39.37) - 12.0).abs() < 1e-12);
        assert_eq!(foot.base().map(|b| b.name.as_str()), Some("metre"));
        assert!(units[&9110].is_sexagesimal());
        assert_eq!(units[&9001].authority, Some(Authority::epsg(9001)));
    }

    #[test]
    fn test_units_unknown_base_fails_table() {
        let mut data = Vec::new();
        unit_record(&mut data, 9002, 1, 8888, 0.3048, 1.0, "foot");
        let mut reader = RecordReader::new("unitOfMeasure", Bytes::from(data));
        let err = decode_units(&mut reader).unwrap_err();
        assert!(matches!(err, CatalogError::UnresolvedReference { id: 8888, .. }), "{:?}", err);
    }
}
