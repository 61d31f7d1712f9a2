//! The `coordinateReferenceSystem` table.
//!
//! Records reference other records of the same table (the base of a
//! projected system, the parts of a compound), in any order, so the table is
//! read completely before any system is assembled. Assembly is memoized and
//! a record whose components are missing, or whose definition is rejected by
//! the model, is skipped with a warning rather than failing the table.

use crate::error::{CatalogError, Result};
use crate::reader::RecordReader;
use crate::tables::CoordinateSystemType;
use crs_common::{
    Area, Axis, CompoundCrs, CoordinateOperation, CoordinateSystem, CrsError, CrsHeader, CrsResult,
    Datum, EngineeringCrs, GeocentricCrs, GeographicCrs, ProjectedCrs, UnitOfMeasure, VerticalCrs,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tracing::warn;

const GEOCENTRIC: u8 = 0;
const GEOGRAPHIC_3D: u8 = 1;
const GEOGRAPHIC_2D: u8 = 2;
const PROJECTED: u8 = 3;
const ENGINEERING: u8 = 4;
const VERTICAL: u8 = 5;
const COMPOUND: u8 = 6;

#[derive(Debug, Clone)]
struct CrsRecord {
    id: i32,
    name: String,
    area: Option<Arc<Area>>,
    crs_type: u8,
    coordinate_system_type: Option<CoordinateSystemType>,
    datum: Option<Arc<Datum>>,
    source_id: i32,
    operation: Option<Arc<CoordinateOperation>>,
    horizontal_id: i32,
    vertical_id: i32,
    deprecated: bool,
}

pub(crate) fn decode_coordinate_systems(
    r: &mut RecordReader,
    areas: &HashMap<i32, Arc<Area>>,
    coordinate_system_types: &HashMap<i32, CoordinateSystemType>,
    datums: &HashMap<i32, Arc<Datum>>,
    operations: &HashMap<i32, Arc<CoordinateOperation>>,
    axes: &HashMap<i32, Vec<Axis>>,
) -> Result<BTreeMap<i32, CoordinateSystem>> {
    let mut order = Vec::new();
    let mut records = HashMap::new();
    while !r.is_at_end() {
        let id = r.read_i32()?;
        let name = r.read_text()?;
        let area = r.read_ref("area", areas)?;
        let crs_type = r.read_u8()?;
        let coordinate_system_type = r.read_ref("coordinate system", coordinate_system_types)?;
        let datum = r.read_ref("datum", datums)?;
        let source_id = r.read_i32()?;
        let operation = r.read_ref("operation", operations)?;
        let horizontal_id = r.read_i32()?;
        let vertical_id = r.read_i32()?;
        let deprecated = r.read_bool()?;
        order.push(id);
        records.insert(
            id,
            CrsRecord {
                id,
                name,
                area,
                crs_type,
                coordinate_system_type,
                datum,
                source_id,
                operation,
                horizontal_id,
                vertical_id,
                deprecated,
            },
        );
    }

    for record in records.values() {
        for (field, id) in [
            ("source system", record.source_id),
            ("horizontal system", record.horizontal_id),
            ("vertical system", record.vertical_id),
        ] {
            if id != 0 && !records.contains_key(&id) {
                return Err(CatalogError::unresolved(r.table(), field, id));
            }
        }
    }

    let mut assembler = Assembler {
        table: r.table(),
        records: &records,
        axes,
        built: HashMap::with_capacity(records.len()),
        visiting: HashSet::new(),
    };
    let mut systems = BTreeMap::new();
    for id in order {
        if let Some(system) = assembler.build(id) {
            systems.insert(id, system);
        }
    }
    Ok(systems)
}

struct Assembler<'a> {
    table: &'a str,
    records: &'a HashMap<i32, CrsRecord>,
    axes: &'a HashMap<i32, Vec<Axis>>,
    built: HashMap<i32, Option<CoordinateSystem>>,
    visiting: HashSet<i32>,
}

impl Assembler<'_> {
    fn build(&mut self, id: i32) -> Option<CoordinateSystem> {
        if let Some(done) = self.built.get(&id) {
            return done.clone();
        }
        let records = self.records;
        let record = records.get(&id)?;
        if !self.visiting.insert(id) {
            warn!(table = self.table, id, "Coordinate reference system references itself");
            return None;
        }

        let system = match self.assemble(record) {
            Ok(system) => Some(system),
            Err(e) => {
                warn!(
                    table = self.table,
                    id,
                    name = %record.name,
                    error = %e,
                    "Skipping coordinate reference system"
                );
                None
            }
        };
        self.visiting.remove(&id);
        self.built.insert(id, system.clone());
        system
    }

    fn assemble(&mut self, record: &CrsRecord) -> CrsResult<CoordinateSystem> {
        let header = CrsHeader::epsg(record.id, record.name.clone())
            .with_area(record.area.clone())
            .with_deprecated(record.deprecated);
        let axes: Vec<Axis> = record
            .coordinate_system_type
            .as_ref()
            .and_then(|t| self.axes.get(&t.id))
            .cloned()
            .unwrap_or_default();
        let axis_unit = axes.first().and_then(|a| a.unit.clone());
        let linear_unit = || axis_unit.clone().unwrap_or_else(|| Arc::new(UnitOfMeasure::metre()));

        let system: CoordinateSystem = match record.crs_type {
            GEOCENTRIC => {
                let crs = GeocentricCrs::new(header, require_datum(record)?, linear_unit())?;
                with_axes(crs, axes, GeocentricCrs::with_axes).into()
            }
            GEOGRAPHIC_3D | GEOGRAPHIC_2D => {
                let unit = axis_unit
                    .clone()
                    .unwrap_or_else(|| Arc::new(UnitOfMeasure::degree()));
                let source = match record.source_id {
                    0 => None,
                    id => self.build(id),
                };
                let crs = GeographicCrs::new(header, require_datum(record)?, unit)?
                    .with_source(source, record.operation.clone())
                    .with_three_dimensional(record.crs_type == GEOGRAPHIC_3D);
                with_axes(crs, axes, GeographicCrs::with_axes).into()
            }
            PROJECTED => {
                let base = self
                    .build(record.source_id)
                    .and_then(|s| s.as_geographic().cloned())
                    .ok_or_else(|| missing(record, "a geographic base system"))?;
                let operation = record
                    .operation
                    .as_ref()
                    .ok_or_else(|| missing(record, "a projection operation"))?;
                let crs = ProjectedCrs::new(
                    header,
                    base,
                    operation.method.clone(),
                    operation.parameters.clone(),
                    linear_unit(),
                )?;
                with_axes(crs, axes, ProjectedCrs::with_axes).into()
            }
            ENGINEERING => EngineeringCrs::new(header, require_datum(record)?, axes)?.into(),
            VERTICAL => {
                let crs = VerticalCrs::new(header, require_datum(record)?, linear_unit())?;
                with_axes(crs, axes, VerticalCrs::with_axes).into()
            }
            COMPOUND => {
                let horizontal = self
                    .build(record.horizontal_id)
                    .ok_or_else(|| missing(record, "a horizontal system"))?;
                let vertical = self
                    .build(record.vertical_id)
                    .ok_or_else(|| missing(record, "a vertical system"))?;
                CompoundCrs::new(header, horizontal, vertical)?.into()
            }
            other => {
                return Err(CrsError::invalid_argument(format!(
                    "unknown coordinate reference system type {}",
                    other
                )))
            }
        };
        Ok(system)
    }
}

fn with_axes<T>(crs: T, axes: Vec<Axis>, apply: fn(T, Vec<Axis>) -> T) -> T {
    if axes.is_empty() {
        crs
    } else {
        apply(crs, axes)
    }
}

fn require_datum(record: &CrsRecord) -> CrsResult<Arc<Datum>> {
    record
        .datum
        .clone()
        .ok_or_else(|| missing(record, "a datum"))
}

fn missing(record: &CrsRecord, what: &str) -> CrsError {
    CrsError::invalid_argument(format!("'{}' has no {}", record.name, what))
}
