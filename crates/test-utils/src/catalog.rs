//! Builders for EPSG and ESRI style binary catalogs.
//!
//! Each builder method appends one record in the field order the catalog
//! decoder expects. Tables are written as `<table>.bin` (EPSG) or under
//! their own file names (ESRI).

use crate::paths::{temp_dir_with_prefix, write_files};
use crate::writer::TableWriter;
use std::collections::BTreeMap;
use std::io;
use std::path::Path;

/// EPSG coordinate reference system type codes.
pub mod crs_types {
    pub const GEOCENTRIC: u8 = 0;
    pub const GEOGRAPHIC_3D: u8 = 1;
    pub const GEOGRAPHIC_2D: u8 = 2;
    pub const PROJECTED: u8 = 3;
    pub const ENGINEERING: u8 = 4;
    pub const VERTICAL: u8 = 5;
    pub const COMPOUND: u8 = 6;
}

/// EPSG datum type codes.
pub mod datum_types {
    pub const GEODETIC: u8 = 0;
    pub const VERTICAL: u8 = 1;
    pub const ENGINEERING: u8 = 2;
}

/// EPSG unit type codes.
pub mod unit_types {
    pub const SCALE: u8 = 0;
    pub const LINEAR: u8 = 1;
    pub const ANGULAR: u8 = 2;
    pub const TIME: u8 = 3;
}

/// One `coordinateReferenceSystem` record. Zero ids mean "no reference".
#[derive(Debug, Clone, Default)]
pub struct CrsRow {
    pub id: i32,
    pub name: String,
    pub area: i32,
    pub crs_type: u8,
    pub coordinate_system: i32,
    pub datum: i32,
    pub source: i32,
    pub operation: i32,
    pub horizontal: i32,
    pub vertical: i32,
    pub deprecated: bool,
}

/// Builds the fourteen EPSG tables.
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
    tables: BTreeMap<String, TableWriter>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The writer for a table, created empty on first use.
    pub fn table(&mut self, name: &str) -> &mut TableWriter {
        self.tables.entry(name.to_string()).or_default()
    }

    /// Make sure a table file exists even when it has no records.
    pub fn touch(&mut self, name: &str) -> &mut Self {
        self.table(name);
        self
    }

    /// Remove a table so its resource is missing.
    pub fn remove(&mut self, name: &str) -> &mut Self {
        self.tables.remove(name);
        self
    }

    /// Cut the last `count` bytes off a table, leaving a partial record.
    pub fn truncate(&mut self, name: &str, count: usize) -> &mut Self {
        self.table(name).truncate_by(count);
        self
    }

    pub fn unit(&mut self, id: i32, kind: u8, base: i32, b: f64, c: f64, name: &str) -> &mut Self {
        self.table("unitOfMeasure")
            .i32(id)
            .u8(kind)
            .i32(base)
            .bool(false)
            .f64(b)
            .f64(c)
            .string(name);
        self
    }

    pub fn axis_name(&mut self, code: i32, name: &str) -> &mut Self {
        self.table("coordinateAxisName").i32(code).string(name);
        self
    }

    pub fn axis(
        &mut self,
        coordinate_system: i32,
        name: i32,
        orientation: &str,
        abbreviation: char,
        unit: i32,
    ) -> &mut Self {
        self.table("coordinateAxis")
            .i32(coordinate_system)
            .i32(name)
            .string(orientation)
            .char(abbreviation)
            .i32(unit);
        self
    }

    pub fn area(
        &mut self,
        code: i32,
        name: &str,
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
    ) -> &mut Self {
        self.table("area")
            .i32(code)
            .string(name)
            .f64(min_x)
            .f64(min_y)
            .f64(max_x)
            .f64(max_y)
            .bool(false);
        self
    }

    pub fn prime_meridian(&mut self, id: i32, name: &str, unit: i32, longitude: f64) -> &mut Self {
        self.table("primeMeridian")
            .i32(id)
            .string(name)
            .i32(unit)
            .f64(longitude);
        self
    }

    /// Pass `f64::NAN` for whichever of the semi-minor axis or inverse
    /// flattening the ellipsoid is not defined by.
    pub fn ellipsoid(
        &mut self,
        id: i32,
        name: &str,
        unit: i32,
        semi_minor_axis: f64,
        semi_major_axis: f64,
        inverse_flattening: f64,
    ) -> &mut Self {
        self.table("ellipsoid")
            .i32(id)
            .string(name)
            .i32(unit)
            .f64(semi_minor_axis)
            .f64(semi_major_axis)
            .f64(inverse_flattening)
            .u8(1)
            .bool(false);
        self
    }

    pub fn datum(
        &mut self,
        id: i32,
        name: &str,
        datum_type: u8,
        ellipsoid: i32,
        prime_meridian: i32,
        area: i32,
    ) -> &mut Self {
        self.table("datum")
            .i32(id)
            .string(name)
            .u8(datum_type)
            .i32(ellipsoid)
            .i32(prime_meridian)
            .i32(area)
            .bool(false);
        self
    }

    pub fn parameter(&mut self, id: i32, name: &str) -> &mut Self {
        self.table("coordOperationParam")
            .i32(id)
            .string(name)
            .bool(false);
        self
    }

    pub fn parameter_usage(
        &mut self,
        method: i32,
        parameter: i32,
        sort_order: i32,
        sign_reversal: bool,
    ) -> &mut Self {
        self.table("coordOperationParamUsage")
            .i32(method)
            .i32(parameter)
            .i32(sort_order)
            .u8(u8::from(sign_reversal));
        self
    }

    pub fn method(&mut self, id: i32, name: &str) -> &mut Self {
        self.table("coordOperationMethod")
            .i32(id)
            .string(name)
            .bool(false)
            .bool(false);
        self
    }

    /// Declare a method's parameters in order.
    pub fn method_with(&mut self, id: i32, name: &str, parameters: &[i32]) -> &mut Self {
        for (i, parameter) in parameters.iter().enumerate() {
            self.parameter_usage(id, *parameter, i as i32 + 1, false);
        }
        self.method(id, name)
    }

    pub fn parameter_value(
        &mut self,
        operation: i32,
        method: i32,
        parameter: i32,
        value: f64,
        file_ref: Option<&str>,
        unit: i32,
    ) -> &mut Self {
        self.table("coordOperationParamValue")
            .i32(operation)
            .i32(method)
            .i32(parameter)
            .f64(value)
            .opt_string(file_ref)
            .i32(unit);
        self
    }

    /// A conversion: `(parameter id, value, unit id)` triples plus the operation record.
    pub fn conversion(
        &mut self,
        id: i32,
        name: &str,
        method: i32,
        values: &[(i32, f64, i32)],
    ) -> &mut Self {
        for (parameter, value, unit) in values {
            self.parameter_value(id, method, *parameter, *value, None, *unit);
        }
        self.operation(id, method, name, 0, 0, 0)
    }

    pub fn operation(
        &mut self,
        id: i32,
        method: i32,
        name: &str,
        operation_type: u8,
        source_crs: i32,
        target_crs: i32,
    ) -> &mut Self {
        self.table("coordOperation")
            .i32(id)
            .i32(method)
            .string(name)
            .u8(operation_type)
            .i32(source_crs)
            .i32(target_crs)
            .opt_string(None)
            .i32(0)
            .i32(0)
            .f64(f64::NAN)
            .bool(false);
        self
    }

    pub fn coordinate_system(&mut self, id: i32, type_code: u8) -> &mut Self {
        self.table("coordinateSystem")
            .i32(id)
            .u8(type_code)
            .bool(false);
        self
    }

    pub fn crs(&mut self, row: CrsRow) -> &mut Self {
        self.table("coordinateReferenceSystem")
            .i32(row.id)
            .string(&row.name)
            .i32(row.area)
            .u8(row.crs_type)
            .i32(row.coordinate_system)
            .i32(row.datum)
            .i32(row.source)
            .i32(row.operation)
            .i32(row.horizontal)
            .i32(row.vertical)
            .bool(row.deprecated);
        self
    }

    pub fn geographic(&mut self, id: i32, name: &str, coordinate_system: i32, datum: i32) -> &mut Self {
        self.crs(CrsRow {
            id,
            name: name.to_string(),
            crs_type: crs_types::GEOGRAPHIC_2D,
            coordinate_system,
            datum,
            ..Default::default()
        })
    }

    pub fn projected(
        &mut self,
        id: i32,
        name: &str,
        coordinate_system: i32,
        base: i32,
        operation: i32,
    ) -> &mut Self {
        self.crs(CrsRow {
            id,
            name: name.to_string(),
            crs_type: crs_types::PROJECTED,
            coordinate_system,
            source: base,
            operation,
            ..Default::default()
        })
    }

    pub fn vertical(&mut self, id: i32, name: &str, coordinate_system: i32, datum: i32) -> &mut Self {
        self.crs(CrsRow {
            id,
            name: name.to_string(),
            crs_type: crs_types::VERTICAL,
            coordinate_system,
            datum,
            ..Default::default()
        })
    }

    pub fn geocentric(&mut self, id: i32, name: &str, coordinate_system: i32, datum: i32) -> &mut Self {
        self.crs(CrsRow {
            id,
            name: name.to_string(),
            crs_type: crs_types::GEOCENTRIC,
            coordinate_system,
            datum,
            ..Default::default()
        })
    }

    pub fn compound(&mut self, id: i32, name: &str, horizontal: i32, vertical: i32) -> &mut Self {
        self.crs(CrsRow {
            id,
            name: name.to_string(),
            crs_type: crs_types::COMPOUND,
            horizontal,
            vertical,
            ..Default::default()
        })
    }

    /// `(file name, contents)` for every table.
    pub fn files(&self) -> Vec<(String, Vec<u8>)> {
        self.tables
            .iter()
            .map(|(name, table)| (format!("{}.bin", name), table.as_slice().to_vec()))
            .collect()
    }

    pub fn write_to(&self, dir: &Path) -> io::Result<()> {
        write_files(
            dir,
            self.tables
                .iter()
                .map(|(name, table)| (format!("{}.bin", name), table.as_slice())),
        )
    }

    /// Write the catalog into a fresh temporary directory.
    pub fn into_temp_dir(self) -> io::Result<tempfile::TempDir> {
        let dir = temp_dir_with_prefix("epsg_catalog_")?;
        self.write_to(dir.path())?;
        Ok(dir)
    }
}

/// Builds ESRI definition tables and digest index files.
#[derive(Debug, Clone, Default)]
pub struct EsriBuilder {
    files: BTreeMap<String, TableWriter>,
}

impl EsriBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn file(&mut self, name: &str) -> &mut TableWriter {
        self.files.entry(name.to_string()).or_default()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn geographic(
        &mut self,
        id: i32,
        name: &str,
        datum: &str,
        spheroid: &str,
        semi_major_axis: f64,
        inverse_flattening: f64,
        unit: &str,
        unit_factor: f64,
    ) -> &mut Self {
        self.file("Geographic.cs")
            .i32(id)
            .string(name)
            .string(datum)
            .string(spheroid)
            .f64(semi_major_axis)
            .f64(inverse_flattening)
            .string("Greenwich")
            .f64(0.0)
            .string(unit)
            .f64(unit_factor);
        self
    }

    #[allow(clippy::too_many_arguments)]
    pub fn projected(
        &mut self,
        id: i32,
        name: &str,
        geographic: i32,
        projection: &str,
        parameters: &[(&str, &str)],
        unit: &str,
        unit_factor: f64,
    ) -> &mut Self {
        let file = self.file("Projected.cs");
        file.i32(id)
            .string(name)
            .i32(geographic)
            .string(projection)
            .u8(parameters.len() as u8);
        for (key, value) in parameters {
            file.string(key).string(value);
        }
        file.string(unit).f64(unit_factor);
        self
    }

    pub fn vertical(&mut self, id: i32, name: &str, datum: &str, unit: &str, unit_factor: f64) -> &mut Self {
        self.file("Vertical.cs")
            .i32(id)
            .string(name)
            .string(datum)
            .u8(0)
            .string(unit)
            .f64(unit_factor);
        self
    }

    /// Create an empty file so its resource exists with no records.
    pub fn touch(&mut self, name: &str) -> &mut Self {
        self.file(name);
        self
    }

    /// One digest index record; `kind` is `Geographic`, `Projected` or `Vertical`.
    pub fn digest(&mut self, kind: &str, digest: [u8; 16], ids: &[i32]) -> &mut Self {
        let file = self.file(&format!("{}.digest", kind));
        file.bytes(&digest).i16(ids.len() as i16);
        for id in ids {
            file.i32(*id);
        }
        self
    }

    pub fn files(&self) -> Vec<(String, Vec<u8>)> {
        self.files
            .iter()
            .map(|(name, table)| (name.clone(), table.as_slice().to_vec()))
            .collect()
    }

    pub fn write_to(&self, dir: &Path) -> io::Result<()> {
        write_files(
            dir,
            self.files
                .iter()
                .map(|(name, table)| (name.clone(), table.as_slice())),
        )
    }
}
