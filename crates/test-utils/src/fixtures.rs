//! A small but realistic catalog shared by the catalog and registry tests.
//!
//! The records follow the published EPSG definitions closely enough that
//! projected coordinates can be checked against worked examples. Projected and
//! compound records are written before the systems they reference.

use crate::catalog::{crs_types, datum_types, unit_types, CatalogBuilder, CrsRow, EsriBuilder};
use std::f64::consts::PI;

/// Identifiers used by [`standard_catalog`].
pub mod ids {
    pub const METRE: i32 = 9001;
    pub const FOOT: i32 = 9002;
    pub const US_SURVEY_FOOT: i32 = 9003;
    pub const RADIAN: i32 = 9101;
    pub const DEGREE: i32 = 9102;
    pub const GRAD: i32 = 9105;
    pub const DMS: i32 = 9110;
    pub const DEGREE_SUPPLIER: i32 = 9122;
    pub const UNITY: i32 = 9201;
    pub const PARTS_PER_MILLION: i32 = 9202;

    pub const WORLD: i32 = 1262;
    pub const BRITISH_COLUMBIA: i32 = 2832;
    pub const FIJI: i32 = 1094;

    pub const GREENWICH: i32 = 8901;
    pub const PARIS: i32 = 8903;

    pub const WGS84_ELLIPSOID: i32 = 7030;
    pub const GRS80: i32 = 7019;
    pub const CLARKE_1866: i32 = 7008;
    pub const AIRY_1830: i32 = 7001;
    pub const CLARKE_1880_IGN: i32 = 7011;

    pub const WGS84_DATUM: i32 = 6326;
    pub const NAD83_DATUM: i32 = 6269;
    pub const NAD27_DATUM: i32 = 6267;
    pub const OSGB36_DATUM: i32 = 6277;
    pub const NTF_PARIS_DATUM: i32 = 6807;
    pub const NAVD88_DATUM: i32 = 5103;
    pub const ENGINEERING_DATUM: i32 = 9315;

    pub const ELLIPSOIDAL_2D: i32 = 6422;
    pub const ELLIPSOIDAL_GRADS: i32 = 6403;
    pub const CARTESIAN_METRES: i32 = 4400;
    pub const CARTESIAN_US_FEET: i32 = 4497;
    pub const VERTICAL_UP: i32 = 6499;
    pub const GEOCENTRIC_XYZ: i32 = 6500;

    pub const TRANSVERSE_MERCATOR: i32 = 9807;
    pub const LAMBERT_2SP: i32 = 9802;
    pub const PSEUDO_MERCATOR: i32 = 1024;
    pub const ALBERS: i32 = 9822;
    pub const NADCON: i32 = 9613;

    pub const UTM_10N: i32 = 16010;
    pub const BRITISH_NATIONAL_GRID: i32 = 19916;
    pub const PSEUDO_MERCATOR_CONVERSION: i32 = 3856;
    pub const BC_ALBERS: i32 = 19984;
    pub const TEXAS_CENTRAL_FTUS: i32 = 15360;
    pub const NAD27_TO_NAD83: i32 = 1241;

    pub const EPSG_4326: i32 = 4326;
    pub const EPSG_4269: i32 = 4269;
    pub const EPSG_4140: i32 = 4140;
    pub const EPSG_4267: i32 = 4267;
    pub const EPSG_4277: i32 = 4277;
    pub const EPSG_4807: i32 = 4807;
    pub const EPSG_4978: i32 = 4978;
    pub const EPSG_26910: i32 = 26910;
    pub const EPSG_27700: i32 = 27700;
    pub const EPSG_3857: i32 = 3857;
    pub const EPSG_3005: i32 = 3005;
    pub const EPSG_2277: i32 = 2277;
    pub const EPSG_32610: i32 = 32610;
    pub const EPSG_5703: i32 = 5703;
    pub const EPSG_5498: i32 = 5498;
}

/// Every EPSG table, populated with the systems listed in [`ids`].
pub fn standard_catalog() -> CatalogBuilder {
    use ids::*;

    let mut b = CatalogBuilder::new();

    // Derived units first, so base references point forward.
    b.unit(DEGREE_SUPPLIER, unit_types::ANGULAR, RADIAN, PI, 180.0, "degree (supplier to define representation)")
        .unit(METRE, unit_types::LINEAR, METRE, 1.0, 1.0, "metre")
        .unit(FOOT, unit_types::LINEAR, METRE, 0.3048, 1.0, "foot")
        .unit(US_SURVEY_FOOT, unit_types::LINEAR, METRE, 12.0, 39.37, "US survey foot")
        .unit(RADIAN, unit_types::ANGULAR, RADIAN, 1.0, 1.0, "radian")
        .unit(DEGREE, unit_types::ANGULAR, RADIAN, PI, 180.0, "degree")
        .unit(GRAD, unit_types::ANGULAR, RADIAN, PI, 200.0, "grad")
        .unit(DMS, unit_types::ANGULAR, RADIAN, f64::NAN, f64::NAN, "sexagesimal DMS")
        .unit(UNITY, unit_types::SCALE, UNITY, 1.0, 1.0, "unity")
        .unit(PARTS_PER_MILLION, unit_types::SCALE, UNITY, 1.0, 1_000_000.0, "parts per million");

    b.axis_name(9901, "Geodetic latitude")
        .axis_name(9902, "Geodetic longitude")
        .axis_name(9904, "Gravity-related height")
        .axis_name(9906, "Easting")
        .axis_name(9907, "Northing")
        .axis_name(9910, "Geocentric X")
        .axis_name(9911, "Geocentric Y")
        .axis_name(9912, "Geocentric Z");

    b.axis(ELLIPSOIDAL_2D, 9901, "north", 'B', DEGREE_SUPPLIER)
        .axis(ELLIPSOIDAL_2D, 9902, "east", 'L', DEGREE_SUPPLIER)
        .axis(ELLIPSOIDAL_GRADS, 9901, "north", 'B', GRAD)
        .axis(ELLIPSOIDAL_GRADS, 9902, "east", 'L', GRAD)
        .axis(CARTESIAN_METRES, 9906, "east", 'E', METRE)
        .axis(CARTESIAN_METRES, 9907, "north", 'N', METRE)
        .axis(CARTESIAN_US_FEET, 9906, "east", 'X', US_SURVEY_FOOT)
        .axis(CARTESIAN_US_FEET, 9907, "north", 'Y', US_SURVEY_FOOT)
        .axis(VERTICAL_UP, 9904, "up", 'H', METRE)
        .axis(GEOCENTRIC_XYZ, 9910, "geocentricX", 'X', METRE)
        .axis(GEOCENTRIC_XYZ, 9911, "geocentricY", 'Y', METRE)
        .axis(GEOCENTRIC_XYZ, 9912, "geocentricZ", 'Z', METRE);

    b.area(WORLD, "World", -180.0, -90.0, 180.0, 90.0)
        .area(BRITISH_COLUMBIA, "Canada - British Columbia", -139.04, 48.25, -114.08, 60.01)
        .area(FIJI, "Fiji", 176.81, -20.81, -178.15, -12.42);

    b.prime_meridian(GREENWICH, "Greenwich", DEGREE, 0.0)
        .prime_meridian(PARIS, "Paris", GRAD, 2.5969213);

    b.ellipsoid(WGS84_ELLIPSOID, "WGS 84", METRE, f64::NAN, 6_378_137.0, 298.257223563)
        .ellipsoid(GRS80, "GRS 1980", METRE, f64::NAN, 6_378_137.0, 298.257222101)
        .ellipsoid(CLARKE_1866, "Clarke 1866", METRE, 6_356_583.8, 6_378_206.4, f64::NAN)
        .ellipsoid(AIRY_1830, "Airy 1830", METRE, f64::NAN, 6_377_563.396, 299.3249646)
        .ellipsoid(CLARKE_1880_IGN, "Clarke 1880 (IGN)", METRE, 6_356_515.0, 6_378_249.2, f64::NAN);

    b.datum(WGS84_DATUM, "World Geodetic System 1984", datum_types::GEODETIC, WGS84_ELLIPSOID, GREENWICH, WORLD)
        .datum(NAD83_DATUM, "North American Datum 1983", datum_types::GEODETIC, GRS80, GREENWICH, 0)
        .datum(NAD27_DATUM, "North American Datum 1927", datum_types::GEODETIC, CLARKE_1866, GREENWICH, 0)
        .datum(OSGB36_DATUM, "OSGB 1936", datum_types::GEODETIC, AIRY_1830, 0, 0)
        .datum(NTF_PARIS_DATUM, "Nouvelle Triangulation Francaise (Paris)", datum_types::GEODETIC, CLARKE_1880_IGN, PARIS, 0)
        .datum(NAVD88_DATUM, "North American Vertical Datum 1988", datum_types::VERTICAL, 0, 0, 0)
        .datum(ENGINEERING_DATUM, "Astra Minas", datum_types::ENGINEERING, 0, 0, 0);

    b.parameter(8801, "Latitude of natural origin")
        .parameter(8802, "Longitude of natural origin")
        .parameter(8805, "Scale factor at natural origin")
        .parameter(8806, "False easting")
        .parameter(8807, "False northing")
        .parameter(8821, "Latitude of false origin")
        .parameter(8822, "Longitude of false origin")
        .parameter(8823, "Latitude of 1st standard parallel")
        .parameter(8824, "Latitude of 2nd standard parallel")
        .parameter(8826, "Easting at false origin")
        .parameter(8827, "Northing at false origin")
        .parameter(8657, "Latitude difference file")
        .parameter(8658, "Longitude difference file");

    let false_origin = [8821, 8822, 8823, 8824, 8826, 8827];
    b.method_with(TRANSVERSE_MERCATOR, "Transverse Mercator", &[8801, 8802, 8805, 8806, 8807])
        .method_with(LAMBERT_2SP, "Lambert Conic Conformal (2SP)", &false_origin)
        .method_with(PSEUDO_MERCATOR, "Popular Visualisation Pseudo Mercator", &[8801, 8802, 8806, 8807])
        .method_with(ALBERS, "Albers Equal Area", &false_origin)
        .method_with(NADCON, "NADCON", &[8657, 8658]);

    // Values are written out of method order for UTM to check the sort.
    b.conversion(
        UTM_10N,
        "UTM zone 10N",
        TRANSVERSE_MERCATOR,
        &[
            (8806, 500_000.0, METRE),
            (8807, 0.0, METRE),
            (8801, 0.0, DEGREE),
            (8802, -123.0, DEGREE),
            (8805, 0.9996, UNITY),
        ],
    )
    .conversion(
        BRITISH_NATIONAL_GRID,
        "British National Grid",
        TRANSVERSE_MERCATOR,
        &[
            (8801, 49.0, DEGREE),
            (8802, -2.0, DEGREE),
            (8805, 0.9996012717, UNITY),
            (8806, 400_000.0, METRE),
            (8807, -100_000.0, METRE),
        ],
    )
    .conversion(
        PSEUDO_MERCATOR_CONVERSION,
        "Popular Visualisation Pseudo-Mercator",
        PSEUDO_MERCATOR,
        &[
            (8801, 0.0, DEGREE),
            (8802, 0.0, DEGREE),
            (8806, 0.0, METRE),
            (8807, 0.0, METRE),
        ],
    )
    .conversion(
        BC_ALBERS,
        "British Columbia Albers",
        ALBERS,
        &[
            (8821, 45.0, DEGREE),
            (8822, -126.0, DEGREE),
            (8823, 50.0, DEGREE),
            (8824, 58.5, DEGREE),
            (8826, 1_000_000.0, METRE),
            (8827, 0.0, METRE),
        ],
    )
    .conversion(
        TEXAS_CENTRAL_FTUS,
        "SPCS83 Texas Central zone (US Survey feet)",
        LAMBERT_2SP,
        &[
            (8821, 29.40, DMS),
            (8822, -100.20, DMS),
            (8823, 31.53, DMS),
            (8824, 30.07, DMS),
            (8826, 2_296_583.333, US_SURVEY_FOOT),
            (8827, 9_842_500.0, US_SURVEY_FOOT),
        ],
    );

    // A grid-based transformation: values are file references.
    b.parameter_value(NAD27_TO_NAD83, NADCON, 8657, f64::NAN, Some("conus.las"), 0)
        .parameter_value(NAD27_TO_NAD83, NADCON, 8658, f64::NAN, Some("conus.los"), 0)
        .operation(NAD27_TO_NAD83, NADCON, "NAD27 to NAD83 (1)", 1, EPSG_4267, EPSG_4269);

    b.coordinate_system(ELLIPSOIDAL_2D, 0)
        .coordinate_system(ELLIPSOIDAL_GRADS, 0)
        .coordinate_system(CARTESIAN_METRES, 1)
        .coordinate_system(CARTESIAN_US_FEET, 1)
        .coordinate_system(VERTICAL_UP, 2)
        .coordinate_system(GEOCENTRIC_XYZ, 1);

    b.projected(EPSG_26910, "NAD83 / UTM zone 10N", CARTESIAN_METRES, EPSG_4269, UTM_10N)
        .crs(CrsRow {
            id: EPSG_3005,
            name: "NAD83 / BC Albers".to_string(),
            area: BRITISH_COLUMBIA,
            crs_type: crs_types::PROJECTED,
            coordinate_system: CARTESIAN_METRES,
            source: EPSG_4269,
            operation: BC_ALBERS,
            ..Default::default()
        })
        .projected(EPSG_27700, "OSGB 1936 / British National Grid", CARTESIAN_METRES, EPSG_4277, BRITISH_NATIONAL_GRID)
        .projected(EPSG_2277, "NAD83 / Texas Central (ftUS)", CARTESIAN_US_FEET, EPSG_4269, TEXAS_CENTRAL_FTUS)
        .projected(EPSG_3857, "WGS 84 / Pseudo-Mercator", CARTESIAN_METRES, EPSG_4326, PSEUDO_MERCATOR_CONVERSION)
        .projected(EPSG_32610, "WGS 84 / UTM zone 10N", CARTESIAN_METRES, EPSG_4326, UTM_10N)
        .compound(EPSG_5498, "NAD83 + NAVD88 height", EPSG_4269, EPSG_5703)
        .crs(CrsRow {
            id: EPSG_4326,
            name: "WGS 84".to_string(),
            area: WORLD,
            crs_type: crs_types::GEOGRAPHIC_2D,
            coordinate_system: ELLIPSOIDAL_2D,
            datum: WGS84_DATUM,
            ..Default::default()
        })
        .geographic(EPSG_4269, "NAD83", ELLIPSOIDAL_2D, NAD83_DATUM)
        .crs(CrsRow {
            id: EPSG_4140,
            name: "NAD83(CSRS98)".to_string(),
            crs_type: crs_types::GEOGRAPHIC_2D,
            coordinate_system: ELLIPSOIDAL_2D,
            datum: NAD83_DATUM,
            deprecated: true,
            ..Default::default()
        })
        .geographic(EPSG_4267, "NAD27", ELLIPSOIDAL_2D, NAD27_DATUM)
        .geographic(EPSG_4277, "OSGB 1936", ELLIPSOIDAL_2D, OSGB36_DATUM)
        .geographic(EPSG_4807, "NTF (Paris)", ELLIPSOIDAL_GRADS, NTF_PARIS_DATUM)
        .geocentric(EPSG_4978, "WGS 84", GEOCENTRIC_XYZ, WGS84_DATUM)
        .vertical(EPSG_5703, "NAVD88 height", VERTICAL_UP, NAVD88_DATUM);

    b
}

/// ESRI definitions matching some of the [`standard_catalog`] systems.
///
/// Every digest index file exists but is empty. Callers add the records,
/// since the digests are computed from the model the catalog decodes into.
pub fn standard_esri() -> EsriBuilder {
    let mut b = EsriBuilder::new();
    b.touch("Geographic.digest")
        .touch("Projected.digest")
        .touch("Vertical.digest");
    b.geographic(
        4269,
        "GCS_North_American_1983",
        "D_North_American_1983",
        "GRS_1980",
        6_378_137.0,
        298.257222101,
        "Degree",
        PI / 180.0,
    )
    .geographic(
        4326,
        "GCS_WGS_1984",
        "D_WGS_1984",
        "WGS_1984",
        6_378_137.0,
        298.257223563,
        "Degree",
        PI / 180.0,
    )
    .projected(
        3005,
        "NAD_1983_BC_Environment_Albers",
        4269,
        "Albers",
        &[
            ("False_Easting", "1000000.0"),
            ("False_Northing", "0.0"),
            ("Central_Meridian", "-126.0"),
            ("Standard_Parallel_1", "50.0"),
            ("Standard_Parallel_2", "58.5"),
            ("Latitude_Of_Origin", "45.0"),
        ],
        "Meter",
        1.0,
    )
    .projected(
        102001,
        "Canada_Albers_Equal_Area_Conic",
        4269,
        "Albers",
        &[
            ("False_Easting", "0.0"),
            ("False_Northing", "0.0"),
            ("Central_Meridian", "-96.0"),
            ("Standard_Parallel_1", "50.0"),
            ("Standard_Parallel_2", "70.0"),
            ("Latitude_Of_Origin", "40.0"),
        ],
        "Meter",
        1.0,
    )
    .vertical(5703, "NAVD_1988", "North_American_Vertical_Datum_1988", "Meter", 1.0);
    b
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_standard_catalog_writes_every_table() {
        let names: HashSet<String> = standard_catalog().files().into_iter().map(|(n, _)| n).collect();
        for table in [
            "unitOfMeasure",
            "coordinateAxisName",
            "coordinateAxis",
            "area",
            "primeMeridian",
            "ellipsoid",
            "datum",
            "coordOperationParam",
            "coordOperationParamUsage",
            "coordOperationMethod",
            "coordOperationParamValue",
            "coordOperation",
            "coordinateSystem",
            "coordinateReferenceSystem",
        ] {
            assert!(names.contains(&format!("{}.bin", table)), "missing {}", table);
        }
    }

    #[test]
    fn test_standard_esri_files() {
        let names: Vec<String> = standard_esri().files().into_iter().map(|(n, _)| n).collect();
        assert_eq!(
            names,
            vec![
                "Geographic.cs",
                "Geographic.digest",
                "Projected.cs",
                "Projected.digest",
                "Vertical.cs",
                "Vertical.digest",
            ]
        );
    }
}
