//! Registry behaviour over the shared test catalog.

use crs_common::{
    CoordinateSystem, CoordinateSystemKind, CrsError, CrsHeader, Datum, Ellipsoid, GeographicCrs,
    ParameterName, ParameterValue, PrimeMeridian, ProjectedCrs, UnitKind, UnitOfMeasure,
    FIRST_SYNTHESIZED_ID,
};
use crs_registry::{Registry, RegistryConfig, RegistryError};
use epsg_catalog::{table_names, EsriCatalog, MemorySource, ResourceSource};
use std::path::PathBuf;
use std::sync::Arc;
use test_utils::{
    assert_approx_eq, assert_coords_approx_eq, ids, standard_catalog, standard_esri, CatalogBuilder,
    EsriBuilder,
};

fn memory(files: Vec<(String, Vec<u8>)>) -> Arc<dyn ResourceSource> {
    Arc::new(
        files
            .into_iter()
            .fold(MemorySource::new(), |source, (name, data)| source.with(name, data)),
    )
}

fn registry() -> Registry {
    Registry::load(memory(standard_catalog().files()), RegistryConfig::default()).unwrap()
}

fn registry_with_esri(esri: EsriBuilder) -> Registry {
    Registry::new(memory(standard_catalog().files()), RegistryConfig::default())
        .with_esri_source(memory(esri.files()))
}

fn mars() -> CoordinateSystem {
    let datum = Datum::geodetic(
        "Mars 2000",
        Arc::new(Ellipsoid::from_inverse_flattening("Mars 2000 IAU IAG", 3_396_190.0, 169.894_447_223_611_8)),
        Arc::new(PrimeMeridian::greenwich()),
    );
    GeographicCrs::new(
        CrsHeader::anonymous("GCS_Mars_2000"),
        Arc::new(datum),
        Arc::new(UnitOfMeasure::degree()),
    )
    .unwrap()
    .into()
}

#[test]
fn test_wgs84_by_id() {
    let registry = registry();
    let wgs84 = registry.get_by_id(ids::EPSG_4326).unwrap();
    assert_eq!(wgs84.kind(), CoordinateSystemKind::Geographic);
    assert!(wgs84.name().contains("WGS 84"));

    let axes = wgs84.axes();
    assert_eq!(axes.len(), 2);
    for axis in &axes {
        let unit = axis.unit.as_ref().unwrap();
        assert_eq!(unit.kind, UnitKind::Angular);
        assert!(unit.name.contains("degree"));
    }
}

#[test]
fn test_lookup_is_lazy() {
    let registry = Registry::new(memory(standard_catalog().files()), RegistryConfig::default());
    assert!(!registry.is_loaded());
    assert!(registry.get_by_id(ids::EPSG_4269).is_some());
    assert!(registry.is_loaded());
}

#[test]
fn test_name_keeps_first_system() {
    let registry = registry();
    // Geocentric 4978 is also named "WGS 84".
    assert_eq!(registry.get_by_name("WGS 84").unwrap().id(), ids::EPSG_4326);
    assert_eq!(registry.get_by_name("NAD83 / UTM zone 10N").unwrap().id(), ids::EPSG_26910);
    assert!(registry.get_by_name("wgs 84").is_none());
}

#[test]
fn test_unknown_ids() {
    let registry = registry();
    assert!(registry.get_by_id(99_999_999).is_none());
    assert!(registry.get_by_id(0).is_none());
    assert!(registry.get_by_id(-4326).is_none());
    assert!(matches!(
        registry.transform(99_999_999, ids::EPSG_4326),
        Err(RegistryError::UnknownId(99_999_999))
    ));
}

#[test]
fn test_utm_forward() {
    let registry = registry();
    let (x, y) = registry
        .transform_point(ids::EPSG_4269, ids::EPSG_26910, -123.0, 49.0)
        .unwrap();
    assert_approx_eq!(x, 500_000.0, 0.01);
    assert_approx_eq!(y, 5_427_455.78, 0.01);

    let back = registry
        .transform_point(ids::EPSG_26910, ids::EPSG_4269, x, y)
        .unwrap();
    assert_coords_approx_eq!(back, (-123.0, 49.0), 1e-7);
}

#[test]
fn test_web_mercator_through_alias() {
    let registry = registry();
    let alias = registry.get_by_id(900913).unwrap();
    let canonical = registry.get_by_id(ids::EPSG_3857).unwrap();
    assert!(alias.ptr_eq(&canonical));
    assert_eq!(alias.id(), ids::EPSG_3857);

    let (x, y) = registry.transform_point(ids::EPSG_4326, 900913, 10.0, 0.0).unwrap();
    assert_approx_eq!(x, 1_113_194.907_932_7, 1e-3);
    assert_approx_eq!(y, 0.0, 1e-6);
}

#[test]
fn test_aliases_are_not_listed() {
    let registry = registry();
    assert_eq!(registry.len(), 15);
    assert_eq!(registry.coordinate_systems().len(), 15);
    assert!(registry.get_by_id(42102).unwrap().ptr_eq(&registry.get_by_id(ids::EPSG_3005).unwrap()));

    let ids: Vec<i32> = registry.coordinate_systems().iter().map(CoordinateSystem::id).collect();
    assert!(!ids.contains(&900913));
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_default_aliases_can_be_disabled() {
    let config = RegistryConfig {
        register_default_aliases: false,
        ..Default::default()
    };
    let registry = Registry::load(memory(standard_catalog().files()), config).unwrap();
    assert!(registry.get_by_id(900913).is_none());
}

#[test]
fn test_register_alias() {
    let registry = registry();
    registry.register_alias(104326, ids::EPSG_4326).unwrap();
    assert!(registry.get_by_id(104326).unwrap().ptr_eq(&registry.get_by_id(ids::EPSG_4326).unwrap()));

    assert!(matches!(
        registry.register_alias(1, 99_999_999),
        Err(RegistryError::UnknownId(99_999_999))
    ));
}

#[test]
fn test_systems_by_kind() {
    let registry = registry();
    let geographic: Vec<i32> = registry.geographic_systems().iter().map(CoordinateSystem::id).collect();
    assert_eq!(geographic, vec![4140, 4267, 4269, 4277, 4326, 4807]);
    assert_eq!(registry.projected_systems().len(), 6);
    assert_eq!(registry.vertical_systems().len(), 1);
    assert_eq!(registry.systems_of_kind(CoordinateSystemKind::Compound).len(), 1);
    assert_eq!(registry.systems_of_kind(CoordinateSystemKind::Geocentric).len(), 1);
}

#[test]
fn test_catalog_records_are_exposed() {
    let registry = registry();
    assert_eq!(registry.datum(ids::WGS84_DATUM).unwrap().name, "World Geodetic System 1984");
    assert_eq!(registry.unit(ids::METRE).unwrap().kind, UnitKind::Linear);
    assert_eq!(registry.unit_by_name("METRE").unwrap().name, "metre");
    assert!(registry.area(ids::BRITISH_COLUMBIA).is_some());
    assert!(registry.operation(ids::NAD27_TO_NAD83).is_some());
    assert!(registry.failed_tables().is_empty());
}

#[test]
fn test_resolve_registered_instance() {
    let registry = registry();
    let nad83 = registry.get_by_id(ids::EPSG_4269).unwrap();
    assert!(registry.resolve(&nad83).ptr_eq(&nad83));
}

#[test]
fn test_resolve_anonymous_copy() {
    let registry = registry();
    let nad83 = registry.get_by_id(ids::EPSG_4269).unwrap();
    // 4140 is structurally identical and has the lower id, but it is deprecated.
    let copy = nad83.with_header(CrsHeader::anonymous("My NAD83"));
    let resolved = registry.resolve(&copy);
    assert!(resolved.ptr_eq(&nad83));
    assert_eq!(registry.len(), 15);
}

#[test]
fn test_resolve_by_name_requires_same_kind() {
    let registry = registry();
    let geocentric = registry.get_by_id(ids::EPSG_4978).unwrap();
    let copy = geocentric.with_header(CrsHeader::anonymous("WGS 84"));
    assert_eq!(registry.resolve(&copy).id(), ids::EPSG_4978);
}

#[test]
fn test_resolve_is_idempotent() {
    let registry = registry();
    let first = registry.resolve(&mars());
    let second = registry.resolve(&first);
    assert!(first.ptr_eq(&second));
    let third = registry.resolve(&mars());
    assert_eq!(third.id(), first.id());
}

#[test]
fn test_synthesized_ids_increase() {
    let registry = registry();
    let mars = registry.resolve(&mars());
    assert_eq!(mars.id(), FIRST_SYNTHESIZED_ID);
    assert_eq!(mars.name(), "GCS_Mars_2000");
    assert!(registry.get_by_id(FIRST_SYNTHESIZED_ID).unwrap().ptr_eq(&mars));

    let datum = Datum::geodetic(
        "Moon 2000",
        Arc::new(Ellipsoid::sphere("Moon 2000 IAU IAG", 1_737_400.0)),
        Arc::new(PrimeMeridian::greenwich()),
    );
    let moon: CoordinateSystem = GeographicCrs::new(
        CrsHeader::anonymous("GCS_Moon_2000"),
        Arc::new(datum),
        Arc::new(UnitOfMeasure::degree()),
    )
    .unwrap()
    .into();
    let moon = registry.resolve(&moon);
    assert_eq!(moon.id(), FIRST_SYNTHESIZED_ID + 1);
    assert_eq!(registry.len(), 17);
}

#[test]
fn test_longitude_first_copy_is_not_merged() {
    let registry = registry();
    let wgs84 = registry.get_by_id(ids::EPSG_4326).unwrap();
    let mut axes = wgs84.axes();
    axes.reverse();
    let renamed = wgs84.with_header(CrsHeader::anonymous("WGS 84 (lon/lat)"));
    let lon_lat: CoordinateSystem = (**renamed.as_geographic().unwrap())
        .clone()
        .with_axes(axes)
        .into();

    let resolved = registry.resolve(&lon_lat);
    assert_eq!(resolved.id(), FIRST_SYNTHESIZED_ID);
    assert_eq!(resolved.axes()[0].orientation, "east");
}

#[test]
fn test_synthesized_projection_shares_registered_base() {
    let registry = registry();
    let utm10 = registry.get_by_id(ids::EPSG_26910).unwrap();
    let utm10 = utm10.as_projected().unwrap();

    let anonymous_base = CoordinateSystem::Geographic(utm10.base.clone())
        .with_header(CrsHeader::anonymous("GCS_North_American_1983"));
    let mut parameters = utm10.parameters.clone();
    parameters.insert(
        ParameterName::new("central_meridian"),
        ParameterValue::number(-117.0, Some(Arc::new(UnitOfMeasure::degree()))),
    );
    let candidate = ProjectedCrs {
        header: CrsHeader::anonymous("NAD83 / UTM zone 11N"),
        base: anonymous_base.as_geographic().unwrap().clone(),
        parameters,
        ..(**utm10).clone()
    };

    let resolved = registry.resolve(&candidate.into());
    assert_eq!(resolved.id(), FIRST_SYNTHESIZED_ID);
    let base = resolved.as_projected().unwrap().base.clone();
    assert_eq!(base.header.id, ids::EPSG_4269);
    assert!(CoordinateSystem::Geographic(base).ptr_eq(&registry.get_by_id(ids::EPSG_4269).unwrap()));

    let (x, _) = registry
        .transform_point(ids::EPSG_4269, FIRST_SYNTHESIZED_ID, -117.0, 45.0)
        .unwrap();
    assert_approx_eq!(x, 500_000.0, 0.01);
}

#[test]
fn test_esri_digest_resolves_to_epsg() {
    let plain = registry();
    let nad83 = plain.get_by_id(ids::EPSG_4269).unwrap();

    let mut esri = standard_esri();
    esri.digest("Geographic", nad83.md5_digest().unwrap(), &[ids::EPSG_4269]);
    let registry = registry_with_esri(esri);

    // The ESRI datum name differs, so only the digest can match it.
    let candidate = esri_nad83();
    assert!(!candidate.is_equivalent(&nad83));

    let resolved = registry.resolve(&candidate);
    assert!(resolved.ptr_eq(&registry.get_by_id(ids::EPSG_4269).unwrap()));
    assert!(registry.failed_tables().is_empty(), "{:?}", registry.failed_tables());
}

/// ESRI's NAD83 with its id and name stripped.
fn esri_nad83() -> CoordinateSystem {
    let esri = EsriCatalog::load(memory(standard_esri().files()).as_ref());
    esri.get(ids::EPSG_4269)
        .unwrap()
        .with_header(CrsHeader::anonymous("North American 1983"))
}

#[test]
fn test_without_digest_esri_datum_is_synthesized() {
    let registry = registry();
    assert_eq!(registry.resolve(&esri_nad83()).id(), FIRST_SYNTHESIZED_ID);
}

#[test]
fn test_esri_definition_is_published_under_its_id() {
    let esri_only = EsriCatalog::load(memory(standard_esri().files()).as_ref());
    let albers = esri_only.get(102001).unwrap().clone();

    let mut esri = standard_esri();
    esri.digest("Projected", albers.md5_digest().unwrap(), &[102001]);
    let registry = registry_with_esri(esri);
    assert!(registry.get_by_id(102001).is_none());

    let candidate = albers.with_header(CrsHeader::anonymous("Canada Albers"));
    let resolved = registry.resolve(&candidate);
    assert_eq!(resolved.id(), 102001);
    assert_eq!(resolved.name(), "Canada_Albers_Equal_Area_Conic");
    assert!(registry.get_by_id(102001).unwrap().ptr_eq(&resolved));
    assert_eq!(registry.resolve(&candidate).id(), 102001);
}

#[test]
fn test_compound_resolves_to_catalog_system() {
    let registry = registry();
    let compound = registry.compound(ids::EPSG_4269, ids::EPSG_5703).unwrap();
    assert_eq!(compound.id(), ids::EPSG_5498);
}

#[test]
fn test_compound_synthesized_with_default_name() {
    let registry = registry();
    let compound = registry.compound(ids::EPSG_4326, ids::EPSG_5703).unwrap();
    assert_eq!(compound.id(), FIRST_SYNTHESIZED_ID);
    assert_eq!(compound.name(), "WGS 84 + NAVD88 height");
    let parts = compound.as_compound().unwrap();
    assert!(parts.horizontal.ptr_eq(&registry.get_by_id(ids::EPSG_4326).unwrap()));

    let again = registry.compound(ids::EPSG_4326, ids::EPSG_5703).unwrap();
    assert!(again.ptr_eq(&compound));
}

#[test]
fn test_compound_rejects_wrong_kinds() {
    let registry = registry();
    assert!(matches!(
        registry.compound(ids::EPSG_5703, ids::EPSG_4326),
        Err(RegistryError::Crs(CrsError::InvalidArgument(_)))
    ));
    assert!(matches!(
        registry.compound(ids::EPSG_4269, ids::EPSG_4326),
        Err(RegistryError::Crs(CrsError::InvalidArgument(_)))
    ));
    assert!(matches!(
        registry.compound(ids::EPSG_4269, 99_999_999),
        Err(RegistryError::UnknownId(99_999_999))
    ));
}

#[test]
fn test_missing_table_is_reported() {
    let mut catalog: CatalogBuilder = standard_catalog();
    catalog.remove(table_names::AXIS);
    let registry = Registry::load(memory(catalog.files()), RegistryConfig::default()).unwrap();
    assert_eq!(registry.failed_tables(), vec![table_names::AXIS.to_string()]);
    assert!(registry.get_by_id(ids::EPSG_4326).is_some());
}

#[test]
fn test_empty_source_loads_nothing() {
    let registry = Registry::load(Arc::new(MemorySource::new()), RegistryConfig::default()).unwrap();
    assert!(registry.is_empty());
    assert!(!registry.failed_tables().is_empty());
    // Default aliases have nothing to point at.
    assert!(registry.get_by_id(900913).is_none());
}

#[test]
fn test_clear_resets_synthesized_ids() {
    let registry = registry();
    assert_eq!(registry.resolve(&mars()).id(), FIRST_SYNTHESIZED_ID);
    registry.register_alias(104326, ids::EPSG_4326).unwrap();

    registry.clear();
    assert!(!registry.is_loaded());
    assert!(registry.get_by_id(104326).is_none());
    assert!(registry.get_by_id(FIRST_SYNTHESIZED_ID).is_none());
    assert_eq!(registry.len(), 15);
    assert_eq!(registry.resolve(&mars()).id(), FIRST_SYNTHESIZED_ID);
}

#[test]
fn test_concurrent_resolve_yields_one_system() {
    let registry = Registry::new(memory(standard_catalog().files()), RegistryConfig::default());
    let resolved: Vec<i32> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| registry.resolve(&mars()).id()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(resolved.iter().all(|id| *id == FIRST_SYNTHESIZED_ID));
    assert_eq!(registry.len(), 16);
}

#[test]
fn test_open_directory() {
    let dir = standard_catalog().into_temp_dir().unwrap();
    let config = RegistryConfig {
        catalog_dir: dir.path().to_path_buf(),
        ..Default::default()
    };
    let registry = Registry::open(config).unwrap();
    assert_eq!(registry.len(), 15);
}

#[test]
fn test_open_missing_directory() {
    let config = RegistryConfig {
        catalog_dir: PathBuf::from("/nonexistent/epsg"),
        ..Default::default()
    };
    assert!(matches!(Registry::open(config), Err(RegistryError::Catalog(_))));
}

#[test]
fn test_invalid_config() {
    let config = RegistryConfig {
        first_synthesized_id: -1,
        ..Default::default()
    };
    assert!(matches!(
        Registry::load(Arc::new(MemorySource::new()), config),
        Err(RegistryError::InvalidConfig(_))
    ));
}
