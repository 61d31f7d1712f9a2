//! Benchmarks for the projection crate.
//!
//! Run with: cargo bench --package projection

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use crs_common::Ellipsoid;
use projection::{
    AlbersEqualArea, CoordinateProjection, GeocentricConversion, LambertConformal, Mercator,
    TransverseMercator, TransverseMercatorJhs, TransverseMercatorThomas,
};

fn sample_points() -> Vec<(f64, f64)> {
    (0..100)
        .map(|i| {
            let t = i as f64 / 100.0;
            ((-125.0 + 4.0 * t).to_radians(), (40.0 + 15.0 * t).to_radians())
        })
        .collect()
}

fn bench_pair<P: CoordinateProjection>(c: &mut Criterion, group_name: &str, proj: &P) {
    let points = sample_points();
    let projected: Vec<(f64, f64)> = points.iter().map(|&(lon, lat)| proj.project(lon, lat)).collect();

    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(points.len() as u64));
    group.bench_function("forward_100", |b| {
        b.iter(|| {
            for &(lon, lat) in &points {
                black_box(proj.project(black_box(lon), black_box(lat)));
            }
        })
    });
    group.bench_function("inverse_100", |b| {
        b.iter(|| {
            for &(x, y) in &projected {
                black_box(proj.inverse(black_box(x), black_box(y)));
            }
        })
    });
    group.finish();
}

// =============================================================================
// TRANSVERSE MERCATOR
// =============================================================================

fn bench_transverse_mercator(c: &mut Criterion) {
    let grs80 = Ellipsoid::grs80();
    let lon0 = (-123.0_f64).to_radians();
    bench_pair(c, "tm_usgs", &TransverseMercator::utm(&grs80, 10, true));
    bench_pair(
        c,
        "tm_thomas",
        &TransverseMercatorThomas::new(&grs80, 0.0, lon0, 0.9996, 500_000.0, 0.0),
    );
    bench_pair(
        c,
        "tm_jhs",
        &TransverseMercatorJhs::new(&grs80, 0.0, lon0, 0.9996, 500_000.0, 0.0),
    );
}

// =============================================================================
// CONICS AND MERCATOR
// =============================================================================

fn bench_conics(c: &mut Criterion) {
    let grs80 = Ellipsoid::grs80();
    bench_pair(
        c,
        "albers",
        &AlbersEqualArea::new(
            &grs80,
            45.0_f64.to_radians(),
            (-126.0_f64).to_radians(),
            50.0_f64.to_radians(),
            58.5_f64.to_radians(),
            1_000_000.0,
            0.0,
        ),
    );
    bench_pair(
        c,
        "lambert_2sp",
        &LambertConformal::two_parallel(
            &grs80,
            45.0_f64.to_radians(),
            (-122.0_f64).to_radians(),
            43.0_f64.to_radians(),
            47.0_f64.to_radians(),
            0.0,
            0.0,
        ),
    );
    bench_pair(c, "mercator_1sp", &Mercator::one_parallel(&grs80, 0.0, 1.0, 0.0, 0.0));
}

// =============================================================================
// GEOCENTRIC
// =============================================================================

fn bench_geocentric(c: &mut Criterion) {
    let wgs84 = Ellipsoid::wgs84();
    let point = wgs84.geodetic_to_geocentric((-123.0_f64).to_radians(), 49.0_f64.to_radians(), 250.0);
    c.bench_function("geocentric_to_geodetic", |b| {
        b.iter(|| wgs84.geocentric_to_geodetic(black_box(&point)))
    });
    c.bench_function("geodetic_to_geocentric", |b| {
        b.iter(|| wgs84.geodetic_to_geocentric(black_box(-2.14), black_box(0.855), black_box(250.0)))
    });
}

criterion_group!(benches, bench_transverse_mercator, bench_conics, bench_geocentric);
criterion_main!(benches);
