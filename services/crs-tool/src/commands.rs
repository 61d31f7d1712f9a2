//! Subcommand implementations. Each returns the JSON document to print.

use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use crs_common::{
    CoordinateSystemKind, CrsHeader, Datum, Ellipsoid, GeographicCrs, PrimeMeridian,
    FIRST_SYNTHESIZED_ID,
};
use crs_registry::Registry;
use serde_json::{json, Value};

/// Parameters of a hand-built geographic system.
#[derive(Args, Debug, Clone)]
pub struct GeographicArgs {
    /// Name given to the system if it has to be registered
    #[arg(long, default_value = "Custom geographic")]
    pub name: String,

    /// Datum name; datums only match when their names agree
    #[arg(long, default_value = "Unknown datum")]
    pub datum: String,

    #[arg(long, default_value = "Custom ellipsoid")]
    pub ellipsoid: String,

    /// Semi-major axis in metres
    #[arg(long)]
    pub semi_major: f64,

    /// Inverse flattening; 0 for a sphere
    #[arg(long)]
    pub inverse_flattening: f64,

    /// Prime meridian offset from Greenwich in degrees
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub prime_meridian: f64,

    /// Angular unit name from the catalog
    #[arg(long, default_value = "degree")]
    pub unit: String,
}

pub fn lookup(registry: &Registry, key: &str) -> Result<Value> {
    let system = match key.trim().parse::<i32>() {
        Ok(id) => registry.get_by_id(id),
        Err(_) => registry.get_by_name(key),
    };
    system
        .map(|system| system.to_json())
        .ok_or_else(|| anyhow!("No coordinate system registered as '{}'", key))
}

pub fn resolve_geographic(registry: &Registry, args: &GeographicArgs) -> Result<Value> {
    if args.semi_major.is_nan() || args.semi_major <= 0.0 {
        bail!("Semi-major axis must be positive, got {}", args.semi_major);
    }
    let unit = registry
        .unit_by_name(&args.unit)
        .with_context(|| format!("Unknown unit '{}'", args.unit))?;

    let prime_meridian = if args.prime_meridian == 0.0 {
        PrimeMeridian::greenwich()
    } else {
        PrimeMeridian::new("Custom meridian", args.prime_meridian)
    };
    let datum = Datum::geodetic(
        args.datum.as_str(),
        Arc::new(Ellipsoid::from_inverse_flattening(
            args.ellipsoid.as_str(),
            args.semi_major,
            args.inverse_flattening,
        )),
        Arc::new(prime_meridian),
    );
    let candidate = GeographicCrs::new(CrsHeader::anonymous(args.name.as_str()), Arc::new(datum), unit)?;

    let resolved = registry.resolve(&candidate.into());
    Ok(json!({
        "resolved_id": resolved.id(),
        "synthesized": resolved.id() >= FIRST_SYNTHESIZED_ID,
        "system": resolved.to_json(),
    }))
}

pub fn transform(registry: &Registry, from: i32, to: i32, x: f64, y: f64) -> Result<Value> {
    let (tx, ty) = registry
        .transform_point(from, to, x, y)
        .with_context(|| format!("Failed to transform ({}, {}) from {} to {}", x, y, from, to))?;
    Ok(json!({
        "from": from,
        "to": to,
        "input": [x, y],
        "output": [tx, ty],
    }))
}

pub fn list(registry: &Registry, kind: Option<CoordinateSystemKind>) -> Value {
    let systems = match kind {
        Some(kind) => registry.systems_of_kind(kind),
        None => registry.coordinate_systems(),
    };
    let entries: Vec<Value> = systems
        .iter()
        .map(|system| {
            json!({
                "id": system.id(),
                "name": system.name(),
                "kind": system.kind(),
                "deprecated": system.is_deprecated(),
            })
        })
        .collect();
    Value::Array(entries)
}
