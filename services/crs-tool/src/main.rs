//! Coordinate system registry tool.
//!
//! Looks up catalog systems, resolves hand-built geographic systems against
//! the catalog, transforms points and lists the registry contents. Output is
//! JSON on stdout; logs go to stderr.

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crs_common::CoordinateSystemKind;
use crs_registry::{Registry, RegistryConfig};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use commands::GeographicArgs;

#[derive(Parser, Debug)]
#[command(name = "crs-tool")]
#[command(about = "Coordinate system registry lookups and point transforms")]
struct Args {
    /// Directory holding the EPSG catalog tables
    #[arg(long, env = "CRS_CATALOG_DIR", default_value = "data/epsg")]
    catalog_dir: PathBuf,

    /// Directory holding the ESRI definitions and digest files
    #[arg(long, env = "CRS_ESRI_DIR")]
    esri_dir: Option<PathBuf>,

    /// Log level, used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a registered coordinate system by id or exact name
    Lookup {
        /// Numeric id (aliases included) or exact name
        key: String,
    },

    /// Resolve a geographic system built from ellipsoid parameters
    Resolve {
        #[command(flatten)]
        geographic: GeographicArgs,
    },

    /// Transform one point between two registered systems
    Transform {
        #[arg(long)]
        from: i32,

        #[arg(long)]
        to: i32,

        /// Longitude or easting
        #[arg(allow_negative_numbers = true)]
        x: f64,

        /// Latitude or northing
        #[arg(allow_negative_numbers = true)]
        y: f64,
    },

    /// List registered systems
    List {
        /// Only systems of this kind (geographic, projected, vertical, ...)
        #[arg(long, value_parser = parse_kind)]
        kind: Option<CoordinateSystemKind>,
    },
}

fn parse_kind(s: &str) -> std::result::Result<CoordinateSystemKind, String> {
    CoordinateSystemKind::parse(s).ok_or_else(|| format!("unknown coordinate system kind '{}'", s))
}

fn init_tracing(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if args.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args);

    let config = RegistryConfig {
        catalog_dir: args.catalog_dir.clone(),
        esri_dir: args.esri_dir.clone(),
        ..RegistryConfig::from_env()
    };
    let registry = Registry::open(config)
        .with_context(|| format!("Failed to open catalog at {}", args.catalog_dir.display()))?;
    info!(systems = registry.len(), "Registry ready");

    let output = match &args.command {
        Command::Lookup { key } => commands::lookup(&registry, key)?,
        Command::Resolve { geographic } => commands::resolve_geographic(&registry, geographic)?,
        Command::Transform { from, to, x, y } => commands::transform(&registry, *from, *to, *x, *y)?,
        Command::List { kind } => commands::list(&registry, *kind),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
