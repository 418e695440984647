//! geogate — run point batches through the caching gateway.
//!
//! Reads `{"points": [...]}` (or a bare array) from a file or stdin and
//! prints the upstream result as JSON.

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Deserialize;
use tracing::info;

use geogate::{GatewayConfig, GeoGateError, GeoGatewayBuilder, PointSet};

/// Caching gateway for geographic point batches
#[derive(Parser)]
#[command(name = "geogate")]
#[command(version = geogate::PKG_VERSION)]
#[command(about = "Fingerprint, cache and forward point batches to the compute service")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Upstream base URL (overrides config and environment).
    #[arg(long)]
    upstream: Option<String>,

    /// Cache TTL in seconds (overrides config and environment).
    #[arg(long)]
    ttl: Option<u64>,

    /// Process the same batch this many times.
    #[arg(long, default_value_t = 1)]
    repeat: u32,

    /// Input file (omit to read from stdin).
    file: Option<PathBuf>,
}

/// Accepted input shapes.
#[derive(Deserialize)]
#[serde(untagged)]
enum Input {
    Request { points: PointSet },
    Bare(PointSet),
}

impl Input {
    fn into_points(self) -> PointSet {
        match self {
            Input::Request { points } | Input::Bare(points) => points,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialise tracing (default: warn; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error ({}): {}", e.status_code(), e.payload());
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), GeoGateError> {
    let mut config = GatewayConfig::load(args.config.as_deref())?;
    if let Some(url) = args.upstream {
        config.upstream.base_url = url;
    }
    if let Some(ttl) = args.ttl {
        config.cache.ttl_secs = ttl;
    }
    config.validate()?;

    let gateway = GeoGatewayBuilder::from_config(&config).build()?;

    info!(
        version = geogate::version_string(),
        upstream = %config.upstream.base_url,
        ttl_secs = config.cache.ttl_secs,
        "geogate starting"
    );

    let raw = read_input(args.file.as_deref())?;
    let points = serde_json::from_str::<Input>(&raw)?.into_points();

    for _ in 0..args.repeat.max(1) {
        let result = gateway.process(&points).await?;
        println!("{}", serde_json::to_string(&result)?);
    }

    Ok(())
}

fn read_input(file: Option<&std::path::Path>) -> Result<String, GeoGateError> {
    let read = match file {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).map(|_| buf)
        }
    };
    read.map_err(|e| GeoGateError::Configuration(format!("Failed to read input: {e}")))
}
