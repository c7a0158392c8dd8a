//! One-shot grid lookup from the command line.
//!
//! Prints the JSON lookup response to stdout; exits non-zero on an error
//! response.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use location_grid::config::Config;
use location_grid::geocoding::NominatimClient;
use location_grid::grid::{loader, GridResolver};
use location_grid::service::{GridLookupService, LookupResponse};

#[derive(Parser, Debug)]
#[command(name = "lookup")]
#[command(about = "Resolve an address or coordinates to a location grid id")]
struct Args {
    /// Address or place name to geocode
    #[arg(conflicts_with_all = ["lng", "lat"])]
    address: Option<String>,

    /// Longitude of the point
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    lng: Option<f64>,

    /// Latitude of the point
    #[arg(long, allow_hyphen_values = true, requires = "lng")]
    lat: Option<f64>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grid CSV file (overrides config)
    #[arg(long)]
    grid: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Logs go to stderr so stdout stays pure JSON
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = Config::load_or_default(args.config.as_deref())?;
    if let Some(grid) = args.grid {
        config.grid.path = grid;
    }

    let index = loader::load_index(&config.grid.path).context("Failed to load location grid")?;
    let geocoder =
        NominatimClient::new(&config.nominatim).context("Failed to create Nominatim client")?;
    let service = GridLookupService::new(geocoder, GridResolver::new(index));

    let response = match args.address {
        Some(address) => service.geocode_address(&address).await,
        None if args.lng.is_some() => service.geocode_coordinates(args.lng, args.lat),
        None => LookupResponse::error("Provide an address or --lng and --lat"),
    };

    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(if response.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
