//! Query server for grid lookups.
//!
//! Exposes address and coordinate lookups over HTTP, answering with the
//! flat `{lng, lat, grid_id}` / `{error}` objects.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use location_grid::config::Config;
use location_grid::geocoding::{AddressGeocoder, NominatimClient};
use location_grid::grid::{loader, GridIndex, GridResolver};
use location_grid::service::{
    resource_descriptions, tool_descriptions, DatasetResource, GridLookupService, LookupResponse,
    ToolDescription,
};

#[derive(Parser, Debug)]
#[command(name = "serve")]
#[command(about = "Location grid query server")]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address (overrides config)
    #[arg(short, long)]
    listen: Option<String>,

    /// Grid CSV file (overrides config)
    #[arg(long)]
    grid: Option<PathBuf>,

    /// Nominatim base URL (overrides config)
    #[arg(long)]
    nominatim_url: Option<String>,
}

type LookupService = GridLookupService<Box<dyn AddressGeocoder>, GridIndex>;

/// Application state shared across handlers
struct AppState {
    service: LookupService,
}

impl AppState {
    fn index(&self) -> &GridIndex {
        self.service.resolver().store()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = Config::load_or_default(args.config.as_deref())?;
    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }
    if let Some(grid) = args.grid {
        config.grid.path = grid;
    }
    if let Some(url) = args.nominatim_url {
        config.nominatim.base_url = url;
    }

    info!("Location Grid Query Server");

    let index = loader::load_index(&config.grid.path).context("Failed to load location grid")?;

    let geocoder =
        NominatimClient::new(&config.nominatim).context("Failed to create Nominatim client")?;
    info!("Geocoding via {}", geocoder.search_url());
    let geocoder: Box<dyn AddressGeocoder> = Box::new(geocoder);

    let state = Arc::new(AppState {
        service: GridLookupService::new(geocoder, GridResolver::new(index)),
    });

    let app = router(state);

    info!("Starting server on {}", config.server.listen);

    let listener = tokio::net::TcpListener::bind(&config.server.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/v1/tools", get(tools_handler))
        .route("/v1/resources", get(resources_handler))
        .route("/v1/geocode", get(geocode_handler))
        .route("/v1/coordinates", get(coordinates_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        cells: state.index().len(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    cells: usize,
}

/// Lookup operations available to callers
async fn tools_handler() -> Json<Vec<ToolDescription>> {
    Json(tool_descriptions())
}

/// Datasets available for reading
async fn resources_handler(State(state): State<Arc<AppState>>) -> Json<Vec<DatasetResource>> {
    Json(resource_descriptions(state.index()))
}

/// Address to grid id
async fn geocode_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GeocodeParams>,
) -> Json<LookupResponse> {
    let address = params.address.unwrap_or_default();
    let response = state.service.geocode_address(&address).await;
    info!("GET /v1/geocode address={:?} -> {:?}", address, response);
    Json(response)
}

/// Coordinates to grid id
async fn coordinates_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CoordinatesParams>,
) -> Json<LookupResponse> {
    let response = state
        .service
        .geocode_coordinates(params.longitude, params.latitude);
    info!(
        "GET /v1/coordinates lng={:?} lat={:?} -> {:?}",
        params.longitude, params.latitude, response
    );
    Json(response)
}

#[derive(Deserialize)]
struct GeocodeParams {
    /// Free-text address
    address: Option<String>,
}

#[derive(Deserialize)]
struct CoordinatesParams {
    longitude: Option<f64>,
    latitude: Option<f64>,
}
