//! Dashboard query server.
//!
//! Serves coordinate resolution, filtered map artifacts, legend data, and
//! tier metadata over HTTP for the capture-siting dashboard frontend.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
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
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use carbomap::config::Config;
use carbomap::dataset::Dataset;
use carbomap::filter::apply_view_filter;
use carbomap::models::{ColorMap, Metric, PerformanceTier};
use carbomap::render::{legend, render_map, LegendEntry, MapArtifact};
use carbomap::resolver::resolve_text;
use carbomap::stats::ZoneBands;
use carbomap::zones::{load_zones, ZoneService};

mod api;
use api::{view_filter, ApiError, ResolveResponse, ViewParams};

#[derive(Parser, Debug)]
#[command(name = "serve")]
#[command(about = "Climate map dashboard server")]
struct Args {
    /// Config file with the zones file and machine datasets
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Listen address (overrides the config)
    #[arg(short, long)]
    listen: Option<String>,
}

/// Application state shared across handlers.
///
/// Everything here is loaded once and read-only; the active view (tier or
/// range selection) is derived per request from the query parameters.
struct AppState {
    zones: ZoneService,
    machines: BTreeMap<String, MachineState>,
    default_machine: String,
}

/// One machine dataset and its per-zone aggregates.
struct MachineState {
    dataset: Dataset,
    bands: ZoneBands,
}

impl AppState {
    fn machine(&self, name: Option<&str>) -> Result<(&str, &MachineState), ApiError> {
        let name = name.unwrap_or(&self.default_machine);
        self.machines
            .get_key_value(name)
            .map(|(key, state)| (key.as_str(), state))
            .ok_or_else(|| ApiError::unknown_machine(name))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("Carbomap Dashboard Server");

    let config = Config::load_from_file(&args.config)?;
    let listen = args.listen.unwrap_or_else(|| config.global.listen.clone());

    if config.machines.is_empty() {
        anyhow::bail!("No machine datasets configured");
    }

    let polygons = load_zones(&config.global.zones_file)?;
    let zones = ZoneService::new(polygons, ColorMap::koppen_default());

    let mut machines = BTreeMap::new();
    for machine in &config.machines {
        let dataset = Dataset::load(&machine.name, &machine.dataset)?;
        let bands = ZoneBands::aggregate(&dataset, &zones);
        machines.insert(machine.name.clone(), MachineState { dataset, bands });
    }
    let default_machine = config.machines[0].name.clone();

    info!(
        "Serving {} climate zones and {} machine datasets (default '{}')",
        zones.len(),
        machines.len(),
        default_machine
    );

    let state = Arc::new(AppState {
        zones,
        machines,
        default_machine,
    });

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/v1/resolve", get(resolve_handler))
        .route("/v1/map", get(map_handler))
        .route("/v1/legend", get(legend_handler))
        .route("/v1/tiers", get(tiers_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Starting server on {}", listen);

    let listener = tokio::net::TcpListener::bind(&listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        zones: state.zones.len(),
        machines: state.machines.len(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    zones: usize,
    machines: usize,
}

#[derive(Deserialize)]
struct ResolveParams {
    /// Free-text "latitude, longitude" input
    text: String,
    /// Machine dataset to search (defaults to the first configured)
    machine: Option<String>,
}

/// Resolve a free-text coordinate query against the dataset and zones
async fn resolve_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResolveParams>,
) -> Result<Json<ResolveResponse>, ApiError> {
    let (name, machine) = state.machine(params.machine.as_deref())?;
    let resolution =
        resolve_text(&params.text, &machine.dataset, &state.zones).map_err(ApiError::query)?;
    Ok(Json(ResolveResponse::new(name, resolution)))
}

/// The colored map artifact for the active view
async fn map_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ViewParams>,
) -> Result<Json<MapArtifact>, ApiError> {
    let (name, machine) = state.machine(params.machine.as_deref())?;
    let filter = view_filter(&params)?;
    let colors = apply_view_filter(state.zones.classes(), filter, &machine.bands);
    Ok(Json(render_map(name, &state.zones, &colors, &machine.bands)))
}

/// Legend rows for the active view
async fn legend_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ViewParams>,
) -> Result<Json<Vec<LegendEntry>>, ApiError> {
    let (_, machine) = state.machine(params.machine.as_deref())?;
    let filter = view_filter(&params)?;
    let colors = apply_view_filter(state.zones.classes(), filter, &machine.bands);
    Ok(Json(legend(&colors)))
}

#[derive(Deserialize)]
struct TiersParams {
    metric: Option<Metric>,
}

#[derive(Serialize)]
struct TierEntry {
    tier: PerformanceTier,
    label: String,
    min: f64,
    max: f64,
}

/// Tier labels and numeric bands for dropdown population
async fn tiers_handler(Query(params): Query<TiersParams>) -> Json<Vec<TierEntry>> {
    let metric = params.metric.unwrap_or(Metric::Cost);
    let entries = PerformanceTier::all()
        .iter()
        .map(|tier| {
            let band = tier.band(metric);
            TierEntry {
                tier: *tier,
                label: tier.label(metric),
                min: *band.start(),
                max: *band.end(),
            }
        })
        .collect();
    Json(entries)
}
