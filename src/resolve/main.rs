//! One-shot coordinate resolution from the command line.
//!
//! Loads the configured dataset and climate zones, resolves a single
//! free-text query, and prints the details-panel view of the result.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use carbomap::config::Config;
use carbomap::dataset::Dataset;
use carbomap::models::{ColorMap, LocationRecord};
use carbomap::resolver::{resolve_text, MatchOutcome};
use carbomap::zones::{load_zones, ZoneService};

#[derive(Parser, Debug)]
#[command(name = "resolve")]
#[command(about = "Resolve a coordinate against the capture dataset and climate zones")]
struct Args {
    /// Config file with the zones file and machine datasets
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Machine dataset to search (defaults to the first configured)
    #[arg(short, long)]
    machine: Option<String>,

    /// Free-text query, e.g. "52.0, 4.0"
    query: String,
}

fn main() -> Result<ExitCode> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::WARN)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let config = Config::load_from_file(&args.config)?;

    let machine = match &args.machine {
        Some(name) => config
            .machines
            .iter()
            .find(|m| &m.name == name)
            .with_context(|| format!("Machine '{}' not found in config", name))?,
        None => config
            .machines
            .first()
            .context("No machine datasets configured")?,
    };

    let dataset = Dataset::load(&machine.name, &machine.dataset)?;
    let polygons = load_zones(&config.global.zones_file)?;
    let zones = ZoneService::new(polygons, ColorMap::koppen_default());

    let resolution = match resolve_text(&args.query, &dataset, &zones) {
        Ok(resolution) => resolution,
        Err(err) => {
            eprintln!("{}", err);
            return Ok(ExitCode::FAILURE);
        }
    };

    match &resolution.outcome {
        Some(MatchOutcome::Exact { record }) => {
            println!("Exact match in dataset '{}':", dataset.machine());
            print_record(record);
        }
        Some(MatchOutcome::Nearest {
            record,
            distance_km,
        }) => {
            println!("Coordinates not found in the dataset.");
            println!(
                "Closest coordinates at {} with distance {:.2} km:",
                record.coordinates, distance_km
            );
            print_record(record);
        }
        None => println!("The dataset '{}' is empty.", dataset.machine()),
    }

    match &resolution.zone {
        Some(zone) => println!("Climate zone: {} (GRIDCODE: {})", zone.description, zone.grid_code),
        None => println!("Coordinates are outside the defined climate zones."),
    }

    Ok(ExitCode::SUCCESS)
}

fn print_record(record: &LocationRecord) {
    println!("  ID:                  {}", record.id);
    println!("  Date:                {}", record.date);
    println!("  Lat, Long:           {}", record.coordinates);
    println!("  Costs to capture:    {}", record.cost_raw);
    println!("  Energy requirements: {}", record.energy_raw);
}
