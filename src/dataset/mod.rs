//! Machine dataset loading.
//!
//! Reads the per-machine CSV (ID, Date, Lat, Long, CostsToCapture,
//! EnergyRequirements) and extracts the leading numeric token from the
//! free-text cost and energy columns.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use regex::Regex;
use tracing::{info, warn};

use crate::models::{GeoPoint, LocationRecord};

/// An immutable, fully-loaded machine dataset.
#[derive(Debug, Clone)]
pub struct Dataset {
    machine: String,
    records: Vec<LocationRecord>,
}

impl Dataset {
    pub fn new(machine: impl Into<String>, records: Vec<LocationRecord>) -> Self {
        Self {
            machine: machine.into(),
            records,
        }
    }

    /// Load a machine dataset from its CSV file.
    pub fn load(machine: &str, path: &Path) -> Result<Self> {
        info!("Loading dataset '{}' from {}", machine, path.display());
        let file = File::open(path)
            .with_context(|| format!("Failed to open dataset file {}", path.display()))?;
        let dataset = Self::from_reader(machine, file)?;
        info!(
            "Loaded {} records for machine '{}'",
            dataset.records.len(),
            machine
        );
        Ok(dataset)
    }

    /// Parse a machine dataset from CSV content.
    pub fn from_reader<R: Read>(machine: &str, reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .with_context(|| format!("Column '{}' not found", name))
        };
        let id_idx = column("ID")?;
        let date_idx = column("Date")?;
        let lat_idx = column("Lat")?;
        let lon_idx = column("Long")?;
        let cost_idx = column("CostsToCapture")?;
        let energy_idx = column("EnergyRequirements")?;

        let mut records = Vec::new();
        for (row, result) in csv_reader.records().enumerate() {
            let record = result?;

            let lat: f64 = match record[lat_idx].parse() {
                Ok(v) => v,
                Err(_) => {
                    warn!("Skipping row {}: unparsable Lat '{}'", row, &record[lat_idx]);
                    continue;
                }
            };
            let lon: f64 = match record[lon_idx].parse() {
                Ok(v) => v,
                Err(_) => {
                    warn!("Skipping row {}: unparsable Long '{}'", row, &record[lon_idx]);
                    continue;
                }
            };
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                warn!("Skipping row {}: coordinate ({}, {}) out of range", row, lat, lon);
                continue;
            }

            let cost_raw = record[cost_idx].to_string();
            let energy_raw = record[energy_idx].to_string();

            records.push(LocationRecord {
                id: record[id_idx].to_string(),
                date: record[date_idx].to_string(),
                coordinates: GeoPoint::new(lat, lon),
                cost_to_capture: extract_numeric(&cost_raw),
                energy_requirement: extract_numeric(&energy_raw),
                cost_raw,
                energy_raw,
            });
        }

        Ok(Self::new(machine, records))
    }

    pub fn machine(&self) -> &str {
        &self.machine
    }

    pub fn records(&self) -> &[LocationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Extract the leading numeric token from a free-text value, e.g.
/// "277-453 €/ton" -> 277.0. Returns None when no number is present.
pub fn extract_numeric(text: &str) -> Option<f64> {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    let pattern = NUMBER.get_or_init(|| Regex::new(r"\d+(\.\d+)?").expect("valid numeric pattern"));
    pattern.find(text).and_then(|m| m.as_str().parse().ok())
}
