use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub global: GlobalConfig,
    pub machines: Vec<MachineConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GlobalConfig {
    /// Climate-zone polygons (GeoJSON FeatureCollection, EPSG:4326)
    pub zones_file: PathBuf,

    /// Default listen address for the serve binary
    #[serde(default = "default_listen")]
    pub listen: String,
}

/// One capture machine and its measurement dataset.
#[derive(Debug, Deserialize, Clone)]
pub struct MachineConfig {
    pub name: String,
    pub dataset: PathBuf,
}

fn default_listen() -> String {
    "0.0.0.0:3000".to_string()
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}
