//! Climate-zone polygon loading from GeoJSON.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use geo::MultiPolygon;
use geojson::{FeatureCollection, GeoJson};
use tracing::{info, warn};

use crate::models::GridCode;

/// A single climate-zone polygon with its Köppen-Geiger grid code.
#[derive(Debug, Clone)]
pub struct ClimateZonePolygon {
    pub grid_code: GridCode,
    pub geometry: MultiPolygon<f64>,
}

impl ClimateZonePolygon {
    /// Get the bounding box of this zone
    pub fn bbox(&self) -> Option<(f64, f64, f64, f64)> {
        use geo::BoundingRect;
        self.geometry
            .bounding_rect()
            .map(|rect| (rect.min().x, rect.min().y, rect.max().x, rect.max().y))
    }
}

/// Load climate-zone polygons from a GeoJSON FeatureCollection file.
///
/// Each feature must carry a `GRIDCODE` property. Polygon and MultiPolygon
/// geometries are accepted; anything else is skipped with a warning.
pub fn load_zones(path: &Path) -> Result<Vec<ClimateZonePolygon>> {
    info!("Loading climate zones from {}", path.display());
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read zones file {}", path.display()))?;
    let zones = parse_zones(&raw)?;
    info!("Loaded {} climate zone polygons", zones.len());
    Ok(zones)
}

/// Parse climate-zone polygons from GeoJSON content.
pub fn parse_zones(raw: &str) -> Result<Vec<ClimateZonePolygon>> {
    let geojson: GeoJson = raw.parse().context("Failed to parse zones GeoJSON")?;
    let collection =
        FeatureCollection::try_from(geojson).context("Zones file is not a FeatureCollection")?;

    let mut zones = Vec::new();
    for feature in collection.features {
        let Some(grid_code) = grid_code_property(&feature) else {
            warn!("Skipping zone feature without a usable GRIDCODE property");
            continue;
        };
        let Some(geometry) = feature.geometry.as_ref().and_then(to_multipolygon) else {
            warn!("Skipping zone {} with unsupported geometry", grid_code);
            continue;
        };
        zones.push(ClimateZonePolygon {
            grid_code,
            geometry,
        });
    }
    Ok(zones)
}

fn grid_code_property(feature: &geojson::Feature) -> Option<GridCode> {
    let value = feature.property("GRIDCODE")?;
    value
        .as_i64()
        .map(|v| v as GridCode)
        .or_else(|| value.as_f64().map(|v| v as GridCode))
}

fn to_multipolygon(geometry: &geojson::Geometry) -> Option<MultiPolygon<f64>> {
    let geom: geo::Geometry<f64> = geometry.clone().try_into().ok()?;
    match geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}
