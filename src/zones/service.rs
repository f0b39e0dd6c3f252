//! Zone lookup service for classifying a point.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::{ClimateZonePolygon, ZoneSpatialIndex};
use crate::models::{ColorMap, GridCode};

/// Climate classification for a resolved point.
///
/// "No containing zone" is a representable outcome (`None` from
/// [`ZoneService::lookup`]), not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneInfo {
    pub grid_code: GridCode,
    pub description: String,
}

/// Climate-zone lookup service.
///
/// Holds the loaded polygons in source order (the renderer iterates them),
/// the spatial index over them, and the base classification table.
pub struct ZoneService {
    zones: Vec<Arc<ClimateZonePolygon>>,
    index: ZoneSpatialIndex,
    classes: ColorMap,
}

impl ZoneService {
    pub fn new(polygons: Vec<ClimateZonePolygon>, classes: ColorMap) -> Self {
        let zones: Vec<Arc<ClimateZonePolygon>> = polygons.into_iter().map(Arc::new).collect();
        let index = ZoneSpatialIndex::build(&zones);
        Self {
            zones,
            index,
            classes,
        }
    }

    /// Classify a point by containment, first containing zone wins.
    pub fn lookup(&self, lon: f64, lat: f64) -> Option<ZoneInfo> {
        let zone = self.index.locate(lon, lat)?;
        debug!(
            "Zone lookup at ({}, {}): grid code {}",
            lon, lat, zone.grid_code
        );
        Some(ZoneInfo {
            grid_code: zone.grid_code,
            description: self.classes.style(zone.grid_code).description,
        })
    }

    /// Loaded zone polygons in source order
    pub fn zones(&self) -> &[Arc<ClimateZonePolygon>] {
        &self.zones
    }

    /// The base (unfiltered) classification table
    pub fn classes(&self) -> &ColorMap {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
