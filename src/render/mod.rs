//! Colored map artifact generation.
//!
//! Rebuilds the full GeoJSON FeatureCollection for the climate zones on
//! every request; there is no incremental update of a previous artifact.

use chrono::{DateTime, Utc};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject};
use serde::Serialize;
use serde_json::json;

use crate::models::{ColorMap, GridCode, Metric};
use crate::stats::ZoneBands;
use crate::zones::{ClimateZonePolygon, ZoneService};

/// Zone polygon styling (folium-equivalent defaults).
const STROKE_COLOR: &str = "black";
const STROKE_WEIGHT: f64 = 0.5;
const FILL_OPACITY: f64 = 0.6;

/// Tooltip value for zones with no aggregated band.
const NO_DATA: &str = "No data";

/// The rendered map: one feature per zone polygon, styled by the active
/// color map, with tooltip properties.
#[derive(Debug, Clone, Serialize)]
pub struct MapArtifact {
    pub generated_at: DateTime<Utc>,
    pub machine: String,
    pub zones: usize,
    pub collection: FeatureCollection,
}

/// One legend row for the active coloring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub grid_code: GridCode,
    pub color: String,
    pub description: String,
}

/// Render the full map artifact for the active coloring.
pub fn render_map(
    machine: &str,
    zones: &ZoneService,
    colors: &ColorMap,
    bands: &ZoneBands,
) -> MapArtifact {
    let features = zones
        .zones()
        .iter()
        .map(|zone| zone_feature(zone, colors, bands))
        .collect();

    MapArtifact {
        generated_at: Utc::now(),
        machine: machine.to_string(),
        zones: zones.len(),
        collection: FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        },
    }
}

fn zone_feature(zone: &ClimateZonePolygon, colors: &ColorMap, bands: &ZoneBands) -> Feature {
    let style = colors.style(zone.grid_code);

    let mut properties = JsonObject::new();
    properties.insert("GRIDCODE".to_string(), json!(zone.grid_code));
    properties.insert("description".to_string(), json!(style.description));
    properties.insert(
        "costs_range".to_string(),
        json!(band_display(bands, zone.grid_code, Metric::Cost)),
    );
    properties.insert(
        "energy_range".to_string(),
        json!(band_display(bands, zone.grid_code, Metric::Energy)),
    );
    properties.insert("fill".to_string(), json!(style.color));
    properties.insert("fill-opacity".to_string(), json!(FILL_OPACITY));
    properties.insert("stroke".to_string(), json!(STROKE_COLOR));
    properties.insert("stroke-width".to_string(), json!(STROKE_WEIGHT));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geojson::Value::from(&zone.geometry))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn band_display(bands: &ZoneBands, code: GridCode, metric: Metric) -> String {
    bands
        .band(code, metric)
        .map(|band| band.display(metric))
        .unwrap_or_else(|| NO_DATA.to_string())
}

/// Legend rows for the active coloring, in grid-code order.
pub fn legend(colors: &ColorMap) -> Vec<LegendEntry> {
    colors
        .iter()
        .map(|(grid_code, style)| LegendEntry {
            grid_code,
            color: style.color.clone(),
            description: style.description.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{apply_view_filter, ViewFilter};
    use crate::models::{PerformanceTier, NEUTRAL_COLOR};
    use crate::stats::{ValueBand, ZoneStat};
    use geo::{LineString, MultiPolygon, Polygon};

    fn square_zone(grid_code: i32, min: (f64, f64), max: (f64, f64)) -> ClimateZonePolygon {
        let exterior = LineString::from(vec![
            (min.0, min.1),
            (max.0, min.1),
            (max.0, max.1),
            (min.0, max.1),
            (min.0, min.1),
        ]);
        ClimateZonePolygon {
            grid_code,
            geometry: MultiPolygon(vec![Polygon::new(exterior, vec![])]),
        }
    }

    fn sample_service() -> ZoneService {
        ZoneService::new(
            vec![
                square_zone(31, (0.0, 0.0), (10.0, 10.0)),
                square_zone(22, (20.0, 20.0), (30.0, 30.0)),
            ],
            ColorMap::koppen_default(),
        )
    }

    fn sample_bands() -> ZoneBands {
        ZoneBands::from_entries([(
            31,
            ZoneStat {
                records: 2,
                cost: Some(ValueBand { min: 300.0, max: 420.0 }),
                energy: Some(ValueBand { min: 600.0, max: 690.0 }),
            },
        )])
    }

    fn property<'a>(feature: &'a Feature, key: &str) -> &'a serde_json::Value {
        feature.properties.as_ref().unwrap().get(key).unwrap()
    }

    #[test]
    fn test_render_full_map() {
        let zones = sample_service();
        let artifact = render_map("alpha1", &zones, zones.classes(), &sample_bands());

        assert_eq!(artifact.machine, "alpha1");
        assert_eq!(artifact.zones, 2);
        assert_eq!(artifact.collection.features.len(), 2);

        let cfa = &artifact.collection.features[0];
        assert_eq!(property(cfa, "GRIDCODE"), &json!(31));
        assert_eq!(property(cfa, "costs_range"), &json!("300 - 420 €/ton"));
        assert_eq!(property(cfa, "fill"), &json!("#007800"));

        let bwh = &artifact.collection.features[1];
        assert_eq!(property(bwh, "costs_range"), &json!(NO_DATA));
    }

    #[test]
    fn test_render_filtered_map_suppresses_colors() {
        let zones = sample_service();
        let bands = sample_bands();
        let colors = apply_view_filter(
            zones.classes(),
            ViewFilter::Tier {
                metric: crate::models::Metric::Cost,
                tier: PerformanceTier::Best,
            },
            &bands,
        );
        let artifact = render_map("alpha1", &zones, &colors, &bands);

        assert_eq!(property(&artifact.collection.features[0], "fill"), &json!("#007800"));
        assert_eq!(
            property(&artifact.collection.features[1], "fill"),
            &json!(NEUTRAL_COLOR)
        );
        // Tooltip text survives suppression
        assert_eq!(
            property(&artifact.collection.features[1], "description"),
            &json!("BWh - Hot desert")
        );
    }

    #[test]
    fn test_legend_matches_color_map() {
        let colors = ColorMap::koppen_default();
        let rows = legend(&colors);
        assert_eq!(rows.len(), colors.len());
        assert_eq!(rows[0].grid_code, 11);
        assert_eq!(rows[0].color, "#960000");
    }
}
