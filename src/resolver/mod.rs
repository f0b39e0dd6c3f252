//! Coordinate resolution against the location dataset and climate zones.
//!
//! Parses free-text "latitude, longitude" queries and resolves them to an
//! exact or nearest dataset record, plus an independent climate-zone
//! classification of the query point.

use geo::{Distance, Geodesic, Point};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::dataset::Dataset;
use crate::models::{GeoPoint, LocationRecord};
use crate::zones::{ZoneInfo, ZoneService};

/// Errors surfaced at the interaction boundary.
///
/// Display strings are the user-visible messages; callers render them and
/// keep serving. A point outside all zones is not an error (see
/// [`Resolution::zone`]).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QueryError {
    #[error("No coordinates provided. Please enter valid coordinates.")]
    EmptyInput,

    /// Missing separator, non-numeric tokens, or values outside the valid
    /// coordinate domain
    #[error("Invalid coordinates format. Ensure the format is 'latitude, longitude'.")]
    InvalidFormat,
}

/// Outcome of the dataset search for a query point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchOutcome {
    /// The query denotes a stored coordinate (tolerance-based equality)
    Exact { record: LocationRecord },

    /// No stored coordinate matched; the closest record by geodesic
    /// distance, ties broken by first-encountered order
    Nearest {
        record: LocationRecord,
        distance_km: f64,
    },
}

/// Full resolution result.
///
/// The dataset match and the zone classification are orthogonal: either
/// side can be absent without the other failing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub query: GeoPoint,

    /// `None` only when the dataset is empty
    pub outcome: Option<MatchOutcome>,

    /// `None` when the point lies outside all climate zones
    pub zone: Option<ZoneInfo>,
}

/// Parse a free-text "latitude, longitude" query.
pub fn parse_query(text: &str) -> Result<GeoPoint, QueryError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(QueryError::EmptyInput);
    }

    let (lat_str, lon_str) = text.split_once(',').ok_or(QueryError::InvalidFormat)?;
    let lat: f64 = lat_str.trim().parse().map_err(|_| QueryError::InvalidFormat)?;
    let lon: f64 = lon_str.trim().parse().map_err(|_| QueryError::InvalidFormat)?;

    if !lat.is_finite()
        || !lon.is_finite()
        || !(-90.0..=90.0).contains(&lat)
        || !(-180.0..=180.0).contains(&lon)
    {
        return Err(QueryError::InvalidFormat);
    }

    Ok(GeoPoint::new(lat, lon))
}

/// Geodesic distance between two points in kilometers.
pub fn geodesic_distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    Geodesic.distance(Point::new(a.lon, a.lat), Point::new(b.lon, b.lat)) / 1000.0
}

/// Find the dataset record for a query point: exact match first, nearest
/// by geodesic distance otherwise. `None` only for an empty dataset.
pub fn find_match(point: GeoPoint, dataset: &Dataset) -> Option<MatchOutcome> {
    if let Some(record) = dataset
        .records()
        .iter()
        .find(|r| r.coordinates.same_location(&point))
    {
        return Some(MatchOutcome::Exact {
            record: record.clone(),
        });
    }

    // Single pass over all records; strict less-than keeps the first
    // encountered record on ties.
    let mut best: Option<(&LocationRecord, f64)> = None;
    for record in dataset.records() {
        let distance_km = geodesic_distance_km(point, record.coordinates);
        match best {
            Some((_, best_km)) if distance_km >= best_km => {}
            _ => best = Some((record, distance_km)),
        }
    }

    best.map(|(record, distance_km)| MatchOutcome::Nearest {
        record: record.clone(),
        distance_km,
    })
}

/// Resolve a parsed query point against the dataset and climate zones.
///
/// Pure query over immutable structures; no side effects.
pub fn resolve(point: GeoPoint, dataset: &Dataset, zones: &ZoneService) -> Resolution {
    let outcome = find_match(point, dataset);
    let zone = zones.lookup(point.lon, point.lat);
    debug!(
        "Resolved ({}): match={}, zone={:?}",
        point,
        match &outcome {
            Some(MatchOutcome::Exact { .. }) => "exact",
            Some(MatchOutcome::Nearest { .. }) => "nearest",
            None => "none",
        },
        zone.as_ref().map(|z| z.grid_code)
    );
    Resolution {
        query: point,
        outcome,
        zone,
    }
}

/// Parse then resolve a free-text query.
pub fn resolve_text(
    text: &str,
    dataset: &Dataset,
    zones: &ZoneService,
) -> Result<Resolution, QueryError> {
    let point = parse_query(text)?;
    Ok(resolve(point, dataset, zones))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ColorMap;
    use crate::zones::ClimateZonePolygon;
    use geo::{LineString, MultiPolygon, Polygon};

    fn record(id: &str, lat: f64, lon: f64) -> LocationRecord {
        LocationRecord {
            id: id.to_string(),
            date: "2024-03-01".to_string(),
            coordinates: GeoPoint::new(lat, lon),
            cost_to_capture: Some(300.0),
            energy_requirement: Some(800.0),
            cost_raw: "300-400 €/ton".to_string(),
            energy_raw: "800-900 kWh/ton".to_string(),
        }
    }

    fn sample_dataset() -> Dataset {
        Dataset::new(
            "alpha1",
            vec![
                record("a1-001", 52.0, 4.0),
                record("a1-002", 48.8, 2.3),
                record("a1-003", -33.9, 151.2),
            ],
        )
    }

    fn sample_zones() -> ZoneService {
        let exterior = LineString::from(vec![
            (3.0, 51.0),
            (5.0, 51.0),
            (5.0, 53.0),
            (3.0, 53.0),
            (3.0, 51.0),
        ]);
        ZoneService::new(
            vec![ClimateZonePolygon {
                grid_code: 31,
                geometry: MultiPolygon(vec![Polygon::new(exterior, vec![])]),
            }],
            ColorMap::koppen_default(),
        )
    }

    #[test]
    fn test_parse_query_errors() {
        assert_eq!(parse_query(""), Err(QueryError::EmptyInput));
        assert_eq!(parse_query("   "), Err(QueryError::EmptyInput));
        assert_eq!(parse_query("abc"), Err(QueryError::InvalidFormat));
        assert_eq!(parse_query("52.0 4.0"), Err(QueryError::InvalidFormat));
        assert_eq!(parse_query("52.0, abc"), Err(QueryError::InvalidFormat));
        assert_eq!(parse_query("95.0, 4.0"), Err(QueryError::InvalidFormat));
        assert_eq!(parse_query("52.0, 181.0"), Err(QueryError::InvalidFormat));
        assert_eq!(parse_query("NaN, 4.0"), Err(QueryError::InvalidFormat));
    }

    #[test]
    fn test_parse_query_accepts_whitespace() {
        assert_eq!(
            parse_query("  52.0 ,  4.0 "),
            Ok(GeoPoint::new(52.0, 4.0))
        );
    }

    #[test]
    fn test_exact_match_is_reflexive() {
        let dataset = sample_dataset();
        for expected in dataset.records() {
            let outcome = find_match(expected.coordinates, &dataset).unwrap();
            match outcome {
                MatchOutcome::Exact { record } => assert_eq!(record.id, expected.id),
                other => panic!("expected exact match, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_nearest_match_is_minimal() {
        let dataset = sample_dataset();
        let query = GeoPoint::new(52.01, 4.01);

        let outcome = find_match(query, &dataset).unwrap();
        let MatchOutcome::Nearest {
            record,
            distance_km,
        } = outcome
        else {
            panic!("expected nearest match");
        };

        assert_eq!(record.id, "a1-001");
        assert!(distance_km > 0.0);
        assert!(distance_km < 2.0);
        for other in dataset.records() {
            assert!(distance_km <= geodesic_distance_km(query, other.coordinates));
        }
    }

    #[test]
    fn test_nearest_tie_keeps_first_record() {
        let dataset = Dataset::new(
            "alpha1",
            vec![record("first", 10.0, 10.0), record("second", 10.0, 10.0)],
        );
        let outcome = find_match(GeoPoint::new(11.0, 10.0), &dataset).unwrap();
        let MatchOutcome::Nearest { record, .. } = outcome else {
            panic!("expected nearest match");
        };
        assert_eq!(record.id, "first");
    }

    #[test]
    fn test_geodesic_distance_sanity() {
        // One degree of longitude at 52 N is roughly 68.5 km
        let km = geodesic_distance_km(GeoPoint::new(52.0, 4.0), GeoPoint::new(52.0, 5.0));
        assert!(km > 65.0 && km < 72.0, "got {} km", km);
    }

    #[test]
    fn test_resolution_is_orthogonal() {
        let dataset = sample_dataset();
        let zones = sample_zones();

        // Inside the zone, exact dataset hit
        let hit = resolve(GeoPoint::new(52.0, 4.0), &dataset, &zones);
        assert!(matches!(hit.outcome, Some(MatchOutcome::Exact { .. })));
        assert_eq!(hit.zone.unwrap().grid_code, 31);

        // Outside every zone, dataset hit still works
        let out = resolve(GeoPoint::new(48.8, 2.3), &dataset, &zones);
        assert!(matches!(out.outcome, Some(MatchOutcome::Exact { .. })));
        assert!(out.zone.is_none());

        // Empty dataset still classifies the zone
        let empty = Dataset::new("alpha1", vec![]);
        let zone_only = resolve(GeoPoint::new(52.0, 4.0), &empty, &zones);
        assert!(zone_only.outcome.is_none());
        assert_eq!(zone_only.zone.unwrap().grid_code, 31);
    }

    #[test]
    fn test_resolve_text_end_to_end() {
        let dataset = sample_dataset();
        let zones = sample_zones();

        let exact = resolve_text("52.0, 4.0", &dataset, &zones).unwrap();
        assert!(matches!(exact.outcome, Some(MatchOutcome::Exact { .. })));

        let near = resolve_text("52.01, 4.01", &dataset, &zones).unwrap();
        let Some(MatchOutcome::Nearest {
            record,
            distance_km,
        }) = near.outcome
        else {
            panic!("expected nearest match");
        };
        assert_eq!(record.coordinates, GeoPoint::new(52.0, 4.0));
        assert!(distance_km > 0.0);

        assert_eq!(
            resolve_text("", &dataset, &zones),
            Err(QueryError::EmptyInput)
        );
        assert_eq!(
            resolve_text("abc", &dataset, &zones),
            Err(QueryError::InvalidFormat)
        );
    }
}
