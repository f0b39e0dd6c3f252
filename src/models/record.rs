//! Location dataset row types.

use serde::{Deserialize, Serialize};

/// Per-axis tolerance for treating two coordinates as the same physical
/// point, roughly 0.1 m at the equator. Dataset coordinates carry far fewer
/// decimals than this, so re-entering a stored coordinate always matches
/// even after a decimal formatting round-trip.
pub const COORD_EPSILON_DEG: f64 = 1e-6;

/// Geographic point (lat/lon, EPSG:4326)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether this point denotes the same physical location as `other`,
    /// within [`COORD_EPSILON_DEG`] on each axis.
    pub fn same_location(&self, other: &GeoPoint) -> bool {
        (self.lat - other.lat).abs() <= COORD_EPSILON_DEG
            && (self.lon - other.lon).abs() <= COORD_EPSILON_DEG
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.lat, self.lon)
    }
}

/// One row of a machine dataset.
///
/// Immutable once loaded. Distance-to-query is computed per search and
/// returned alongside the record, never stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    /// Source row identifier
    pub id: String,

    /// Measurement date, kept as the source formats it
    pub date: String,

    /// Site coordinate
    pub coordinates: GeoPoint,

    /// Cost to capture in EUR per ton, extracted from the source text
    pub cost_to_capture: Option<f64>,

    /// Energy requirement in kWh per ton, extracted from the source text
    pub energy_requirement: Option<f64>,

    /// Raw cost column value, for display
    pub cost_raw: String,

    /// Raw energy column value, for display
    pub energy_raw: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_location_within_epsilon() {
        let a = GeoPoint::new(52.0, 4.0);
        let b = GeoPoint::new(52.0000005, 3.9999995);
        assert!(a.same_location(&b));
    }

    #[test]
    fn test_same_location_rejects_nearby_point() {
        let a = GeoPoint::new(52.0, 4.0);
        let b = GeoPoint::new(52.01, 4.01);
        assert!(!a.same_location(&b));
    }
}
