//! Per-zone aggregation of the location dataset.
//!
//! Joins dataset points onto the climate-zone polygons by containment and
//! aggregates the cost and energy ranges per grid code. The resulting bands
//! feed the performance/range filters and the map tooltips.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use serde::Serialize;
use tracing::info;

use crate::dataset::Dataset;
use crate::models::{GridCode, Metric};
use crate::zones::ZoneService;

/// Observed min-max of a metric over the records contained in one zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueBand {
    pub min: f64,
    pub max: f64,
}

impl ValueBand {
    pub fn from_value(value: f64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    fn observe(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Whether the whole band lies inside `range`
    pub fn lies_within(&self, range: &RangeInclusive<f64>) -> bool {
        range.contains(&self.min) && range.contains(&self.max)
    }

    /// Whether the band overlaps `range` at all
    pub fn intersects(&self, range: &RangeInclusive<f64>) -> bool {
        self.min <= *range.end() && self.max >= *range.start()
    }

    /// Tooltip form, e.g. "277 - 453 €/ton"
    pub fn display(&self, metric: Metric) -> String {
        format!("{} - {} {}", self.min, self.max, metric.unit())
    }
}

/// Aggregates for one climate zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ZoneStat {
    /// Dataset records contained in the zone
    pub records: usize,
    pub cost: Option<ValueBand>,
    pub energy: Option<ValueBand>,
}

impl ZoneStat {
    pub fn band(&self, metric: Metric) -> Option<ValueBand> {
        match metric {
            Metric::Cost => self.cost,
            Metric::Energy => self.energy,
        }
    }
}

/// Per-grid-code aggregates over one machine dataset.
///
/// Zones containing no dataset record have no entry, and therefore no band;
/// any active filter suppresses them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneBands {
    by_code: BTreeMap<GridCode, ZoneStat>,
}

impl ZoneBands {
    /// Join the dataset onto the zones and aggregate per grid code.
    pub fn aggregate(dataset: &Dataset, zones: &ZoneService) -> Self {
        let mut by_code: BTreeMap<GridCode, ZoneStat> = BTreeMap::new();

        for record in dataset.records() {
            let point = record.coordinates;
            let Some(zone) = zones.lookup(point.lon, point.lat) else {
                continue;
            };

            let stat = by_code.entry(zone.grid_code).or_default();
            stat.records += 1;
            if let Some(cost) = record.cost_to_capture {
                observe(&mut stat.cost, cost);
            }
            if let Some(energy) = record.energy_requirement {
                observe(&mut stat.energy, energy);
            }
        }

        info!(
            "Aggregated '{}' bands for {} climate zones ({} records)",
            dataset.machine(),
            by_code.len(),
            dataset.len()
        );
        Self { by_code }
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (GridCode, ZoneStat)>) -> Self {
        Self {
            by_code: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, code: GridCode) -> Option<&ZoneStat> {
        self.by_code.get(&code)
    }

    pub fn band(&self, code: GridCode, metric: Metric) -> Option<ValueBand> {
        self.by_code.get(&code).and_then(|stat| stat.band(metric))
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

fn observe(band: &mut Option<ValueBand>, value: f64) {
    match band {
        Some(band) => band.observe(value),
        None => *band = Some(ValueBand::from_value(value)),
    }
}
