//! Performance tiers and metrics for filtering the zone coloring.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Which measured quantity a filter applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Cost to capture, EUR per ton CO₂
    Cost,
    /// Energy requirement, kWh per ton
    Energy,
}

impl Metric {
    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Cost => "€/ton",
            Metric::Energy => "kWh/ton",
        }
    }

    /// Overview dropdown label as shown in the dashboard
    pub fn overview_label(&self) -> &'static str {
        match self {
            Metric::Cost => "€ / ton CO₂",
            Metric::Energy => "kWh / ton",
        }
    }

    /// Default slider bounds for the range filter
    pub fn slider_bounds(&self) -> RangeInclusive<f64> {
        match self {
            Metric::Cost => 270.0..=600.0,
            Metric::Energy => 500.0..=1300.0,
        }
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cost" => Ok(Metric::Cost),
            "energy" => Ok(Metric::Energy),
            other => Err(format!("Unknown metric '{}'", other)),
        }
    }
}

/// Machine performance band, best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceTier {
    Best,
    Good,
    Moderate,
    Worst,
}

impl PerformanceTier {
    /// All tiers in dropdown order
    pub fn all() -> &'static [PerformanceTier] {
        &[
            PerformanceTier::Best,
            PerformanceTier::Good,
            PerformanceTier::Moderate,
            PerformanceTier::Worst,
        ]
    }

    /// Numeric band for this tier under the given metric.
    pub fn band(&self, metric: Metric) -> RangeInclusive<f64> {
        match (metric, self) {
            (Metric::Cost, PerformanceTier::Best) => 277.0..=453.0,
            (Metric::Cost, PerformanceTier::Good) => 281.0..=496.0,
            (Metric::Cost, PerformanceTier::Moderate) => 327.0..=501.0,
            (Metric::Cost, PerformanceTier::Worst) => 357.0..=568.0,
            (Metric::Energy, PerformanceTier::Best) => 500.0..=700.0,
            (Metric::Energy, PerformanceTier::Good) => 700.0..=900.0,
            (Metric::Energy, PerformanceTier::Moderate) => 900.0..=1100.0,
            (Metric::Energy, PerformanceTier::Worst) => 1100.0..=1300.0,
        }
    }

    fn adjective(&self) -> &'static str {
        match self {
            PerformanceTier::Best => "Best",
            PerformanceTier::Good => "Good",
            PerformanceTier::Moderate => "Moderate",
            PerformanceTier::Worst => "Worst",
        }
    }

    /// Dropdown label as shown in the dashboard.
    pub fn label(&self, metric: Metric) -> String {
        let band = self.band(metric);
        match metric {
            Metric::Cost => format!(
                "{} CO₂ Capture: Cost €{}-€{}/ton",
                self.adjective(),
                band.start(),
                band.end()
            ),
            Metric::Energy => format!(
                "{} Energy Efficiency: {}-{} kWh/ton",
                self.adjective(),
                band.start(),
                band.end()
            ),
        }
    }
}

impl FromStr for PerformanceTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "best" => Ok(PerformanceTier::Best),
            "good" => Ok(PerformanceTier::Good),
            "moderate" => Ok(PerformanceTier::Moderate),
            "worst" => Ok(PerformanceTier::Worst),
            other => Err(format!("Unknown performance tier '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_labels_match_dashboard() {
        assert_eq!(
            PerformanceTier::Best.label(Metric::Cost),
            "Best CO₂ Capture: Cost €277-€453/ton"
        );
        assert_eq!(
            PerformanceTier::Worst.label(Metric::Cost),
            "Worst CO₂ Capture: Cost €357-€568/ton"
        );
    }

    #[test]
    fn test_energy_labels_match_dashboard() {
        assert_eq!(
            PerformanceTier::Moderate.label(Metric::Energy),
            "Moderate Energy Efficiency: 900-1100 kWh/ton"
        );
    }

    #[test]
    fn test_tier_parse_round_trip() {
        for tier in PerformanceTier::all() {
            let parsed: PerformanceTier = tier.adjective().parse().unwrap();
            assert_eq!(parsed, *tier);
        }
        assert!("fastest".parse::<PerformanceTier>().is_err());
    }
}
