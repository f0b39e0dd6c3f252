//! Pure derivations of filtered zone colorings.
//!
//! The base color map is never mutated; each filter returns a new map with
//! out-of-selection zones remapped to the neutral background color. Grid
//! codes outside the selection still render, keeping their description, so
//! re-applying the sentinel "no filter" restores the base coloring exactly.

use crate::models::{ColorMap, GridCode, Metric, PerformanceTier, ZoneStyle, NEUTRAL_COLOR};
use crate::stats::ZoneBands;

/// A view selection over the base coloring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewFilter {
    /// Sentinel: the full classification, untouched
    None,

    /// Zones whose aggregated band lies inside the tier's numeric band
    Tier {
        metric: Metric,
        tier: PerformanceTier,
    },

    /// Zones whose aggregated band intersects an arbitrary numeric range
    /// (the dashboard slider)
    Range { metric: Metric, min: f64, max: f64 },
}

/// Derive the active coloring for a view selection.
pub fn apply_view_filter(base: &ColorMap, filter: ViewFilter, bands: &ZoneBands) -> ColorMap {
    match filter {
        ViewFilter::None => base.clone(),
        ViewFilter::Tier { metric, tier } => {
            let tier_band = tier.band(metric);
            suppress_unless(base, |code| {
                bands
                    .band(code, metric)
                    .is_some_and(|band| band.lies_within(&tier_band))
            })
        }
        ViewFilter::Range { metric, min, max } => suppress_unless(base, |code| {
            bands
                .band(code, metric)
                .is_some_and(|band| band.intersects(&(min..=max)))
        }),
    }
}

/// Keep entries passing the predicate; remap the rest to the neutral color.
fn suppress_unless(base: &ColorMap, keep: impl Fn(GridCode) -> bool) -> ColorMap {
    ColorMap::from_entries(base.iter().map(|(code, style)| {
        let style = if keep(code) {
            style.clone()
        } else {
            ZoneStyle::new(NEUTRAL_COLOR, style.description.clone())
        };
        (code, style)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{ValueBand, ZoneStat};

    fn sample_bands() -> ZoneBands {
        ZoneBands::from_entries([
            (
                31,
                ZoneStat {
                    records: 2,
                    cost: Some(ValueBand { min: 300.0, max: 420.0 }),
                    energy: Some(ValueBand { min: 600.0, max: 690.0 }),
                },
            ),
            (
                22,
                ZoneStat {
                    records: 1,
                    cost: Some(ValueBand { min: 500.0, max: 560.0 }),
                    energy: Some(ValueBand { min: 1150.0, max: 1250.0 }),
                },
            ),
        ])
    }

    #[test]
    fn test_no_filter_is_identity() {
        let base = ColorMap::koppen_default();
        let same = apply_view_filter(&base, ViewFilter::None, &sample_bands());
        assert_eq!(same, base);
    }

    #[test]
    fn test_tier_filter_suppresses_out_of_band_zones() {
        let base = ColorMap::koppen_default();
        let filtered = apply_view_filter(
            &base,
            ViewFilter::Tier {
                metric: Metric::Cost,
                tier: PerformanceTier::Best,
            },
            &sample_bands(),
        );

        // Keyspace is preserved
        assert_eq!(filtered.len(), base.len());

        // 31 has a cost band inside 277..=453, 22 does not
        assert_eq!(filtered.style(31), base.style(31));
        let suppressed = filtered.style(22);
        assert_eq!(suppressed.color, NEUTRAL_COLOR);
        assert_eq!(suppressed.description, base.style(22).description);

        // Zones with no contained records are suppressed too
        assert_eq!(filtered.style(11).color, NEUTRAL_COLOR);
    }

    #[test]
    fn test_tier_filter_by_energy() {
        let base = ColorMap::koppen_default();
        let filtered = apply_view_filter(
            &base,
            ViewFilter::Tier {
                metric: Metric::Energy,
                tier: PerformanceTier::Worst,
            },
            &sample_bands(),
        );
        assert_eq!(filtered.style(22), base.style(22));
        assert_eq!(filtered.style(31).color, NEUTRAL_COLOR);
    }

    #[test]
    fn test_range_filter_keeps_intersecting_zones() {
        let base = ColorMap::koppen_default();
        let filtered = apply_view_filter(
            &base,
            ViewFilter::Range {
                metric: Metric::Cost,
                min: 400.0,
                max: 520.0,
            },
            &sample_bands(),
        );
        // Both bands overlap 400..=520
        assert_eq!(filtered.style(31), base.style(31));
        assert_eq!(filtered.style(22), base.style(22));

        let narrow = apply_view_filter(
            &base,
            ViewFilter::Range {
                metric: Metric::Cost,
                min: 430.0,
                max: 480.0,
            },
            &sample_bands(),
        );
        assert_eq!(narrow.style(31).color, NEUTRAL_COLOR);
        assert_eq!(narrow.style(22).color, NEUTRAL_COLOR);
    }

    #[test]
    fn test_filters_never_mutate_the_base() {
        let base = ColorMap::koppen_default();
        let bands = sample_bands();

        let best = apply_view_filter(
            &base,
            ViewFilter::Tier { metric: Metric::Cost, tier: PerformanceTier::Best },
            &bands,
        );
        let worst = apply_view_filter(
            &base,
            ViewFilter::Tier { metric: Metric::Cost, tier: PerformanceTier::Worst },
            &bands,
        );

        // Applying in the other order yields the same results
        assert_eq!(
            worst,
            apply_view_filter(
                &base,
                ViewFilter::Tier { metric: Metric::Cost, tier: PerformanceTier::Worst },
                &bands,
            )
        );
        assert_ne!(best, worst);
        assert_eq!(base, ColorMap::koppen_default());
    }

    #[test]
    fn test_unknown_grid_code_falls_back_after_filtering() {
        let base = ColorMap::koppen_default();
        let filtered = apply_view_filter(
            &base,
            ViewFilter::Tier { metric: Metric::Cost, tier: PerformanceTier::Best },
            &sample_bands(),
        );
        assert_eq!(filtered.style(999), ZoneStyle::unknown());
    }
}
