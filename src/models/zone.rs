//! Köppen-Geiger classification table and zone coloring.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Integer identifier of a climate-zone classification (Köppen-Geiger).
pub type GridCode = i32;

/// Fallback color for grid codes missing from the classification table.
pub const UNKNOWN_COLOR: &str = "gray";

/// Fallback description for grid codes missing from the classification table.
pub const UNKNOWN_DESCRIPTION: &str = "Unknown";

/// Background color for zones suppressed by an active filter. Suppressed
/// zones still render, they just carry no classification coloring.
pub const NEUTRAL_COLOR: &str = "lightgray";

/// Rendering style and label for one climate-zone class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneStyle {
    pub color: String,
    pub description: String,
}

impl ZoneStyle {
    pub fn new(color: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            description: description.into(),
        }
    }

    /// Fallback style for grid codes outside the classification table.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_COLOR, UNKNOWN_DESCRIPTION)
    }
}

/// Köppen-Geiger classes keyed by the Kottek grid coding (11 = Af through
/// 62 = ET), as used by the 2026-2050 scenario shapefiles.
const KOPPEN_CLASSES: &[(GridCode, &str, &str)] = &[
    (11, "#960000", "Af - Equatorial rainforest, fully humid"),
    (12, "#FF0000", "Am - Equatorial monsoon"),
    (13, "#FF9999", "As - Equatorial savannah, dry summer"),
    (14, "#FFCC99", "Aw - Equatorial savannah, dry winter"),
    (21, "#FFFF64", "BWk - Cold desert"),
    (22, "#FFCC00", "BWh - Hot desert"),
    (26, "#CCAA54", "BSk - Cold steppe"),
    (27, "#FF9932", "BSh - Hot steppe"),
    (31, "#007800", "Cfa - Warm temperate, fully humid, hot summer"),
    (32, "#005000", "Cfb - Warm temperate, fully humid, warm summer"),
    (33, "#003200", "Cfc - Warm temperate, fully humid, cool summer"),
    (34, "#96FF00", "Csa - Warm temperate, dry summer, hot summer"),
    (35, "#00D700", "Csb - Warm temperate, dry summer, warm summer"),
    (36, "#00AA00", "Csc - Warm temperate, dry summer, cool summer"),
    (37, "#B46400", "Cwa - Warm temperate, dry winter, hot summer"),
    (38, "#966400", "Cwb - Warm temperate, dry winter, warm summer"),
    (39, "#5F3C00", "Cwc - Warm temperate, dry winter, cool summer"),
    (41, "#320032", "Dfa - Snow climate, fully humid, hot summer"),
    (42, "#640064", "Dfb - Snow climate, fully humid, warm summer"),
    (43, "#C800C8", "Dfc - Snow climate, fully humid, cool summer"),
    (44, "#C71585", "Dfd - Snow climate, fully humid, extremely continental"),
    (45, "#FF6EFF", "Dsa - Snow climate, dry summer, hot summer"),
    (46, "#FFB4FF", "Dsb - Snow climate, dry summer, warm summer"),
    (47, "#E6C8E6", "Dsc - Snow climate, dry summer, cool summer"),
    (48, "#C8B4C8", "Dsd - Snow climate, dry summer, extremely continental"),
    (49, "#C8C8FF", "Dwa - Snow climate, dry winter, hot summer"),
    (50, "#9696FF", "Dwb - Snow climate, dry winter, warm summer"),
    (51, "#6464FF", "Dwc - Snow climate, dry winter, cool summer"),
    (52, "#3232FF", "Dwd - Snow climate, dry winter, extremely continental"),
    (61, "#6496FF", "EF - Polar frost"),
    (62, "#64FFFF", "ET - Polar tundra"),
];

/// Mapping from grid code to zone style.
///
/// The base map built from the classification table is never mutated;
/// filtered variants are derived copies (see the `filter` module), so
/// restoring the unfiltered view is always exact.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorMap {
    entries: BTreeMap<GridCode, ZoneStyle>,
}

impl ColorMap {
    /// The full Köppen-Geiger classification coloring.
    pub fn koppen_default() -> Self {
        let entries = KOPPEN_CLASSES
            .iter()
            .map(|(code, color, description)| (*code, ZoneStyle::new(*color, *description)))
            .collect();
        Self { entries }
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (GridCode, ZoneStyle)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Style for a grid code, falling back to (gray, "Unknown") for codes
    /// outside the classification table.
    pub fn style(&self, code: GridCode) -> ZoneStyle {
        self.entries
            .get(&code)
            .cloned()
            .unwrap_or_else(ZoneStyle::unknown)
    }

    pub fn get(&self, code: GridCode) -> Option<&ZoneStyle> {
        self.entries.get(&code)
    }

    /// Iterate entries in grid-code order
    pub fn iter(&self) -> impl Iterator<Item = (GridCode, &ZoneStyle)> {
        self.entries.iter().map(|(code, style)| (*code, style))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
