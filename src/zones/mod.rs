//! Climate-zone containment lookup.
//!
//! Loads Köppen-Geiger zone polygons from GeoJSON and provides fast
//! point-in-polygon lookups using an R-tree spatial index.

mod boundary;
mod index;
mod service;

pub use boundary::{load_zones, parse_zones, ClimateZonePolygon};
pub use index::ZoneSpatialIndex;
pub use service::{ZoneInfo, ZoneService};
