//! Core data models for the climate map service.

pub mod record;
pub mod tier;
pub mod zone;

pub use record::{GeoPoint, LocationRecord, COORD_EPSILON_DEG};
pub use tier::{Metric, PerformanceTier};
pub use zone::{ColorMap, GridCode, ZoneStyle, NEUTRAL_COLOR};
