//! Carbomap - climate-aware siting data for CO₂ capture machines
//!
//! This library provides shared types and modules for the serve and resolve
//! binaries: dataset and climate-zone loading, coordinate resolution, zone
//! statistics, color-map filtering, and map artifact rendering.

pub mod config;
pub mod dataset;
pub mod filter;
pub mod models;
pub mod render;
pub mod resolver;
pub mod stats;
pub mod zones;

pub use models::{ColorMap, GeoPoint, GridCode, LocationRecord, Metric, PerformanceTier};
