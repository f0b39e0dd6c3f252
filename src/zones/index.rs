//! Spatial index for fast climate-zone containment lookups.

use geo::{Contains, Point};
use rstar::{RTree, RTreeObject, AABB};
use std::sync::Arc;
use tracing::info;

use super::ClimateZonePolygon;

/// Wrapper for R-tree indexing of zone polygons
#[derive(Clone)]
struct IndexedZone {
    zone: Arc<ClimateZonePolygon>,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedZone {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl IndexedZone {
    fn new(zone: Arc<ClimateZonePolygon>) -> Option<Self> {
        let (min_x, min_y, max_x, max_y) = zone.bbox()?;
        Some(Self {
            zone,
            envelope: AABB::from_corners([min_x, min_y], [max_x, max_y]),
        })
    }
}

/// R-tree over zone bounding boxes; candidates from envelope intersection
/// are confirmed with an exact containment test.
pub struct ZoneSpatialIndex {
    tree: RTree<IndexedZone>,
}

impl ZoneSpatialIndex {
    /// Build the spatial index from zone polygons
    pub fn build(zones: &[Arc<ClimateZonePolygon>]) -> Self {
        info!("Building spatial index for {} climate zones...", zones.len());

        let indexed: Vec<IndexedZone> = zones
            .iter()
            .filter_map(|zone| IndexedZone::new(Arc::clone(zone)))
            .collect();
        let tree = RTree::bulk_load(indexed);

        info!("Spatial index built with {} entries", tree.size());
        Self { tree }
    }

    /// Find the first zone whose polygon contains the point.
    pub fn locate(&self, lon: f64, lat: f64) -> Option<Arc<ClimateZonePolygon>> {
        let point = Point::new(lon, lat);
        let query_envelope = AABB::from_point([lon, lat]);

        self.tree
            .locate_in_envelope_intersecting(&query_envelope)
            .find(|iz| iz.zone.geometry.contains(&point))
            .map(|iz| Arc::clone(&iz.zone))
    }

    /// Get total number of indexed zones
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
