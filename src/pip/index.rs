//! Spatial index for fast boundary feature lookups.

use geo::{Contains, Point};
use rstar::{RTree, RTreeObject, AABB};
use std::sync::Arc;
use tracing::info;

use crate::models::BoundaryFeature;

/// Wrapper for R-tree indexing of boundary features
#[derive(Clone)]
pub struct IndexedBoundary {
    pub feature: Arc<BoundaryFeature>,
    /// Position in the source dataset
    pub position: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedBoundary {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl IndexedBoundary {
    pub fn new(position: usize, feature: BoundaryFeature) -> Option<Self> {
        let bbox = feature.envelope()?;
        Some(Self {
            feature: Arc::new(feature),
            position,
            envelope: AABB::from_corners(
                [bbox.min_x(), bbox.min_y()],
                [bbox.max_x(), bbox.max_y()],
            ),
        })
    }
}

/// Spatial index for boundary features using R-tree
pub struct BoundarySpatialIndex {
    tree: RTree<IndexedBoundary>,
}

impl BoundarySpatialIndex {
    /// Build spatial index from boundary features. Features without geometry
    /// are left out.
    pub fn build(features: Vec<BoundaryFeature>) -> Self {
        info!("Building spatial index for {} features...", features.len());

        let indexed: Vec<IndexedBoundary> = features
            .into_iter()
            .enumerate()
            .filter_map(|(position, feature)| IndexedBoundary::new(position, feature))
            .collect();

        let tree = RTree::bulk_load(indexed);
        info!("Spatial index built with {} entries", tree.size());

        Self { tree }
    }

    /// Find all features containing a point, in dataset order
    pub fn lookup(&self, lon: f64, lat: f64) -> Vec<&IndexedBoundary> {
        let point = Point::new(lon, lat);
        let query_envelope = AABB::from_point([lon, lat]);

        // Use R-tree to get candidates via envelope intersection, then filter with exact containment
        let mut hits: Vec<&IndexedBoundary> = self
            .tree
            .locate_in_envelope_intersecting(&query_envelope)
            .filter(|ib| ib.feature.geometry.contains(&point))
            .collect();
        hits.sort_by_key(|ib| ib.position);
        hits
    }

    /// Get total number of indexed features
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
