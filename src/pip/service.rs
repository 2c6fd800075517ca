//! Locate service: which named regions contain a point.

use serde::Serialize;
use tracing::debug;

use super::BoundarySpatialIndex;
use crate::models::AdminLevelSchema;

/// Admin names at a point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    /// Position of the matched feature in the dataset
    pub feature: usize,
    /// `(level key, name)` for every level the feature carries, root first
    pub names: Vec<(String, String)>,
    /// Present names joined with ", "
    pub label: String,
}

/// Point-in-Polygon lookup service
pub struct LocateService {
    index: BoundarySpatialIndex,
    schema: AdminLevelSchema,
}

impl LocateService {
    pub fn new(index: BoundarySpatialIndex, schema: AdminLevelSchema) -> Self {
        Self { index, schema }
    }

    /// Names of the first feature (dataset order) containing the point
    pub fn locate(&self, lon: f64, lat: f64) -> Option<Location> {
        let hits = self.index.lookup(lon, lat);
        debug!("Locate at ({}, {}): {} candidate features", lon, lat, hits.len());

        let hit = hits.first()?;
        let feature = &hit.feature;
        let names = self
            .schema
            .keys()
            .iter()
            .filter_map(|key| {
                feature
                    .property(key)
                    .map(|value| (key.clone(), value.to_string()))
            })
            .collect();

        Some(Location {
            feature: hit.position,
            names,
            label: feature.location_label(&self.schema),
        })
    }

    /// Get the spatial index (for stats/debugging)
    pub fn index(&self) -> &BoundarySpatialIndex {
        &self.index
    }
}
