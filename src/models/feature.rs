//! Boundary features as supplied by the dataset.

use geo::MultiPolygon;
use std::collections::HashMap;

use super::{AdminLevelSchema, Envelope};

/// A boundary polygon tagged with its admin level names.
#[derive(Debug, Clone)]
pub struct BoundaryFeature {
    pub geometry: MultiPolygon<f64>,
    /// Admin level key -> name, e.g. `{"country": "Nordland", "region": "A"}`
    pub properties: HashMap<String, String>,
}

impl BoundaryFeature {
    pub fn new(geometry: MultiPolygon<f64>) -> Self {
        Self {
            geometry,
            properties: HashMap::new(),
        }
    }

    /// Builder-style property setter.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Value at a level of the schema.
    pub fn level_value(&self, schema: &AdminLevelSchema, level: usize) -> Option<&str> {
        schema.key(level).and_then(|key| self.property(key))
    }

    pub fn envelope(&self) -> Option<Envelope> {
        Envelope::of_geometry(&self.geometry)
    }

    /// Names present in schema order, skipping missing levels.
    pub fn level_names<'a>(&'a self, schema: &'a AdminLevelSchema) -> Vec<&'a str> {
        (0..schema.len())
            .filter_map(|level| self.level_value(schema, level))
            .collect()
    }

    /// Display label: the present level names joined with ", ".
    pub fn location_label(&self, schema: &AdminLevelSchema) -> String {
        self.level_names(schema).join(", ")
    }
}
