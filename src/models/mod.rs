//! Core data models for boundary relations.

pub mod envelope;
pub mod feature;
pub mod relation;
pub mod schema;

pub use envelope::{aggregate, Envelope};
pub use feature::BoundaryFeature;
pub use relation::{BoundaryRelation, RelationKey, RelationTreeData};
pub use schema::{AdminLevelSchema, MenuRole};
