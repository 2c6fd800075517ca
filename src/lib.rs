//! Boundary Relations - administrative boundary hierarchy reconstruction
//!
//! Rebuilds a multi-level tree of named regions (country -> region -> district)
//! from flat, denormalized boundary features, aggregates each region's
//! bounding box, and answers ancestor/descendant/search queries over the tree.
//!
//! This library provides shared types and modules for the `boundaries` binary.

pub mod dataset;
pub mod diagnostics;
pub mod error;
pub mod models;
pub mod pip;
pub mod relations;

pub use error::{RelationError, Result};
pub use models::{AdminLevelSchema, BoundaryFeature, BoundaryRelation, Envelope, RelationTreeData};
pub use relations::{GapPolicy, RelationIndex, RelationTreeBuilder};
