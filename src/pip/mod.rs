//! Point-in-Polygon (PIP) location lookup.
//!
//! Indexes boundary features in an R-tree and reports the admin names of the
//! feature containing a point.

mod index;
mod service;

pub use index::{BoundarySpatialIndex, IndexedBoundary};
pub use service::{LocateService, Location};
