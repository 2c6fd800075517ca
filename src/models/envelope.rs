//! Axis-aligned envelopes and their aggregation.

use geo::{BoundingRect, MultiPolygon, Rect};
use serde::{Deserialize, Serialize};

use crate::error::{RelationError, Result};

/// Bounding box envelope: `[minX, minY, maxX, maxY]` on the wire.
///
/// Always satisfies `min_x <= max_x` and `min_y <= max_y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 4]", into = "[f64; 4]")]
pub struct Envelope {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Envelope {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<Self> {
        let finite = [min_x, min_y, max_x, max_y].iter().all(|v| v.is_finite());
        if !finite || min_x > max_x || min_y > max_y {
            return Err(RelationError::InvalidEnvelope);
        }
        Ok(Self {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    /// Envelope over every ring of a (multi-)polygon.
    ///
    /// `None` when the geometry has no coordinates.
    pub fn of_geometry(geometry: &MultiPolygon<f64>) -> Option<Self> {
        geometry.bounding_rect().map(Self::from)
    }

    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    /// Smallest envelope covering both.
    pub fn union(&self, other: &Envelope) -> Envelope {
        Envelope {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Componentwise containment (edges inclusive).
    pub fn contains(&self, other: &Envelope) -> bool {
        self.min_x <= other.min_x
            && self.min_y <= other.min_y
            && self.max_x >= other.max_x
            && self.max_y >= other.max_y
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }
}

impl From<Rect<f64>> for Envelope {
    fn from(rect: Rect<f64>) -> Self {
        // Rect normalizes its corners, so min <= max holds.
        Self {
            min_x: rect.min().x,
            min_y: rect.min().y,
            max_x: rect.max().x,
            max_y: rect.max().y,
        }
    }
}

impl TryFrom<[f64; 4]> for Envelope {
    type Error = RelationError;

    fn try_from(value: [f64; 4]) -> Result<Self> {
        Envelope::new(value[0], value[1], value[2], value[3])
    }
}

impl From<Envelope> for [f64; 4] {
    fn from(envelope: Envelope) -> Self {
        envelope.to_array()
    }
}

/// Union envelope of a non-empty set of boxes.
///
/// Only the coordinate envelope matters here, so the result is the
/// componentwise min of the minima and max of the maxima; no polygon union is
/// involved and the fold cannot fail part-way.
pub fn aggregate<'a, I>(boxes: I) -> Result<Envelope>
where
    I: IntoIterator<Item = &'a Envelope>,
{
    let mut boxes = boxes.into_iter();
    let first = *boxes.next().ok_or(RelationError::EmptyInput)?;
    Ok(boxes.fold(first, |acc, b| acc.union(b)))
}
