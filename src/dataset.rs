//! GeoJSON feature collection loading.
//!
//! Only what the relation builder needs is read: polygon / multi-polygon
//! geometry and flat scalar properties. Anything else in the document is
//! ignored.

use geo_types::{Coord, LineString, MultiPolygon, Polygon};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

use crate::error::{RelationError, Result};
use crate::models::BoundaryFeature;

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum GeoJsonRoot {
    FeatureCollection { features: Vec<GeoJsonFeature> },
}

#[derive(Debug, Deserialize)]
struct GeoJsonFeature {
    #[serde(default)]
    geometry: Option<GeoJsonGeometry>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

/// GeoJSON positions may carry altitude; only x/y are used.
type Position = Vec<f64>;

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum GeoJsonGeometry {
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    /// Points, lines and collections have no place in a boundary dataset.
    #[serde(other)]
    Unsupported,
}

/// Load a GeoJSON `FeatureCollection` from disk.
pub fn load_feature_collection<P: AsRef<Path>>(path: P) -> Result<Vec<BoundaryFeature>> {
    let path = path.as_ref();
    info!("Loading boundary features from {}", path.display());

    let reader = BufReader::new(File::open(path)?);
    let root: GeoJsonRoot = serde_json::from_reader(reader)?;
    let features = convert(root)?;

    info!("Loaded {} features", features.len());
    Ok(features)
}

/// Parse a GeoJSON `FeatureCollection`.
///
/// Every input feature yields one [`BoundaryFeature`], so positions line up
/// with the source document. Null and unsupported geometries become empty
/// multi-polygons, which the relation builder skips.
pub fn parse_feature_collection(json: &str) -> Result<Vec<BoundaryFeature>> {
    let root: GeoJsonRoot = serde_json::from_str(json)?;
    convert(root)
}

fn convert(root: GeoJsonRoot) -> Result<Vec<BoundaryFeature>> {
    let GeoJsonRoot::FeatureCollection { features } = root;
    features.into_iter().map(convert_feature).collect()
}

fn convert_feature(feature: GeoJsonFeature) -> Result<BoundaryFeature> {
    let geometry = match feature.geometry {
        Some(GeoJsonGeometry::Polygon { coordinates }) => {
            MultiPolygon::new(vec![to_polygon(coordinates)?])
        }
        Some(GeoJsonGeometry::MultiPolygon { coordinates }) => MultiPolygon::new(
            coordinates
                .into_iter()
                .map(to_polygon)
                .collect::<Result<Vec<_>>>()?,
        ),
        Some(GeoJsonGeometry::Unsupported) | None => MultiPolygon::new(vec![]),
    };

    Ok(BoundaryFeature {
        geometry,
        properties: feature.properties.map(to_properties).unwrap_or_default(),
    })
}

fn to_polygon(rings: Vec<Vec<Position>>) -> Result<Polygon<f64>> {
    let mut rings = rings.into_iter().map(to_ring);
    let exterior = match rings.next() {
        Some(ring) => ring?,
        None => return Err(RelationError::InvalidGeometry("polygon without rings".into())),
    };
    let interiors = rings.collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn to_ring(positions: Vec<Position>) -> Result<LineString<f64>> {
    positions
        .into_iter()
        .map(|position| match position.as_slice() {
            [x, y, ..] => Ok(Coord { x: *x, y: *y }),
            _ => Err(RelationError::InvalidGeometry(format!(
                "position needs at least two ordinates, got {}",
                position.len()
            ))),
        })
        .collect::<Result<Vec<_>>>()
        .map(LineString::new)
}

/// Scalar properties as strings. Null, arrays and objects count as absent.
fn to_properties(properties: Map<String, Value>) -> HashMap<String, String> {
    properties
        .into_iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null | Value::Array(_) | Value::Object(_) => return None,
            };
            Some((key, value))
        })
        .collect()
}
