//! Geographic input model: GeoJSON features and the dual-resolution dataset.
//!
//! Decoding topology files into features happens outside this crate; the host
//! hands over plain GeoJSON `FeatureCollection`s, one coarse and one fine.
//! Features are identified by their `name` property, which is expected to be
//! unique within each collection.

#[cfg(test)]
#[path = "geo_test.rs"]
mod geo_test;

use serde::{Deserialize, Serialize};

use crate::error::GlobeError;

/// A longitude/latitude pair in degrees.
///
/// Decodes from a GeoJSON position array; a trailing altitude is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 2]")]
pub struct Position {
    pub lon: f64,
    pub lat: f64,
}

impl Position {
    #[must_use]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl TryFrom<Vec<f64>> for Position {
    type Error = String;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        match values.as_slice() {
            [lon, lat, ..] => Ok(Self::new(*lon, *lat)),
            _ => Err(format!("position needs at least 2 numbers, got {}", values.len())),
        }
    }
}

impl From<Position> for [f64; 2] {
    fn from(p: Position) -> Self {
        [p.lon, p.lat]
    }
}

/// A closed ring of positions. The first position may be repeated at the end.
pub type Ring = Vec<Position>;

/// Polygon geometry: an exterior ring followed by any holes.
pub type PolygonRings = Vec<Ring>;

/// The geometry kinds a country boundary can have.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: PolygonRings },
    MultiPolygon { coordinates: Vec<PolygonRings> },
    /// Points, lines and collections carry no fillable area and are ignored.
    #[serde(other)]
    Unsupported,
}

impl Geometry {
    /// All polygons of this geometry, in source order.
    #[must_use]
    pub fn polygons(&self) -> Vec<&[Ring]> {
        match self {
            Self::Polygon { coordinates } => vec![coordinates.as_slice()],
            Self::MultiPolygon { coordinates } => coordinates.iter().map(Vec::as_slice).collect(),
            Self::Unsupported => Vec::new(),
        }
    }
}

/// Feature properties. Only the name is used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    #[serde(default)]
    pub name: String,
}

/// An immutable named polygon or multipolygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoFeature {
    #[serde(default)]
    pub properties: Option<FeatureProperties>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

impl GeoFeature {
    #[must_use]
    pub fn new(name: &str, geometry: Geometry) -> Self {
        Self {
            properties: Some(FeatureProperties { name: name.to_owned() }),
            geometry: Some(geometry),
        }
    }

    /// The feature's `name` property, or `""` when it has none.
    #[must_use]
    pub fn name(&self) -> &str {
        self.properties.as_ref().map_or("", |p| p.name.as_str())
    }
}

/// A GeoJSON `FeatureCollection`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<GeoFeature>,
}

impl FeatureCollection {
    #[must_use]
    pub fn new(features: Vec<GeoFeature>) -> Self {
        Self { features }
    }

    /// Decode a collection from GeoJSON text.
    ///
    /// # Errors
    ///
    /// Returns [`GlobeError::Dataset`] when the text is not a valid collection.
    pub fn from_json(json: &str) -> Result<Self, GlobeError> {
        serde_json::from_str(json).map_err(GlobeError::Dataset)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }
}

/// Country boundaries in a coarse and a fine resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldDataset {
    pub low: Option<FeatureCollection>,
    pub high: Option<FeatureCollection>,
}

impl WorldDataset {
    #[must_use]
    pub fn new(low: FeatureCollection, high: FeatureCollection) -> Self {
        Self { low: Some(low), high: Some(high) }
    }

    /// The coarse collection, falling back to the fine one.
    #[must_use]
    pub fn min_resolution(&self) -> Option<&FeatureCollection> {
        self.low.as_ref().or(self.high.as_ref())
    }

    /// The fine collection, falling back to the coarse one.
    #[must_use]
    pub fn max_resolution(&self) -> Option<&FeatureCollection> {
        self.high.as_ref().or(self.low.as_ref())
    }

    /// Both resolutions are present and non-empty.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        let non_empty = |c: &Option<FeatureCollection>| c.as_ref().is_some_and(|c| !c.is_empty());
        non_empty(&self.low) && non_empty(&self.high)
    }
}
