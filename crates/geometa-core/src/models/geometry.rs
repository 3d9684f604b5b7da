//! Canonical geometry types used across all geometa crates.
//!
//! These types mirror the GeoJSON geometry objects one to one. Wire
//! conversion lives in [`crate::codec::geometry`]; topology repair lives in
//! the `geometa-geo` crate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A position: longitude, latitude and an optional elevation.
///
/// The elevation is only ever `Some` when it is finite, so a position that
/// was decoded from a two-element array encodes back to two elements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
    pub elevation: Option<f64>,
}

impl Coordinate {
    /// Create a 2-D coordinate
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self { longitude, latitude, elevation: None }
    }

    /// Create a coordinate with elevation; non-finite elevations are dropped
    pub fn with_elevation(longitude: f64, latitude: f64, elevation: f64) -> Self {
        Self {
            longitude,
            latitude,
            elevation: elevation.is_finite().then_some(elevation),
        }
    }

    /// Whether both horizontal components are finite
    pub fn is_finite(&self) -> bool {
        self.longitude.is_finite() && self.latitude.is_finite()
    }

    /// Whether the coordinate lies inside the WGS 84 longitude/latitude bounds
    pub fn in_bounds(&self) -> bool {
        (-180.0..=180.0).contains(&self.longitude) && (-90.0..=90.0).contains(&self.latitude)
    }

    /// Same horizontal position, ignoring elevation
    pub fn same_position(&self, other: &Coordinate) -> bool {
        self.longitude == other.longitude && self.latitude == other.latitude
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from(value: [f64; 2]) -> Self {
        Coordinate::new(value[0], value[1])
    }
}

impl From<[f64; 3]> for Coordinate {
    fn from(value: [f64; 3]) -> Self {
        Coordinate::with_elevation(value[0], value[1], value[2])
    }
}

/// Geometry validation mode applied after decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ValidityMode {
    /// Pass decoded geometries through untouched
    Skip,
    /// Run polygonal geometries through the repair engine
    #[default]
    Repair,
}

/// Geometry type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryType {
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
}

impl GeometryType {
    /// The GeoJSON `type` discriminator
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::MultiPoint => "MultiPoint",
            GeometryType::LineString => "LineString",
            GeometryType::MultiLineString => "MultiLineString",
            GeometryType::Polygon => "Polygon",
            GeometryType::MultiPolygon => "MultiPolygon",
        }
    }

    /// Match a `type` discriminator, ignoring ASCII case
    pub fn from_name(name: &str) -> Option<Self> {
        const ALL: [GeometryType; 6] = [
            GeometryType::Point,
            GeometryType::MultiPoint,
            GeometryType::LineString,
            GeometryType::MultiLineString,
            GeometryType::Polygon,
            GeometryType::MultiPolygon,
        ];
        ALL.into_iter().find(|t| t.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// GeoJSON-compatible geometry representation
///
/// Each variant holds the nested coordinate arrays of the matching GeoJSON
/// geometry. Polygon rings are closed: the first and last coordinate of a
/// ring are equal, and the first ring is the exterior.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point { coordinates: Coordinate },
    MultiPoint { coordinates: Vec<Coordinate> },
    LineString { coordinates: Vec<Coordinate> },
    MultiLineString { coordinates: Vec<Vec<Coordinate>> },
    Polygon { coordinates: Vec<Vec<Coordinate>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Coordinate>>> },
}

impl Geometry {
    /// Create a Point geometry
    pub fn point(longitude: f64, latitude: f64) -> Self {
        Geometry::Point { coordinates: Coordinate::new(longitude, latitude) }
    }

    /// Create a LineString geometry
    pub fn line_string(coords: Vec<[f64; 2]>) -> Self {
        Geometry::LineString { coordinates: coords.into_iter().map(Coordinate::from).collect() }
    }

    /// Create a Polygon geometry from 2-D rings
    pub fn polygon(rings: Vec<Vec<[f64; 2]>>) -> Self {
        Geometry::Polygon { coordinates: rings_from_arrays(rings) }
    }

    /// Create a MultiPolygon geometry from 2-D polygons
    pub fn multi_polygon(polygons: Vec<Vec<Vec<[f64; 2]>>>) -> Self {
        Geometry::MultiPolygon { coordinates: polygons.into_iter().map(rings_from_arrays).collect() }
    }

    /// Get the geometry type
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point { .. } => GeometryType::Point,
            Geometry::MultiPoint { .. } => GeometryType::MultiPoint,
            Geometry::LineString { .. } => GeometryType::LineString,
            Geometry::MultiLineString { .. } => GeometryType::MultiLineString,
            Geometry::Polygon { .. } => GeometryType::Polygon,
            Geometry::MultiPolygon { .. } => GeometryType::MultiPolygon,
        }
    }

    /// Visit every coordinate in document order
    pub fn coordinates(&self) -> Box<dyn Iterator<Item = &Coordinate> + '_> {
        match self {
            Geometry::Point { coordinates } => Box::new(std::iter::once(coordinates)),
            Geometry::MultiPoint { coordinates } | Geometry::LineString { coordinates } => {
                Box::new(coordinates.iter())
            }
            Geometry::MultiLineString { coordinates } | Geometry::Polygon { coordinates } => {
                Box::new(coordinates.iter().flatten())
            }
            Geometry::MultiPolygon { coordinates } => {
                Box::new(coordinates.iter().flatten().flatten())
            }
        }
    }

    /// Whether any coordinate carries an elevation
    pub fn has_elevation(&self) -> bool {
        self.coordinates().any(|c| c.elevation.is_some())
    }
}

fn rings_from_arrays(rings: Vec<Vec<[f64; 2]>>) -> Vec<Vec<Coordinate>> {
    rings
        .into_iter()
        .map(|ring| ring.into_iter().map(Coordinate::from).collect())
        .collect()
}
