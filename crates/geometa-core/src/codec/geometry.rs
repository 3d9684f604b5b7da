//! GeoJSON geometry codec
//!
//! Decoding dispatches on the `type` discriminator once, at the boundary, and
//! parses the nested `coordinates` arrays into the matching [`Geometry`]
//! variant. Encoding optionally rounds every number to a fixed count of
//! decimal places.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{GeometaError, Result};
use crate::models::{Coordinate, Geometry, GeometryType};
use crate::validation::validate_structure;

/// Above this many places an f64 carries no further decimal digits worth rounding
const MAX_SIGNIFICANT_PLACES: u32 = 15;

/// Geometry encoder/decoder with optional output precision
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GeometryCodec {
    max_decimal_places: Option<u32>,
    scale: Option<f64>,
}

impl GeometryCodec {
    /// Codec that writes numbers at full precision
    pub fn new() -> Self {
        Self::default()
    }

    /// Codec that rounds output numbers to `places` decimal digits
    pub fn with_precision(places: u32) -> Result<Self> {
        if places == 0 {
            return Err(GeometaError::InvalidPrecision { places });
        }
        let scale = (places <= MAX_SIGNIFICANT_PLACES).then(|| 10f64.powi(places as i32));
        Ok(Self { max_decimal_places: Some(places), scale })
    }

    /// Codec for an optional precision setting
    pub fn from_precision(places: Option<u32>) -> Result<Self> {
        match places {
            Some(places) => Self::with_precision(places),
            None => Ok(Self::new()),
        }
    }

    pub fn max_decimal_places(&self) -> Option<u32> {
        self.max_decimal_places
    }

    /// Decode a GeoJSON geometry object
    pub fn decode(&self, value: &Value) -> Result<Geometry> {
        let object = value
            .as_object()
            .ok_or_else(|| GeometaError::malformed("geometry must be a JSON object"))?;

        let type_name = object
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| GeometaError::malformed("missing 'type' field"))?;

        let geometry_type = GeometryType::from_name(type_name)
            .ok_or_else(|| GeometaError::UnknownGeometryType { type_name: type_name.to_string() })?;

        let coordinates = object.get("coordinates").ok_or_else(|| {
            GeometaError::malformed(format!("{} is missing 'coordinates'", geometry_type))
        })?;

        let geometry = match geometry_type {
            GeometryType::Point => Geometry::Point { coordinates: parse_position(coordinates)? },
            GeometryType::MultiPoint => {
                Geometry::MultiPoint { coordinates: parse_positions(coordinates)? }
            }
            GeometryType::LineString => {
                Geometry::LineString { coordinates: parse_positions(coordinates)? }
            }
            GeometryType::MultiLineString => Geometry::MultiLineString {
                coordinates: parse_array(coordinates, parse_positions)?,
            },
            GeometryType::Polygon => {
                Geometry::Polygon { coordinates: parse_array(coordinates, parse_positions)? }
            }
            GeometryType::MultiPolygon => Geometry::MultiPolygon {
                coordinates: parse_array(coordinates, |polygon| {
                    parse_array(polygon, parse_positions)
                })?,
            },
        };

        checked(geometry)
    }

    /// Decode a GeoJSON geometry from text
    pub fn decode_str(&self, content: &str) -> Result<Geometry> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| GeometaError::Serialization(format!("Failed to parse JSON: {}", e)))?;
        self.decode(&value)
    }

    /// Encode a geometry as a GeoJSON geometry object
    pub fn encode(&self, geometry: &Geometry) -> Value {
        let coordinates = match geometry {
            Geometry::Point { coordinates } => self.position(coordinates),
            Geometry::MultiPoint { coordinates } | Geometry::LineString { coordinates } => {
                self.positions(coordinates)
            }
            Geometry::MultiLineString { coordinates } | Geometry::Polygon { coordinates } => {
                Value::Array(coordinates.iter().map(|line| self.positions(line)).collect())
            }
            Geometry::MultiPolygon { coordinates } => Value::Array(
                coordinates
                    .iter()
                    .map(|polygon| {
                        Value::Array(polygon.iter().map(|ring| self.positions(ring)).collect())
                    })
                    .collect(),
            ),
        };

        json!({
            "type": geometry.geometry_type().as_str(),
            "coordinates": coordinates,
        })
    }

    /// Encode a geometry as compact GeoJSON text
    pub fn encode_string(&self, geometry: &Geometry) -> Result<String> {
        serde_json::to_string(&self.encode(geometry))
            .map_err(|e| GeometaError::Serialization(format!("Failed to write JSON: {}", e)))
    }

    fn positions(&self, coords: &[Coordinate]) -> Value {
        Value::Array(coords.iter().map(|c| self.position(c)).collect())
    }

    fn position(&self, coord: &Coordinate) -> Value {
        let mut position = vec![self.number(coord.longitude), self.number(coord.latitude)];
        if let Some(elevation) = coord.elevation {
            position.push(self.number(elevation));
        }
        Value::Array(position)
    }

    fn number(&self, value: f64) -> Value {
        serde_json::Number::from_f64(self.round(value)).map(Value::Number).unwrap_or(Value::Null)
    }

    fn round(&self, value: f64) -> f64 {
        match self.scale {
            // Adding zero turns a rounded -0.0 into 0.0
            Some(scale) => (value * scale).round() / scale + 0.0,
            None => value,
        }
    }
}

/// Decode a geometry object with the default codec
pub fn decode_geometry(value: &Value) -> Result<Geometry> {
    GeometryCodec::new().decode(value)
}

/// Encode a geometry, rounding to `max_decimal_places` when given
pub fn encode_geometry(geometry: &Geometry, max_decimal_places: Option<u32>) -> Result<Value> {
    Ok(GeometryCodec::from_precision(max_decimal_places)?.encode(geometry))
}

fn checked(geometry: Geometry) -> Result<Geometry> {
    let report = validate_structure(&geometry);
    match report.first_error() {
        Some(error) => Err(GeometaError::malformed(error)),
        None => Ok(geometry),
    }
}

fn parse_array<T>(value: &Value, parse: impl Fn(&Value) -> Result<T>) -> Result<Vec<T>> {
    value
        .as_array()
        .ok_or_else(|| GeometaError::malformed(format!("expected an array, found {}", value)))?
        .iter()
        .map(parse)
        .collect()
}

fn parse_positions(value: &Value) -> Result<Vec<Coordinate>> {
    parse_array(value, parse_position)
}

fn parse_position(value: &Value) -> Result<Coordinate> {
    let numbers = value
        .as_array()
        .ok_or_else(|| GeometaError::malformed(format!("expected a position, found {}", value)))?;

    let number = |i: usize| {
        numbers[i].as_f64().ok_or_else(|| {
            GeometaError::malformed(format!("position element {} is not a number", numbers[i]))
        })
    };

    match numbers.len() {
        0 | 1 => Err(GeometaError::malformed(format!(
            "position needs at least 2 numbers, found {}",
            numbers.len()
        ))),
        2 => Ok(Coordinate::new(number(0)?, number(1)?)),
        _ => Ok(Coordinate::with_elevation(number(0)?, number(1)?, number(2)?)),
    }
}

fn position_from_slice(numbers: &[f64]) -> Result<Coordinate> {
    match numbers {
        [lon, lat] => Ok(Coordinate::new(*lon, *lat)),
        [lon, lat, elevation, ..] => Ok(Coordinate::with_elevation(*lon, *lat, *elevation)),
        _ => Err(GeometaError::malformed(format!(
            "position needs at least 2 numbers, found {}",
            numbers.len()
        ))),
    }
}

fn positions_from_slices(positions: &[Vec<f64>]) -> Result<Vec<Coordinate>> {
    positions.iter().map(|p| position_from_slice(p)).collect()
}

fn position_vec(coord: &Coordinate) -> Vec<f64> {
    let mut position = vec![coord.longitude, coord.latitude];
    if let Some(elevation) = coord.elevation {
        position.push(elevation);
    }
    position
}

fn positions_vec(coords: &[Coordinate]) -> Vec<Vec<f64>> {
    coords.iter().map(position_vec).collect()
}

impl Serialize for Geometry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        GeometryCodec::new().encode(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Geometry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        decode_geometry(&value).map_err(de::Error::custom)
    }
}

impl From<&Geometry> for geojson::Geometry {
    fn from(geometry: &Geometry) -> Self {
        let value = match geometry {
            Geometry::Point { coordinates } => geojson::Value::Point(position_vec(coordinates)),
            Geometry::MultiPoint { coordinates } => {
                geojson::Value::MultiPoint(positions_vec(coordinates))
            }
            Geometry::LineString { coordinates } => {
                geojson::Value::LineString(positions_vec(coordinates))
            }
            Geometry::MultiLineString { coordinates } => geojson::Value::MultiLineString(
                coordinates.iter().map(|line| positions_vec(line)).collect(),
            ),
            Geometry::Polygon { coordinates } => geojson::Value::Polygon(
                coordinates.iter().map(|ring| positions_vec(ring)).collect(),
            ),
            Geometry::MultiPolygon { coordinates } => geojson::Value::MultiPolygon(
                coordinates
                    .iter()
                    .map(|polygon| polygon.iter().map(|ring| positions_vec(ring)).collect())
                    .collect(),
            ),
        };
        geojson::Geometry::new(value)
    }
}

impl TryFrom<&geojson::Geometry> for Geometry {
    type Error = GeometaError;

    fn try_from(geometry: &geojson::Geometry) -> Result<Self> {
        let geometry = match &geometry.value {
            geojson::Value::Point(position) => {
                Geometry::Point { coordinates: position_from_slice(position)? }
            }
            geojson::Value::MultiPoint(positions) => {
                Geometry::MultiPoint { coordinates: positions_from_slices(positions)? }
            }
            geojson::Value::LineString(positions) => {
                Geometry::LineString { coordinates: positions_from_slices(positions)? }
            }
            geojson::Value::MultiLineString(lines) => Geometry::MultiLineString {
                coordinates: lines
                    .iter()
                    .map(|line| positions_from_slices(line))
                    .collect::<Result<_>>()?,
            },
            geojson::Value::Polygon(rings) => Geometry::Polygon {
                coordinates: rings
                    .iter()
                    .map(|ring| positions_from_slices(ring))
                    .collect::<Result<_>>()?,
            },
            geojson::Value::MultiPolygon(polygons) => Geometry::MultiPolygon {
                coordinates: polygons
                    .iter()
                    .map(|polygon| {
                        polygon
                            .iter()
                            .map(|ring| positions_from_slices(ring))
                            .collect::<Result<Vec<_>>>()
                    })
                    .collect::<Result<_>>()?,
            },
            geojson::Value::GeometryCollection(_) => {
                return Err(GeometaError::UnknownGeometryType {
                    type_name: "GeometryCollection".to_string(),
                })
            }
        };
        checked(geometry)
    }
}
