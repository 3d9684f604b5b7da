//! Conversions between the canonical geometry model and the `geo` crate.
//!
//! `geo` types are 2-D, so elevations are dropped on the way in and come
//! back as `None`.

use geo::{Coord, Geometry as GeoGeometry, LineString, MultiPolygon, Polygon};
use geometa_core::models::{Coordinate, Geometry};

/// Convert a model coordinate to a `geo` coordinate
pub fn to_geo_coord(coord: &Coordinate) -> Coord<f64> {
    Coord { x: coord.longitude, y: coord.latitude }
}

fn to_line_string(coords: &[Coordinate]) -> LineString<f64> {
    LineString::new(coords.iter().map(to_geo_coord).collect())
}

/// Convert model rings (exterior first) to a `geo` polygon
pub fn to_geo_polygon(rings: &[Vec<Coordinate>]) -> Polygon<f64> {
    match rings.split_first() {
        Some((exterior, interiors)) => Polygon::new(
            to_line_string(exterior),
            interiors.iter().map(|ring| to_line_string(ring)).collect(),
        ),
        None => Polygon::new(LineString::new(vec![]), vec![]),
    }
}

/// Convert a polygonal model geometry to a `geo` multi-polygon
///
/// Returns `None` for non-polygonal geometries.
pub fn to_geo_multi_polygon(geometry: &Geometry) -> Option<MultiPolygon<f64>> {
    match geometry {
        Geometry::Polygon { coordinates } => {
            Some(MultiPolygon::new(vec![to_geo_polygon(coordinates)]))
        }
        Geometry::MultiPolygon { coordinates } => {
            Some(coordinates.iter().map(|rings| to_geo_polygon(rings)).collect())
        }
        _ => None,
    }
}

/// Convert a canonical Geometry to a geo::Geometry
pub fn to_geo_geometry(geom: &Geometry) -> GeoGeometry<f64> {
    match geom {
        Geometry::Point { coordinates } => GeoGeometry::Point(to_geo_coord(coordinates).into()),
        Geometry::MultiPoint { coordinates } => GeoGeometry::MultiPoint(
            coordinates.iter().map(|c| geo::Point::from(to_geo_coord(c))).collect(),
        ),
        Geometry::LineString { coordinates } => {
            GeoGeometry::LineString(to_line_string(coordinates))
        }
        Geometry::MultiLineString { coordinates } => GeoGeometry::MultiLineString(
            geo::MultiLineString::new(
                coordinates.iter().map(|line| to_line_string(line)).collect(),
            ),
        ),
        Geometry::Polygon { coordinates } => GeoGeometry::Polygon(to_geo_polygon(coordinates)),
        Geometry::MultiPolygon { coordinates } => GeoGeometry::MultiPolygon(
            coordinates.iter().map(|rings| to_geo_polygon(rings)).collect(),
        ),
    }
}

fn from_coords<'a>(coords: impl Iterator<Item = &'a Coord<f64>>) -> Vec<Coordinate> {
    coords.map(|c| Coordinate::new(c.x, c.y)).collect()
}

/// Convert a `geo` polygon to model rings, exterior first
pub fn from_geo_polygon(polygon: &Polygon<f64>) -> Vec<Vec<Coordinate>> {
    let mut rings = Vec::with_capacity(polygon.interiors().len() + 1);
    rings.push(from_coords(polygon.exterior().coords()));
    for interior in polygon.interiors() {
        rings.push(from_coords(interior.coords()));
    }
    rings
}

/// Convert a `geo` multi-polygon to the model
///
/// A single polygon comes back as `Polygon`, anything else as
/// `MultiPolygon`.
pub fn from_geo_multi_polygon(multi: &MultiPolygon<f64>) -> Geometry {
    match multi.0.as_slice() {
        [polygon] => Geometry::Polygon { coordinates: from_geo_polygon(polygon) },
        polygons => Geometry::MultiPolygon {
            coordinates: polygons.iter().map(from_geo_polygon).collect(),
        },
    }
}

/// Convert a geo::Geometry to a canonical Geometry
///
/// Geometry collections have no model counterpart and return `None`.
pub fn from_geo_geometry(geom: &GeoGeometry<f64>) -> Option<Geometry> {
    let geometry = match geom {
        GeoGeometry::Point(p) => Geometry::Point { coordinates: Coordinate::new(p.x(), p.y()) },
        GeoGeometry::Line(l) => Geometry::LineString {
            coordinates: vec![
                Coordinate::new(l.start.x, l.start.y),
                Coordinate::new(l.end.x, l.end.y),
            ],
        },
        GeoGeometry::LineString(ls) => Geometry::LineString { coordinates: from_coords(ls.coords()) },
        GeoGeometry::Polygon(p) => Geometry::Polygon { coordinates: from_geo_polygon(p) },
        GeoGeometry::MultiPoint(mp) => Geometry::MultiPoint {
            coordinates: mp.iter().map(|p| Coordinate::new(p.x(), p.y())).collect(),
        },
        GeoGeometry::MultiLineString(mls) => Geometry::MultiLineString {
            coordinates: mls.iter().map(|ls| from_coords(ls.coords())).collect(),
        },
        GeoGeometry::MultiPolygon(mp) => Geometry::MultiPolygon {
            coordinates: mp.iter().map(from_geo_polygon).collect(),
        },
        GeoGeometry::Rect(r) => Geometry::Polygon { coordinates: from_geo_polygon(&r.to_polygon()) },
        GeoGeometry::Triangle(t) => {
            Geometry::Polygon { coordinates: from_geo_polygon(&t.to_polygon()) }
        }
        GeoGeometry::GeometryCollection(_) => return None,
    };
    Some(geometry)
}

/// Extension trait for Geometry with geo-crate operations
pub trait GeometryExt {
    /// Convert to geo::Geometry
    fn to_geo(&self) -> GeoGeometry<f64>;

    /// Get the centroid as coordinates
    fn centroid_coords(&self) -> Option<[f64; 2]>;

    /// Planar area in squared coordinate units; zero for non-polygons
    fn area(&self) -> f64;
}

impl GeometryExt for Geometry {
    fn to_geo(&self) -> GeoGeometry<f64> {
        to_geo_geometry(self)
    }

    fn centroid_coords(&self) -> Option<[f64; 2]> {
        use geo::algorithm::centroid::Centroid;
        self.to_geo().centroid().map(|p| [p.x(), p.y()])
    }

    fn area(&self) -> f64 {
        use geo::algorithm::area::Area;
        self.to_geo().unsigned_area()
    }
}
