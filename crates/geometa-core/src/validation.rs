use crate::models::{Coordinate, Geometry};

/// Validation result with details
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

/// Validation error with location details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub location: String,
    pub reason: String,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid() -> Self {
        Self { is_valid: true, errors: Vec::new() }
    }

    /// Add an error to the result
    pub fn add_error(&mut self, location: String, reason: String) {
        self.is_valid = false;
        self.errors.push(ValidationError { location, reason });
    }

    /// First error formatted as `location: reason`
    pub fn first_error(&self) -> Option<String> {
        self.errors.first().map(|e| format!("{}: {}", e.location, e.reason))
    }
}

/// Check the structural invariants of a geometry
///
/// Structural problems are missing positions, open rings and coordinates
/// that are not finite or fall outside the longitude/latitude bounds.
/// Topological problems such as self-intersections are not structural; the
/// repair engine in `geometa-geo` deals with those.
pub fn validate_structure(geometry: &Geometry) -> ValidationResult {
    let mut result = ValidationResult::valid();
    match geometry {
        Geometry::Point { coordinates } => validate_coordinate("Point", coordinates, &mut result),
        Geometry::MultiPoint { coordinates } => {
            for (i, coord) in coordinates.iter().enumerate() {
                validate_coordinate(&format!("MultiPoint[{}]", i), coord, &mut result);
            }
        }
        Geometry::LineString { coordinates } => {
            validate_linestring("LineString", coordinates, &mut result)
        }
        Geometry::MultiLineString { coordinates } => {
            for (i, line) in coordinates.iter().enumerate() {
                validate_linestring(&format!("MultiLineString[{}]", i), line, &mut result);
            }
        }
        Geometry::Polygon { coordinates } => validate_polygon("Polygon", coordinates, &mut result),
        Geometry::MultiPolygon { coordinates } => {
            for (i, polygon) in coordinates.iter().enumerate() {
                validate_polygon(&format!("MultiPolygon[{}]", i), polygon, &mut result);
            }
        }
    }
    result
}

fn validate_coordinate(location: &str, coord: &Coordinate, result: &mut ValidationResult) {
    if !coord.is_finite() {
        result.add_error(location.to_string(), "Coordinates must be finite".to_string());
    } else if !coord.in_bounds() {
        result.add_error(
            location.to_string(),
            format!(
                "Coordinate ({}, {}) is outside longitude [-180, 180] / latitude [-90, 90]",
                coord.longitude, coord.latitude
            ),
        );
    }
}

fn validate_linestring(location: &str, coords: &[Coordinate], result: &mut ValidationResult) {
    // LineString must have at least 2 points
    if coords.len() < 2 {
        result.add_error(
            location.to_string(),
            format!("LineString must have at least 2 points, found {}", coords.len()),
        );
        return;
    }

    for (i, coord) in coords.iter().enumerate() {
        validate_coordinate(&format!("{}[{}]", location, i), coord, result);
    }
}

fn validate_ring(location: &str, ring: &[Coordinate], result: &mut ValidationResult) {
    if ring.len() < 4 {
        result.add_error(
            location.to_string(),
            format!("Ring must have at least 4 points, found {}", ring.len()),
        );
        return;
    }

    // Check if closed
    if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
        if !first.same_position(last) {
            result.add_error(
                location.to_string(),
                "Ring must be closed (first point == last point)".to_string(),
            );
        }
    }

    for (i, coord) in ring.iter().enumerate() {
        validate_coordinate(&format!("{}[{}]", location, i), coord, result);
    }
}

fn validate_polygon(location: &str, rings: &[Vec<Coordinate>], result: &mut ValidationResult) {
    if rings.is_empty() {
        result.add_error(location.to_string(), "Polygon must have an exterior ring".to_string());
        return;
    }

    for (i, ring) in rings.iter().enumerate() {
        let role = if i == 0 { "exterior".to_string() } else { format!("interior[{}]", i - 1) };
        validate_ring(&format!("{} {}", location, role), ring, result);
    }
}

/// Count structurally invalid geometries in a collection
pub fn count_invalid(geometries: &[Geometry]) -> usize {
    geometries.iter().filter(|g| !validate_structure(g).is_valid).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_polygon() {
        let geom = Geometry::polygon(vec![vec![
            [0.0, 0.0],
            [1.0, 0.0],
            [1.0, 1.0],
            [0.0, 1.0],
            [0.0, 0.0],
        ]]);
        let result = validate_structure(&geom);
        assert!(result.is_valid, "{:?}", result.errors);
    }

    #[test]
    fn test_open_ring() {
        let geom = Geometry::polygon(vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]]);
        let result = validate_structure(&geom);
        assert!(!result.is_valid);
        assert_eq!(result.errors[0].location, "Polygon exterior");
        assert!(result.errors[0].reason.contains("closed"));
    }

    #[test]
    fn test_short_ring_in_multipolygon() {
        let geom = Geometry::multi_polygon(vec![
            vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
            vec![vec![[0.0, 0.0], [1.0, 0.0], [0.0, 0.0]]],
        ]);
        let result = validate_structure(&geom);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].location, "MultiPolygon[1] exterior");
    }

    #[test]
    fn test_linestring_too_short() {
        let geom = Geometry::line_string(vec![[0.0, 0.0]]);
        let result = validate_structure(&geom);
        assert!(!result.is_valid);
        assert!(result.first_error().unwrap().contains("at least 2 points"));
    }

    #[test]
    fn test_out_of_range_and_non_finite() {
        let geom = Geometry::MultiPoint {
            coordinates: vec![
                Coordinate::new(200.0, 0.0),
                Coordinate::new(f64::NAN, 0.0),
                Coordinate::new(10.0, 10.0),
            ],
        };
        let result = validate_structure(&geom);
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.errors[0].location, "MultiPoint[0]");
        assert_eq!(result.errors[1].reason, "Coordinates must be finite");
    }

    #[test]
    fn test_count_invalid() {
        let geometries = vec![
            Geometry::point(0.0, 0.0),
            Geometry::point(0.0, 95.0),
            Geometry::line_string(vec![[0.0, 0.0], [1.0, 1.0]]),
        ];
        assert_eq!(count_invalid(&geometries), 1);
    }
}
