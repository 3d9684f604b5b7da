//! Geometry repair engine.
//!
//! Polygons whose rings cross themselves, or whose holes spill outside the
//! shell, are rebuilt into valid polygons. Everything else passes through.

use crate::convert::{from_geo_multi_polygon, to_geo_multi_polygon};
use crate::error::RepairError;
use crate::ops::{GeoOps, GeometryOps};
use geo::algorithm::orient::{Direction, Orient};
use geo::{LineString, MultiPolygon, Polygon};
use geometa_core::models::{Coordinate, Geometry, ValidityMode};

/// Repairs topologically invalid polygons
#[derive(Debug, Clone, Default)]
pub struct GeometryRepairer<O: GeometryOps = GeoOps> {
    ops: O,
}

impl GeometryRepairer<GeoOps> {
    /// Repairer backed by the `geo` crate
    pub fn new() -> Self {
        Self { ops: GeoOps }
    }
}

impl<O: GeometryOps> GeometryRepairer<O> {
    /// Repairer backed by custom geometry operations
    pub fn with_ops(ops: O) -> Self {
        Self { ops }
    }

    /// Validate and repair a geometry
    ///
    /// Returns `None` when the geometry cannot be repaired; the reason is
    /// logged at debug level.
    pub fn validate(&self, geometry: &Geometry) -> Option<Geometry> {
        match self.try_validate(geometry) {
            Ok(repaired) => Some(repaired),
            Err(e) => {
                tracing::debug!(
                    geometry_type = %geometry.geometry_type(),
                    "Unrepairable geometry: {}",
                    e
                );
                None
            }
        }
    }

    /// Validate and repair a geometry, reporting why repair failed
    pub fn try_validate(&self, geometry: &Geometry) -> Result<Geometry, RepairError> {
        let Some(polygons) = to_geo_multi_polygon(geometry) else {
            return Ok(geometry.clone());
        };

        if self.ops.is_valid(&polygons) {
            return Ok(orient_canonical(geometry));
        }

        tracing::debug!(
            geometry_type = %geometry.geometry_type(),
            polygons = polygons.0.len(),
            "Repairing invalid geometry"
        );
        let repaired = self.repair(&polygons)?;
        Ok(from_geo_multi_polygon(&repaired))
    }

    /// Validate every geometry of a batch
    ///
    /// A geometry that cannot be repaired becomes `None`; the rest of the
    /// batch is still processed.
    pub fn validate_all(&self, geometries: &[Geometry]) -> Vec<Option<Geometry>> {
        geometries.iter().map(|geometry| self.validate(geometry)).collect()
    }

    /// Apply a validity mode: `Skip` passes the geometry through untouched
    pub fn apply(&self, mode: ValidityMode, geometry: &Geometry) -> Option<Geometry> {
        match mode {
            ValidityMode::Skip => Some(geometry.clone()),
            ValidityMode::Repair => self.validate(geometry),
        }
    }

    fn repair(&self, polygons: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>, RepairError> {
        let mut merged = MultiPolygon::new(vec![]);
        for polygon in polygons {
            let shape = self.repair_polygon(polygon)?;
            merged = self.ops.union(&merged, &shape)?;
        }

        if merged.0.is_empty() {
            return Err(RepairError::Collapsed);
        }
        Ok(merged.orient(Direction::Default))
    }

    fn repair_polygon(&self, polygon: &Polygon<f64>) -> Result<MultiPolygon<f64>, RepairError> {
        let mut shape = self.repair_ring(polygon.exterior())?;

        for interior in polygon.interiors() {
            if shape.0.is_empty() {
                break;
            }
            let hole = self.repair_ring(interior)?;
            let overlap = self.ops.intersection(&shape, &hole)?;
            if !overlap.0.is_empty() {
                shape = self.ops.sym_difference(&shape, &overlap)?;
            }
        }
        Ok(shape)
    }

    /// Node a ring against itself and merge the faces it encloses
    fn repair_ring(&self, ring: &LineString<f64>) -> Result<MultiPolygon<f64>, RepairError> {
        let faces = self.ops.polygonize_ring(ring)?;
        let mut merged = MultiPolygon::new(vec![]);
        for face in faces {
            merged = self.ops.union(&merged, &MultiPolygon::new(vec![face]))?;
        }
        Ok(merged)
    }
}

/// Orient a valid geometry on the model so elevations are kept
///
/// Exteriors become counter-clockwise and holes clockwise.
fn orient_canonical(geometry: &Geometry) -> Geometry {
    match geometry {
        Geometry::Polygon { coordinates } => {
            Geometry::Polygon { coordinates: orient_rings(coordinates) }
        }
        Geometry::MultiPolygon { coordinates } => Geometry::MultiPolygon {
            coordinates: coordinates.iter().map(|rings| orient_rings(rings)).collect(),
        },
        other => other.clone(),
    }
}

fn orient_rings(rings: &[Vec<Coordinate>]) -> Vec<Vec<Coordinate>> {
    rings
        .iter()
        .enumerate()
        .map(|(i, ring)| {
            let area = signed_area(ring);
            let wrong_way = if i == 0 { area < 0.0 } else { area > 0.0 };
            if wrong_way {
                ring.iter().rev().copied().collect()
            } else {
                ring.clone()
            }
        })
        .collect()
}

fn signed_area(ring: &[Coordinate]) -> f64 {
    ring.windows(2)
        .map(|w| w[0].longitude * w[1].latitude - w[1].longitude * w[0].latitude)
        .sum::<f64>()
        / 2.0
}

/// Whether a polygonal geometry has canonical ring orientation
pub fn is_canonically_oriented(geometry: &Geometry) -> bool {
    use geo::algorithm::winding_order::Winding;

    match to_geo_multi_polygon(geometry) {
        Some(polygons) => polygons.iter().all(|polygon| {
            !polygon.exterior().is_cw() && polygon.interiors().iter().all(|hole| !hole.is_ccw())
        }),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::GeometryExt;

    fn square(min: f64, max: f64) -> Vec<[f64; 2]> {
        vec![[min, min], [max, min], [max, max], [min, max], [min, min]]
    }

    #[test]
    fn test_non_polygon_unchanged() {
        let repairer = GeometryRepairer::new();
        let line = Geometry::line_string(vec![[0.0, 0.0], [1.0, 1.0], [1.0, 0.0], [0.0, 1.0]]);
        assert_eq!(repairer.validate(&line), Some(line));
    }

    #[test]
    fn test_valid_polygon_is_oriented() {
        let repairer = GeometryRepairer::new();
        let mut clockwise = square(0.0, 4.0);
        clockwise.reverse();
        let geom = Geometry::polygon(vec![clockwise]);

        let validated = repairer.validate(&geom).unwrap();
        assert!(is_canonically_oriented(&validated));
        assert_eq!(validated, Geometry::polygon(vec![square(0.0, 4.0)]));
    }

    #[test]
    fn test_bowtie_repaired() {
        let repairer = GeometryRepairer::new();
        let bowtie =
            Geometry::polygon(vec![vec![[0.0, 0.0], [2.0, 2.0], [2.0, 0.0], [0.0, 2.0], [0.0, 0.0]]]);

        let repaired = repairer.try_validate(&bowtie).unwrap();
        assert!((repaired.area() - 2.0).abs() < 1e-9);
        assert!(is_canonically_oriented(&repaired));
    }

    #[test]
    fn test_skip_mode_passes_through() {
        let repairer = GeometryRepairer::new();
        let bowtie =
            Geometry::polygon(vec![vec![[0.0, 0.0], [2.0, 2.0], [2.0, 0.0], [0.0, 2.0], [0.0, 0.0]]]);
        assert_eq!(repairer.apply(ValidityMode::Skip, &bowtie), Some(bowtie.clone()));
        assert_ne!(repairer.apply(ValidityMode::Repair, &bowtie), Some(bowtie));
    }

    #[test]
    fn test_collapsed_ring() {
        let repairer = GeometryRepairer::new();
        let flat = Geometry::polygon(vec![vec![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [0.0, 0.0]]]);

        assert_eq!(repairer.try_validate(&flat), Err(RepairError::Collapsed));
        assert_eq!(repairer.validate(&flat), None);
    }
}
