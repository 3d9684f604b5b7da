//! Computational-geometry capability used by the repair engine.

use crate::error::RepairError;
use crate::overlay;
use geo::{BooleanOps, LineString, MultiPolygon, Validation};
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Geometry operations the repair engine depends on
///
/// Implementations must be deterministic: the same input always yields the
/// same output, so that repairing a repaired geometry changes nothing.
pub trait GeometryOps {
    /// Whether the polygons are topologically valid
    fn is_valid(&self, polygons: &MultiPolygon<f64>) -> bool;

    /// Split a possibly self-intersecting ring into simple faces
    fn polygonize_ring(&self, ring: &LineString<f64>) -> Result<MultiPolygon<f64>, RepairError>;

    fn intersection(
        &self,
        a: &MultiPolygon<f64>,
        b: &MultiPolygon<f64>,
    ) -> Result<MultiPolygon<f64>, RepairError>;

    fn sym_difference(
        &self,
        a: &MultiPolygon<f64>,
        b: &MultiPolygon<f64>,
    ) -> Result<MultiPolygon<f64>, RepairError>;

    fn union(
        &self,
        a: &MultiPolygon<f64>,
        b: &MultiPolygon<f64>,
    ) -> Result<MultiPolygon<f64>, RepairError>;
}

/// Default operations backed by the `geo` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoOps;

impl GeoOps {
    /// Run a boolean operation, turning panics into `RepairError::Overlay`
    fn guarded(
        name: &str,
        a: &MultiPolygon<f64>,
        b: &MultiPolygon<f64>,
        op: impl FnOnce(&MultiPolygon<f64>, &MultiPolygon<f64>) -> MultiPolygon<f64>,
    ) -> Result<MultiPolygon<f64>, RepairError> {
        if !is_finite(a) || !is_finite(b) {
            return Err(RepairError::NonFinite);
        }

        catch_unwind(AssertUnwindSafe(|| op(a, b))).map_err(|payload| {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            RepairError::overlay(format!("{} panicked: {}", name, message))
        })
    }
}

impl GeometryOps for GeoOps {
    fn is_valid(&self, polygons: &MultiPolygon<f64>) -> bool {
        is_finite(polygons) && polygons.is_valid()
    }

    fn polygonize_ring(&self, ring: &LineString<f64>) -> Result<MultiPolygon<f64>, RepairError> {
        overlay::polygonize_ring(ring)
    }

    fn intersection(
        &self,
        a: &MultiPolygon<f64>,
        b: &MultiPolygon<f64>,
    ) -> Result<MultiPolygon<f64>, RepairError> {
        Self::guarded("intersection", a, b, |a, b| a.intersection(b))
    }

    fn sym_difference(
        &self,
        a: &MultiPolygon<f64>,
        b: &MultiPolygon<f64>,
    ) -> Result<MultiPolygon<f64>, RepairError> {
        Self::guarded("symmetric difference", a, b, |a, b| a.xor(b))
    }

    fn union(
        &self,
        a: &MultiPolygon<f64>,
        b: &MultiPolygon<f64>,
    ) -> Result<MultiPolygon<f64>, RepairError> {
        Self::guarded("union", a, b, |a, b| a.union(b))
    }
}

fn is_finite(polygons: &MultiPolygon<f64>) -> bool {
    polygons.iter().all(|polygon| {
        std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .flat_map(|ring| ring.coords())
            .all(|c| c.x.is_finite() && c.y.is_finite())
    })
}
