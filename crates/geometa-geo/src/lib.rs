//! Geometa Geo - Polygon repair and conversions to the `geo` crate
//!
//! This crate turns topologically invalid polygons (self-intersecting rings,
//! holes leaking out of their shell) into valid ones, and converts between
//! the canonical geometry model and `geo` types.

pub mod convert;
pub mod error;
pub mod ops;
pub mod overlay;
pub mod repair;

pub use convert::GeometryExt;
pub use error::RepairError;
pub use ops::{GeoOps, GeometryOps};
pub use repair::GeometryRepairer;
