//! Geometa Core - Metadata geometry model, codecs, and controlled vocabulary
//!
//! This crate contains the coordinate model, the GeoJSON-style geometry codec,
//! the date dispatch adapter, and the research discipline registry.

pub mod codec;
pub mod config;
pub mod error;
pub mod models;
pub mod validation;
pub mod vocabulary;

pub use codec::date::{decode_date, encode_date, parse_date_text};
pub use codec::geometry::{decode_geometry, encode_geometry, GeometryCodec};
pub use error::{GeometaError, Result};
pub use vocabulary::{registry, DisciplineRegistry, VocabularyEntry};
