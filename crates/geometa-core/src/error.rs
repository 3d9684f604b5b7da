//! Error types for Geometa

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeometaError {
    // Geometry errors
    #[error("Unknown geometry type: {type_name}")]
    UnknownGeometryType { type_name: String },

    #[error("Malformed geometry: {reason}")]
    MalformedGeometry { reason: String },

    #[error("Invalid precision {places}: decimal places must be greater than zero")]
    InvalidPrecision { places: u32 },

    // Date errors
    #[error("Malformed date: {reason}")]
    MalformedDate { reason: String },

    // Vocabulary errors
    #[error("Invalid vocabulary source: {reason}")]
    Vocabulary { reason: String },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl GeometaError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        GeometaError::MalformedGeometry { reason: reason.into() }
    }

    pub(crate) fn malformed_date(reason: impl Into<String>) -> Self {
        GeometaError::MalformedDate { reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, GeometaError>;
