//! Error types for geometry repair

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RepairError {
    #[error("Overlay operation failed: {reason}")]
    Overlay { reason: String },

    #[error("Geometry contains non-finite coordinates")]
    NonFinite,

    #[error("Repair produced no polygons")]
    Collapsed,
}

impl RepairError {
    pub(crate) fn overlay(reason: impl Into<String>) -> Self {
        RepairError::Overlay { reason: reason.into() }
    }
}
