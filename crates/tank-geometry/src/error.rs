//! Tank Geometry Error Types

use thiserror::Error;

/// Errors from tank construction and validation
#[derive(Debug, Clone, Error)]
pub enum TankGeometryError {
    /// A dimensional field that must be positive was zero
    #[error("{0} must be greater than zero")]
    ZeroField(&'static str),

    /// Diameters in the wrong order for a truncated cone
    #[error("diameter_max {max} cm is smaller than diameter_min {min} cm")]
    InvertedDiameters { min: u16, max: u16 },

    /// Capacity tolerance negative or not a number
    #[error("capacity_error {0} liters is not a valid tolerance")]
    InvalidTolerance(f32),
}
