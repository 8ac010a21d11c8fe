//! Tank Geometry and Measurement Data Model
//!
//! Core types for the water-tank monitoring pipeline: the tank
//! configuration record, the three-way measurement classification tag,
//! and truncated-cone volume math.

mod error;
mod measure;
mod tank;
mod volume;

pub use error::TankGeometryError;
pub use measure::MeasureError;
pub use tank::WaterTank;
