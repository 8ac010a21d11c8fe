//! Gauge Error Types

use thiserror::Error;

/// Errors from gauge configuration and measurement
#[derive(Debug, Clone, Error)]
pub enum GaugeError {
    /// Sensor produced NaN or infinity
    #[error("reading {0} cm is not a finite level")]
    NonFiniteReading(f64),

    /// Sensed range inverted or negative
    #[error("sensed range [{min}, {max}] cm is empty")]
    EmptyRange { min: f64, max: f64 },

    /// Sensed range extends past the tank rim
    #[error("max sensed level {max} cm exceeds tank height {height} cm")]
    RangeAboveRim { max: f64, height: u16 },

    /// Median window must be an odd positive size so the median is a
    /// real sample
    #[error("filter window {0} is not an odd positive size")]
    BadFilterWindow(usize),
}
