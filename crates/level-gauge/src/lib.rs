//! Level Gauge and Reading Classification
//!
//! Turns raw sensor levels into filtered, volume-annotated measurements
//! tagged with the three-way range classification.

mod error;
mod filter;
mod gauge;

pub use error::GaugeError;
pub use filter::MedianFilter;
pub use gauge::{GaugeConfig, LevelGauge, Measurement};
