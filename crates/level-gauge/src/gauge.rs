//! Level Gauge Implementation

use crate::error::GaugeError;
use crate::filter::MedianFilter;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tank_geometry::{MeasureError, WaterTank};
use tracing::{debug, warn};

/// Sensed-range configuration for one gauge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaugeConfig {
    /// Lowest level (cm) the sensor reports reliably; readings under it
    /// mean the tank is running dry
    pub min_level_cm: f64,
    /// Highest reliable level (cm); readings over it mean overfill
    pub max_level_cm: f64,
    /// Median filter window applied to raw readings (odd)
    pub filter_window: usize,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self {
            min_level_cm: 10.0,
            max_level_cm: 140.0,
            filter_window: 5,
        }
    }
}

/// One classified sample of a tank's water level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measurement {
    /// When the sample was taken
    pub taken_at: DateTime<Utc>,
    /// Filtered level in centimeters
    pub level_cm: f64,
    /// Held volume in liters at that level
    pub volume_l: f64,
    /// Range classification of the sample
    pub error: MeasureError,
}

/// Gauge for one tank: filters raw readings and classifies them against
/// the configured sensed range
pub struct LevelGauge {
    tank: WaterTank,
    config: GaugeConfig,
    filter: MedianFilter,
}

impl LevelGauge {
    /// Create a gauge, rejecting a sensed range the tank cannot satisfy
    pub fn new(tank: WaterTank, config: GaugeConfig) -> Result<Self, GaugeError> {
        if config.min_level_cm < 0.0 || config.min_level_cm >= config.max_level_cm {
            return Err(GaugeError::EmptyRange {
                min: config.min_level_cm,
                max: config.max_level_cm,
            });
        }
        if config.max_level_cm > f64::from(tank.height) {
            return Err(GaugeError::RangeAboveRim {
                max: config.max_level_cm,
                height: tank.height,
            });
        }
        if config.filter_window == 0 || config.filter_window % 2 == 0 {
            return Err(GaugeError::BadFilterWindow(config.filter_window));
        }
        let filter = MedianFilter::new(config.filter_window);
        Ok(Self {
            tank,
            config,
            filter,
        })
    }

    /// Classify a level against the sensed range.
    ///
    /// Both bounds are part of the valid range, so a reading exactly at
    /// `min_level_cm` or `max_level_cm` classifies as `None`.
    pub fn classify(&self, level_cm: f64) -> Result<MeasureError, GaugeError> {
        if !level_cm.is_finite() {
            return Err(GaugeError::NonFiniteReading(level_cm));
        }
        let tag = if level_cm < self.config.min_level_cm {
            MeasureError::BelowMin
        } else if level_cm > self.config.max_level_cm {
            MeasureError::AboveMax
        } else {
            MeasureError::None
        };
        Ok(tag)
    }

    /// Filter a raw reading, classify it, and annotate it with the held
    /// volume
    pub fn measure(&mut self, raw_level_cm: f64) -> Result<Measurement, GaugeError> {
        if !raw_level_cm.is_finite() {
            return Err(GaugeError::NonFiniteReading(raw_level_cm));
        }

        let level_cm = self.filter.filter(raw_level_cm);
        let error = self.classify(level_cm)?;
        let volume_l = self.tank.volume_at_level(level_cm);

        match error {
            MeasureError::None => {
                debug!("level {:.1} cm ({:.1} l) in range", level_cm, volume_l)
            }
            _ => warn!(
                "level {:.1} cm outside sensed range: {}",
                level_cm,
                error.label()
            ),
        }

        Ok(Measurement {
            taken_at: Utc::now(),
            level_cm,
            volume_l,
            error,
        })
    }

    /// How far (cm) a level sits outside the sensed range; 0 when inside
    pub fn deviation_cm(&self, level_cm: f64) -> f64 {
        if level_cm < self.config.min_level_cm {
            self.config.min_level_cm - level_cm
        } else if level_cm > self.config.max_level_cm {
            level_cm - self.config.max_level_cm
        } else {
            0.0
        }
    }

    /// The tank this gauge measures
    pub fn tank(&self) -> &WaterTank {
        &self.tank
    }

    /// The sensed-range configuration
    pub fn config(&self) -> &GaugeConfig {
        &self.config
    }

    /// Drop filter history, e.g. after the sensor was serviced
    pub fn reset_filter(&mut self) {
        self.filter.reset();
    }
}
