//! Level Sensor Seam

use thiserror::Error;

/// Errors a level sensor can report
#[derive(Debug, Clone, Error)]
pub enum SensorError {
    /// No echo / no response from the transducer
    #[error("sensor not responding")]
    NotResponding,

    /// The transducer answered with a value outside its own envelope
    #[error("reading {0} cm outside sensor envelope")]
    OutOfEnvelope(f64),
}

/// Hardware seam for level sensors.
///
/// The pipeline needs one reading per sample; real drivers (ultrasonic,
/// pressure, float) live behind this trait and stay out of this crate.
pub trait LevelSensor: Send {
    /// Current water level in centimeters above the tank floor
    fn read_level(&mut self) -> Result<f64, SensorError>;
}

/// Deterministic sensor for tests and demo runs (no hardware required).
///
/// Produces a triangle wave between the floor and `max_cm`, optionally
/// failing every n-th read to exercise retry handling.
pub struct MockSensor {
    level_cm: f64,
    step_cm: f64,
    max_cm: f64,
    fail_every: Option<u32>,
    reads: u32,
}

impl MockSensor {
    /// Create a mock ramping from `start_cm` in `step_cm` increments
    pub fn new(start_cm: f64, step_cm: f64, max_cm: f64) -> Self {
        Self {
            level_cm: start_cm,
            step_cm,
            max_cm,
            fail_every: None,
            reads: 0,
        }
    }

    /// Make every n-th read fail with `NotResponding`
    pub fn failing_every(mut self, n: u32) -> Self {
        self.fail_every = Some(n.max(1));
        self
    }
}

impl LevelSensor for MockSensor {
    fn read_level(&mut self) -> Result<f64, SensorError> {
        self.reads += 1;
        if let Some(n) = self.fail_every {
            if self.reads % n == 0 {
                return Err(SensorError::NotResponding);
            }
        }

        let current = self.level_cm;
        self.level_cm += self.step_cm;
        if self.level_cm > self.max_cm || self.level_cm < 0.0 {
            // Bounce at the floor and the rim
            self.step_cm = -self.step_cm;
            self.level_cm += 2.0 * self.step_cm;
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_ramps_and_bounces() {
        let mut sensor = MockSensor::new(0.0, 60.0, 100.0);
        assert_eq!(sensor.read_level().unwrap(), 0.0);
        assert_eq!(sensor.read_level().unwrap(), 60.0);
        // 120 would overshoot, so the wave turns around
        let next = sensor.read_level().unwrap();
        assert!(next <= 100.0);
    }

    #[test]
    fn test_mock_injected_failures() {
        let mut sensor = MockSensor::new(50.0, 1.0, 100.0).failing_every(2);
        assert!(sensor.read_level().is_ok());
        assert!(sensor.read_level().is_err());
        assert!(sensor.read_level().is_ok());
        assert!(sensor.read_level().is_err());
    }
}
