//! Water Tank Configuration Record

use crate::error::TankGeometryError;
use serde::{Deserialize, Serialize};

/// Static description of one tank, approximated as a truncated cone
/// standing on its narrow end.
///
/// Units follow the manufacturer datasheets: capacity in liters, all
/// lengths in centimeters. One record per physical tank being monitored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterTank {
    /// Nominal holding volume in liters
    pub capacity: u16,
    /// Manufacturing tolerance on the nominal capacity, in liters
    pub capacity_error: f32,
    /// Tank height in centimeters
    pub height: u16,
    /// Diameter at the narrow (bottom) end, in centimeters
    pub diameter_min: u16,
    /// Diameter at the wide (top) end, in centimeters
    pub diameter_max: u16,
}

impl WaterTank {
    /// Create a tank record, rejecting physically impossible dimensions
    pub fn new(
        capacity: u16,
        capacity_error: f32,
        height: u16,
        diameter_min: u16,
        diameter_max: u16,
    ) -> Result<Self, TankGeometryError> {
        let tank = Self {
            capacity,
            capacity_error,
            height,
            diameter_min,
            diameter_max,
        };
        tank.validate()?;
        Ok(tank)
    }

    /// Check the physical invariants.
    ///
    /// Deserialization uses the plain derived impl and bypasses `new`, so
    /// callers loading tanks from a settings file should re-run this.
    pub fn validate(&self) -> Result<(), TankGeometryError> {
        if self.capacity == 0 {
            return Err(TankGeometryError::ZeroField("capacity"));
        }
        if self.height == 0 {
            return Err(TankGeometryError::ZeroField("height"));
        }
        if self.diameter_min == 0 {
            return Err(TankGeometryError::ZeroField("diameter_min"));
        }
        if self.diameter_max < self.diameter_min {
            return Err(TankGeometryError::InvertedDiameters {
                min: self.diameter_min,
                max: self.diameter_max,
            });
        }
        if !self.capacity_error.is_finite() || self.capacity_error < 0.0 {
            return Err(TankGeometryError::InvalidTolerance(self.capacity_error));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datasheet_tank_constructs() {
        let tank = WaterTank::new(1000, 5.0, 150, 80, 120).unwrap();
        assert_eq!(tank.capacity, 1000);
        assert_eq!(tank.capacity_error, 5.0);
        assert_eq!(tank.height, 150);
        assert_eq!(tank.diameter_min, 80);
        assert_eq!(tank.diameter_max, 120);
    }

    #[test]
    fn test_cylindrical_tank_allowed() {
        // Equal diameters degenerate to a cylinder, which is fine
        assert!(WaterTank::new(500, 2.5, 100, 90, 90).is_ok());
    }

    #[test]
    fn test_inverted_diameters_rejected() {
        let err = WaterTank::new(1000, 5.0, 150, 120, 80).unwrap_err();
        assert!(matches!(
            err,
            TankGeometryError::InvertedDiameters { min: 120, max: 80 }
        ));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(WaterTank::new(0, 5.0, 150, 80, 120).is_err());
        assert!(WaterTank::new(1000, 5.0, 0, 80, 120).is_err());
        assert!(WaterTank::new(1000, 5.0, 150, 0, 120).is_err());
    }

    #[test]
    fn test_bad_tolerance_rejected() {
        assert!(WaterTank::new(1000, -1.0, 150, 80, 120).is_err());
        assert!(WaterTank::new(1000, f32::NAN, 150, 80, 120).is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let tank = WaterTank::new(1000, 5.0, 150, 80, 120).unwrap();
        let json = serde_json::to_string(&tank).unwrap();
        let back: WaterTank = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tank);
        assert!(back.validate().is_ok());
    }
}
