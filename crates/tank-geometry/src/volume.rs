//! Truncated-Cone Volume Math

use crate::tank::WaterTank;
use std::f64::consts::PI;

/// Cubic centimeters per liter
const CM3_PER_LITER: f64 = 1000.0;

/// Bisection stops once the level bracket is this narrow (cm)
const BISECT_TOLERANCE_CM: f64 = 1e-6;

/// Iteration cap for the bisection; 128 halvings far exceed f64 precision
const BISECT_MAX_ITER: u32 = 128;

impl WaterTank {
    /// Water-surface diameter in centimeters when filled to `level_cm`.
    ///
    /// Levels outside `[0, height]` clamp to the floor and the rim.
    pub fn diameter_at(&self, level_cm: f64) -> f64 {
        let level = level_cm.clamp(0.0, f64::from(self.height));
        let span = f64::from(self.diameter_max) - f64::from(self.diameter_min);
        f64::from(self.diameter_min) + span * level / f64::from(self.height)
    }

    /// Held volume in liters when filled to `level_cm`.
    ///
    /// The water body is itself a frustum, from the tank floor up to the
    /// surface diameter at `level_cm`.
    pub fn volume_at_level(&self, level_cm: f64) -> f64 {
        let level = level_cm.clamp(0.0, f64::from(self.height));
        let r_floor = f64::from(self.diameter_min) / 2.0;
        let r_surface = self.diameter_at(level) / 2.0;
        // V = pi * h / 3 * (r0^2 + r0*r1 + r1^2)
        let cm3 =
            PI * level / 3.0 * (r_floor * r_floor + r_floor * r_surface + r_surface * r_surface);
        cm3 / CM3_PER_LITER
    }

    /// Volume in liters of the full frustum, from the dimensions alone
    pub fn geometric_capacity(&self) -> f64 {
        self.volume_at_level(f64::from(self.height))
    }

    /// Whether the geometric capacity agrees with the nominal capacity
    /// within the datasheet tolerance
    pub fn capacity_consistent(&self) -> bool {
        let deviation = self.geometric_capacity() - f64::from(self.capacity);
        deviation.abs() <= f64::from(self.capacity_error)
    }

    /// Level in centimeters at which the tank holds `liters`.
    ///
    /// Inverts `volume_at_level` by bisection over the monotone volume
    /// curve. Non-positive volumes map to the floor, volumes past the
    /// geometric capacity to the rim.
    pub fn level_for_volume(&self, liters: f64) -> f64 {
        if liters.is_nan() || liters <= 0.0 {
            return 0.0;
        }
        if liters >= self.geometric_capacity() {
            return f64::from(self.height);
        }
        let mut lo = 0.0_f64;
        let mut hi = f64::from(self.height);
        for _ in 0..BISECT_MAX_ITER {
            if hi - lo < BISECT_TOLERANCE_CM {
                break;
            }
            let mid = (lo + hi) / 2.0;
            if self.volume_at_level(mid) < liters {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        (lo + hi) / 2.0
    }
}
