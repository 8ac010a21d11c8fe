//! Median Filter for Spiky Level Sensors

use std::collections::VecDeque;

/// Sliding-window median filter.
///
/// Ultrasonic and float sensors produce occasional single-sample spikes
/// (splashes, inlet turbulence); a short median window drops them without
/// lagging genuine level changes. Until the window has filled, readings
/// pass through unchanged.
pub struct MedianFilter {
    window: VecDeque<f64>,
    capacity: usize,
}

impl MedianFilter {
    /// Create a filter with the given window size
    pub fn new(capacity: usize) -> Self {
        assert!(
            capacity > 0 && capacity % 2 == 1,
            "window size must be odd and > 0"
        );
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a reading and get the filtered output
    pub fn filter(&mut self, value: f64) -> f64 {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(value);

        if self.window.len() < self.capacity {
            // Warm-up: not enough history for a meaningful median
            return value;
        }

        let mut sorted: Vec<f64> = self.window.iter().copied().collect();
        sorted.sort_by(|a, b| a.total_cmp(b));
        sorted[self.capacity / 2]
    }

    /// Discard all history
    pub fn reset(&mut self) {
        self.window.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warm_up_passes_through() {
        let mut filter = MedianFilter::new(5);
        assert_eq!(filter.filter(42.0), 42.0);
        assert_eq!(filter.filter(43.0), 43.0);
    }

    #[test]
    fn test_spike_suppressed() {
        let mut filter = MedianFilter::new(5);
        for v in [100.0, 101.0, 100.0, 99.0] {
            filter.filter(v);
        }
        // A splash spike should not survive the median
        let out = filter.filter(180.0);
        assert!((out - 100.0).abs() < 1.5);
    }

    #[test]
    fn test_window_slides() {
        let mut filter = MedianFilter::new(3);
        filter.filter(10.0);
        filter.filter(20.0);
        assert_eq!(filter.filter(30.0), 20.0);
        // Oldest value (10) dropped; median of [20, 30, 40] is 30
        assert_eq!(filter.filter(40.0), 30.0);
    }

    #[test]
    fn test_reset_restarts_warm_up() {
        let mut filter = MedianFilter::new(3);
        for v in [1.0, 2.0, 3.0] {
            filter.filter(v);
        }
        filter.reset();
        assert_eq!(filter.filter(99.0), 99.0);
    }

    #[test]
    #[should_panic(expected = "odd")]
    fn test_even_window_rejected() {
        MedianFilter::new(4);
    }
}
