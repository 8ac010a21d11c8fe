//! Measurement Classification Tag

use serde::{Deserialize, Serialize};

/// Classification of one level reading against a tank's sensed range.
///
/// This is a result tag, not a fault: every reading produces exactly one
/// variant, and `None` is the normal outcome. The tag carries no reference
/// to the tank it was measured against; callers keep that association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasureError {
    /// Reading within the expected bounds
    None,
    /// Reading below the minimum sensed level
    BelowMin,
    /// Reading above the maximum sensed level
    AboveMax,
}

impl MeasureError {
    /// Whether the reading fell outside the sensed range
    pub fn is_fault(self) -> bool {
        !matches!(self, MeasureError::None)
    }

    /// Stable label for logs and alert keys
    pub fn label(self) -> &'static str {
        match self {
            MeasureError::None => "none",
            MeasureError::BelowMin => "below_min",
            MeasureError::AboveMax => "above_max",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_distinct_values() {
        let above = MeasureError::AboveMax;
        assert_ne!(above, MeasureError::None);
        assert_ne!(above, MeasureError::BelowMin);
        assert_eq!(above, MeasureError::AboveMax);
    }

    #[test]
    fn test_fault_predicate() {
        assert!(!MeasureError::None.is_fault());
        assert!(MeasureError::BelowMin.is_fault());
        assert!(MeasureError::AboveMax.is_fault());
    }

    #[test]
    fn test_labels_unique() {
        let labels = [
            MeasureError::None.label(),
            MeasureError::BelowMin.label(),
            MeasureError::AboveMax.label(),
        ];
        assert_eq!(labels, ["none", "below_min", "above_max"]);
    }

    #[test]
    fn test_tag_round_trip() {
        let json = serde_json::to_string(&MeasureError::AboveMax).unwrap();
        let back: MeasureError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, MeasureError::AboveMax);
    }
}
