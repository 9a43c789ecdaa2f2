//! Axis mapping and quadrant classification
//!
//! Two Likert ratings become two axis levels, which become one quadrant:
//!
//! ```text
//!                    information
//!                  low        high
//! frequency high   Q1 Routine Q2 Cockpit
//!           low    Q3 Guided  Q4 Point decision
//! ```
//!
//! A rating of exactly 3 is ambiguous. It resolves only through an explicit
//! tie-break direction; without one the classification stays pending.

use crate::types::{AxisDirection, AxisLevel, DiagnosticData, Likert, Quadrant};
use serde::{Deserialize, Serialize};

/// Result of classifying a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub quadrant: Option<Quadrant>,
    /// True only when an axis sits on the midpoint without a tie-break
    pub needs_evidence: bool,
}

impl Classification {
    pub fn pending() -> Self {
        Self {
            quadrant: None,
            needs_evidence: true,
        }
    }

    pub fn resolved(quadrant: Quadrant) -> Self {
        Self {
            quadrant: Some(quadrant),
            needs_evidence: false,
        }
    }
}

/// Map one rating onto an axis level
pub fn map_axis(value: Likert, tie_break: Option<AxisDirection>) -> AxisLevel {
    match value.value() {
        v if v <= 2 => AxisLevel::Low,
        v if v >= 4 => AxisLevel::High,
        _ => tie_break.map(AxisLevel::from).unwrap_or(AxisLevel::Undefined),
    }
}

/// Classify a task from its frequency and information ratings
pub fn classify(
    frequency: Likert,
    information: Likert,
    frequency_tie_break: Option<AxisDirection>,
    information_tie_break: Option<AxisDirection>,
) -> Classification {
    let f = map_axis(frequency, frequency_tie_break);
    let i = map_axis(information, information_tie_break);

    let classification = match (f, i) {
        (AxisLevel::High, AxisLevel::Low) => Classification::resolved(Quadrant::Q1),
        (AxisLevel::High, AxisLevel::High) => Classification::resolved(Quadrant::Q2),
        (AxisLevel::Low, AxisLevel::Low) => Classification::resolved(Quadrant::Q3),
        (AxisLevel::Low, AxisLevel::High) => Classification::resolved(Quadrant::Q4),
        _ => Classification::pending(),
    };

    tracing::debug!(
        frequency = frequency.value(),
        information = information.value(),
        quadrant = ?classification.quadrant,
        needs_evidence = classification.needs_evidence,
        "classified task"
    );

    classification
}

impl DiagnosticData {
    /// Classify from the stored ratings and tie-breaks
    pub fn classify(&self) -> Classification {
        classify(
            self.frequency,
            self.information,
            self.frequency_direction,
            self.information_direction,
        )
    }

    /// Axis names rated exactly at the midpoint
    pub fn midpoint_axes(&self) -> Vec<&'static str> {
        let mut axes = Vec::new();
        if self.frequency.is_midpoint() {
            axes.push("frequency");
        }
        if self.information.is_midpoint() {
            axes.push("information");
        }
        axes
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn lk(v: u8) -> Likert {
        Likert::new(v).unwrap()
    }

    #[test]
    fn test_map_axis_low_ratings_ignore_tie_break() {
        for v in [1, 2] {
            assert_eq!(map_axis(lk(v), None), AxisLevel::Low);
            assert_eq!(map_axis(lk(v), Some(AxisDirection::High)), AxisLevel::Low);
        }
    }

    #[test]
    fn test_map_axis_high_ratings_ignore_tie_break() {
        for v in [4, 5] {
            assert_eq!(map_axis(lk(v), None), AxisLevel::High);
            assert_eq!(map_axis(lk(v), Some(AxisDirection::Low)), AxisLevel::High);
        }
    }

    #[test]
    fn test_map_axis_midpoint() {
        assert_eq!(map_axis(lk(3), None), AxisLevel::Undefined);
        assert_eq!(map_axis(lk(3), Some(AxisDirection::Low)), AxisLevel::Low);
        assert_eq!(map_axis(lk(3), Some(AxisDirection::High)), AxisLevel::High);
    }

    #[test]
    fn test_quadrant_table() {
        assert_eq!(classify(lk(4), lk(2), None, None).quadrant, Some(Quadrant::Q1));
        assert_eq!(classify(lk(4), lk(4), None, None).quadrant, Some(Quadrant::Q2));
        assert_eq!(classify(lk(1), lk(1), None, None).quadrant, Some(Quadrant::Q3));
        assert_eq!(classify(lk(1), lk(4), None, None).quadrant, Some(Quadrant::Q4));
    }

    #[test]
    fn test_midpoint_without_tie_break_needs_evidence() {
        let c = classify(lk(3), lk(4), None, None);
        assert_eq!(c, Classification::pending());

        let c = classify(lk(5), lk(3), None, None);
        assert!(c.needs_evidence);
        assert!(c.quadrant.is_none());
    }

    #[test]
    fn test_midpoint_with_tie_break_resolves() {
        let c = classify(lk(3), lk(4), Some(AxisDirection::High), None);
        assert_eq!(c, Classification::resolved(Quadrant::Q2));

        let c = classify(lk(3), lk(3), Some(AxisDirection::Low), Some(AxisDirection::High));
        assert_eq!(c.quadrant, Some(Quadrant::Q4));
    }

    #[test]
    fn test_legacy_direction_spelling_resolves() {
        let dir: AxisDirection = "alto".parse().unwrap();
        let c = classify(lk(3), lk(4), Some(dir), None);
        assert_eq!(c.quadrant, Some(Quadrant::Q2));
    }

    #[test]
    fn test_classify_is_total_and_deterministic() {
        let dirs = [None, Some(AxisDirection::Low), Some(AxisDirection::High)];
        for f in 1..=5 {
            for i in 1..=5 {
                for fd in dirs {
                    for id in dirs {
                        let a = classify(lk(f), lk(i), fd, id);
                        let b = classify(lk(f), lk(i), fd, id);
                        assert_eq!(a, b);
                        assert_eq!(a.quadrant.is_none(), a.needs_evidence);
                    }
                }
            }
        }
    }

    #[test]
    fn test_reclassify_stored_diagnostic() {
        let mut diag = DiagnosticData::new(lk(3), lk(5));
        diag.frequency_direction = Some(AxisDirection::Low);

        let json = serde_json::to_string(&diag).unwrap();
        let reloaded: DiagnosticData = serde_json::from_str(&json).unwrap();

        assert_eq!(diag.classify(), reloaded.classify());
        assert_eq!(reloaded.classify().quadrant, Some(Quadrant::Q4));
    }

    #[test]
    fn test_midpoint_axes() {
        let diag = DiagnosticData::new(lk(3), lk(3));
        assert_eq!(diag.midpoint_axes(), vec!["frequency", "information"]);
        assert!(DiagnosticData::new(lk(1), lk(5)).midpoint_axes().is_empty());
    }
}
