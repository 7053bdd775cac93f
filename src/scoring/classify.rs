use std::fmt;

use super::config::{ConfidenceGates, Thresholds};

/// Admission likelihood tier, ordered from weakest to strongest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    BelowThreshold,
    Reach,
    Target,
    Safety,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::Safety => "Safety",
            Category::Target => "Target",
            Category::Reach => "Reach",
            Category::BelowThreshold => "Below Threshold",
        };
        f.write_str(label)
    }
}

/// First matching rule wins: Safety and Target also require enough
/// confidence, Reach only a score.
pub fn classify(score: f64, confidence: f64, thresholds: &Thresholds, gates: &ConfidenceGates) -> Category {
    if score >= thresholds.safety && confidence >= gates.safety {
        Category::Safety
    } else if score >= thresholds.target && confidence >= gates.target {
        Category::Target
    } else if score >= thresholds.reach {
        Category::Reach
    } else {
        Category::BelowThreshold
    }
}
