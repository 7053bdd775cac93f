use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An institution's weighting scheme.
///
/// `weights` should sum to 1.0 but this is not enforced; other sums scale
/// the composite score.
///
/// Example YAML:
/// ```yaml
/// weights: { academic: 0.4, contributions: 0.3, mission_fit: 0.3 }
/// mission_metrics:
///   diversity: 0.4
///   community_impact: 0.6
/// thresholds: { safety: 0.7, target: 0.5, reach: 0.3 }
/// confidence_gates: { safety: 0.7, target: 0.5 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct InstitutionConfig {
    pub weights: ComponentWeights,

    /// Mission metric name to weight; weights are normalized by their sum
    pub mission_metrics: BTreeMap<String, f64>,

    #[serde(default)]
    pub thresholds: Thresholds,

    #[serde(default)]
    pub confidence_gates: ConfidenceGates,
}

impl Default for InstitutionConfig {
    fn default() -> Self {
        Self {
            weights: ComponentWeights {
                academic: 0.4,
                contributions: 0.3,
                mission_fit: 0.3,
            },
            mission_metrics: BTreeMap::from([
                ("community_impact".to_string(), 0.6),
                ("diversity".to_string(), 0.4),
            ]),
            thresholds: Thresholds::default(),
            confidence_gates: ConfidenceGates::default(),
        }
    }
}

/// Weights of the three score components
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ComponentWeights {
    pub academic: f64,
    pub contributions: f64,
    pub mission_fit: f64,
}

impl ComponentWeights {
    pub fn sum(&self) -> f64 {
        self.academic + self.contributions + self.mission_fit
    }
}

/// Minimum final score for each category
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Thresholds {
    #[serde(alias = "Safety")]
    pub safety: f64,
    #[serde(alias = "Target")]
    pub target: f64,
    #[serde(alias = "Reach")]
    pub reach: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            safety: 0.7,
            target: 0.5,
            reach: 0.3,
        }
    }
}

/// Minimum confidence required for the Safety and Target categories
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfidenceGates {
    pub safety: f64,
    pub target: f64,
}

impl Default for ConfidenceGates {
    fn default() -> Self {
        Self {
            safety: 0.7,
            target: 0.5,
        }
    }
}
