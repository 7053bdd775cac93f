use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An applicant as seen by one scoring call.
///
/// Example YAML:
/// ```yaml
/// academic: { gpa: 3.7, test_score: 1450 }
/// context:
///   school_id: HS_123
///   low_income: true
///   adversity_score: 0.8
/// contributions: { total: 0.85, leadership: 0.9 }
/// mission_alignment:
///   diversity: 0.7
///   community_impact: 0.8
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Student {
    pub academic: AcademicRecord,
    pub context: SchoolContext,
    pub contributions: Contributions,

    /// Self-reported alignment per mission metric, 0.0 to 1.0
    #[serde(default)]
    pub mission_alignment: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AcademicRecord {
    /// Unweighted or weighted GPA; values above 4.0 are not capped
    pub gpa: f64,

    /// SAT-scale score, 0 to 1600
    #[serde(alias = "test_scores")]
    pub test_score: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SchoolContext {
    pub school_id: String,

    #[serde(default)]
    pub low_income: bool,

    #[serde(default)]
    pub adversity_score: f64,

    #[serde(default)]
    pub underrepresented_group: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Contributions {
    pub total: f64,

    #[serde(default)]
    pub leadership: f64,
}

impl Student {
    pub fn school_id(&self) -> &str {
        &self.context.school_id
    }

    /// Alignment for a mission metric, 0.0 when the student did not report it
    pub fn alignment(&self, metric: &str) -> f64 {
        self.mission_alignment.get(metric).copied().unwrap_or(0.0)
    }
}
