use serde_json::json;
use std::sync::Arc;

use super::classify::{classify, Category};
use super::config::{ComponentWeights, InstitutionConfig};
use super::factors;
use super::strategy::{CompliancePolicy, ConfidenceEstimator, FixedConfidence, PermissiveCompliance};
use crate::audit::{AuditEntry, AuditSink};
use crate::error::ScoreOutcome;
use crate::history::OutcomeStore;
use crate::profile::{ProfileLookup, SchoolProfile};
use crate::student::Student;

/// GPA statistics assumed for a profile that exists but lacks them
const DEFAULT_GPA_MEAN: f64 = 3.0;
const DEFAULT_GPA_STD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentScores {
    pub academic: f64,
    pub contributions: f64,
    pub mission_fit: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    /// Composite score, capped at 1.0 with no lower bound
    pub final_score: f64,
    pub confidence: f64,
    pub category: Category,
    pub component_scores: ComponentScores,
}

/// Scores students against one institution's weighting scheme.
///
/// Every collaborator is injected: school profiles, the audit sink, the
/// confidence estimator, the compliance policy and, optionally, a store for
/// admission outcomes.
pub struct ScoreAggregator {
    config: InstitutionConfig,
    profiles: Arc<dyn ProfileLookup>,
    audit: Arc<dyn AuditSink>,
    confidence: Box<dyn ConfidenceEstimator>,
    compliance: Box<dyn CompliancePolicy>,
    outcomes: Option<Arc<dyn OutcomeStore>>,
}

impl ScoreAggregator {
    pub fn new(config: InstitutionConfig, profiles: Arc<dyn ProfileLookup>, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            config,
            profiles,
            audit,
            confidence: Box::new(FixedConfidence::default()),
            compliance: Box::new(PermissiveCompliance),
            outcomes: None,
        }
    }

    pub fn with_confidence(mut self, estimator: impl ConfidenceEstimator + 'static) -> Self {
        self.confidence = Box::new(estimator);
        self
    }

    pub fn with_compliance(mut self, policy: impl CompliancePolicy + 'static) -> Self {
        self.compliance = Box::new(policy);
        self
    }

    pub fn with_outcome_store(mut self, store: Arc<dyn OutcomeStore>) -> Self {
        self.outcomes = Some(store);
        self
    }

    pub fn config(&self) -> &InstitutionConfig {
        &self.config
    }

    /// Score a student. Either every step succeeds or no result is produced.
    pub fn score(&self, student: &Student) -> ScoreOutcome<ScoreResult> {
        let academic = self.academic_score(student)?;
        let contributions = student.contributions.total;
        let mission_fit = self.mission_fit(student)?;

        let base = self.base_composite(academic, contributions, mission_fit);
        let context_adjusted = self.apply_context_modifiers(student, base);
        let bonus = factors::intersectionality_bonus(student);
        let confidence = self.confidence(student);

        let final_score = factors::cap(context_adjusted + bonus);

        Ok(ScoreResult {
            final_score,
            confidence,
            category: self.classify(final_score, confidence),
            component_scores: ComponentScores {
                academic,
                contributions,
                mission_fit,
            },
        })
    }

    /// GPA in (0, 1) relative to the student's school, or `gpa / 4.0` when
    /// the school has no profile.
    pub fn normalize_gpa(&self, student: &Student) -> ScoreOutcome<f64> {
        let profile = self.school_profile(student);
        normalize_with(student, profile.as_ref())
    }

    /// Blend of normalized GPA and test score, scaled by school
    /// competitiveness and capped at 1.0.
    pub fn academic_score(&self, student: &Student) -> ScoreOutcome<f64> {
        let profile = self.school_profile(student);
        let gpa_score = normalize_with(student, profile.as_ref())?;
        let test_score = factors::normalize_test_score(student.academic.test_score);
        let competitiveness = profile.as_ref().map_or(1.0, SchoolProfile::competitiveness);

        let academic = factors::blend_academic(gpa_score, test_score, competitiveness);

        self.audit.record(AuditEntry::new(
            "academic_score_calculated",
            json!({
                "gpa_score": gpa_score,
                "test_score": test_score,
                "final_score": academic,
            }),
        ));

        Ok(factors::cap(academic))
    }

    pub fn mission_fit(&self, student: &Student) -> ScoreOutcome<f64> {
        factors::weighted_mission_fit(&self.config.mission_metrics, student)
    }

    /// Weighted sum of the three components using the configured weights as-is
    pub fn base_composite(&self, academic: f64, contributions: f64, mission_fit: f64) -> f64 {
        let w = &self.config.weights;
        academic * w.academic + contributions * w.contributions + mission_fit * w.mission_fit
    }

    /// Add the context bonus to `base_score`, capped at 1.0
    pub fn apply_context_modifiers(&self, student: &Student, base_score: f64) -> f64 {
        let compliant = self.compliance.is_compliant(student);
        let adjustments = factors::context_adjustments(student, compliant);

        self.audit.record(AuditEntry::new(
            "context_adjustments_applied",
            json!({
                "base_score": base_score,
                "adjustments": adjustments,
            }),
        ));

        factors::cap(base_score + adjustments)
    }

    pub fn intersectionality_bonus(&self, student: &Student) -> f64 {
        factors::intersectionality_bonus(student)
    }

    pub fn confidence(&self, student: &Student) -> f64 {
        self.confidence.estimate(student).clamp(0.0, 1.0)
    }

    pub fn classify(&self, score: f64, confidence: f64) -> Category {
        classify(
            score,
            confidence,
            &self.config.thresholds,
            &self.config.confidence_gates,
        )
    }

    /// Replace the component weights and log the change
    pub fn update_weights(&mut self, weights: ComponentWeights) {
        self.config.weights = weights;
        self.audit.record(AuditEntry::new(
            "weights_updated",
            json!({
                "new_weights": {
                    "academic": weights.academic,
                    "contributions": weights.contributions,
                    "mission_fit": weights.mission_fit,
                }
            }),
        ));
    }

    /// Forward an admission decision to the outcome store, if one is set
    pub fn record_outcome(&self, student: &Student, admitted: bool) -> anyhow::Result<()> {
        match self.outcomes {
            Some(ref store) => store.append(student, admitted),
            None => {
                tracing::debug!("no outcome store configured, outcome dropped");
                Ok(())
            }
        }
    }

    fn school_profile(&self, student: &Student) -> Option<SchoolProfile> {
        let profile = self.profiles.lookup(student.school_id());
        if profile.is_none() {
            tracing::debug!(school_id = student.school_id(), "no school profile, using flat GPA scale");
            self.audit.record(AuditEntry::new(
                "missing_school_profile",
                json!({ "school": student.school_id() }),
            ));
        }
        profile
    }
}

fn normalize_with(student: &Student, profile: Option<&SchoolProfile>) -> ScoreOutcome<f64> {
    let gpa = factors::check_gpa(student.academic.gpa)?;
    match profile {
        None => Ok(factors::flat_normalize(gpa)),
        Some(p) => factors::sigmoid_normalize(
            gpa,
            p.gpa_mean.unwrap_or(DEFAULT_GPA_MEAN),
            p.gpa_std.unwrap_or(DEFAULT_GPA_STD),
        ),
    }
}
