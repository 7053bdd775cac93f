use crate::student::Student;

/// Estimates how much the score for a student can be trusted, 0.0 to 1.0.
pub trait ConfidenceEstimator: Send + Sync {
    fn estimate(&self, student: &Student) -> f64;
}

/// Constant confidence, used until calibration data from historical
/// outcomes is available.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedConfidence(pub f64);

impl Default for FixedConfidence {
    fn default() -> Self {
        Self(0.8)
    }
}

impl ConfidenceEstimator for FixedConfidence {
    fn estimate(&self, _student: &Student) -> f64 {
        self.0
    }
}

/// Decides whether group-membership adjustments may be applied to a student.
pub trait CompliancePolicy: Send + Sync {
    fn is_compliant(&self, student: &Student) -> bool;
}

/// Allows every adjustment. Replace with a jurisdiction-aware policy.
#[derive(Debug, Default, Clone, Copy)]
pub struct PermissiveCompliance;

impl CompliancePolicy for PermissiveCompliance {
    fn is_compliant(&self, _student: &Student) -> bool {
        true
    }
}
