pub mod classify;
pub mod config;
pub mod engine;
pub mod factors;
pub mod strategy;
pub mod validation;

pub use classify::{classify, Category};
pub use config::*;
pub use engine::{ComponentScores, ScoreAggregator, ScoreResult};
pub use strategy::{CompliancePolicy, ConfidenceEstimator, FixedConfidence, PermissiveCompliance};
pub use validation::validate_institution;
