use super::config::InstitutionConfig;
use super::factors::mission_weight_total;

/// Validate an institution config at startup.
/// Returns all validation errors at once (not just the first).
///
/// The component weights are not required to sum to 1.0.
pub fn validate_institution(config: &InstitutionConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    // Component weights
    let w = &config.weights;
    for (name, value) in [
        ("academic", w.academic),
        ("contributions", w.contributions),
        ("mission_fit", w.mission_fit),
    ] {
        if !value.is_finite() || value < 0.0 {
            errors.push(format!(
                "institution.weights.{}: must be a non-negative number, got {}",
                name, value
            ));
        }
    }

    // Mission metrics
    for (metric, weight) in &config.mission_metrics {
        if !weight.is_finite() || *weight < 0.0 {
            errors.push(format!(
                "institution.mission_metrics.{}: must be a non-negative number, got {}",
                metric, weight
            ));
        }
    }
    if mission_weight_total(&config.mission_metrics).is_none() {
        errors.push(format!(
            "institution.mission_metrics: weights must not sum to zero, got {}",
            config.mission_metrics.values().sum::<f64>()
        ));
    }

    // Thresholds
    let t = &config.thresholds;
    for (name, value) in [("safety", t.safety), ("target", t.target), ("reach", t.reach)] {
        if !(0.0..=1.0).contains(&value) {
            errors.push(format!(
                "institution.thresholds.{}: must be between 0 and 1, got {}",
                name, value
            ));
        }
    }
    if !(t.safety >= t.target && t.target >= t.reach) {
        errors.push(format!(
            "institution.thresholds: expected safety >= target >= reach, got {} / {} / {}",
            t.safety, t.target, t.reach
        ));
    }

    // Confidence gates
    let g = &config.confidence_gates;
    for (name, value) in [("safety", g.safety), ("target", g.target)] {
        if !(0.0..=1.0).contains(&value) {
            errors.push(format!(
                "institution.confidence_gates.{}: must be between 0 and 1, got {}",
                name, value
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
