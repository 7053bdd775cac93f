use std::collections::BTreeMap;

use crate::error::{ScoreError, ScoreOutcome};
use crate::student::Student;

pub const SCORE_CAP: f64 = 1.0;
pub const MAX_TEST_SCORE: f64 = 1600.0;
pub const GPA_SCALE: f64 = 4.0;
pub const GPA_WEIGHT: f64 = 0.6;
pub const TEST_WEIGHT: f64 = 0.4;

pub const LOW_INCOME_BONUS: f64 = 0.05;
pub const ADVERSITY_FACTOR: f64 = 0.1;
pub const UNDERREPRESENTED_FACTOR: f64 = 0.03;

pub const INTERSECTION_BONUS: f64 = 0.05;
pub const INTERSECTION_MIN_ADVERSITY: f64 = 0.7;
pub const INTERSECTION_MIN_LEADERSHIP: f64 = 0.5;

/// Smallest mission weight total treated as nonzero
pub const MIN_MISSION_WEIGHT_TOTAL: f64 = 1e-9;

/// Logistic function, kept strictly inside (0, 1) even where f64 would
/// round to an endpoint.
pub fn sigmoid(z: f64) -> f64 {
    (1.0 / (1.0 + (-z).exp())).clamp(f64::MIN_POSITIVE, 1.0 - f64::EPSILON)
}

/// Reject GPAs that can't be placed on any scale (NaN, infinite)
pub fn check_gpa(gpa: f64) -> ScoreOutcome<f64> {
    if !gpa.is_finite() {
        return Err(ScoreError::DataQuality(format!("GPA must be a finite number, got {}", gpa)));
    }
    Ok(gpa)
}

/// Standard score of a GPA within its school's distribution
pub fn z_score(gpa: f64, mean: f64, std: f64) -> ScoreOutcome<f64> {
    let gpa = check_gpa(gpa)?;
    if !mean.is_finite() {
        return Err(ScoreError::DataQuality(format!(
            "school GPA mean must be a finite number, got {}",
            mean
        )));
    }
    if !(std.is_finite() && std > 0.0) {
        return Err(ScoreError::DataQuality(format!(
            "school GPA standard deviation must be positive, got {}",
            std
        )));
    }
    Ok((gpa - mean) / std)
}

/// GPA relative to its school, mapped into (0, 1)
pub fn sigmoid_normalize(gpa: f64, mean: f64, std: f64) -> ScoreOutcome<f64> {
    z_score(gpa, mean, std).map(sigmoid)
}

/// GPA on a flat 4.0 scale, used when no school context is available
pub fn flat_normalize(gpa: f64) -> f64 {
    gpa / GPA_SCALE
}

pub fn normalize_test_score(test_score: u32) -> f64 {
    test_score as f64 / MAX_TEST_SCORE
}

/// Weighted GPA/test blend scaled by school competitiveness, before capping
pub fn blend_academic(gpa_norm: f64, test_norm: f64, competitiveness: f64) -> f64 {
    (gpa_norm * GPA_WEIGHT + test_norm * TEST_WEIGHT) * competitiveness
}

/// Total of the mission metric weights, if it can be divided by.
///
/// NaN or infinite totals and totals at or below `MIN_MISSION_WEIGHT_TOTAL`
/// (including weights that cancel out) yield None.
pub fn mission_weight_total(metrics: &BTreeMap<String, f64>) -> Option<f64> {
    let total: f64 = metrics.values().sum();
    (total.is_finite() && total > MIN_MISSION_WEIGHT_TOTAL).then_some(total)
}

/// Weight-normalized alignment over the institution's mission metrics
pub fn weighted_mission_fit(metrics: &BTreeMap<String, f64>, student: &Student) -> ScoreOutcome<f64> {
    let total_weight = mission_weight_total(metrics).ok_or_else(|| {
        ScoreError::Config(format!(
            "mission metric weights must sum to a positive number, got {}",
            metrics.values().sum::<f64>()
        ))
    })?;

    let fit: f64 = metrics
        .iter()
        .map(|(metric, weight)| student.alignment(metric) * weight)
        .sum();

    Ok(fit / total_weight)
}

/// Additive context bonus. The underrepresented-group term only counts when
/// `compliant` is true.
pub fn context_adjustments(student: &Student, compliant: bool) -> f64 {
    let ctx = &student.context;
    let mut adjustments = 0.0;

    if ctx.low_income {
        adjustments += LOW_INCOME_BONUS;
    }
    adjustments += ctx.adversity_score * ADVERSITY_FACTOR;
    if compliant {
        adjustments += ctx.underrepresented_group * UNDERREPRESENTED_FACTOR;
    }

    adjustments
}

/// Flat bonus when high adversity and strong leadership co-occur.
///
/// Simple two-threshold rule standing in for a fuller rubric.
pub fn intersectionality_bonus(student: &Student) -> f64 {
    if student.context.adversity_score > INTERSECTION_MIN_ADVERSITY
        && student.contributions.leadership > INTERSECTION_MIN_LEADERSHIP
    {
        INTERSECTION_BONUS
    } else {
        0.0
    }
}

pub fn cap(score: f64) -> f64 {
    score.min(SCORE_CAP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::student::{AcademicRecord, Contributions, SchoolContext};

    fn student(adversity: f64, leadership: f64, low_income: bool, underrep: f64) -> Student {
        Student {
            academic: AcademicRecord { gpa: 3.5, test_score: 1300 },
            context: SchoolContext {
                school_id: "HS_1".to_string(),
                low_income,
                adversity_score: adversity,
                underrepresented_group: underrep,
            },
            contributions: Contributions { total: 0.5, leadership },
            mission_alignment: BTreeMap::from([
                ("diversity".to_string(), 0.7),
                ("community_impact".to_string(), 0.8),
            ]),
        }
    }

    #[test]
    fn test_sigmoid_midpoint() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!((sigmoid(-0.5) - 0.377_540_668_798_145_4).abs() < 1e-12);
    }

    #[test]
    fn test_sigmoid_stays_open_interval() {
        for z in [-1000.0, -40.0, -1.0, 0.0, 1.0, 40.0, 1000.0] {
            let s = sigmoid(z);
            assert!(s > 0.0 && s < 1.0, "sigmoid({}) = {}", z, s);
        }
    }

    #[test]
    fn test_z_score_rejects_zero_std() {
        assert!(matches!(z_score(3.5, 3.0, 0.0), Err(ScoreError::DataQuality(_))));
        assert!(matches!(z_score(3.5, 3.0, -0.1), Err(ScoreError::DataQuality(_))));
        assert!(matches!(z_score(3.5, 3.0, f64::NAN), Err(ScoreError::DataQuality(_))));
    }

    #[test]
    fn test_non_finite_gpa_is_data_quality_error() {
        assert!(matches!(check_gpa(f64::NAN), Err(ScoreError::DataQuality(_))));
        assert!(matches!(check_gpa(f64::INFINITY), Err(ScoreError::DataQuality(_))));
        assert_eq!(check_gpa(3.2).unwrap(), 3.2);
        assert!(matches!(z_score(f64::NAN, 3.0, 0.3), Err(ScoreError::DataQuality(_))));
        assert!(matches!(z_score(3.5, f64::NAN, 0.3), Err(ScoreError::DataQuality(_))));
    }

    #[test]
    fn test_z_score() {
        assert!((z_score(3.7, 3.8, 0.2).unwrap() + 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_flat_normalize_not_capped() {
        assert_eq!(flat_normalize(3.0), 0.75);
        assert!(flat_normalize(4.4) > 1.0);
    }

    #[test]
    fn test_blend_academic() {
        let blended = blend_academic(0.5, 1.0, 1.0);
        assert!((blended - 0.7).abs() < 1e-12);
        let scaled = blend_academic(0.5, 1.0, 1.2);
        assert!((scaled - 0.84).abs() < 1e-12);
    }

    #[test]
    fn test_mission_fit_normalized_by_weight_sum() {
        let metrics = BTreeMap::from([
            ("diversity".to_string(), 0.4),
            ("community_impact".to_string(), 0.6),
        ]);
        let fit = weighted_mission_fit(&metrics, &student(0.0, 0.0, false, 0.0)).unwrap();
        assert!((fit - 0.76).abs() < 1e-9);

        let doubled = BTreeMap::from([
            ("diversity".to_string(), 0.8),
            ("community_impact".to_string(), 1.2),
        ]);
        let fit2 = weighted_mission_fit(&doubled, &student(0.0, 0.0, false, 0.0)).unwrap();
        assert!((fit - fit2).abs() < 1e-9);
    }

    #[test]
    fn test_mission_fit_unreported_metric_counts_zero() {
        let metrics = BTreeMap::from([("athletics".to_string(), 1.0)]);
        let fit = weighted_mission_fit(&metrics, &student(0.0, 0.0, false, 0.0)).unwrap();
        assert_eq!(fit, 0.0);
    }

    #[test]
    fn test_mission_fit_zero_weights_is_config_error() {
        let metrics = BTreeMap::from([
            ("diversity".to_string(), 0.0),
            ("community_impact".to_string(), 0.0),
        ]);
        let result = weighted_mission_fit(&metrics, &student(0.0, 0.0, false, 0.0));
        assert!(matches!(result, Err(ScoreError::Config(_))));

        let empty = BTreeMap::new();
        assert!(weighted_mission_fit(&empty, &student(0.0, 0.0, false, 0.0)).is_err());
    }

    #[test]
    fn test_mission_fit_cancelling_weights_is_config_error() {
        // 0.1 + 0.2 - 0.3 leaves ~5.5e-17 in f64
        let metrics = BTreeMap::from([
            ("diversity".to_string(), 0.1),
            ("community_impact".to_string(), 0.2),
            ("athletics".to_string(), -0.3),
        ]);
        let result = weighted_mission_fit(&metrics, &student(0.0, 0.0, false, 0.0));
        assert!(matches!(result, Err(ScoreError::Config(_))));
    }

    #[test]
    fn test_mission_fit_nan_weight_is_config_error() {
        let metrics = BTreeMap::from([("diversity".to_string(), f64::NAN)]);
        let result = weighted_mission_fit(&metrics, &student(0.0, 0.0, false, 0.0));
        assert!(matches!(result, Err(ScoreError::Config(_))));

        let negative = BTreeMap::from([("diversity".to_string(), -1.0)]);
        assert!(weighted_mission_fit(&negative, &student(0.0, 0.0, false, 0.0)).is_err());
    }

    #[test]
    fn test_context_adjustments() {
        let s = student(0.8, 0.0, true, 1.0);
        assert!((context_adjustments(&s, true) - 0.16).abs() < 1e-9);
        assert!((context_adjustments(&s, false) - 0.13).abs() < 1e-9);
        assert_eq!(context_adjustments(&student(0.0, 0.0, false, 0.0), true), 0.0);
    }

    #[test]
    fn test_intersectionality_requires_both() {
        assert_eq!(intersectionality_bonus(&student(0.8, 0.9, false, 0.0)), 0.05);
        assert_eq!(intersectionality_bonus(&student(0.8, 0.5, false, 0.0)), 0.0);
        assert_eq!(intersectionality_bonus(&student(0.7, 0.9, false, 0.0)), 0.0);
        assert_eq!(intersectionality_bonus(&student(0.2, 0.2, false, 0.0)), 0.0);
    }

    #[test]
    fn test_cap() {
        assert_eq!(cap(1.3), 1.0);
        assert_eq!(cap(0.4), 0.4);
        assert_eq!(cap(-0.2), -0.2);
    }
}
