use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::types::{DataSource, SchoolProfile};

/// Standard deviation assumed for CDE-derived GPA estimates
const CDE_GPA_STD: f64 = 0.25;

/// One ranked source of school statistics.
///
/// `Ok(None)` means the source has nothing for this school. Errors are
/// treated the same way by the resolver, after being logged.
pub trait DataSourceProvider: Send + Sync {
    /// Short name used in log messages
    fn name(&self) -> &str;

    fn fetch(&self, school_id: &str) -> Result<Option<SchoolProfile>>;
}

/// National statistics registry record
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NcesRecord {
    pub school_name: String,
    #[serde(default)]
    pub gpa_mean: Option<f64>,
    #[serde(default)]
    pub gpa_std: Option<f64>,
    #[serde(default)]
    pub ap_courses: Option<u32>,
}

/// Primary source: national education statistics keyed by school id.
#[derive(Debug, Clone, Default)]
pub struct NcesRegistry {
    records: HashMap<String, NcesRecord>,
}

impl NcesRegistry {
    pub fn new(records: HashMap<String, NcesRecord>) -> Self {
        Self { records }
    }

    /// Load registry records from a YAML map of school id to record
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::new(load_records(path)?))
    }
}

impl DataSourceProvider for NcesRegistry {
    fn name(&self) -> &str {
        "nces"
    }

    fn fetch(&self, school_id: &str) -> Result<Option<SchoolProfile>> {
        Ok(self.records.get(school_id).map(|r| SchoolProfile {
            id: school_id.to_string(),
            name: r.school_name.clone(),
            gpa_mean: r.gpa_mean,
            gpa_std: r.gpa_std,
            competitiveness: None,
            ap_courses: r.ap_courses,
            data_source: DataSource::Nces,
        }))
    }
}

/// Regional (California) education department record
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CdeRecord {
    pub school_name: String,
    /// Share of graduates meeting UC/CSU entrance requirements, 0.0 to 1.0
    #[serde(default)]
    pub uc_csu_eligibility: Option<f64>,
    #[serde(default)]
    pub ap_count: Option<u32>,
}

/// Secondary source: regional registry that reports eligibility rates
/// rather than GPA, so the mean is derived.
#[derive(Debug, Clone, Default)]
pub struct CdeRegistry {
    records: HashMap<String, CdeRecord>,
}

impl CdeRegistry {
    pub fn new(records: HashMap<String, CdeRecord>) -> Self {
        Self { records }
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::new(load_records(path)?))
    }
}

impl DataSourceProvider for CdeRegistry {
    fn name(&self) -> &str {
        "cde"
    }

    fn fetch(&self, school_id: &str) -> Result<Option<SchoolProfile>> {
        let Some(record) = self.records.get(school_id) else {
            return Ok(None);
        };

        let gpa_mean = record.uc_csu_eligibility.map(eligibility_to_gpa);
        Ok(Some(SchoolProfile {
            id: school_id.to_string(),
            name: record.school_name.clone(),
            gpa_mean,
            gpa_std: gpa_mean.map(|_| CDE_GPA_STD),
            competitiveness: None,
            ap_courses: record.ap_count,
            data_source: DataSource::Cde,
        }))
    }
}

/// Convert a UC/CSU eligibility rate to an estimated mean GPA.
///
/// California-specific linear calibration, rounded to one decimal place.
pub fn eligibility_to_gpa(eligibility_rate: f64) -> f64 {
    ((3.0 + eligibility_rate * 0.7) * 10.0).round() / 10.0
}

fn load_records<T>(path: &Path) -> Result<HashMap<String, T>>
where
    T: for<'de> Deserialize<'de>,
{
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read registry file at {}", path.display()))?;

    serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse registry: invalid YAML in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn nces_record(gpa_mean: Option<f64>) -> NcesRecord {
        NcesRecord {
            school_name: "Sample High School".to_string(),
            gpa_mean,
            gpa_std: Some(0.3),
            ap_courses: Some(15),
        }
    }

    #[test]
    fn test_eligibility_to_gpa() {
        assert_eq!(eligibility_to_gpa(0.72), 3.5);
        assert_eq!(eligibility_to_gpa(0.0), 3.0);
        assert_eq!(eligibility_to_gpa(1.0), 3.7);
    }

    #[test]
    fn test_nces_hit() {
        let registry = NcesRegistry::new(HashMap::from([(
            "nces_12345".to_string(),
            nces_record(Some(3.4)),
        )]));
        let profile = registry.fetch("nces_12345").unwrap().unwrap();
        assert_eq!(profile.name, "Sample High School");
        assert_eq!(profile.gpa_mean, Some(3.4));
        assert_eq!(profile.gpa_std, Some(0.3));
        assert_eq!(profile.ap_courses, Some(15));
        assert_eq!(profile.data_source, DataSource::Nces);
    }

    #[test]
    fn test_nces_miss() {
        let registry = NcesRegistry::default();
        assert!(registry.fetch("nowhere").unwrap().is_none());
    }

    #[test]
    fn test_cde_derives_gpa() {
        let registry = CdeRegistry::new(HashMap::from([(
            "ca_1".to_string(),
            CdeRecord {
                school_name: "CA Sample High".to_string(),
                uc_csu_eligibility: Some(0.72),
                ap_count: Some(22),
            },
        )]));
        let profile = registry.fetch("ca_1").unwrap().unwrap();
        assert_eq!(profile.gpa_mean, Some(3.5));
        assert_eq!(profile.gpa_std, Some(0.25));
        assert_eq!(profile.ap_courses, Some(22));
        assert_eq!(profile.data_source, DataSource::Cde);
    }

    #[test]
    fn test_cde_without_eligibility_is_partial() {
        let registry = CdeRegistry::new(HashMap::from([(
            "ca_2".to_string(),
            CdeRecord {
                school_name: "CA Partial High".to_string(),
                uc_csu_eligibility: None,
                ap_count: Some(10),
            },
        )]));
        let profile = registry.fetch("ca_2").unwrap().unwrap();
        assert!(profile.gpa_mean.is_none());
        assert!(profile.gpa_std.is_none());
        assert_eq!(profile.ap_courses, Some(10));
    }

    #[test]
    fn test_load_registry_file() {
        let temp_path = env::temp_dir().join("admit_score_test_nces.yaml");
        std::fs::write(
            &temp_path,
            "HS_1:\n  school_name: One High\n  gpa_mean: 3.1\n  gpa_std: 0.4\n",
        )
        .unwrap();

        let registry = NcesRegistry::load(&temp_path).unwrap();
        let profile = registry.fetch("HS_1").unwrap().unwrap();
        assert_eq!(profile.gpa_mean, Some(3.1));
        assert!(profile.ap_courses.is_none());

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_load_missing_registry_errors() {
        let temp_path = env::temp_dir().join("admit_score_test_missing_registry.yaml");
        let _ = std::fs::remove_file(&temp_path);
        assert!(CdeRegistry::load(&temp_path).is_err());
    }
}
