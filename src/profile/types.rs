use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a school profile's GPA statistics came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Nces,
    Cde,
    WebScraping,
    Estimated,
    #[default]
    Unknown,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DataSource::Nces => "nces",
            DataSource::Cde => "cde",
            DataSource::WebScraping => "web_scraping",
            DataSource::Estimated => "estimated",
            DataSource::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Statistical profile of a high school, used to put a GPA in context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchoolProfile {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub gpa_mean: Option<f64>,

    #[serde(default)]
    pub gpa_std: Option<f64>,

    /// Grading-rigor multiplier; 1.0 when absent
    #[serde(default)]
    pub competitiveness: Option<f64>,

    #[serde(default)]
    pub ap_courses: Option<u32>,

    #[serde(default)]
    pub data_source: DataSource,
}

impl SchoolProfile {
    /// A profile with nothing known beyond its id
    pub fn unknown(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: "Unknown School".to_string(),
            gpa_mean: None,
            gpa_std: None,
            competitiveness: None,
            ap_courses: None,
            data_source: DataSource::Unknown,
        }
    }

    pub fn competitiveness(&self) -> f64 {
        self.competitiveness.unwrap_or(1.0)
    }

    pub fn has_gpa_stats(&self) -> bool {
        self.gpa_mean.is_some()
    }
}
