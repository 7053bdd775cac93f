use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::profile::SchoolProfile;
use crate::scoring::InstitutionConfig;

/// Top-level config file.
///
/// Example YAML:
/// ```yaml
/// institution:
///   weights: { academic: 0.4, contributions: 0.3, mission_fit: 0.3 }
///   mission_metrics: { diversity: 0.4, community_impact: 0.6 }
/// sources:
///   nces_registry: /var/lib/admit-score/nces.yaml
///   scraper:
///     url_template: "https://www.{id}.edu/profile"
///     timeout: 10s
/// audit_log: /var/log/admit-score/audit.json
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Weighting scheme; the built-in default is used when absent
    #[serde(default)]
    pub institution: Option<InstitutionConfig>,

    /// Fixed school profiles. When set, scoring looks schools up here
    /// instead of resolving them through `sources`.
    #[serde(default)]
    pub school_profiles: Option<Vec<SchoolProfile>>,

    #[serde(default)]
    pub sources: Option<SourcesConfig>,

    /// Where `score` writes its audit trail as JSON
    #[serde(default)]
    pub audit_log: Option<PathBuf>,

    /// Historical outcome file used by `record`
    #[serde(default)]
    pub outcomes: Option<PathBuf>,
}

/// Ranked school data sources
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SourcesConfig {
    /// YAML map of school id to national registry record
    #[serde(default)]
    pub nces_registry: Option<PathBuf>,

    /// YAML map of school id to regional registry record
    #[serde(default)]
    pub cde_registry: Option<PathBuf>,

    #[serde(default)]
    pub scraper: Option<ScraperConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScraperConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Profile page URL with `{id}` in place of the school id
    pub url_template: String,

    /// Request timeout, e.g. "10s" or "1500ms"
    #[serde(default = "default_timeout")]
    pub timeout: String,
}

fn default_enabled() -> bool {
    true
}

fn default_timeout() -> String {
    "10s".to_string()
}
