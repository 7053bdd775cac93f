use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use super::sources::DataSourceProvider;
use super::types::{DataSource, SchoolProfile};

/// Capability to find a school's profile. `None` is a lookup miss.
pub trait ProfileLookup: Send + Sync {
    fn lookup(&self, school_id: &str) -> Option<SchoolProfile>;
}

/// Fixed table of profiles supplied by the caller, typically from config.
#[derive(Debug, Clone, Default)]
pub struct StaticProfiles {
    profiles: HashMap<String, SchoolProfile>,
}

impl StaticProfiles {
    pub fn new(profiles: HashMap<String, SchoolProfile>) -> Self {
        Self { profiles }
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl FromIterator<SchoolProfile> for StaticProfiles {
    fn from_iter<I: IntoIterator<Item = SchoolProfile>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|p| (p.id.clone(), p)).collect())
    }
}

impl ProfileLookup for StaticProfiles {
    fn lookup(&self, school_id: &str) -> Option<SchoolProfile> {
        self.profiles.get(school_id).cloned()
    }
}

/// Resolves school profiles through ranked data sources with a
/// process-lifetime cache.
///
/// Resolution never fails: when no source has a GPA mean the profile is
/// completed by [`estimate_gpa_stats`]. Each school id is resolved at most
/// once, even under concurrent misses on the same id.
pub struct ProfileResolver {
    sources: Vec<Box<dyn DataSourceProvider>>,
    cache: DashMap<String, Arc<OnceLock<SchoolProfile>>>,
}

impl ProfileResolver {
    /// Sources are tried in the given order
    pub fn new(sources: Vec<Box<dyn DataSourceProvider>>) -> Self {
        Self {
            sources,
            cache: DashMap::new(),
        }
    }

    pub fn resolve(&self, school_id: &str) -> SchoolProfile {
        if let Some(cell) = self.cache.get(school_id) {
            if let Some(profile) = cell.value().get() {
                tracing::debug!(school_id, "school profile cache hit");
                return profile.clone();
            }
        }

        // Shard lock is released before resolving; the OnceLock serializes
        // concurrent resolvers of the same id.
        let cell = Arc::clone(&self.cache.entry(school_id.to_string()).or_default());
        cell.get_or_init(|| self.resolve_uncached(school_id)).clone()
    }

    /// Number of school ids with a cached profile
    pub fn cached_count(&self) -> usize {
        self.cache.iter().filter(|e| e.value().get().is_some()).count()
    }

    fn resolve_uncached(&self, school_id: &str) -> SchoolProfile {
        let mut partial: Option<SchoolProfile> = None;

        for source in &self.sources {
            match source.fetch(school_id) {
                Ok(Some(profile)) if profile.has_gpa_stats() => {
                    tracing::debug!(school_id, source = source.name(), "school profile resolved");
                    return fill_missing_std(profile);
                }
                Ok(Some(profile)) => {
                    tracing::debug!(school_id, source = source.name(), "partial school profile, no GPA mean");
                    partial.get_or_insert(profile);
                }
                Ok(None) => {
                    tracing::debug!(school_id, source = source.name(), "no data from source");
                }
                Err(e) => {
                    tracing::warn!(school_id, source = source.name(), error = %e, "school data source failed");
                }
            }
        }

        tracing::info!(school_id, "no GPA statistics from any source, estimating");
        estimate_gpa_stats(partial.unwrap_or_else(|| SchoolProfile::unknown(school_id)))
    }
}

impl ProfileLookup for ProfileResolver {
    fn lookup(&self, school_id: &str) -> Option<SchoolProfile> {
        Some(self.resolve(school_id))
    }
}

/// Fill GPA statistics from AP course count when no source had them.
///
/// With AP data: mean = 3.2 + 0.02 per course, std = 0.35.
/// Without: mean = 3.0, std = 0.4.
pub fn estimate_gpa_stats(mut profile: SchoolProfile) -> SchoolProfile {
    match profile.ap_courses {
        Some(ap) if ap > 0 => {
            profile.gpa_mean = Some(3.2 + ap as f64 * 0.02);
            profile.gpa_std = Some(0.35);
        }
        _ => {
            profile.gpa_mean = Some(3.0);
            profile.gpa_std = Some(0.4);
        }
    }
    profile.data_source = DataSource::Estimated;
    profile
}

fn fill_missing_std(mut profile: SchoolProfile) -> SchoolProfile {
    if profile.gpa_std.is_none() {
        profile.gpa_std = match profile.ap_courses {
            Some(ap) if ap > 0 => Some(0.35),
            _ => Some(0.4),
        };
    }
    profile
}
