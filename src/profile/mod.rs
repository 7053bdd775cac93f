pub mod resolver;
pub mod scrape;
pub mod sources;
pub mod types;

pub use resolver::{estimate_gpa_stats, ProfileLookup, ProfileResolver, StaticProfiles};
pub use scrape::WebScraper;
pub use sources::{eligibility_to_gpa, CdeRecord, CdeRegistry, DataSourceProvider, NcesRecord, NcesRegistry};
pub use types::{DataSource, SchoolProfile};

use anyhow::{Context, Result};

use crate::config::SourcesConfig;

/// Build the ranked source chain from config: NCES, then CDE, then the
/// web scraper. Sources without configuration are left out.
pub fn build_sources(config: &SourcesConfig) -> Result<Vec<Box<dyn DataSourceProvider>>> {
    let mut sources: Vec<Box<dyn DataSourceProvider>> = Vec::new();

    if let Some(ref path) = config.nces_registry {
        sources.push(Box::new(NcesRegistry::load(path)?));
    }

    if let Some(ref path) = config.cde_registry {
        sources.push(Box::new(CdeRegistry::load(path)?));
    }

    if let Some(ref scraper) = config.scraper {
        if scraper.enabled {
            let timeout = humantime::parse_duration(&scraper.timeout)
                .with_context(|| format!("Invalid scraper timeout '{}'", scraper.timeout))?;
            sources.push(Box::new(WebScraper::new(&scraper.url_template, timeout)?));
        }
    }

    Ok(sources)
}
