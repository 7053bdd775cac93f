use anyhow::{bail, Context, Result};
use regex::Regex;
use std::time::Duration;

use super::sources::DataSourceProvider;
use super::types::{DataSource, SchoolProfile};

/// Standard deviation assumed for scraped GPA means
const SCRAPED_GPA_STD: f64 = 0.3;

/// Last-resort source: the school's own public profile page.
///
/// `url_template` must contain `{id}`, e.g. `https://www.{id}.edu/profile`.
pub struct WebScraper {
    client: reqwest::blocking::Client,
    url_template: String,
    name_re: Regex,
    gpa_re: Regex,
    tag_re: Regex,
}

impl WebScraper {
    pub fn new(url_template: &str, timeout: Duration) -> Result<Self> {
        if !url_template.contains("{id}") {
            bail!("Scraper URL template must contain {{id}}: {}", url_template);
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("admit-score/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url_template: url_template.to_string(),
            name_re: Regex::new(r#"(?is)<h1[^>]*class="[^"]*\bschool-name\b[^"]*"[^>]*>(.*?)</h1>"#)?,
            gpa_re: Regex::new(r"Average GPA:\s*([0-9]+(?:\.[0-9]+)?)")?,
            tag_re: Regex::new(r"<[^>]*>")?,
        })
    }

    /// Page URL for a school. Ids are limited to `[A-Za-z0-9_-]` so they
    /// can't change the host or path of the template.
    pub fn url_for(&self, school_id: &str) -> Result<String> {
        let valid = !school_id.is_empty()
            && school_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            bail!("School id {:?} is not safe to use in a URL", school_id);
        }
        Ok(self.url_template.replace("{id}", school_id))
    }

    /// Extract a profile from a school profile page
    pub fn parse_page(&self, school_id: &str, html: &str) -> Result<SchoolProfile> {
        let raw_name = self
            .name_re
            .captures(html)
            .and_then(|c| c.get(1))
            .context("No school-name heading on page")?
            .as_str();
        let name = self.tag_re.replace_all(raw_name, "").trim().to_string();

        let gpa_text = self.tag_re.replace_all(html, " ");
        let gpa_mean: f64 = self
            .gpa_re
            .captures(&gpa_text)
            .and_then(|c| c.get(1))
            .context("No average GPA on page")?
            .as_str()
            .parse()
            .context("Average GPA is not a number")?;

        Ok(SchoolProfile {
            id: school_id.to_string(),
            name,
            gpa_mean: Some(gpa_mean),
            gpa_std: Some(SCRAPED_GPA_STD),
            competitiveness: None,
            ap_courses: None,
            data_source: DataSource::WebScraping,
        })
    }
}

impl DataSourceProvider for WebScraper {
    fn name(&self) -> &str {
        "web_scraping"
    }

    fn fetch(&self, school_id: &str) -> Result<Option<SchoolProfile>> {
        let url = self.url_for(school_id)?;
        tracing::debug!(%url, "scraping school profile");

        let body = self
            .client
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("Request to {} failed", url))?
            .text()
            .context("Failed to read response body")?;

        self.parse_page(school_id, &body).map(Some)
    }
}
