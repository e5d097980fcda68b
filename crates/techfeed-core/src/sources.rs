use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::organization::Organization;
use crate::urls::canonicalize;
use crate::ConfigError;

/// One configured feed. Unset fields fall back to the registry defaults for
/// the detected source type and to the run-level post cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub feed_url: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub organization: Option<Organization>,
    #[serde(default)]
    pub max_posts: Option<usize>,
}

impl SourceConfig {
    #[must_use]
    pub fn new(feed_url: &str) -> Self {
        Self {
            feed_url: feed_url.to_string(),
            display_name: None,
            organization: None,
            max_posts: None,
        }
    }

    #[must_use]
    pub fn with_organization(mut self, organization: Organization) -> Self {
        self.organization = Some(organization);
        self
    }

    #[must_use]
    pub fn with_display_name(mut self, display_name: &str) -> Self {
        self.display_name = Some(display_name.to_string());
        self
    }
}

#[derive(Debug, Deserialize)]
pub struct SourcesFile {
    pub sources: Vec<SourceConfig>,
}

/// Load and validate the sources configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_sources(path: &Path) -> Result<SourcesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SourcesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let sources_file: SourcesFile = serde_yaml::from_str(&content)?;

    validate_sources(&sources_file)?;

    Ok(sources_file)
}

/// The feeds crawled when no sources file is configured.
#[must_use]
pub fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig::new("https://d2.naver.com/d2.atom")
            .with_display_name("Naver D2")
            .with_organization(Organization::Naver),
        SourceConfig::new("https://tech.kakao.com/feed")
            .with_display_name("Kakao Tech")
            .with_organization(Organization::Kakao),
        SourceConfig::new("https://politepol.com/fd/XiV8r39FL4YI")
            .with_display_name("DEVOCEAN Tech Blog")
            .with_organization(Organization::Devocean),
        SourceConfig::new("https://toss.tech/atom.xml")
            .with_display_name("Toss Tech")
            .with_organization(Organization::Toss),
        SourceConfig::new("https://medium.com/feed/myrealtrip-product")
            .with_display_name("MyRealTrip Product & Tech")
            .with_organization(Organization::MyRealTrip),
        SourceConfig::new("https://techblog.lycorp.co.jp/ko/feed/index.xml")
            .with_display_name("LINE Tech Blog")
            .with_organization(Organization::Line),
        SourceConfig::new("https://medium.com/feed/daangn")
            .with_display_name("Daangn Tech")
            .with_organization(Organization::Daangn),
        SourceConfig::new("https://oliveyoung.tech/rss.xml")
            .with_display_name("Olive Young Tech")
            .with_organization(Organization::OliveYoung),
    ]
}

fn validate_sources(sources_file: &SourcesFile) -> Result<(), ConfigError> {
    let mut seen_urls = HashSet::new();

    for source in &sources_file.sources {
        let feed_url = source.feed_url.trim();
        if feed_url.is_empty() {
            return Err(ConfigError::Validation(
                "feed_url must be non-empty".to_string(),
            ));
        }

        let parsed = url::Url::parse(feed_url).map_err(|e| {
            ConfigError::Validation(format!("feed_url '{feed_url}' is not a valid URL: {e}"))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "feed_url '{feed_url}' must use http or https"
            )));
        }

        if source.max_posts == Some(0) {
            return Err(ConfigError::Validation(format!(
                "source '{feed_url}' has max_posts 0; must be at least 1"
            )));
        }

        if !seen_urls.insert(canonicalize(feed_url)) {
            return Err(ConfigError::Validation(format!(
                "duplicate feed_url: '{feed_url}'"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "sources_test.rs"]
mod tests;
