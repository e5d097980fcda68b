//! Multi-source crawl: registry dispatch, per-source isolation, ordered
//! aggregation.

use futures::stream::{self, StreamExt};
use techfeed_core::{CanonicalPost, Organization, SourceConfig};
use tracing::{error, info, warn};

use crate::processor::{FeedProcessor, FeedResult};
use crate::registry::{SourceRegistry, SourceType};

/// Counters for one crawl.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlReport {
    pub sources_configured: usize,
    pub sources_processed: usize,
    pub sources_unknown: usize,
    pub sources_failed: usize,
    pub entries_skipped: usize,
    pub entries_failed: usize,
    pub posts_found: usize,
}

/// Posts from every source, in configured source order then feed order.
#[derive(Debug, Clone, Default)]
pub struct IngestRun {
    pub posts: Vec<CanonicalPost>,
    pub report: CrawlReport,
}

enum SourceOutcome {
    Processed(FeedResult),
    Unknown,
    Failed,
}

pub struct Orchestrator {
    registry: SourceRegistry,
    processor: FeedProcessor,
    max_concurrent_sources: usize,
}

impl Orchestrator {
    /// `max_concurrent_sources` bounds how many sources are in flight at
    /// once; `1` processes them one after another.
    #[must_use]
    pub fn new(
        registry: SourceRegistry,
        processor: FeedProcessor,
        max_concurrent_sources: usize,
    ) -> Self {
        Self {
            registry,
            processor,
            max_concurrent_sources: max_concurrent_sources.max(1),
        }
    }

    /// Crawl every configured source. Unknown sources are skipped with a
    /// warning and a failed source yields zero posts; neither stops the run.
    pub async fn run(&self, sources: &[SourceConfig], default_max_posts: usize) -> IngestRun {
        let outcomes: Vec<SourceOutcome> = stream::iter(sources)
            .map(|source| self.run_source(source, default_max_posts))
            .buffered(self.max_concurrent_sources)
            .collect()
            .await;

        let mut run = IngestRun {
            posts: Vec::new(),
            report: CrawlReport {
                sources_configured: sources.len(),
                ..CrawlReport::default()
            },
        };

        for outcome in outcomes {
            match outcome {
                SourceOutcome::Processed(result) => {
                    run.report.sources_processed += 1;
                    run.report.entries_skipped += result.entries_skipped;
                    run.report.entries_failed += result.entries_failed;
                    run.posts.extend(result.posts);
                }
                SourceOutcome::Unknown => run.report.sources_unknown += 1,
                SourceOutcome::Failed => run.report.sources_failed += 1,
            }
        }
        run.report.posts_found = run.posts.len();

        info!(
            configured = run.report.sources_configured,
            processed = run.report.sources_processed,
            unknown = run.report.sources_unknown,
            failed = run.report.sources_failed,
            posts = run.report.posts_found,
            "crawl complete"
        );
        run
    }

    async fn run_source(&self, source: &SourceConfig, default_max_posts: usize) -> SourceOutcome {
        let Some(source_type) = self.registry.detect(&source.feed_url, source.organization) else {
            warn!(feed_url = %source.feed_url, "unknown source type; skipping");
            return SourceOutcome::Unknown;
        };

        let (display_name, organization) = resolve_metadata(source, source_type);
        let max_posts = source.max_posts.unwrap_or(default_max_posts);

        match self
            .processor
            .process(&source.feed_url, max_posts, &display_name, organization)
            .await
        {
            Ok(result) => SourceOutcome::Processed(result),
            Err(e) => {
                error!(
                    source = %display_name,
                    feed_url = %source.feed_url,
                    error = %e,
                    "source failed"
                );
                SourceOutcome::Failed
            }
        }
    }
}

/// Configured display name and organization, else the source type defaults.
fn resolve_metadata(
    source: &SourceConfig,
    source_type: SourceType,
) -> (String, Organization) {
    let display_name = source
        .display_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(source_type.display_name())
        .to_string();
    let organization = source.organization.unwrap_or(source_type.organization());
    (display_name, organization)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_defaults_come_from_source_type() {
        let source = SourceConfig::new("https://toss.tech/atom.xml");
        let (name, org) = resolve_metadata(&source, SourceType::TossTech);
        assert_eq!(name, "Toss Tech");
        assert_eq!(org, Organization::Toss);
    }

    #[test]
    fn metadata_overrides_come_from_config() {
        let source = SourceConfig::new("https://toss.tech/atom.xml")
            .with_display_name("  Toss Engineering ")
            .with_organization(Organization::Other);
        let (name, org) = resolve_metadata(&source, SourceType::TossTech);
        assert_eq!(name, "Toss Engineering");
        assert_eq!(org, Organization::Other);
    }

    #[test]
    fn blank_display_name_uses_default() {
        let source = SourceConfig::new("https://toss.tech/atom.xml").with_display_name("   ");
        let (name, _) = resolve_metadata(&source, SourceType::TossTech);
        assert_eq!(name, "Toss Tech");
    }
}
