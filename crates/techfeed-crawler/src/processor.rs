//! Per-source feed processing: fetch, parse, and normalize entries.

use std::fmt;

use techfeed_core::{CanonicalPost, Organization};
use tracing::{debug, info, warn};

use crate::client::FeedClient;
use crate::entry::{parse_feed, FeedEntry};
use crate::error::CrawlerError;
use crate::extract::{extract_content, extract_date, extract_link};
use crate::html::{absolutize, strip_html};
use crate::thumbnail::ThumbnailResolver;

const UNTITLED: &str = "Untitled";

/// Why an entry produced no post, when it is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingLink,
    MissingContent,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingLink => f.write_str("no resolvable link"),
            SkipReason::MissingContent => f.write_str("no body text"),
        }
    }
}

/// Result of normalizing one feed entry.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    Post(CanonicalPost),
    Skipped(SkipReason),
    Failed(String),
}

/// Posts and per-entry counters for one source.
#[derive(Debug, Clone, Default)]
pub struct FeedResult {
    pub posts: Vec<CanonicalPost>,
    pub entries_skipped: usize,
    pub entries_failed: usize,
}

impl FeedResult {
    fn record(&mut self, outcome: EntryOutcome) {
        match outcome {
            EntryOutcome::Post(post) => self.posts.push(post),
            EntryOutcome::Skipped(_) => self.entries_skipped += 1,
            EntryOutcome::Failed(_) => self.entries_failed += 1,
        }
    }
}

/// Turns one source's feed into canonical posts.
#[derive(Debug, Clone)]
pub struct FeedProcessor {
    client: FeedClient,
    thumbnails: ThumbnailResolver,
}

impl FeedProcessor {
    #[must_use]
    pub fn new(client: FeedClient) -> Self {
        let thumbnails = ThumbnailResolver::new(client.clone());
        Self { client, thumbnails }
    }

    /// Fetch `feed_url` and normalize its first `max_posts` entries, in feed
    /// order. Entries that cannot be normalized are counted and logged; they
    /// never abort the rest of the feed.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlerError`] when the feed itself cannot be fetched or
    /// parsed.
    pub async fn process(
        &self,
        feed_url: &str,
        max_posts: usize,
        display_name: &str,
        organization: Organization,
    ) -> Result<FeedResult, CrawlerError> {
        let bytes = self.client.fetch_feed(feed_url).await?;
        let entries = parse_feed(&bytes, feed_url)?;
        debug!(
            source = %display_name,
            feed_url,
            entries = entries.len(),
            "feed parsed"
        );

        let mut result = FeedResult::default();
        for entry in entries.iter().take(max_posts) {
            let outcome = self
                .process_entry(entry, feed_url, display_name, organization)
                .await;
            match &outcome {
                EntryOutcome::Post(_) => {}
                EntryOutcome::Skipped(reason) => {
                    warn!(
                        source = %display_name,
                        title = entry.title().unwrap_or_default(),
                        %reason,
                        "entry dropped"
                    );
                }
                EntryOutcome::Failed(reason) => {
                    warn!(
                        source = %display_name,
                        title = entry.title().unwrap_or_default(),
                        %reason,
                        "entry failed"
                    );
                }
            }
            result.record(outcome);
        }

        info!(
            source = %display_name,
            posts = result.posts.len(),
            skipped = result.entries_skipped,
            failed = result.entries_failed,
            "source processed"
        );
        Ok(result)
    }

    /// Normalize one entry. Never fails: problems become
    /// [`EntryOutcome::Skipped`] or [`EntryOutcome::Failed`].
    pub async fn process_entry(
        &self,
        entry: &FeedEntry,
        feed_url: &str,
        display_name: &str,
        organization: Organization,
    ) -> EntryOutcome {
        let Some(raw_link) = extract_link(entry) else {
            return EntryOutcome::Skipped(SkipReason::MissingLink);
        };
        // Absolute links are kept verbatim; relative ones resolve against the feed.
        let link = match absolutize(Some(feed_url), &raw_link) {
            Some(_) if url::Url::parse(&raw_link).is_ok() => raw_link,
            Some(resolved) => resolved,
            None => {
                return EntryOutcome::Failed(format!("link is not an http(s) URL: {raw_link}"));
            }
        };
        let Some(body_text) = extract_content(entry) else {
            return EntryOutcome::Skipped(SkipReason::MissingContent);
        };

        let date = extract_date(entry);
        if date.fallback {
            warn!(
                source = %display_name,
                url = %link,
                "no parseable publish date; using crawl time"
            );
        }

        let thumbnail_url = self.thumbnails.resolve(entry, Some(&link)).await;

        let title = entry
            .title()
            .map(strip_html)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());

        EntryOutcome::Post(CanonicalPost::new(
            title,
            body_text,
            link,
            display_name.to_string(),
            organization,
            thumbnail_url,
            date.value,
            date.fallback,
        ))
    }
}
