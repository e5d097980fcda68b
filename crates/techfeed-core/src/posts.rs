use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::organization::{Field, Organization};
use crate::urls::canonicalize;

/// One blog post normalized out of a feed entry.
///
/// `dedup_key` is always derived from `source_url` at construction; fields
/// are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalPost {
    title: String,
    body_text: String,
    source_url: String,
    dedup_key: String,
    source_name: String,
    organization: Organization,
    thumbnail_url: Option<String>,
    published_at: DateTime<Utc>,
    published_at_fallback: bool,
}

impl CanonicalPost {
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        title: String,
        body_text: String,
        source_url: String,
        source_name: String,
        organization: Organization,
        thumbnail_url: Option<String>,
        published_at: DateTime<Utc>,
        published_at_fallback: bool,
    ) -> Self {
        let dedup_key = canonicalize(&source_url);
        Self {
            title,
            body_text,
            source_url,
            dedup_key,
            source_name,
            organization,
            thumbnail_url,
            published_at,
            published_at_fallback,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Plain text with markup removed.
    #[must_use]
    pub fn body_text(&self) -> &str {
        &self.body_text
    }

    /// The URL exactly as the feed published it.
    #[must_use]
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    #[must_use]
    pub fn dedup_key(&self) -> &str {
        &self.dedup_key
    }

    #[must_use]
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    #[must_use]
    pub fn organization(&self) -> Organization {
        self.organization
    }

    #[must_use]
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.thumbnail_url.as_deref()
    }

    #[must_use]
    pub fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }

    /// `true` when no feed date parsed and `published_at` is the crawl time.
    #[must_use]
    pub fn published_at_fallback(&self) -> bool {
        self.published_at_fallback
    }
}

/// A canonical post after summarization and thumbnail relocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedPost {
    pub post: CanonicalPost,
    pub summary: String,
    pub category: Field,
    /// Relocated URL when the upload succeeded, otherwise the original (if any).
    pub thumbnail_url: Option<String>,
}
