//! Dedup, enrich, and persist one run's canonical posts.
//!
//! For each post, in order:
//!
//! 1. skip it if an earlier post in the same batch had the same dedup key
//! 2. skip it if storage already has the dedup key (before any summarizer call)
//! 3. summarize; a summarizer failure fails only this post
//! 4. relocate the thumbnail; a failure keeps the original URL
//!
//! The surviving posts are then written in a single transaction. An integrity
//! violation rolls the whole batch back and counts every post as failed. A
//! storage outage aborts the run.

use std::collections::HashSet;

use async_trait::async_trait;
use techfeed_core::{CanonicalPost, EnrichedPost};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::images::ThumbnailRelocator;
use crate::summarizer::Summarizer;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A constraint rejected the write. The transaction was rolled back.
    #[error("integrity violation: {0}")]
    Integrity(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Persistence operations the pipeline needs.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the lookup cannot be made.
    async fn exists_by_dedup_key(&self, dedup_key: &str) -> Result<bool, StoreError>;

    /// Insert every post or none of them. Returns the number inserted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Integrity`] when a constraint rejects any row
    /// (nothing is committed) or [`StoreError::Unavailable`] on connection
    /// failure.
    async fn insert_batch(&self, posts: &[EnrichedPost]) -> Result<usize, StoreError>;
}

/// Counters for one persist pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistReport {
    pub duplicates: usize,
    pub saved: usize,
    pub failed: usize,
}

pub struct PersistPipeline<'a> {
    store: &'a dyn PostStore,
    summarizer: &'a dyn Summarizer,
    relocator: Option<&'a ThumbnailRelocator>,
}

impl<'a> PersistPipeline<'a> {
    #[must_use]
    pub fn new(
        store: &'a dyn PostStore,
        summarizer: &'a dyn Summarizer,
        relocator: Option<&'a ThumbnailRelocator>,
    ) -> Self {
        Self {
            store,
            summarizer,
            relocator,
        }
    }

    /// Enrich and persist `posts`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when storage cannot be reached.
    /// Integrity violations are reported through [`PersistReport::failed`].
    pub async fn persist(&self, posts: Vec<CanonicalPost>) -> Result<PersistReport, StoreError> {
        let mut report = PersistReport::default();
        let mut seen = HashSet::new();
        let mut batch = Vec::new();

        for post in posts {
            if !seen.insert(post.dedup_key().to_string()) {
                info!(url = %post.source_url(), "duplicate within batch; skipping");
                report.duplicates += 1;
                continue;
            }
            if self.store.exists_by_dedup_key(post.dedup_key()).await? {
                info!(url = %post.source_url(), "already stored; skipping");
                report.duplicates += 1;
                continue;
            }
            match self.enrich(post).await {
                Some(enriched) => batch.push(enriched),
                None => report.failed += 1,
            }
        }

        if batch.is_empty() {
            return Ok(report);
        }

        match self.store.insert_batch(&batch).await {
            Ok(saved) => report.saved += saved,
            Err(StoreError::Integrity(reason)) => {
                error!(posts = batch.len(), %reason, "batch insert rolled back");
                report.failed += batch.len();
            }
            Err(e @ StoreError::Unavailable(_)) => return Err(e),
        }
        Ok(report)
    }

    async fn enrich(&self, post: CanonicalPost) -> Option<EnrichedPost> {
        let summary = match self.summarizer.summarize(post.body_text()).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(url = %post.source_url(), error = %e, "summarization failed");
                return None;
            }
        };

        let mut thumbnail_url = post.thumbnail_url().map(str::to_string);
        if let (Some(relocator), Some(original)) = (self.relocator, post.thumbnail_url()) {
            if let Some(relocated) = relocator.relocate(original, post.organization()).await {
                thumbnail_url = Some(relocated);
            }
        }

        Some(EnrichedPost {
            post,
            summary: summary.summary,
            category: summary.category,
            thumbnail_url,
        })
    }
}
