//! [`PostStore`] backed by the `company_posts` table.

use async_trait::async_trait;
use sqlx::PgPool;
use techfeed_core::EnrichedPost;
use techfeed_db::DbError;
use techfeed_enrich::{PostStore, StoreError};

pub(crate) struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn store_error(err: DbError) -> StoreError {
    match err {
        DbError::Integrity(reason) => StoreError::Integrity(reason),
        other => StoreError::Unavailable(other.to_string()),
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn exists_by_dedup_key(&self, dedup_key: &str) -> Result<bool, StoreError> {
        techfeed_db::post_exists_by_dedup_key(&self.pool, dedup_key)
            .await
            .map_err(store_error)
    }

    async fn insert_batch(&self, posts: &[EnrichedPost]) -> Result<usize, StoreError> {
        techfeed_db::insert_posts_batch(&self.pool, posts)
            .await
            .map_err(store_error)
    }
}
