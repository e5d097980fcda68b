//! Database operations for `company_posts`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use techfeed_core::EnrichedPost;
use uuid::Uuid;

use crate::DbError;

/// A row from the `company_posts` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRow {
    pub id: i64,
    pub public_id: Uuid,
    pub title: String,
    pub summary: String,
    pub field: String,
    pub organization: String,
    pub source_name: String,
    pub source_url: String,
    pub dedup_key: String,
    pub thumbnail_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub published_at_estimated: bool,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Returns `true` if a post with this dedup key is already stored.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn post_exists_by_dedup_key(pool: &PgPool, dedup_key: &str) -> Result<bool, DbError> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM company_posts WHERE dedup_key = $1)",
    )
    .bind(dedup_key)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

/// Inserts every post in a single transaction and returns the number inserted.
///
/// If any insert fails the transaction is rolled back and nothing from the
/// batch is committed.
///
/// # Errors
///
/// Returns [`DbError::Integrity`] when a constraint (unique `dedup_key`, a
/// `CHECK`) rejects a row, or [`DbError::Sqlx`] for any other failure.
pub async fn insert_posts_batch(pool: &PgPool, posts: &[EnrichedPost]) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;

    for enriched in posts {
        let post = &enriched.post;
        let result = sqlx::query(
            "INSERT INTO company_posts \
                 (public_id, title, summary, field, organization, source_name, source_url, \
                  dedup_key, thumbnail_url, published_at, published_at_estimated) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(Uuid::new_v4())
        .bind(post.title())
        .bind(&enriched.summary)
        .bind(enriched.category.as_str())
        .bind(post.organization().as_str())
        .bind(post.source_name())
        .bind(post.source_url())
        .bind(post.dedup_key())
        .bind(enriched.thumbnail_url.as_deref())
        .bind(post.published_at())
        .bind(post.published_at_fallback())
        .execute(&mut *tx)
        .await;

        if let Err(e) = result {
            tx.rollback().await?;
            return Err(classify_insert_error(e));
        }
    }

    tx.commit().await?;
    Ok(posts.len())
}

/// Fetch one post by dedup key.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_post_by_dedup_key(
    pool: &PgPool,
    dedup_key: &str,
) -> Result<Option<PostRow>, DbError> {
    let row = sqlx::query_as::<_, PostRow>(
        "SELECT id, public_id, title, summary, field, organization, source_name, source_url, \
                dedup_key, thumbnail_url, published_at, published_at_estimated, view_count, \
                created_at, updated_at \
         FROM company_posts \
         WHERE dedup_key = $1",
    )
    .bind(dedup_key)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Total number of stored posts.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_posts(pool: &PgPool) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM company_posts")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

fn classify_insert_error(err: sqlx::Error) -> DbError {
    match &err {
        sqlx::Error::Database(db)
            if db.is_unique_violation() || db.is_check_violation() || db.is_foreign_key_violation() =>
        {
            DbError::Integrity(db.message().to_string())
        }
        _ => DbError::Sqlx(err),
    }
}
