//! Offline checks that need no database.

use techfeed_core::AppConfig;
use techfeed_db::{connect_pool_from_config, DbError, PoolConfig};

fn app_config() -> AppConfig {
    AppConfig {
        database_url: None,
        log_level: "info".to_string(),
        sources_path: None,
        default_max_posts: 5,
        max_concurrent_sources: 1,
        http_timeout_secs: 15,
        user_agent: "techfeed-test".to_string(),
        image_timeout_secs: 10,
        image_max_retries: 3,
        image_retry_backoff_ms: 500,
        db_max_connections: 12,
        db_min_connections: 2,
        db_acquire_timeout_secs: 30,
        openai_api_key: None,
        openai_model: "gpt-4o-mini".to_string(),
        openai_temperature: 0.3,
        openai_base_url: "https://api.openai.com/v1".to_string(),
        image_upload: None,
    }
}

#[test]
fn pool_config_follows_app_config() {
    let pool = PoolConfig::from_app_config(&app_config());

    assert_eq!(pool.max_connections, 12);
    assert_eq!(pool.min_connections, 2);
    assert_eq!(pool.acquire_timeout_secs, 30);
}

#[tokio::test]
async fn connecting_without_database_url_fails_fast() {
    let err = connect_pool_from_config(&app_config())
        .await
        .expect_err("no database url configured");

    assert!(matches!(err, DbError::MissingDatabaseUrl));
}
