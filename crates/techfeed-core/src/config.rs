use std::path::PathBuf;
use std::str::FromStr;

use crate::app_config::{AppConfig, ImageUploadConfig};
use crate::ConfigError;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let database_url = optional("DATABASE_URL");
    let log_level = or_default("TECHFEED_LOG_LEVEL", "info");
    let sources_path = optional("TECHFEED_SOURCES_PATH").map(PathBuf::from);

    let default_max_posts: usize = parse_var(&or_default, "TECHFEED_DEFAULT_MAX_POSTS", "5")?;
    let max_concurrent_sources: usize =
        parse_var(&or_default, "TECHFEED_MAX_CONCURRENT_SOURCES", "1")?;
    let http_timeout_secs: u64 = parse_var(&or_default, "TECHFEED_HTTP_TIMEOUT_SECS", "15")?;
    let user_agent = or_default("TECHFEED_USER_AGENT", DEFAULT_USER_AGENT);

    let image_timeout_secs: u64 = parse_var(&or_default, "TECHFEED_IMAGE_TIMEOUT_SECS", "10")?;
    let image_max_retries: u32 = parse_var(&or_default, "TECHFEED_IMAGE_MAX_RETRIES", "3")?;
    let image_retry_backoff_ms: u64 =
        parse_var(&or_default, "TECHFEED_IMAGE_RETRY_BACKOFF_MS", "500")?;

    let db_max_connections: u32 = parse_var(&or_default, "TECHFEED_DB_MAX_CONNECTIONS", "5")?;
    let db_min_connections: u32 = parse_var(&or_default, "TECHFEED_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs: u64 =
        parse_var(&or_default, "TECHFEED_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let openai_api_key = optional("OPENAI_API_KEY");
    let openai_model = or_default("OPENAI_MODEL_NAME", "gpt-4o-mini");
    let openai_temperature: f32 = parse_var(&or_default, "OPENAI_MODEL_TEMPERATURE", "0.3")?;
    let openai_base_url = or_default("OPENAI_BASE_URL", "https://api.openai.com/v1")
        .trim_end_matches('/')
        .to_string();

    if default_max_posts == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "TECHFEED_DEFAULT_MAX_POSTS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let image_upload = match optional("IMAGE_UPLOAD_URL") {
        Some(upload_url) => {
            let public_base_url =
                optional("CDN_URL").ok_or_else(|| ConfigError::MissingEnvVar("CDN_URL".to_string()))?;
            Some(ImageUploadConfig {
                upload_url: upload_url.trim_end_matches('/').to_string(),
                public_base_url: normalize_public_base(&public_base_url),
                token: optional("IMAGE_UPLOAD_TOKEN"),
            })
        }
        None => None,
    };

    Ok(AppConfig {
        database_url,
        log_level,
        sources_path,
        default_max_posts,
        max_concurrent_sources,
        http_timeout_secs,
        user_agent,
        image_timeout_secs,
        image_max_retries,
        image_retry_backoff_ms,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        openai_api_key,
        openai_model,
        openai_temperature,
        openai_base_url,
        image_upload,
    })
}

fn parse_var<T, D>(or_default: &D, var: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    D: Fn(&str, &str) -> String,
{
    let raw = or_default(var, default);
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

/// `CDN_URL` is commonly given as a bare host (`cdn.example.com`).
fn normalize_public_base(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
