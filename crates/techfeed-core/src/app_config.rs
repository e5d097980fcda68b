use std::path::PathBuf;

/// Where relocated thumbnails are uploaded and how they are addressed publicly.
#[derive(Clone)]
pub struct ImageUploadConfig {
    /// Base URL that receives `PUT {upload_url}/{key}` requests.
    pub upload_url: String,
    /// Base URL under which uploaded keys are served.
    pub public_base_url: String,
    pub token: Option<String>,
}

impl std::fmt::Debug for ImageUploadConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUploadConfig")
            .field("upload_url", &self.upload_url)
            .field("public_base_url", &self.public_base_url)
            .field("token", &self.token.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    /// Only the `run` and `migrate` commands need a database.
    pub database_url: Option<String>,
    pub log_level: String,
    /// `None` means the built-in source list is used.
    pub sources_path: Option<PathBuf>,
    pub default_max_posts: usize,
    pub max_concurrent_sources: usize,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    pub image_timeout_secs: u64,
    pub image_max_retries: u32,
    pub image_retry_backoff_ms: u64,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_temperature: f32,
    pub openai_base_url: String,
    /// `None` disables thumbnail relocation; original URLs are stored as-is.
    pub image_upload: Option<ImageUploadConfig>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &self.database_url.as_ref().map(|_| "[redacted]"))
            .field("log_level", &self.log_level)
            .field("sources_path", &self.sources_path)
            .field("default_max_posts", &self.default_max_posts)
            .field("max_concurrent_sources", &self.max_concurrent_sources)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("image_timeout_secs", &self.image_timeout_secs)
            .field("image_max_retries", &self.image_max_retries)
            .field("image_retry_backoff_ms", &self.image_retry_backoff_ms)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("openai_model", &self.openai_model)
            .field("openai_temperature", &self.openai_temperature)
            .field("openai_base_url", &self.openai_base_url)
            .field("image_upload", &self.image_upload)
            .finish()
    }
}
