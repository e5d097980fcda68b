//! Shared domain types and configuration for the techfeed workspace.

pub mod app_config;
pub mod config;
pub mod organization;
pub mod posts;
pub mod sources;
pub mod urls;

use thiserror::Error;

pub use app_config::{AppConfig, ImageUploadConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use organization::{Field, Organization};
pub use posts::{CanonicalPost, EnrichedPost};
pub use sources::{default_sources, load_sources, SourceConfig, SourcesFile};
pub use urls::canonicalize;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read sources file {path}: {source}")]
    SourcesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse sources file: {0}")]
    SourcesFileParse(#[from] serde_yaml::Error),

    #[error("sources validation failed: {0}")]
    Validation(String),
}
