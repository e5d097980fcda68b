use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("summarizer error: {0}")]
    Summarizer(String),

    #[error("image upload error: {0}")]
    Upload(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
