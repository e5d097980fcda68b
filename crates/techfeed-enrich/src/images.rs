//! Thumbnail relocation: download a resolved thumbnail and re-host it.

use std::time::Duration;

use async_trait::async_trait;
use techfeed_core::{ImageUploadConfig, Organization};
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

use crate::error::EnrichError;
use crate::retry::retry_with_backoff;

const DEFAULT_EXTENSION: &str = "jpg";
const MAX_EXTENSION_LEN: usize = 5;

/// Object storage for relocated images.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store `bytes` under `key` and return the public URL.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError`] if the upload is rejected or unreachable.
    async fn upload_image(&self, bytes: Vec<u8>, key: &str) -> Result<String, EnrichError>;
}

/// [`ImageStore`] that `PUT`s to `{upload_url}/{key}` and serves from
/// `{public_base_url}/{key}`.
pub struct HttpImageStore {
    client: reqwest::Client,
    config: ImageUploadConfig,
}

impl HttpImageStore {
    /// # Errors
    ///
    /// Returns [`EnrichError::Http`] if the HTTP client cannot be built.
    pub fn new(config: ImageUploadConfig, timeout_secs: u64) -> Result<Self, EnrichError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl ImageStore for HttpImageStore {
    async fn upload_image(&self, bytes: Vec<u8>, key: &str) -> Result<String, EnrichError> {
        let target = format!("{}/{key}", self.config.upload_url.trim_end_matches('/'));
        let mut request = self
            .client
            .put(&target)
            .header(reqwest::header::CONTENT_TYPE, content_type_for_key(key))
            .body(bytes);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EnrichError::UnexpectedStatus {
                status: status.as_u16(),
                url: target,
            });
        }
        Ok(format!(
            "{}/{key}",
            self.config.public_base_url.trim_end_matches('/')
        ))
    }
}

/// Downloads thumbnails and hands them to an [`ImageStore`]. Downloads are
/// the only retried network call in the pipeline.
pub struct ThumbnailRelocator {
    client: reqwest::Client,
    store: Box<dyn ImageStore>,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl ThumbnailRelocator {
    /// # Errors
    ///
    /// Returns [`EnrichError::Http`] if the HTTP client cannot be built.
    pub fn new(
        store: Box<dyn ImageStore>,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, EnrichError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            store,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Re-host `image_url` under `thumbnails/{organization}/...`.
    ///
    /// Returns `None` on any failure; callers keep the original URL.
    pub async fn relocate(&self, image_url: &str, organization: Organization) -> Option<String> {
        let download = retry_with_backoff(image_url, self.max_retries, self.backoff_base_ms, || {
            self.download(image_url)
        });
        let bytes = match download.await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(url = %image_url, error = %e, "thumbnail download failed");
                return None;
            }
        };

        let key = thumbnail_key(organization, &extension_from_url(image_url));
        match self.store.upload_image(bytes, &key).await {
            Ok(url) => {
                info!(from = %image_url, to = %url, "thumbnail relocated");
                Some(url)
            }
            Err(e) => {
                warn!(url = %image_url, key = %key, error = %e, "thumbnail upload failed");
                None
            }
        }
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, EnrichError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EnrichError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(EnrichError::Upload(format!("empty image body from {url}")));
        }
        Ok(bytes.to_vec())
    }
}

/// Lower-cased extension of the URL's last path segment, or `jpg` when there
/// is none or it does not look like an extension.
pub(crate) fn extension_from_url(image_url: &str) -> String {
    let file_name = match Url::parse(image_url) {
        Ok(url) => url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .map(str::to_string),
        Err(_) => image_url
            .split(['?', '#'])
            .next()
            .and_then(|path| path.rsplit('/').next())
            .map(str::to_string),
    };

    file_name
        .and_then(|name| {
            name.rsplit_once('.')
                .map(|(_, ext)| ext.to_ascii_lowercase())
        })
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

pub(crate) fn thumbnail_key(organization: Organization, extension: &str) -> String {
    format!(
        "thumbnails/{}/{}.{extension}",
        organization.slug(),
        Uuid::new_v4()
    )
}

fn content_type_for_key(key: &str) -> String {
    let ext = key.rsplit_once('.').map_or(DEFAULT_EXTENSION, |(_, ext)| ext);
    match ext {
        "jpg" | "jpeg" => "image/jpeg".to_string(),
        "svg" => "image/svg+xml".to_string(),
        other => format!("image/{other}"),
    }
}
