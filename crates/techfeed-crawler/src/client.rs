//! HTTP access for feed documents and article pages.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::CrawlerError;

const FEED_ACCEPT: &str =
    "application/rss+xml,application/atom+xml,application/xml;q=0.9,text/xml;q=0.9,*/*;q=0.8";
const PAGE_ACCEPT: &str = "text/html,application/xhtml+xml";

/// Shared HTTP client for feed and webpage fetches.
///
/// Every request carries the configured timeout. Neither fetch is retried:
/// a failed feed aborts only its own source and a failed page fetch only
/// drops a thumbnail candidate.
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: Client,
}

impl FeedClient {
    /// Creates a `FeedClient` with a per-request timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlerError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, CrawlerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetch the raw bytes of a feed document.
    ///
    /// # Errors
    ///
    /// - [`CrawlerError::InvalidUrl`] if `url` is not an absolute http(s) URL.
    /// - [`CrawlerError::Http`] on network failure or timeout.
    /// - [`CrawlerError::UnexpectedStatus`] on any non-2xx response.
    pub async fn fetch_feed(&self, url: &str) -> Result<Vec<u8>, CrawlerError> {
        let response = self
            .client
            .get(parse_http_url(url)?)
            .header(reqwest::header::ACCEPT, FEED_ACCEPT)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CrawlerError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// Fetch an HTML page as text.
    ///
    /// # Errors
    ///
    /// - [`CrawlerError::InvalidUrl`] if `url` is not an absolute http(s) URL.
    /// - [`CrawlerError::Http`] on network failure or timeout.
    /// - [`CrawlerError::UnexpectedStatus`] on any non-2xx response.
    pub async fn fetch_page(&self, url: &str) -> Result<String, CrawlerError> {
        let response = self
            .client
            .get(parse_http_url(url)?)
            .header(reqwest::header::ACCEPT, PAGE_ACCEPT)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CrawlerError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

fn parse_http_url(raw: &str) -> Result<Url, CrawlerError> {
    let url = Url::parse(raw.trim()).map_err(|e| CrawlerError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(CrawlerError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme {}", url.scheme()),
        });
    }
    Ok(url)
}
