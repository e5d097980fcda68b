//! Exponential back-off with jitter for image downloads.

use std::future::Future;
use std::time::Duration;

use crate::error::EnrichError;

const MAX_DELAY_MS: u64 = 30_000;

/// Timeouts, connection failures, 429, and 5xx are worth another attempt.
/// Everything else (4xx, empty bodies, bad JSON) will fail the same way again.
pub(crate) fn is_retriable(err: &EnrichError) -> bool {
    match err {
        EnrichError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        EnrichError::UnexpectedStatus { status, .. } => *status == 429 || *status >= 500,
        EnrichError::Summarizer(_) | EnrichError::Upload(_) | EnrichError::Json(_) => false,
    }
}

/// Delay before retry `attempt` (1-based): `backoff_base_ms * 2^(attempt-1)`,
/// capped at 30 s, then scaled by a random factor in `[0.75, 1.25)`.
pub(crate) fn backoff_delay(attempt: u32, backoff_base_ms: u64) -> Duration {
    let exponent = attempt.saturating_sub(1).min(10);
    let capped = backoff_base_ms
        .saturating_mul(1u64 << exponent)
        .min(MAX_DELAY_MS);
    let jitter = rand::random::<f64>() * 0.5 + 0.75;
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let millis = (capped as f64 * jitter) as u64;
    Duration::from_millis(millis)
}

/// Downloads `image_url` through `fetch`, retrying transient failures up to
/// `max_retries` extra times. Image hosts behind CDNs often answer 429/503
/// under burst load; a 404 or a non-image body fails on the first try.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    image_url: &str,
    max_retries: u32,
    backoff_base_ms: u64,
    mut fetch: F,
) -> Result<T, EnrichError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, EnrichError>>,
{
    for attempt in 1..=max_retries {
        match fetch().await {
            Err(err) if is_retriable(&err) => {
                let delay = backoff_delay(attempt, backoff_base_ms);
                tracing::debug!(
                    url = %image_url,
                    attempt,
                    max_retries,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "image download failed; retrying"
                );
                tokio::time::sleep(delay).await;
            }
            done => return done,
        }
    }
    fetch().await
}
