//! HTTP retry helpers for transient errors.
//!
//! Page fetches go through [`send_text`] instead of calling
//! `reqwest::RequestBuilder::send()` directly, so every request gets
//! automatic retry with exponential backoff for transient failures
//! (timeouts, connection resets, server errors, rate limiting).
//!
//! ```ignore
//! let html = retry::send_text(3, || client.get(&url)).await?;
//! ```

use std::time::Duration;

use crate::SourceError;

/// Sends an HTTP request and returns the response body as a `String`.
///
/// The `build_request` closure is called on each attempt to construct a
/// fresh [`reqwest::RequestBuilder`] (builders are consumed by `.send()`).
/// A body that cannot be read is re-fetched through the same retry loop.
///
/// Does **not** retry HTTP 4xx (except 429).
///
/// # Errors
///
/// Returns [`SourceError`] if the request fails after all retries, the
/// server returns a non-retryable status code, or the body cannot be read.
#[allow(clippy::future_not_send)]
pub async fn send_text<F>(max_retries: u32, build_request: F) -> Result<String, SourceError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let mut body_attempt = 0;

    loop {
        let response = send_inner(&build_request, max_retries).await?;
        let url = response.url().to_string();
        let status = response.status();

        match response.text().await {
            Ok(text) => return Ok(text),
            Err(e) if body_attempt < max_retries => {
                body_attempt += 1;
                let delay = backoff(body_attempt);
                log::warn!(
                    "Body read failed (body retry {body_attempt}/{max_retries}), \
                     re-fetching in {delay:?}...\n  \
                     url: {url}\n  \
                     status: {status}\n  \
                     error: {e}",
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                log::error!(
                    "Body read failed after {max_retries} retries, giving up.\n  \
                     url: {url}\n  \
                     status: {status}\n  \
                     error: {e}",
                );
                return Err(SourceError::Http(e));
            }
        }
    }
}

/// Retry loop behind [`send_text`].
///
/// Retries on transient errors up to `max_retries` times with exponential
/// backoff and returns the first 2xx/3xx response.
#[allow(clippy::future_not_send)]
async fn send_inner<F>(
    build_request: &F,
    max_retries: u32,
) -> Result<reqwest::Response, SourceError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let mut last_error: Option<SourceError> = None;

    for attempt in 0..=max_retries {
        if attempt > 0 {
            let delay = backoff(attempt);
            log::warn!("  retry {attempt}/{max_retries} in {delay:?}...");
            tokio::time::sleep(delay).await;
        }

        match build_request().send().await {
            Err(e) => {
                if is_transient(&e) && attempt < max_retries {
                    log::warn!("  transient error: {e}");
                    last_error = Some(SourceError::Http(e));
                    continue;
                }
                return Err(SourceError::Http(e));
            }
            Ok(response) => {
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                    if attempt < max_retries {
                        log::warn!("  HTTP {status}");
                        last_error = Some(SourceError::Unavailable {
                            message: format!("HTTP {status}"),
                        });
                        continue;
                    }
                    return Err(SourceError::Unavailable {
                        message: format!("HTTP {status} after {max_retries} retries"),
                    });
                }

                if status.is_client_error() {
                    return Err(SourceError::Unavailable {
                        message: format!("HTTP {status}"),
                    });
                }

                return Ok(response);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| SourceError::Unavailable {
        message: "request failed after all retries".to_string(),
    }))
}

/// 2s, 4s, 8s, ... capped at 64s.
fn backoff(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt.min(6))
}

/// Returns `true` if the error is likely transient and worth retrying.
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_body() || e.is_decode() || e.is_request()
}
