//! Resilient transport: one HTTP request/response cycle with 429-aware
//! retry and exponential backoff with jitter.
//!
//! Retry policy is scoped strictly to rate-limit responses. Any other
//! non-2xx status and any connection-level failure surface immediately.

use std::time::Duration;

use rand::Rng;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::errors::{ProviderError, RetryPolicy};

/// Total send attempts per call, including the first.
pub const MAX_ATTEMPTS: u32 = 8;

/// Sends the request, retrying on 429 per `policy`. On success the returned
/// response is guaranteed 2xx. Cancellation aborts any pending send or
/// backoff sleep immediately.
pub(crate) async fn execute(
    req: reqwest::RequestBuilder,
    policy: &RetryPolicy,
    cancel: &CancellationToken,
) -> Result<reqwest::Response, ProviderError> {
    let mut backoff = policy.initial_backoff;

    for attempt in 0..MAX_ATTEMPTS {
        let attempt_req = req.try_clone().ok_or_else(|| ProviderError::Network {
            message: "request body is not cloneable".to_string(),
        })?;

        let resp = tokio::select! {
            _ = cancel.cancelled() => return Err(ProviderError::Cancelled),
            r = attempt_req.send() => r.map_err(ProviderError::from)?,
        };

        let status = resp.status();
        if status.as_u16() != 429 {
            if status.is_success() {
                return Ok(resp);
            }
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Api { status: status.as_u16(), body });
        }

        let retry_after = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(parse_retry_after)
            .unwrap_or(None);

        // Last attempt: surface the 429 as-is.
        if attempt == MAX_ATTEMPTS - 1 {
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::RateLimited {
                status: 429,
                attempts: MAX_ATTEMPTS,
                body,
            });
        }

        let delay = match retry_after {
            Some(d) => d,
            None => {
                // Jitter spreads concurrent retries: backoff + rand(0, backoff/2).
                let half_ms = (backoff.as_millis() / 2) as u64;
                let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..=half_ms));
                let d = backoff + jitter;
                backoff *= 2;
                d
            }
        };

        warn!(
            attempt = attempt + 1,
            delay_ms = delay.as_millis() as u64,
            "rate limited, retrying"
        );

        // Retry-After: 0 means retry immediately.
        if delay.is_zero() {
            continue;
        }

        tokio::select! {
            _ = cancel.cancelled() => return Err(ProviderError::Cancelled),
            _ = tokio::time::sleep(delay) => {}
        }
    }

    unreachable!("the final attempt always returns")
}

/// Parses a Retry-After value as whole seconds. Only the integer-seconds
/// form is supported; HTTP-date is not. Missing, negative, or non-numeric
/// values come back as `None` (absent).
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    if value.is_empty() {
        return None;
    }
    let secs: i64 = value.parse().ok()?;
    if secs < 0 {
        return None;
    }
    Some(Duration::from_secs(secs as u64))
}
