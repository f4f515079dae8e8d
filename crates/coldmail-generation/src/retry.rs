//! Opt-in retry with exponential back-off and jitter for generation calls.
//!
//! [`retry_with_backoff`] retries on transient errors (timeouts, connection
//! failures, 429, 5xx). With `max_retries = 0`, the default, the first
//! failure is returned as-is.

use std::future::Future;
use std::time::Duration;

use crate::error::GenerationError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:**
/// - Network-level failures: timeout, connection reset.
/// - HTTP 429 and 5xx from the service.
///
/// **Not retriable:**
/// - Other 4xx: bad key, bad request; retrying won't fix it.
/// - [`GenerationError::Deserialize`] / [`GenerationError::Format`]: the
///   service answered, the content was wrong.
pub(crate) fn is_retriable(err: &GenerationError) -> bool {
    match err {
        GenerationError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        GenerationError::Service { status, .. } => *status == 429 || *status >= 500,
        GenerationError::Deserialize { .. }
        | GenerationError::Format(_)
        | GenerationError::InvalidBaseUrl { .. } => false,
    }
}

/// Longest pause between two attempts, before jitter.
const MAX_DELAY: Duration = Duration::from_secs(60);

/// Un-jittered pause before retry number `retry` (1-based).
///
/// With the default `backoff_base_ms = 2_000`:
///
/// | Retry | Pause (before ±25 % jitter) |
/// |-------|-----------------------------|
/// | 1     | 2 s                         |
/// | 2     | 4 s                         |
/// | 3     | 8 s                         |
/// | 4     | 16 s                        |
/// | 5     | 32 s                        |
/// | 6+    | 60 s (cap)                  |
fn backoff_delay(retry: u32, backoff_base_ms: u64) -> Duration {
    let factor = 1u64 << retry.saturating_sub(1).min(10);
    Duration::from_millis(backoff_base_ms.saturating_mul(factor)).min(MAX_DELAY)
}

/// Calls `operation` once, then again up to `max_retries` times while it
/// fails with a retriable error, sleeping [`backoff_delay`] scaled by a
/// random factor in `0.75..=1.25` between calls.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, GenerationError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GenerationError>>,
{
    let mut retry = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if retry < max_retries && is_retriable(&err) => err,
            Err(err) => return Err(err),
        };
        retry += 1;

        let pause = backoff_delay(retry, backoff_base_ms).mul_f64(rand::random_range(0.75..=1.25));
        tracing::warn!(
            retry,
            max_retries,
            pause_ms = u64::try_from(pause.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "generation call failed, retrying"
        );
        tokio::time::sleep(pause).await;
    }
}
