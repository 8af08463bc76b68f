//! Exponential back-off with jitter for page fetches.
//!
//! Only transient upstream conditions are retried: network failures, 429 and
//! 5xx. A 404/410 is a definitive answer about the listing and goes straight
//! back to the caller.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::error::FetchError;

const MAX_DELAY_MS: u64 = 30_000;

/// Timeouts, refused connections and failed sends are worth another try, as
/// are 429 and 5xx. Builder, redirect and decode errors are not.
fn is_retriable(err: &FetchError) -> bool {
    match err {
        FetchError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
        FetchError::RateLimited { .. } | FetchError::ServerError { .. } => true,
    }
}

/// `backoff_base_ms × 2^(retry-1)`, capped at 30 s, then scaled by a random
/// factor in `0.75..=1.25`.
fn backoff_delay(retry: u32, backoff_base_ms: u64) -> Duration {
    let exponent = retry.saturating_sub(1).min(10);
    let base_ms = backoff_base_ms
        .saturating_mul(1u64 << exponent)
        .min(MAX_DELAY_MS);
    Duration::from_millis(base_ms).mul_f64(rand::rng().random_range(0.75..=1.25))
}

/// Runs `operation`, retrying transient failures up to `max_retries` extra
/// times. The last error is returned once retries run out.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut retries = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if retries < max_retries && is_retriable(&err) => err,
            Err(err) => return Err(err),
        };
        retries += 1;
        let delay = backoff_delay(retries, backoff_base_ms);
        tracing::warn!(
            retry = retries,
            max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "page fetch failed, backing off"
        );
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn server_error(status: u16) -> FetchError {
        FetchError::ServerError {
            status,
            url: "https://jp.mercari.com/item/m1".to_owned(),
            body: String::new(),
        }
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, FetchError>(7)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_server_errors_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                if c.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(server_error(503))
                } else {
                    Ok::<u32, FetchError>(1)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn returns_last_error_after_exhausting_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(1, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, FetchError>(FetchError::RateLimited {
                    url: "https://item.rakuten.co.jp/x/".to_owned(),
                    body: String::new(),
                })
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(result.unwrap_err().status(), Some(429));
    }

    #[tokio::test]
    async fn zero_retries_means_one_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(0, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, FetchError>(server_error(500))
            }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn builder_errors_are_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                let err = reqwest::Client::new()
                    .get("not a url")
                    .build()
                    .expect_err("relative URL cannot build");
                Err::<u32, FetchError>(FetchError::Http(err))
            }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn refused_connections_are_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(1, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                // Nothing listens on port 1.
                reqwest::get("http://127.0.0.1:1/")
                    .await
                    .map(|_| 0u32)
                    .map_err(FetchError::Http)
            }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn delay_is_capped_and_jittered() {
        for retry in 1..=20 {
            let delay = backoff_delay(retry, 1_000);
            assert!(delay <= Duration::from_millis(MAX_DELAY_MS * 5 / 4), "{delay:?}");
        }
        let first = backoff_delay(1, 1_000);
        assert!(first >= Duration::from_millis(750) && first <= Duration::from_millis(1_250));
        assert_eq!(backoff_delay(3, 0), Duration::ZERO);
    }
}
