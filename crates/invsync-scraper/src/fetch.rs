//! Page retrieval for third-party listings.

use std::time::Duration;

use async_trait::async_trait;
use invsync_core::{AppConfig, FetchMode};
use rand::seq::IndexedRandom;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Client, StatusCode};

use crate::error::FetchError;
use crate::retry::retry_with_backoff;

const USER_AGENTS: [&str; 3] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.3 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0 Safari/537.36",
];

const BROWSER_UA: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// What a fetch produced. `http_code` is `0` when no HTTP response was
/// received; `body` then carries the error description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub http_code: u16,
    pub body: String,
}

impl FetchResult {
    #[must_use]
    pub fn transport_failure(description: impl Into<String>) -> Self {
        Self {
            http_code: 0,
            body: description.into(),
        }
    }

    #[must_use]
    pub fn is_transport_failure(&self) -> bool {
        self.http_code == 0
    }

    /// 404 or 410: the listing itself is gone.
    #[must_use]
    pub fn is_dead_link(&self) -> bool {
        matches!(self.http_code, 404 | 410)
    }
}

/// Retrieves a listing page. Implementations never fail: every outcome,
/// transport errors included, is folded into a [`FetchResult`].
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchResult;
}

/// Plain HTTP fetcher with two request profiles.
///
/// [`FetchMode::Http`] rotates desktop user agents per request.
/// [`FetchMode::Headless`] sends a fixed Chrome navigation profile
/// (`Sec-Fetch-*`, `ja-JP` locale) for sources that gate on it.
pub struct HttpFetcher {
    client: Client,
    mode: FetchMode,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl HttpFetcher {
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        mode: FetchMode,
        timeout_ms: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, FetchError> {
        let mut builder = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .connect_timeout(Duration::from_millis(timeout_ms.min(10_000)));
        if mode == FetchMode::Headless {
            builder = builder.default_headers(browser_headers());
        }
        Ok(Self {
            client: builder.build()?,
            mode,
            max_retries,
            backoff_base_ms,
        })
    }

    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the `reqwest::Client` cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        Self::new(
            config.fetch_mode,
            config.request_timeout_ms,
            config.fetch_max_retries,
            config.fetch_backoff_base_ms,
        )
    }

    #[must_use]
    pub fn mode(&self) -> FetchMode {
        self.mode
    }

    async fn fetch_once(&self, url: &str) -> Result<FetchResult, FetchError> {
        let mut request = self.client.get(url);
        if self.mode == FetchMode::Http {
            request = request
                .header(USER_AGENT, pick_user_agent())
                .header(ACCEPT, HTML_ACCEPT)
                .header(ACCEPT_LANGUAGE, "ja,en-US;q=0.9,en;q=0.8");
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited {
                url: url.to_owned(),
                body,
            });
        }
        if status.is_server_error() {
            return Err(FetchError::ServerError {
                status: status.as_u16(),
                url: url.to_owned(),
                body,
            });
        }

        Ok(FetchResult {
            http_code: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        let outcome =
            retry_with_backoff(self.max_retries, self.backoff_base_ms, || self.fetch_once(url))
                .await;

        let result = match outcome {
            Ok(result) => result,
            Err(FetchError::RateLimited { body, .. }) => FetchResult {
                http_code: 429,
                body,
            },
            Err(FetchError::ServerError { status, body, .. }) => FetchResult {
                http_code: status,
                body,
            },
            Err(FetchError::Http(e)) => FetchResult::transport_failure(format!("request error: {e}")),
        };

        tracing::debug!(
            url,
            mode = %self.mode,
            http_code = result.http_code,
            bytes = result.body.len(),
            "fetched listing page"
        );
        result
    }
}

fn pick_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

fn browser_headers() -> HeaderMap {
    let pairs = [
        ("user-agent", BROWSER_UA),
        ("accept", HTML_ACCEPT),
        ("accept-language", "ja-JP,ja;q=0.9,en-US;q=0.8,en;q=0.7"),
        ("upgrade-insecure-requests", "1"),
        ("sec-fetch-dest", "document"),
        ("sec-fetch-mode", "navigate"),
        ("sec-fetch-site", "none"),
        ("sec-fetch-user", "?1"),
    ];
    let mut headers = HeaderMap::new();
    for (name, value) in pairs {
        headers.insert(name, HeaderValue::from_static(value));
    }
    headers
}
