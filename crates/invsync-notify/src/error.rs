use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid notifier base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
