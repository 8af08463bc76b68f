use thiserror::Error;

/// Errors from the eBay Trading API client. API-level failures are not
/// errors: they come back as a [`crate::ReviseResponse`] with a failing ack.
#[derive(Debug, Error)]
pub enum EbayError {
    /// Network, TLS or timeout failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid eBay endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}
