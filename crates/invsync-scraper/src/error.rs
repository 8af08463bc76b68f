use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {url}")]
    RateLimited { url: String, body: String },

    #[error("server error {status} from {url}")]
    ServerError {
        status: u16,
        url: String,
        body: String,
    },
}

impl FetchError {
    /// The upstream status code, when the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Http(_) => None,
            FetchError::RateLimited { .. } => Some(429),
            FetchError::ServerError { status, .. } => Some(*status),
        }
    }
}
