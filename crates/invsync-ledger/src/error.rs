use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("failed to read ledger file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed ledger CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("ledger is missing required column '{0}'")]
    MissingColumn(String),

    #[error("invalid service account key {path}: {reason}")]
    ServiceAccount { path: PathBuf, reason: String },

    #[error("failed to sign token request: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}
