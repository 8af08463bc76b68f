//! Reads the ledger fresh from its configured source.

use std::path::Path;
use std::time::Duration;

use invsync_core::{LedgerSource, ListingRecord};
use reqwest::Client;

use crate::error::LedgerError;
use crate::parse::parse_ledger_csv;
use crate::sheets::SheetsClient;

/// Loads and parses the ledger. URLs and the Sheets API are called with
/// `timeout_ms`; file paths are read from disk.
///
/// # Errors
///
/// - [`LedgerError::Http`] / [`LedgerError::UnexpectedStatus`] when the
///   export cannot be downloaded.
/// - [`LedgerError::Io`] when the file cannot be read.
/// - Any parse error from [`parse_ledger_csv`].
/// - Any error from [`SheetsClient::read_ledger`].
pub async fn load_ledger(
    source: &LedgerSource,
    timeout_ms: u64,
) -> Result<Vec<ListingRecord>, LedgerError> {
    let records = match source {
        LedgerSource::Url(url) => parse_ledger_csv(&fetch_csv(url, timeout_ms).await?)?,
        LedgerSource::File(path) => parse_ledger_csv(&read_csv(path).await?)?,
        LedgerSource::SheetsApi(sheet) => SheetsClient::new(timeout_ms)?.read_ledger(sheet).await?,
    };
    tracing::info!(source = %source, rows = records.len(), "ledger loaded");
    Ok(records)
}

async fn fetch_csv(url: &str, timeout_ms: u64) -> Result<String, LedgerError> {
    let client = Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .build()?;
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(LedgerError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_owned(),
        });
    }
    Ok(response.text().await?)
}

async fn read_csv(path: &Path) -> Result<String, LedgerError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LedgerError::Io {
            path: path.to_path_buf(),
            source,
        })
}
