//! Private-spreadsheet ledger: Google Sheets `values.get` authenticated with
//! a service-account JWT bearer grant.

use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use csv::StringRecord;
use invsync_core::{ListingRecord, SheetsLedger};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LedgerError;
use crate::parse::ledger_from_rows;

const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_TTL_SECS: i64 = 3_600;

/// The fields of a Google service-account key file that the grant needs.
#[derive(Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_owned()
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Reads a ledger range. Use [`SheetsClient::new`] for production or
/// [`SheetsClient::with_api_base`] to point at a mock server in tests. The
/// token endpoint always comes from the key file.
pub struct SheetsClient {
    client: Client,
    api_base: String,
}

impl SheetsClient {
    /// # Errors
    ///
    /// Returns [`LedgerError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(timeout_ms: u64) -> Result<Self, LedgerError> {
        Self::with_api_base(timeout_ms, DEFAULT_API_BASE)
    }

    /// # Errors
    ///
    /// Returns [`LedgerError::Http`] if the `reqwest::Client` cannot be built.
    pub fn with_api_base(timeout_ms: u64, api_base: &str) -> Result<Self, LedgerError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_owned(),
        })
    }

    /// Exchanges a signed assertion for an access token, then reads the
    /// range. The first row is the header row.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::Io`] / [`LedgerError::ServiceAccount`] for an
    ///   unreadable or malformed key file.
    /// - [`LedgerError::Signing`] if the private key cannot sign.
    /// - [`LedgerError::Http`] / [`LedgerError::UnexpectedStatus`] when the
    ///   token or values request fails.
    /// - [`LedgerError::MissingColumn`] if the header row has no `source_url`.
    pub async fn read_ledger(
        &self,
        sheet: &SheetsLedger,
    ) -> Result<Vec<ListingRecord>, LedgerError> {
        let key = read_key(&sheet.service_account_json).await?;
        let token = self.access_token(&key).await?;

        let url = self.values_url(sheet)?;
        let response = self.client.get(url.clone()).bearer_auth(token).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LedgerError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let range: ValueRange = response.json().await?;

        let mut rows = range.values.into_iter().map(to_record);
        let headers = rows.next().unwrap_or_default();
        ledger_from_rows(&headers, rows)
    }

    async fn access_token(&self, key: &ServiceAccountKey) -> Result<String, LedgerError> {
        let now = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &key.client_email,
            scope: READONLY_SCOPE,
            aud: &key.token_uri,
            iat: now,
            exp: now + ASSERTION_TTL_SECS,
        };
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &signing_key)?;

        let response = self
            .client
            .post(&key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LedgerError::UnexpectedStatus {
                status: status.as_u16(),
                url: key.token_uri.clone(),
            });
        }
        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    /// `{base}/v4/spreadsheets/{id}/values/{range}`, each segment
    /// percent-encoded.
    fn values_url(&self, sheet: &SheetsLedger) -> Result<Url, LedgerError> {
        let invalid = |reason: String| LedgerError::InvalidUrl {
            url: self.api_base.clone(),
            reason,
        };
        let mut url = Url::parse(&self.api_base).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("cannot be a base URL".to_owned()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", &sheet.sheet_id, "values", &sheet.range]);
        Ok(url)
    }
}

async fn read_key(path: &Path) -> Result<ServiceAccountKey, LedgerError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LedgerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_str(&raw).map_err(|e| LedgerError::ServiceAccount {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Sheets returns formatted strings; anything else is rendered as JSON text.
fn to_record(row: Vec<Value>) -> StringRecord {
    row.into_iter()
        .map(|cell| match cell {
            Value::String(text) => text,
            Value::Null => String::new(),
            other => other.to_string(),
        })
        .collect()
}
