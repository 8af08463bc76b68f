//! HTTP client for the eBay Trading API `ReviseInventoryStatus` call.
//!
//! Only the one call this service needs is implemented: set the available
//! quantity of a listing, keyed by SKU or by item ID.

use std::time::Duration;

use async_trait::async_trait;
use invsync_core::EbayCredentials;
use quick_xml::escape::escape;
use reqwest::{Client, Url};

use crate::error::EbayError;
use crate::response::ReviseResponse;
use crate::writer::{IdentifierKind, InventoryWriter};

pub const DEFAULT_ENDPOINT: &str = "https://api.ebay.com/ws/api.dll";

const CALL_NAME: &str = "ReviseInventoryStatus";
const COMPATIBILITY_LEVEL: &str = "1199";

/// Client for the eBay Trading API.
///
/// Use [`EbayClient::new`] for production or [`EbayClient::with_endpoint`]
/// to point at a mock server in tests.
pub struct EbayClient {
    client: Client,
    credentials: EbayCredentials,
    endpoint: Url,
    site_id: u32,
}

impl EbayClient {
    /// # Errors
    ///
    /// Returns [`EbayError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        credentials: EbayCredentials,
        site_id: u32,
        timeout_ms: u64,
    ) -> Result<Self, EbayError> {
        Self::with_endpoint(credentials, site_id, timeout_ms, DEFAULT_ENDPOINT)
    }

    /// # Errors
    ///
    /// Returns [`EbayError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`EbayError::InvalidEndpoint`] if
    /// `endpoint` is not a valid URL.
    pub fn with_endpoint(
        credentials: EbayCredentials,
        site_id: u32,
        timeout_ms: u64,
        endpoint: &str,
    ) -> Result<Self, EbayError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        let endpoint = Url::parse(endpoint).map_err(|e| EbayError::InvalidEndpoint {
            endpoint: endpoint.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            credentials,
            endpoint,
            site_id,
        })
    }

    fn request_body(&self, kind: IdentifierKind, identifier: &str, quantity: u32) -> String {
        build_request_body(&self.credentials.auth_token, kind, identifier, quantity)
    }
}

#[async_trait]
impl InventoryWriter for EbayClient {
    async fn set_quantity(
        &self,
        kind: IdentifierKind,
        identifier: &str,
        quantity: u32,
    ) -> Result<ReviseResponse, EbayError> {
        let body = self.request_body(kind, identifier, quantity);
        let response = self
            .client
            .post(self.endpoint.clone())
            .header("X-EBAY-API-SITEID", self.site_id.to_string())
            .header("X-EBAY-API-CALL-NAME", CALL_NAME)
            .header("X-EBAY-API-COMPATIBILITY-LEVEL", COMPATIBILITY_LEVEL)
            .header("X-EBAY-API-DEV-NAME", &self.credentials.dev_id)
            .header("X-EBAY-API-APP-NAME", &self.credentials.app_id)
            .header("X-EBAY-API-CERT-NAME", &self.credentials.cert_id)
            .header(reqwest::header::CONTENT_TYPE, "text/xml")
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        let parsed = ReviseResponse::parse(status, text);

        tracing::debug!(
            %kind,
            identifier,
            http_status = status,
            ack = ?parsed.ack,
            errors = parsed.errors.len(),
            "ReviseInventoryStatus response"
        );
        Ok(parsed)
    }
}

/// Builds the request document. Every interpolated value is XML-escaped.
pub(crate) fn build_request_body(
    auth_token: &str,
    kind: IdentifierKind,
    identifier: &str,
    quantity: u32,
) -> String {
    let element = kind.element();
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<ReviseInventoryStatusRequest xmlns="urn:ebay:apis:eBLBaseComponents">
  <RequesterCredentials>
    <eBayAuthToken>{token}</eBayAuthToken>
  </RequesterCredentials>
  <InventoryStatus>
    <{element}>{id}</{element}>
    <Quantity>{quantity}</Quantity>
  </InventoryStatus>
</ReviseInventoryStatusRequest>"#,
        token = escape(auth_token),
        id = escape(identifier),
    )
}
