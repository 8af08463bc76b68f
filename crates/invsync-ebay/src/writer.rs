//! The write seam between reconciliation and the marketplace.

use async_trait::async_trait;

use crate::error::EbayError;
use crate::response::{Ack, ReviseResponse};

/// Which identifier element a write is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
    Sku,
    ItemId,
}

impl IdentifierKind {
    /// XML element name in `<InventoryStatus>`.
    #[must_use]
    pub fn element(self) -> &'static str {
        match self {
            IdentifierKind::Sku => "SKU",
            IdentifierKind::ItemId => "ItemID",
        }
    }
}

impl std::fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentifierKind::Sku => f.write_str("sku"),
            IdentifierKind::ItemId => f.write_str("item_id"),
        }
    }
}

/// Sets the available quantity of one listing.
///
/// One call is one external mutation attempt. Retries and fallbacks are
/// the caller's business; see [`crate::reconcile_zero`].
#[async_trait]
pub trait InventoryWriter: Send + Sync {
    /// # Errors
    ///
    /// Returns [`EbayError::Http`] on transport failure. API-level failures
    /// come back as `Ok` with a failing [`ReviseResponse`].
    async fn set_quantity(
        &self,
        kind: IdentifierKind,
        identifier: &str,
        quantity: u32,
    ) -> Result<ReviseResponse, EbayError>;

    /// `true` when no real write happens.
    fn is_dry_run(&self) -> bool {
        false
    }
}

/// Logs the intended write and acknowledges it without any network call.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunWriter;

#[async_trait]
impl InventoryWriter for DryRunWriter {
    async fn set_quantity(
        &self,
        kind: IdentifierKind,
        identifier: &str,
        quantity: u32,
    ) -> Result<ReviseResponse, EbayError> {
        tracing::info!(%kind, identifier, quantity, "dry run: would revise eBay quantity");
        Ok(ReviseResponse {
            http_status: 200,
            ack: Some(Ack::Success),
            errors: Vec::new(),
            body: String::new(),
        })
    }

    fn is_dry_run(&self) -> bool {
        true
    }
}
