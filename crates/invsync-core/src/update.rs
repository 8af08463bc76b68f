//! Outcome of one attempt to zero a linked eBay listing.

use serde::{Deserialize, Serialize};

/// Which identifier(s) the write went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdatePath {
    Sku,
    ItemId,
    /// The SKU call was rejected as an invalid identifier and the item ID
    /// call followed.
    SkuThenItemIdFallback,
}

impl UpdatePath {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            UpdatePath::Sku => "sku",
            UpdatePath::ItemId => "item_id",
            UpdatePath::SkuThenItemIdFallback => "sku_then_item_id_fallback",
        }
    }
}

impl std::fmt::Display for UpdatePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a quantity-zero write, live or dry-run.
///
/// `http_status` and `raw_body` describe the *last* call made. A transport
/// failure leaves `http_status` empty and puts the error text in `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResult {
    pub ok: bool,
    pub path_used: UpdatePath,
    pub http_status: Option<u16>,
    pub raw_body: Option<String>,
    pub error: Option<String>,
    pub dry_run: bool,
}

impl UpdateResult {
    /// A simulated success. No network call was made.
    #[must_use]
    pub fn simulated(path_used: UpdatePath) -> Self {
        Self {
            ok: true,
            path_used,
            http_status: None,
            raw_body: None,
            error: None,
            dry_run: true,
        }
    }

    /// A failure that happened before any call was made.
    #[must_use]
    pub fn rejected(path_used: UpdatePath, error: impl Into<String>) -> Self {
        Self {
            ok: false,
            path_used,
            http_status: None,
            raw_body: None,
            error: Some(error.into()),
            dry_run: false,
        }
    }
}
