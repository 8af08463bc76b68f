//! Operator ledger rows and the sentinel-blank rule applied to every field.

use serde::{Deserialize, Serialize};

/// Values a spreadsheet export uses for "nothing here". Compared
/// case-insensitively after trimming.
const BLANK_SENTINELS: [&str; 5] = ["", "nan", "none", "null", "na"];

/// Returns `true` if `value` is absent, whitespace, or one of the blank
/// sentinels (`nan`, `none`, `null`, `na`, any case).
#[must_use]
pub fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| {
        let trimmed = v.trim();
        BLANK_SENTINELS
            .iter()
            .any(|s| trimmed.eq_ignore_ascii_case(s))
    })
}

/// Normalises a raw ledger cell: blank sentinels become `None`, everything
/// else is trimmed.
#[must_use]
pub fn normalize_field(value: Option<&str>) -> Option<String> {
    if is_blank(value) {
        None
    } else {
        value.map(|v| v.trim().to_owned())
    }
}

/// Parses the ledger's `quantity` cell.
///
/// Accepts integers and floats with no fractional part (`"0.0"` from a
/// spreadsheet export). Blank sentinels give `Ok(None)`; anything else that
/// does not parse is returned as `Err` with the offending text so the caller
/// can log it.
///
/// # Errors
///
/// Returns the trimmed raw value when it is present but not a whole number.
#[allow(clippy::cast_possible_truncation)]
pub fn parse_quantity(value: Option<&str>) -> Result<Option<i64>, String> {
    let Some(raw) = normalize_field(value) else {
        return Ok(None);
    };

    if let Ok(n) = raw.parse::<i64>() {
        return Ok(Some(n));
    }

    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 => Ok(Some(f as i64)),
        _ => Err(raw),
    }
}

/// One row of the operator ledger, read fresh each run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    /// Third-party listing being watched.
    pub source_url: String,
    /// eBay `ItemID` of the linked listing.
    pub marketplace_item_id: Option<String>,
    pub sku: Option<String>,
    /// Operator policy directive, raw. Normalised by [`crate::Trigger::parse`].
    pub trigger: Option<String>,
    /// Last quantity the operator recorded as synced to eBay.
    pub recorded_quantity: Option<i64>,
}

impl ListingRecord {
    /// Returns `true` when at least one identifier is usable for a write.
    #[must_use]
    pub fn has_identifier(&self) -> bool {
        self.sku.is_some() || self.marketplace_item_id.is_some()
    }

    /// Human-facing identifier: SKU first, then item ID, then `(no-id)`.
    #[must_use]
    pub fn display_ident(&self) -> &str {
        self.sku
            .as_deref()
            .or(self.marketplace_item_id.as_deref())
            .unwrap_or("(no-id)")
    }
}
