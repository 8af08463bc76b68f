//! Signal fusion: primitive page signals into one canonical availability status.
//!
//! Extractors report what they saw; [`resolve`] decides what it means. The
//! precedence order is fixed here so every source family shares it.

use serde::{Deserialize, Serialize};

/// Canonical availability of a source listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityStatus {
    InStock,
    LowStock,
    OutOfStock,
    /// Out of stock, as labelled by auction-style sources.
    Sold,
    /// Auction lifecycle finished.
    Ended,
    /// Listing removed or unpublished.
    Deleted,
    /// No rule matched. Never leads to a write.
    Unknown,
}

impl AvailabilityStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AvailabilityStatus::InStock => "IN_STOCK",
            AvailabilityStatus::LowStock => "LOW_STOCK",
            AvailabilityStatus::OutOfStock => "OUT_OF_STOCK",
            AvailabilityStatus::Sold => "SOLD",
            AvailabilityStatus::Ended => "ENDED",
            AvailabilityStatus::Deleted => "DELETED",
            AvailabilityStatus::Unknown => "UNKNOWN",
        }
    }

    /// `DELETED` and `ENDED`: the listing can never be in stock again.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            AvailabilityStatus::Deleted | AvailabilityStatus::Ended
        )
    }
}

impl std::fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Machine-readable availability from structured markup (schema.org,
/// Open Graph, `itemprop`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuredAvailability {
    In,
    Out,
}

/// A stock count read off the page, already classified by the extractor.
///
/// The low-stock threshold is source-specific, so the extractor sets
/// `is_low` and the resolver only reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockCount {
    pub quantity: u32,
    pub is_low: bool,
}

/// Everything one extractor observed on one page.
///
/// `Default` is the empty set: malformed or empty pages produce it, and it
/// resolves to [`AvailabilityStatus::Unknown`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimitiveSignalSet {
    pub deleted_marker_found: bool,
    pub structured_availability: Option<StructuredAvailability>,
    pub visible_buy_affordance_present: bool,
    pub visible_sold_affordance_present: bool,
    pub low_stock_quantity: Option<StockCount>,
    pub auction_ended_marker_found: bool,
    /// Set by auction-style extractors; a sold affordance then reads as
    /// `SOLD` instead of `OUT_OF_STOCK`.
    pub auction_style: bool,
}

/// Fuses primitive signals into one status. First match wins:
///
/// 1. deleted marker → `DELETED`
/// 2. auction-ended marker → `ENDED`
/// 3. structured availability → `IN_STOCK` / `OUT_OF_STOCK`
/// 4. stock count: `0` → `OUT_OF_STOCK`, low → `LOW_STOCK`, else `IN_STOCK`
/// 5. sold shown, buy not shown → `OUT_OF_STOCK` (or `SOLD` for auctions)
/// 6. buy shown, sold not shown → `IN_STOCK`
/// 7. both or neither → `UNKNOWN`
///
/// Structured metadata outranks visible text because promotional copy and
/// images trip keyword matches ("SOLD" on a banner). Rule 7 never guesses.
#[must_use]
pub fn resolve(signals: &PrimitiveSignalSet) -> AvailabilityStatus {
    if signals.deleted_marker_found {
        return AvailabilityStatus::Deleted;
    }
    if signals.auction_ended_marker_found {
        return AvailabilityStatus::Ended;
    }
    match signals.structured_availability {
        Some(StructuredAvailability::In) => return AvailabilityStatus::InStock,
        Some(StructuredAvailability::Out) => return AvailabilityStatus::OutOfStock,
        None => {}
    }
    if let Some(count) = signals.low_stock_quantity {
        return if count.quantity == 0 {
            AvailabilityStatus::OutOfStock
        } else if count.is_low {
            AvailabilityStatus::LowStock
        } else {
            AvailabilityStatus::InStock
        };
    }

    match (
        signals.visible_buy_affordance_present,
        signals.visible_sold_affordance_present,
    ) {
        (false, true) if signals.auction_style => AvailabilityStatus::Sold,
        (false, true) => AvailabilityStatus::OutOfStock,
        (true, false) => AvailabilityStatus::InStock,
        (true, true) | (false, false) => AvailabilityStatus::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buy_only() -> PrimitiveSignalSet {
        PrimitiveSignalSet {
            visible_buy_affordance_present: true,
            ..PrimitiveSignalSet::default()
        }
    }

    #[test]
    fn empty_set_is_unknown() {
        assert_eq!(
            resolve(&PrimitiveSignalSet::default()),
            AvailabilityStatus::Unknown
        );
    }

    #[test]
    fn deleted_marker_beats_everything() {
        let signals = PrimitiveSignalSet {
            deleted_marker_found: true,
            auction_ended_marker_found: true,
            structured_availability: Some(StructuredAvailability::In),
            visible_buy_affordance_present: true,
            ..PrimitiveSignalSet::default()
        };
        assert_eq!(resolve(&signals), AvailabilityStatus::Deleted);
    }

    #[test]
    fn ended_marker_beats_structured_availability() {
        let signals = PrimitiveSignalSet {
            auction_ended_marker_found: true,
            structured_availability: Some(StructuredAvailability::In),
            ..PrimitiveSignalSet::default()
        };
        assert_eq!(resolve(&signals), AvailabilityStatus::Ended);
    }

    #[test]
    fn structured_in_overrides_sold_banner_text() {
        let signals = PrimitiveSignalSet {
            structured_availability: Some(StructuredAvailability::In),
            visible_sold_affordance_present: true,
            ..PrimitiveSignalSet::default()
        };
        assert_eq!(resolve(&signals), AvailabilityStatus::InStock);
    }

    #[test]
    fn structured_out_overrides_buy_button() {
        let signals = PrimitiveSignalSet {
            structured_availability: Some(StructuredAvailability::Out),
            visible_buy_affordance_present: true,
            ..PrimitiveSignalSet::default()
        };
        assert_eq!(resolve(&signals), AvailabilityStatus::OutOfStock);
    }

    #[test]
    fn stock_count_zero_is_out_of_stock() {
        let signals = PrimitiveSignalSet {
            low_stock_quantity: Some(StockCount {
                quantity: 0,
                is_low: true,
            }),
            ..buy_only()
        };
        assert_eq!(resolve(&signals), AvailabilityStatus::OutOfStock);
    }

    #[test]
    fn stock_count_classification_is_taken_as_given() {
        let low = PrimitiveSignalSet {
            low_stock_quantity: Some(StockCount {
                quantity: 2,
                is_low: true,
            }),
            ..PrimitiveSignalSet::default()
        };
        let plenty = PrimitiveSignalSet {
            low_stock_quantity: Some(StockCount {
                quantity: 2,
                is_low: false,
            }),
            ..PrimitiveSignalSet::default()
        };
        assert_eq!(resolve(&low), AvailabilityStatus::LowStock);
        assert_eq!(resolve(&plenty), AvailabilityStatus::InStock);
    }

    #[test]
    fn stock_count_outranks_visible_affordances() {
        let signals = PrimitiveSignalSet {
            low_stock_quantity: Some(StockCount {
                quantity: 5,
                is_low: false,
            }),
            visible_sold_affordance_present: true,
            ..PrimitiveSignalSet::default()
        };
        assert_eq!(resolve(&signals), AvailabilityStatus::InStock);
    }

    #[test]
    fn sold_without_buy_is_out_of_stock() {
        let signals = PrimitiveSignalSet {
            visible_sold_affordance_present: true,
            ..PrimitiveSignalSet::default()
        };
        assert_eq!(resolve(&signals), AvailabilityStatus::OutOfStock);
    }

    #[test]
    fn sold_without_buy_on_auction_is_sold() {
        let signals = PrimitiveSignalSet {
            visible_sold_affordance_present: true,
            auction_style: true,
            ..PrimitiveSignalSet::default()
        };
        assert_eq!(resolve(&signals), AvailabilityStatus::Sold);
    }

    #[test]
    fn buy_without_sold_is_in_stock() {
        assert_eq!(resolve(&buy_only()), AvailabilityStatus::InStock);
    }

    #[test]
    fn buy_and_sold_together_is_unknown() {
        let signals = PrimitiveSignalSet {
            visible_buy_affordance_present: true,
            visible_sold_affordance_present: true,
            ..PrimitiveSignalSet::default()
        };
        assert_eq!(resolve(&signals), AvailabilityStatus::Unknown);
    }

    #[test]
    fn only_deleted_and_ended_are_terminal() {
        assert!(AvailabilityStatus::Deleted.is_terminal());
        assert!(AvailabilityStatus::Ended.is_terminal());
        assert!(!AvailabilityStatus::Sold.is_terminal());
        assert!(!AvailabilityStatus::Unknown.is_terminal());
    }
}
