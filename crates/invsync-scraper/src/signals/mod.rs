//! Per-marketplace signal extractors.
//!
//! Extractors only report what a page shows. They never decide a status;
//! [`invsync_core::resolve`] does that, with one precedence order for all
//! sources.

mod amazon;
mod dorasuta;
mod mercari;
mod page;
mod rakuten;
mod yahoo;
mod yshopping;

use invsync_core::{PrimitiveSignalSet, SourceFamily};

use page::Page;

/// Extracts primitive signals from a fetched page. Empty or malformed HTML
/// yields a set that resolves to `UNKNOWN`.
#[must_use]
pub fn extract_signals(family: SourceFamily, html: &str) -> PrimitiveSignalSet {
    if html.trim().is_empty() {
        return PrimitiveSignalSet::default();
    }
    let page = Page::parse(html);
    let mut signals = match family {
        SourceFamily::Amazon => amazon::extract(&page),
        SourceFamily::Mercari => mercari::extract(&page),
        SourceFamily::Rakuten => rakuten::extract(&page),
        SourceFamily::YahooShopping => yshopping::extract(&page),
        SourceFamily::YahooAuction => yahoo::extract(&page),
        SourceFamily::Dorasuta => dorasuta::extract(&page),
    };
    signals.auction_style = family.is_auction_style();
    signals
}
