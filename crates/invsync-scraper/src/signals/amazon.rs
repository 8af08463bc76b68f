use std::sync::LazyLock;

use invsync_core::{PrimitiveSignalSet, StockCount};
use regex::Regex;

use super::page::Page;

const OUT_PHRASES: [&str; 10] = [
    "在庫切れ",
    "在庫なし",
    "一時的に在庫切れ",
    "現在在庫切れ",
    "出品者からお求めいただけません",
    "この商品は現在お取り扱いできません",
    "入荷の予定は立っていません",
    "販売を停止",
    "販売休止",
    "販売終了",
];

const BUY_BUTTONS: &str =
    "#buy-now-button, #add-to-cart-button, #add-to-cart-button-ubb, input[name=\"submit.add-to-cart\"]";

static REMAINING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"残り\s*(\d+)\s*点").expect("valid regex"));

/// Amazon shows a count only when stock is short, so any displayed count is
/// low.
pub(super) fn extract(page: &Page) -> PrimitiveSignalSet {
    let text = page.text();

    let low_stock_quantity = REMAINING_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .or_else(|| text.contains("残りわずか").then_some(1))
        .map(|quantity| StockCount {
            quantity,
            is_low: true,
        });

    PrimitiveSignalSet {
        structured_availability: page.structured_availability(),
        visible_buy_affordance_present: page.has_element(BUY_BUTTONS),
        visible_sold_affordance_present: page.text_contains_any(&OUT_PHRASES),
        low_stock_quantity,
        ..PrimitiveSignalSet::default()
    }
}
