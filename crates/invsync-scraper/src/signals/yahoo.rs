use std::sync::LazyLock;

use invsync_core::PrimitiveSignalSet;
use regex::Regex;

use super::page::Page;

const ENDED_PHRASES: [&str; 3] = [
    "このオークションは終了しています",
    "オークションは終了しました",
    "この商品の販売は終了しました",
];

const DELETED_PHRASES: [&str; 4] = [
    "出品が取り消されました",
    "ページが見つかりません",
    "ご指定のページは見つかりません",
    "このページは存在しません",
];

const SOLD_PHRASES: [&str; 3] = ["売り切れました", "在庫切れ", "落札者"];

const BUY_PHRASES: [&str; 6] = [
    "購入手続きへ",
    "カートに入れる",
    "今すぐ購入",
    "購入する",
    "入札する",
    "落札する",
];

static SOLD_RIBBON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bsold\b").expect("valid regex"));

/// Yahoo! Auctions and PayPay Flea Market. Auction lifecycle markers map to
/// `ENDED`; a cancelled listing maps to `DELETED`.
pub(super) fn extract(page: &Page) -> PrimitiveSignalSet {
    let text = page.text();
    PrimitiveSignalSet {
        deleted_marker_found: page.text_contains_any(&DELETED_PHRASES),
        auction_ended_marker_found: page.text_contains_any(&ENDED_PHRASES),
        visible_buy_affordance_present: page.text_contains_any(&BUY_PHRASES),
        visible_sold_affordance_present: page.text_contains_any(&SOLD_PHRASES)
            || SOLD_RIBBON_RE.is_match(text),
        ..PrimitiveSignalSet::default()
    }
}
