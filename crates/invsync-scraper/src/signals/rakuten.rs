use invsync_core::PrimitiveSignalSet;

use super::page::Page;

const DELETED_PHRASES: [&str; 5] = [
    "この商品は販売しておりません",
    "お探しの商品は見つかりませんでした",
    "現在ご指定のページは表示できません",
    "販売期間が終了しました",
    "ページが見つかりません",
];

const SOLD_PHRASES: [&str; 4] = ["売り切れ", "在庫なし", "販売終了", "現在売り切れ中です"];

const BUY_PHRASES: [&str; 4] = [
    "商品をかごに追加",
    "購入手続きへ",
    "ご購入手続き",
    "カートに入れる",
];

pub(super) fn extract(page: &Page) -> PrimitiveSignalSet {
    PrimitiveSignalSet {
        deleted_marker_found: page.text_contains_any(&DELETED_PHRASES),
        structured_availability: page.structured_availability(),
        visible_buy_affordance_present: page.text_contains_any(&BUY_PHRASES),
        visible_sold_affordance_present: page.text_contains_any(&SOLD_PHRASES),
        ..PrimitiveSignalSet::default()
    }
}
