use std::sync::LazyLock;

use invsync_core::{PrimitiveSignalSet, StockCount};
use regex::Regex;

use super::page::{contains_any, Page};

/// Matched against purchase controls only. The word 購入 alone also appears
/// in site navigation and guides on every page.
const BUY_PHRASES: [&str; 5] = [
    "カートに追加",
    "カートへ入れる",
    "カートに入れる",
    "購入する",
    "今すぐ購入",
];
const BUY_CONTROLS: &str = "button, [role=\"button\"], a";
const BUY_INPUTS: &str = "input[type=\"submit\"], input[type=\"button\"], input[type=\"image\"]";
const SOLD_PHRASES: [&str; 3] = ["SOLD OUT", "品切れ", "在庫切れ"];

static STOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"在庫数\s*[:：]\s*(\d+)").expect("valid regex"));

/// Dorasuta prints an exact count on every product page. It has no
/// low-stock notion: only `0` matters.
pub(super) fn extract(page: &Page) -> PrimitiveSignalSet {
    let low_stock_quantity = STOCK_RE
        .captures(page.text())
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .map(|quantity| StockCount {
            quantity,
            is_low: false,
        });

    let buy_control = page
        .element_texts(BUY_CONTROLS)
        .iter()
        .any(|label| contains_any(label, &BUY_PHRASES))
        || page
            .attr_values(BUY_INPUTS, "value")
            .into_iter()
            .chain(page.attr_values(BUY_INPUTS, "alt"))
            .any(|label| contains_any(label, &BUY_PHRASES));

    PrimitiveSignalSet {
        visible_buy_affordance_present: buy_control,
        visible_sold_affordance_present: page.text_contains_any(&SOLD_PHRASES),
        low_stock_quantity,
        ..PrimitiveSignalSet::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invsync_core::{resolve, AvailabilityStatus};

    fn status(html: &str) -> AvailabilityStatus {
        resolve(&extract(&Page::parse(html)))
    }

    #[test]
    fn zero_count_is_out_of_stock_even_with_cart_text() {
        let html = "<dl><dt>在庫数</dt><dd>: 0</dd></dl><button>カートに追加</button>";
        assert_eq!(status(html), AvailabilityStatus::OutOfStock);
    }

    #[test]
    fn positive_count_is_in_stock_not_low() {
        let html = "<p>在庫数：1</p>";
        let signals = extract(&Page::parse(html));
        assert_eq!(
            signals.low_stock_quantity,
            Some(StockCount {
                quantity: 1,
                is_low: false
            })
        );
        assert_eq!(resolve(&signals), AvailabilityStatus::InStock);
    }

    #[test]
    fn sold_out_text_without_count() {
        assert_eq!(status("<span class=\"label\">SOLD OUT</span>"), AvailabilityStatus::OutOfStock);
    }

    #[test]
    fn cart_button_without_count() {
        assert_eq!(status("<button>カートへ入れる</button>"), AvailabilityStatus::InStock);
    }

    #[test]
    fn purchase_word_in_navigation_is_not_a_buy_button() {
        let html = r#"<nav><a href="/guide">購入ガイド</a><a href="/history">購入履歴</a></nav>
            <h1>リザードンex</h1><span class="label">SOLD OUT</span>"#;
        assert_eq!(status(html), AvailabilityStatus::OutOfStock);
    }

    #[test]
    fn submit_input_value_is_a_buy_button() {
        let html = r#"<form><input type="submit" value="カートに入れる"></form>"#;
        assert_eq!(status(html), AvailabilityStatus::InStock);
    }

    #[test]
    fn cart_text_outside_controls_does_not_count() {
        let html = "<p>カートに追加した商品は30分保持されます</p>";
        assert_eq!(status(html), AvailabilityStatus::Unknown);
    }
}
