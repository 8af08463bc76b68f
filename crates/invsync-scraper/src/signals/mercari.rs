use std::sync::LazyLock;

use invsync_core::PrimitiveSignalSet;
use regex::Regex;

use super::page::{matches_any, Page};

static SOLD_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"売り切れ",
        r"(?i)SOLD\s*OUT",
        r"(?i)\bsold\b",
        r"購入できません",
        r"在庫なし",
        r"販売停止中",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

const BUY_PHRASES: [&str; 2] = ["購入手続きへ", "購入に進む"];

/// Mercari often renders the sold ribbon as an image or an aria label, so
/// meta content, `img[alt]` and `aria-label` are scanned along with text.
pub(super) fn extract(page: &Page) -> PrimitiveSignalSet {
    let metas = page.attr_values("meta", "content").join(" ");
    let labels = [
        page.attr_values("img", "alt").join(" "),
        page.attr_values("[aria-label]", "aria-label").join(" "),
    ]
    .join(" ");

    let sold = [metas.as_str(), page.text(), labels.as_str()]
        .into_iter()
        .any(|haystack| matches_any(haystack, &SOLD_PATTERNS));

    PrimitiveSignalSet {
        structured_availability: page.structured_availability(),
        visible_buy_affordance_present: page.text_contains_any(&BUY_PHRASES),
        visible_sold_affordance_present: sold,
        ..PrimitiveSignalSet::default()
    }
}
