use invsync_core::PrimitiveSignalSet;

use super::page::Page;

const OUT_PHRASES: [&str; 6] = [
    "在庫なし",
    "在庫切れ",
    "売り切れ",
    "完売",
    "販売終了",
    "お取り扱いできません",
];

const BUY_PHRASES: [&str; 4] = ["在庫あり", "通常在庫", "在庫残り", "カートに入れる"];

/// Store themes vary widely, so `og:availability` is the primary signal and
/// text is the fallback.
pub(super) fn extract(page: &Page) -> PrimitiveSignalSet {
    PrimitiveSignalSet {
        structured_availability: page.structured_availability(),
        visible_buy_affordance_present: page.text_contains_any(&BUY_PHRASES),
        visible_sold_affordance_present: page.text_contains_any(&OUT_PHRASES),
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
    fn og_availability_out_of_stock() {
        let html = r#"<html><head><meta property="og:availability" content="out_of_stock"></head>
            <body><button>カートに入れる</button></body></html>"#;
        assert_eq!(status(html), AvailabilityStatus::OutOfStock);
    }

    #[test]
    fn og_availability_instock() {
        let html = r#"<meta property="og:availability" content="instock">"#;
        assert_eq!(status(html), AvailabilityStatus::InStock);
    }

    #[test]
    fn text_fallback() {
        assert_eq!(status("<p>完売しました</p>"), AvailabilityStatus::OutOfStock);
        assert_eq!(status("<p>在庫あり</p>"), AvailabilityStatus::InStock);
    }
}
