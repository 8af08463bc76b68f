//! Parsed listing page with the lookups every extractor needs.

use invsync_core::StructuredAvailability;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;

const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

pub(crate) struct Page {
    document: Html,
    text: String,
}

impl Page {
    pub(crate) fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);
        let text = visible_text(&document);
        Self { document, text }
    }

    /// Rendered text with whitespace collapsed. Script and style bodies are
    /// excluded.
    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn text_contains_any(&self, needles: &[&str]) -> bool {
        contains_any(&self.text, needles)
    }

    /// Values of `attr` on every element matching `css`. An unparsable
    /// selector matches nothing.
    pub(crate) fn attr_values(&self, css: &str, attr: &str) -> Vec<&str> {
        let Ok(selector) = Selector::parse(css) else {
            return Vec::new();
        };
        self.document
            .select(&selector)
            .filter_map(|el| el.value().attr(attr))
            .collect()
    }

    pub(crate) fn has_element(&self, css: &str) -> bool {
        Selector::parse(css).is_ok_and(|selector| self.document.select(&selector).next().is_some())
    }

    /// Text of every element matching `css`, each whitespace-collapsed.
    pub(crate) fn element_texts(&self, css: &str) -> Vec<String> {
        let Ok(selector) = Selector::parse(css) else {
            return Vec::new();
        };
        self.document
            .select(&selector)
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .collect()
    }

    /// Machine-readable availability from `itemprop`, Open Graph / product
    /// meta tags, then schema.org JSON-LD offers. First classifiable value
    /// wins.
    pub(crate) fn structured_availability(&self) -> Option<StructuredAvailability> {
        let from_markup = [
            ("meta[itemprop=\"availability\"]", "content"),
            ("link[itemprop=\"availability\"]", "href"),
            ("meta[property=\"product:availability\"]", "content"),
            ("meta[property=\"og:availability\"]", "content"),
        ];
        for (css, attr) in from_markup {
            if let Some(found) = self
                .attr_values(css, attr)
                .into_iter()
                .find_map(classify_availability)
            {
                return Some(found);
            }
        }

        self.element_texts("script[type=\"application/ld+json\"]")
            .iter()
            .filter_map(|raw| serde_json::from_str::<Value>(raw).ok())
            .find_map(|value| json_ld_availability(&value))
    }
}

/// Case-insensitive substring match against any needle.
pub(crate) fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    let lowered = haystack.to_lowercase();
    needles
        .iter()
        .any(|needle| lowered.contains(&needle.to_lowercase()))
}

pub(crate) fn matches_any(haystack: &str, patterns: &[Regex]) -> bool {
    patterns.iter().any(|re| re.is_match(haystack))
}

/// Maps the many spellings of availability (`InStock`,
/// `https://schema.org/OutOfStock`, `out_of_stock`, `instock`) onto the two
/// structured states. Anything else (`PreOrder`, empty) is unclassified.
pub(crate) fn classify_availability(raw: &str) -> Option<StructuredAvailability> {
    let squashed: String = raw
        .rsplit('/')
        .next()
        .unwrap_or(raw)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();

    match squashed.as_str() {
        "outofstock" | "soldout" | "discontinued" | "sold" => Some(StructuredAvailability::Out),
        "instock" | "limitedavailability" | "onlineonly" | "instoreonly" => {
            Some(StructuredAvailability::In)
        }
        _ => None,
    }
}

fn json_ld_availability(value: &Value) -> Option<StructuredAvailability> {
    match value {
        Value::Array(items) => items.iter().find_map(json_ld_availability),
        Value::Object(map) => {
            if let Some(offers) = map.get("offers") {
                if let Some(found) = offers_availability(offers) {
                    return Some(found);
                }
            }
            map.get("@graph").and_then(json_ld_availability)
        }
        _ => None,
    }
}

fn offers_availability(offers: &Value) -> Option<StructuredAvailability> {
    match offers {
        Value::Array(items) => items.iter().find_map(offers_availability),
        Value::Object(map) => map
            .get("availability")
            .and_then(Value::as_str)
            .and_then(classify_availability),
        _ => None,
    }
}

fn visible_text(document: &Html) -> String {
    let mut out = String::new();
    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if !hidden {
            out.push_str(text);
            out.push(' ');
        }
    }
    collapse_whitespace(&out)
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
