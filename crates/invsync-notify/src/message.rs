//! Operator notification texts.

use invsync_core::{ReasonCode, UpdateResult};

/// Longest diagnostic body included in a failure message, in characters.
pub const SNIPPET_CHARS: usize = 500;

/// Context shared by every message about one ledger row.
#[derive(Debug, Clone, Copy)]
pub struct RowContext<'a> {
    /// Source family tag, e.g. `MERCARI`.
    pub tag: &'a str,
    pub ident: &'a str,
    pub url: &'a str,
}

/// Sent before the write is attempted.
#[must_use]
pub fn pending(row: RowContext<'_>, reason: &ReasonCode) -> String {
    format!(
        "⚠️ [{}] {reason}: {} → zeroing eBay quantity\n{}",
        row.tag, row.ident, row.url
    )
}

#[must_use]
pub fn success(row: RowContext<'_>, reason: &ReasonCode, result: &UpdateResult) -> String {
    let dry = if result.dry_run { " (dry run)" } else { "" };
    format!(
        "✅ [{}] eBay quantity zeroed: {}\nreason: {reason}\npath: {}{dry}\n{}",
        row.tag, row.ident, result.path_used, row.url
    )
}

/// Includes the HTTP status and a snippet of the response body (or the
/// transport error when there was no body).
#[must_use]
pub fn failure(row: RowContext<'_>, reason: &ReasonCode, result: &UpdateResult) -> String {
    let status = result
        .http_status
        .map_or_else(|| "n/a".to_owned(), |s| s.to_string());
    let detail = result
        .raw_body
        .as_deref()
        .filter(|b| !b.trim().is_empty())
        .or(result.error.as_deref())
        .unwrap_or("");
    format!(
        "❌ [{}] eBay zeroing failed: {}\nreason: {reason}\nHTTP={status}\n{}\n{}",
        row.tag,
        row.ident,
        snippet(detail, SNIPPET_CHARS),
        row.url
    )
}

#[must_use]
pub fn fetch_failure(row: RowContext<'_>, error: &str) -> String {
    format!(
        "⚠️ [{}] fetch failed: {}\n{}\n{}",
        row.tag,
        row.ident,
        snippet(error, SNIPPET_CHARS),
        row.url
    )
}

/// First `max_chars` characters of `text`. Never splits a character.
#[must_use]
pub fn snippet(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
