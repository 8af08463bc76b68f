//! `ReviseInventoryStatusResponse` parsing and outcome classification.

use quick_xml::events::Event;
use quick_xml::Reader;

/// Error code eBay returns when a SKU does not resolve to a listing.
pub const INVALID_SKU_CODE: &str = "21916255";
/// Error code for a hard-expired auth token.
pub const TOKEN_EXPIRED_CODE: &str = "932";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ack {
    Success,
    Warning,
    Failure,
    PartialFailure,
    Other(String),
}

impl Ack {
    fn parse(raw: &str) -> Self {
        match raw.trim() {
            "Success" => Ack::Success,
            "Warning" => Ack::Warning,
            "Failure" => Ack::Failure,
            "PartialFailure" => Ack::PartialFailure,
            other => Ack::Other(other.to_owned()),
        }
    }
}

impl std::fmt::Display for Ack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ack::Success => f.write_str("Success"),
            Ack::Warning => f.write_str("Warning"),
            Ack::Failure => f.write_str("Failure"),
            Ack::PartialFailure => f.write_str("PartialFailure"),
            Ack::Other(raw) => f.write_str(raw),
        }
    }
}

/// One `<Errors>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiErrorEntry {
    pub code: String,
    pub short_message: String,
    pub long_message: String,
    pub severity: String,
}

/// A parsed API reply. `body` is kept verbatim for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviseResponse {
    pub http_status: u16,
    pub ack: Option<Ack>,
    pub errors: Vec<ApiErrorEntry>,
    pub body: String,
}

impl ReviseResponse {
    /// Parses a response body. Malformed XML is not an error: whatever was
    /// read before the fault is kept and the raw body still drives the
    /// substring checks.
    #[must_use]
    pub fn parse(http_status: u16, body: String) -> Self {
        let (ack, errors) = parse_body(&body);
        Self {
            http_status,
            ack,
            errors,
            body,
        }
    }

    /// HTTP 200 with a `Success` or `Warning` ack. A warning means the
    /// write was applied.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.http_status == 200 && matches!(self.ack, Some(Ack::Success | Ack::Warning))
    }

    /// The SKU did not resolve. The only failure that justifies an item ID
    /// fallback.
    #[must_use]
    pub fn is_invalid_identifier(&self) -> bool {
        self.errors.iter().any(|e| e.code == INVALID_SKU_CODE) || self.body.contains("Invalid SKU")
    }

    #[must_use]
    pub fn is_token_expired(&self) -> bool {
        self.errors.iter().any(|e| e.code == TOKEN_EXPIRED_CODE)
            || self.body.contains("Auth token is hard expired")
    }

    /// One-line description of a failed call for logs and results.
    #[must_use]
    pub fn failure_summary(&self) -> String {
        if self.is_token_expired() {
            return "eBay auth token hard expired (code 932); refresh EBAY_AUTH_TOKEN".to_owned();
        }
        if let Some(first) = self.errors.iter().find(|e| e.severity != "Warning") {
            let message = if first.long_message.is_empty() {
                &first.short_message
            } else {
                &first.long_message
            };
            return format!("eBay error {}: {message}", first.code);
        }
        match &self.ack {
            Some(ack) if self.http_status == 200 => format!("eBay ack {ack}"),
            _ => format!("eBay responded HTTP {}", self.http_status),
        }
    }
}

fn parse_body(body: &str) -> (Option<Ack>, Vec<ApiErrorEntry>) {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut ack = None;
    let mut errors = Vec::new();
    let mut current: Option<ApiErrorEntry> = None;
    let mut current_tag = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if name == "Errors" {
                    current = Some(ApiErrorEntry::default());
                }
                current_tag = name;
            }
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"Errors" {
                    if let Some(entry) = current.take() {
                        errors.push(entry);
                    }
                }
                current_tag.clear();
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().unwrap_or_default().into_owned();
                match (current.as_mut(), current_tag.as_str()) {
                    (Some(entry), "ErrorCode") => entry.code = text,
                    (Some(entry), "ShortMessage") => entry.short_message = text,
                    (Some(entry), "LongMessage") => entry.long_message = text,
                    (Some(entry), "SeverityCode") => entry.severity = text,
                    (None, "Ack") => ack = Some(Ack::parse(&text)),
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::debug!(error = %e, "unparseable eBay response body");
                break;
            }
            _ => {}
        }
    }

    (ack, errors)
}
