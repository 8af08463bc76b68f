use std::path::PathBuf;

/// How source pages are acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// Plain HTTP GET with a rotating desktop User-Agent.
    #[default]
    Http,
    /// Full browser request profile. JS rendering is left to a
    /// `PageFetcher` implementation that drives a real browser.
    Headless,
}

impl std::fmt::Display for FetchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchMode::Http => write!(f, "http"),
            FetchMode::Headless => write!(f, "headless"),
        }
    }
}

impl std::str::FromStr for FetchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" | "requests" => Ok(FetchMode::Http),
            "headless" | "playwright" | "browser" => Ok(FetchMode::Headless),
            other => Err(format!("unknown fetch mode '{other}' (expected http or headless)")),
        }
    }
}

/// Where the operator ledger is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerSource {
    /// Published CSV export, fetched over HTTP(S).
    Url(String),
    /// CSV file on local disk.
    File(PathBuf),
    /// Google Sheets values API, read with a service account.
    SheetsApi(SheetsLedger),
}

/// A private spreadsheet range. The first row holds the column headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetsLedger {
    pub sheet_id: String,
    /// A1 notation, e.g. `Sheet1!A:E`.
    pub range: String,
    /// Path to the service-account key file downloaded from Google Cloud.
    pub service_account_json: PathBuf,
}

impl LedgerSource {
    /// Classifies a raw setting: anything with an `http://` or `https://`
    /// scheme is a URL, everything else a file path.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            LedgerSource::Url(trimmed.to_owned())
        } else {
            LedgerSource::File(PathBuf::from(trimmed))
        }
    }
}

impl std::fmt::Display for LedgerSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerSource::Url(url) => write!(f, "{url}"),
            LedgerSource::File(path) => write!(f, "{}", path.display()),
            LedgerSource::SheetsApi(sheet) => write!(f, "sheets:{}/{}", sheet.sheet_id, sheet.range),
        }
    }
}

/// eBay Trading API credentials. All four are needed for a live write.
#[derive(Clone, PartialEq, Eq)]
pub struct EbayCredentials {
    pub auth_token: String,
    pub dev_id: String,
    pub app_id: String,
    pub cert_id: String,
}

impl std::fmt::Debug for EbayCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EbayCredentials")
            .field("auth_token", &"[redacted]")
            .field("dev_id", &self.dev_id)
            .field("app_id", &self.app_id)
            .field("cert_id", &"[redacted]")
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"[redacted]")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

/// Runtime configuration, built once at startup and passed into the run loop.
///
/// Credentials redact themselves in `Debug` output.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub ledger_source: LedgerSource,
    pub fetch_mode: FetchMode,
    pub dry_run: bool,
    pub request_timeout_ms: u64,
    pub loop_interval_ms: u64,
    pub fetch_max_retries: u32,
    pub fetch_backoff_base_ms: u64,
    pub notify_fetch_failures: bool,
    pub log_level: String,
    pub ebay: Option<EbayCredentials>,
    pub ebay_endpoint: String,
    pub ebay_site_id: u32,
    pub telegram: Option<TelegramConfig>,
}
